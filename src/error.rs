use thiserror::Error;

/// Whatever a resolver fails with. Wrapped into [`MapError::FieldResolution`].
pub type ResolveError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum MapError {
    #[error("Mapping {source_type} -> {target} is already registered")]
    DuplicateRegistration { source_type: &'static str, target: &'static str },
    #[error("Field {target}.{field} has more than one rule")]
    DuplicateFieldRule { target: &'static str, field: String },
    #[error("No mapping registered for {source_type} -> {target}")]
    UnregisteredMapping { source_type: &'static str, target: &'static str },
    #[error("Failed to resolve {field}: {cause}")]
    FieldResolution {
        field: String,
        #[source]
        cause: ResolveError,
    },
    #[error("Cycle detected while mapping {source_type} -> {target}")]
    CycleDetected { source_type: &'static str, target: &'static str },
    #[error("Nesting exceeded the depth limit of {limit}")]
    DepthExceeded { limit: usize },
    #[error("Config error: {0}")]
    Config(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// Raised by the typed override accessors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum OverrideError {
    #[error("Override {key} does not hold a value of type {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

pub type Result<T> = std::result::Result<T, MapError>;

// Helper conversions
impl From<config::ConfigError> for MapError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for MapError {
    fn from(e: serde_json::Error) -> Self { Self::Render(e.to_string()) }
}
