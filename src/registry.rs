use std::any::{type_name, Any, TypeId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasherDefault;

use seahash::SeaHasher;
use tracing::{debug, info, warn};

use crate::error::{MapError, Result};
use crate::rule::TypeMapping;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

// Last path segment of a type name, generics dropped: `my::model::UserVm` -> `UserVm`.
pub(crate) fn type_label<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let head = full.split('<').next().unwrap_or(full);
    head.rsplit("::").next().unwrap_or(head)
}

// ------------- Pair -------------
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pair {
    key: (TypeId, TypeId),
    source: &'static str,
    target: &'static str,
}
impl Pair {
    pub(crate) fn of<S: 'static, T: 'static>() -> Self {
        Self {
            key: (TypeId::of::<S>(), TypeId::of::<T>()),
            source: type_label::<S>(),
            target: type_label::<T>(),
        }
    }
    fn unregistered(&self) -> MapError {
        MapError::UnregisteredMapping {
            source_type: self.source,
            target: self.target,
        }
    }
}

// Type erased registration. `mapping` always holds the `TypeMapping<S, T>`
// matching `pair`.
struct Registration {
    pair: Pair,
    mapping: Box<dyn Any + Send + Sync>,
    requires: Vec<Pair>,
}

// ------------- RegistryBuilder -------------
/// Setup phase of the registry. Consumed by [`RegistryBuilder::seal`].
#[derive(Default)]
pub struct RegistryBuilder {
    kept: HashMap<(TypeId, TypeId), Registration, OtherHasher>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            kept: HashMap::default(),
        }
    }
    pub fn register<S: 'static, T: Default + 'static>(&mut self, mapping: TypeMapping<S, T>) -> Result<()> {
        let pair = Pair::of::<S, T>();
        if let Some(field) = mapping.duplicate_field() {
            return Err(MapError::DuplicateFieldRule {
                target: pair.target,
                field: field.to_string(),
            });
        }
        match self.kept.entry(pair.key) {
            Entry::Occupied(_) => Err(MapError::DuplicateRegistration {
                source_type: pair.source,
                target: pair.target,
            }),
            Entry::Vacant(e) => {
                debug!(source_type = pair.source, target_type = pair.target, fields = ?mapping.fields(), "registered mapping");
                let requires = mapping.requires();
                e.insert(Registration {
                    pair,
                    mapping: Box::new(mapping),
                    requires,
                });
                Ok(())
            }
        }
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    /// Freezes the registrations. Every pair reached through a nested rule must
    /// be registered by now.
    pub fn seal(self) -> Result<Registry> {
        for registration in self.kept.values() {
            if let Some(missing) = registration
                .requires
                .iter()
                .find(|required| !self.kept.contains_key(&required.key))
            {
                warn!(
                    owner = %format!("{} -> {}", registration.pair.source, registration.pair.target),
                    source_type = missing.source,
                    target_type = missing.target,
                    "nested mapping is not registered"
                );
                return Err(missing.unregistered());
            }
        }
        info!(registrations = self.kept.len(), "registry sealed");
        Ok(Registry { kept: self.kept })
    }
}

// ------------- Registry -------------
/// Sealed, read only set of type mappings. Share it through an `Arc`.
pub struct Registry {
    kept: HashMap<(TypeId, TypeId), Registration, OtherHasher>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }
    pub fn lookup<S: 'static, T: 'static>(&self) -> Result<&TypeMapping<S, T>> {
        let pair = Pair::of::<S, T>();
        self.kept
            .get(&pair.key)
            .and_then(|registration| registration.mapping.downcast_ref::<TypeMapping<S, T>>())
            .ok_or_else(|| pair.unregistered())
    }
    pub fn contains<S: 'static, T: 'static>(&self) -> bool {
        self.kept.contains_key(&Pair::of::<S, T>().key)
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    /// Registered `(source, target)` type names, sorted.
    pub fn pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs: Vec<_> = self
            .kept
            .values()
            .map(|registration| (registration.pair.source, registration.pair.target))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry").field("pairs", &self.pairs()).finish()
    }
}
