//! Call-scoped override values handed to resolvers.
//!
//! An [`Overrides`] table is built by the caller right before a mapping call and
//! borrowed by every resolver reached during that call, nested ones included.
//! Nothing in the registry or the engine keeps hold of it afterwards.
//!
//! Keys are [`FieldKey`]s. A key is either *qualified* by the target type that
//! owns the field (`FieldKey::of::<UserVm>("Description")`) or *shared*
//! (`FieldKey::shared("Description")`), in which case every target type with a
//! field of that name that reads overrides will pick it up. Lookups made on
//! behalf of a target type try the qualified key first and the shared key second,
//! so a shared value can be refined for one type without touching the others.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::OverrideError;
use crate::registry::{type_label, OtherHasher};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Scope {
    Shared,
    Owner(TypeId),
}

/// Qualified name of an overridable field.
#[derive(Clone, Debug)]
pub struct FieldKey {
    scope: Scope,
    // only used when printing
    owner: &'static str,
    field: Cow<'static, str>,
}

impl FieldKey {
    /// Key for `field` on target type `T` only.
    pub fn of<T: 'static>(field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            scope: Scope::Owner(TypeId::of::<T>()),
            owner: type_label::<T>(),
            field: field.into(),
        }
    }
    /// Key for `field` on any target type.
    pub fn shared(field: impl Into<Cow<'static, str>>) -> Self {
        Self {
            scope: Scope::Shared,
            owner: "*",
            field: field.into(),
        }
    }
}
impl PartialEq for FieldKey {
    fn eq(&self, other: &Self) -> bool {
        self.scope == other.scope && self.field == other.field
    }
}
impl Eq for FieldKey {}
impl Hash for FieldKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.scope.hash(state);
        self.field.hash(state);
    }
}
impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{}", self.owner, self.field)
    }
}

type OverrideValue = Box<dyn Any + Send + Sync>;

/// The override set of a single mapping call.
#[derive(Default)]
pub struct Overrides {
    values: HashMap<FieldKey, OverrideValue, OtherHasher>,
}

impl Overrides {
    pub fn new() -> Self {
        Self {
            values: HashMap::default(),
        }
    }
    /// Builder style [`Overrides::insert`].
    pub fn with<V: Any + Send + Sync>(mut self, key: FieldKey, value: V) -> Self {
        self.insert(key, value);
        self
    }
    /// Shorthand for a value under [`FieldKey::shared`].
    pub fn shared<V: Any + Send + Sync>(self, field: impl Into<Cow<'static, str>>, value: V) -> Self {
        self.with(FieldKey::shared(field), value)
    }
    /// Shorthand for a value under [`FieldKey::of`].
    pub fn qualified<T: 'static, V: Any + Send + Sync>(
        self,
        field: impl Into<Cow<'static, str>>,
        value: V,
    ) -> Self {
        self.with(FieldKey::of::<T>(field), value)
    }
    /// Returns true if an earlier value under the same key was replaced.
    pub fn insert<V: Any + Send + Sync>(&mut self, key: FieldKey, value: V) -> bool {
        self.values.insert(key, Box::new(value)).is_some()
    }
    /// Exact key lookup. A value stored with a different type is an error rather
    /// than a silent miss.
    pub fn get<V: 'static>(&self, key: &FieldKey) -> Result<Option<&V>, OverrideError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<V>()
                .map(Some)
                .ok_or_else(|| OverrideError::TypeMismatch {
                    key: key.to_string(),
                    expected: std::any::type_name::<V>(),
                }),
        }
    }
    /// Lookup on behalf of target type `T`: qualified key first, then shared.
    pub fn lookup<T: 'static, V: 'static>(&self, field: &'static str) -> Result<Option<&V>, OverrideError> {
        if let Some(value) = self.get::<V>(&FieldKey::of::<T>(field))? {
            return Ok(Some(value));
        }
        self.get::<V>(&FieldKey::shared(field))
    }
    pub fn len(&self) -> usize {
        self.values.len()
    }
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut keys: Vec<String> = self.values.keys().map(|k| k.to_string()).collect();
        keys.sort_unstable();
        f.debug_struct("Overrides").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Owner;
    struct Other;

    #[test]
    fn qualified_beats_shared() {
        let overrides = Overrides::new()
            .shared("Description", "everyone".to_string())
            .qualified::<Owner, _>("Description", "owner only".to_string());
        let owner = overrides.lookup::<Owner, String>("Description").unwrap();
        let other = overrides.lookup::<Other, String>("Description").unwrap();
        assert_eq!(owner.map(String::as_str), Some("owner only"));
        assert_eq!(other.map(String::as_str), Some("everyone"));
    }

    #[test]
    fn missing_key_is_none() {
        let overrides = Overrides::new();
        assert!(overrides.is_empty());
        assert_eq!(overrides.lookup::<Owner, String>("Description").unwrap(), None);
    }

    #[test]
    fn wrong_type_is_reported() {
        let overrides = Overrides::new().shared("Age", 42u8);
        let err = overrides.lookup::<Owner, String>("Age").unwrap_err();
        assert!(matches!(err, OverrideError::TypeMismatch { ref key, .. } if key.as_str() == "*.Age"));
    }

    #[test]
    fn keys_differ_by_scope() {
        assert_ne!(FieldKey::of::<Owner>("Name"), FieldKey::of::<Other>("Name"));
        assert_ne!(FieldKey::of::<Owner>("Name"), FieldKey::shared("Name"));
        assert_eq!(FieldKey::shared("Name"), FieldKey::shared(String::from("Name")));
        let mut overrides = Overrides::new();
        assert!(!overrides.insert(FieldKey::shared("Name"), 1i32));
        assert!(overrides.insert(FieldKey::shared("Name"), 2i32));
        assert_eq!(overrides.len(), 1);
        assert_eq!(overrides.get::<i32>(&FieldKey::shared("Name")).unwrap(), Some(&2));
    }
}
