//! Field rules and the per type pair mapping they make up.
//!
//! A [`TypeMapping<S, T>`] is an ordered list of field rules, one per target
//! field. Rules are declared with the builder methods below and executed by the
//! engine in declaration order against a freshly defaulted `T`.
//!
//! ```
//! use mapvalue::rule::TypeMapping;
//!
//! #[derive(Default)]
//! struct Label { text: String, note: Option<String> }
//! struct Tag { text: String }
//!
//! let mapping = TypeMapping::<Tag, Label>::new()
//!     .copy("text", |t| &t.text, |l| &mut l.text)
//!     .resolve_override("note", |l| &mut l.note);
//! assert_eq!(mapping.fields(), vec!["text", "note"]);
//! ```

use std::fmt;

use tracing::trace;

use crate::engine::MapContext;
use crate::error::{MapError, ResolveError, Result};
use crate::overrides::Overrides;
use crate::registry::{type_label, Pair};

type Apply<S, T> = Box<dyn Fn(&S, &mut T, &mut MapContext<'_>) -> Result<()> + Send + Sync>;

/// What a rule does, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Copy { source_field: &'static str },
    Resolve,
    ResolveOverride,
    Nested { source_field: &'static str },
    NestedMany { source_field: &'static str },
}

struct FieldRule<S, T> {
    target_field: &'static str,
    kind: RuleKind,
    // type pair a nested rule maps through, checked when the registry is sealed
    requires: Option<Pair>,
    apply: Apply<S, T>,
}

pub struct TypeMapping<S, T> {
    rules: Vec<FieldRule<S, T>>,
}

impl<S: 'static, T: Default + 'static> TypeMapping<S, T> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    fn push(mut self, target_field: &'static str, kind: RuleKind, requires: Option<Pair>, apply: Apply<S, T>) -> Self {
        self.rules.push(FieldRule {
            target_field,
            kind,
            requires,
            apply,
        });
        self
    }

    /// Copies a source field into the target field of the same name.
    pub fn copy<V, G, P>(self, field: &'static str, get: G, slot: P) -> Self
    where
        V: Clone + 'static,
        G: Fn(&S) -> &V + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.copy_from(field, field, get, slot)
    }

    /// Copies `source_field` into a differently named `target_field`.
    pub fn copy_from<V, G, P>(self, target_field: &'static str, source_field: &'static str, get: G, slot: P) -> Self
    where
        V: Clone + 'static,
        G: Fn(&S) -> &V + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(
            target_field,
            RuleKind::Copy { source_field },
            None,
            Box::new(move |source: &S, target: &mut T, _: &mut MapContext<'_>| {
                *slot(target) = get(source).clone();
                Ok(())
            }),
        )
    }

    /// Computes the target field from the source and the call's override set.
    /// A resolver error aborts the whole mapping call.
    pub fn resolve<V, R, P>(self, field: &'static str, resolver: R, slot: P) -> Self
    where
        V: 'static,
        R: Fn(&S, &Overrides) -> std::result::Result<V, ResolveError> + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut V + Send + Sync + 'static,
    {
        self.push(
            field,
            RuleKind::Resolve,
            None,
            Box::new(move |source: &S, target: &mut T, ctx: &mut MapContext<'_>| {
                let value = resolver(source, ctx.overrides()).map_err(|cause| MapError::FieldResolution {
                    field: format!("{}.{}", type_label::<T>(), field),
                    cause,
                })?;
                *slot(target) = value;
                Ok(())
            }),
        )
    }

    /// Takes the field straight from the override set, qualified key first,
    /// shared key second. Leaves `None` when neither is present.
    pub fn resolve_override<V, P>(self, field: &'static str, slot: P) -> Self
    where
        V: Clone + 'static,
        P: Fn(&mut T) -> &mut Option<V> + Send + Sync + 'static,
    {
        let mut mapping = self.resolve(
            field,
            move |_: &S, overrides: &Overrides| Ok(overrides.lookup::<T, V>(field)?.cloned()),
            slot,
        );
        if let Some(rule) = mapping.rules.last_mut() {
            rule.kind = RuleKind::ResolveOverride;
        }
        mapping
    }

    /// Maps an optional composite field through the registered `S2 -> T2` mapping.
    pub fn nested<S2, T2, G, P>(self, field: &'static str, get: G, slot: P) -> Self
    where
        S2: 'static,
        T2: Default + 'static,
        G: Fn(&S) -> Option<&S2> + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut Option<T2> + Send + Sync + 'static,
    {
        self.push(
            field,
            RuleKind::Nested { source_field: field },
            Some(Pair::of::<S2, T2>()),
            Box::new(move |source: &S, target: &mut T, ctx: &mut MapContext<'_>| {
                let mapped = match get(source) {
                    Some(inner) => Some(ctx.map_value::<S2, T2>(inner)?),
                    None => None,
                };
                *slot(target) = mapped;
                Ok(())
            }),
        )
    }

    /// Same as [`TypeMapping::nested`] for recursive view types that box their
    /// children.
    pub fn nested_boxed<S2, T2, G, P>(self, field: &'static str, get: G, slot: P) -> Self
    where
        S2: 'static,
        T2: Default + 'static,
        G: Fn(&S) -> Option<&S2> + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut Option<Box<T2>> + Send + Sync + 'static,
    {
        self.push(
            field,
            RuleKind::Nested { source_field: field },
            Some(Pair::of::<S2, T2>()),
            Box::new(move |source: &S, target: &mut T, ctx: &mut MapContext<'_>| {
                let mapped = match get(source) {
                    Some(inner) => Some(Box::new(ctx.map_value::<S2, T2>(inner)?)),
                    None => None,
                };
                *slot(target) = mapped;
                Ok(())
            }),
        )
    }

    /// Maps every element of a collection field, keeping order and length.
    pub fn nested_many<S2, T2, G, P>(self, field: &'static str, get: G, slot: P) -> Self
    where
        S2: 'static,
        T2: Default + 'static,
        G: Fn(&S) -> &[S2] + Send + Sync + 'static,
        P: Fn(&mut T) -> &mut Vec<T2> + Send + Sync + 'static,
    {
        self.push(
            field,
            RuleKind::NestedMany { source_field: field },
            Some(Pair::of::<S2, T2>()),
            Box::new(move |source: &S, target: &mut T, ctx: &mut MapContext<'_>| {
                let items = get(source);
                let mut mapped = Vec::with_capacity(items.len());
                for item in items {
                    mapped.push(ctx.map_value::<S2, T2>(item)?);
                }
                *slot(target) = mapped;
                Ok(())
            }),
        )
    }

    pub(crate) fn build(&self, source: &S, ctx: &mut MapContext<'_>) -> Result<T> {
        let mut target = T::default();
        for rule in &self.rules {
            trace!(target_type = type_label::<T>(), field = rule.target_field, "applying rule");
            (rule.apply)(source, &mut target, ctx)?;
        }
        Ok(target)
    }
}

impl<S: 'static, T: Default + 'static> Default for TypeMapping<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T> TypeMapping<S, T> {
    /// Target field names in declaration order.
    pub fn fields(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.target_field).collect()
    }
    pub fn describe(&self) -> Vec<(&'static str, RuleKind)> {
        self.rules.iter().map(|rule| (rule.target_field, rule.kind)).collect()
    }
    pub(crate) fn requires(&self) -> Vec<Pair> {
        self.rules.iter().filter_map(|rule| rule.requires).collect()
    }
    /// First target field declared more than once, if any.
    pub(crate) fn duplicate_field(&self) -> Option<&'static str> {
        self.rules.iter().enumerate().find_map(|(i, rule)| {
            self.rules[..i]
                .iter()
                .any(|earlier| earlier.target_field == rule.target_field)
                .then_some(rule.target_field)
        })
    }
}

impl<S, T> fmt::Debug for TypeMapping<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TypeMapping<{}, {}> ", type_label::<S>(), type_label::<T>())?;
        f.debug_list().entries(self.describe()).finish()
    }
}
