//! The mapping engine.
//!
//! [`Mapper`] runs registered [`TypeMapping`](crate::rule::TypeMapping)s. Every
//! public call creates one [`MapContext`] that borrows the caller's
//! [`Overrides`] and is handed down to every rule, nested mappings included, so
//! a single override value reaches the whole produced graph. The context lives
//! on the stack of the call and is dropped when it returns.
//!
//! Cyclic source graphs (only reachable through shared pointers such as `Arc`)
//! are rejected: the context remembers which `(source address, source type,
//! target type)` frames are currently being mapped and fails with
//! [`MapError::CycleDetected`] when one comes around again. Nesting deeper than
//! the configured limit fails with [`MapError::DepthExceeded`].

use std::any::TypeId;
use std::sync::Arc;

use tracing::{trace, warn};

use crate::error::{MapError, Result};
use crate::overrides::Overrides;
use crate::registry::{type_label, Registry};
use crate::settings::Settings;

pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, PartialEq, Eq)]
struct Frame {
    address: usize,
    source: TypeId,
    target: TypeId,
}

/// State of one mapping call.
pub struct MapContext<'a> {
    registry: &'a Registry,
    overrides: &'a Overrides,
    max_depth: usize,
    stack: Vec<Frame>,
}

impl<'a> MapContext<'a> {
    fn new(registry: &'a Registry, overrides: &'a Overrides, max_depth: usize) -> Self {
        Self {
            registry,
            overrides,
            max_depth,
            stack: Vec::new(),
        }
    }
    /// The override set of the running call.
    pub fn overrides(&self) -> &'a Overrides {
        self.overrides
    }
    /// Maps `source` through the registered `S -> T` mapping within this call.
    pub fn map_value<S: 'static, T: Default + 'static>(&mut self, source: &S) -> Result<T> {
        let registry: &'a Registry = self.registry;
        let mapping = registry.lookup::<S, T>()?;
        let frame = Frame {
            address: source as *const S as usize,
            source: TypeId::of::<S>(),
            target: TypeId::of::<T>(),
        };
        if self.stack.contains(&frame) {
            warn!(source_type = type_label::<S>(), target_type = type_label::<T>(), "cyclic source graph");
            return Err(MapError::CycleDetected {
                source_type: type_label::<S>(),
                target: type_label::<T>(),
            });
        }
        if self.stack.len() >= self.max_depth {
            warn!(limit = self.max_depth, "mapping nested too deep");
            return Err(MapError::DepthExceeded { limit: self.max_depth });
        }
        self.stack.push(frame);
        let built = mapping.build(source, self);
        self.stack.pop();
        built
    }
}

#[derive(Debug, Clone)]
pub struct Mapper {
    registry: Arc<Registry>,
    max_depth: usize,
}

impl Mapper {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
    pub fn from_settings(registry: Arc<Registry>, settings: &Settings) -> Self {
        Self::new(registry).with_max_depth(settings.max_depth)
    }
    /// A limit of 0 is raised to 1 so that top level calls still run.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    fn context<'a>(&'a self, overrides: &'a Overrides) -> MapContext<'a> {
        MapContext::new(&self.registry, overrides, self.max_depth)
    }

    /// Builds a new `T` from `source`. Every resolver reached by this call sees
    /// `overrides`. On error nothing is returned, partial targets are dropped.
    pub fn map<S: 'static, T: Default + 'static>(&self, source: &S, overrides: &Overrides) -> Result<T> {
        trace!(
            source_type = type_label::<S>(),
            target_type = type_label::<T>(),
            overrides = overrides.len(),
            "map"
        );
        self.context(overrides).map_value(source)
    }

    /// Mapping nothing produces nothing.
    pub fn map_opt<S: 'static, T: Default + 'static>(
        &self,
        source: Option<&S>,
        overrides: &Overrides,
    ) -> Result<Option<T>> {
        source.map(|source| self.map(source, overrides)).transpose()
    }

    /// Maps every element in order with one shared override set. Fails for an
    /// unregistered pair even when `sources` is empty.
    pub fn map_many<S: 'static, T: Default + 'static>(&self, sources: &[S], overrides: &Overrides) -> Result<Vec<T>> {
        self.registry.lookup::<S, T>()?;
        trace!(
            source_type = type_label::<S>(),
            target_type = type_label::<T>(),
            count = sources.len(),
            overrides = overrides.len(),
            "map many"
        );
        let mut ctx = self.context(overrides);
        sources.iter().map(|source| ctx.map_value(source)).collect()
    }
}
