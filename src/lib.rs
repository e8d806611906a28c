//! Mapvalue – mapping source records onto view models with call-scoped overrides.
//!
//! Most view model fields are copies of source fields. Some are not: they are
//! decided by whoever asks for the mapping, at the moment they ask. Mapvalue
//! separates the two:
//! * A [`rule::TypeMapping`] declares, per `(source, target)` type pair, how each
//!   target field is produced: copied, resolved by a function, or mapped
//!   recursively through another registered pair.
//! * A [`registry::Registry`] holds all type mappings. It is filled through a
//!   [`registry::RegistryBuilder`] at startup and sealed; after that it is read
//!   only and can be shared between threads.
//! * An [`overrides::Overrides`] table carries caller supplied values for one
//!   mapping call. Resolvers receive it as an argument, there is no ambient or
//!   thread local "current context".
//! * The [`engine::Mapper`] runs a mapping, handing the same override table to
//!   every resolver of the call, nested ones and collection elements included.
//!
//! ## Modules
//! * [`error`] – [`error::MapError`] and the crate `Result`.
//! * [`overrides`] – typed override keys and values.
//! * [`rule`] – field rules and the fluent mapping builder.
//! * [`registry`] – registration, sealing and lookup.
//! * [`engine`] – `map`, `map_opt`, `map_many`, cycle and depth guards.
//! * [`settings`] – configuration through the `config` crate.
//! * [`sample`] – the user/role demo domain and a random sample generator.
//! * [`render`] – JSON rendering used by the binary.
//!
//! ## Quick Start
//! ```
//! use std::sync::Arc;
//! use mapvalue::{engine::Mapper, overrides::Overrides, sample::{self, Role, User, UserVm}};
//!
//! let mapper = Mapper::new(Arc::new(sample::registry().unwrap()));
//! let user = User {
//!     name: "kolya".to_string(),
//!     age: 23,
//!     roles: vec![Role { id: 1, name: "xxxx".to_string() }],
//! };
//! let overrides = Overrides::new().shared("Description", "I Nicholas a ne Kolya".to_string());
//! let vm: UserVm = mapper.map(&user, &overrides).unwrap();
//! assert_eq!(vm.description.as_deref(), Some("I Nicholas a ne Kolya"));
//! assert_eq!(vm.roles[0].description.as_deref(), Some("I Nicholas a ne Kolya"));
//! ```
//!
//! ## Overrides
//! Keys are either qualified by the target type (`FieldKey::of::<UserVm>("Description")`)
//! or shared across types (`FieldKey::shared("Description")`). A resolver working
//! for `UserVm` sees the qualified value if there is one and the shared one
//! otherwise.
//!
//! ## Errors
//! Registration fails on duplicates, mapping fails on unregistered pairs,
//! failing resolvers, cyclic sources and overly deep nesting. Errors abort the
//! whole call; no partially built target is ever returned.
//!
//! ## License
//! Dual licensed under Apache-2.0 and MIT.

pub mod engine;
pub mod error;
pub mod overrides;
pub mod registry;
pub mod render;
pub mod rule;
pub mod sample;
pub mod settings;
