//! The sample domain: users with roles, and the view models they are shown as.
//!
//! Both view models expose a `Description` that no source field feeds. It is
//! filled from the override set of the mapping call, so one value supplied under
//! [`FieldKey::shared`](crate::overrides::FieldKey::shared) lands on the user
//! and on every one of its roles.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::error::Result;
use crate::registry::{Registry, RegistryBuilder};
use crate::rule::TypeMapping;
use crate::settings::SampleSettings;

pub const DESCRIPTION: &str = "Description";

// ------------- Domain models -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub name: String,
    pub age: i32,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Role {
    pub id: i32,
    pub name: String,
}

// ------------- View models -------------
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserVm {
    pub name: String,
    pub age: i32,
    pub description: Option<String>,
    pub roles: Vec<RoleVm>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoleVm {
    pub name: String,
    pub id: i32,
    pub description: Option<String>,
}

/// Installs `User -> UserVm` and `Role -> RoleVm`.
pub fn register(builder: &mut RegistryBuilder) -> Result<()> {
    builder.register(
        TypeMapping::<User, UserVm>::new()
            .copy("Age", |user| &user.age, |vm| &mut vm.age)
            .copy("Name", |user| &user.name, |vm| &mut vm.name)
            .nested_many("Roles", |user| user.roles.as_slice(), |vm| &mut vm.roles)
            .resolve_override(DESCRIPTION, |vm| &mut vm.description),
    )?;
    builder.register(
        TypeMapping::<Role, RoleVm>::new()
            .copy("Id", |role| &role.id, |vm| &mut vm.id)
            .copy("Name", |role| &role.name, |vm| &mut vm.name)
            .resolve_override(DESCRIPTION, |vm| &mut vm.description),
    )?;
    Ok(())
}

/// A sealed registry holding only the sample domain.
pub fn registry() -> Result<Registry> {
    let mut builder = Registry::builder();
    register(&mut builder)?;
    builder.seal()
}

// ------------- Sample data -------------
/// Fabricates users with lowercase random names.
pub struct SampleGenerator {
    rng: StdRng,
    roles_per_user: usize,
}

impl SampleGenerator {
    pub fn new(seed: Option<u64>, roles_per_user: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, roles_per_user }
    }
    pub fn from_settings(settings: &SampleSettings) -> Self {
        Self::new(settings.seed, settings.roles_per_user)
    }
    pub fn user(&mut self) -> User {
        let name = self.word(8);
        let age = self.rng.gen_range(18..99);
        let roles = role_ids(self.roles_per_user)
            .map(|id| Role {
                id,
                name: self.word(4),
            })
            .collect();
        User { name, age, roles }
    }
    pub fn users(&mut self, count: usize) -> Vec<User> {
        (0..count).map(|_| self.user()).collect()
    }
    fn word(&mut self, len: usize) -> String {
        (0..len).map(|_| char::from(b'a' + self.rng.gen_range(0..26u8))).collect()
    }
}

// 1-based ids, stopping at i32::MAX instead of wrapping.
fn role_ids(count: usize) -> impl Iterator<Item = i32> {
    (1..=count).map_while(|n| i32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_ids_start_at_one() {
        assert_eq!(role_ids(3).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(role_ids(0).count(), 0);
    }

    #[test]
    fn huge_role_count_does_not_wrap() {
        let ids: Vec<i32> = role_ids(usize::MAX).take(2).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
