use std::error::Error;
use std::sync::Arc;

use mapvalue::engine::Mapper;
use mapvalue::error::MapError;
use mapvalue::overrides::Overrides;
use mapvalue::registry::Registry;
use mapvalue::rule::TypeMapping;
use mapvalue::sample::{Role, User, DESCRIPTION};

#[derive(Debug, Default, PartialEq)]
struct Card {
    name: String,
    description: Option<String>,
    perms: Vec<Perm>,
}

#[derive(Debug, Default, PartialEq)]
struct Perm {
    id: i32,
    level: u8,
}

fn setup() -> Mapper {
    let mut builder = Registry::builder();
    builder
        .register(
            TypeMapping::<User, Card>::new()
                .copy("name", |u| &u.name, |c| &mut c.name)
                .resolve_override(DESCRIPTION, |c| &mut c.description)
                .nested_many("perms", |u| u.roles.as_slice(), |c| &mut c.perms),
        )
        .unwrap();
    builder
        .register(
            TypeMapping::<Role, Perm>::new()
                .copy("id", |r| &r.id, |p| &mut p.id)
                .resolve(
                    "level",
                    |r, overrides| {
                        let max = overrides.lookup::<Perm, u8>("level")?.copied().unwrap_or(u8::MAX);
                        let level: u8 = r.name.len().try_into()?;
                        if level > max {
                            return Err(format!("role {} exceeds level {max}", r.id).into());
                        }
                        Ok(level)
                    },
                    |p| &mut p.level,
                ),
        )
        .unwrap();
    Mapper::new(Arc::new(builder.seal().unwrap()))
}

fn user(role_names: &[&str]) -> User {
    User {
        name: "nick".to_string(),
        age: 31,
        roles: role_names
            .iter()
            .enumerate()
            .map(|(i, name)| Role { id: i as i32 + 1, name: name.to_string() })
            .collect(),
    }
}

#[test]
fn resolver_reads_typed_override() {
    let mapper = setup();
    let overrides = Overrides::new().qualified::<Perm, _>("level", 5u8);
    let card: Card = mapper.map(&user(&["ab", "abcde"]), &overrides).unwrap();
    let levels: Vec<u8> = card.perms.iter().map(|p| p.level).collect();
    assert_eq!(levels, vec![2, 5]);
}

#[test]
fn nested_failure_aborts_whole_call() {
    let mapper = setup();
    let overrides = Overrides::new().qualified::<Perm, _>("level", 3u8);
    let err = mapper.map::<User, Card>(&user(&["ab", "abcdef", "a"]), &overrides).unwrap_err();
    match err {
        MapError::FieldResolution { ref field, ref cause } => {
            assert_eq!(field, "Perm.level");
            assert_eq!(cause.to_string(), "role 2 exceeds level 3");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.source().is_some());
}

#[test]
fn override_of_wrong_type_is_a_resolution_error() {
    let mapper = setup();
    let overrides = Overrides::new().shared(DESCRIPTION, 17i64);
    let err = mapper.map::<User, Card>(&user(&["ab"]), &overrides).unwrap_err();
    match err {
        MapError::FieldResolution { field, cause } => {
            assert_eq!(field, "Card.Description");
            assert!(cause.to_string().contains("*.Description"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn map_many_fails_as_a_whole() {
    let mapper = setup();
    let overrides = Overrides::new().qualified::<Perm, _>("level", 2u8);
    let users = vec![user(&["ab"]), user(&["abc"])];
    let result = mapper.map_many::<User, Card>(&users, &overrides);
    assert!(matches!(result, Err(MapError::FieldResolution { .. })));
}
