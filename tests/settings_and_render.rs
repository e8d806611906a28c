use mapvalue::error::MapError;
use mapvalue::render::{render_all, separator, to_json};
use mapvalue::sample::{RoleVm, UserVm};
use mapvalue::settings::Settings;

#[test]
fn defaults_without_config_file() {
    let settings = Settings::default();
    assert_eq!(settings.max_depth, 64);
    assert_eq!(settings.sample.users, 2);
    assert_eq!(settings.sample.roles_per_user, 1);
    assert_eq!(settings.sample.seed, None);
    assert_eq!(settings.description, "I Nicholas a ne Kolya");
}

#[test]
fn explicit_config_file_is_layered_over_defaults() {
    let path = std::env::temp_dir().join("mapvalue_settings_test.toml");
    std::fs::write(&path, "max_depth = 8\n\n[sample]\nusers = 5\nseed = 99\n").unwrap();
    let settings = Settings::load(path.to_str()).expect("settings");
    assert_eq!(settings.max_depth, 8);
    assert_eq!(settings.sample.users, 5);
    assert_eq!(settings.sample.seed, Some(99));
    // untouched keys keep their defaults
    assert_eq!(settings.sample.roles_per_user, 1);
    assert_eq!(settings.collection_description, "Common description for user and roles");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_explicit_config_file_is_an_error() {
    let err = Settings::load(Some("definitely/not/here/mapvalue.toml")).unwrap_err();
    assert!(matches!(err, MapError::Config(_)));
}

fn vm() -> UserVm {
    UserVm {
        name: "kolya".to_string(),
        age: 23,
        description: None,
        roles: vec![RoleVm { name: "xxxx".to_string(), id: 1, description: Some("d".to_string()) }],
    }
}

#[test]
fn json_uses_view_model_field_names() {
    let json = to_json(&vm()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["Name"], "kolya");
    assert_eq!(value["Age"], 23);
    assert!(value["Description"].is_null());
    assert_eq!(value["Roles"][0]["Id"], 1);
    assert_eq!(value["Roles"][0]["Description"], "d");
}

#[test]
fn render_indexes_only_multiple_values() {
    let single = render_all(&[vm()]).unwrap();
    assert!(!single.contains("Index:"));
    let many = render_all(&[vm(), vm()]).unwrap();
    assert!(many.starts_with("Index: 1\n"));
    assert!(many.contains("Index: 2\n"));
    assert_eq!(separator().len(), 100);
}
