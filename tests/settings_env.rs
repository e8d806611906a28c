// Kept in its own test binary: it changes process environment variables that
// the file layering tests in settings_and_render.rs would otherwise observe.
use mapvalue::settings::Settings;

#[test]
fn environment_variables_override_defaults() {
    unsafe {
        std::env::set_var("MAPVALUE_MAX_DEPTH", "7");
        std::env::set_var("MAPVALUE_SAMPLE__USERS", "9");
    }
    let settings = Settings::load(None);
    unsafe {
        std::env::remove_var("MAPVALUE_MAX_DEPTH");
        std::env::remove_var("MAPVALUE_SAMPLE__USERS");
    }
    let settings = settings.expect("settings");
    assert_eq!(settings.max_depth, 7);
    assert_eq!(settings.sample.users, 9);
    assert_eq!(settings.sample.roles_per_user, 1);
}
