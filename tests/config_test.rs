//! Integration tests for Settings loading and merging.
//!
//! These tests use temp directories for the local config only, so they
//! effectively test local config merging over compiled defaults.

use std::fs;

use tempfile::TempDir;

use sptoolbelt::config::{local_config_path, RawSettings, Settings};
use sptoolbelt::domain::DuplicatePathPolicy;

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    // Arrange
    let project = TempDir::new().unwrap();
    let local = r#"
[caml]
default_value_type = "Note"

[taxonomy]
term_store = "/data/terms.json"
duplicate_paths = "last-wins"

[page_context]
web_absolute_url = "https://contoso.sharepoint.com/sites/news"
"#;
    fs::write(local_config_path(project.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(project.path())).expect("load settings");

    // Assert
    assert_eq!(settings.caml.default_value_type, "Note");
    assert_eq!(
        settings.taxonomy.term_store.as_deref(),
        Some(std::path::Path::new("/data/terms.json"))
    );
    assert_eq!(
        settings.taxonomy.duplicate_paths,
        DuplicatePathPolicy::LastWins
    );
    assert_eq!(
        settings.page_context.web_absolute_url.as_deref(),
        Some("https://contoso.sharepoint.com/sites/news")
    );
}

#[test]
fn given_no_local_config_when_load_file_then_defaults_apply() {
    let project = TempDir::new().unwrap();
    let path = project.path().join("empty.toml");
    fs::write(&path, "").unwrap();

    let settings = Settings::load_file(&path).unwrap();

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_invalid_policy_when_load_file_then_errors() {
    let project = TempDir::new().unwrap();
    let path = project.path().join("bad.toml");
    fs::write(&path, "[taxonomy]\nduplicate_paths = \"newest\"\n").unwrap();

    let result = Settings::load_file(&path);

    assert!(result.is_err());
}

#[test]
fn given_tilde_store_path_when_load_file_then_expands_home() {
    let project = TempDir::new().unwrap();
    let path = project.path().join("home.toml");
    fs::write(&path, "[taxonomy]\nterm_store = \"~/terms.json\"\n").unwrap();

    let settings = Settings::load_file(&path).unwrap();

    let store = settings.taxonomy.term_store.unwrap();
    assert!(!store.to_string_lossy().starts_with('~'));
    assert!(store.ends_with("terms.json"));
}

#[test]
fn given_two_overlays_when_merging_then_later_wins_only_where_set() {
    // Arrange
    let global: RawSettings = toml::from_str(
        r#"
[caml]
default_value_type = "Note"
[page_context]
site_absolute_url = "https://a"
"#,
    )
    .unwrap();
    let local: RawSettings = toml::from_str(
        r#"
[page_context]
site_absolute_url = "https://b"
"#,
    )
    .unwrap();

    // Act
    let merged = Settings::default().merge_with(&global).merge_with(&local);

    // Assert
    assert_eq!(merged.caml.default_value_type, "Note");
    assert_eq!(merged.page_context.site_absolute_url.as_deref(), Some("https://b"));
}

#[test]
fn given_settings_when_serializing_then_toml_round_trips_policy() {
    let mut settings = Settings::default();
    settings.taxonomy.duplicate_paths = DuplicatePathPolicy::Reject;

    let text = settings.to_toml().unwrap();

    assert!(text.contains("duplicate_paths = \"reject\""));
    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed, settings);
}
