//! Config loading, parse-error reporting and startup validation.

use assert_fs::prelude::*;
use dropindex_core::{
    config::{self, ManifestSettings, NotifierSettings, Settings},
    ConfigError, HierarchyShape,
};
use predicates::prelude::*;
use rstest::rstest;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// 1. Load
// ---------------------------------------------------------------------------

#[test]
fn load_missing_config_returns_not_found() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let err = config::load_at(&dir.path().join("config.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("config.yaml"));
}

#[test]
fn load_full_config() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str(
        r#"
read_timeout_secs: 5
manifests:
  - root: /srv/HOSPITAL
    shape: nested
  - root: /srv/CER
    urgent_marker: URGENT
    shape: flat
    interval_secs: 30
    output: /var/www/cer.html
    title: CER Audio Files
notifiers:
  - watch_folder: /srv/notif
    alert_command: ["zenity", "--warning", "--text"]
"#,
    )
    .expect("write config");

    let settings = config::load_at(file.path()).expect("load");
    assert_eq!(settings.read_timeout_secs, 5);
    assert_eq!(settings.manifests.len(), 2);

    let hospital = &settings.manifests[0];
    assert_eq!(hospital.urgent_marker.as_str(), "URGENTE");
    assert_eq!(hospital.shape, HierarchyShape::Nested);
    assert_eq!(hospital.output_path(), PathBuf::from("/srv/HOSPITAL/index.html"));
    assert_eq!(hospital.category_label, "Exam Type");

    let cer = &settings.manifests[1];
    assert_eq!(cer.urgent_marker.as_str(), "URGENT");
    assert_eq!(cer.shape, HierarchyShape::Flat);
    assert_eq!(cer.output_path(), PathBuf::from("/var/www/cer.html"));
    assert_eq!(cer.refresh_secs(), 30);
    assert_eq!(cer.title, "CER Audio Files");

    let notifier = &settings.notifiers[0];
    assert_eq!(notifier.interval_secs, 15);
    assert_eq!(
        notifier.alert_command.as_deref(),
        Some(&["zenity".to_string(), "--warning".to_string(), "--text".to_string()][..])
    );
}

#[test]
fn load_corrupt_yaml_returns_parse_error_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str("manifests: [ {root: ").expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
    assert!(predicate::str::contains("config.yaml").eval(&err.to_string()));
}

#[test]
fn unknown_keys_are_rejected() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let file = dir.child("config.yaml");
    file.write_str("manifests:\n  - root: /srv\n    urgent_folder: URGENTE\n")
        .expect("write");

    let err = config::load_at(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Validate
// ---------------------------------------------------------------------------

#[test]
fn validate_accepts_existing_directories() {
    let root = assert_fs::TempDir::new().expect("root");
    let notif = assert_fs::TempDir::new().expect("notif");
    let settings = Settings {
        manifests: vec![ManifestSettings::new(root.path())],
        notifiers: vec![NotifierSettings::new(notif.path())],
        ..Settings::default()
    };
    settings.validate().expect("valid settings");
}

#[test]
fn validate_rejects_missing_root() {
    let root = assert_fs::TempDir::new().expect("root");
    let settings = Settings {
        manifests: vec![ManifestSettings::new(root.path().join("missing"))],
        ..Settings::default()
    };
    let err = settings.validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }), "got: {err}");
    assert!(err.to_string().contains("missing"));
}

#[test]
fn validate_rejects_root_that_is_a_file() {
    let root = assert_fs::TempDir::new().expect("root");
    let file = root.child("not-a-dir");
    file.touch().expect("touch");
    let err = ManifestSettings::new(file.path()).validate().unwrap_err();
    assert!(matches!(err, ConfigError::NotADirectory { .. }), "got: {err}");
}

#[rstest]
#[case("")]
#[case("   ")]
fn validate_rejects_blank_marker(#[case] marker: &str) {
    let root = assert_fs::TempDir::new().expect("root");
    let mut manifest = ManifestSettings::new(root.path());
    manifest.urgent_marker = marker.into();
    let err = manifest.validate().unwrap_err();
    assert!(matches!(err, ConfigError::BlankMarker { .. }), "got: {err}");
}

#[test]
fn validate_rejects_zero_intervals() {
    let root = assert_fs::TempDir::new().expect("root");
    let mut manifest = ManifestSettings::new(root.path());
    manifest.interval_secs = 0;
    assert!(matches!(
        manifest.validate().unwrap_err(),
        ConfigError::ZeroInterval { .. }
    ));

    let mut notifier = NotifierSettings::new(root.path());
    notifier.interval_secs = 0;
    assert!(matches!(
        notifier.validate().unwrap_err(),
        ConfigError::ZeroInterval { .. }
    ));
}

#[test]
fn settings_roundtrip_through_yaml() {
    let settings = Settings {
        manifests: vec![ManifestSettings::new("/srv/HOSPITAL")],
        notifiers: vec![NotifierSettings::new("/srv/notif")],
        ..Settings::default()
    };
    let yaml = serde_yaml::to_string(&settings).expect("serialize");
    let back: Settings = serde_yaml::from_str(&yaml).expect("deserialize");
    assert_eq!(settings, back);
}
