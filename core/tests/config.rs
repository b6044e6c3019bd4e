//! Loading configuration from disk.

use kiosk_core::{config::GeneratorConfig, error::SimError};

#[test]
fn loads_partial_json_over_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kiosks.json");
    std::fs::write(&path, r#"{ "kiosk_count": 4, "pass_rate": 0.9, "num_days": 14 }"#).unwrap();

    let cfg = GeneratorConfig::load(&path).unwrap();
    assert_eq!(cfg.kiosk_count, 4);
    assert_eq!(cfg.num_days, 14);
    assert_eq!(cfg.pass_rate, 0.9);
    assert_eq!(cfg.max_volume_ml, GeneratorConfig::default().max_volume_ml);
}

#[test]
fn rejects_invalid_values_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "min_volume_ml": 700, "max_volume_ml": 600 }"#).unwrap();
    assert!(matches!(GeneratorConfig::load(&path), Err(SimError::InvalidConfig(_))));
}

#[test]
fn missing_file_reports_its_path() {
    let err = GeneratorConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
}
