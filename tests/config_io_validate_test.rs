use alfen_bridge::config::Config;
use std::fs;

#[test]
fn save_and_load_yaml_roundtrip() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let path = tmp_dir.path().join("config.yaml");

    let mut cfg = Config::default();
    cfg.charger.host = "10.0.0.5".to_string();
    cfg.charger.socket = 2;
    cfg.logging.file = path.with_extension("log").to_string_lossy().to_string();

    cfg.save_to_file(&path).unwrap();
    let loaded = Config::from_file(&path).unwrap();

    assert_eq!(loaded.charger.host, "10.0.0.5");
    assert_eq!(loaded.charger.socket, 2);
    assert_eq!(loaded.logging.file, cfg.logging.file);
    assert!(loaded.validate().is_ok());
}

#[test]
fn config_validation_errors() {
    let mut cfg = Config::default();

    cfg.charger.host.clear();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.charger.username = "  ".to_string();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.charger.scheme = "ftp".to_string();
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.charger.socket = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.poll_interval_secs = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.http.request_timeout_ms = 0;
    assert!(cfg.validate().is_err());

    cfg = Config::default();
    cfg.http.pool_idle_timeout_ms = 0;
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("pool_idle_timeout_ms"));
}

#[test]
fn from_file_with_invalid_yaml_fails() {
    let tmp = tempfile::NamedTempFile::new().unwrap();
    fs::write(tmp.path(), b"charger: [unclosed").unwrap();
    let err = Config::from_file(tmp.path()).unwrap_err();
    let msg = format!("{}", err);
    assert!(msg.contains("Serialization error"));
}

#[test]
fn missing_file_is_an_io_error() {
    let tmp_dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(tmp_dir.path().join("absent.yaml")).unwrap_err();
    assert!(format!("{}", err).contains("I/O error"));
}
