use sunspec_bridge::prelude::*;
use sunspec_bridge::sunspec::MeterInstance;

use std::time::Duration;

#[test]
fn defaults() {
    let config = Config::from_yaml("host: 192.168.1.50\n").unwrap();

    assert_eq!(config.host(), "192.168.1.50");
    assert_eq!(config.port(), 502);
    assert_eq!(config.unit_id(), 1);
    assert_eq!(config.read_timeout(), Duration::from_millis(3000));
    assert_eq!(config.loglevel(), "info");
    assert_eq!(config.datalog_file(), None);
    assert_eq!(config.models(), &[ModelSelect::Common, ModelSelect::Inverter]);
}

#[test]
fn full_config() {
    let yaml = r#"
host: inverter.local
port: 1502
unit_id: 3
read_timeout_ms: 500
loglevel: debug
datalog_file: /tmp/sunspec.jsonl
models:
  - common
  - inverter
  - meter_common:1
  - meter_data:1
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.port(), 1502);
    assert_eq!(config.unit_id(), 3);
    assert_eq!(config.read_timeout(), Duration::from_millis(500));
    assert_eq!(config.datalog_file(), Some("/tmp/sunspec.jsonl"));
    assert_eq!(
        config.models(),
        &[
            ModelSelect::Common,
            ModelSelect::Inverter,
            ModelSelect::MeterCommon(MeterInstance::Meter1),
            ModelSelect::MeterData(MeterInstance::Meter1),
        ]
    );
}

#[test]
fn host_is_required() {
    assert!(Config::from_yaml("port: 502\n").is_err());
    assert!(Config::from_yaml("host: \"\"\n").is_err());
}

#[test]
fn rejects_zero_port_and_timeout() {
    assert!(Config::from_yaml("host: a\nport: 0\n").is_err());
    assert!(Config::from_yaml("host: a\nread_timeout_ms: 0\n").is_err());
}

#[test]
fn rejects_unknown_and_empty_models() {
    assert!(Config::from_yaml("host: a\nmodels: [battery]\n").is_err());
    assert!(Config::from_yaml("host: a\nmodels: [\"meter_data:7\"]\n").is_err());
    assert!(Config::from_yaml("host: a\nmodels: []\n").is_err());
}

#[test]
fn loads_from_file() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "host: 10.0.0.2\nunit_id: 126\n")?;

    let config = Config::new(path.to_string_lossy().into_owned())?;
    assert_eq!(config.unit_id(), 126);

    Ok(())
}

#[test]
fn missing_file_is_an_error() {
    assert!(Config::new("/nonexistent/sunspec/config.yaml".to_string()).is_err());
}
