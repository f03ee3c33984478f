use crate::prelude::*;

use serde::Deserialize;
use std::time::Duration;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub host: String,
    #[serde(default = "Config::default_port")]
    pub port: u16,
    #[serde(default = "Config::default_unit_id")]
    pub unit_id: u8,
    #[serde(default = "Config::default_read_timeout_ms")]
    pub read_timeout_ms: u64,

    #[serde(default = "Config::default_loglevel")]
    pub loglevel: String,

    /// Optional path to append parsed records to, one JSON object per line
    pub datalog_file: Option<String>,

    #[serde(default = "Config::default_models")]
    pub models: Vec<ModelSelect>,
}

impl Config {
    pub fn new(file: String) -> Result<Self> {
        let content = std::fs::read_to_string(&file)
            .map_err(|err| anyhow!("config.rs:error reading {}: {}", file, err))?;

        Self::from_yaml(&content).with_context(|| format!("config.rs:invalid config in {}", file))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            bail!("host cannot be empty");
        }
        if self.port == 0 {
            bail!("port must be between 1 and 65535");
        }
        if self.read_timeout_ms == 0 {
            bail!("read_timeout_ms must be greater than 0");
        }
        if self.models.is_empty() {
            bail!("models cannot be empty");
        }

        Ok(())
    }

    /// Logs the loaded settings; call once logging is up.
    pub fn log_summary(&self) {
        info!("Configuration loaded successfully:");
        info!("  Host: {}", self.host);
        info!("  Port: {}", self.port);
        info!("  Unit ID: {}", self.unit_id);
        info!("  Read Timeout: {}ms", self.read_timeout_ms);
        info!(
            "  Models: {}",
            self.models
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        info!("  Datalog File: {}", self.datalog_file.as_deref().unwrap_or("disabled"));
        info!("  Log Level: {}", self.loglevel);
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn unit_id(&self) -> u8 {
        self.unit_id
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    pub fn loglevel(&self) -> &str {
        &self.loglevel
    }

    pub fn datalog_file(&self) -> Option<&str> {
        self.datalog_file.as_deref()
    }

    pub fn models(&self) -> &[ModelSelect] {
        &self.models
    }

    fn default_port() -> u16 {
        502
    }

    fn default_unit_id() -> u8 {
        1
    }

    fn default_read_timeout_ms() -> u64 {
        3000
    }

    fn default_loglevel() -> String {
        "info".to_string()
    }

    fn default_models() -> Vec<ModelSelect> {
        vec![ModelSelect::Common, ModelSelect::Inverter]
    }
}
