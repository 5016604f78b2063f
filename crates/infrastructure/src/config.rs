use config::{Config, ConfigError, Environment, File};
use domain::DeviceRecord;
use serde::{Deserialize, Serialize};

/// Seed entry for the in-memory directory backend.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeviceSeed {
    pub id: String,
    pub owner: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub state_token: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl DeviceSeed {
    pub fn into_record(self) -> DeviceRecord {
        DeviceRecord {
            id: self.id,
            owner: self.owner,
            parent: self.parent,
            state_token: self.state_token,
            enabled: self.enabled,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DirectoryConfig {
    /// "memory" or "postgres"
    pub backend: String,
    /// Required for the postgres backend
    pub database_url: Option<String>,
    /// Seed devices for the memory backend
    #[serde(default)]
    pub devices: Vec<DeviceSeed>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GatewayConfig {
    /// Also used as the exchange origin for loop prevention
    pub gateway_id: String,
    pub directory: DirectoryConfig,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_secs: u64,
}

fn default_queue_capacity() -> usize {
    256
}

fn default_heartbeat_interval() -> u64 {
    30
}

impl GatewayConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            // Start with default settings
            .set_default("gateway_id", "control-gateway")?
            .set_default("directory.backend", "memory")?
            // Base config file - REQUIRED to avoid starting with a missing configuration
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(true))
            // Run-mode overrides, e.g. config/production.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. GATEWAY__DIRECTORY__DATABASE_URL=...)
            .add_source(Environment::with_prefix("GATEWAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_to_record() {
        let seed = DeviceSeed {
            id: "dev-1".to_string(),
            owner: "own-1".to_string(),
            parent: None,
            state_token: Some("v3".to_string()),
            enabled: true,
        };

        let record = seed.into_record();
        assert_eq!(record.id, "dev-1");
        assert_eq!(record.state_token.as_deref(), Some("v3"));
        assert!(record.enabled);
    }

    #[test]
    fn test_seed_defaults() {
        let seed: DeviceSeed = serde_json::from_str(r#"{"id": "dev-2", "owner": "own-2"}"#).unwrap();

        assert!(seed.enabled);
        assert_eq!(seed.parent, None);
        assert_eq!(seed.state_token, None);
    }
}
