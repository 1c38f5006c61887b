use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::Parser;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Anything a binary passes to `run_server_with_config` must implement
/// this: a human-readable name (used in logs) and the actual run loop.
#[async_trait]
pub trait RunnableConfig: DeserializeOwned + Send + Sync + 'static {
    fn get_server_name(&self) -> String;

    async fn run(&self) -> Result<()>;
}

/// Wraps a binary-specific config with the two fields every BOOMS
/// server needs regardless of its domain logic.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: RunnableConfig")]
pub struct GenericConfig<T: RunnableConfig> {
    #[serde(default = "default_health_check_port")]
    pub health_check_port: u16,
    pub server_config: T,
}

fn default_health_check_port() -> u16 {
    8080
}

impl<T: RunnableConfig> GenericConfig<T> {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&raw)
            .with_context(|| format!("failed to parse config file at {}", path.display()))?;
        Ok(config)
    }
}

#[derive(Debug, Parser)]
pub struct ServerArgs {
    #[clap(long, value_parser)]
    pub config_path: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct NoopConfig {
        name: String,
    }

    #[async_trait]
    impl RunnableConfig for NoopConfig {
        fn get_server_name(&self) -> String {
            self.name.clone()
        }

        async fn run(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn loads_health_check_port_default_when_omitted() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "server_config:\n  name: sweeper\n").unwrap();
        let config: GenericConfig<NoopConfig> = GenericConfig::load(file.path()).unwrap();
        assert_eq!(config.health_check_port, 8080);
        assert_eq!(config.server_config.name, "sweeper");
    }

    #[test]
    fn loads_explicit_health_check_port() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "health_check_port: 9100\nserver_config:\n  name: api\n").unwrap();
        let config: GenericConfig<NoopConfig> = GenericConfig::load(file.path()).unwrap();
        assert_eq!(config.health_check_port, 9100);
    }
}
