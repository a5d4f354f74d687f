use std::{env, net::IpAddr, path::Path};

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;

use crate::error::AppResult;

/// Application configuration.
///
/// Contains all configuration settings for the bookshelf service.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Distribution metadata configuration
    pub distribution: DistributionConfig,
    /// Node-specific configuration
    pub node: NodeConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Tracing configuration
    pub tracing: TracingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum DatabaseConfig {
    /// In-memory database storage
    Memory(MemoryDatabaseConfig),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemoryDatabaseConfig {
    /// Populate the store with the sample catalogue on open
    #[serde(default)]
    pub seed: bool,
}

/// Tracing configuration.
///
/// Controls how tracing data is output from the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind")]
pub enum TracingConfig {
    /// No subscriber is installed
    Memory,
    /// Standard output tracing
    Stdout,
}

/// Distribution metadata configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributionConfig {
    /// Distribution name
    pub name: String,
    /// Distribution version
    pub version: Option<String>,
}

/// Node-specific configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    /// Host IP address of the node
    pub host_ip: Option<IpAddr>,
    /// Worker number used for identifier generation
    pub worker_number: u16,
}

const CONFIG_PATH_ENV: &str = "BOOKSHELF_CONFIG_PATH";
const ENV_PREFIX: &str = "BOOKSHELF";
const VERSION: &str = env!("CARGO_PKG_VERSION");

const DISTRIBUTION_VERSION_KEY: &str = "distribution.version";
const NODE_HOST_IP_KEY: &str = "node.host_ip";
const NODE_WORKER_NUMBER_KEY: &str = "node.worker_number";

impl AppConfig {
    /// Loads configuration from files and environment variables.
    ///
    /// Sources, later ones overriding earlier ones: `{dir}/default`,
    /// `{dir}/local`, the file named by `BOOKSHELF_CONFIG_PATH`, and
    /// `BOOKSHELF__*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> AppResult<Self> {
        let config_path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "config".to_string());
        let config_dir = Path::new(&config_path);

        let mut config_builder = Config::builder()
            .add_source(File::from(config_dir.join("default")))
            // Local overrides, not checked in to git
            .add_source(File::from(config_dir.join("local")).required(false));

        if let Ok(override_path) = env::var(CONFIG_PATH_ENV) {
            config_builder =
                config_builder.add_source(File::with_name(&override_path).required(false));
        }

        config_builder =
            config_builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        Self::build(config_builder)
    }

    /// Resolves defaults and derived properties, then deserializes.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources are missing required keys.
    pub fn build(config_builder: ConfigBuilder<DefaultState>) -> AppResult<Self> {
        let config = config_builder
            .set_default(DISTRIBUTION_VERSION_KEY, VERSION)?
            .build()?;

        let mut config_builder = Config::builder().set_default(NODE_WORKER_NUMBER_KEY, 0)?;
        if let Ok(node_host_ip) = config.get::<IpAddr>(NODE_HOST_IP_KEY) {
            config_builder = config_builder
                .set_default(NODE_WORKER_NUMBER_KEY, u64::from(get_worker_number(node_host_ip)))?;
        }

        Ok(config_builder
            .add_source(config)
            .build()?
            .try_deserialize()?)
    }
}

/// Calculates worker number from the last two octets of an IP address.
fn get_worker_number(ip: IpAddr) -> u16 {
    match ip {
        IpAddr::V4(ip) => {
            let octets = ip.octets();
            u16::from_be_bytes([octets[2], octets[3]])
        }
        IpAddr::V6(ip) => {
            let octets = ip.octets();
            u16::from_be_bytes([octets[14], octets[15]])
        }
    }
}
