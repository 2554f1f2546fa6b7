use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use config_crate::{Config as RawConfig, ConfigError, Environment, File};

enum Env {
    Development,
    Test,
    Production,
}

impl Env {
    fn new() -> Self {
        match env::var("RUN_MODE") {
            Ok(ref s) if s == "test" => Env::Test,
            Ok(ref s) if s == "production" => Env::Production,
            _ => Env::Development,
        }
    }

    fn to_string(&self) -> &'static str {
        match self {
            &Env::Development => "development",
            &Env::Production => "production",
            &Env::Test => "test",
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub listen: SocketAddr,
    pub thread_count: usize,
    pub database: Database,
    pub storage: Storage,
    #[serde(default)]
    pub dashboard: Dashboard,
}

/// SQLite settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Database {
    pub path: String,
    pub busy_timeout_ms: u64,
}

/// Where uploaded media lands on disk and under which url prefix it is served
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Storage {
    pub uploads_dir: String,
    pub public_prefix: String,
    /// Upload request bodies above this size are refused with 413
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dashboard {
    pub recent_limit: u32,
}

impl Default for Dashboard {
    fn default() -> Self {
        Dashboard { recent_limit: 5 }
    }
}

impl Config {
    /// Creates config from base.toml, which are overwritten by <env>.toml, where
    /// env is one of development, test, production. After that it could be overwritten
    /// by environment variables like ATL_DATABASE__PATH (this will override `database.path` field in config)
    pub fn new() -> Result<Self, ConfigError> {
        let env = Env::new();
        let mut s = RawConfig::new();

        s.merge(File::with_name("config/base"))?;
        // Optional file specific for environment
        s.merge(File::with_name(&format!("config/{}", env.to_string())).required(false))?;

        // Add in settings from the environment (with a prefix of ATL)
        s.merge(Environment::with_prefix("ATL").separator("__"))?;

        s.try_into()
    }

    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.database.path)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.database.busy_timeout_ms)
    }
}
