use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    /// Serve from an in-memory record store when the database is unavailable
    #[serde(default)]
    pub offline: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_public_prefix")]
    pub public_prefix: String,
}

/// External form-processing endpoint used by the relay transport
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RelayConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

// Default values
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_db_url() -> String {
    "sqlite:data/regdesk.db?mode=rwc".to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_upload_dir() -> String {
    "data/uploads".to_string()
}

fn default_public_prefix() -> String {
    "/uploads".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
            max_connections: default_max_connections(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            public_prefix: default_public_prefix(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            storage: StorageConfig::default(),
            relay: RelayConfig::default(),
            offline: false,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Touches nothing on disk; the server calls `ensure_directories` itself.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from regdesk.toml or config.toml
    fn load_from_file() -> anyhow::Result<Self> {
        let config_paths = ["regdesk.toml", "config.toml", "data/regdesk.toml"];

        for path in config_paths {
            if Path::new(path).exists() {
                let content = fs::read_to_string(path)?;
                let config: Config = toml::from_str(&content)?;
                tracing::info!("Loaded configuration from {}", path);
                return Ok(config);
            }
        }

        tracing::info!("No configuration file found, using defaults");
        Ok(Config::default())
    }

    /// Apply environment variable overrides
    /// Format: RD_CONF_<SECTION>_<KEY>
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("RD_CONF_SERVER_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = env::var("RD_CONF_SERVER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = env::var("RD_CONF_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = env::var("RD_CONF_DATABASE_MAX_CONNECTIONS") {
            if let Ok(n) = val.parse() {
                self.database.max_connections = n;
            }
        }

        if let Ok(val) = env::var("RD_CONF_STORAGE_UPLOAD_DIR") {
            self.storage.upload_dir = val;
        }
        if let Ok(val) = env::var("RD_CONF_STORAGE_PUBLIC_PREFIX") {
            self.storage.public_prefix = val;
        }

        if let Ok(val) = env::var("RD_CONF_RELAY_URL") {
            if !val.trim().is_empty() {
                self.relay.url = Some(val);
            }
        }
        if let Ok(val) = env::var("RD_CONF_RELAY_TOKEN") {
            if !val.trim().is_empty() {
                self.relay.token = Some(val);
            }
        }

        if let Ok(val) = env::var("RD_CONF_OFFLINE") {
            if let Ok(v) = val.parse() {
                self.offline = v;
            }
        }
    }

    /// Reject configurations the server cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be non-zero");
        }
        if self.database.url.trim().is_empty() {
            anyhow::bail!("database.url must be set");
        }
        if self.database.max_connections == 0 {
            anyhow::bail!("database.max_connections must be at least 1");
        }
        if self.storage.upload_dir.trim().is_empty() {
            anyhow::bail!("storage.upload_dir must be set");
        }
        let prefix = &self.storage.public_prefix;
        if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.len() < 2 {
            anyhow::bail!(
                "storage.public_prefix must look like \"/uploads\", got {:?}",
                prefix
            );
        }
        if let Some(url) = &self.relay.url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                anyhow::bail!("relay.url must be an http(s) URL, got {:?}", url);
            }
            if self.relay.token.as_deref().map_or(true, |t| t.trim().is_empty()) {
                anyhow::bail!("relay.token must be set when relay.url is configured");
            }
        }
        Ok(())
    }

    /// Create the database parent directory and the uploads directory
    pub fn ensure_directories(&self) -> anyhow::Result<()> {
        if let Some(path) = sqlite_file_path(&self.database.url) {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        fs::create_dir_all(&self.storage.upload_dir)?;

        Ok(())
    }
}

/// Filesystem path of a `sqlite:` URL, if it names a file
fn sqlite_file_path(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}
