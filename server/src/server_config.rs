use anyhow::Context;
use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_PORT: u16 = 10000;
const DEFAULT_MAX_RESULTS: u32 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GmailConfig {
    /// Authorized-user OAuth file (`token.json`)
    pub credentials_path: PathBuf,
    #[serde(default)]
    pub mark_as_read: bool,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Extra Gmail search terms, appended to `is:unread`
    #[serde(default)]
    pub query: Option<String>,
}

/// A spreadsheet tab to read from or append to.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SheetTarget {
    pub sheet_id: String,
    pub tab_name: String,
}

impl SheetTarget {
    /// A1 range on this tab, e.g. `RFQ Tracker!A1:Z`.
    pub fn range(&self, cells: &str) -> String {
        format!("{}!{}", self.tab_name, cells)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SheetsConfig {
    /// Service-account key file (`service_account.json`)
    pub credentials_path: PathBuf,
    /// Tracker the dashboard reads statuses from
    pub read: SheetTarget,
    /// Tab new RFQ rows are appended to
    pub write: SheetTarget,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: HttpConfig,
    pub gmail: GmailConfig,
    pub sheets: SheetsConfig,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_results() -> u32 {
    DEFAULT_MAX_RESULTS
}

impl ServerConfig {
    /// `config.toml` layered with `RFQ__SECTION__KEY` environment overrides.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::from(path))
            .add_source(Environment::with_prefix("RFQ").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Loads `$APP_DIR/config.toml`, falling back to the workspace `config/` dir.
    /// Relative credential paths are resolved against the same directory.
    pub fn load() -> anyhow::Result<Self> {
        let root = config_dir()?;
        let path = root.join("config.toml");
        let mut cfg = Self::from_file(&path)
            .with_context(|| format!("Could not load {}", path.display()))?;

        cfg.gmail.credentials_path = root.join(&cfg.gmail.credentials_path);
        cfg.sheets.credentials_path = root.join(&cfg.sheets.credentials_path);

        Ok(cfg)
    }
}

fn config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(dir) = env::var("APP_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let parent = Path::new(manifest_dir)
        .parent()
        .context("Failed to get parent dir")?;
    Ok(parent.join("config"))
}

impl std::fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Server Config:\nPort: {}\n\nGmail: {:?}\n\nRead sheet: {:?}\n\nWrite sheet: {:?}",
            self.server.port, self.gmail, self.sheets.read, self.sheets.write,
        )
    }
}
