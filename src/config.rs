use std::path::{Path, PathBuf};

use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use serde::{Deserialize, Serialize};

const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://localhost:3000"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    database: String,
    media_directory: Option<String>,
    allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        let database = dirs::data_dir()
            .map(|path| path.join("riff-catalog").join("songs.db"))
            .unwrap_or_else(|| PathBuf::from("songs.db"));

        Self {
            database: database.to_string_lossy().to_string(),
            media_directory: None,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|origin| origin.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|path| path.join("riff-catalog").join("config.toml"))
    }

    /// Load the config from the default location, falling back to defaults when it doesn't exist
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                log::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write the default config to the default location, if it doesn't exist yet
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path().ok_or_else(|| eyre!("No config directory available"))?;
        if path.exists() {
            log::info!("Config already exists at: {}", path.display());
            return Ok(path);
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let contents =
            toml::to_string_pretty(&Self::default()).wrap_err("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Expand ~ to home directory
    fn expand_path(&self, path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/")
            && let Some(home) = dirs::home_dir()
        {
            return home.join(rest);
        }
        PathBuf::from(path)
    }

    pub fn database_path(&self) -> PathBuf {
        self.expand_path(&self.database)
    }

    /// Directory that relative local audio paths are resolved against
    pub fn media_directory_path(&self) -> Option<PathBuf> {
        self.media_directory
            .as_deref()
            .map(|path| self.expand_path(path))
    }

    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}
