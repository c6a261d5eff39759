//! Configuration for gist.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (GIST_HOME, GIST_API_URL, GIST_EXPORT_DIR)
//! 2. Config file (.gist/config.yaml)
//! 3. Defaults (~/.gist, no API URL, exports to the current directory)
//!
//! Config file discovery:
//! - Searches current directory and parents for .gist/config.yaml
//! - Paths in config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Storage key of the single content slot
pub const DEFAULT_STORAGE_KEY: &str = "extracted-content";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the summarization API (`/extract` is appended)
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .gist/)
    pub home: Option<String>,
    /// Export directory (relative to the project root)
    pub exports: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    /// Name of the storage slot
    pub key: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to gist home (storage slot lives here)
    pub home: PathBuf,
    /// Storage slot key
    pub storage_key: String,
    /// Summarization API base URL, if configured
    pub api_url: Option<String>,
    /// Where export files are written
    pub export_dir: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

impl ResolvedConfig {
    /// Path of the JSON file backing the storage slot
    pub fn storage_path(&self) -> PathBuf {
        self.home.join(format!("{}.json", self.storage_key))
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".gist").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Merge a parsed config file (if any) with environment overrides
fn resolve(config_path: Option<&Path>, file: Option<ConfigFile>) -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".gist");
    let file = file.unwrap_or(ConfigFile {
        version: "1.0".to_string(),
        api: ApiConfig::default(),
        paths: PathsConfig::default(),
        storage: StorageConfig::default(),
    });

    // .gist/ and the project root above it
    let gist_dir = config_path
        .and_then(Path::parent)
        .unwrap_or(Path::new("."));
    let base_dir = gist_dir.parent().unwrap_or(Path::new("."));

    let home = if let Some(env_home) = env_var("GIST_HOME") {
        PathBuf::from(env_home)
    } else if let (Some(home_path), Some(_)) = (&file.paths.home, config_path) {
        resolve_path(gist_dir, home_path)
    } else {
        default_home
    };

    let export_dir = if let Some(env_dir) = env_var("GIST_EXPORT_DIR") {
        PathBuf::from(env_dir)
    } else if let (Some(dir), Some(_)) = (&file.paths.exports, config_path) {
        resolve_path(base_dir, dir)
    } else {
        PathBuf::from(".")
    };

    let api_url = env_var("GIST_API_URL").or(file.api.base_url);

    let storage_key = file
        .storage
        .key
        .filter(|k| !k.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string());

    Ok(ResolvedConfig {
        home,
        storage_key,
        api_url,
        export_dir,
        config_file: config_path.map(Path::to_path_buf),
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let config_file = find_config_file();

    let parsed = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    resolve(config_file.as_deref(), parsed)
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the storage slot path ($GIST_HOME/<key>.json)
pub fn storage_path() -> Result<PathBuf> {
    Ok(config()?.storage_path())
}
