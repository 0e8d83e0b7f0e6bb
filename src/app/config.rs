use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::constants::{APP_NAME, DEFAULT_API_BASE_URL, ENV_PREFIX, LOCAL_CONFIG_PATH, SESSION_FILE_NAME};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub api: ApiConfig,

    /// Where the session token is kept
    #[serde(default)]
    pub session: SessionConfig,

    /// Terminal output
    #[serde(default)]
    pub output: OutputConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to
    pub base_url: String,
    /// Whole-request timeout handed to the HTTP client; none by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session file override (defaults to the platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format when `--output` is not given
    pub format: OutputFormat,
    /// Colorize text output
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// Load configuration from multiple sources.
///
/// Later sources win: defaults, the global `config.toml`, the project-local
/// `.blogdesk/config.toml` (or `explicit` when given), then `BLOGDESK_*`
/// environment variables (`BLOGDESK_API__BASE_URL` and so on).
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if let Some(path) = explicit {
        if !path.exists() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        figment = figment.merge(Toml::file(path));
    } else {
        let global_config = get_config_dir()?.join("config.toml");
        if global_config.exists() {
            figment = figment.merge(Toml::file(&global_config));
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_PATH);
        if local_config.exists() {
            figment = figment.merge(Toml::file(&local_config));
        }
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    figment.extract().context("Failed to load configuration")
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APP_NAME)
}

fn home_fallback(kind: &str) -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(kind).join(APP_NAME))
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = match project_dirs() {
        Some(dirs) => dirs.config_dir().to_path_buf(),
        None => home_fallback(".config")?,
    };
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Get the data directory the session file lives in
pub fn get_data_dir() -> Result<PathBuf> {
    match project_dirs() {
        Some(dirs) => Ok(dirs.data_dir().to_path_buf()),
        None => home_fallback(".local/share"),
    }
}

/// Resolve where the session token is persisted
pub fn session_path(config: &Config) -> Result<PathBuf> {
    match &config.session.storage_path {
        Some(path) => Ok(path.clone()),
        None => Ok(get_data_dir()?.join(SESSION_FILE_NAME)),
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist.
///
/// Returns the path and whether a new file was written.
pub fn init_config() -> Result<(PathBuf, bool)> {
    let config_file = get_config_dir()?.join("config.toml");

    if config_file.exists() {
        return Ok((config_file, false));
    }

    save_config(&Config::default(), Some(config_file.clone()))?;
    Ok((config_file, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.output.format, OutputFormat::Text);
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[api]
base_url = "https://blog.example.com"
timeout_secs = 15

[output]
format = "json"
color = false
"#,
        )
        .unwrap();

        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.api.base_url, "https://blog.example.com");
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.output.color);
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load_config(Some(temp_dir.path().join("nope.toml").as_path())).is_err());
    }

    #[test]
    fn test_saved_config_loads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        let mut config = Config::default();
        config.session.storage_path = Some(temp_dir.path().join("token.json"));

        save_config(&config, Some(path.clone())).unwrap();
        assert_eq!(load_config(Some(path.as_path())).unwrap().session, config.session);
    }

    #[test]
    fn test_session_path_override() {
        let mut config = Config::default();
        config.session.storage_path = Some(PathBuf::from("/tmp/blogdesk-session.json"));
        assert_eq!(
            session_path(&config).unwrap(),
            PathBuf::from("/tmp/blogdesk-session.json")
        );
    }
}
