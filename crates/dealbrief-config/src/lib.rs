use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "dealbrief";
const CONFIG_FILENAME: &str = "config.toml";

/// Default service domain for minted routing addresses
/// (`u_<id>@in.<service-domain>` needs the `in.` prefix).
pub const DEFAULT_INBOUND_DOMAIN: &str = "in.localhost";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Domain half of every minted routing address. Must start with `in.`.
    pub inbound_domain: String,
    /// Days covered by the weekly brief.
    pub report_window_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            inbound_domain: DEFAULT_INBOUND_DOMAIN.to_string(),
            report_window_days: 7,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("inbound_domain must start with 'in.': {0}")]
    InvalidInboundDomain(String),
    #[error("invalid report_window_days value: {0}")]
    InvalidReportWindow(i64),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    inbound_domain: Option<String>,
    report_window_days: Option<i64>,
}

/// Loads config from an explicit path or the XDG default location.
/// A missing default file yields `AppConfig::default()`; an explicit path
/// that does not exist is an error.
pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let defaults = AppConfig::default();
    let inbound_domain = file
        .inbound_domain
        .unwrap_or(defaults.inbound_domain)
        .trim()
        .to_ascii_lowercase();
    if !inbound_domain.starts_with("in.") {
        return Err(ConfigError::InvalidInboundDomain(inbound_domain));
    }

    let report_window_days = file.report_window_days.unwrap_or(defaults.report_window_days);
    if report_window_days <= 0 {
        return Err(ConfigError::InvalidReportWindow(report_window_days));
    }

    Ok(Some(AppConfig {
        inbound_domain,
        report_window_days,
    }))
}
