//! Server configuration.
//!
//! Loaded from the TOML file named by `RELOOP_CONFIG` when set, otherwise
//! built-in defaults. A handful of environment variables override the file.

use reloop_ocr::FilterConfig;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_PATH_VAR: &str = "RELOOP_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    /// Bunyan-style JSON lines.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" | "bunyan" => Ok(LogFormat::Json),
            other => Err(format!("Unknown log format: '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract language hint.
    pub lang: String,
    /// Directory holding `*.traineddata`; Tesseract's own default when unset.
    pub data_path: Option<String>,
    /// Grayscale and contrast-stretch uploads before OCR.
    pub preprocess: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self { lang: "eng".to_string(), data_path: None, preprocess: true }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Where in-flight uploads are parked while OCR runs.
    pub receipts_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
    pub ocr: OcrConfig,
    pub filter: FilterConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3002)),
            receipts_dir: PathBuf::from("public/images/receipts"),
            max_upload_bytes: 10 * 1024 * 1024,
            log_format: LogFormat::Pretty,
            ocr: OcrConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read `RELOOP_CONFIG` (if set) and apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var_os(CONFIG_PATH_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        base.with_env_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// `lookup` maps a variable name to its value, if set.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("RELOOP_BIND") {
            self.bind = value
                .parse()
                .map_err(|_| ConfigError::Env { var: "RELOOP_BIND", value })?;
        } else if let Some(value) = lookup("PORT") {
            let port: u16 = value.parse().map_err(|_| ConfigError::Env { var: "PORT", value })?;
            self.bind.set_port(port);
        }
        if let Some(value) = lookup("RELOOP_RECEIPTS_DIR") {
            self.receipts_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup("RELOOP_LOG_FORMAT") {
            self.log_format = value
                .parse()
                .map_err(|_| ConfigError::Env { var: "RELOOP_LOG_FORMAT", value })?;
        }
        Ok(self)
    }
}
