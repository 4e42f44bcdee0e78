//! Configuration management for the report runner
//!
//! The local configuration file is mandatory. It is layered over the embedded
//! defaults and `FANTASY_REPORT_*` environment variables, validated once at
//! load time, and then handed to every stage as an immutable [`ReportConfig`].

use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

mod smart_load;


// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

/// Config file looked up in the working directory when no override is set
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_ENV: &str = "FANTASY_REPORT_CONFIG";

const ENV_PREFIX: &str = "FANTASY_REPORT_";

/// Errors raised while locating, reading or validating the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Configuration file \"{}\" not found. Please make sure that it exists in project root directory.",
        .0.display()
    )]
    NotFound(PathBuf),

    #[error(
        "Unable to access configuration file \"{}\". Please check that file permissions are properly set.",
        .path.display()
    )]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "You have configured \"{}\" with unsupported notify setting: mode = {value}. Please choose \"post\" or \"file\" and try again.",
        .path.display()
    )]
    UnsupportedNotifyMode { path: PathBuf, value: String },

    #[error("Invalid configuration in \"{}\": {message}", .path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to parse configuration \"{}\": {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
}

impl ConfigError {
    /// Whether this is an operator usage mistake rather than an environment failure
    pub fn is_usage(&self) -> bool {
        matches!(self, ConfigError::UnsupportedNotifyMode { .. })
    }
}

/// Fully merged and validated configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// File the configuration was loaded from
    #[serde(skip)]
    pub path: PathBuf,

    pub general: GeneralConfig,

    pub preflight: PreflightConfig,

    /// Report builder command
    pub report: BuilderConfig,

    /// Storage sink
    pub upload: UploadConfig,

    /// Chat notification sink
    pub notify: NotifyConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Prompt the operator for anything not given on the command line
    pub interactive: bool,
}

/// Declared runtime requirements checked before any work begins
#[derive(Debug, Clone, Deserialize)]
pub struct PreflightConfig {
    /// Inline requirement specs such as `python3>=3.8`
    #[serde(default)]
    pub requirements: Vec<String>,

    /// Optional requirements file, one spec per line, relative to the config file
    #[serde(default)]
    pub requirements_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuilderConfig {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,

    /// Exit status the builder uses to signal an unknown league
    pub league_not_found_exit_code: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub enabled: bool,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub enabled: bool,

    pub mode: NotifyMode,

    #[serde(default)]
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

/// How the chat notification carries the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum NotifyMode {
    /// Post the shareable reference returned by the storage upload
    Post,
    /// Upload the report file straight into the channel
    File,
}

impl FromStr for NotifyMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "post" => Ok(NotifyMode::Post),
            "file" => Ok(NotifyMode::File),
            other => Err(other.to_string()),
        }
    }
}

impl TryFrom<String> for NotifyMode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for NotifyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyMode::Post => f.write_str("post"),
            NotifyMode::File => f.write_str("file"),
        }
    }
}

impl ReportConfig {
    /// Path of the config file for this process
    pub fn locate() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load, merge and validate the configuration at `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        check_access(path)?;
        tracing::debug!(
            "Configuration file \"{}\" available. Running weekly report app...",
            path.display()
        );

        let figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(smart_load::auto(path))
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]).split("__"));

        let parse_error = |source: figment::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        };

        // Checked on its own first so the operator sees the offending value
        let mode: String = figment.extract_inner("notify.mode").map_err(parse_error)?;
        if let Err(value) = mode.parse::<NotifyMode>() {
            return Err(ConfigError::UnsupportedNotifyMode {
                path: path.to_path_buf(),
                value,
            });
        }

        let mut config: ReportConfig = figment.extract().map_err(parse_error)?;
        config.path = path.to_path_buf();
        config.validate()?;
        Ok(config)
    }

    /// Validate cross-field rules that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.command.trim().is_empty() {
            return Err(self.invalid("report.command must name the report builder command"));
        }
        if self.report.league_not_found_exit_code == 0 {
            return Err(self.invalid("report.league_not_found_exit_code must not be 0"));
        }
        if self.upload.enabled && self.upload.command.trim().is_empty() {
            return Err(self.invalid("upload.command is required when upload.enabled = true"));
        }
        if self.notify.enabled && self.notify.command.trim().is_empty() {
            return Err(self.invalid("notify.command is required when notify.enabled = true"));
        }
        Ok(())
    }

    /// Requirements file resolved against the config file's directory
    pub fn requirements_file(&self) -> Option<PathBuf> {
        let file = self.preflight.requirements_file.as_ref()?;
        if file.is_absolute() {
            return Some(file.clone());
        }
        let base = self.path.parent().unwrap_or_else(|| Path::new(""));
        Some(base.join(file))
    }

    fn invalid(&self, message: &str) -> ConfigError {
        ConfigError::Invalid {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
impl ReportConfig {
    /// In-memory config with every sink disabled
    pub(crate) fn sample() -> Self {
        ReportConfig {
            path: PathBuf::from("config.toml"),
            general: GeneralConfig { interactive: true },
            preflight: PreflightConfig {
                requirements: vec![],
                requirements_file: None,
            },
            report: BuilderConfig {
                command: "build-report".into(),
                args: vec![],
                league_not_found_exit_code: 3,
            },
            upload: UploadConfig {
                enabled: false,
                command: String::new(),
                args: vec![],
            },
            notify: NotifyConfig {
                enabled: false,
                mode: NotifyMode::File,
                command: String::new(),
                args: vec![],
            },
        }
    }
}

/// Reject a missing or unreadable config file before anything else happens
fn check_access(path: &Path) -> Result<(), ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    std::fs::File::open(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
