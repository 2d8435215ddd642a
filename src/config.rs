//! Runtime configuration read from environment variables.
//!
//! The binary loads `.env` first, so values may come from either place:
//! - `IPV6_PLAN_LOG_CONFIG` - log4rs YAML file (default `log4rs.yml`)
//! - `IPV6_PLAN_FORMAT` - default output format, `text`, `csv` or `json`
//! - `IPV6_PLAN_LIST_LIMIT` - most networks printed per listing, `0` for no limit

use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_LOG_CONFIG: &str = "IPV6_PLAN_LOG_CONFIG";
pub const ENV_FORMAT: &str = "IPV6_PLAN_FORMAT";
pub const ENV_LIST_LIMIT: &str = "IPV6_PLAN_LIST_LIMIT";

const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";
const DEFAULT_LIST_LIMIT: usize = 256;

/// How results are written to stdout.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<OutputFormat> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(Error::semantic(format!(
                "{ENV_FORMAT}: unknown output format '{s}', expected text, csv or json"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            OutputFormat::Text => "text",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path of the log4rs YAML file.
    pub log_config: PathBuf,
    pub format: OutputFormat,
    /// `None` prints every network.
    pub list_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_config: PathBuf::from(DEFAULT_LOG_CONFIG),
            format: OutputFormat::default(),
            list_limit: Some(DEFAULT_LIST_LIMIT),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Config> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        if let Some(path) = get(ENV_LOG_CONFIG) {
            config.log_config = PathBuf::from(path);
        }
        if let Some(format) = get(ENV_FORMAT) {
            config.format = format.parse()?;
        }
        if let Some(limit) = get(ENV_LIST_LIMIT) {
            let limit: usize = limit.trim().parse().map_err(|_| {
                Error::semantic(format!(
                    "{ENV_LIST_LIMIT}: '{limit}' is not a non-negative integer"
                ))
            })?;
            config.list_limit = (limit > 0).then_some(limit);
        }

        Ok(config)
    }

    /// Apply command line choices over the environment. A limit of `0`
    /// lifts the limit.
    pub fn with_overrides(mut self, format: Option<OutputFormat>, limit: Option<usize>) -> Config {
        if let Some(format) = format {
            self.format = format;
        }
        if let Some(limit) = limit {
            self.list_limit = (limit > 0).then_some(limit);
        }
        self
    }
}
