//! The `eurobal.toml` configuration file.
//!
//! Every setting is optional. Settings given on the command line take
//! precedence over the file.

use std::error::Error;
use std::fmt::Display;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use eurobal_balance::Unit;
use eurobal_balance::codes;
use eurobal_jsonstat::FallbackPolicy;
use serde::Deserialize;
use tracing::debug;

use crate::cli::SelectionArgs;
use crate::cli::SourceArgs;
use crate::fetch::DatasetSource;
use crate::fetch::client::EurostatClient;
use crate::fetch::error::FetchError;
use crate::fetch::file::DirectorySource;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// The dissemination API endpoint datasets are fetched from.
    pub base_url: String,
    pub timeout_secs: u64,
    pub unit: Unit,
    pub countries: Vec<String>,
    /// The year shown; the latest published year when not set.
    pub year: Option<i32>,
    pub fallback: Fallback,
    /// The codes tried, in order, by the `aggregate` fallback.
    pub aggregate_codes: Vec<String>,
    pub output_path: Option<PathBuf>,
    /// Read datasets from `<dataset>.json` files here instead of the API.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::from(EurostatClient::BASE_URL),
            timeout_secs: 30,
            unit: Unit::default(),
            countries: [codes::EU_AGGREGATE, "DE", "FR", "IT", "ES", "PL"]
                .map(String::from)
                .to_vec(),
            year: None,
            fallback: Fallback::default(),
            aggregate_codes: vec![String::from("TOTAL"), String::from(codes::EU_AGGREGATE)],
            output_path: None,
            data_dir: None,
        }
    }
}

/// How missing or unknown dimension codes are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Fallback {
    /// Use the first member of the dimension.
    #[default]
    FirstMember,
    /// Report no data.
    Reject,
    /// Use the first configured aggregate code the dimension has.
    Aggregate,
}

impl Config {
    const FILE_NAME: &str = "eurobal.toml";

    /// Loads the configuration from `path`, or from `./eurobal.toml` if no
    /// path is given and the file exists.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(Self::FILE_NAME);

                if path.is_file() {
                    Self::from_file(path)
                } else {
                    debug!("no configuration file found, using defaults");
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;

        let config = toml::from_str(&text).map_err(|error| ConfigError::Toml {
            path: path.to_path_buf(),
            error,
        })?;

        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn override_source(&mut self, args: &SourceArgs) {
        if let Some(ref base_url) = args.base_url {
            self.base_url.clone_from(base_url);
        }

        if let Some(timeout_secs) = args.timeout_secs {
            self.timeout_secs = timeout_secs;
        }

        if args.data_dir.is_some() {
            self.data_dir.clone_from(&args.data_dir);
        }

        if let Some(fallback) = args.fallback {
            self.fallback = fallback;
        }
    }

    pub fn override_selection(&mut self, args: &SelectionArgs) {
        if let Some(unit) = args.unit {
            self.unit = unit;
        }
    }

    pub fn policy(&self) -> FallbackPolicy {
        match self.fallback {
            Fallback::FirstMember => FallbackPolicy::FirstMember,
            Fallback::Reject => FallbackPolicy::Reject,
            Fallback::Aggregate => FallbackPolicy::Aggregate(self.aggregate_codes.clone()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Opens the source the datasets are read from.
    pub fn source(&self) -> Result<Box<dyn DatasetSource + Send + Sync>, FetchError> {
        match self.data_dir {
            Some(ref path) => Ok(Box::new(DirectorySource::new(path.clone()))),
            None => Ok(Box::new(EurostatClient::new(&self.base_url, self.timeout())?)),
        }
    }
}

#[derive(Debug)]
pub(crate) enum ConfigError {
    Io { path: PathBuf, error: io::Error },
    Toml { path: PathBuf, error: toml::de::Error },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let config_error = "config error:";

        match self {
            ConfigError::Io { path, error } => {
                write!(f, "{config_error} reading `{}` failed: {error}", path.display())
            }
            ConfigError::Toml { path, error } => {
                write!(f, "{config_error} `{}` is not valid: {error}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Io { error, .. } => Some(error),
            ConfigError::Toml { error, .. } => Some(error),
        }
    }
}
