use std::error::Error;
use std::fmt::Display;
use std::io;

use eurobal_jsonstat::error::ResolveError;
use eurobal_vis::error::VisError;

use crate::config::ConfigError;
use crate::fetch::error::FetchError;

#[derive(Debug)]
pub(crate) enum CliError {
    Fetch(FetchError),
    Config(ConfigError),
    Vis(VisError),
    Resolve(ResolveError),
    Json(serde_json::Error),
    Io(io::Error),
    Selection(String),
    Path(String),
}

impl From<FetchError> for CliError {
    fn from(error: FetchError) -> Self {
        CliError::Fetch(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error)
    }
}

impl From<VisError> for CliError {
    fn from(error: VisError) -> Self {
        CliError::Vis(error)
    }
}

impl From<ResolveError> for CliError {
    fn from(error: ResolveError) -> Self {
        CliError::Resolve(error)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(error: serde_json::Error) -> Self {
        CliError::Json(error)
    }
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::Io(error)
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cli_error = "CLI error:";

        match self {
            CliError::Fetch(error) => write!(f, "{cli_error} {error}"),
            CliError::Config(error) => write!(f, "{cli_error} {error}"),
            CliError::Vis(error) => write!(f, "{cli_error} {error}"),
            CliError::Resolve(error) => write!(f, "{cli_error} {error}"),
            CliError::Json(error) => write!(f, "{cli_error} writing JSON failed: {error}"),
            CliError::Io(error) => write!(f, "{cli_error} writing output failed: {error}"),
            CliError::Selection(error) => write!(f, "{cli_error} {error}"),
            CliError::Path(error) => write!(f, "{cli_error} {error}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            CliError::Fetch(error) => Some(error),
            CliError::Config(error) => Some(error),
            CliError::Vis(error) => Some(error),
            CliError::Resolve(error) => Some(error),
            CliError::Json(error) => Some(error),
            CliError::Io(error) => Some(error),
            CliError::Selection(_) | CliError::Path(_) => None,
        }
    }
}
