use std::error::Error;
use std::fmt::Display;
use std::io;

use reqwest::StatusCode;

pub(crate) type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug)]
pub(crate) enum FetchError {
    Http(reqwest::Error),
    Url(String),
    Response {
        status_code: StatusCode,
        message: String,
    },
    Io(io::Error),
    Aborted,
}

impl Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fetch_error = "fetch error:";

        match self {
            FetchError::Http(error) => write!(f, "{fetch_error} HTTP request error: {error}"),
            FetchError::Url(error) => write!(f, "{fetch_error} invalid request URL: {error}"),
            FetchError::Response {
                status_code,
                message,
            } => write!(
                f,
                "{fetch_error} HTTP response error: status = {status_code}, message = {message}"
            ),
            FetchError::Io(error) => write!(f, "{fetch_error} reading the dataset failed: {error}"),
            FetchError::Aborted => write!(f, "{fetch_error} the request was aborted"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FetchError::Http(error) => Some(error),
            FetchError::Io(error) => Some(error),
            FetchError::Url(_) | FetchError::Response { .. } | FetchError::Aborted => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Http(error)
    }
}

impl From<io::Error> for FetchError {
    fn from(error: io::Error) -> Self {
        FetchError::Io(error)
    }
}
