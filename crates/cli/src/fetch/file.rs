use std::fs;
use std::path::PathBuf;

use eurobal_balance::DatasetRequest;
use tracing::debug;

use crate::fetch::DatasetSource;
use crate::fetch::error::Result;

/// Reads datasets from JSON-stat files named `<dataset>.json` in a directory.
///
/// The request filters are not applied: every panel reads the whole file and
/// picks its cells from it.
pub(crate) struct DirectorySource {
    path: PathBuf,
}

impl DirectorySource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl DatasetSource for DirectorySource {
    fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>> {
        let path = self.path.join(format!("{}.json", request.dataset()));
        debug!(path = %path.display(), "reading dataset");

        Ok(fs::read(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::error::FetchError;

    #[test]
    fn reads_the_dataset_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("nrg_bal_c.json"), br#"{"version":"2.0"}"#)?;

        let source = DirectorySource::new(dir.path().to_path_buf());
        let bytes = source.fetch(&DatasetRequest::new("nrg_bal_c").filter("geo", "DE"))?;

        assert_eq!(bytes, br#"{"version":"2.0"}"#);

        Ok(())
    }

    #[test]
    fn missing_file_is_an_io_error() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let source = DirectorySource::new(dir.path().to_path_buf());

        let result = source.fetch(&DatasetRequest::new("nrg_bal_c"));

        assert!(matches!(result, Err(FetchError::Io(_))));

        Ok(())
    }
}
