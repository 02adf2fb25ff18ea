use std::time::Duration;

use eurobal_balance::DatasetRequest;
use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use tracing::debug;

use crate::fetch::DatasetSource;
use crate::fetch::error::FetchError;
use crate::fetch::error::Result;

/// A client of the Eurostat dissemination API.
pub(crate) struct EurostatClient {
    client: Client,
    base_url: Url,
}

impl EurostatClient {
    pub const BASE_URL: &str = "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data";

    const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| FetchError::Url(format!("`{base_url}`: {e}")))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Returns the URL of the dataset slice `request` asks for.
    pub fn url(&self, request: &DatasetRequest) -> Result<Url> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|()| FetchError::Url(format!("`{}` cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(request.dataset());

        url.query_pairs_mut()
            .append_pair("format", "JSON")
            .append_pair("lang", "EN")
            .extend_pairs(request.filters());

        Ok(url)
    }
}

impl DatasetSource for EurostatClient {
    fn fetch(&self, request: &DatasetRequest) -> Result<Vec<u8>> {
        let url = self.url(request)?;
        debug!(%url, "fetching dataset");

        let response = self.client.get(url).send()?;

        match response.status() {
            StatusCode::OK => {
                let bytes = response.bytes()?;
                debug!(dataset = request.dataset(), bytes = bytes.len(), "dataset fetched");
                Ok(bytes.to_vec())
            }
            status_code => {
                let message = response.text()?;
                let error = FetchError::Response {
                    status_code,
                    message,
                };
                Err(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eurobal_balance::Scope;
    use eurobal_balance::Unit;

    use super::*;

    #[test]
    fn url_carries_format_language_and_filters() -> Result<()> {
        let client = EurostatClient::new(EurostatClient::BASE_URL, Duration::from_secs(5))?;
        let scope = Scope::new(vec![String::from("DE"), String::from("FR")], 2023, Unit::Ktoe);
        let request = DatasetRequest::transformation(&scope);

        let url = client.url(&request)?;

        assert_eq!(
            url.as_str(),
            "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data/nrg_bal_c\
             ?format=JSON&lang=EN&geo=DE&geo=FR&time=2023&unit=KTOE\
             &nrg_bal=TI_EHG_E&nrg_bal=TO_EHG&siec=TOTAL&siec=E7000&siec=H8000"
        );

        Ok(())
    }

    #[test]
    fn base_url_with_trailing_slash() -> Result<()> {
        let client = EurostatClient::new("http://localhost:8080/data/", Duration::from_secs(5))?;
        let url = client.url(&DatasetRequest::new("nrg_bal_c"))?;

        assert_eq!(url.as_str(), "http://localhost:8080/data/nrg_bal_c?format=JSON&lang=EN");

        Ok(())
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let client = EurostatClient::new("not a url", Duration::from_secs(5));

        assert!(matches!(client, Err(FetchError::Url(_))));
    }
}
