//! The countries and year the dashboard shows, as carried by a bookmarkable
//! link: `?geo=DE&geo=FR&year=2023`.

use std::borrow::Cow;

use reqwest::Url;
use tracing::debug;

use crate::error::CliError;

const GEO_PARAM: &str = "geo";
const YEAR_PARAM: &str = "year";
const LOCAL_BASE: &str = "http://localhost/";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    countries: Vec<String>,
    year: Option<i32>,
}

impl Selection {
    /// Creates a selection of upper-cased, de-duplicated country codes.
    pub fn new<I, S>(countries: I, year: Option<i32>) -> Selection
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Selection {
            countries: Vec::new(),
            year,
        };

        for country in countries {
            selection.add_country(country.as_ref());
        }

        selection
    }

    /// Reads the selection from a link. The link may be a full URL or only
    /// its query string; unknown parameters are ignored.
    pub fn from_link(link: &str) -> Result<Selection, CliError> {
        let url = parse(link)?;
        Ok(Self::from_pairs(url.query_pairs()))
    }

    fn from_pairs<'a, I>(pairs: I) -> Selection
    where
        I: IntoIterator<Item = (Cow<'a, str>, Cow<'a, str>)>,
    {
        let mut selection = Selection::default();

        for (key, value) in pairs {
            match key.as_ref() {
                GEO_PARAM => selection.add_country(&value),
                YEAR_PARAM => match value.trim().parse() {
                    Ok(year) => selection.year = Some(year),
                    Err(_) => debug!(year = %value, "ignoring unparsable year"),
                },
                _ => {}
            }
        }

        selection
    }

    fn add_country(&mut self, code: &str) {
        let code = code.trim().to_ascii_uppercase();

        if !code.is_empty() && !self.countries.contains(&code) {
            self.countries.push(code);
        }
    }

    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }

    /// Replaces the countries if `countries` is not empty and the year if
    /// `year` is set.
    pub fn override_with(&mut self, countries: &[String], year: Option<i32>) {
        if !countries.is_empty() {
            self.countries.clear();
            for country in countries {
                self.add_country(country);
            }
        }

        if year.is_some() {
            self.year = year;
        }
    }

    /// Renders the selection as a query string.
    pub fn to_query(&self) -> String {
        self.link(LOCAL_BASE)
            .ok()
            .and_then(|url| url.query().map(str::to_owned))
            .unwrap_or_default()
    }

    /// Returns `base` with its query replaced by the selection.
    pub fn link(&self, base: &str) -> Result<Url, CliError> {
        let mut url = parse(base)?;

        {
            let mut query = url.query_pairs_mut();
            query.clear();

            for country in &self.countries {
                query.append_pair(GEO_PARAM, country);
            }

            if let Some(year) = self.year {
                query.append_pair(YEAR_PARAM, &year.to_string());
            }
        }

        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url)
    }
}

fn parse(link: &str) -> Result<Url, CliError> {
    Url::parse(link)
        .or_else(|_| Url::parse(LOCAL_BASE).and_then(|base| base.join(link)))
        .map_err(|e| CliError::Selection(format!("`{link}` is not a valid link: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_round_trip() -> Result<(), CliError> {
        let selection = Selection::new(["DE", "FR"], Some(2023));

        let link = selection.link("https://energy.example.org/dashboard")?;
        assert_eq!(
            link.as_str(),
            "https://energy.example.org/dashboard?geo=DE&geo=FR&year=2023"
        );
        assert_eq!(Selection::from_link(link.as_str())?, selection);

        Ok(())
    }

    #[test]
    fn codes_are_upper_cased_and_deduplicated() -> Result<(), CliError> {
        let selection = Selection::from_link("?geo=de&geo=FR&geo=DE&geo=&year=2021")?;

        assert_eq!(selection.countries(), ["DE", "FR"]);
        assert_eq!(selection.year(), Some(2021));

        Ok(())
    }

    #[test]
    fn unparsable_year_is_ignored() -> Result<(), CliError> {
        let selection = Selection::from_link("index.html?geo=PL&year=latest&theme=dark")?;

        assert_eq!(selection.countries(), ["PL"]);
        assert_eq!(selection.year(), None);

        Ok(())
    }

    #[test]
    fn query_string_of_the_selection() {
        assert_eq!(Selection::new(["AT"], Some(2020)).to_query(), "geo=AT&year=2020");
        assert_eq!(Selection::default().to_query(), "");
    }

    #[test]
    fn override_replaces_only_given_parts() {
        let mut selection = Selection::new(["DE"], Some(2022));

        selection.override_with(&[], Some(2023));
        assert_eq!(selection, Selection::new(["DE"], Some(2023)));

        selection.override_with(&[String::from("se")], None);
        assert_eq!(selection, Selection::new(["SE"], Some(2023)));
    }
}
