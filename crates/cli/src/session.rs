//! Everything a command needs to fetch: the merged configuration, the
//! selection and the dataset source.

use std::path::Path;

use chrono::Datelike;
use chrono::Utc;
use eurobal_balance::Scope;
use eurobal_balance::YearsCache;
use eurobal_jsonstat::FallbackPolicy;
use tracing::debug;
use tracing::warn;

use crate::cli::SelectionArgs;
use crate::cli::SourceArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::fetch;
use crate::fetch::DatasetSource;
use crate::selection::Selection;

pub(crate) struct Session {
    config: Config,
    source: Box<dyn DatasetSource + Send + Sync>,
    years: YearsCache,
}

impl Session {
    /// Loads the configuration and applies the source arguments on top of it.
    pub fn open(config_path: Option<&Path>, args: &SourceArgs) -> Result<Session, CliError> {
        let mut config = Config::load(config_path)?;
        config.override_source(args);

        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Session, CliError> {
        let source = config.source()?;

        Ok(Self {
            config,
            source,
            years: YearsCache::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> &(dyn DatasetSource + Send + Sync) {
        self.source.as_ref()
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.config.policy()
    }

    pub fn available_years(&self) -> Vec<i32> {
        fetch::fetch_available_years(self.source(), &self.years)
    }

    /// Builds the selection: a link first, then the configured countries and
    /// year, each replaced by what was given on the command line.
    pub fn selection(&mut self, args: &SelectionArgs) -> Result<Selection, CliError> {
        self.config.override_selection(args);

        let mut selection = match args.link {
            Some(ref link) => Selection::from_link(link)?,
            None => Selection::new(&self.config.countries, self.config.year),
        };
        selection.override_with(&args.countries, args.year);

        if selection.countries().is_empty() {
            return Err(CliError::Selection(String::from(
                "no country selected; pass `--geo` or set `countries` in the configuration",
            )));
        }

        Ok(selection)
    }

    /// The scope of `selection`. Without a selected year the latest published
    /// year is used; if the years cannot be fetched, two years before the
    /// current one.
    pub fn scope(&self, selection: &Selection) -> Scope {
        let year = selection.year().unwrap_or_else(|| self.latest_year());
        debug!(year, countries = ?selection.countries(), "scope resolved");

        Scope::new(selection.countries().to_vec(), year, self.config.unit)
    }

    fn latest_year(&self) -> i32 {
        match self.available_years().last() {
            Some(&year) => year,
            None => {
                let year = Utc::now().year() - 2;
                warn!(year, "available years unknown, guessing the latest one");
                year
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use eurobal_balance::Unit;
    use eurobal_balance::codes::flow;

    use super::*;
    use crate::fetch::tests::StubSource;
    use crate::fetch::tests::years_payload;

    fn session(source: StubSource) -> Session {
        Session {
            config: Config::default(),
            source: Box::new(source),
            years: YearsCache::new(),
        }
    }

    #[test]
    fn latest_published_year_is_the_default() -> Result<(), CliError> {
        let mut session = session(StubSource::default().with(flow::GROSS_INLAND_CONSUMPTION, years_payload()));
        let args = SelectionArgs {
            countries: vec![String::from("de")],
            unit: Some(Unit::Tj),
            ..SelectionArgs::default()
        };

        let selection = session.selection(&args)?;
        let scope = session.scope(&selection);

        assert_eq!(scope, Scope::new(vec![String::from("DE")], 2023, Unit::Tj));

        Ok(())
    }

    #[test]
    fn year_is_guessed_without_available_years() -> Result<(), CliError> {
        let mut session = session(StubSource::default());

        let selection = session.selection(&SelectionArgs::default())?;
        let scope = session.scope(&selection);

        assert_eq!(scope.year, Utc::now().year() - 2);
        assert_eq!(scope.countries, Config::default().countries);

        Ok(())
    }

    #[test]
    fn command_line_overrides_the_link() -> Result<(), CliError> {
        let mut session = session(StubSource::default());
        let args = SelectionArgs {
            year: Some(2020),
            link: Some(String::from("index.html?geo=PL&geo=CZ&year=2022")),
            ..SelectionArgs::default()
        };

        let selection = session.selection(&args)?;

        assert_eq!(selection, Selection::new(["PL", "CZ"], Some(2020)));

        Ok(())
    }

    #[test]
    fn empty_selection_is_an_error() {
        let mut session = session(StubSource::default());
        session.config.countries.clear();

        assert!(matches!(
            session.selection(&SelectionArgs::default()),
            Err(CliError::Selection(_))
        ));
    }
}
