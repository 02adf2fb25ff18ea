use std::env;
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use eurobal_balance::Unit;

use crate::config::Fallback;
use crate::error::CliError;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Specify the configuration file. If it is not specified then
    /// `eurobal.toml` in the current working directory is used when present.
    #[arg(short, long, global = true, value_parser(parse_file))]
    pub(crate) config: Option<PathBuf>,

    /// Specify the log level, e.g. `debug` or `eurobal=debug,info`.
    /// The `RUST_LOG` environment variable takes precedence.
    #[arg(long, global = true, default_value = "info")]
    pub(crate) log_level: String,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Fetch every panel and generate the dashboard and storyteller pages.
    Dashboard(DashboardArgs),
    /// Fetch one panel and print its per-country records as JSON.
    Records(RecordsArgs),
    /// List the years the energy balance is published for.
    Years(YearsArgs),
    /// Resolve a single cell of a dataset.
    Query(QueryArgs),
}

#[derive(Args, Default)]
pub(crate) struct SourceArgs {
    /// Specify the dissemination API endpoint.
    #[arg(long)]
    pub(crate) base_url: Option<String>,

    /// Specify the HTTP request timeout in seconds.
    #[arg(long)]
    pub(crate) timeout_secs: Option<u64>,

    /// Read datasets from `<dataset>.json` JSON-stat files in this
    /// directory instead of the API.
    #[arg(long, value_parser(parse_path))]
    pub(crate) data_dir: Option<PathBuf>,

    /// Specify how a missing or unknown dimension code is resolved.
    #[arg(long, value_enum)]
    pub(crate) fallback: Option<Fallback>,
}

#[derive(Args, Default)]
pub(crate) struct SelectionArgs {
    /// Add a country (or aggregate) code to the selection. Repeatable.
    #[arg(short = 'g', long = "geo")]
    pub(crate) countries: Vec<String>,

    /// Specify the year. If it is not specified then the latest published
    /// year is used.
    #[arg(short, long)]
    pub(crate) year: Option<i32>,

    /// Specify the unit of the values: KTOE, GWH or TJ.
    #[arg(short, long)]
    pub(crate) unit: Option<Unit>,

    /// Read the selection from a bookmarked dashboard link,
    /// e.g. `index.html?geo=DE&geo=FR&year=2022`.
    #[arg(short, long)]
    pub(crate) link: Option<String>,
}

#[derive(Args)]
pub(crate) struct DashboardArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,

    #[command(flatten)]
    pub(crate) selection: SelectionArgs,

    /// Specify the path where the dashboard directory will be created.
    /// If the output path is not specified then the configured one, or else
    /// the current working directory, is used.
    #[arg(short, long, value_parser(parse_path))]
    pub(crate) output_path: Option<PathBuf>,
}

#[derive(Args)]
pub(crate) struct RecordsArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,

    #[command(flatten)]
    pub(crate) selection: SelectionArgs,

    /// Specify the panel whose records are printed.
    #[arg(short, long, value_enum, default_value_t = Panel::Overview)]
    pub(crate) panel: Panel,
}

#[derive(Args)]
pub(crate) struct YearsArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Args)]
pub(crate) struct QueryArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,

    /// Specify the dataset code.
    #[arg(short, long, default_value = "nrg_bal_c")]
    pub(crate) dataset: String,

    /// Add a `dimension=code` filter to the request. Repeatable.
    #[arg(short, long = "filter", value_parser(parse_pair))]
    pub(crate) filters: Vec<(String, String)>,

    /// Select the code of a dimension, as `dimension=code`. Repeatable.
    /// Dimensions left out are resolved by the fallback.
    #[arg(short, long = "select", value_parser(parse_pair))]
    pub(crate) selections: Vec<(String, String)>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub(crate) enum Panel {
    Overview,
    FuelMix,
    Sectors,
    Transformation,
    Trends,
}

fn parse_path(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.exists() {
        return Err(format!("The `{}` path does not exist.", path.display()));
    }

    if !path.is_dir() {
        return Err(format!(
            "The `{}` path must point to a directory.",
            path.display()
        ));
    }

    Ok(path)
}

fn parse_file(path: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path);

    if !path.is_file() {
        return Err(format!("The `{}` file does not exist.", path.display()));
    }

    Ok(path)
}

fn parse_pair(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(format!("`{pair}` must have the form `dimension=code`.")),
    }
}

pub(crate) trait PathExt {
    fn or_current_dir(self) -> Result<PathBuf, CliError>;
}

impl PathExt for Option<PathBuf> {
    fn or_current_dir(self) -> Result<PathBuf, CliError> {
        if let Some(path) = self {
            Ok(path)
        } else {
            env::current_dir().map_err(|e| CliError::Path(e.to_string()))
        }
    }
}
