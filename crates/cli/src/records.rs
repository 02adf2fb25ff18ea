use std::io;
use std::io::Write;
use std::path::Path;

use eurobal_balance::Scope;
use eurobal_balance::codes::flow;
use eurobal_jsonstat::FallbackPolicy;

use crate::cli::Panel;
use crate::cli::RecordsArgs;
use crate::error::CliError;
use crate::fetch;
use crate::fetch::DatasetSource;
use crate::session::Session;

pub(crate) fn records(config: Option<&Path>, args: RecordsArgs) -> Result<(), CliError> {
    let mut session = Session::open(config, &args.source)?;
    let selection = session.selection(&args.selection)?;
    let scope = session.scope(&selection);

    let mut stdout = io::stdout().lock();
    write_records(&mut stdout, session.source(), &scope, &session.policy(), args.panel)
}

/// Writes the records of `panel` as pretty-printed JSON.
pub(crate) fn write_records<W, S>(
    out: &mut W,
    source: &S,
    scope: &Scope,
    policy: &FallbackPolicy,
    panel: Panel,
) -> Result<(), CliError>
where
    W: Write,
    S: DatasetSource + ?Sized,
{
    let json = match panel {
        Panel::Overview => serde_json::to_string_pretty(&fetch::fetch_energy_data(source, scope, policy))?,
        Panel::FuelMix => serde_json::to_string_pretty(&fetch::fetch_fuel_mix(source, scope, policy))?,
        Panel::Sectors => serde_json::to_string_pretty(&fetch::fetch_sector_data(source, scope, policy))?,
        Panel::Transformation => {
            serde_json::to_string_pretty(&fetch::fetch_transformation(source, scope, policy))?
        }
        Panel::Trends => serde_json::to_string_pretty(&fetch::fetch_time_series(
            source,
            scope,
            flow::IMPORTS,
            None,
            policy,
        ))?,
    };

    writeln!(out, "{json}")?;
    Ok(())
}
