use std::io;
use std::io::Write;
use std::path::Path;

use eurobal_balance::DatasetRequest;
use eurobal_balance::format::NO_DATA;
use eurobal_jsonstat::FallbackPolicy;
use eurobal_jsonstat::Query;
use tracing::debug;

use crate::cli::QueryArgs;
use crate::error::CliError;
use crate::fetch;
use crate::fetch::DatasetSource;
use crate::session::Session;

pub(crate) fn query(config: Option<&Path>, args: QueryArgs) -> Result<(), CliError> {
    let session = Session::open(config, &args.source)?;

    let request = args
        .filters
        .into_iter()
        .fold(DatasetRequest::new(args.dataset), |request, (dimension, code)| {
            request.filter(dimension, code)
        });
    let query: Query = args.selections.into_iter().collect();

    let mut stdout = io::stdout().lock();
    write_cell(&mut stdout, session.source(), &request, &query, &session.policy())
}

/// Resolves `query` against the dataset `request` fetches and writes the
/// value of the cell followed by its status flag, if it has one.
///
/// A cell without a value is written as the no-data marker. A query that
/// cannot address a cell is an error.
pub(crate) fn write_cell<W, S>(
    out: &mut W,
    source: &S,
    request: &DatasetRequest,
    query: &Query,
    policy: &FallbackPolicy,
) -> Result<(), CliError>
where
    W: Write,
    S: DatasetSource + ?Sized,
{
    let decoder = fetch::decode(source, request, policy)?;
    debug!(%query, dimensions = ?decoder.dimensions().collect::<Vec<_>>(), "resolving cell");

    let value = decoder.try_resolve(query)?;
    let status = decoder.observation(query).and_then(|observation| observation.status);

    let value = value.map_or_else(|| String::from(NO_DATA), |value| value.to_string());

    match status {
        Some(status) => writeln!(out, "{value} ({status})")?,
        None => writeln!(out, "{value}")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use eurobal_jsonstat::error::ResolveError;
    use serde_json::json;

    use super::*;
    use crate::fetch::tests::StubSource;

    fn source() -> StubSource {
        StubSource::default().with(
            "nrg_bal_c",
            json!({
                "id": ["geo", "time"],
                "size": [2, 2],
                "value": { "0": 81.5, "1": 79.2, "3": 12.0 },
                "status": { "1": "p" },
                "dimension": {
                    "geo": { "category": { "index": ["DE", "NO"] } },
                    "time": { "category": { "index": ["2022", "2023"] } }
                }
            }),
        )
    }

    fn cell(query: Query, policy: FallbackPolicy) -> Result<String, CliError> {
        let mut out = Vec::new();
        write_cell(&mut out, &source(), &DatasetRequest::new("nrg_bal_c"), &query, &policy)?;

        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    #[test]
    fn value_with_status_flag() -> Result<(), CliError> {
        let query = Query::from([("geo", "DE"), ("time", "2023")]);

        assert_eq!(cell(query, FallbackPolicy::Reject)?, "79.2 (p)\n");

        Ok(())
    }

    #[test]
    fn missing_cell_is_no_data() -> Result<(), CliError> {
        let query = Query::from([("geo", "NO"), ("time", "2022")]);

        assert_eq!(cell(query, FallbackPolicy::Reject)?, format!("{NO_DATA}\n"));

        Ok(())
    }

    #[test]
    fn omitted_dimension_follows_the_policy() -> Result<(), CliError> {
        let query = Query::from([("geo", "NO")]);

        assert_eq!(cell(query.clone(), FallbackPolicy::FirstMember)?, format!("{NO_DATA}\n"));
        assert!(matches!(
            cell(query, FallbackPolicy::Reject),
            Err(CliError::Resolve(ResolveError::MissingCode { .. }))
        ));

        Ok(())
    }
}
