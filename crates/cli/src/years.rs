use std::io;
use std::io::Write;
use std::path::Path;

use crate::cli::YearsArgs;
use crate::error::CliError;
use crate::session::Session;

pub(crate) fn years(config: Option<&Path>, args: YearsArgs) -> Result<(), CliError> {
    let session = Session::open(config, &args.source)?;
    let years = session.available_years();

    if years.is_empty() {
        return Err(CliError::Selection(String::from(
            "the published years could not be fetched",
        )));
    }

    let mut stdout = io::stdout().lock();
    for year in years {
        writeln!(stdout, "{year}")?;
    }

    Ok(())
}
