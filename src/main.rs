mod checks;
mod cli;
mod client;
mod icinga;
mod logging;
mod restapiv1;

use client::{ClientError, FreenasApiClient};
use icinga::icinga_exit;

fn main() -> Result<(), ClientError> {
    let app = cli::Cli::parsed();
    logging::setup_logging(app.verbose);

    let result = FreenasApiClient::new(&app.target())
        .and_then(|client| checks::run(&client, app.check, &app.disk_policy()));

    match result {
        // with --verbose, unclassified connection failures surface with their full cause chain
        Err(error) if app.verbose && error.is_unclassified() => Err(error),
        result => icinga_exit(result),
    }
}
