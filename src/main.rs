// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, read configuration and hand over
//   to the interactive flow.
// - Early aborts (no results, invalid quantity) exit with status 1.

use std::process::ExitCode;

use unsplash_dl::{config::Config, logging, ui};

fn main() -> anyhow::Result<ExitCode> {
    logging::init();

    // Endpoint, output directory and cookie come from `UNSPLASH_*`
    // variables. See `config::Config::from_env`.
    let config = Config::from_env();

    let finish = ui::run(config)?;
    if finish.is_abort() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
