mod calculation;
mod completion;
mod config;
mod error;
mod history;
mod logging;
mod memento;
mod observers;
mod operations;
mod parser;
mod repl;
mod session;
mod util;

use anyhow::Context;
use config::CalculatorConfig;
use session::Session;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = CalculatorConfig::from_env().context("invalid configuration")?;
    config.ensure_dirs()?;
    logging::init(&config)?;
    info!(history_file = %config.history_file().display(), "calculator starting");

    let mut session = Session::new(&config);
    repl::start_repl(&mut session)
}
