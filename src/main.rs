use clap::Parser;

use mdexec::cli::{self, Cli};
use mdexec::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    // Keep the guard alive so buffered log lines are flushed on exit.
    let _logging_guard = logging::init();
    cli::run(cli)?;
    Ok(())
}
