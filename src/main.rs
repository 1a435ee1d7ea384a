use clap::Parser;

use downsort::cli::{Cli, run_cli};
use downsort::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();
    cli.setup_logging();

    match run_cli(&cli) {
        Ok(false) => {}
        // Interrupted runs exit with the conventional SIGINT status.
        Ok(true) => std::process::exit(130),
        Err(message) => {
            OutputFormatter::error(&message);
            std::process::exit(1);
        }
    }
}
