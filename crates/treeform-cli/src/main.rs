//! Treeform CLI - Turn aggregation class diagrams into nested config and metadata

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is initialized inside run() once the flags are known
    let app = cli::TreeformApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("{}", cli::error_report(&e));
        std::process::exit(1);
    }
}
