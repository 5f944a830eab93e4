//! Confstore CLI entry point.

use clap::Parser;

use confstore::cli::{commands, Cli, Commands};
use confstore::infrastructure::logging::LoggerImpl;

fn main() {
    let cli = Cli::parse();

    // Held until exit so the file writer flushes.
    let _logger = match LoggerImpl::init(&cli.logging.log_config()) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("Warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command {
        Commands::Check(args) => commands::check::execute(args, &cli.load, cli.json),
        Commands::Get(args) => commands::get::execute(args, &cli.load, cli.json),
        Commands::Show(args) => commands::show::execute(args, &cli.load, cli.json),
        Commands::Export(args) => commands::export::execute(args, &cli.load, cli.json),
        Commands::Summary(args) => commands::summary::execute(args, &cli.load, cli.json),
        Commands::Schema(args) => commands::schema::execute(args, cli.json),
    };

    if let Err(err) = result {
        confstore::cli::handle_error(&err, cli.json);
    }
}
