mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use texclean::cli::Cli;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();

    // The config file may turn on verbose logging, so it is read first.
    let result = commands::clean::load_config(&cli).and_then(|config| {
        init_logging(config.verbose);
        commands::clean::handle(&config)
    });

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
