//! padel-scheduler CLI entry point.

use clap::Parser;

use padel_scheduler::cli::commands::{expand, init, seed, serve};
use padel_scheduler::cli::{load_config, Cli, Commands};

#[tokio::main]
async fn main() {
    let Cli { command, json, config } = Cli::parse();
    let config_path = config.as_deref();

    let result = match command {
        Commands::Init(args) => init::execute(args, json).await,
        Commands::Serve(args) => match load_config(config_path) {
            Ok(config) => serve::execute(args, config).await,
            Err(err) => Err(err),
        },
        Commands::Expand(args) => {
            load_config(config_path).and_then(|config| expand::execute(&args, &config.scheduling, json))
        }
        Commands::Seed(args) => match load_config(config_path) {
            Ok(config) => seed::execute(args, &config, json).await,
            Err(err) => Err(err),
        },
    };

    if let Err(err) = result {
        padel_scheduler::cli::handle_error(err, json);
    }
}
