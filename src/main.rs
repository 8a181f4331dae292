use std::process::ExitCode;

use catalog_bridge::error::ApiError;
use clap::Parser;

mod cli;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Error)
        .env()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let cli = cli::Cli::parse();

    let channels = catalog_bridge::BridgeChannels::default();
    let backend = match catalog_backend::run(channels.backend_rx, channels.backend_tx) {
        Ok(handle) => handle,
        Err(error) => {
            eprintln!("catalog-admin: failed to start backend: {error}");
            return ExitCode::FAILURE;
        }
    };

    let result = catalog_frontend::run(
        channels.frontend_rx,
        channels.frontend_tx,
        cli.into_command(),
    );

    if backend.join().is_err() {
        log::error!("Backend thread panicked");
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // rejected requests were already shown as error notifications
            if error.downcast_ref::<ApiError>().is_none() {
                eprintln!("catalog-admin: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}
