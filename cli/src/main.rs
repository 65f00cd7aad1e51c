use clap::Parser;

mod commands;
mod error;
mod http;
mod logging;

use commands::cli::{Args, Commands, ServeArgs};
use commands::serve;
use error::CliError;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let args = Args::parse();
    let mut cfg = lti_grade_core::config::load(args.config.as_deref())?;

    let command = args
        .command
        .unwrap_or_else(|| Commands::Serve(ServeArgs::default()));
    if let Commands::Serve(serve_args) = &command {
        serve_args.apply(&mut cfg);
    }

    let _log_guards = logging::init_logging(&cfg.logging)?;
    install_panic_hook();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        platforms = cfg.platforms.len(),
        "lti-grade starting"
    );

    let result = match command {
        Commands::Serve(serve_args) => serve::handle_serve(serve_args, cfg).await,
        Commands::Bootstrap => serve::handle_bootstrap(cfg).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "lti-grade exited with error");
    }
    result
}

/// Panics anywhere are fatal: log through tracing, then exit with status 1.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Unrecoverable error");
        default_hook(info);
        std::process::exit(1);
    }));
}
