//! `serve` and `bootstrap` command handlers

use lti_grade_core::api::{AppConfig, BootstrapReport, PlatformRegistry, Services, ServicesFactory};
use lti_grade_plugins::PluginServicesFactory;
use tokio::sync::broadcast;

use crate::commands::cli::ServeArgs;
use crate::error::CliError;
use crate::http::{server, AppState};

fn build_services(cfg: &AppConfig) -> Result<Services, CliError> {
    let services = PluginServicesFactory.build_services(cfg)?;
    tracing::info!(
        launch = services.launch.name(),
        grades = services.grades.name(),
        platforms = services.platforms.name(),
        "Services ready"
    );
    Ok(services)
}

async fn run_bootstrap(cfg: &AppConfig, services: &Services) -> BootstrapReport {
    PlatformRegistry::new(services.platforms.clone())
        .bootstrap(&cfg.platforms)
        .await
}

/// Handle the `serve` command (also the default with no subcommand).
pub async fn handle_serve(args: ServeArgs, cfg: AppConfig) -> Result<(), CliError> {
    let services = build_services(&cfg)?;

    if args.skip_bootstrap {
        tracing::info!("Skipping platform bootstrap");
    } else {
        // Failures are in the report and the log; the server starts regardless.
        run_bootstrap(&cfg, &services).await;
    }

    let (shutdown_tx, _) = broadcast::channel(1);
    let state = AppState::new(services, cfg.grade.clone(), shutdown_tx);

    tracing::info!(
        "Starting LTI grade service on {}:{}",
        cfg.server.host,
        cfg.server.port
    );

    server::start_server(cfg.server.clone(), state)
        .await
        .map_err(CliError::Server)
}

/// Handle the `bootstrap` command: register configured platforms and exit.
pub async fn handle_bootstrap(cfg: AppConfig) -> Result<(), CliError> {
    let services = build_services(&cfg)?;
    let report = run_bootstrap(&cfg, &services).await;

    if report.failed.is_empty() {
        Ok(())
    } else {
        let urls: Vec<&str> = report.failed.iter().map(|(url, _)| url.as_str()).collect();
        Err(CliError::Bootstrap(urls.join(", ")))
    }
}
