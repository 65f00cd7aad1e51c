use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use lti_grade_core::api::AppConfig;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "LTI 1.3 grade passback service")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a TOML config file (defaults to ./config.toml when present).
    #[arg(long, env = "LTI_GRADE_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Register configured platforms, then serve grade requests (default).
    Serve(ServeArgs),
    /// Register configured platforms and exit.
    Bootstrap,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct ServeArgs {
    #[arg(long)]
    pub host: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,

    /// Do not touch the platform trust store on startup.
    #[arg(long, default_value_t = false)]
    pub skip_bootstrap: bool,
}

impl ServeArgs {
    /// CLI flags win over file and environment.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(host) = &self.host {
            cfg.server.host = host.clone();
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
    }
}
