mod config;
mod probe;

use config::Environment;
use probe::Probe;
use std::env;
use std::process;
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_ENVIRONMENT_DIR: &str = "environments";

fn parse_environment_name() -> String {
    for arg in env::args().skip(1) {
        if let Some(name) = arg.strip_prefix("--env=") {
            return name.to_string();
        }
    }
    DEFAULT_ENVIRONMENT.to_string()
}

fn parse_environment_dir() -> String {
    for arg in env::args().skip(1) {
        if let Some(dir) = arg.strip_prefix("--dir=") {
            return dir.to_string();
        }
    }
    DEFAULT_ENVIRONMENT_DIR.to_string()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let name = parse_environment_name();
    let dir = parse_environment_dir();

    let environment = match Environment::load_named(&name, &dir) {
        Ok(environment) => environment,
        Err(e) => {
            eprintln!("Failed to load environment '{}': {}", name, e);
            process::exit(1);
        }
    };

    info!(
        environment = %name,
        production = environment.production,
        "Environment loaded"
    );
    info!(url = %environment.api_server_url, "API server");
    info!(
        tenant = %environment.auth0.url,
        audience = %environment.auth0.audience,
        callback = %environment.auth0.callback_url,
        "Auth0"
    );

    match environment.auth0.authorize_url() {
        Ok(url) => info!(url = %url, "Authorize URL"),
        Err(e) => {
            error!(error = %e, "Failed to build authorize URL");
            process::exit(1);
        }
    }

    if env::args().any(|arg| arg == "--check") {
        run_check(&environment).await;
    }
}

/// Run live connectivity checks against the identity provider and API server.
async fn run_check(environment: &Environment) {
    let probe = match Probe::new() {
        Ok(probe) => probe,
        Err(e) => {
            error!(error = %e, "Failed to build HTTP client");
            process::exit(1);
        }
    };

    info!("Running connectivity checks...");

    if let Err(e) = probe.run(environment).await {
        error!(error = %e, "Connectivity check failed");
        process::exit(1);
    }

    info!("All connectivity checks passed");
}
