//! Environment configuration loading and validation.
//!
//! Uses serde_yaml to load per-environment YAML files with support for
//! environment variable overrides for the Auth0 client id.

mod auth0;
mod error;

pub use auth0::Auth0Config;
pub use error::ConfigError;

use serde::Deserialize;
use std::{env, fs};
use tracing::warn;
use url::{Host, Url};

/// Deployment environment record for the coffee shop application.
///
/// One record per deployment profile (development, production, ...),
/// loaded once at bootstrap and immutable afterwards. Unknown keys are
/// rejected: with `production` and `client_id` defaulting, a typoed key
/// would otherwise be silently swallowed.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Environment {
    /// Whether this is a production deployment.
    #[serde(default)]
    pub production: bool,
    /// Base URL of the backend API server.
    pub api_server_url: Url,
    /// Identity provider settings.
    pub auth0: Auth0Config,
}

impl Environment {
    /// Load an environment from a YAML file at the given path.
    ///
    /// First loads environment variables from `.env` file (if exists),
    /// then loads the YAML record and applies overrides from the
    /// `AUTH0_CLIENT_ID` environment variable.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore error if not found)
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        let mut environment: Environment = serde_yaml::from_str(&content)?;

        environment.load_overrides_from_env();
        environment.validate()?;

        Ok(environment)
    }

    /// Load a named profile from a directory of environment files.
    ///
    /// `load_named("production", "environments")` reads
    /// `environments/production.yaml`.
    pub fn load_named(name: &str, dir: &str) -> Result<Self, ConfigError> {
        let path = format!("{}/{}.yaml", dir.trim_end_matches('/'), name);
        Self::load(&path)
    }

    /// Apply overrides from environment variables.
    ///
    /// The client id is the only field registered per deployment rather
    /// than per code base, so it may live outside the file.
    fn load_overrides_from_env(&mut self) {
        if let Ok(client_id) = env::var("AUTH0_CLIENT_ID") {
            if !client_id.is_empty() {
                self.auth0.client_id = client_id;
            }
        }
    }

    /// Validate the environment record.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.auth0.url.is_empty() {
            return Err(ConfigError::Validation("auth0.url is required".into()));
        }

        if !is_tenant_prefix(&self.auth0.url) {
            return Err(ConfigError::Validation(format!(
                "auth0.url must be a bare tenant prefix (lowercase letters, digits, hyphens), got {:?}",
                self.auth0.url
            )));
        }

        if self.auth0.audience.is_empty() {
            return Err(ConfigError::Validation("auth0.audience is required".into()));
        }

        check_http_scheme("api_server_url", &self.api_server_url)?;
        check_http_scheme("auth0.callback_url", &self.auth0.callback_url)?;

        // Only production deployments need a registered client and
        // publicly reachable, TLS-protected endpoints.
        if self.production {
            if self.auth0.client_id.is_empty() {
                return Err(ConfigError::Validation(
                    "auth0.client_id not found (set the AUTH0_CLIENT_ID env var or add it to the environment file)"
                        .into(),
                ));
            }

            if self.auth0.callback_url.scheme() != "https" {
                return Err(ConfigError::Validation(
                    "auth0.callback_url must use https in production".into(),
                ));
            }

            check_not_loopback("api_server_url", &self.api_server_url)?;
            check_not_loopback("auth0.callback_url", &self.auth0.callback_url)?;
        } else if self.auth0.client_id.is_empty() {
            warn!("auth0.client_id is empty; login will not work until one is set");
        }

        Ok(())
    }

    /// Join a request path onto the API server URL.
    pub fn api_endpoint(&self, path: &str) -> Result<Url, ConfigError> {
        Ok(self.api_server_url.join(path)?)
    }
}

/// Auth0 tenant prefixes are bare DNS labels: lowercase alphanumerics
/// and hyphens, no dots or scheme, no hyphen at either end.
fn is_tenant_prefix(s: &str) -> bool {
    !s.starts_with('-')
        && !s.ends_with('-')
        && s.chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

fn check_http_scheme(field: &str, url: &Url) -> Result<(), ConfigError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Validation(format!(
            "{} must use http or https, got {:?}",
            field, other
        ))),
    }
}

fn check_not_loopback(field: &str, url: &Url) -> Result<(), ConfigError> {
    let loopback = match url.host() {
        Some(Host::Domain(domain)) => domain == "localhost",
        Some(Host::Ipv4(ip)) => ip.is_loopback(),
        Some(Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    };

    if loopback {
        return Err(ConfigError::Validation(format!(
            "{} must not point at a loopback host in production",
            field
        )));
    }

    Ok(())
}
