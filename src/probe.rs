//! Live connectivity checks for a loaded environment.
//!
//! Verifies that the Auth0 tenant publishes an OIDC discovery document
//! and that the API server answers HTTP at all.

use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Environment;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the OIDC discovery document on the tenant.
const DISCOVERY_PATH: &str = "/.well-known/openid-configuration";

/// Probe errors.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("tenant {tenant}: discovery document has no authorization_endpoint")]
    IncompleteDiscovery { tenant: String },
}

/// Result type for probe operations.
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Subset of the OIDC discovery document we care about.
#[derive(Debug, Deserialize)]
struct DiscoveryDocument {
    issuer: Option<String>,
    authorization_endpoint: Option<String>,
}

/// Connectivity prober for an environment record.
pub struct Probe {
    http: HttpClient,
}

impl Probe {
    pub fn new() -> Result<Self> {
        let http = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http })
    }

    /// Run all checks against the given environment.
    pub async fn run(&self, environment: &Environment) -> Result<()> {
        self.check_tenant(environment).await?;
        self.check_api_server(environment).await?;
        Ok(())
    }

    /// Fetch and inspect the tenant's OIDC discovery document.
    async fn check_tenant(&self, environment: &Environment) -> Result<()> {
        let mut discovery_url = environment.auth0.tenant_base_url()?;
        discovery_url.set_path(DISCOVERY_PATH);

        debug!(url = %discovery_url, "Fetching discovery document");

        let response = self.http.get(discovery_url).send().await?;
        let body = response.error_for_status()?.text().await?;
        let document: DiscoveryDocument = serde_json::from_str(&body)?;

        match document.authorization_endpoint {
            Some(endpoint) => {
                info!(
                    issuer = ?document.issuer,
                    authorize = %endpoint,
                    "Identity provider reachable"
                );
                Ok(())
            }
            None => Err(ProbeError::IncompleteDiscovery {
                tenant: environment.auth0.url.clone(),
            }),
        }
    }

    /// Check that the API server answers HTTP.
    ///
    /// Any status counts as reachable; the root path commonly 404s.
    async fn check_api_server(&self, environment: &Environment) -> Result<()> {
        let url = environment.api_server_url.clone();
        let response = self.http.get(url.clone()).send().await?;

        info!(url = %url, status = %response.status(), "API server reachable");
        Ok(())
    }
}
