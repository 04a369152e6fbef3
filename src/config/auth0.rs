//! Identity provider (Auth0) configuration.

use serde::Deserialize;
use url::Url;

use super::ConfigError;

/// Auth0 settings for the OAuth2/OIDC redirect flow.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Auth0Config {
    /// Tenant domain prefix (e.g. "full-s-d"), expands to
    /// `https://{url}.auth0.com`.
    pub url: String,
    /// Audience claim expected by the backend API.
    pub audience: String,
    /// Public client id registered with the provider
    /// (may be supplied via the AUTH0_CLIENT_ID env var instead).
    #[serde(default)]
    pub client_id: String,
    /// Redirect target after authentication.
    pub callback_url: Url,
}

impl Auth0Config {
    /// Base URL of the tenant, `https://{prefix}.auth0.com`.
    pub fn tenant_base_url(&self) -> Result<Url, ConfigError> {
        Ok(Url::parse(&format!("https://{}.auth0.com", self.url))?)
    }

    /// Implicit-flow login link the front end redirects the browser to.
    ///
    /// Query values are percent-encoded; the audience in particular may
    /// contain spaces (e.g. "Coffee App").
    pub fn authorize_url(&self) -> Result<Url, ConfigError> {
        let base = self.tenant_base_url()?;
        let query = format!(
            "audience={}&response_type=token&client_id={}&redirect_uri={}",
            urlencoding::encode(&self.audience),
            urlencoding::encode(&self.client_id),
            urlencoding::encode(self.callback_url.as_str()),
        );
        Ok(Url::parse(&format!("{}authorize?{}", base, query))?)
    }
}
