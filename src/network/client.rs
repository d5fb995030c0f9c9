//! HTTP client for widget lookups

use crate::config::ClientSettings;
use crate::error::{Error, Result};
use crate::search::Candidate;
use crate::web::PJAX_HEADER;
use crate::widget::LookupClient;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client that calls a field's search action
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    /// Base used to resolve relative search URLs from the markup
    base_url: Option<Url>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&ClientSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &ClientSettings) -> Result<Self> {
        let timeout = settings.request_timeout;
        if !timeout.is_finite() || timeout <= 0.0 {
            return Err(Error::Configuration(format!(
                "request_timeout must be a positive number of seconds, got {}",
                timeout
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs_f64(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: None,
        })
    }

    /// Resolve relative search URLs against `base`
    pub fn with_base_url(mut self, base: &str) -> Result<Self> {
        let base = Url::parse(base)
            .map_err(|e| Error::Configuration(format!("invalid base URL '{}': {}", base, e)))?;
        self.base_url = Some(base);
        Ok(self)
    }

    /// Absolute URL of a search action
    pub fn resolve(&self, search_url: &str) -> Result<Url> {
        let parsed = match &self.base_url {
            Some(base) => base.join(search_url),
            None => Url::parse(search_url),
        };
        parsed.map_err(|e| {
            Error::Configuration(format!("invalid search URL '{}': {}", search_url, e))
        })
    }
}

#[async_trait]
impl LookupClient for HttpClient {
    async fn lookup(&self, search_url: &str, term: &str) -> Result<Vec<Candidate>> {
        let url = self.resolve(search_url)?;
        debug!("Lookup {} query='{}'", url, term);

        let response = self
            .client
            .get(url)
            .header(PJAX_HEADER, "Partial")
            .query(&[("query", term)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
