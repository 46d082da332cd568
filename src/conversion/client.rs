//! Client for the external unit conversion lookup service.
//!
//! # Responsibilities
//! - Issue one lookup per ingredient (`from=<unit>&to=&value=<amount>`)
//! - Enforce a per-call timeout
//! - Map transport, status and body failures to `ConversionError::Internal`
//!
//! The target system is never sent; the service returns every known
//! equivalent and filtering happens locally.

use std::time::Duration;
use url::Url;

use crate::config::UpstreamConfig;
use crate::conversion::types::{
    ConversionError, ConversionResult, IngredientInput, LookupResponse, MSG_INVALID_UPSTREAM_RESPONSE,
};
use crate::observability::metrics;

/// Shared HTTP client for conversion lookups.
#[derive(Clone)]
pub struct LookupClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LookupClient {
    /// Build a client from upstream configuration.
    pub fn new(config: &UpstreamConfig) -> ConversionResult<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            ConversionError::Internal(format!("invalid upstream URL '{}': {}", config.base_url, e))
        })?;

        let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder
            .build()
            .map_err(|e| ConversionError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Look up every known equivalent of the ingredient's quantity.
    pub async fn lookup(&self, ingredient: &IngredientInput) -> ConversionResult<LookupResponse> {
        let amount = ingredient.amount.to_string();

        tracing::debug!(unit = %ingredient.unit, value = %amount, "Querying conversion service");

        let response = self
            .http
            .get(self.base_url.clone())
            .query(&[("from", ingredient.unit.as_str()), ("to", ""), ("value", amount.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, unit = %ingredient.unit, "Conversion service unreachable");
                metrics::record_upstream_call("transport_error");
                ConversionError::Internal(format!("conversion API request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            metrics::record_upstream_call("transport_error");
            ConversionError::Internal(format!("conversion API request failed: {}", e))
        })?;

        if status != reqwest::StatusCode::OK {
            tracing::warn!(status = %status, unit = %ingredient.unit, "Conversion service returned an error");
            metrics::record_upstream_call("bad_status");
            return Err(ConversionError::upstream_status(&body));
        }

        let parsed = serde_json::from_str::<LookupResponse>(&body).map_err(|e| {
            tracing::warn!(error = %e, "Conversion service returned an unreadable body");
            metrics::record_upstream_call("bad_body");
            ConversionError::Internal(MSG_INVALID_UPSTREAM_RESPONSE.to_string())
        })?;

        metrics::record_upstream_call("ok");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_base_url() {
        let config = UpstreamConfig {
            base_url: "not a url".into(),
            ..UpstreamConfig::default()
        };
        assert!(matches!(LookupClient::new(&config), Err(ConversionError::Internal(_))));
    }

    #[test]
    fn test_default_base_url() {
        let client = LookupClient::new(&UpstreamConfig::default()).unwrap();
        assert_eq!(client.base_url().host_str(), Some("akshayanandraut.github.io"));
    }
}
