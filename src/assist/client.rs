//! HTTP client for the assist service
//!
//! One POST per interaction; the reply body is JSON for both success and
//! error statuses, so the body is parsed before the HTTP status is
//! considered.

use crate::assist::mode::AssistMode;
use crate::assist::protocol::{AssistReply, ImageAttachment, ServiceHealth};
use crate::{Result, VistaError};
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use std::time::Duration;
use tracing::debug;

/// Configuration for the assist client
#[derive(Clone, Debug)]
pub struct AssistConfig {
    /// Full URL of the assist endpoint
    pub endpoint: String,

    /// Timeout for a single request
    pub request_timeout: Duration,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/api/assist".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl AssistConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Client for the assist endpoint
pub struct AssistClient {
    http: reqwest::Client,
    endpoint: Url,
    health_url: Url,
}

impl AssistClient {
    /// Create a new client, validating the endpoint URL
    pub fn new(config: &AssistConfig) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            VistaError::ConfigError(format!("Invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        // The health endpoint lives at the service root, not under /api
        let health_url = endpoint.join("/status").map_err(|e| {
            VistaError::ConfigError(format!("Cannot derive health URL: {}", e))
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| VistaError::ConfigError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            health_url,
        })
    }

    /// Request a description for the given mode
    ///
    /// Posts the mode (and image, when attached) as one multipart form and
    /// maps the reply through to the description text.
    pub async fn describe(
        &self,
        mode: AssistMode,
        image: Option<ImageAttachment>,
    ) -> Result<String> {
        let mut form = Form::new().text("mode", mode.wire_value());

        if let Some(image) = image {
            debug!(
                "Attaching image '{}' ({} bytes, {})",
                image.file_name,
                image.data.len(),
                image.mime_type
            );
            let part = Part::bytes(image.data)
                .file_name(image.file_name)
                .mime_str(&image.mime_type)
                .map_err(|e| VistaError::RequestError(format!("Invalid image part: {}", e)))?;
            form = form.part("image", part);
        }

        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| VistaError::RequestError(e.to_string()))?;

        // 400/500 replies still carry a JSON body with a message
        let reply: AssistReply = response
            .json()
            .await
            .map_err(|e| VistaError::RequestError(format!("Invalid reply body: {}", e)))?;

        reply.into_description()
    }

    /// Query the service health endpoint
    pub async fn health(&self) -> Result<ServiceHealth> {
        let response = self
            .http
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| VistaError::RequestError(e.to_string()))?;

        response
            .json()
            .await
            .map_err(|e| VistaError::RequestError(format!("Invalid health body: {}", e)))
    }

    /// The configured assist endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// The derived health endpoint
    pub fn health_url(&self) -> &Url {
        &self.health_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AssistConfig::default();
        assert_eq!(config.endpoint, "http://localhost:3000/api/assist");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_client_rejects_invalid_endpoint() {
        let config = AssistConfig::new("not a url");
        let err = AssistClient::new(&config).unwrap_err();
        assert!(matches!(err, VistaError::ConfigError(_)));
    }

    #[test]
    fn test_health_url_is_at_service_root() {
        let config = AssistConfig::new("http://localhost:3000/api/assist");
        let client = AssistClient::new(&config).unwrap();

        assert_eq!(client.health_url().as_str(), "http://localhost:3000/status");
    }

    #[test]
    fn test_config_builder() {
        let config =
            AssistConfig::new("http://assist.local/api/assist").with_timeout(Duration::from_secs(5));

        assert_eq!(config.endpoint, "http://assist.local/api/assist");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
