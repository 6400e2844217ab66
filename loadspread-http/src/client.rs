//! HTTP client implementation

use crate::config::HttpConfig;
use crate::errors::HttpError;
use crate::types::{HttpMethod, HttpResponse};
use reqwest::Client;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

/// HTTP client trait used by the fan-out engine and the capacity controller
#[async_trait::async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and return its body; any non-2xx status is an error
    async fn get_text(&self, url: &str) -> Result<String, HttpError>;

    /// Send a JSON body and return the response without judging its status
    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&JsonValue>,
    ) -> Result<HttpResponse, HttpError>;
}

/// Pooled HTTP client; clones share one connection pool
#[derive(Debug, Clone)]
pub struct HttpManager {
    client: Client,
    config: HttpConfig,
}

impl HttpManager {
    /// Create a new HttpManager with default configuration
    pub fn new() -> Result<Self, HttpError> {
        Self::with_config(HttpConfig::default())
    }

    /// Create a new HttpManager with specific configuration
    pub fn with_config(config: HttpConfig) -> Result<Self, HttpError> {
        debug!(
            "Creating HttpManager with timeout: {}s, pool: {} idle per host",
            config.timeout.as_secs(),
            config.max_idle_per_host
        );
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    fn parse_url(url: &str) -> Result<reqwest::Url, HttpError> {
        reqwest::Url::parse(url).map_err(|e| HttpError::InvalidUrl(format!("{}: {}", url, e)))
    }
}

#[async_trait::async_trait]
impl HttpClient for HttpManager {
    async fn get_text(&self, url: &str) -> Result<String, HttpError> {
        let parsed = Self::parse_url(url)?;
        trace!("GET {}", url);

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| HttpError::Body {
                url: url.to_string(),
                message: e.to_string(),
            })
    }

    async fn send_json(
        &self,
        method: HttpMethod,
        url: &str,
        body: Option<&JsonValue>,
    ) -> Result<HttpResponse, HttpError> {
        let parsed = Self::parse_url(url)?;
        debug!("Sending {} request to {}", method, url);

        let mut request = self.client.request(reqwest::Method::from(method), parsed);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| HttpError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!("{} {} answered with HTTP {}", method, url, status);
        Ok(HttpResponse { status, body })
    }
}
