//! Internal HTTP client for the import gateway's `/api/v1` REST surface.

use crate::config::ClientConfig;
use crate::core::domain::error::{ImportError, ImportResult};
use crate::core::domain::value_object::GatewayUrl;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

/// Error body returned by the gateway on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Internal HTTP client that builds endpoint URLs and maps gateway errors.
///
/// Every request goes through [`ApiClient::send`], which applies the optional
/// rate limit and turns non-2xx responses into [`ImportError::Api`] with the
/// message taken from the `{"error": ...}` body when there is one.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: GatewayUrl,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

impl ApiClient {
    /// Creates a new `ApiClient`.
    ///
    /// # Errors
    /// Returns `ImportError::Validation` for an invalid configuration and
    /// `ImportError::Connection` if the HTTP client cannot be built.
    pub fn new(base_url: GatewayUrl, config: &ClientConfig) -> ImportResult<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ImportError::Connection(e.to_string()))?;

        let rate_limiter = match config.rate_limit {
            Some(rl) => {
                let per_second = NonZeroU32::new(rl.requests_per_second).ok_or_else(|| {
                    ImportError::Connection("requests_per_second must be non-zero".to_string())
                })?;
                let burst = NonZeroU32::new(rl.burst_size).ok_or_else(|| {
                    ImportError::Connection("burst_size must be non-zero".to_string())
                })?;
                let quota = Quota::per_second(per_second).allow_burst(burst);
                Some(Arc::new(DefaultDirectRateLimiter::direct(quota)))
            }
            None => None,
        };

        Ok(Self {
            http_client,
            base_url,
            rate_limiter,
        })
    }

    /// Returns the gateway base URL.
    pub fn base_url(&self) -> &GatewayUrl {
        &self.base_url
    }

    /// GET a JSON document.
    pub async fn get<T>(&self, segments: &[&str]) -> ImportResult<T>
    where
        T: DeserializeOwned,
    {
        let response = self.send(Method::GET, segments, None::<&()>).await?;
        decode_json(response).await
    }

    /// GET a JSON array; a `null` body is an empty list.
    pub async fn get_list<T>(&self, segments: &[&str]) -> ImportResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let items: Option<Vec<T>> = self.get(segments).await?;
        Ok(items.unwrap_or_default())
    }

    /// GET a plain-text body (logs, YAML).
    pub async fn get_text(&self, segments: &[&str]) -> ImportResult<String> {
        let response = self.send(Method::GET, segments, None::<&()>).await?;
        response
            .text()
            .await
            .map_err(|e| ImportError::Decode(format!("Failed to read response body: {}", e)))
    }

    /// POST a JSON body, discarding the response body.
    pub async fn post<B>(&self, segments: &[&str], body: &B) -> ImportResult<()>
    where
        B: serde::Serialize,
    {
        self.send(Method::POST, segments, Some(body)).await?;
        Ok(())
    }

    /// POST without a body, discarding the response body.
    pub async fn post_empty(&self, segments: &[&str]) -> ImportResult<()> {
        self.send(Method::POST, segments, None::<&()>).await?;
        Ok(())
    }

    /// PUT a JSON body, discarding the response body.
    pub async fn put<B>(&self, segments: &[&str], body: &B) -> ImportResult<()>
    where
        B: serde::Serialize,
    {
        self.send(Method::PUT, segments, Some(body)).await?;
        Ok(())
    }

    /// DELETE a resource. The gateway answers `204 No Content`.
    pub async fn delete(&self, segments: &[&str]) -> ImportResult<()> {
        self.send(Method::DELETE, segments, None::<&()>).await?;
        Ok(())
    }

    /// Core request execution: rate limit, send, and map error statuses.
    async fn send<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ImportResult<Response>
    where
        B: serde::Serialize,
    {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }

        let url = self.base_url.endpoint(segments);
        debug!(%method, path = url.path(), "gateway request");

        let mut req_builder = self.http_client.request(method, url);
        if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        let response = req_builder
            .send()
            .await
            .map_err(|e| ImportError::Connection(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &text));
        }
        Ok(response)
    }
}

async fn decode_json<T>(response: Response) -> ImportResult<T>
where
    T: DeserializeOwned,
{
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ImportError::Decode(format!("Failed to read response body: {}", e)))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ImportError::Decode(format!("Failed to parse response: {}", e)))
}

/// Message precedence: `{error}` field, then the raw body, then the reason phrase.
fn api_error(status: StatusCode, body: &str) -> ImportError {
    let message = match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    };
    ImportError::Api {
        status: status.as_u16(),
        message,
    }
}
