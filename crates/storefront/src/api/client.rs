//! HTTP implementation of the marketplace API.

use std::sync::Arc;

use async_trait::async_trait;
use facet_core::AddressId;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use super::addresses::AddressList;
use super::errors::extract_error_message;
use super::orders::interpret_order_response;
use super::{Address, AddressApi, AddressInput, ApiError, OrderApi, OrderRequest, PlacedOrder};
use crate::config::ApiConfig;

/// Header carrying a per-request correlation ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Client for the marketplace REST API.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    /// Base URL, always ending in `/` so relative joins keep its path.
    base_url: Url,
    /// Bearer token of the signed-in shopper.
    token: Option<SecretString>,
}

impl MarketplaceClient {
    /// Create a client from API configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the underlying HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                base_url,
                token: config.token.clone(),
            }),
        })
    }

    /// Resolve an API path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Start a request with auth and correlation headers.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%method, %url, %request_id, "Marketplace API request");

        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);
        if let Some(token) = &self.inner.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        Ok(builder)
    }

    /// Send a request and return the response body for a success status.
    async fn send(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited(retry_after(&response)));
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Marketplace API returned non-success status"
            );
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| extract_error_message(&value));
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(body)
    }

    /// Send a request and parse a JSON success body.
    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(builder).await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse marketplace API response"
            );
            ApiError::Parse(e)
        })
    }
}

/// Seconds to wait before retrying, from the `Retry-After` header.
fn retry_after(response: &Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl AddressApi for MarketplaceClient {
    #[instrument(skip(self))]
    async fn list_addresses(&self) -> Result<Vec<Address>, ApiError> {
        let request = self.request(Method::GET, "/api/addresses")?;
        let list: AddressList = self.send_json(request).await?;
        Ok(list.into())
    }

    #[instrument(skip(self, input), fields(city = %input.city))]
    async fn create_address(&self, input: &AddressInput) -> Result<Address, ApiError> {
        let request = self.request(Method::POST, "/api/addresses")?.json(input);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, &format!("/api/addresses/{id}"))?;
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl OrderApi for MarketplaceClient {
    #[instrument(skip(self, request), fields(payment_method = %request.payment_method))]
    async fn place_order(&self, request: &OrderRequest) -> Result<PlacedOrder, ApiError> {
        let builder = self.request(Method::POST, "/api/orders/")?.json(request);
        let body = self.send(builder).await?;

        // Some deployments answer 201 with an empty body
        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&body)?
        };

        interpret_order_response(&value)
    }
}
