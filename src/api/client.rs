//! HTTP implementation of [`ProductStore`] over the catalog REST API.
//!
//! ```text
//! GET    /productos                         list
//! GET    /productos/{id}                    fetch one
//! POST   /productos                         create
//! PUT    /productos/{id}                    update
//! DELETE /productos/{id}                    delete
//! GET    /productos/inventario/resumen      inventory summary
//! GET    /productos/combinaciones/{budget}  combination search
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use super::error::{FieldErrors, StoreError};
use super::store::ProductStore;
use super::types::{ApiErrorBody, Combination, InventorySummary, Product, ProductId, ProductInput};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`HttpProductStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

pub struct HttpProductStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProductStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Config(e.to_string()))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");
        self.client.request(method, url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        debug!("Catalog API response status: {}", response.status());

        if response.status().is_success() {
            return Ok(response);
        }
        Err(error_from_response(response).await)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = self.send(request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

/// Maps a non-2xx response onto the error taxonomy.
///
/// 404 is always `NotFound`. A body with a non-empty `errors` map is a
/// `Validation` error; anything else is a `Server` error, keeping the
/// backend's `message` when one parses.
async fn error_from_response(response: Response) -> StoreError {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return StoreError::NotFound;
    }

    let text = response.text().await.unwrap_or_default();
    warn!("Catalog API error: {} - {}", status.as_u16(), text);

    let body: ApiErrorBody = serde_json::from_str(&text).unwrap_or_default();
    match body.errors {
        Some(errors) if !errors.is_empty() => StoreError::Validation {
            message: body
                .message
                .unwrap_or_else(|| format!("request rejected (HTTP {})", status.as_u16())),
            fields: FieldErrors::from(errors),
        },
        _ => StoreError::Server {
            status: status.as_u16(),
            message: body.message.filter(|m| !m.trim().is_empty()),
        },
    }
}

#[async_trait]
impl ProductStore for HttpProductStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.fetch(self.request(Method::GET, "/productos")).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.fetch(self.request(Method::GET, &format!("/productos/{id}")))
            .await
    }

    async fn create_product(&self, input: &ProductInput) -> Result<Product, StoreError> {
        self.fetch(self.request(Method::POST, "/productos").json(input))
            .await
    }

    async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
    ) -> Result<Product, StoreError> {
        self.fetch(
            self.request(Method::PUT, &format!("/productos/{id}"))
                .json(input),
        )
        .await
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.send(self.request(Method::DELETE, &format!("/productos/{id}")))
            .await
            .map(|_| ())
    }

    async fn inventory_summary(&self) -> Result<InventorySummary, StoreError> {
        self.fetch(self.request(Method::GET, "/productos/inventario/resumen"))
            .await
    }

    async fn search_combinations(&self, max_budget: f64) -> Result<Vec<Combination>, StoreError> {
        if !max_budget.is_finite() || max_budget <= 0.0 {
            let mut fields = FieldErrors::new();
            fields.insert("valorMaximo", "must be greater than 0");
            return Err(StoreError::Validation {
                message: format!("invalid budget: {max_budget}"),
                fields,
            });
        }
        self.fetch(self.request(
            Method::GET,
            &format!("/productos/combinaciones/{max_budget}"),
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpProductStore::new(&StoreConfig {
            base_url: "http://example.test/api/".into(),
            timeout: DEFAULT_TIMEOUT,
        })
        .unwrap();
        assert_eq!(store.base_url(), "http://example.test/api");
    }

    #[tokio::test]
    async fn test_non_positive_budget_rejected_before_request() {
        let store = HttpProductStore::new(&StoreConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_millis(50),
        })
        .unwrap();
        let err = store.search_combinations(0.0).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
        let err = store.search_combinations(f64::NAN).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation { .. }));
    }
}
