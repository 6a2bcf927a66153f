//! Read-only lookups against the storefront catalog API.

use async_trait::async_trait;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;

/// Product and stock lookups the cart depends on.
///
/// Both calls are read-only; the cart never writes to the catalog.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// `GET stock/{id}`
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError>;

    /// `GET products/{id}`
    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError>;
}

#[async_trait]
impl<C> CatalogApi for std::sync::Arc<C>
where
    C: CatalogApi + ?Sized,
{
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        (**self).stock(product_id).await
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        (**self).product(product_id).await
    }
}

/// HTTP client for the catalog API.
#[derive(Debug, Clone)]
pub struct HttpCatalogApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "catalog request");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Api(status.as_u16(), resp.text().await.unwrap_or_default()));
        }

        resp.json().await.map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogApi {
    async fn stock(&self, product_id: ProductId) -> Result<Stock, ApiError> {
        self.get_json(&format!("stock/{}", product_id)).await
    }

    async fn product(&self, product_id: ProductId) -> Result<Product, ApiError> {
        self.get_json(&format!("products/{}", product_id)).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}
