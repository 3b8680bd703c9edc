use serde::de::DeserializeOwned;
use tracing::debug;

use crate::model::{Collection, CollectionList, Item, ItemPage};

/// Items fetched per page; one page covers a whole collection in practice.
pub const ITEM_PAGE_LIMIT: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    Http(String),
    Status { status: u16, url: String },
    Decode { url: String, message: String },
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Http(msg) => write!(f, "catalog request failed: {msg}"),
            CatalogError::Status { status, url } => {
                write!(f, "catalog returned {status} for {url}")
            }
            CatalogError::Decode { url, message } => {
                write!(f, "catalog response for {url} did not parse: {message}")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// Read-only client for the imagery catalog's STAC endpoints.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http: reqwest::Client,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_collections(&self) -> Result<CollectionList, CatalogError> {
        self.get_json(self.collections_url()).await
    }

    pub async fn collection(&self, collection_id: &str) -> Result<Collection, CatalogError> {
        self.get_json(self.collection_url(collection_id)).await
    }

    pub async fn list_items(&self, collection_id: &str) -> Result<ItemPage, CatalogError> {
        self.get_json(self.items_url(collection_id)).await
    }

    pub async fn item(&self, collection_id: &str, item_id: &str) -> Result<Item, CatalogError> {
        self.get_json(self.item_url(collection_id, item_id)).await
    }

    fn collections_url(&self) -> String {
        format!("{}/collections", self.base_url)
    }

    fn collection_url(&self, collection_id: &str) -> String {
        format!("{}/collections/{collection_id}", self.base_url)
    }

    fn items_url(&self, collection_id: &str) -> String {
        format!(
            "{}/collections/{collection_id}/items?limit={ITEM_PAGE_LIMIT}",
            self.base_url
        )
    }

    fn item_url(&self, collection_id: &str, item_id: &str) -> String {
        format!("{}/collections/{collection_id}/items/{item_id}", self.base_url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: String) -> Result<T, CatalogError> {
        debug!("catalog GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Http(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(CatalogError::Status { status: status.as_u16(), url });
        }
        resp.json::<T>()
            .await
            .map_err(|e| CatalogError::Decode { url, message: e.to_string() })
    }
}
