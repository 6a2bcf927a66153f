use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::id::ProductId;

/// Product record as served by the catalog API (`GET products/{id}`).
///
/// Fields this crate does not interpret are kept in `extra` so they survive
/// a trip through the durable store untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Product {
    pub fn new(id: ProductId, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            image: String::new(),
            extra: Map::new(),
        }
    }
}

/// Stock ceiling for a product (`GET stock/{id}`).
///
/// Owned by the remote service; fetched fresh for every cart operation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}
