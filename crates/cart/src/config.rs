//! Environment-driven configuration.

use std::path::PathBuf;

use crate::storage::{self, DEFAULT_CART_KEY, FileStore};

pub const DEFAULT_API_URL: &str = "http://localhost:3333";

/// Where the catalog lives and where the cart is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    pub api_url: String,
    /// `None` means the OS data directory.
    pub storage_dir: Option<PathBuf>,
    pub cart_key: String,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: None,
            cart_key: DEFAULT_CART_KEY.to_string(),
        }
    }
}

impl CartConfig {
    /// Read `ROCKETSHOES_API_URL`, `ROCKETSHOES_STORAGE_DIR` and
    /// `ROCKETSHOES_CART_KEY`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let api_url = lookup("ROCKETSHOES_API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| {
                tracing::info!("ROCKETSHOES_API_URL not set; using {}", DEFAULT_API_URL);
                defaults.api_url
            });

        let storage_dir = lookup("ROCKETSHOES_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let cart_key = lookup("ROCKETSHOES_CART_KEY")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.cart_key);

        Self {
            api_url,
            storage_dir,
            cart_key,
        }
    }

    /// Open the file-backed store this configuration points at.
    pub fn open_store(&self) -> anyhow::Result<FileStore> {
        let dir = match &self.storage_dir {
            Some(dir) => dir.clone(),
            None => storage::default_storage_dir()?,
        };
        FileStore::open(dir)
    }
}
