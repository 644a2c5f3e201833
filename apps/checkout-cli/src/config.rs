//! # Configuration
//!
//! Where the catalog and offer documents live.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command-line flags (`--products-file`, `--offers-file`)
//! 2. Environment variables (`CHECKOUT_*`)
//! 3. Defaults (the `data/` directory shipped with this crate)
//!
//! Configuration is read-only after startup.

use std::env;
use std::path::PathBuf;

/// Environment variable overriding the products document path.
pub const PRODUCTS_PATH_VAR: &str = "CHECKOUT_PRODUCTS_PATH";

/// Environment variable overriding the special offers document path.
pub const OFFERS_PATH_VAR: &str = "CHECKOUT_OFFERS_PATH";

const DEFAULT_PRODUCTS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/products.json");
const DEFAULT_OFFERS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data/special_offers.json");

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Products JSON document.
    pub products_path: PathBuf,

    /// Special offers JSON document.
    pub offers_path: PathBuf,
}

impl CheckoutConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = |key: &'static str, default: &str| match lookup(key) {
            Some(value) if value.trim().is_empty() => Err(ConfigError::InvalidValue(key)),
            Some(value) => Ok(PathBuf::from(value)),
            None => Ok(PathBuf::from(default)),
        };

        Ok(CheckoutConfig {
            products_path: path(PRODUCTS_PATH_VAR, DEFAULT_PRODUCTS_PATH)?,
            offers_path: path(OFFERS_PATH_VAR, DEFAULT_OFFERS_PATH)?,
        })
    }

    /// Applies command-line overrides on top of the loaded values.
    pub fn with_overrides(
        mut self,
        products_path: Option<PathBuf>,
        offers_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = products_path {
            self.products_path = path;
        }
        if let Some(path) = offers_path {
            self.offers_path = path;
        }
        self
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: must not be empty")]
    InvalidValue(&'static str),
}
