//! HTTP client for the remote catalog API.
//!
//! Two endpoints exist: `GET {base_url}/products` for the full catalog and
//! `GET {base_url}/products/{id}` for a single product. Fetches are
//! fire-once with no retry; the caller decides how to surface failures.

use reqwest::blocking::Client;
use thiserror::Error;

use crate::product::Product;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The product identifier was missing or not a number. Detected before
    /// any request is made.
    #[error("invalid product identifier")]
    InvalidIdentifier,
    /// The detail endpoint returned a non-success status or the request
    /// itself failed.
    #[error("product not found")]
    NotFound,
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Parse a raw product identifier. A missing or malformed id is an
/// `InvalidIdentifier`, reported without touching the network.
pub fn parse_product_id(raw: Option<&str>) -> Result<i64, CatalogError> {
    let raw = raw.ok_or(CatalogError::InvalidIdentifier)?;
    raw.trim()
        .parse()
        .map_err(|_| CatalogError::InvalidIdentifier)
}

pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full catalog.
    pub fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let url = format!("{}/products", self.base_url);
        let response = self.http.get(&url).send()?.error_for_status()?;
        Ok(response.json()?)
    }

    /// Fetch one product by id. Any non-success status and any transport
    /// failure collapse to `NotFound`: the caller renders the same
    /// recovery path for both.
    pub fn fetch_product(&self, id: i64) -> Result<Product, CatalogError> {
        let url = format!("{}/products/{}", self.base_url, id);
        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|_| CatalogError::NotFound)?;
        if !response.status().is_success() {
            return Err(CatalogError::NotFound);
        }
        response.json().map_err(|_| CatalogError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_id_accepts_numbers() {
        assert_eq!(parse_product_id(Some("7")).unwrap(), 7);
        assert_eq!(parse_product_id(Some(" 42 ")).unwrap(), 42);
    }

    #[test]
    fn test_parse_product_id_rejects_missing() {
        assert!(matches!(
            parse_product_id(None),
            Err(CatalogError::InvalidIdentifier)
        ));
    }

    #[test]
    fn test_parse_product_id_rejects_malformed() {
        for raw in ["", "abc", "12x", "1.5"] {
            assert!(
                matches!(
                    parse_product_id(Some(raw)),
                    Err(CatalogError::InvalidIdentifier)
                ),
                "{:?} should be invalid",
                raw
            );
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_stripped() {
        let client = CatalogClient::new("http://127.0.0.1:9/api/");
        assert_eq!(client.base_url(), "http://127.0.0.1:9/api");
    }
}
