//! # Catalog Port
//!
//! Read-only access to products and categories.

use crate::domain::entities::{Category, Product};
use crate::domain::value_objects::{CategoryId, ProductId, UserId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for catalog lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The product or category does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Type of entry.
        entity_type: &'static str,
        /// Entry identifier.
        id: String,
    },

    /// The catalog backend could not be reached.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}

impl CatalogError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for catalog lookups.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Product and category lookups.
#[async_trait]
pub trait CatalogStore: Send + Sync + fmt::Debug {
    /// Resolves a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product does not exist.
    async fn resolve_product(&self, id: &ProductId) -> CatalogResult<Product>;

    /// Resolves a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the category does not exist.
    async fn resolve_category(&self, id: &CategoryId) -> CatalogResult<Category>;

    /// Counts all products.
    async fn count_products(&self) -> CatalogResult<u64>;

    /// Counts the products listed by a supplier.
    async fn count_products_by_supplier(&self, supplier_id: &UserId) -> CatalogResult<u64>;
}
