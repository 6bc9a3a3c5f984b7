//! # In-Memory Catalog
//!
//! In-memory implementation of [`CatalogStore`].

use crate::domain::entities::{Category, Product};
use crate::domain::value_objects::{CategoryId, ProductId, UserId};
use crate::infrastructure::catalog::traits::{CatalogError, CatalogResult, CatalogStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct CatalogState {
    categories: HashMap<CategoryId, Category>,
    products: HashMap<ProductId, Product>,
}

/// In-memory implementation of [`CatalogStore`].
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a category.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the parent category is unknown.
    pub async fn insert_category(&self, category: Category) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        if let Some(parent_id) = category
            .parent_id()
            .filter(|parent_id| !state.categories.contains_key(parent_id))
        {
            return Err(CatalogError::not_found("Category", parent_id.to_string()));
        }
        state.categories.insert(category.id(), category);
        Ok(())
    }

    /// Adds or replaces a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if the product's category is unknown.
    pub async fn insert_product(&self, product: Product) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        if !state.categories.contains_key(&product.category_id()) {
            return Err(CatalogError::not_found(
                "Category",
                product.category_id().to_string(),
            ));
        }
        state.products.insert(product.id(), product);
        Ok(())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn resolve_product(&self, id: &ProductId) -> CatalogResult<Product> {
        let state = self.state.read().await;
        state
            .products
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Product", id.to_string()))
    }

    async fn resolve_category(&self, id: &CategoryId) -> CatalogResult<Category> {
        let state = self.state.read().await;
        state
            .categories
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Category", id.to_string()))
    }

    async fn count_products(&self) -> CatalogResult<u64> {
        let state = self.state.read().await;
        Ok(state.products.len() as u64)
    }

    async fn count_products_by_supplier(&self, supplier_id: &UserId) -> CatalogResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .products
            .values()
            .filter(|product| product.supplier_id() == *supplier_id)
            .count() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Price;
    use rust_decimal::Decimal;

    fn product(supplier_id: UserId, category_id: CategoryId) -> Product {
        Product::new(
            supplier_id,
            category_id,
            "Steel bolts",
            Price::new(Decimal::new(25, 2)).unwrap(),
            10_000,
            100,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn resolves_inserted_entries() {
        let catalog = InMemoryCatalog::new();
        let category = Category::new("Hardware", "");
        catalog.insert_category(category.clone()).await.unwrap();
        let item = product(UserId::new_v4(), category.id());
        catalog.insert_product(item.clone()).await.unwrap();

        assert_eq!(catalog.resolve_product(&item.id()).await.unwrap(), item);
        assert_eq!(
            catalog.resolve_category(&category.id()).await.unwrap(),
            category
        );
    }

    #[tokio::test]
    async fn missing_product_is_not_found() {
        let catalog = InMemoryCatalog::new();
        let err = catalog
            .resolve_product(&ProductId::new_v4())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn product_requires_known_category() {
        let catalog = InMemoryCatalog::new();
        let err = catalog
            .insert_product(product(UserId::new_v4(), CategoryId::new_v4()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let orphan = Category::new("Fasteners", "").with_parent(CategoryId::new_v4());
        assert!(catalog.insert_category(orphan).await.is_err());
    }

    #[tokio::test]
    async fn counts_by_supplier() {
        let catalog = InMemoryCatalog::new();
        let category = Category::new("Hardware", "");
        catalog.insert_category(category.clone()).await.unwrap();
        let supplier = UserId::new_v4();
        catalog
            .insert_product(product(supplier, category.id()))
            .await
            .unwrap();
        catalog
            .insert_product(product(supplier, category.id()))
            .await
            .unwrap();
        catalog
            .insert_product(product(UserId::new_v4(), category.id()))
            .await
            .unwrap();

        assert_eq!(catalog.count_products().await.unwrap(), 3);
        assert_eq!(
            catalog.count_products_by_supplier(&supplier).await.unwrap(),
            2
        );
    }
}
