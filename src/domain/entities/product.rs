//! # Catalog Entries
//!
//! Products and categories as seen by the negotiation core. Both are owned
//! by the catalog store and are read-only here.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{CategoryId, Price, ProductId, UserId};
use serde::{Deserialize, Serialize};

/// A product category. Categories may nest through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    description: String,
    parent_id: Option<CategoryId>,
}

impl Category {
    /// Creates a top-level category.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new_v4(),
            name: name.into(),
            description: description.into(),
            parent_id: None,
        }
    }

    /// Sets the parent category.
    #[must_use]
    pub fn with_parent(mut self, parent_id: CategoryId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Returns the category ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CategoryId {
        self.id
    }

    /// Returns the category name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the parent category, if any.
    #[inline]
    #[must_use]
    pub fn parent_id(&self) -> Option<CategoryId> {
        self.parent_id
    }
}

/// A product listed by a supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    supplier_id: UserId,
    category_id: CategoryId,
    name: String,
    price: Price,
    stock_quantity: u64,
    min_order_quantity: u64,
}

impl Product {
    /// Creates a product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidQuantity` if `min_order_quantity` is zero.
    pub fn new(
        supplier_id: UserId,
        category_id: CategoryId,
        name: impl Into<String>,
        price: Price,
        stock_quantity: u64,
        min_order_quantity: u64,
    ) -> DomainResult<Self> {
        if min_order_quantity == 0 {
            return Err(DomainError::InvalidQuantity(
                "minimum order quantity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            id: ProductId::new_v4(),
            supplier_id,
            category_id,
            name: name.into(),
            price,
            stock_quantity,
            min_order_quantity,
        })
    }

    /// Returns the product ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// Returns the owning supplier.
    #[inline]
    #[must_use]
    pub fn supplier_id(&self) -> UserId {
        self.supplier_id
    }

    /// Returns the category.
    #[inline]
    #[must_use]
    pub fn category_id(&self) -> CategoryId {
        self.category_id
    }

    /// Returns the product name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the list price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Price {
        self.price
    }

    /// Returns units in stock.
    #[inline]
    #[must_use]
    pub fn stock_quantity(&self) -> u64 {
        self.stock_quantity
    }

    /// Returns the minimum order quantity.
    #[inline]
    #[must_use]
    pub fn min_order_quantity(&self) -> u64 {
        self.min_order_quantity
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn zero_minimum_order_is_rejected() {
        let category = Category::new("Chemicals", "");
        let result = Product::new(
            UserId::new_v4(),
            category.id(),
            "Ethanol",
            Price::new(Decimal::ONE).unwrap(),
            100,
            0,
        );
        assert!(matches!(result, Err(DomainError::InvalidQuantity(_))));
    }

    #[test]
    fn subcategory_keeps_parent() {
        let parent = Category::new("Hardware", "Tools and fasteners");
        let child = Category::new("Fasteners", "").with_parent(parent.id());
        assert_eq!(child.parent_id(), Some(parent.id()));
    }
}
