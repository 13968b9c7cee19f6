//! Stockroom test utilities.
//!
//! Helpers for integration testing: test fixtures, mock builders,
//! and assertion utilities for inventory testing.

use chrono::NaiveDate;
use uuid::Uuid;

/// Create a test product with default values.
pub fn test_product(reference: &str, name: &str) -> TestProduct {
    TestProduct {
        id: Uuid::now_v7(),
        reference: reference.to_string(),
        name: name.to_string(),
        added_date: NaiveDate::from_ymd_opt(2025, 1, 15).unwrap_or_default(),
        status: "Available".to_string(),
        category_id: Uuid::now_v7(),
        price: 9.99,
        stock_city: Some("Paris".to_string()),
        supplier_id: Uuid::now_v7(),
        quantity: 10,
    }
}

/// A test product builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestProduct {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub added_date: NaiveDate,
    pub status: String,
    pub category_id: Uuid,
    pub price: f64,
    pub stock_city: Option<String>,
    pub supplier_id: Uuid,
    pub quantity: i32,
}

impl TestProduct {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Set the category.
    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the supplier.
    pub fn from_supplier(mut self, supplier_id: Uuid) -> Self {
        self.supplier_id = supplier_id;
        self
    }

    /// Set the price.
    pub fn priced(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    /// Set the stock quantity.
    pub fn with_quantity(mut self, quantity: i32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: &str) -> Self {
        self.status = status.to_string();
        self
    }

    /// Mark as out of stock.
    pub fn out_of_stock(mut self) -> Self {
        self.status = "Out of Stock".to_string();
        self.quantity = 0;
        self
    }

    /// Set the stock city.
    pub fn stocked_in(mut self, city: &str) -> Self {
        self.stock_city = Some(city.to_string());
        self
    }

    /// Set the added date.
    pub fn added_on(mut self, date: NaiveDate) -> Self {
        self.added_date = date;
        self
    }
}

/// Create a test category with default values.
pub fn test_category(name: &str) -> TestCategory {
    TestCategory {
        id: Uuid::now_v7(),
        name: name.to_string(),
        status: "active".to_string(),
    }
}

/// A test category builder.
#[derive(Debug, Clone)]
pub struct TestCategory {
    pub id: Uuid,
    pub name: String,
    pub status: String,
}

impl TestCategory {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Mark as deactivated.
    pub fn deactivated(mut self) -> Self {
        self.status = "deactive".to_string();
        self
    }
}

/// Create a test supplier with default values.
pub fn test_supplier(name: &str) -> TestSupplier {
    TestSupplier {
        id: Uuid::now_v7(),
        name: name.to_string(),
    }
}

/// A test supplier builder.
#[derive(Debug, Clone)]
pub struct TestSupplier {
    pub id: Uuid,
    pub name: String,
}

impl TestSupplier {
    /// Set a custom ID.
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }
}

/// Assertion helpers for JSON content.
pub mod assert {
    use serde_json::Value;

    /// Assert that a JSON value has a specific key.
    pub fn has_key(value: &Value, key: &str) {
        assert!(
            value.get(key).is_some(),
            "Expected JSON to have key '{}', got: {}",
            key,
            value
        );
    }

    /// Assert that a string contains a substring.
    pub fn contains(haystack: &str, needle: &str) {
        assert!(
            haystack.contains(needle),
            "Expected string to contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }

    /// Assert that a string does not contain a substring.
    pub fn not_contains(haystack: &str, needle: &str) {
        assert!(
            !haystack.contains(needle),
            "Expected string to NOT contain '{}'\nActual: {}",
            needle,
            haystack
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_builder() {
        let product = test_product("PROD-2025-01-0001", "Steel Bolts")
            .priced(4.50)
            .with_quantity(200)
            .stocked_in("Lyon");

        assert_eq!(product.reference, "PROD-2025-01-0001");
        assert_eq!(product.name, "Steel Bolts");
        assert_eq!(product.price, 4.50);
        assert_eq!(product.quantity, 200);
        assert_eq!(product.stock_city.as_deref(), Some("Lyon"));
        assert_eq!(product.status, "Available");
    }

    #[test]
    fn test_out_of_stock_product() {
        let product = test_product("PROD-2025-01-0002", "Copper Wire").out_of_stock();

        assert_eq!(product.status, "Out of Stock");
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn test_category_builder() {
        let category = test_category("Hardware").deactivated();

        assert_eq!(category.name, "Hardware");
        assert_eq!(category.status, "deactive");
    }

    #[test]
    fn test_supplier_builder() {
        let id = Uuid::now_v7();
        let supplier = test_supplier("Acme Industrial").with_id(id);

        assert_eq!(supplier.name, "Acme Industrial");
        assert_eq!(supplier.id, id);
    }

    #[test]
    fn test_assertions() {
        let json = serde_json::json!({"reference": "PROD-2025-01-0001"});
        assert::has_key(&json, "reference");

        assert::contains("hello world", "world");
        assert::not_contains("hello world", "foo");
    }
}
