use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Product metadata, keyed by EAN and owned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub ean: String,
    pub name: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    /// Whether the server found metadata for this EAN in its lookup source.
    #[serde(default)]
    pub resolved: bool,
}

/// One product line in the current stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryEntry {
    pub id: i64,
    pub product: Product,
    pub quantity: u32,
    pub expiry_date: Option<NaiveDate>,
    pub low_stock_threshold: u32,
}

impl InventoryEntry {
    /// Same rule the server uses to raise a `low_stock` alert.
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.low_stock_threshold
    }
}

/// Body for `POST /inventory`.
///
/// `expiry_date` is always written; an omitted date goes out as `null`,
/// which the server treats the same as a missing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddInventoryRequest {
    pub ean: String,
    pub expiry_date: Option<NaiveDate>,
}

/// Body for `PATCH /products/{ean}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: String,
    pub category: Option<String>,
}

impl UpdateProductRequest {
    pub fn validate(&self) -> Result<(), crate::error::ApiError> {
        if self.name.trim().is_empty() {
            return Err(crate::error::ApiError::new(
                "INVALID_PRODUCT",
                "name must not be empty",
            ));
        }
        Ok(())
    }
}

/// True for EAN-8 and EAN-13 codes: exactly 8 or 13 ASCII digits.
pub fn is_valid_ean(ean: &str) -> bool {
    matches!(ean.len(), 8 | 13) && ean.bytes().all(|b| b.is_ascii_digit())
}
