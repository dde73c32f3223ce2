use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use restock_core::{ProductId, StockError, StockResult};

/// A product row in the stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub quantity: u64,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub expiry_date: Option<NaiveDate>,
}

/// Input shape for adding a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub quantity: u64,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub expiry_date: Option<NaiveDate>,
}

impl NewProduct {
    pub fn validate(&self) -> StockResult<()> {
        if self.name.trim().is_empty() {
            return Err(StockError::invalid_input("name cannot be empty"));
        }
        Ok(())
    }
}

/// Partial update for a single product row. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<u64>,
    pub price: Option<u64>,
    pub expiry_date: Option<NaiveDate>,
}

impl ProductPatch {
    pub fn validate(&self) -> StockResult<()> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(StockError::invalid_input("name cannot be empty"));
            }
        }
        Ok(())
    }
}
