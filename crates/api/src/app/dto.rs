use chrono::NaiveDate;
use serde::Deserialize;

use restock_core::ProductId;
use restock_ledger::{LineItem, NewProduct, ProductPatch};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub name: String,
    pub quantity: u64,
    /// Price in smallest currency unit (e.g., cents).
    pub price: u64,
    pub expiry_date: Option<NaiveDate>,
}

impl AddProductRequest {
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            expiry_date: self.expiry_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub quantity: Option<u64>,
    pub price: Option<u64>,
    pub expiry_date: Option<NaiveDate>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> ProductPatch {
        ProductPatch {
            name: self.name,
            quantity: self.quantity,
            price: self.price,
            expiry_date: self.expiry_date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustQuantityRequest {
    pub quantity_change: i64,
}

#[derive(Debug, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: u64,
    pub quantity: u64,
}

impl SaleLineRequest {
    pub fn into_line_item(self) -> LineItem {
        LineItem {
            product_id: ProductId::new(self.product_id),
            quantity: self.quantity,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSaleRequest {
    pub products: Vec<SaleLineRequest>,
}
