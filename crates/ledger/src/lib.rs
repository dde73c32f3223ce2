//! Stock ledger domain module.
//!
//! The authoritative mapping of product → quantity/price, plus the append-only
//! sale history. Multi-row sale commits are all-or-nothing; quantities can
//! never go negative, even under concurrent commits.

pub mod ledger;
pub mod product;
pub mod record;

pub use ledger::{CommittedStock, LineItem, Reservation, StockLedger};
pub use product::{NewProduct, Product, ProductPatch};
pub use record::SaleRecord;
