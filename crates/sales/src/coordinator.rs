use std::sync::Arc;

use serde::Serialize;

use restock_alerts::{AlertDecision, AlertDelivery, NotificationStore, decide};
use restock_core::{ProductId, StockError, StockResult};
use restock_ledger::{LineItem, NewProduct, Product, ProductPatch, StockLedger};

/// Result of a committed sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaleOutcome {
    /// Total charged, in smallest currency units: Σ(price snapshot × qty).
    pub total_price: u64,
}

/// Orchestrates multi-line-item sales and keeps the notification store in
/// step with every stock mutation.
///
/// Holds no persistent state of its own; both stores are shared.
pub struct SaleCoordinator {
    ledger: Arc<StockLedger>,
    notifications: Arc<NotificationStore>,
    delivery: Arc<dyn AlertDelivery>,
}

impl SaleCoordinator {
    pub fn new(
        ledger: Arc<StockLedger>,
        notifications: Arc<NotificationStore>,
        delivery: Arc<dyn AlertDelivery>,
    ) -> Self {
        Self {
            ledger,
            notifications,
            delivery,
        }
    }

    /// Execute a multi-line-item sale with all-or-nothing semantics.
    ///
    /// Validation and reservation never mutate; no side effect is observable
    /// unless the commit fully succeeds. The alert pass afterwards is
    /// best-effort and never rolls the committed sale back.
    pub fn execute_sale(&self, lines: &[LineItem]) -> StockResult<SaleOutcome> {
        validate_lines(lines)?;

        let reservation = self.ledger.try_reserve(lines)?;
        let total_price = reservation.total_price();

        let affected = self.ledger.commit(reservation)?;
        tracing::info!(
            lines = lines.len(),
            products = affected.len(),
            total_price,
            "sale committed"
        );

        for stock in &affected {
            self.apply_alert(stock.product_id, &stock.product_name, stock.quantity);
        }

        Ok(SaleOutcome { total_price })
    }

    pub fn add_product(&self, new: NewProduct) -> StockResult<Product> {
        let product = self.ledger.add_product(new)?;
        self.apply_alert(product.id, &product.name, product.quantity);
        Ok(product)
    }

    pub fn edit_product(&self, id: ProductId, patch: ProductPatch) -> StockResult<Product> {
        let product = self.ledger.edit_product(id, patch)?;
        self.apply_alert(product.id, &product.name, product.quantity);
        Ok(product)
    }

    pub fn set_quantity(&self, id: ProductId, quantity: u64) -> StockResult<Product> {
        let product = self.ledger.set_quantity(id, quantity)?;
        self.apply_alert(product.id, &product.name, product.quantity);
        Ok(product)
    }

    pub fn adjust_quantity(&self, id: ProductId, delta: i64) -> StockResult<Product> {
        let product = self.ledger.adjust_quantity(id, delta)?;
        self.apply_alert(product.id, &product.name, product.quantity);
        Ok(product)
    }

    /// Delete a product and retract any alert referencing it.
    pub fn delete_product(&self, id: ProductId) -> StockResult<Product> {
        let removed = self.ledger.delete_product(id)?;
        match self.notifications.retract(id) {
            Ok(n) if n > 0 => {
                tracing::info!(product = %removed.name, "retracted alerts for deleted product");
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(product_id = %id, %err, "alert retraction failed after delete");
            }
        }
        Ok(removed)
    }

    /// Bring the alert feed in line with current stock levels: assert for
    /// every product at or below the threshold, retract for the rest. Run
    /// once at startup.
    pub fn reconcile_alerts(&self) -> StockResult<()> {
        for product in self.ledger.list()? {
            self.apply_alert(product.id, &product.name, product.quantity);
        }
        Ok(())
    }

    /// Drive the alert policy for one product's post-mutation quantity.
    ///
    /// Failures here are logged and swallowed: alerting is best-effort, the
    /// enclosing mutation has already committed.
    fn apply_alert(&self, product_id: ProductId, product_name: &str, quantity: u64) {
        let result = match decide(product_name, quantity) {
            AlertDecision::Assert { message } => {
                self.notifications
                    .assert_alert(product_id, message)
                    .map(|created| {
                        if let Some(alert) = created {
                            self.delivery.deliver(&alert);
                        }
                    })
            }
            AlertDecision::Retract => self.notifications.retract(product_id).map(|_| ()),
        };

        if let Err(err) = result {
            tracing::warn!(%product_id, %err, "notification store update failed");
        }
    }
}

fn validate_lines(lines: &[LineItem]) -> StockResult<()> {
    if lines.is_empty() {
        return Err(StockError::invalid_input(
            "products must be a non-empty array",
        ));
    }
    for line in lines {
        if line.product_id.as_u64() == 0 {
            return Err(StockError::invalid_input(
                "productId must be a positive integer",
            ));
        }
        if line.quantity == 0 {
            return Err(StockError::invalid_input(
                "quantity must be a positive integer",
            ));
        }
    }
    Ok(())
}
