//! Low-stock alert policy.
//!
//! Pure decision logic: given a product's **post**-mutation quantity, decide
//! whether its alert should be asserted or retracted.

/// Inclusive quantity threshold at or below which a product counts as low.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

/// Outcome of evaluating a product's post-mutation quantity.
///
/// Above the threshold the policy always retracts; retracting when no alert
/// is live is itself a no-op, so no separate idle arm is needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertDecision {
    /// Assert a low-stock alert carrying the rendered message.
    Assert { message: String },
    /// Retract any live alert for the product.
    Retract,
}

/// Decide whether `quantity` warrants a low-stock alert for `product_name`.
pub fn decide(product_name: &str, quantity: u64) -> AlertDecision {
    if quantity <= LOW_STOCK_THRESHOLD {
        AlertDecision::Assert {
            message: render_message(product_name, quantity),
        }
    } else {
        AlertDecision::Retract
    }
}

/// Render the human-readable alert text.
///
/// Kept for compatibility with the existing notification feed; alert identity
/// is the product id, never this text.
pub fn render_message(product_name: &str, quantity: u64) -> String {
    format!("Low Stock Alert: \"{product_name}\" has only {quantity} left. Please restock.")
}
