//! Outbound alert delivery seam.

use crate::store::Alert;

/// Outbound delivery channel for newly asserted alerts (e.g., SMS).
///
/// Invoked fire-and-forget after the alert is already persisted: a delivery
/// failure never affects the transaction outcome or the stored alert, and
/// implementations must not block the caller on network work.
pub trait AlertDelivery: Send + Sync {
    fn deliver(&self, alert: &Alert);
}

/// Delivery channel that drops everything (tests, local dev).
#[derive(Debug, Default)]
pub struct NoopDelivery;

impl AlertDelivery for NoopDelivery {
    fn deliver(&self, _alert: &Alert) {}
}
