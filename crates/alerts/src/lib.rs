//! Low-stock alerting: the pure threshold policy, the deduplicated
//! notification store, and the outbound delivery seam.

pub mod delivery;
pub mod policy;
pub mod store;

pub use delivery::{AlertDelivery, NoopDelivery};
pub use policy::{AlertDecision, LOW_STOCK_THRESHOLD, decide, render_message};
pub use store::{Alert, NotificationStore};
