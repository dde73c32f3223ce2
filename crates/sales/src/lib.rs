//! Sale transaction coordination.
//!
//! The coordinator is a stateless orchestrator: it validates a multi-line-item
//! sale against the stock ledger, commits all deductions atomically, and then
//! keeps the notification store in step with the post-commit stock levels.
//! The same alert pass runs after every manual stock mutation.

pub mod coordinator;

pub use coordinator::{SaleCoordinator, SaleOutcome};
