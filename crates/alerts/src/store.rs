use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use restock_core::{AlertId, ProductId, StockError, StockResult};

/// A live low-stock notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub id: AlertId,
    pub product_id: ProductId,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct StoreState {
    alerts: Vec<Alert>,
    next_id: u64,
}

/// Deduplicated set of live alerts, at most one per product.
///
/// All operations run behind one `Mutex`, so the check-then-insert in
/// [`NotificationStore::assert_alert`] cannot race with a concurrent assert
/// for the same product.
#[derive(Debug, Default)]
pub struct NotificationStore {
    inner: Mutex<StoreState>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StockResult<MutexGuard<'_, StoreState>> {
        self.inner
            .lock()
            .map_err(|_| StockError::fatal("notification store lock poisoned"))
    }

    /// Insert or refresh the live alert for `product_id`.
    ///
    /// Returns the alert to hand to delivery when the stored message changed
    /// (a brand new alert, or an existing one re-rendered with a new
    /// quantity). Re-asserting an identical message is a no-op and returns
    /// `None`.
    pub fn assert_alert(
        &self,
        product_id: ProductId,
        message: impl Into<String>,
    ) -> StockResult<Option<Alert>> {
        let message = message.into();
        let mut state = self.lock()?;

        if let Some(existing) = state.alerts.iter_mut().find(|a| a.product_id == product_id) {
            if existing.message == message {
                return Ok(None);
            }
            existing.message = message;
            existing.created_at = Utc::now();
            return Ok(Some(existing.clone()));
        }

        state.next_id += 1;
        let alert = Alert {
            id: AlertId::new(state.next_id),
            product_id,
            message,
            created_at: Utc::now(),
        };
        state.alerts.push(alert.clone());
        Ok(Some(alert))
    }

    /// Remove every live alert for `product_id`; returns how many went away.
    pub fn retract(&self, product_id: ProductId) -> StockResult<usize> {
        let mut state = self.lock()?;
        let before = state.alerts.len();
        state.alerts.retain(|a| a.product_id != product_id);
        Ok(before - state.alerts.len())
    }

    /// Live alerts, newest first, one row per distinct message text.
    ///
    /// Grouping keeps the earliest id and the latest timestamp per message,
    /// matching the grouped feed the notification UI consumes.
    pub fn list(&self) -> StockResult<Vec<Alert>> {
        let state = self.lock()?;
        let mut grouped: Vec<Alert> = Vec::new();
        for alert in &state.alerts {
            match grouped.iter_mut().find(|g| g.message == alert.message) {
                Some(g) => {
                    if alert.id < g.id {
                        g.id = alert.id;
                    }
                    if alert.created_at > g.created_at {
                        g.created_at = alert.created_at;
                    }
                }
                None => grouped.push(alert.clone()),
            }
        }
        grouped.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(raw: u64) -> ProductId {
        ProductId::new(raw)
    }

    #[test]
    fn assert_is_idempotent_for_identical_message() {
        let store = NotificationStore::new();
        let first = store.assert_alert(pid(1), "low on rice").unwrap();
        assert!(first.is_some());

        let second = store.assert_alert(pid(1), "low on rice").unwrap();
        assert!(second.is_none());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn reassert_with_new_quantity_refreshes_in_place() {
        let store = NotificationStore::new();
        let first = store.assert_alert(pid(1), "only 9 left").unwrap().unwrap();
        let refreshed = store.assert_alert(pid(1), "only 8 left").unwrap().unwrap();

        assert_eq!(refreshed.id, first.id);
        assert_eq!(refreshed.message, "only 8 left");
        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].message, "only 8 left");
    }

    #[test]
    fn retract_removes_and_further_retract_is_noop() {
        let store = NotificationStore::new();
        store.assert_alert(pid(1), "low on rice").unwrap();

        assert_eq!(store.retract(pid(1)).unwrap(), 1);
        assert!(store.list().unwrap().is_empty());
        assert_eq!(store.retract(pid(1)).unwrap(), 0);
    }

    #[test]
    fn list_is_newest_first_and_deduplicated_by_message() {
        let store = NotificationStore::new();
        store.assert_alert(pid(1), "low on rice").unwrap();
        store.assert_alert(pid(2), "low on sugar").unwrap();
        // Two products sharing one name render the same text; the feed shows
        // one row for it, keeping the earliest id.
        store.assert_alert(pid(3), "low on rice").unwrap();

        let listed = store.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].message, "low on rice");
        assert_eq!(listed[0].id, AlertId::new(1));
        assert_eq!(listed[1].message, "low on sugar");
    }

    #[test]
    fn concurrent_asserts_for_one_product_leave_a_single_alert() {
        let store = NotificationStore::new();
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        store.assert_alert(pid(1), "low on rice").unwrap();
                    }
                });
            }
        });
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
