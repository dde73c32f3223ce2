use std::sync::Arc;

use restock_alerts::{Alert, AlertDelivery, NotificationStore};
use restock_ledger::StockLedger;
use restock_sales::SaleCoordinator;

/// Shared application services injected into handlers via `Extension`.
pub struct AppServices {
    pub ledger: Arc<StockLedger>,
    pub notifications: Arc<NotificationStore>,
    pub coordinator: SaleCoordinator,
}

/// In-process wiring: ledger + notification store + SMS-shaped delivery.
pub fn build_services() -> AppServices {
    let ledger = Arc::new(StockLedger::new());
    let notifications = Arc::new(NotificationStore::new());

    let recipient = std::env::var("ALERT_SMS_RECIPIENT").unwrap_or_default();
    if recipient.is_empty() {
        tracing::info!("ALERT_SMS_RECIPIENT not set; low-stock alerts are logged only");
    }
    let delivery: Arc<dyn AlertDelivery> = Arc::new(SmsDelivery::new(recipient));

    let coordinator = SaleCoordinator::new(ledger.clone(), notifications.clone(), delivery);

    // Bring the alert feed in line with whatever stock the ledger already
    // holds before the first request lands.
    if let Err(err) = coordinator.reconcile_alerts() {
        tracing::warn!(%err, "startup alert reconciliation failed");
    }

    AppServices {
        ledger,
        notifications,
        coordinator,
    }
}

/// SMS-shaped delivery channel: spawns the send off the request path and logs
/// the outcome. The alert is already stored by the time this runs, so a
/// failed send is log-only.
#[derive(Debug)]
pub struct SmsDelivery {
    recipient: String,
}

impl SmsDelivery {
    pub fn new(recipient: String) -> Self {
        Self { recipient }
    }
}

impl AlertDelivery for SmsDelivery {
    fn deliver(&self, alert: &Alert) {
        let recipient = self.recipient.clone();
        let message = alert.message.clone();
        tokio::spawn(async move {
            // Stand-in for the SMS gateway call.
            tracing::info!(%recipient, %message, "dispatching low-stock sms");
        });
    }
}
