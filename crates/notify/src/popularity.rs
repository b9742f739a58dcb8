//! Popular-item alerting over the sales ledger.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use shopledger_sales::{count_items_sold, popular_items, Sale};

use crate::error::MailError;
use crate::mailer::{MailMessage, Mailer};

/// The shop the alerts speak for. Read-only reference used in mail text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Company {
    pub name: String,
}

/// Counts sale records per item and mails staff once an item's count strictly
/// exceeds the threshold.
///
/// Each item is alerted on at most once per process lifetime: the notified
/// set is updated only after a successful send, so a transport failure leaves
/// the item eligible for retry on the next check.
pub struct PopularityNotifier<M> {
    mailer: M,
    company: Company,
    sender: String,
    recipients: Vec<String>,
    threshold: u64,
    notified: Mutex<HashSet<String>>,
}

impl<M> PopularityNotifier<M> {
    pub fn new(
        mailer: M,
        company: Company,
        sender: String,
        recipients: Vec<String>,
        threshold: u64,
    ) -> Self {
        Self {
            mailer,
            company,
            sender,
            recipients,
            threshold,
            notified: Mutex::new(HashSet::new()),
        }
    }

    fn alert_message(&self, item_name: &str) -> MailMessage {
        let company = &self.company.name;
        let subject = format!("🔥 Limited Stock Alert from {company}! 🔥");
        let body = format!(
            "Attention Shoppers!\n\n\
             At {company}, our popular item \"{item_name}\" is flying off the shelves! \
             Don't miss out on this hot deal!\n\n\
             Act now before we run out of stock! Hurry and secure your favorite item \
             before someone else does.\n\n\
             Shop now at {company} and enjoy exclusive savings on \"{item_name}\" today!\n\n\
             Happy Shopping!\n"
        );
        MailMessage {
            subject,
            body,
            from: self.sender.clone(),
            to: self.recipients.clone(),
        }
    }
}

impl<M: Mailer> PopularityNotifier<M> {
    /// Count sale records per item, alert on newly popular items, and return
    /// the counts.
    ///
    /// Mail failures abort the check and propagate; counts are recomputed on
    /// the next call anyway.
    pub async fn review(&self, sales: &[Sale]) -> Result<BTreeMap<String, u64>, MailError> {
        let counts = count_items_sold(sales);
        for item_name in popular_items(&counts, self.threshold) {
            if self.notified.lock().unwrap().contains(&item_name) {
                continue;
            }
            self.mailer.send(self.alert_message(&item_name)).await?;
            tracing::info!(item = %item_name, threshold = self.threshold, "popular item alert sent");
            self.notified.lock().unwrap().insert(item_name);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;

    use shopledger_core::SaleId;

    use crate::in_memory::RecordingMailer;

    use super::*;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _message: MailMessage) -> Result<(), MailError> {
            Err(MailError::Transport("relay unreachable".to_string()))
        }
    }

    fn sale(item_name: &str) -> Sale {
        Sale {
            id: SaleId::new(),
            item_name: item_name.to_string(),
            quantity: 1,
            amount: 100,
            receivable: 100,
            tax: 5,
            created_at: Utc::now(),
        }
    }

    fn notifier<M>(mailer: M) -> PopularityNotifier<M> {
        PopularityNotifier::new(
            mailer,
            Company {
                name: "Acme Stores".to_string(),
            },
            "no-reply@acme.example".to_string(),
            vec!["staff@acme.example".to_string()],
            3,
        )
    }

    #[tokio::test]
    async fn four_sales_trigger_exactly_one_alert() {
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = notifier(mailer.clone());
        let ledger: Vec<Sale> = (0..4).map(|_| sale("Widget")).collect();

        let counts = notifier.review(&ledger).await.unwrap();

        assert_eq!(counts.get("Widget"), Some(&4));
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].subject.contains("Acme Stores"));
        assert!(sent[0].body.contains("\"Widget\""));
        assert_eq!(sent[0].to, vec!["staff@acme.example".to_string()]);
    }

    #[tokio::test]
    async fn three_sales_stay_below_the_threshold() {
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = notifier(mailer.clone());
        let ledger: Vec<Sale> = (0..3).map(|_| sale("Widget")).collect();

        let counts = notifier.review(&ledger).await.unwrap();

        assert_eq!(counts.get("Widget"), Some(&3));
        assert!(mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn repeated_checks_do_not_resend() {
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = notifier(mailer.clone());
        let ledger: Vec<Sale> = (0..5).map(|_| sale("Widget")).collect();

        notifier.review(&ledger).await.unwrap();
        notifier.review(&ledger).await.unwrap();

        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn each_popular_item_gets_its_own_alert() {
        let mailer = Arc::new(RecordingMailer::new());
        let notifier = notifier(mailer.clone());
        let mut ledger: Vec<Sale> = (0..4).map(|_| sale("Widget")).collect();
        ledger.extend((0..4).map(|_| sale("Gadget")));
        ledger.push(sale("Doodad"));

        notifier.review(&ledger).await.unwrap();

        let bodies: Vec<String> = mailer.sent().into_iter().map(|m| m.body).collect();
        assert_eq!(bodies.len(), 2);
        assert!(bodies.iter().any(|b| b.contains("\"Widget\"")));
        assert!(bodies.iter().any(|b| b.contains("\"Gadget\"")));
    }

    #[tokio::test]
    async fn transport_failure_propagates_and_allows_retry() {
        let failing = notifier(FailingMailer);
        let ledger: Vec<Sale> = (0..4).map(|_| sale("Widget")).collect();

        let err = failing.review(&ledger).await.unwrap_err();
        assert!(matches!(err, MailError::Transport(_)));

        // The item was not marked notified, so a working mailer still alerts.
        assert!(failing.notified.lock().unwrap().is_empty());
    }
}
