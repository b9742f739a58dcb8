use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Context;

use shopledger_infra::{
    InMemoryShopStore, PostgresShopStore, RecordError, SaleReceipt, SaleRecorder, ShopStore,
    StoreError,
};
use shopledger_inventory::StockItem;
use shopledger_notify::{
    Company, ConsoleMailer, MailError, Mailer, PopularityNotifier, SmtpMailer,
};
use shopledger_sales::{stats, Sale, SaleDraft, SalesSummary};

use crate::config::AppConfig;

/// Shared application services, one instance behind an `Extension`.
pub struct AppServices {
    store: Arc<dyn ShopStore>,
    recorder: SaleRecorder<Arc<dyn ShopStore>>,
    notifier: PopularityNotifier<Arc<dyn Mailer>>,
}

/// Failure of the items-sold report (ledger read or alert mail).
#[derive(Debug)]
pub enum ItemsSoldError {
    Store(StoreError),
    Mail(MailError),
}

impl From<StoreError> for ItemsSoldError {
    fn from(value: StoreError) -> Self {
        ItemsSoldError::Store(value)
    }
}

impl From<MailError> for ItemsSoldError {
    fn from(value: MailError) -> Self {
        ItemsSoldError::Mail(value)
    }
}

impl AppServices {
    pub fn new(store: Arc<dyn ShopStore>, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        let recorder = SaleRecorder::new(store.clone());
        let notifier = PopularityNotifier::new(
            mailer,
            Company {
                name: config.company_name.clone(),
            },
            config.mail_sender.clone(),
            config.alert_recipients.clone(),
            config.popularity_threshold,
        );
        Self {
            store,
            recorder,
            notifier,
        }
    }

    pub async fn record_sale(&self, draft: SaleDraft) -> Result<SaleReceipt, RecordError> {
        self.recorder.record(draft).await
    }

    pub async fn create_item(&self, item: StockItem) -> Result<(), StoreError> {
        self.store.insert_item(item).await
    }

    pub async fn item(&self, name: &str) -> Result<Option<StockItem>, StoreError> {
        self.store.get_item(name).await
    }

    pub async fn items(&self) -> Result<Vec<StockItem>, StoreError> {
        self.store.list_items().await
    }

    pub async fn sales(&self) -> Result<Vec<Sale>, StoreError> {
        self.store.list_sales().await
    }

    pub async fn sales_stats(&self) -> Result<SalesSummary, StoreError> {
        Ok(stats::summarize(&self.store.list_sales().await?))
    }

    /// Per-item sale counts; alerts staff about newly popular items as a
    /// side effect.
    pub async fn items_sold(&self) -> Result<BTreeMap<String, u64>, ItemsSoldError> {
        let sales = self.store.list_sales().await?;
        Ok(self.notifier.review(&sales).await?)
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let store: Arc<dyn ShopStore> = if config.use_persistent_store {
        let url = config
            .database_url
            .clone()
            .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
        let pool = sqlx::PgPool::connect(&url)
            .await
            .context("failed to connect to Postgres")?;
        let store = PostgresShopStore::new(pool);
        store
            .ensure_schema()
            .await
            .map_err(|e| anyhow::anyhow!("failed to prepare schema: {e}"))?;
        Arc::new(store)
    } else {
        Arc::new(InMemoryShopStore::new())
    };

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            let mut mailer = SmtpMailer::new(&smtp.relay, smtp.port);
            if let (Some(username), Some(password)) = (&smtp.username, &smtp.password) {
                mailer = mailer.with_credentials(username.clone(), password.clone());
            }
            Arc::new(mailer)
        }
        None => {
            tracing::warn!("SMTP_RELAY not set; alert mail will be logged, not sent");
            Arc::new(ConsoleMailer::new())
        }
    };

    Ok(AppServices::new(store, mailer, config))
}

#[cfg(test)]
mod tests {
    use shopledger_notify::RecordingMailer;

    use super::*;

    fn draft(item_name: &str, quantity: i64) -> SaleDraft {
        SaleDraft {
            item_name: item_name.to_string(),
            quantity,
            amount: 100,
            receivable: 100,
            tax: 5,
        }
    }

    fn services_with_recording_mailer() -> (AppServices, Arc<RecordingMailer>) {
        let store: Arc<dyn ShopStore> = Arc::new(InMemoryShopStore::new());
        let mailer = Arc::new(RecordingMailer::new());
        let config = AppConfig {
            alert_recipients: vec!["staff@example.com".to_string()],
            ..AppConfig::default()
        };
        let services = AppServices::new(store, mailer.clone() as Arc<dyn Mailer>, &config);
        (services, mailer)
    }

    #[tokio::test]
    async fn items_sold_reports_counts_and_alerts_once() {
        let (services, mailer) = services_with_recording_mailer();
        services
            .create_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();
        for _ in 0..4 {
            services.record_sale(draft("Widget", 1)).await.unwrap();
        }

        let counts = services.items_sold().await.unwrap();
        assert_eq!(counts.get("Widget"), Some(&4));
        assert_eq!(mailer.sent().len(), 1);
        assert_eq!(mailer.sent()[0].to, vec!["staff@example.com".to_string()]);

        // A second poll reports the same counts without re-alerting.
        let counts = services.items_sold().await.unwrap();
        assert_eq!(counts.get("Widget"), Some(&4));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn stats_reflect_the_ledger() {
        let (services, _mailer) = services_with_recording_mailer();
        services
            .create_item(StockItem::new("Widget", 10).unwrap())
            .await
            .unwrap();

        assert_eq!(services.sales_stats().await.unwrap(), SalesSummary::default());

        services.record_sale(draft("Widget", 2)).await.unwrap();
        services.record_sale(draft("Widget", 3)).await.unwrap();

        let summary = services.sales_stats().await.unwrap();
        assert_eq!(summary.num_of_sells, 2);
        assert_eq!(summary.total_sales_amount, 200);
        assert_eq!(summary.total_receivable_amt, 200);
        assert_eq!(summary.total_tax_amount, 10);
    }
}
