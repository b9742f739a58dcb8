//! Process configuration, read from the environment at startup.
//!
//! Recipients, the popularity threshold, and the company name live here
//! rather than in code so deployments can change them without a rebuild.

use std::env;

use shopledger_sales::DEFAULT_POPULARITY_THRESHOLD;

/// SMTP transport settings. Absent => alert mail is logged, not sent.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub relay: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Shop name used in alert mail text.
    pub company_name: String,
    /// Sender address for alert mail.
    pub mail_sender: String,
    /// Staff addresses alerted about popular items.
    pub alert_recipients: Vec<String>,
    /// Sale-record count above which an item is popular.
    pub popularity_threshold: u64,
    pub smtp: Option<SmtpConfig>,
    pub use_persistent_store: bool,
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            company_name: "Shopledger".to_string(),
            mail_sender: "no-reply@shopledger.local".to_string(),
            alert_recipients: Vec::new(),
            popularity_threshold: DEFAULT_POPULARITY_THRESHOLD,
            smtp: None,
            use_persistent_store: false,
            database_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        // ALERT_RECIPIENTS=a@example.com,b@example.com
        let alert_recipients = env::var("ALERT_RECIPIENTS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or(defaults.alert_recipients);

        let smtp = env::var("SMTP_RELAY").ok().map(|relay| SmtpConfig {
            relay,
            port: env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: env::var("SMTP_USERNAME").ok(),
            password: env::var("SMTP_PASSWORD").ok(),
        });

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            company_name: env::var("COMPANY_NAME").unwrap_or(defaults.company_name),
            mail_sender: env::var("MAIL_SENDER").unwrap_or(defaults.mail_sender),
            alert_recipients,
            popularity_threshold: env::var("POPULARITY_THRESHOLD")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.popularity_threshold),
            smtp,
            use_persistent_store: env::var("USE_PERSISTENT_STORES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            database_url: env::var("DATABASE_URL").ok(),
        }
    }
}
