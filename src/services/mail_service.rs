use tracing::info;

use crate::config::MailConfig;

/// Outbound notifications
pub trait MailService: Send + Sync {
    fn send(&self, subject: &str, message: &str);
}

/// Writes mail to the log instead of delivering it
#[derive(Debug, Clone)]
pub struct LocalMailService {
    mail_to: String,
    mail_from: String,
}

impl LocalMailService {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            mail_to: config.mail_to_address.clone(),
            mail_from: config.mail_from_address.clone(),
        }
    }
}

impl MailService for LocalMailService {
    fn send(&self, subject: &str, message: &str) {
        info!(
            from = %self.mail_from,
            to = %self.mail_to,
            subject = %subject,
            "Mail sent with LocalMailService: {}",
            message
        );
    }
}
