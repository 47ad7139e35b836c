//! Best-effort confirmation emails for new waitlist entries.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{
    email_client::{self, EmailClient},
    templ_manager::TemplateManager,
    web::types::{ValidEmail, ValidName},
};

#[async_trait]
pub trait Notifier: Send + Sync {
    /// Returns whether the message was accepted for delivery.
    /// Implementations must never fail the caller, faults are logged and reported as `false`.
    async fn notify(&self, name: &ValidName, email: &ValidEmail) -> bool;
}

/// Renders the waitlist confirmation email and sends it with a single attempt.
#[derive(Debug)]
pub struct ConfirmationNotifier {
    email_client: EmailClient,
    templ_mgr: TemplateManager,
    subject: String,
}

impl ConfirmationNotifier {
    pub fn new(email_client: EmailClient, templ_mgr: TemplateManager, subject: String) -> Self {
        Self {
            email_client,
            templ_mgr,
            subject,
        }
    }

    async fn send_confirmation(&self, name: &ValidName, email: &ValidEmail) -> Result<()> {
        let (html_email, plain_email) = self.templ_mgr.render_confirmation(name.as_ref())?;

        self.email_client
            .send_email(
                email,
                self.subject.as_str(),
                html_email.as_str(),
                plain_email.as_str(),
            )
            .await?;

        Ok(())
    }
}

#[async_trait]
impl Notifier for ConfirmationNotifier {
    #[tracing::instrument(name = "Sending waitlist confirmation email", skip_all)]
    async fn notify(&self, name: &ValidName, email: &ValidEmail) -> bool {
        match self.send_confirmation(name, email).await {
            Ok(()) => {
                info!("Confirmation email accepted for delivery");
                true
            }
            Err(error) => {
                warn!(%error, "Confirmation email failed, continuing without it");
                false
            }
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
type Result<T> = core::result::Result<T, NotifyError>;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("templating error: {0}")]
    Tera(#[from] tera::Error),
    #[error("email client error: {0}")]
    EmailClient(#[from] email_client::Error),
}
