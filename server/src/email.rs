//! Notification transports.
//!
//! [`SmtpNotifier`] delivers through an SMTP relay with lettre's tokio
//! transport; [`ConsoleNotifier`] only logs, for development.

use crate::config::{EmailConfig, EmailProvider};
use async_trait::async_trait;
use eventadmin_core::providers::{BodyProducer, Notifier};
use eventadmin_core::{AdminError, Event, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// Build the notifier selected by `config`.
///
/// # Errors
///
/// Returns [`AdminError::Notification`] if the SMTP transport cannot be built.
pub fn notifier_from_config(config: &EmailConfig) -> Result<Arc<dyn Notifier>> {
    match config.provider {
        EmailProvider::Console => Ok(Arc::new(ConsoleNotifier::new(sender(config)))),
        EmailProvider::Smtp => Ok(Arc::new(SmtpNotifier::new(config)?)),
    }
}

fn sender(config: &EmailConfig) -> String {
    format!("{} <{}>", config.from_name, config.from_address)
}

/// SMTP notifier.
#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
}

impl SmtpNotifier {
    /// Create a notifier for the configured relay.
    ///
    /// Port 465 uses implicit TLS, every other port requires STARTTLS.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Notification`] if the relay host is missing or invalid.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| AdminError::Notification("SMTP host not configured".into()))?;
        let tls = TlsParameters::new(host.to_string())
            .map_err(|e| AdminError::Notification(format!("TLS configuration error: {e}")))?;

        let relay = if config.smtp_port == 465 {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| AdminError::Notification(format!("SMTP relay error: {e}")))?
                .tls(Tls::Wrapper(tls))
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| AdminError::Notification(format!("SMTP relay error: {e}")))?
                .tls(Tls::Required(tls))
        };
        let mut builder = relay.port(config.smtp_port);

        if let (Some(user), Some(pass)) = (&config.smtp_username, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: sender(config),
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(
        &self,
        event: &Event,
        from_override: Option<&str>,
        to: &str,
        subject: &str,
        body: BodyProducer,
    ) -> Result<()> {
        let from = from_override.unwrap_or(&self.from);
        let message = Message::builder()
            .from(
                from.parse()
                    .map_err(|e| AdminError::Notification(format!("Invalid from address: {e}")))?,
            )
            .to(to
                .parse()
                .map_err(|e| AdminError::Notification(format!("Invalid to address {to}: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body()?)
            .map_err(|e| AdminError::Notification(format!("Failed to build email: {e}")))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| AdminError::Notification(format!("Failed to send email: {e}")))?;

        tracing::debug!(event = %event.short_name, to = %to, "Email delivered to relay");
        Ok(())
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Clone)]
pub struct ConsoleNotifier {
    from: String,
}

impl ConsoleNotifier {
    /// Create a console notifier with a default sender.
    #[must_use]
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn send(
        &self,
        event: &Event,
        from_override: Option<&str>,
        to: &str,
        subject: &str,
        body: BodyProducer,
    ) -> Result<()> {
        let body = body()?;
        tracing::info!(
            event = %event.short_name,
            from = %from_override.unwrap_or(&self.from),
            to = %to,
            subject = %subject,
            "\n{body}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eventadmin_testing::fixtures;

    fn email_config(provider: EmailProvider, smtp_host: Option<&str>) -> EmailConfig {
        EmailConfig {
            provider,
            smtp_host: smtp_host.map(ToString::to_string),
            smtp_port: 587,
            smtp_username: None,
            smtp_password: None,
            from_address: "noreply@example.com".into(),
            from_name: "Rust Events".into(),
        }
    }

    #[tokio::test]
    async fn console_notifier_renders_the_body() {
        let notifier = ConsoleNotifier::new("Rust Events <noreply@example.com>");
        let result = notifier
            .send(
                &fixtures::event(),
                None,
                "ada@example.com",
                "Your code",
                Box::new(|| Ok("Hello".to_string())),
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn console_notifier_propagates_render_errors() {
        let notifier = ConsoleNotifier::new("x@example.com");
        let result = notifier
            .send(
                &fixtures::event(),
                None,
                "ada@example.com",
                "Your code",
                Box::new(|| Err(AdminError::Template("broken".into()))),
            )
            .await;
        assert_eq!(result, Err(AdminError::Template("broken".into())));
    }

    #[test]
    fn smtp_without_host_is_rejected() {
        assert!(SmtpNotifier::new(&email_config(EmailProvider::Smtp, None)).is_err());
    }

    #[test]
    fn console_is_selected_by_config() {
        assert!(notifier_from_config(&email_config(EmailProvider::Console, None)).is_ok());
    }
}
