//! Sending codes to their assignees.

use super::model::CodeAssignment;
use crate::environment::Clock;
use crate::error::{AdminError, Result};
use crate::i18n::{code_email_subject, default_language, resolve_locale, LocaleResolver};
use crate::metrics::{SPECIAL_CODES_DISPATCH_FAILURES_TOTAL, SPECIAL_CODES_SENT_TOTAL};
use crate::providers::{Notifier, SentRecord, SpecialCodeStore, TemplateRenderer};
use crate::template::{TemplateModel, TemplateResource};
use crate::types::{Event, Organization};
use std::sync::Arc;

/// Sends one notification per assignment and consumes the code.
///
/// There is no batch transaction: each assignment is sent and committed on
/// its own, so a failure leaves earlier assignments sent and aborts the rest.
#[derive(Clone)]
pub struct NotificationDispatcher {
    store: Arc<dyn SpecialCodeStore>,
    notifier: Arc<dyn Notifier>,
    renderer: Arc<dyn TemplateRenderer>,
    locales: Arc<dyn LocaleResolver>,
    clock: Arc<dyn Clock>,
}

impl NotificationDispatcher {
    /// Create a dispatcher.
    #[must_use]
    pub fn new(
        store: Arc<dyn SpecialCodeStore>,
        notifier: Arc<dyn Notifier>,
        renderer: Arc<dyn TemplateRenderer>,
        locales: Arc<dyn LocaleResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            notifier,
            renderer,
            locales,
            clock,
        }
    }

    /// Send every assignment in order. Returns `true` once all were sent.
    ///
    /// `event_page` is the public URL included in the message body.
    ///
    /// # Errors
    ///
    /// - [`AdminError::NoLocalesConfigured`] before anything is sent
    /// - the first notifier/renderer error, after which processing stops
    /// - [`AdminError::UnknownOrConsumedCode`] if a code was consumed concurrently
    /// - [`AdminError::ConcurrentModification`] if consuming a code touched several rows
    #[tracing::instrument(
        skip(self, assignments, event, organization, event_page),
        fields(event = %event.short_name, assignments = assignments.len())
    )]
    pub async fn dispatch(
        &self,
        assignments: &[CodeAssignment],
        event: &Event,
        organization: &Organization,
        event_page: &str,
    ) -> Result<bool> {
        let languages = self.locales.event_locales(event.locales);
        let default = default_language(&languages).ok_or(AdminError::NoLocalesConfigured)?;

        for assignment in assignments {
            if let Err(e) = self
                .send_one(assignment, event, organization, event_page, default)
                .await
            {
                metrics::counter!(SPECIAL_CODES_DISPATCH_FAILURES_TOTAL).increment(1);
                if e.is_integrity_violation() {
                    tracing::error!(code = %assignment.code, error = %e, "Code consumption violated integrity");
                } else {
                    tracing::warn!(code = %assignment.code, error = %e, "Code dispatch aborted");
                }
                return Err(e);
            }
        }

        Ok(true)
    }

    async fn send_one(
        &self,
        assignment: &CodeAssignment,
        event: &Event,
        organization: &Organization,
        event_page: &str,
        default: crate::i18n::ContentLanguage,
    ) -> Result<()> {
        let locale = resolve_locale(assignment.language.as_deref(), default);
        let subject = code_email_subject(&locale, &event.display_name);

        let model = TemplateModel::for_reserved_code(organization, event, assignment, event_page);
        let renderer = Arc::clone(&self.renderer);
        let body_event = event.clone();
        let body_locale = locale.clone();
        let body = Box::new(move || {
            renderer.render(
                &body_event,
                TemplateResource::SendReservedCode,
                &model,
                &body_locale,
            )
        });

        self.notifier
            .send(event, None, assignment.email.trim(), &subject, body)
            .await?;

        let sent_at = self
            .clock
            .now()
            .with_timezone(&event.time_zone)
            .fixed_offset();
        let record = SentRecord {
            code: assignment.code.trim(),
            assignee: assignment.assignee.trim(),
            email: assignment.email.trim(),
            language: locale.language(),
            sent_at,
        };

        match self.store.mark_sent(&record).await? {
            1 => {
                metrics::counter!(SPECIAL_CODES_SENT_TOTAL).increment(1);
                tracing::info!(
                    code = %record.code,
                    email = %record.email,
                    locale = %locale,
                    sent_at = %sent_at,
                    "Special code sent"
                );
                Ok(())
            }
            0 => Err(AdminError::UnknownOrConsumedCode),
            affected => Err(AdminError::ConcurrentModification { affected }),
        }
    }
}
