//! Notification templates.

use crate::codes::model::CodeAssignment;
use crate::error::Result;
use crate::i18n::Locale;
use crate::providers::TemplateRenderer;
use crate::types::{Event, Organization};
use serde::Serialize;

/// Templates known to the core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TemplateResource {
    /// "Here is your reserved code" message
    SendReservedCode,
}

/// Values available to a template.
#[derive(Clone, Debug, Serialize)]
pub struct TemplateModel {
    /// Organizer
    pub organization: Organization,
    /// Event
    pub event: Event,
    /// Assignee and code
    pub assignee: CodeAssignment,
    /// Public page of the event, where the code can be redeemed
    pub event_page: String,
}

impl TemplateModel {
    /// Model for the reserved-code message.
    #[must_use]
    pub fn for_reserved_code(
        organization: &Organization,
        event: &Event,
        assignee: &CodeAssignment,
        event_page: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.clone(),
            event: event.clone(),
            assignee: assignee.clone(),
            event_page: event_page.into(),
        }
    }
}

struct ReservedCodeText {
    greeting: &'static str,
    body: &'static str,
    link: &'static str,
    signature: &'static str,
}

fn reserved_code_text(language: &str) -> ReservedCodeText {
    match language {
        "it" => ReservedCodeText {
            greeting: "Ciao",
            body: "ecco il tuo codice riservato per",
            link: "Puoi usarlo qui:",
            signature: "A presto,",
        },
        "de" => ReservedCodeText {
            greeting: "Hallo",
            body: "hier ist Ihr reservierter Code für",
            link: "Sie können ihn hier einlösen:",
            signature: "Mit freundlichen Grüßen,",
        },
        "fr" => ReservedCodeText {
            greeting: "Bonjour",
            body: "voici votre code réservé pour",
            link: "Vous pouvez l'utiliser ici :",
            signature: "Cordialement,",
        },
        "nl" => ReservedCodeText {
            greeting: "Hallo",
            body: "hier is uw gereserveerde code voor",
            link: "U kunt deze hier gebruiken:",
            signature: "Met vriendelijke groet,",
        },
        _ => ReservedCodeText {
            greeting: "Hello",
            body: "here is your reserved code for",
            link: "You can redeem it here:",
            signature: "Best regards,",
        },
    }
}

/// Plain-text renderer shipped with the core.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinTemplateRenderer;

impl TemplateRenderer for BuiltinTemplateRenderer {
    fn render(
        &self,
        _event: &Event,
        template: TemplateResource,
        model: &TemplateModel,
        locale: &Locale,
    ) -> Result<String> {
        match template {
            TemplateResource::SendReservedCode => {
                let text = reserved_code_text(locale.language());
                Ok(format!(
                    "{greeting} {name},\n\n\
                     {body} {event}:\n\n\
                     {code}\n\n\
                     {link}\n{page}\n\n\
                     {signature}\n{organization} <{organization_email}>\n",
                    greeting = text.greeting,
                    name = model.assignee.assignee.trim(),
                    body = text.body,
                    event = model.event.display_name,
                    code = model.assignee.code.trim(),
                    link = text.link,
                    page = model.event_page,
                    signature = text.signature,
                    organization = model.organization.name,
                    organization_email = model.organization.email,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ContentLanguage;
    use crate::types::{EventId, OrganizationId};

    fn model() -> TemplateModel {
        let organization = Organization {
            id: OrganizationId(1),
            name: "Acme".to_string(),
            email: "info@acme.test".to_string(),
        };
        let event = Event {
            id: EventId(7),
            short_name: "rustconf".to_string(),
            display_name: "RustConf".to_string(),
            organization_id: OrganizationId(1),
            time_zone: chrono_tz::Europe::Zurich,
            locales: ContentLanguage::English.value(),
        };
        let assignee = CodeAssignment {
            code: "VIP-1".to_string(),
            assignee: " Ann ".to_string(),
            email: "ann@example.com".to_string(),
            language: None,
        };
        TemplateModel::for_reserved_code(&organization, &event, &assignee, "https://tickets.test/event/rustconf")
    }

    #[test]
    fn reserved_code_body_contains_code_and_link() {
        let model = model();
        let body = BuiltinTemplateRenderer
            .render(
                &model.event,
                TemplateResource::SendReservedCode,
                &model,
                &ContentLanguage::English.locale(),
            )
            .unwrap();
        assert!(body.starts_with("Hello Ann,"));
        assert!(body.contains("VIP-1"));
        assert!(body.contains("https://tickets.test/event/rustconf"));
        assert!(body.contains("Acme <info@acme.test>"));
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let model = model();
        let body = BuiltinTemplateRenderer
            .render(
                &model.event,
                TemplateResource::SendReservedCode,
                &model,
                &ContentLanguage::Czech.locale(),
            )
            .unwrap();
        assert!(body.starts_with("Hello"));
        let body = BuiltinTemplateRenderer
            .render(
                &model.event,
                TemplateResource::SendReservedCode,
                &model,
                &ContentLanguage::Italian.locale(),
            )
            .unwrap();
        assert!(body.starts_with("Ciao Ann,"));
    }
}
