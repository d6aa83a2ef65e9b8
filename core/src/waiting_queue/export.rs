//! Tabular export of waiting-queue subscriptions.

use super::subscription::WaitingQueueSubscription;
use crate::error::{AdminError, Result};
use crate::types::{CategoryId, Event};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Column available in an export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportField {
    /// Subscription ID
    Id,
    /// Subscription time
    Creation,
    /// Event short name
    Event,
    /// Subscription status
    Status,
    /// Full name
    FullName,
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Email address
    Email,
    /// Reservation created from the subscription
    TicketReservationId,
    /// Preferred language
    Language,
    /// Requested category
    SelectedCategory,
    /// Pre-sales or sold-out subscription
    SubscriptionType,
}

impl ExportField {
    /// Every field, in column order.
    pub const ALL: [Self; 12] = [
        Self::Id,
        Self::Creation,
        Self::Event,
        Self::Status,
        Self::FullName,
        Self::FirstName,
        Self::LastName,
        Self::Email,
        Self::TicketReservationId,
        Self::Language,
        Self::SelectedCategory,
        Self::SubscriptionType,
    ];

    /// Query-string key.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Creation => "creation",
            Self::Event => "event",
            Self::Status => "status",
            Self::FullName => "fullname",
            Self::FirstName => "firstname",
            Self::LastName => "lastname",
            Self::Email => "email",
            Self::TicketReservationId => "ticket_reservation_id",
            Self::Language => "language",
            Self::SelectedCategory => "selected_category",
            Self::SubscriptionType => "subscription_type",
        }
    }

    /// Column header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Creation => "Creation",
            Self::Event => "Event",
            Self::Status => "Status",
            Self::FullName => "Full Name",
            Self::FirstName => "First Name",
            Self::LastName => "Last Name",
            Self::Email => "E-Mail",
            Self::TicketReservationId => "Ticket Reservation Id",
            Self::Language => "Language",
            Self::SelectedCategory => "Selected category",
            Self::SubscriptionType => "Subscription type",
        }
    }

    /// Field with the given key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key.trim())
    }

    /// Known fields among `keys`, in request order. Unknown keys are dropped;
    /// when no known key remains every field is selected.
    #[must_use]
    pub fn select<S: AsRef<str>>(keys: &[S]) -> Vec<Self> {
        let known: Vec<Self> = keys
            .iter()
            .filter_map(|k| Self::from_key(k.as_ref()))
            .collect();
        if known.is_empty() {
            Self::ALL.to_vec()
        } else {
            known
        }
    }

    fn value(
        self,
        subscription: &WaitingQueueSubscription,
        event: &Event,
        category_names: &HashMap<CategoryId, String>,
    ) -> String {
        match self {
            Self::Id => subscription.id.to_string(),
            Self::Creation => subscription
                .creation
                .with_timezone(&event.time_zone)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            Self::Event => event.short_name.clone(),
            Self::Status => subscription.status.to_string(),
            Self::FullName => subscription.full_name.clone(),
            Self::FirstName => subscription.first_name.clone().unwrap_or_default(),
            Self::LastName => subscription.last_name.clone().unwrap_or_default(),
            Self::Email => subscription.email_address.clone(),
            Self::TicketReservationId => subscription.reservation_id.clone().unwrap_or_default(),
            Self::Language => subscription.user_language.clone(),
            Self::SelectedCategory => subscription
                .selected_category_id
                .map(|id| {
                    category_names
                        .get(&id)
                        .cloned()
                        .unwrap_or_else(|| id.to_string())
                })
                .unwrap_or_default(),
            Self::SubscriptionType => subscription.subscription_type.to_string(),
        }
    }
}

/// `{key, value}` pair listed by the fields endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Query-string key
    pub key: &'static str,
    /// Column header
    pub value: &'static str,
}

/// Every exportable field.
#[must_use]
pub fn available_fields() -> Vec<FieldDescriptor> {
    ExportField::ALL
        .into_iter()
        .map(|f| FieldDescriptor {
            key: f.key(),
            value: f.label(),
        })
        .collect()
}

/// Output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Office Open XML workbook
    #[default]
    Excel,
    /// Comma separated values
    Csv,
}

impl ExportFormat {
    /// Name used in the query string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excel => "excel",
            Self::Csv => "csv",
        }
    }

    /// File extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Excel => "xlsx",
            Self::Csv => "csv",
        }
    }

    /// MIME type of the produced file.
    #[must_use]
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excel" | "xlsx" => Ok(Self::Excel),
            "csv" => Ok(Self::Csv),
            other => Err(AdminError::InvalidInput(format!(
                "unsupported export format: {other}"
            ))),
        }
    }
}

/// A produced export, ready to be sent as an attachment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name
    pub file_name: String,
    /// MIME type
    pub content_type: &'static str,
    /// File content
    pub content: Vec<u8>,
}

/// Header and data rows for `fields`.
#[must_use]
pub fn tabulate(
    fields: &[ExportField],
    subscriptions: &[WaitingQueueSubscription],
    event: &Event,
    category_names: &HashMap<CategoryId, String>,
) -> (Vec<&'static str>, Vec<Vec<String>>) {
    let header = fields.iter().map(|f| f.label()).collect();
    let rows = subscriptions
        .iter()
        .map(|s| {
            fields
                .iter()
                .map(|f| f.value(s, event, category_names))
                .collect()
        })
        .collect();
    (header, rows)
}

/// Encode subscriptions in `format`.
///
/// # Errors
///
/// [`AdminError::Export`] if the encoder fails.
pub fn export_subscriptions(
    format: ExportFormat,
    fields: &[ExportField],
    subscriptions: &[WaitingQueueSubscription],
    event: &Event,
    category_names: &HashMap<CategoryId, String>,
) -> Result<ExportFile> {
    let (header, rows) = tabulate(fields, subscriptions, event, category_names);
    let content = match format {
        ExportFormat::Csv => write_csv(&header, &rows)?,
        ExportFormat::Excel => write_xlsx(&header, &rows)?,
    };
    Ok(ExportFile {
        file_name: format!("{}-waiting-queue.{}", event.short_name, format.extension()),
        content_type: format.content_type(),
        content,
    })
}

fn write_csv(header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let export_err = |e: csv::Error| AdminError::Export(e.to_string());

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header).map_err(export_err)?;
    for row in rows {
        writer.write_record(row).map_err(export_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| AdminError::Export(e.to_string()))
}

fn write_xlsx(header: &[&str], rows: &[Vec<String>]) -> Result<Vec<u8>> {
    let export_err = |e: rust_xlsxwriter::XlsxError| AdminError::Export(e.to_string());

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name("waiting queue").map_err(export_err)?;

    for (col, label) in (0u16..).zip(header) {
        sheet
            .write_string_with_format(0, col, *label, &bold)
            .map_err(export_err)?;
    }
    for (row, values) in (1u32..).zip(rows) {
        for (col, value) in (0u16..).zip(values) {
            sheet.write_string(row, col, value).map_err(export_err)?;
        }
    }

    workbook.save_to_buffer().map_err(export_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::ContentLanguage;
    use crate::types::{EventId, OrganizationId, SubscriptionId};
    use crate::waiting_queue::subscription::{SubscriptionStatus, SubscriptionType};
    use chrono::{TimeZone, Utc};

    fn event() -> Event {
        Event {
            id: EventId(3),
            short_name: "eurorust".to_string(),
            display_name: "EuroRust".to_string(),
            organization_id: OrganizationId(1),
            time_zone: chrono_tz::Europe::Rome,
            locales: ContentLanguage::English.value(),
        }
    }

    fn subscription() -> WaitingQueueSubscription {
        WaitingQueueSubscription {
            id: SubscriptionId(11),
            creation: Utc
                .with_ymd_and_hms(2026, 1, 15, 8, 30, 0)
                .single()
                .unwrap(),
            event_id: EventId(3),
            status: SubscriptionStatus::Waiting,
            full_name: "Ada Lovelace".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email_address: "ada@example.com".to_string(),
            reservation_id: None,
            user_language: "en".to_string(),
            selected_category_id: Some(CategoryId(5)),
            subscription_type: SubscriptionType::SoldOut,
        }
    }

    #[test]
    fn empty_selection_means_every_field() {
        assert_eq!(ExportField::select::<&str>(&[]), ExportField::ALL.to_vec());
    }

    #[test]
    fn only_unknown_keys_mean_every_field() {
        assert_eq!(ExportField::select(&["bogus", " "]), ExportField::ALL.to_vec());

        let file = export_subscriptions(
            ExportFormat::Csv,
            &ExportField::select(&["bogus"]),
            &[],
            &event(),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(
            String::from_utf8_lossy(&file.content),
            "ID,Creation,Event,Status,Full Name,First Name,Last Name,E-Mail,\
             Ticket Reservation Id,Language,Selected category,Subscription type\n"
        );
    }

    #[test]
    fn selection_keeps_request_order_and_drops_unknown() {
        let fields = ExportField::select(&["email", "bogus", "id"]);
        assert_eq!(fields, vec![ExportField::Email, ExportField::Id]);
    }

    #[test]
    fn creation_is_rendered_in_event_time_zone() {
        let names = HashMap::from([(CategoryId(5), "Standard".to_string())]);
        let (header, rows) = tabulate(
            &[ExportField::Creation, ExportField::Event, ExportField::SelectedCategory],
            &[subscription()],
            &event(),
            &names,
        );
        assert_eq!(header, vec!["Creation", "Event", "Selected category"]);
        assert_eq!(
            rows,
            vec![vec![
                "2026-01-15 09:30:00".to_string(),
                "eurorust".to_string(),
                "Standard".to_string()
            ]]
        );
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let file = export_subscriptions(
            ExportFormat::Csv,
            &ExportField::select(&["id", "fullname", "status"]),
            &[subscription()],
            &event(),
            &HashMap::new(),
        )
        .unwrap();
        assert_eq!(file.file_name, "eurorust-waiting-queue.csv");
        assert_eq!(file.content_type, "text/csv");
        assert_eq!(
            String::from_utf8_lossy(&file.content),
            "ID,Full Name,Status\n11,Ada Lovelace,WAITING\n"
        );
    }

    #[test]
    fn excel_export_is_a_zip_container() {
        let file = export_subscriptions(
            ExportFormat::Excel,
            &ExportField::ALL,
            &[subscription()],
            &event(),
            &HashMap::new(),
        )
        .unwrap();
        assert!(file.content.starts_with(b"PK"));
        assert!(file.file_name.ends_with(".xlsx"));
    }

    #[test]
    fn format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("excel".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
