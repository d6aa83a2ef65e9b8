//! Waiting-queue administration.
//!
//! - [`status`] reports whether signup is open and whether it is paused
//! - [`manager`] counts, lists and moves subscribers between statuses
//! - [`export`] produces CSV and Excel files of the subscribers

pub mod eligibility;
pub mod export;
pub mod manager;
pub mod status;
pub mod subscription;

pub use eligibility::{sales_phase, SalesPhase};
pub use export::{available_fields, ExportField, ExportFile, ExportFormat, FieldDescriptor};
pub use manager::WaitingQueueManager;
pub use status::{WaitingQueueStatus, WaitingQueueStatusService};
pub use subscription::{SubscriptionStatus, SubscriptionType, WaitingQueueSubscription};
