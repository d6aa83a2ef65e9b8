//! # Event Admin Core
//!
//! Administrative core for restricted ticket categories and event waiting queues.
//!
//! The crate owns the behavioural contracts; persistence, mail transport, template
//! rendering and HTTP are collaborators reached through the traits in [`providers`].
//!
//! ## Special-code workflow
//!
//! ```text
//! operator batch ──▶ OwnershipGuard ──▶ CodeAssigner ──▶ NotificationDispatcher
//!                    (authorize)        (plan codes)      (send + mark sent)
//! ```
//!
//! - [`codes::OwnershipGuard`] is the only authorization gate and is invoked
//!   explicitly at the start of every code operation.
//! - [`codes::CodeAssigner`] matches requests to unsent codes without touching
//!   persisted state.
//! - [`codes::NotificationDispatcher`] sends one notification per assignee and
//!   consumes the code with a conditional update (compare-and-set on sent-state).
//!
//! ## Waiting queue
//!
//! [`waiting_queue`] computes whether signup is open or paused, manages
//! subscriber status transitions and exports subscribers as CSV or Excel.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod codes;
pub mod configuration;
pub mod environment;
pub mod error;
pub mod events;
pub mod i18n;
pub mod metrics;
pub mod providers;
pub mod template;
pub mod types;
pub mod waiting_queue;

pub use error::{AdminError, Result};
pub use events::EventDirectory;
pub use types::{
    Caller, CategoryId, Event, EventId, Organization, OrganizationId, SpecialCodeId, SubscriptionId,
    TicketCategory,
};
