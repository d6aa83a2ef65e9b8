//! Special-code assignment and distribution.

pub mod assigner;
pub mod dispatcher;
pub mod guard;
pub mod manager;
pub mod model;

pub use assigner::{plan_assignment, validate_batch, CheckedBatch, CodeAssigner};
pub use dispatcher::NotificationDispatcher;
pub use guard::OwnershipGuard;
pub use manager::SpecialCodeManager;
pub use model::{dedupe, AssigneeRequest, CodeAssignment, Recipient, SpecialCode};
