//! HTTP request handlers, one module per resource.

pub mod health;
pub mod special_codes;
pub mod waiting_queue;

pub use health::{health_check, readiness};
