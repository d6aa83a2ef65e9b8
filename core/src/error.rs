//! Error types for administrative operations.

use thiserror::Error;

/// Result type alias for administrative operations.
pub type Result<T> = std::result::Result<T, AdminError>;

/// Every way an administrative request can be rejected.
///
/// All variants are surfaced synchronously to the caller. None of them are
/// retried: they are either operator input errors or integrity violations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdminError {
    // ═══════════════════════════════════════════════════════════
    // Authorization
    // ═══════════════════════════════════════════════════════════

    /// Caller does not own the event's organization.
    #[error("User {caller} is not allowed to manage this event")]
    NotAuthorized {
        /// Caller identity
        caller: String,
    },

    /// No event with the given name exists.
    #[error("Event {name} not found")]
    EventNotFound {
        /// Event short name
        name: String,
    },

    /// No category with the given id exists under the event.
    #[error("Ticket category {category_id} not found")]
    CategoryNotFound {
        /// Requested category
        category_id: i32,
    },

    /// The category is not access-restricted, so it has no special codes.
    #[error("Access to the selected category is not restricted")]
    CategoryNotRestricted {
        /// Requested category
        category_id: i32,
    },

    // ═══════════════════════════════════════════════════════════
    // Code assignment
    // ═══════════════════════════════════════════════════════════

    /// More requests than unsent codes.
    #[error("Requested codes: {requested}, available: {available}")]
    InsufficientCodes {
        /// Number of distinct requests
        requested: usize,
        /// Number of unsent codes in the category
        available: usize,
    },

    /// The same code was pinned by more than one request.
    #[error("Cannot assign the same code twice")]
    DuplicateCodeRequest,

    /// A pinned code does not exist in the category or was already sent.
    #[error("Some requested codes don't exist or have already been sent")]
    UnknownOrConsumedCode,

    /// A request reached dispatch without a code.
    #[error("There are missing codes in the request")]
    MissingCode,

    /// The event has no content language configured.
    #[error("No locales have been defined for the event")]
    NoLocalesConfigured,

    // ═══════════════════════════════════════════════════════════
    // Integrity
    // ═══════════════════════════════════════════════════════════

    /// Consuming a code touched more than one row.
    #[error("Expected exactly one code to be marked as sent, got {affected}")]
    ConcurrentModification {
        /// Rows affected by the update
        affected: u64,
    },

    /// Clearing recipient data touched more than one row.
    #[error("Too many records affected: {affected}")]
    IntegrityViolation {
        /// Rows affected by the update
        affected: u64,
    },

    // ═══════════════════════════════════════════════════════════
    // Collaborators
    // ═══════════════════════════════════════════════════════════

    /// Notification could not be delivered.
    #[error("Notification error: {0}")]
    Notification(String),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(String),

    /// Store operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// Export file could not be produced.
    #[error("Export error: {0}")]
    Export(String),

    /// Malformed input that is not covered by a more specific variant.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AdminError {
    /// Returns `true` if the operator can fix the request and resubmit it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use eventadmin_core::AdminError;
    /// assert!(AdminError::DuplicateCodeRequest.is_user_error());
    /// assert!(!AdminError::ConcurrentModification { affected: 2 }.is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotRestricted { .. }
                | Self::InsufficientCodes { .. }
                | Self::DuplicateCodeRequest
                | Self::UnknownOrConsumedCode
                | Self::MissingCode
                | Self::NoLocalesConfigured
                | Self::InvalidInput(_)
        )
    }

    /// Returns `true` for data-integrity violations detected through affected-row counts.
    #[must_use]
    pub const fn is_integrity_violation(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification { .. } | Self::IntegrityViolation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_codes_message_names_both_counts() {
        let err = AdminError::InsufficientCodes {
            requested: 3,
            available: 1,
        };
        assert_eq!(err.to_string(), "Requested codes: 3, available: 1");
    }

    #[test]
    fn classification() {
        assert!(AdminError::MissingCode.is_user_error());
        assert!(!AdminError::NotAuthorized { caller: "x".into() }.is_user_error());
        assert!(AdminError::IntegrityViolation { affected: 2 }.is_integrity_violation());
        assert!(!AdminError::Database("down".into()).is_integrity_violation());
    }
}
