//! Special codes and assignment requests.

use crate::types::{CategoryId, SpecialCodeId};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Recipient recorded when a code is sent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Assignee name (trimmed)
    pub name: String,
    /// Assignee email (trimmed)
    pub email: String,
    /// Language the notification was sent in
    pub language: Option<String>,
    /// When the notification was sent
    pub sent_at: DateTime<FixedOffset>,
}

/// Pre-provisioned discount/access code of one restricted category.
///
/// Transitions unsent → sent exactly once; an administrator may reset it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialCode {
    /// Code ID
    pub id: SpecialCodeId,
    /// Owning category
    pub category_id: CategoryId,
    /// Unique textual code
    pub code: String,
    /// Present once the code has been sent
    pub recipient: Option<Recipient>,
}

impl SpecialCode {
    /// `true` while the code can still be assigned.
    #[must_use]
    pub const fn is_unsent(&self) -> bool {
        self.recipient.is_none()
    }
}

/// One row of an operator's assignment batch.
///
/// Equality covers every field, so identical rows collapse when a batch is
/// de-duplicated.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssigneeRequest {
    /// Pre-pinned code, or `None` to auto-assign
    #[serde(default)]
    pub code: Option<String>,
    /// Assignee full name
    pub assignee: String,
    /// Assignee email
    pub email: String,
    /// Preferred language tag
    #[serde(default)]
    pub language: Option<String>,
}

impl AssigneeRequest {
    /// Request without a pinned code.
    #[must_use]
    pub fn unpinned(assignee: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            code: None,
            assignee: assignee.into(),
            email: email.into(),
            language: None,
        }
    }

    /// Request pinned to the given code.
    #[must_use]
    pub fn pinned(
        code: impl Into<String>,
        assignee: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            ..Self::unpinned(assignee, email)
        }
    }

    /// Set the preferred language.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Pinned code, trimmed.
    ///
    /// Any present code counts as pinned, blank included, so a blank code is
    /// rejected by validation instead of being auto-assigned.
    #[must_use]
    pub fn pinned_code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim)
    }

    /// Copy of this request carrying `code`.
    #[must_use]
    pub fn with_code(&self, code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..self.clone()
        }
    }
}

/// A request whose code has been resolved; the unit of work for dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CodeAssignment {
    /// Code to send
    pub code: String,
    /// Assignee full name
    pub assignee: String,
    /// Assignee email
    pub email: String,
    /// Preferred language tag
    pub language: Option<String>,
}

impl TryFrom<AssigneeRequest> for CodeAssignment {
    type Error = crate::AdminError;

    fn try_from(request: AssigneeRequest) -> Result<Self, Self::Error> {
        let code = request
            .pinned_code()
            .ok_or(crate::AdminError::MissingCode)?
            .to_string();
        Ok(Self {
            code,
            assignee: request.assignee,
            email: request.email,
            language: request.language,
        })
    }
}

/// Stable de-duplication by full value equality, keeping first occurrences.
#[must_use]
pub fn dedupe(requests: Vec<AssigneeRequest>) -> Vec<AssigneeRequest> {
    let mut seen = std::collections::HashSet::with_capacity(requests.len());
    requests
        .into_iter()
        .filter(|r| seen.insert(r.clone()))
        .collect()
}
