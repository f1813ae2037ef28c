// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application_status::ApplicationStatus;
use crate::error::DomainError;
use crate::types::TenantId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

/// How a parent or guardian relates to the student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentRelation {
    Father,
    Mother,
    Guardian,
}

impl ParentRelation {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Guardian => "guardian",
        }
    }
}

impl FromStr for ParentRelation {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "father" => Ok(Self::Father),
            "mother" => Ok(Self::Mother),
            "guardian" => Ok(Self::Guardian),
            _ => Err(DomainError::InvalidParentRelation(s.to_string())),
        }
    }
}

impl std::fmt::Display for ParentRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parent or guardian attached to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentDetails {
    pub relation: ParentRelation,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
}

/// The applicant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    /// The class the student is applying for (e.g. `Grade 1`).
    pub class_applied: String,
    pub previous_school: Option<String>,
    /// Percentage from the previous school, 0–100.
    pub previous_marks: Option<f64>,
    pub address: Option<Address>,
}

impl StudentDetails {
    /// Returns the student's display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if last.is_empty() {
            first.to_string()
        } else {
            format!("{first} {last}")
        }
    }
}

/// A supporting document uploaded for an application.
///
/// Only the reference is stored; file handling happens elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationDocument {
    pub document_id: Option<i64>,
    pub application_id: i64,
    pub document_type: String,
    pub file_reference: String,
    pub verified: bool,
    pub uploaded_at: OffsetDateTime,
}

/// The central admission aggregate.
///
/// Created in `draft`; its status only moves along the legal transition
/// graph of [`ApplicationStatus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionApplication {
    /// The canonical identifier. `None` until persisted.
    pub application_id: Option<i64>,
    pub tenant_id: TenantId,
    pub session_id: i64,
    pub branch_id: Option<i64>,
    /// The enquiry this application came from, if any.
    pub enquiry_id: Option<i64>,
    /// Human-readable number, unique per tenant, assigned once at creation.
    pub application_number: String,
    pub student: StudentDetails,
    pub parents: Vec<ParentDetails>,
    pub status: ApplicationStatus,
    pub submitted_at: Option<OffsetDateTime>,
    pub approved_at: Option<OffsetDateTime>,
    pub approved_by: Option<String>,
    pub enrolled_at: Option<OffsetDateTime>,
    pub waitlist_position: Option<u32>,
    pub fee_paid: bool,
    pub remarks: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    /// Optimistic concurrency version, bumped on every update.
    pub version: i64,
}

impl AdmissionApplication {
    /// Returns the persisted identifier, or 0 for an unpersisted application.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.application_id.unwrap_or_default()
    }

    /// Returns the first phone number and e-mail found across the parents.
    #[must_use]
    pub fn primary_contact(&self) -> (Option<String>, Option<String>) {
        let phone = self.parents.iter().find_map(|p| p.phone.clone());
        let email = self.parents.iter().find_map(|p| p.email.clone());
        (phone, email)
    }

    /// Ensures the application can be deleted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ApplicationNotDraft` unless the status is `draft`.
    pub const fn ensure_deletable(&self) -> Result<(), DomainError> {
        if matches!(self.status, ApplicationStatus::Draft) {
            Ok(())
        } else {
            Err(DomainError::ApplicationNotDraft {
                status: self.status,
            })
        }
    }

    /// Ensures student and parent details may still be edited.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ApplicationNotEditable` once review has moved on.
    pub const fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status.allows_detail_updates() {
            Ok(())
        } else {
            Err(DomainError::ApplicationNotEditable {
                status: self.status,
            })
        }
    }
}
