// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission session lifecycle.
//!
//! A session moves `upcoming → open → closed` and may be reopened
//! (`closed → open`). Seat and application mutations are gated on the
//! session's status.

use crate::error::DomainError;
use crate::types::TenantId;
use crate::validation::validate_session_fields;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// The lifecycle state of an admission session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Created but not yet accepting applications.
    #[default]
    Upcoming,
    /// Accepting applications.
    Open,
    /// No longer accepting applications.
    Closed,
}

impl SessionStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `upcoming → open`
    /// - `upcoming → closed`
    /// - `open → closed`
    /// - `closed → open` (reopen)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Upcoming, Self::Open | Self::Closed)
                | (Self::Open, Self::Closed)
                | (Self::Closed, Self::Open)
        )
    }

    /// Validates a status change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSessionTransition` if the pair is not allowed.
    pub const fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            Ok(())
        } else {
            Err(DomainError::InvalidSessionTransition {
                from: *self,
                to: target,
            })
        }
    }

    /// Returns whether applications may be created or submitted.
    #[must_use]
    pub const fn accepts_applications(&self) -> bool {
        matches!(self, Self::Open)
    }

    /// Returns whether session details and seat configurations may change.
    #[must_use]
    pub const fn allows_changes(&self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            _ => Err(DomainError::InvalidSessionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tenant-scoped admission cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionSession {
    /// The canonical identifier. `None` until persisted.
    pub session_id: Option<i64>,
    pub tenant_id: TenantId,
    pub branch_id: Option<i64>,
    /// Academic year label, e.g. `2026-27`.
    pub academic_year: String,
    /// Unique per tenant and academic year.
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: SessionStatus,
    /// Application fee in minor currency units.
    pub application_fee: i64,
    pub required_documents: Vec<String>,
    pub settings: BTreeMap<String, String>,
    /// Optimistic concurrency version, bumped on every update.
    pub version: i64,
}

impl AdmissionSession {
    /// Creates a new, unpersisted session in `upcoming` status.
    ///
    /// # Errors
    ///
    /// Returns an error if the name or academic year is blank, the fee is
    /// negative, or the end date is before the start date.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        branch_id: Option<i64>,
        academic_year: &str,
        name: &str,
        start_date: Date,
        end_date: Date,
        application_fee: i64,
        required_documents: Vec<String>,
        settings: BTreeMap<String, String>,
    ) -> Result<Self, DomainError> {
        validate_session_fields(name, academic_year, start_date, end_date)?;
        if application_fee < 0 {
            return Err(DomainError::InvalidField {
                field: "application_fee",
                reason: String::from("must not be negative"),
            });
        }

        Ok(Self {
            session_id: None,
            tenant_id,
            branch_id,
            academic_year: academic_year.trim().to_string(),
            name: name.trim().to_string(),
            start_date,
            end_date,
            status: SessionStatus::Upcoming,
            application_fee,
            required_documents,
            settings,
            version: 0,
        })
    }

    /// Returns the persisted identifier, or 0 for an unpersisted session.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.session_id.unwrap_or_default()
    }

    /// Ensures the session is accepting applications.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionNotOpen` unless the status is `open`.
    pub fn ensure_accepting_applications(&self) -> Result<(), DomainError> {
        if self.status.accepts_applications() {
            Ok(())
        } else {
            Err(DomainError::SessionNotOpen {
                session_id: self.id(),
                status: self.status,
            })
        }
    }

    /// Ensures the session may still be modified.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionClosed` if the session is closed.
    pub fn ensure_not_closed(&self) -> Result<(), DomainError> {
        if self.status.allows_changes() {
            Ok(())
        } else {
            Err(DomainError::SessionClosed {
                session_id: self.id(),
            })
        }
    }

    /// Ensures the session may be deleted.
    ///
    /// Linked applications are checked separately by the store.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SessionOpen` if the session is open.
    pub fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.status == SessionStatus::Open {
            Err(DomainError::SessionOpen {
                session_id: self.id(),
            })
        } else {
            Ok(())
        }
    }

    /// Moves the deadline to `new_end_date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is closed or the new end date is
    /// before the start date.
    pub fn extend_deadline(&mut self, new_end_date: Date) -> Result<(), DomainError> {
        self.ensure_not_closed()?;
        if new_end_date < self.start_date {
            return Err(DomainError::InvalidDateRange {
                start: self.start_date,
                end: new_end_date,
            });
        }
        self.end_date = new_end_date;
        Ok(())
    }
}
