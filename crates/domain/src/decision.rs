// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Admission decisions and offers.
//!
//! An application has at most one decision. An approved decision carries
//! an offer that must be accepted, within its validity window, before the
//! application can be enrolled.

use crate::application_status::ApplicationStatus;
use crate::error::DomainError;
use crate::types::TenantId;
use crate::validation::validate_waitlist_position;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, Duration, OffsetDateTime};

/// Days an offer stays valid when no explicit date is given.
pub const DEFAULT_OFFER_VALIDITY_DAYS: i64 = 30;

/// The outcome recorded against an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Approved,
    Waitlisted,
    Rejected,
}

impl DecisionType {
    /// Returns the string representation used for persistence.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Waitlisted => "waitlisted",
            Self::Rejected => "rejected",
        }
    }

    /// Returns the application status this decision puts the application in.
    #[must_use]
    pub const fn implied_status(&self) -> ApplicationStatus {
        match self {
            Self::Approved => ApplicationStatus::Approved,
            Self::Waitlisted => ApplicationStatus::Waitlisted,
            Self::Rejected => ApplicationStatus::Rejected,
        }
    }
}

impl FromStr for DecisionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approved" => Ok(Self::Approved),
            "waitlisted" => Ok(Self::Waitlisted),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidDecisionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The offer attached to an approved decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Reference to the rendered letter; rendering happens elsewhere.
    pub letter_url: Option<String>,
    pub valid_until: Option<Date>,
    pub accepted: bool,
    pub accepted_at: Option<OffsetDateTime>,
}

impl Offer {
    /// Returns true if the offer can no longer be accepted on `today`.
    #[must_use]
    pub fn is_expired(&self, today: Date) -> bool {
        self.valid_until.is_some_and(|until| today > until)
    }
}

/// A validated request to record a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDecision {
    pub decision_type: DecisionType,
    pub decision_date: Date,
    pub section_assigned: Option<String>,
    pub waitlist_position: Option<u32>,
    pub rejection_reason: Option<String>,
}

impl NewDecision {
    /// Validates raw decision input.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the decision type is not recognised
    /// - the decision date is missing
    /// - a waitlisted decision has no positive waitlist position
    /// - a rejected decision has no non-empty rejection reason
    pub fn parse(
        decision_type: &str,
        decision_date: Option<Date>,
        section_assigned: Option<String>,
        waitlist_position: Option<i64>,
        rejection_reason: Option<String>,
    ) -> Result<Self, DomainError> {
        let decision_type: DecisionType = decision_type.trim().parse()?;
        let decision_date: Date = decision_date.ok_or(DomainError::MissingField {
            field: "decision_date",
        })?;

        let waitlist_position: Option<u32> = match decision_type {
            DecisionType::Waitlisted => {
                let position = waitlist_position.ok_or(DomainError::MissingField {
                    field: "waitlist_position",
                })?;
                Some(validate_waitlist_position(position)?)
            }
            DecisionType::Approved | DecisionType::Rejected => None,
        };

        let rejection_reason: Option<String> = match decision_type {
            DecisionType::Rejected => {
                let reason = rejection_reason
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .ok_or(DomainError::MissingField {
                        field: "rejection_reason",
                    })?;
                Some(reason)
            }
            DecisionType::Approved | DecisionType::Waitlisted => None,
        };

        Ok(Self {
            decision_type,
            decision_date,
            section_assigned: section_assigned
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            waitlist_position,
            rejection_reason,
        })
    }
}

/// The single decision recorded for an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionDecision {
    /// The canonical identifier. `None` until persisted.
    pub decision_id: Option<i64>,
    pub tenant_id: TenantId,
    pub application_id: i64,
    pub decision_type: DecisionType,
    pub decision_date: Date,
    pub decided_by: String,
    pub section_assigned: Option<String>,
    /// Present iff the decision is `waitlisted`.
    pub waitlist_position: Option<u32>,
    /// Present iff the decision is `rejected`.
    pub rejection_reason: Option<String>,
    pub offer: Offer,
    pub created_at: OffsetDateTime,
    /// Optimistic concurrency version, bumped on every update.
    pub version: i64,
}

impl AdmissionDecision {
    /// Builds an unpersisted decision from validated input.
    #[must_use]
    pub fn from_new(
        tenant_id: TenantId,
        application_id: i64,
        input: NewDecision,
        decided_by: &str,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            decision_id: None,
            tenant_id,
            application_id,
            decision_type: input.decision_type,
            decision_date: input.decision_date,
            decided_by: decided_by.to_string(),
            section_assigned: input.section_assigned,
            waitlist_position: input.waitlist_position,
            rejection_reason: input.rejection_reason,
            offer: Offer::default(),
            created_at,
            version: 0,
        }
    }

    /// Ensures the decision is of the given type.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DecisionTypeMismatch` otherwise.
    pub fn ensure_type(&self, expected: DecisionType) -> Result<(), DomainError> {
        if self.decision_type == expected {
            Ok(())
        } else {
            Err(DomainError::DecisionTypeMismatch {
                expected,
                actual: self.decision_type,
            })
        }
    }

    /// Ensures the offer can be accepted on `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if the decision is not approved, the offer was
    /// already accepted, or the offer has expired.
    pub fn ensure_offer_acceptable(&self, today: Date) -> Result<(), DomainError> {
        self.ensure_type(DecisionType::Approved)?;
        if self.offer.accepted {
            return Err(DomainError::OfferAlreadyAccepted);
        }
        match self.offer.valid_until {
            Some(valid_until) if today > valid_until => {
                Err(DomainError::OfferExpired { valid_until })
            }
            _ => Ok(()),
        }
    }
}

/// Returns the default validity date for an offer generated on `today`.
///
/// # Errors
///
/// Returns an error on date overflow.
pub fn default_offer_valid_until(today: Date) -> Result<Date, DomainError> {
    today
        .checked_add(Duration::days(DEFAULT_OFFER_VALIDITY_DAYS))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: String::from("computing offer validity"),
        })
}
