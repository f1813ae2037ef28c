// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application stage tracking and transition logic.
//!
//! Every application starts in `draft` and only moves along the edges
//! listed in [`ApplicationStatus::allowed_transitions`]. A rejected move
//! reports the full set of reachable states so callers can offer the
//! valid next steps.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The stage an admission application is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    /// Being filled in; not yet submitted.
    #[default]
    Draft,
    /// Submitted by the family.
    Submitted,
    /// Picked up by admissions staff.
    UnderReview,
    /// Waiting for the family to supply documents.
    DocumentsPending,
    /// Entrance test scheduled.
    TestScheduled,
    /// Entrance test taken.
    TestCompleted,
    /// Shortlisted for a decision.
    Shortlisted,
    /// Offered a seat.
    Approved,
    /// Turned down.
    Rejected,
    /// On the waitlist.
    Waitlisted,
    /// Converted into a student record.
    Enrolled,
}

impl ApplicationStatus {
    /// Every status, in workflow order.
    pub const ALL: [Self; 11] = [
        Self::Draft,
        Self::Submitted,
        Self::UnderReview,
        Self::DocumentsPending,
        Self::TestScheduled,
        Self::TestCompleted,
        Self::Shortlisted,
        Self::Approved,
        Self::Rejected,
        Self::Waitlisted,
        Self::Enrolled,
    ];

    /// Statuses that qualify an application for merit-list ranking.
    pub const MERIT_ELIGIBLE: [Self; 4] = [
        Self::Submitted,
        Self::UnderReview,
        Self::Approved,
        Self::Waitlisted,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::UnderReview => "under_review",
            Self::DocumentsPending => "documents_pending",
            Self::TestScheduled => "test_scheduled",
            Self::TestCompleted => "test_completed",
            Self::Shortlisted => "shortlisted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Waitlisted => "waitlisted",
            Self::Enrolled => "enrolled",
        }
    }

    /// Returns every status directly reachable from this one.
    #[must_use]
    pub const fn allowed_transitions(&self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Submitted],
            Self::Submitted => &[Self::UnderReview, Self::DocumentsPending, Self::Rejected],
            Self::UnderReview => &[
                Self::DocumentsPending,
                Self::TestScheduled,
                Self::Shortlisted,
                Self::Approved,
                Self::Rejected,
            ],
            Self::DocumentsPending => &[Self::UnderReview, Self::Rejected],
            Self::TestScheduled => &[Self::TestCompleted, Self::Rejected],
            Self::TestCompleted => &[
                Self::Shortlisted,
                Self::Approved,
                Self::Rejected,
                Self::Waitlisted,
            ],
            Self::Shortlisted => &[Self::Approved, Self::Rejected, Self::Waitlisted],
            Self::Approved => &[Self::Enrolled, Self::Rejected],
            Self::Waitlisted => &[Self::Approved, Self::Rejected],
            Self::Rejected | Self::Enrolled => &[],
        }
    }

    /// Checks if a transition from this status to `target` is an edge of the graph.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        self.allowed_transitions().contains(&target)
    }

    /// Validates a stage change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStageTransition` carrying the allowed set
    /// if `target` is not reachable from this status.
    pub fn validate_transition(&self, target: Self) -> Result<(), DomainError> {
        if self.can_transition_to(target) {
            return Ok(());
        }
        Err(DomainError::InvalidStageTransition {
            from: *self,
            to: target,
            allowed: self.allowed_transitions().to_vec(),
        })
    }

    /// Returns true if no further transitions exist.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Enrolled | Self::Rejected)
    }

    /// Returns true if `submit` treats this status as a resubmission.
    #[must_use]
    pub const fn accepts_resubmission(&self) -> bool {
        matches!(
            self,
            Self::Submitted | Self::DocumentsPending | Self::UnderReview
        )
    }

    /// Returns true if student and parent details may still be edited.
    #[must_use]
    pub const fn allows_detail_updates(&self) -> bool {
        matches!(
            self,
            Self::Draft | Self::Submitted | Self::UnderReview | Self::DocumentsPending
        )
    }

    /// Returns true if the application belongs in a merit list.
    #[must_use]
    pub const fn is_merit_eligible(&self) -> bool {
        matches!(
            self,
            Self::Submitted | Self::UnderReview | Self::Approved | Self::Waitlisted
        )
    }
}

impl FromStr for ApplicationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|status| status.as_str() == s)
            .copied()
            .ok_or_else(|| DomainError::InvalidApplicationStatus(s.to_string()))
    }
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
