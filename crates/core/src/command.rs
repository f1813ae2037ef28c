// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{ApplicationStatus, NewDecision, SessionStatus};
use std::collections::BTreeMap;
use time::Date;

/// A command against a single application and its decision.
///
/// Commands are the only way to request application state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Submit a draft, or resubmit an application under review.
    Submit,
    /// Move the application along one edge of the stage graph.
    ChangeStage {
        /// The requested status.
        target: ApplicationStatus,
        /// Optional remarks recorded with the change.
        remarks: Option<String>,
    },
    /// Record the single decision for the application.
    RecordDecision {
        /// The validated decision input.
        decision: NewDecision,
    },
    /// Attach an offer letter to an approved decision.
    GenerateOffer {
        /// Reference to the rendered letter.
        letter_url: String,
        /// Last day the offer can be accepted; defaults to 30 days out.
        valid_until: Option<Date>,
    },
    /// Accept the offer on an approved decision.
    AcceptOffer,
    /// Enroll an approved application whose offer was accepted.
    Enroll,
    /// Turn a waitlisted decision into an approval.
    PromoteFromWaitlist,
    /// Move a waitlisted application to a new position.
    UpdateWaitlistPosition {
        /// The new position, which must be positive.
        position: i64,
    },
    /// Record that the application fee was paid.
    MarkFeePaid,
}

impl Command {
    /// Returns the command name used for audit actions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Submit => "SubmitApplication",
            Self::ChangeStage { .. } => "ChangeStage",
            Self::RecordDecision { .. } => "RecordDecision",
            Self::GenerateOffer { .. } => "GenerateOffer",
            Self::AcceptOffer => "AcceptOffer",
            Self::Enroll => "Enroll",
            Self::PromoteFromWaitlist => "PromoteFromWaitlist",
            Self::UpdateWaitlistPosition { .. } => "UpdateWaitlistPosition",
            Self::MarkFeePaid => "MarkFeePaid",
        }
    }
}

/// Field changes for an admission session. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    pub branch_id: Option<i64>,
    pub academic_year: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub application_fee: Option<i64>,
    pub required_documents: Option<Vec<String>>,
    pub settings: Option<BTreeMap<String, String>>,
}

/// A command against an admission session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Change the session status along the session lifecycle.
    ChangeStatus {
        /// The requested status.
        target: SessionStatus,
    },
    /// Move the end date.
    ExtendDeadline {
        /// The new end date.
        new_end_date: Date,
    },
    /// Edit session details.
    Update(SessionUpdate),
}

impl SessionCommand {
    /// Returns the command name used for audit actions.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ChangeStatus { .. } => "ChangeSessionStatus",
            Self::ExtendDeadline { .. } => "ExtendSessionDeadline",
            Self::Update(_) => "UpdateSession",
        }
    }
}
