// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application_status::ApplicationStatus;
use crate::decision::DecisionType;
use crate::session::SessionStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or blank.
    MissingField {
        /// The field name.
        field: &'static str,
    },
    /// A field has an invalid value.
    InvalidField {
        /// The field name.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// A date range ends before it starts.
    InvalidDateRange {
        /// The start of the range.
        start: time::Date,
        /// The end of the range.
        end: time::Date,
    },
    /// Session status string is not recognised.
    InvalidSessionStatus(String),
    /// Application status string is not recognised.
    InvalidApplicationStatus(String),
    /// Decision type string is not recognised.
    InvalidDecisionType(String),
    /// Parent relation string is not recognised.
    InvalidParentRelation(String),
    /// The session status change is not allowed.
    InvalidSessionTransition {
        /// The current status.
        from: SessionStatus,
        /// The requested status.
        to: SessionStatus,
    },
    /// The session is closed and cannot be modified.
    SessionClosed {
        /// The session identifier.
        session_id: i64,
    },
    /// The session is not accepting applications.
    SessionNotOpen {
        /// The session identifier.
        session_id: i64,
        /// The current status.
        status: SessionStatus,
    },
    /// An open session cannot be deleted.
    SessionOpen {
        /// The session identifier.
        session_id: i64,
    },
    /// A session with linked applications cannot be deleted.
    SessionHasApplications {
        /// The session identifier.
        session_id: i64,
        /// The number of linked applications.
        count: i64,
    },
    /// A session with the same name exists for the academic year.
    DuplicateSessionName {
        /// The academic year.
        academic_year: String,
        /// The duplicate name.
        name: String,
    },
    /// A seat configuration for the class already exists in the session.
    DuplicateSeatClass {
        /// The session identifier.
        session_id: i64,
        /// The duplicate class name.
        class_name: String,
    },
    /// The new total would drop below the seats already filled.
    FilledExceedsTotal {
        /// The requested total.
        total: u32,
        /// The seats already filled.
        filled: u32,
    },
    /// Filling the requested seats would exceed capacity.
    SeatCapacityExceeded {
        /// The seat capacity.
        total: u32,
        /// The seats already filled.
        filled: u32,
        /// The requested change.
        requested: i32,
    },
    /// A seat configuration with filled seats cannot be deleted.
    SeatInUse {
        /// The seats already filled.
        filled: u32,
    },
    /// Reserved quotas add up to more than the total seats.
    ReservedQuotaExceedsTotal {
        /// The sum of reserved quotas.
        reserved: u32,
        /// The total seats.
        total: u32,
    },
    /// The application stage change is not on the transition graph.
    InvalidStageTransition {
        /// The current status.
        from: ApplicationStatus,
        /// The requested status.
        to: ApplicationStatus,
        /// Every status reachable from `from`.
        allowed: Vec<ApplicationStatus>,
    },
    /// Only draft applications can be deleted.
    ApplicationNotDraft {
        /// The current status.
        status: ApplicationStatus,
    },
    /// The application can no longer be edited.
    ApplicationNotEditable {
        /// The current status.
        status: ApplicationStatus,
    },
    /// Enrollment requires an approved application.
    ApplicationNotApproved {
        /// The current status.
        status: ApplicationStatus,
    },
    /// A decision has already been recorded for the application.
    DecisionExists {
        /// The application identifier.
        application_id: i64,
    },
    /// The decision is of the wrong type for the operation.
    DecisionTypeMismatch {
        /// The type the operation requires.
        expected: DecisionType,
        /// The type on record.
        actual: DecisionType,
    },
    /// The offer was already accepted.
    OfferAlreadyAccepted,
    /// The offer validity window has passed.
    OfferExpired {
        /// The last valid day.
        valid_until: time::Date,
    },
    /// Enrollment requires an accepted offer.
    OfferNotAccepted,
    /// The merit list is finalized and immutable.
    MeritListFinalized {
        /// The merit list identifier.
        merit_list_id: i64,
    },
    /// No branch could be resolved for the tenant.
    NoBranchAvailable,
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => write!(f, "Missing required field: {field}"),
            Self::InvalidField { field, reason } => write!(f, "Invalid {field}: {reason}"),
            Self::InvalidDateRange { start, end } => {
                write!(f, "End date {end} is before start date {start}")
            }
            Self::InvalidSessionStatus(s) => write!(f, "Invalid session status: {s}"),
            Self::InvalidApplicationStatus(s) => write!(f, "Invalid application status: {s}"),
            Self::InvalidDecisionType(s) => write!(f, "Invalid decision type: {s}"),
            Self::InvalidParentRelation(s) => write!(f, "Invalid parent relation: {s}"),
            Self::InvalidSessionTransition { from, to } => {
                write!(f, "Cannot change session status from '{from}' to '{to}'")
            }
            Self::SessionClosed { session_id } => {
                write!(f, "Admission session {session_id} is closed")
            }
            Self::SessionNotOpen { session_id, status } => {
                write!(
                    f,
                    "Admission session {session_id} is not open for applications (status '{status}')"
                )
            }
            Self::SessionOpen { session_id } => {
                write!(f, "Admission session {session_id} is open and cannot be deleted")
            }
            Self::SessionHasApplications { session_id, count } => {
                write!(
                    f,
                    "Admission session {session_id} has {count} linked application(s)"
                )
            }
            Self::DuplicateSessionName {
                academic_year,
                name,
            } => {
                write!(
                    f,
                    "Admission session '{name}' already exists for academic year {academic_year}"
                )
            }
            Self::DuplicateSeatClass {
                session_id,
                class_name,
            } => {
                write!(
                    f,
                    "Seats for class '{class_name}' are already configured in session {session_id}"
                )
            }
            Self::FilledExceedsTotal { total, filled } => {
                write!(
                    f,
                    "Total seats {total} is below the {filled} seat(s) already filled"
                )
            }
            Self::SeatCapacityExceeded {
                total,
                filled,
                requested,
            } => {
                write!(
                    f,
                    "Seat capacity exceeded: {filled} of {total} filled, requested {requested:+}"
                )
            }
            Self::SeatInUse { filled } => {
                write!(f, "Seat configuration has {filled} filled seat(s)")
            }
            Self::ReservedQuotaExceedsTotal { reserved, total } => {
                write!(
                    f,
                    "Reserved quotas ({reserved}) exceed total seats ({total})"
                )
            }
            Self::InvalidStageTransition { from, to, allowed } => {
                let allowed: Vec<&str> = allowed.iter().map(ApplicationStatus::as_str).collect();
                write!(
                    f,
                    "Cannot move application from '{from}' to '{to}'; allowed: [{}]",
                    allowed.join(", ")
                )
            }
            Self::ApplicationNotDraft { status } => {
                write!(f, "Only draft applications can be deleted (status '{status}')")
            }
            Self::ApplicationNotEditable { status } => {
                write!(f, "Application cannot be edited in status '{status}'")
            }
            Self::ApplicationNotApproved { status } => {
                write!(f, "Application must be approved (status '{status}')")
            }
            Self::DecisionExists { application_id } => {
                write!(
                    f,
                    "A decision already exists for application {application_id}"
                )
            }
            Self::DecisionTypeMismatch { expected, actual } => {
                write!(f, "Decision must be '{expected}' but is '{actual}'")
            }
            Self::OfferAlreadyAccepted => write!(f, "Offer has already been accepted"),
            Self::OfferExpired { valid_until } => {
                write!(f, "Offer expired after {valid_until}")
            }
            Self::OfferNotAccepted => write!(f, "Offer has not been accepted"),
            Self::MeritListFinalized { merit_list_id } => {
                write!(f, "Merit list {merit_list_id} is finalized")
            }
            Self::NoBranchAvailable => write!(f, "No branch is configured for the tenant"),
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
