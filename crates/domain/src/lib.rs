// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod application;
mod application_status;
mod decision;
mod error;
mod merit;
mod seat;
mod sequence;
mod session;
mod stage_history;
mod student;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use application::{
    Address, AdmissionApplication, ApplicationDocument, ParentDetails, ParentRelation,
    StudentDetails,
};
pub use application_status::ApplicationStatus;
pub use decision::{
    AdmissionDecision, DEFAULT_OFFER_VALIDITY_DAYS, DecisionType, NewDecision, Offer,
    default_offer_valid_until,
};
pub use error::DomainError;
pub use merit::{
    MeritCandidate, MeritList, MeritListEntry, MeritListKey, PreviousMarksScoring, RankedPool,
    ScoringStrategy, rank_candidates,
};
pub use seat::{AdmissionSeat, apply_fill_delta, validate_reserved_quotas, validate_seat_total};
pub use sequence::SequenceScope;
pub use session::{AdmissionSession, SessionStatus};
pub use stage_history::{StageEvent, StageHistoryEntry};
pub use student::Student;
pub use types::{Branch, TenantId};
pub use validation::{
    validate_class_name, validate_parent, validate_previous_marks, validate_session_fields,
    validate_student_details, validate_waitlist_position,
};
