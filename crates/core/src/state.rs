// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_audit::{AuditEvent, StateSnapshot};
use admissions_domain::{AdmissionApplication, AdmissionDecision, AdmissionSession, StageHistoryEntry};

/// An application together with its decision, if one was recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationState {
    pub application: AdmissionApplication,
    pub decision: Option<AdmissionDecision>,
}

impl ApplicationState {
    /// Creates a new `ApplicationState`.
    #[must_use]
    pub const fn new(
        application: AdmissionApplication,
        decision: Option<AdmissionDecision>,
    ) -> Self {
        Self {
            application,
            decision,
        }
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        let app: &AdmissionApplication = &self.application;
        let decision: String = self.decision.as_ref().map_or_else(
            || String::from("none"),
            |d| {
                format!(
                    "{}(offer_accepted={})",
                    d.decision_type, d.offer.accepted
                )
            },
        );
        let position: String = app
            .waitlist_position
            .map_or_else(|| String::from("none"), |p| p.to_string());
        StateSnapshot::new(format!(
            "application={},status={},waitlist_position={},fee_paid={},decision={}",
            app.application_number, app.status, position, app.fee_paid, decision
        ))
    }
}

/// How the decision row changes as part of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionWrite {
    /// The decision is untouched.
    Unchanged,
    /// A new decision is inserted.
    Insert(AdmissionDecision),
    /// The existing decision is updated in place.
    Update(AdmissionDecision),
}

/// Work the store must do, atomically with the status change, when an
/// application is enrolled.
///
/// The store resolves the branch, allocates the admission number, creates
/// the student record and consumes a seat for `(session_id, class_name)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrollmentPlan {
    pub session_id: i64,
    pub class_name: String,
    /// The application's own branch, first in the resolution chain.
    pub preferred_branch_id: Option<i64>,
}

/// The result of a successful application transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The new state after the transition.
    pub new_state: ApplicationState,
    /// The decision row change, if any.
    pub decision_write: DecisionWrite,
    /// Present when the transition enrolls the application.
    pub enrollment: Option<EnrollmentPlan>,
    /// The stage-history entry to append.
    pub stage_entry: StageHistoryEntry,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// The result of a successful session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTransition {
    /// The session after the transition.
    pub new_session: AdmissionSession,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
}

/// Converts a session to a snapshot for audit purposes.
#[must_use]
pub fn session_snapshot(session: &AdmissionSession) -> StateSnapshot {
    StateSnapshot::new(format!(
        "session={},academic_year={},status={},start={},end={},fee={}",
        session.name,
        session.academic_year,
        session.status,
        session.start_date,
        session.end_date,
        session.application_fee
    ))
}
