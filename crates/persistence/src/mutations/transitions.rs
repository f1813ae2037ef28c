// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persisting the results of core transitions.
//!
//! Each function must run inside one immediate transaction: any failure
//! rolls back every write, leaving the application in its prior state.

use admissions::{DecisionWrite, EnrollmentPlan, SessionTransition, TransitionResult};
use admissions_domain::{
    AdmissionApplication, AdmissionDecision, AdmissionSession, Branch, DomainError,
    SequenceScope, StageEvent, StageHistoryEntry, Student, TenantId,
};
use diesel::SqliteConnection;
use tracing::{info, warn};

use crate::error::PersistenceError;
use crate::mutations::{applications, audit, decisions, seats, sequences, sessions, students};
use crate::queries;

/// What a persisted application transition produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedTransition {
    /// The application as stored, with its new version.
    pub application: AdmissionApplication,
    /// The decision as stored, if the application has one.
    pub decision: Option<AdmissionDecision>,
    /// The student record, when the transition enrolled the application.
    pub student: Option<Student>,
    /// The stage-history entry with its assigned sequence.
    pub stage_entry: StageHistoryEntry,
    /// The audit event ID.
    pub event_id: i64,
}

/// Persists an application transition.
///
/// Writes, in order: the version-checked application update, the decision
/// insert or update, the enrollment work (branch, admission number, seat,
/// student), the stage-history entry and the audit event.
///
/// # Errors
///
/// Returns an error if any write fails; the caller's transaction then
/// rolls back all of them.
pub fn persist_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<PersistedTransition, PersistenceError> {
    let mut application: AdmissionApplication = result.new_state.application.clone();
    let tenant_id: TenantId = application.tenant_id;
    let application_id: i64 = application.id();

    application.version =
        applications::update_application_status(conn, &application, application.version)?;

    let decision: Option<AdmissionDecision> = match &result.decision_write {
        DecisionWrite::Unchanged => result.new_state.decision.clone(),
        DecisionWrite::Insert(decision) => {
            let mut stored: AdmissionDecision = decision.clone();
            stored.decision_id = Some(decisions::insert_decision(conn, decision)?);
            stored.version = 1;
            Some(stored)
        }
        DecisionWrite::Update(decision) => {
            let mut stored: AdmissionDecision = decision.clone();
            stored.version = decisions::update_decision(conn, decision)?;
            Some(stored)
        }
    };

    let mut stage_entry: StageHistoryEntry = result.stage_entry.clone();
    let student: Option<Student> = match &result.enrollment {
        Some(plan) => {
            let section: Option<String> = decision
                .as_ref()
                .and_then(|d| d.section_assigned.clone());
            let student: Student = enroll(conn, &application, plan, section)?;
            stage_entry.event = StageEvent::Enrolled {
                admission_number: Some(student.admission_number.clone()),
            };
            Some(student)
        }
        None => None,
    };

    stage_entry.sequence =
        applications::append_stage_entry(conn, tenant_id, application_id, &stage_entry)?;
    let event_id: i64 = audit::persist_audit_event(conn, &result.audit_event)?;

    info!(
        event_id,
        application_id,
        action = %result.audit_event.action.name,
        status = %application.status,
        "Persisted application transition"
    );

    Ok(PersistedTransition {
        application,
        decision,
        student,
        stage_entry,
        event_id,
    })
}

fn enroll(
    conn: &mut SqliteConnection,
    application: &AdmissionApplication,
    plan: &EnrollmentPlan,
    section: Option<String>,
) -> Result<Student, PersistenceError> {
    let tenant_id: TenantId = application.tenant_id;
    let branch: Branch =
        queries::branches::resolve_enrollment_branch(conn, tenant_id, plan.preferred_branch_id)?
            .ok_or(PersistenceError::RuleViolation(DomainError::NoBranchAvailable))?;
    let branch_id: i64 = branch.branch_id.unwrap_or_default();

    let admitted_at = application.enrolled_at.unwrap_or(application.updated_at);
    let scope = SequenceScope::Admission {
        branch_id,
        branch_code: branch.code.clone(),
        year: admitted_at.year(),
    };
    let admission_number: String = sequences::allocate_number(conn, tenant_id, &scope)?;

    match queries::seats::find_seat_for_class(conn, tenant_id, plan.session_id, &plan.class_name)?
    {
        Some(seat) => {
            seats::adjust_filled_seats(conn, tenant_id, seat.seat_id.unwrap_or_default(), 1)?;
        }
        None => warn!(
            application_id = application.id(),
            session_id = plan.session_id,
            class_name = %plan.class_name,
            "No seat configuration for class; enrolling without consuming a seat"
        ),
    }

    let mut student: Student =
        Student::from_application(application, branch_id, admission_number, section, admitted_at);
    student.student_id = Some(students::insert_student(conn, &student)?);
    Ok(student)
}

/// Persists a session transition and its audit event.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the session changed since it was
/// read, or any write error.
pub fn persist_session_transition(
    conn: &mut SqliteConnection,
    transition: &SessionTransition,
) -> Result<(AdmissionSession, i64), PersistenceError> {
    let mut session: AdmissionSession = transition.new_session.clone();
    session.version = sessions::update_session(conn, &session)?;
    let event_id: i64 = audit::persist_audit_event(conn, &transition.audit_event)?;
    info!(
        event_id,
        session_id = session.id(),
        action = %transition.audit_event.action.name,
        "Persisted session transition"
    );
    Ok((session, event_id))
}
