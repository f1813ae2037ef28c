// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;

use crate::{NewApplication, PersistedTransition, Persistence, PersistenceError};
use admissions::{
    ApplicationState, Command, FixedClock, SessionCommand, SessionTransition, TransitionResult,
    apply, apply_session,
};
use admissions_audit::{Action, Actor, AuditEvent, Cause, EntityKind, EntityRef, StateSnapshot};
use admissions_domain::{
    AdmissionApplication, AdmissionSeat, AdmissionSession, Branch, ParentDetails, ParentRelation,
    SessionStatus, StudentDetails, TenantId,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;
use time::macros::{date, datetime};

pub fn test_tenant() -> TenantId {
    TenantId::new(1)
}

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn test_now() -> OffsetDateTime {
    datetime!(2026-03-10 10:30 UTC)
}

pub fn test_clock() -> FixedClock {
    FixedClock(test_now())
}

/// Builds an audit event for a store call that takes one directly.
pub fn test_event(kind: EntityKind, id: i64, name: &str) -> AuditEvent {
    AuditEvent::new(
        test_tenant(),
        EntityRef::new(kind, id),
        create_test_actor(),
        create_test_cause(),
        Action::new(name.to_string(), None),
        StateSnapshot::empty(),
        StateSnapshot::empty(),
        test_now(),
    )
}

pub fn create_test_branch(persistence: &mut Persistence, code: &str, primary: bool) -> Branch {
    let branch: Branch = Branch::new(test_tenant(), code, &format!("{code} campus"), primary);
    persistence
        .create_branch(&branch, test_event(EntityKind::Branch, 0, "CreateBranch"))
        .unwrap()
}

pub fn create_test_session(persistence: &mut Persistence, name: &str) -> AdmissionSession {
    let session: AdmissionSession = AdmissionSession::new(
        test_tenant(),
        None,
        "2026-27",
        name,
        date!(2026 - 03 - 01),
        date!(2026 - 04 - 30),
        500,
        vec![String::from("birth_certificate")],
        BTreeMap::new(),
    )
    .unwrap();
    persistence
        .create_session(&session, test_event(EntityKind::Session, 0, "CreateSession"))
        .unwrap()
}

pub fn change_session_status(
    persistence: &mut Persistence,
    session: &AdmissionSession,
    target: SessionStatus,
) -> AdmissionSession {
    let transition: SessionTransition = apply_session(
        session,
        SessionCommand::ChangeStatus { target },
        create_test_actor(),
        create_test_cause(),
        &test_clock(),
    )
    .unwrap();
    persistence.persist_session_transition(&transition).unwrap().0
}

/// Creates a session and opens it.
pub fn create_open_session(persistence: &mut Persistence, name: &str) -> AdmissionSession {
    let session: AdmissionSession = create_test_session(persistence, name);
    change_session_status(persistence, &session, SessionStatus::Open)
}

pub fn create_test_seat(
    persistence: &mut Persistence,
    session_id: i64,
    class_name: &str,
    total: u32,
) -> AdmissionSeat {
    let seat: AdmissionSeat =
        AdmissionSeat::new(test_tenant(), session_id, class_name, total, 5, BTreeMap::new())
            .unwrap();
    persistence
        .create_seat(&seat, test_event(EntityKind::Seat, 0, "CreateSeat"))
        .unwrap()
}

pub fn test_student(first_name: &str, marks: Option<f64>) -> StudentDetails {
    StudentDetails {
        first_name: first_name.to_string(),
        last_name: String::from("Rao"),
        date_of_birth: Some(date!(2020 - 05 - 14)),
        gender: Some(String::from("female")),
        class_applied: String::from("Grade 1"),
        previous_school: Some(String::from("Little Oaks")),
        previous_marks: marks,
        address: None,
    }
}

pub fn test_parent(name: &str) -> ParentDetails {
    ParentDetails {
        relation: ParentRelation::Mother,
        name: name.to_string(),
        phone: Some(String::from("555-0100")),
        email: Some(String::from("parent@example.com")),
        occupation: None,
    }
}

pub fn create_test_application(
    persistence: &mut Persistence,
    session_id: i64,
    first_name: &str,
    marks: Option<f64>,
) -> AdmissionApplication {
    let new = NewApplication {
        tenant_id: test_tenant(),
        session_id,
        branch_id: None,
        enquiry_id: None,
        student: test_student(first_name, marks),
        parents: vec![test_parent("Meera Rao")],
        remarks: None,
    };
    persistence
        .create_application(&new, create_test_actor(), create_test_cause(), test_now())
        .unwrap()
}

/// Loads the application, applies `command` and persists the result.
pub fn run_command(
    persistence: &mut Persistence,
    application_id: i64,
    command: Command,
) -> Result<PersistedTransition, PersistenceError> {
    let state: ApplicationState = persistence
        .get_application_state(test_tenant(), application_id)
        .unwrap();
    let result: TransitionResult = apply(
        &state,
        command,
        create_test_actor(),
        create_test_cause(),
        &test_clock(),
    )
    .unwrap();
    persistence.persist_transition(&result)
}
