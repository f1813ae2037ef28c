// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_cause, create_test_clock};
use crate::{CoreError, SessionCommand, SessionTransition, SessionUpdate, apply_session};
use admissions_audit::EntityKind;
use admissions_domain::{AdmissionSession, DomainError, SessionStatus, TenantId};
use std::collections::BTreeMap;
use time::macros::date;

fn create_test_session(status: SessionStatus) -> AdmissionSession {
    let mut session = AdmissionSession::new(
        TenantId::new(1),
        None,
        "2026-27",
        "Spring intake",
        date!(2026 - 03 - 01),
        date!(2026 - 04 - 30),
        50_000,
        Vec::new(),
        BTreeMap::new(),
    )
    .unwrap();
    session.session_id = Some(3);
    session.status = status;
    session
}

fn run(
    session: &AdmissionSession,
    command: SessionCommand,
) -> Result<SessionTransition, CoreError> {
    apply_session(
        session,
        command,
        create_test_actor(),
        create_test_cause(),
        &create_test_clock(),
    )
}

#[test]
fn test_open_then_close_then_reopen() {
    let session = create_test_session(SessionStatus::Upcoming);

    let opened = run(
        &session,
        SessionCommand::ChangeStatus {
            target: SessionStatus::Open,
        },
    )
    .unwrap();
    assert_eq!(opened.new_session.status, SessionStatus::Open);
    assert_eq!(opened.audit_event.entity.kind, EntityKind::Session);
    assert_eq!(opened.audit_event.action.name, "ChangeSessionStatus");

    let closed = run(
        &opened.new_session,
        SessionCommand::ChangeStatus {
            target: SessionStatus::Closed,
        },
    )
    .unwrap();
    assert_eq!(closed.new_session.status, SessionStatus::Closed);

    let reopened = run(
        &closed.new_session,
        SessionCommand::ChangeStatus {
            target: SessionStatus::Open,
        },
    )
    .unwrap();
    assert_eq!(reopened.new_session.status, SessionStatus::Open);
}

#[test]
fn test_open_cannot_return_to_upcoming() {
    let session = create_test_session(SessionStatus::Open);

    let result = run(
        &session,
        SessionCommand::ChangeStatus {
            target: SessionStatus::Upcoming,
        },
    );

    assert_eq!(
        result.err(),
        Some(CoreError::DomainViolation(
            DomainError::InvalidSessionTransition {
                from: SessionStatus::Open,
                to: SessionStatus::Upcoming,
            }
        ))
    );
}

#[test]
fn test_update_blocked_once_closed() {
    let session = create_test_session(SessionStatus::Closed);

    let result = run(
        &session,
        SessionCommand::Update(SessionUpdate {
            name: Some(String::from("Renamed")),
            ..SessionUpdate::default()
        }),
    );

    assert_eq!(
        result.err(),
        Some(CoreError::DomainViolation(DomainError::SessionClosed {
            session_id: 3
        }))
    );
}

#[test]
fn test_update_only_touches_present_fields() {
    let session = create_test_session(SessionStatus::Open);

    let result = run(
        &session,
        SessionCommand::Update(SessionUpdate {
            application_fee: Some(60_000),
            required_documents: Some(vec![String::from("birth_certificate")]),
            ..SessionUpdate::default()
        }),
    )
    .unwrap();

    assert_eq!(result.new_session.application_fee, 60_000);
    assert_eq!(result.new_session.name, "Spring intake");
    assert_eq!(result.new_session.end_date, date!(2026 - 04 - 30));
    assert_eq!(
        result.new_session.required_documents,
        vec![String::from("birth_certificate")]
    );
}

#[test]
fn test_update_revalidates_date_range() {
    let session = create_test_session(SessionStatus::Upcoming);

    let result = run(
        &session,
        SessionCommand::Update(SessionUpdate {
            start_date: Some(date!(2026 - 05 - 01)),
            ..SessionUpdate::default()
        }),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidDateRange { .. }))
    ));
}

#[test]
fn test_extend_deadline() {
    let session = create_test_session(SessionStatus::Open);

    let result = run(
        &session,
        SessionCommand::ExtendDeadline {
            new_end_date: date!(2026 - 05 - 31),
        },
    )
    .unwrap();

    assert_eq!(result.new_session.end_date, date!(2026 - 05 - 31));
    assert!(result.audit_event.before.data.contains("end=2026-04-30"));
    assert!(result.audit_event.after.data.contains("end=2026-05-31"));
}
