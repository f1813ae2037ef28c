// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{
    create_open_session, create_test_application, run_command, test_now, test_tenant,
};
use crate::{PersistedTransition, Persistence, PersistenceError};
use admissions::Command;
use admissions_audit::{AuditEvent, EntityKind, EntityRef};
use admissions_domain::{AdmissionApplication, AdmissionSession};

#[test]
fn test_application_trail_records_each_mutation() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let session: AdmissionSession = create_open_session(&mut persistence, "Main intake");
    let application: AdmissionApplication =
        create_test_application(&mut persistence, session.id(), "Asha", None);
    let persisted: PersistedTransition =
        run_command(&mut persistence, application.id(), Command::Submit).unwrap();

    let entity = EntityRef::new(EntityKind::Application, application.id());
    let trail: Vec<AuditEvent> = persistence
        .audit_events_for_entity(test_tenant(), entity)
        .unwrap();

    let actions: Vec<&str> = trail.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(actions, vec!["CreateApplication", "SubmitApplication"]);
    assert!(trail[0].before.is_empty());
    assert!(trail[1].before.data.contains("status=draft"));
    assert!(trail[1].after.data.contains("status=submitted"));
    assert_eq!(trail[1].event_id, Some(persisted.event_id));
    assert_eq!(trail[1].actor.id, "officer-1");
    assert_eq!(trail[1].recorded_at, test_now());
}

#[test]
fn test_session_events_are_separate_from_application_events() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let session: AdmissionSession = create_open_session(&mut persistence, "Main intake");

    let trail: Vec<AuditEvent> = persistence
        .audit_events_for_entity(
            test_tenant(),
            EntityRef::new(EntityKind::Session, session.id()),
        )
        .unwrap();

    let actions: Vec<&str> = trail.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(actions, vec!["CreateSession", "ChangeSessionStatus"]);
    assert!(trail.iter().all(|e| e.entity.id == session.id()));
}

#[test]
fn test_get_audit_event_round_trips() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let session: AdmissionSession = create_open_session(&mut persistence, "Main intake");
    let application: AdmissionApplication =
        create_test_application(&mut persistence, session.id(), "Asha", None);
    let persisted: PersistedTransition =
        run_command(&mut persistence, application.id(), Command::MarkFeePaid).unwrap();

    let event: AuditEvent = persistence
        .get_audit_event(test_tenant(), persisted.event_id)
        .unwrap();

    assert_eq!(event.action.name, "MarkFeePaid");
    assert_eq!(event.entity, EntityRef::new(EntityKind::Application, application.id()));
    assert!(matches!(
        persistence.get_audit_event(test_tenant(), persisted.event_id + 100),
        Err(PersistenceError::NotFound { .. })
    ));
}
