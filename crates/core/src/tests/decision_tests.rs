// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    accepted_offer, create_test_actor, create_test_cause, create_test_clock,
    create_test_decision, state_with,
};
use crate::{
    ApplicationState, Clock, Command, CoreError, DecisionWrite, FixedClock, TransitionResult,
    apply,
};
use admissions_domain::{
    AdmissionDecision, ApplicationStatus, DecisionType, DomainError, NewDecision, Offer,
    StageEvent,
};
use time::macros::{date, datetime};

fn run(state: &ApplicationState, command: Command) -> Result<TransitionResult, CoreError> {
    apply(
        state,
        command,
        create_test_actor(),
        create_test_cause(),
        &create_test_clock(),
    )
}

fn record(decision_type: &str, position: Option<i64>, reason: Option<&str>) -> Command {
    Command::RecordDecision {
        decision: NewDecision::parse(
            decision_type,
            Some(date!(2026 - 03 - 10)),
            Some(String::from("A")),
            position,
            reason.map(String::from),
        )
        .unwrap(),
    }
}

#[test]
fn test_approval_inserts_decision_and_stamps_application() {
    let state: ApplicationState = state_with(ApplicationStatus::Shortlisted, None);

    let result: TransitionResult = run(&state, record("approved", None, None)).unwrap();

    let app = &result.new_state.application;
    assert_eq!(app.status, ApplicationStatus::Approved);
    assert_eq!(app.approved_by.as_deref(), Some("officer-1"));
    assert_eq!(app.approved_at, Some(create_test_clock().now()));
    match &result.decision_write {
        DecisionWrite::Insert(decision) => {
            assert_eq!(decision.decision_type, DecisionType::Approved);
            assert_eq!(decision.application_id, 11);
            assert_eq!(decision.decided_by, "officer-1");
            assert_eq!(decision.section_assigned.as_deref(), Some("A"));
            assert!(!decision.offer.accepted);
        }
        other => panic!("expected insert, got {other:?}"),
    }
    assert_eq!(
        result.stage_entry.event,
        StageEvent::DecisionRecorded {
            decision: DecisionType::Approved
        }
    );
}

#[test]
fn test_waitlist_decision_copies_position() {
    let state: ApplicationState = state_with(ApplicationStatus::TestCompleted, None);

    let result: TransitionResult = run(&state, record("waitlisted", Some(7), None)).unwrap();

    assert_eq!(
        result.new_state.application.status,
        ApplicationStatus::Waitlisted
    );
    assert_eq!(result.new_state.application.waitlist_position, Some(7));
}

#[test]
fn test_rejection_moves_to_rejected() {
    let state: ApplicationState = state_with(ApplicationStatus::UnderReview, None);

    let result: TransitionResult =
        run(&state, record("rejected", None, Some("Age criteria not met"))).unwrap();

    assert_eq!(
        result.new_state.application.status,
        ApplicationStatus::Rejected
    );
}

#[test]
fn test_second_decision_always_fails() {
    for existing in [
        DecisionType::Approved,
        DecisionType::Waitlisted,
        DecisionType::Rejected,
    ] {
        let decision: AdmissionDecision = create_test_decision(existing, Offer::default());
        let state: ApplicationState =
            state_with(existing.implied_status(), Some(decision));

        for command in [
            record("approved", None, None),
            record("waitlisted", Some(1), None),
            record("rejected", None, Some("Duplicate")),
        ] {
            let result = run(&state, command);
            assert_eq!(
                result.err(),
                Some(CoreError::DomainViolation(DomainError::DecisionExists {
                    application_id: 11
                })),
                "existing {existing}"
            );
        }
    }
}

#[test]
fn test_decision_on_draft_is_rejected() {
    let state: ApplicationState = state_with(ApplicationStatus::Draft, None);

    let result = run(&state, record("approved", None, None));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStageTransition { .. }
        ))
    ));
}

#[test]
fn test_generate_offer_defaults_to_thirty_days() {
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result: TransitionResult = run(
        &state,
        Command::GenerateOffer {
            letter_url: String::from("https://letters.example/11"),
            valid_until: None,
        },
    )
    .unwrap();

    match result.decision_write {
        DecisionWrite::Update(decision) => {
            assert_eq!(decision.offer.valid_until, Some(date!(2026 - 04 - 09)));
            assert_eq!(
                decision.offer.letter_url.as_deref(),
                Some("https://letters.example/11")
            );
        }
        other => panic!("expected update, got {other:?}"),
    }
    assert_eq!(
        result.new_state.application.status,
        ApplicationStatus::Approved
    );
}

#[test]
fn test_generate_offer_requires_approved_decision() {
    let decision: AdmissionDecision =
        create_test_decision(DecisionType::Waitlisted, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Waitlisted, Some(decision));

    let result = run(
        &state,
        Command::GenerateOffer {
            letter_url: String::from("https://letters.example/11"),
            valid_until: None,
        },
    );

    assert_eq!(
        result.err(),
        Some(CoreError::DomainViolation(
            DomainError::DecisionTypeMismatch {
                expected: DecisionType::Approved,
                actual: DecisionType::Waitlisted,
            }
        ))
    );

    let no_decision: ApplicationState = state_with(ApplicationStatus::Approved, None);
    let result = run(&no_decision, Command::AcceptOffer);
    assert_eq!(
        result.err(),
        Some(CoreError::DecisionNotFound { application_id: 11 })
    );
}

#[test]
fn test_accept_offer() {
    let offer = Offer {
        valid_until: Some(date!(2026 - 03 - 10)),
        ..Offer::default()
    };
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, offer);
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result: TransitionResult = run(&state, Command::AcceptOffer).unwrap();

    let decision = result.new_state.decision.unwrap();
    assert!(decision.offer.accepted);
    assert_eq!(decision.offer.accepted_at, Some(create_test_clock().now()));
    assert_eq!(result.stage_entry.event, StageEvent::OfferAccepted);
}

#[test]
fn test_accept_offer_twice_fails() {
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, accepted_offer());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result = run(&state, Command::AcceptOffer);

    assert_eq!(
        result.err(),
        Some(CoreError::DomainViolation(DomainError::OfferAlreadyAccepted))
    );
}

#[test]
fn test_accept_expired_offer_fails() {
    let offer = Offer {
        valid_until: Some(date!(2026 - 03 - 09)),
        ..Offer::default()
    };
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, offer);
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result = run(&state, Command::AcceptOffer);

    assert_eq!(
        result.err(),
        Some(CoreError::DomainViolation(DomainError::OfferExpired {
            valid_until: date!(2026 - 03 - 09)
        }))
    );
}

#[test]
fn test_offer_without_validity_never_expires() {
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));
    let far_future = FixedClock(datetime!(2030-01-01 00:00 UTC));

    let result = apply(
        &state,
        Command::AcceptOffer,
        create_test_actor(),
        create_test_cause(),
        &far_future,
    );

    assert!(result.is_ok());
}

#[test]
fn test_enroll_requires_approved_status_and_accepted_offer() {
    let pending = create_test_decision(DecisionType::Approved, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(pending));
    assert_eq!(
        run(&state, Command::Enroll).err(),
        Some(CoreError::DomainViolation(DomainError::OfferNotAccepted))
    );

    let accepted = create_test_decision(DecisionType::Approved, accepted_offer());
    let state: ApplicationState = state_with(ApplicationStatus::Shortlisted, Some(accepted));
    assert_eq!(
        run(&state, Command::Enroll).err(),
        Some(CoreError::DomainViolation(
            DomainError::ApplicationNotApproved {
                status: ApplicationStatus::Shortlisted
            }
        ))
    );
}

#[test]
fn test_enroll_after_accepted_offer() {
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, accepted_offer());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result: TransitionResult = run(&state, Command::Enroll).unwrap();

    assert_eq!(
        result.new_state.application.status,
        ApplicationStatus::Enrolled
    );
    assert!(result.enrollment.is_some());
    assert_eq!(result.decision_write, DecisionWrite::Unchanged);
}

#[test]
fn test_promote_from_waitlist() {
    let decision: AdmissionDecision =
        create_test_decision(DecisionType::Waitlisted, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Waitlisted, Some(decision));
    assert_eq!(state.application.waitlist_position, Some(4));

    let result: TransitionResult = run(&state, Command::PromoteFromWaitlist).unwrap();

    let app = &result.new_state.application;
    assert_eq!(app.status, ApplicationStatus::Approved);
    assert_eq!(app.waitlist_position, None);
    assert_eq!(app.approved_by.as_deref(), Some("officer-1"));
    match result.decision_write {
        DecisionWrite::Update(decision) => {
            assert_eq!(decision.decision_type, DecisionType::Approved);
            assert_eq!(decision.waitlist_position, None);
        }
        other => panic!("expected update, got {other:?}"),
    }
}

#[test]
fn test_promote_requires_waitlisted_decision() {
    let decision: AdmissionDecision = create_test_decision(DecisionType::Approved, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Approved, Some(decision));

    let result = run(&state, Command::PromoteFromWaitlist);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::DecisionTypeMismatch { .. }
        ))
    ));
}

#[test]
fn test_update_waitlist_position() {
    let decision: AdmissionDecision =
        create_test_decision(DecisionType::Waitlisted, Offer::default());
    let state: ApplicationState = state_with(ApplicationStatus::Waitlisted, Some(decision));

    let result: TransitionResult =
        run(&state, Command::UpdateWaitlistPosition { position: 2 }).unwrap();

    assert_eq!(result.new_state.application.waitlist_position, Some(2));
    assert_eq!(
        result.new_state.decision.unwrap().waitlist_position,
        Some(2)
    );
    assert_eq!(
        result.stage_entry.event,
        StageEvent::WaitlistPositionChanged {
            from: Some(4),
            to: 2
        }
    );

    let result = run(&state, Command::UpdateWaitlistPosition { position: 0 });
    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidField {
            field: "waitlist_position",
            ..
        }))
    ));
}
