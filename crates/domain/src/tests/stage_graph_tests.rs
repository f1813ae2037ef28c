// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplicationStatus, DomainError, StageEvent};

use ApplicationStatus::{
    Approved, Draft, DocumentsPending, Enrolled, Rejected, Shortlisted, Submitted, TestCompleted,
    TestScheduled, UnderReview, Waitlisted,
};

const EDGES: &[(ApplicationStatus, ApplicationStatus)] = &[
    (Draft, Submitted),
    (Submitted, UnderReview),
    (Submitted, DocumentsPending),
    (Submitted, Rejected),
    (UnderReview, DocumentsPending),
    (UnderReview, TestScheduled),
    (UnderReview, Shortlisted),
    (UnderReview, Approved),
    (UnderReview, Rejected),
    (DocumentsPending, UnderReview),
    (DocumentsPending, Rejected),
    (TestScheduled, TestCompleted),
    (TestScheduled, Rejected),
    (TestCompleted, Shortlisted),
    (TestCompleted, Approved),
    (TestCompleted, Rejected),
    (TestCompleted, Waitlisted),
    (Shortlisted, Approved),
    (Shortlisted, Rejected),
    (Shortlisted, Waitlisted),
    (Approved, Enrolled),
    (Approved, Rejected),
    (Waitlisted, Approved),
    (Waitlisted, Rejected),
];

#[test]
fn test_can_transition_matches_graph_for_every_pair() {
    for from in ApplicationStatus::ALL {
        for to in ApplicationStatus::ALL {
            let expected: bool = EDGES.contains(&(from, to));
            assert_eq!(
                from.can_transition_to(to),
                expected,
                "{from} -> {to} should be {expected}"
            );
        }
    }
}

#[test]
fn test_rejected_pair_returns_allowed_set() {
    for from in ApplicationStatus::ALL {
        let allowed: Vec<ApplicationStatus> = ApplicationStatus::ALL
            .into_iter()
            .filter(|to| EDGES.contains(&(from, *to)))
            .collect();

        for to in ApplicationStatus::ALL {
            if allowed.contains(&to) {
                assert!(from.validate_transition(to).is_ok());
                continue;
            }
            match from.validate_transition(to) {
                Err(DomainError::InvalidStageTransition {
                    from: f,
                    to: t,
                    allowed: mut returned,
                }) => {
                    assert_eq!(f, from);
                    assert_eq!(t, to);
                    let mut expected = allowed.clone();
                    returned.sort_by_key(ApplicationStatus::as_str);
                    expected.sort_by_key(ApplicationStatus::as_str);
                    assert_eq!(returned, expected);
                }
                other => panic!("{from} -> {to}: unexpected {other:?}"),
            }
        }
    }
}

#[test]
fn test_terminal_states_have_no_exits() {
    assert!(Enrolled.allowed_transitions().is_empty());
    assert!(Rejected.allowed_transitions().is_empty());
    assert!(Enrolled.is_terminal());
    assert!(!Approved.is_terminal());
}

#[test]
fn test_status_string_round_trip() {
    for status in ApplicationStatus::ALL {
        let parsed: ApplicationStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }
    assert_eq!(
        "withdrawn".parse::<ApplicationStatus>(),
        Err(DomainError::InvalidApplicationStatus(String::from(
            "withdrawn"
        )))
    );
}

#[test]
fn test_resubmission_states() {
    let resubmittable: Vec<ApplicationStatus> = ApplicationStatus::ALL
        .into_iter()
        .filter(ApplicationStatus::accepts_resubmission)
        .collect();
    assert_eq!(resubmittable, vec![Submitted, UnderReview, DocumentsPending]);
}

#[test]
fn test_stage_event_serializes_with_tag() {
    let event = StageEvent::StageChanged {
        from: Submitted,
        to: UnderReview,
    };
    let json: String = serde_json::to_string(&event).unwrap();
    assert_eq!(
        json,
        r#"{"event":"stage_changed","from":"submitted","to":"under_review"}"#
    );
    assert_eq!(event.event_type(), "stage_changed");

    let back: StageEvent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}
