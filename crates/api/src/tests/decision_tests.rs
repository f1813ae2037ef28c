// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_persistence::Persistence;
use time::macros::date;

use crate::{
    CreateBranchRequest, GenerateOfferRequest, IncrementFilledSeatsRequest, RequestContext,
    UpdateWaitlistPositionRequest, accept_offer, create_branch, create_decision, enroll,
    generate_offer_letter, get_application, get_decision, get_seat, get_student,
    increment_filled_seats, list_waitlist, promote_from_waitlist, update_waitlist_position,
};

use super::helpers::{
    create_approved, create_draft, create_open_session, create_test_context,
    create_test_persistence, create_test_seat, create_under_review, decision_request,
    expect_conflict, expect_invalid, expect_not_found, expect_precondition,
};

fn offer_request(application_id: i64) -> GenerateOfferRequest {
    GenerateOfferRequest {
        application_id,
        letter_url: String::from("https://letters.example/offer.pdf"),
        valid_until: None,
    }
}

fn primary_branch(persistence: &mut Persistence, ctx: &RequestContext) -> i64 {
    create_branch(
        persistence,
        ctx,
        &CreateBranchRequest {
            code: String::from("nb"),
            name: String::from("North"),
            is_primary: true,
        },
    )
    .expect("Failed to create branch")
    .branch_id
}

#[test]
fn test_approval_stamps_approver() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");

    let response = create_decision(
        &mut persistence,
        &ctx,
        &decision_request(reviewed.application_id, "approved"),
    )
    .expect("Failed to approve");

    assert_eq!(response.application.status, "approved");
    assert_eq!(response.application.approved_by.as_deref(), Some("officer-1"));
    assert!(response.application.approved_at.is_some());
    let decision = response.decision.expect("decision missing");
    assert_eq!(decision.decision_type, "approved");
    assert_eq!(decision.decided_by, "officer-1");
}

#[test]
fn test_second_decision_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");

    let mut rejection = decision_request(approved.application_id, "rejected");
    rejection.rejection_reason = Some(String::from("Changed mind"));

    expect_conflict(
        create_decision(&mut persistence, &ctx, &rejection),
        "decision_exists",
    );
}

#[test]
fn test_second_decision_after_waitlist_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");
    let mut waitlist = decision_request(reviewed.application_id, "waitlisted");
    waitlist.waitlist_position = Some(2);
    create_decision(&mut persistence, &ctx, &waitlist).unwrap();

    expect_conflict(
        create_decision(
            &mut persistence,
            &ctx,
            &decision_request(reviewed.application_id, "approved"),
        ),
        "decision_exists",
    );
    expect_conflict(
        create_decision(&mut persistence, &ctx, &waitlist),
        "decision_exists",
    );
}

#[test]
fn test_second_decision_after_rejection_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");
    let mut rejection = decision_request(reviewed.application_id, "rejected");
    rejection.rejection_reason = Some(String::from("Incomplete records"));
    let rejected = create_decision(&mut persistence, &ctx, &rejection).unwrap();
    assert_eq!(rejected.application.status, "rejected");

    let mut waitlist = decision_request(reviewed.application_id, "waitlisted");
    waitlist.waitlist_position = Some(1);
    expect_conflict(
        create_decision(&mut persistence, &ctx, &waitlist),
        "decision_exists",
    );
    expect_conflict(
        create_decision(
            &mut persistence,
            &ctx,
            &decision_request(reviewed.application_id, "approved"),
        ),
        "decision_exists",
    );
}

#[test]
fn test_decision_on_draft_is_a_stage_conflict() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let draft = create_draft(&mut persistence, &ctx, session.session_id, "Asha", None);

    expect_conflict(
        create_decision(
            &mut persistence,
            &ctx,
            &decision_request(draft.application_id, "approved"),
        ),
        "stage_transition",
    );
}

#[test]
fn test_decision_input_validation() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");

    expect_invalid(
        create_decision(
            &mut persistence,
            &ctx,
            &decision_request(reviewed.application_id, "waitlisted"),
        ),
        "waitlist_position",
    );

    let mut zero = decision_request(reviewed.application_id, "waitlisted");
    zero.waitlist_position = Some(0);
    expect_invalid(
        create_decision(&mut persistence, &ctx, &zero),
        "waitlist_position",
    );

    let mut blank_reason = decision_request(reviewed.application_id, "rejected");
    blank_reason.rejection_reason = Some(String::from("   "));
    expect_invalid(
        create_decision(&mut persistence, &ctx, &blank_reason),
        "rejection_reason",
    );

    expect_invalid(
        create_decision(
            &mut persistence,
            &ctx,
            &decision_request(reviewed.application_id, "deferred"),
        ),
        "decision_type",
    );

    let mut undated = decision_request(reviewed.application_id, "approved");
    undated.decision_date = None;
    expect_invalid(
        create_decision(&mut persistence, &ctx, &undated),
        "decision_date",
    );
}

#[test]
fn test_offer_defaults_to_thirty_days() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");

    let response =
        generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id))
            .expect("Failed to generate offer");

    let decision = response.decision.expect("decision missing");
    assert_eq!(decision.offer_valid_until, Some(date!(2026 - 04 - 09)));
    assert!(!decision.offer_accepted);
}

#[test]
fn test_accepted_offer_cannot_be_regenerated_or_reaccepted() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");
    generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id))
        .unwrap();

    let accepted = accept_offer(&mut persistence, &ctx, approved.application_id).unwrap();
    let decision = accepted.decision.expect("decision missing");
    assert!(decision.offer_accepted);
    assert!(decision.offer_accepted_at.is_some());

    expect_conflict(
        accept_offer(&mut persistence, &ctx, approved.application_id),
        "offer_already_accepted",
    );
    expect_conflict(
        generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id)),
        "offer_already_accepted",
    );
}

#[test]
fn test_expired_offer_cannot_be_accepted() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");
    let mut request = offer_request(approved.application_id);
    request.valid_until = Some(date!(2026 - 03 - 09));
    generate_offer_letter(&mut persistence, &ctx, &request).unwrap();

    expect_conflict(
        accept_offer(&mut persistence, &ctx, approved.application_id),
        "offer_expired",
    );
}

#[test]
fn test_offer_requires_decision() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");

    expect_not_found(
        accept_offer(&mut persistence, &ctx, reviewed.application_id),
        "Decision",
    );
    expect_not_found(
        get_decision(&mut persistence, &ctx, reviewed.application_id),
        "Decision",
    );
}

#[test]
fn test_enroll_requires_accepted_offer() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    primary_branch(&mut persistence, &ctx);
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");

    expect_precondition(
        enroll(&mut persistence, &ctx, approved.application_id),
        "offer_not_accepted",
    );
}

#[test]
fn test_enroll_requires_approved_status() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let reviewed = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");

    expect_precondition(
        enroll(&mut persistence, &ctx, reviewed.application_id),
        "application_not_approved",
    );
}

#[test]
fn test_enroll_without_branch_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");
    generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id))
        .unwrap();
    accept_offer(&mut persistence, &ctx, approved.application_id).unwrap();

    expect_precondition(
        enroll(&mut persistence, &ctx, approved.application_id),
        "no_branch_available",
    );
    let detail = get_application(&mut persistence, &ctx, approved.application_id).unwrap();
    assert_eq!(detail.application.status, "approved");
}

#[test]
fn test_enroll_creates_student_and_fills_seat() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let branch_id = primary_branch(&mut persistence, &ctx);
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");
    generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id))
        .unwrap();
    accept_offer(&mut persistence, &ctx, approved.application_id).unwrap();

    let response = enroll(&mut persistence, &ctx, approved.application_id).unwrap();

    assert_eq!(response.application.status, "enrolled");
    assert!(response.application.enrolled_at.is_some());
    let student = response.student.expect("student missing");
    assert_eq!(student.admission_number, "ADM-NB-2026-0001");
    assert_eq!(student.branch_id, branch_id);
    assert_eq!(student.class_name, "Grade 1");
    assert!(response.message.contains("ADM-NB-2026-0001"));

    assert_eq!(get_seat(&mut persistence, &ctx, seat.seat_id).unwrap().filled_seats, 1);
    let stored = get_student(&mut persistence, &ctx, approved.application_id).unwrap();
    assert_eq!(stored.student_id, student.student_id);
}

#[test]
fn test_enroll_into_full_class_rolls_back() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    primary_branch(&mut persistence, &ctx);
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 1);
    increment_filled_seats(
        &mut persistence,
        &ctx,
        &IncrementFilledSeatsRequest {
            seat_id: seat.seat_id,
            count: 1,
        },
    )
    .unwrap();
    let approved = create_approved(&mut persistence, &ctx, session.session_id, "Asha");
    generate_offer_letter(&mut persistence, &ctx, &offer_request(approved.application_id))
        .unwrap();
    accept_offer(&mut persistence, &ctx, approved.application_id).unwrap();

    expect_conflict(
        enroll(&mut persistence, &ctx, approved.application_id),
        "seat_capacity_exceeded",
    );

    let detail = get_application(&mut persistence, &ctx, approved.application_id).unwrap();
    assert_eq!(detail.application.status, "approved");
    expect_not_found(
        get_student(&mut persistence, &ctx, approved.application_id),
        "Student",
    );
}

#[test]
fn test_waitlist_position_promotion_flow() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let first = create_under_review(&mut persistence, &ctx, session.session_id, "Asha");
    let second = create_under_review(&mut persistence, &ctx, session.session_id, "Ravi");

    for (application_id, position) in [(first.application_id, 2), (second.application_id, 1)] {
        let mut request = decision_request(application_id, "waitlisted");
        request.waitlist_position = Some(position);
        let response = create_decision(&mut persistence, &ctx, &request).unwrap();
        assert_eq!(response.application.status, "waitlisted");
        assert_eq!(
            response.application.waitlist_position,
            Some(u32::try_from(position).unwrap())
        );
    }

    let waitlist = list_waitlist(&mut persistence, &ctx, session.session_id, "Grade 1").unwrap();
    let order: Vec<i64> = waitlist.iter().map(|d| d.application_id).collect();
    assert_eq!(order, vec![second.application_id, first.application_id]);

    let moved = update_waitlist_position(
        &mut persistence,
        &ctx,
        &UpdateWaitlistPositionRequest {
            application_id: first.application_id,
            position: 5,
        },
    )
    .unwrap();
    assert_eq!(moved.application.waitlist_position, Some(5));

    expect_invalid(
        update_waitlist_position(
            &mut persistence,
            &ctx,
            &UpdateWaitlistPositionRequest {
                application_id: first.application_id,
                position: -1,
            },
        ),
        "waitlist_position",
    );

    let promoted = promote_from_waitlist(&mut persistence, &ctx, second.application_id).unwrap();
    assert_eq!(promoted.application.status, "approved");
    assert_eq!(promoted.application.waitlist_position, None);
    assert_eq!(
        promoted.decision.map(|d| d.decision_type),
        Some(String::from("approved"))
    );

    expect_conflict(
        promote_from_waitlist(&mut persistence, &ctx, second.application_id),
        "decision_type",
    );
}
