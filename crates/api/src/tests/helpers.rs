// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::collections::BTreeMap;
use std::sync::Arc;

use admissions::FixedClock;
use admissions_audit::{Actor, Cause};
use admissions_domain::{StudentDetails, TenantId};
use admissions_persistence::Persistence;
use time::macros::{date, datetime};

use crate::{
    ApiError, ApplicationInfo, ChangeSessionStatusRequest, CreateApplicationRequest,
    CreateDecisionRequest, CreateSeatRequest, CreateSessionRequest, ParentInput, RequestContext,
    SeatInfo, SessionInfo, TransitionResponse, UpdateStageRequest, change_session_status,
    create_application, create_decision, create_seat, create_session, submit_application,
    update_stage,
};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

/// A context for tenant 1 pinned to 2026-03-10 10:30 UTC.
pub fn create_test_context() -> RequestContext {
    RequestContext::new(
        TenantId::new(1),
        create_test_actor(),
        create_test_cause(),
        Arc::new(FixedClock(datetime!(2026-03-10 10:30 UTC))),
    )
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn session_request(name: &str) -> CreateSessionRequest {
    CreateSessionRequest {
        branch_id: None,
        academic_year: String::from("2026-27"),
        name: name.to_string(),
        start_date: date!(2026 - 03 - 01),
        end_date: date!(2026 - 04 - 30),
        application_fee: 500,
        required_documents: vec![String::from("birth_certificate")],
        settings: BTreeMap::new(),
    }
}

/// Creates a session and moves it to `open`.
pub fn create_open_session(persistence: &mut Persistence, ctx: &RequestContext) -> SessionInfo {
    let created = create_session(persistence, ctx, &session_request("Main intake"))
        .expect("Failed to create session");
    change_session_status(
        persistence,
        ctx,
        &ChangeSessionStatusRequest {
            session_id: created.session.session_id,
            status: String::from("open"),
        },
    )
    .expect("Failed to open session")
    .session
}

pub fn create_test_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    class_name: &str,
    total_seats: i64,
) -> SeatInfo {
    create_seat(
        persistence,
        ctx,
        &CreateSeatRequest {
            session_id,
            class_name: class_name.to_string(),
            total_seats,
            waitlist_limit: 5,
            reserved_seats: BTreeMap::new(),
        },
    )
    .expect("Failed to create seat")
}

pub fn student(first_name: &str, class_applied: &str, marks: Option<f64>) -> StudentDetails {
    StudentDetails {
        first_name: first_name.to_string(),
        last_name: String::from("Rao"),
        date_of_birth: Some(date!(2020 - 05 - 14)),
        gender: None,
        class_applied: class_applied.to_string(),
        previous_school: None,
        previous_marks: marks,
        address: None,
    }
}

pub fn application_request(
    session_id: i64,
    first_name: &str,
    marks: Option<f64>,
) -> CreateApplicationRequest {
    CreateApplicationRequest {
        session_id,
        branch_id: None,
        enquiry_id: None,
        student: student(first_name, "Grade 1", marks),
        parents: vec![ParentInput {
            relation: String::from("mother"),
            name: String::from("Meera Rao"),
            phone: Some(String::from("555-0100")),
            email: Some(String::from("meera@example.com")),
            occupation: None,
        }],
        remarks: None,
    }
}

pub fn create_draft(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    first_name: &str,
    marks: Option<f64>,
) -> ApplicationInfo {
    create_application(
        persistence,
        ctx,
        &application_request(session_id, first_name, marks),
    )
    .expect("Failed to create application")
}

pub fn create_submitted(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    first_name: &str,
    marks: Option<f64>,
) -> ApplicationInfo {
    let draft = create_draft(persistence, ctx, session_id, first_name, marks);
    submit_application(persistence, ctx, draft.application_id)
        .expect("Failed to submit application")
        .application
}

pub fn move_to(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
    status: &str,
) -> Result<TransitionResponse, ApiError> {
    update_stage(
        persistence,
        ctx,
        &UpdateStageRequest {
            application_id,
            status: status.to_string(),
            remarks: None,
        },
    )
}

/// Creates an application that is under review.
pub fn create_under_review(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    first_name: &str,
) -> ApplicationInfo {
    let submitted = create_submitted(persistence, ctx, session_id, first_name, Some(75.0));
    move_to(persistence, ctx, submitted.application_id, "under_review")
        .expect("Failed to start review")
        .application
}

pub fn decision_request(application_id: i64, decision_type: &str) -> CreateDecisionRequest {
    CreateDecisionRequest {
        application_id,
        decision_type: decision_type.to_string(),
        decision_date: Some(date!(2026 - 03 - 10)),
        section_assigned: None,
        waitlist_position: None,
        rejection_reason: None,
    }
}

/// Creates an application with a recorded approval.
pub fn create_approved(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    first_name: &str,
) -> ApplicationInfo {
    let reviewed = create_under_review(persistence, ctx, session_id, first_name);
    create_decision(
        persistence,
        ctx,
        &decision_request(reviewed.application_id, "approved"),
    )
    .expect("Failed to record approval")
    .application
}

pub fn expect_conflict(
    result: Result<impl std::fmt::Debug, ApiError>,
    expected_rule: &str,
) -> ApiError {
    match result {
        Err(err @ ApiError::StateConflict { .. }) => {
            assert_eq!(err.rule(), Some(expected_rule), "unexpected rule: {err}");
            err
        }
        other => panic!("Expected StateConflict '{expected_rule}', got: {other:?}"),
    }
}

pub fn expect_precondition(
    result: Result<impl std::fmt::Debug, ApiError>,
    expected_rule: &str,
) -> ApiError {
    match result {
        Err(err @ ApiError::PreconditionFailed { .. }) => {
            assert_eq!(err.rule(), Some(expected_rule), "unexpected rule: {err}");
            err
        }
        other => panic!("Expected PreconditionFailed '{expected_rule}', got: {other:?}"),
    }
}

pub fn expect_invalid(result: Result<impl std::fmt::Debug, ApiError>, expected_field: &str) {
    match result {
        Err(ApiError::InvalidInput { field, .. }) => assert_eq!(field, expected_field),
        other => panic!("Expected InvalidInput on '{expected_field}', got: {other:?}"),
    }
}

pub fn expect_not_found(result: Result<impl std::fmt::Debug, ApiError>, expected_type: &str) {
    match result {
        Err(ApiError::ResourceNotFound { resource_type, .. }) => {
            assert_eq!(resource_type, expected_type);
        }
        other => panic!("Expected ResourceNotFound '{expected_type}', got: {other:?}"),
    }
}
