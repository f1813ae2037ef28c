// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_persistence::Persistence;
use time::macros::date;

use crate::{
    ApiError, ChangeSessionStatusRequest, CreateBranchRequest, ExtendDeadlineRequest,
    GenerateMeritListRequest, ListSessionsRequest, RequestContext, UpdateSessionRequest,
    change_session_status, create_branch, create_session, delete_session, extend_deadline,
    finalize_merit_list, generate_merit_list, get_merit_list, get_session, list_branches,
    list_sessions, session_seat_summary, update_session,
};

use super::helpers::{
    create_draft, create_open_session, create_test_context, create_test_persistence,
    create_test_seat, expect_conflict, expect_invalid, expect_not_found, expect_precondition,
    session_request,
};

fn status_request(session_id: i64, status: &str) -> ChangeSessionStatusRequest {
    ChangeSessionStatusRequest {
        session_id,
        status: status.to_string(),
    }
}

#[test]
fn test_create_session_starts_upcoming() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();

    let response = create_session(&mut persistence, &ctx, &session_request("Main intake"))
        .expect("Failed to create session");

    assert_eq!(response.session.status, "upcoming");
    assert_eq!(response.session.name, "Main intake");
    assert_eq!(response.session.version, 1);
}

#[test]
fn test_create_session_rejects_end_before_start() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let mut request = session_request("Backwards");
    request.end_date = date!(2026 - 02 - 01);

    expect_invalid(create_session(&mut persistence, &ctx, &request), "end_date");
}

#[test]
fn test_create_session_rejects_duplicate_name_in_year() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    create_session(&mut persistence, &ctx, &session_request("Main intake")).unwrap();

    let result = create_session(&mut persistence, &ctx, &session_request("Main intake"));

    expect_conflict(result, "unique_session_name");
}

#[test]
fn test_create_session_rejects_unknown_branch() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let mut request = session_request("Main intake");
    request.branch_id = Some(999);

    expect_not_found(create_session(&mut persistence, &ctx, &request), "Branch");
}

#[test]
fn test_session_lifecycle_transitions() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let id = create_session(&mut persistence, &ctx, &session_request("Main intake"))
        .unwrap()
        .session
        .session_id;

    let opened =
        change_session_status(&mut persistence, &ctx, &status_request(id, "open")).unwrap();
    assert_eq!(opened.session.status, "open");
    assert!(opened.event_id.is_some());

    let closed =
        change_session_status(&mut persistence, &ctx, &status_request(id, "closed")).unwrap();
    assert_eq!(closed.session.status, "closed");

    let reopened =
        change_session_status(&mut persistence, &ctx, &status_request(id, "open")).unwrap();
    assert_eq!(reopened.session.status, "open");
    assert!(reopened.session.version > opened.session.version);
}

#[test]
fn test_open_session_cannot_return_to_upcoming() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let err = expect_conflict(
        change_session_status(
            &mut persistence,
            &ctx,
            &status_request(session.session_id, "upcoming"),
        ),
        "session_transition",
    );

    match err {
        ApiError::StateConflict {
            current,
            attempted,
            allowed,
            ..
        } => {
            assert_eq!(current.as_deref(), Some("open"));
            assert_eq!(attempted.as_deref(), Some("upcoming"));
            assert_eq!(allowed, vec![String::from("closed")]);
        }
        other => panic!("Expected StateConflict, got: {other:?}"),
    }
}

#[test]
fn test_unknown_session_status_is_invalid_input() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    expect_invalid(
        change_session_status(
            &mut persistence,
            &ctx,
            &status_request(session.session_id, "paused"),
        ),
        "status",
    );
}

#[test]
fn test_update_session_changes_only_supplied_fields() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let response = update_session(
        &mut persistence,
        &ctx,
        &UpdateSessionRequest {
            session_id: session.session_id,
            application_fee: Some(750),
            ..UpdateSessionRequest::default()
        },
    )
    .expect("Failed to update session");

    assert_eq!(response.session.application_fee, 750);
    assert_eq!(response.session.name, session.name);
    assert_eq!(response.session.end_date, session.end_date);
}

#[test]
fn test_closed_session_rejects_edits() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    change_session_status(
        &mut persistence,
        &ctx,
        &status_request(session.session_id, "closed"),
    )
    .unwrap();

    let result = update_session(
        &mut persistence,
        &ctx,
        &UpdateSessionRequest {
            session_id: session.session_id,
            name: Some(String::from("Renamed")),
            ..UpdateSessionRequest::default()
        },
    );

    expect_conflict(result, "session_closed");
}

#[test]
fn test_extend_deadline_moves_end_date() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let response = extend_deadline(
        &mut persistence,
        &ctx,
        &ExtendDeadlineRequest {
            session_id: session.session_id,
            new_end_date: date!(2026 - 05 - 31),
        },
    )
    .unwrap();

    assert_eq!(response.session.end_date, date!(2026 - 05 - 31));
    assert!(response.message.contains("Deadline moved"));
}

#[test]
fn test_extend_deadline_rejects_date_before_start() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let result = extend_deadline(
        &mut persistence,
        &ctx,
        &ExtendDeadlineRequest {
            session_id: session.session_id,
            new_end_date: date!(2026 - 01 - 01),
        },
    );

    expect_invalid(result, "end_date");
}

#[test]
fn test_delete_open_session_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    expect_precondition(
        delete_session(&mut persistence, &ctx, session.session_id),
        "session_open",
    );
}

#[test]
fn test_delete_session_with_applications_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    create_draft(&mut persistence, &ctx, session.session_id, "Asha", None);
    change_session_status(
        &mut persistence,
        &ctx,
        &status_request(session.session_id, "closed"),
    )
    .unwrap();

    expect_precondition(
        delete_session(&mut persistence, &ctx, session.session_id),
        "session_has_applications",
    );
}

#[test]
fn test_delete_empty_upcoming_session() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let id = create_session(&mut persistence, &ctx, &session_request("Spare"))
        .unwrap()
        .session
        .session_id;

    delete_session(&mut persistence, &ctx, id).expect("Failed to delete session");

    expect_not_found(get_session(&mut persistence, &ctx, id), "Session");
}

fn generate_empty_list(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> i64 {
    let request = GenerateMeritListRequest {
        session_id,
        class_name: String::from("Grade 1"),
        test_id: None,
        cutoff_score: None,
    };
    generate_merit_list(persistence, ctx, &request)
        .unwrap()
        .merit_list_id
}

#[test]
fn test_delete_session_with_final_merit_list_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let id = create_session(&mut persistence, &ctx, &session_request("Spare"))
        .unwrap()
        .session
        .session_id;
    let merit_list_id = generate_empty_list(&mut persistence, &ctx, id);
    finalize_merit_list(&mut persistence, &ctx, merit_list_id).unwrap();

    expect_conflict(
        delete_session(&mut persistence, &ctx, id),
        "merit_list_finalized",
    );

    let list = get_merit_list(&mut persistence, &ctx, merit_list_id).unwrap();
    assert!(list.is_final);
    assert_eq!(get_session(&mut persistence, &ctx, id).unwrap().session_id, id);
}

#[test]
fn test_delete_session_drops_working_merit_list() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let id = create_session(&mut persistence, &ctx, &session_request("Spare"))
        .unwrap()
        .session
        .session_id;
    let merit_list_id = generate_empty_list(&mut persistence, &ctx, id);

    delete_session(&mut persistence, &ctx, id).unwrap();

    expect_not_found(
        get_merit_list(&mut persistence, &ctx, merit_list_id),
        "Merit list",
    );
}

#[test]
fn test_list_sessions_filters_by_status() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    create_open_session(&mut persistence, &ctx);
    create_session(&mut persistence, &ctx, &session_request("Late intake")).unwrap();

    let open = list_sessions(
        &mut persistence,
        &ctx,
        &ListSessionsRequest {
            status: Some(String::from("open")),
            academic_year: None,
        },
    )
    .unwrap();
    let all = list_sessions(&mut persistence, &ctx, &ListSessionsRequest::default()).unwrap();

    assert_eq!(open.len(), 1);
    assert_eq!(open[0].name, "Main intake");
    assert_eq!(all.len(), 2);
}

#[test]
fn test_session_seat_summary_totals_classes() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 2", 30);

    let summary = session_seat_summary(&mut persistence, &ctx, session.session_id).unwrap();

    assert_eq!(summary.classes.len(), 2);
    assert_eq!(summary.total_seats, 70);
    assert_eq!(summary.filled_seats, 0);
    assert_eq!(summary.available_seats, 70);
    assert_eq!(summary.status, "open");
}

#[test]
fn test_new_primary_branch_demotes_previous() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    create_branch(
        &mut persistence,
        &ctx,
        &CreateBranchRequest {
            code: String::from("nb"),
            name: String::from("North"),
            is_primary: true,
        },
    )
    .unwrap();
    create_branch(
        &mut persistence,
        &ctx,
        &CreateBranchRequest {
            code: String::from("sb"),
            name: String::from("South"),
            is_primary: true,
        },
    )
    .unwrap();

    let branches = list_branches(&mut persistence, &ctx).unwrap();
    let primaries: Vec<&str> = branches
        .iter()
        .filter(|b| b.is_primary)
        .map(|b| b.code.as_str())
        .collect();

    assert_eq!(branches.len(), 2);
    assert_eq!(primaries, vec!["SB"]);
}
