// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    ChangeSessionStatusRequest, CreateSeatRequest, IncrementFilledSeatsRequest,
    UpdateSeatRequest, audit_trail, change_session_status, create_seat, delete_seat, get_seat,
    increment_filled_seats, list_seats, update_seat,
};

use super::helpers::{
    create_open_session, create_test_context, create_test_persistence, create_test_seat,
    expect_conflict, expect_invalid, expect_not_found, expect_precondition,
};

fn fill(seat_id: i64, count: i32) -> IncrementFilledSeatsRequest {
    IncrementFilledSeatsRequest { seat_id, count }
}

#[test]
fn test_create_seat_reports_availability() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);

    assert_eq!(seat.total_seats, 40);
    assert_eq!(seat.filled_seats, 0);
    assert_eq!(seat.available_seats, 40);
}

#[test]
fn test_duplicate_class_in_session_is_refused() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);

    let result = create_seat(
        &mut persistence,
        &ctx,
        &CreateSeatRequest {
            session_id: session.session_id,
            class_name: String::from("Grade 1"),
            total_seats: 10,
            waitlist_limit: 0,
            reserved_seats: BTreeMap::new(),
        },
    );

    expect_conflict(result, "unique_seat_class");
}

#[test]
fn test_reserved_quota_above_total_is_invalid() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let result = create_seat(
        &mut persistence,
        &ctx,
        &CreateSeatRequest {
            session_id: session.session_id,
            class_name: String::from("Grade 1"),
            total_seats: 10,
            waitlist_limit: 0,
            reserved_seats: BTreeMap::from([
                (String::from("sibling"), 6),
                (String::from("staff"), 5),
            ]),
        },
    );

    expect_invalid(result, "reserved_seats");
}

#[test]
fn test_negative_total_is_invalid() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);

    let result = create_seat(
        &mut persistence,
        &ctx,
        &CreateSeatRequest {
            session_id: session.session_id,
            class_name: String::from("Grade 1"),
            total_seats: -1,
            waitlist_limit: 0,
            reserved_seats: BTreeMap::new(),
        },
    );

    expect_invalid(result, "total_seats");
}

#[test]
fn test_closed_session_refuses_seat_changes() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    change_session_status(
        &mut persistence,
        &ctx,
        &ChangeSessionStatusRequest {
            session_id: session.session_id,
            status: String::from("closed"),
        },
    )
    .unwrap();

    let result = update_seat(
        &mut persistence,
        &ctx,
        &UpdateSeatRequest {
            seat_id: seat.seat_id,
            total_seats: Some(45),
            ..UpdateSeatRequest::default()
        },
    );

    expect_conflict(result, "session_closed");
}

#[test]
fn test_fill_to_capacity_then_refuse() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);

    let at_38 = increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 38)).unwrap();
    assert_eq!(at_38.filled_seats, 38);

    let at_39 = increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 1)).unwrap();
    assert_eq!(at_39.filled_seats, 39);
    assert_eq!(at_39.available_seats, 1);

    let at_40 = increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 1)).unwrap();
    assert_eq!(at_40.filled_seats, 40);
    assert_eq!(at_40.available_seats, 0);

    expect_conflict(
        increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 1)),
        "seat_capacity_exceeded",
    );
    let stored = get_seat(&mut persistence, &ctx, seat.seat_id).unwrap();
    assert_eq!(stored.filled_seats, 40);
}

#[test]
fn test_fill_audit_snapshots_match_stored_row() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);

    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 3)).unwrap();
    let stored = increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 2)).unwrap();

    let trail = audit_trail(&mut persistence, &ctx, "seat", seat.seat_id).unwrap();
    let last = trail.last().unwrap();
    assert_eq!(last.action, "IncrementFilledSeats");
    let before: Value = serde_json::from_str(&last.before).unwrap();
    let after: Value = serde_json::from_str(&last.after).unwrap();
    assert_eq!(before["filled_seats"], 3);
    assert_eq!(after["filled_seats"], u64::from(stored.filled_seats));
}

#[test]
fn test_release_clamps_at_zero() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 2)).unwrap();

    let released =
        increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, -5)).unwrap();

    assert_eq!(released.filled_seats, 0);
}

#[test]
fn test_total_cannot_drop_below_filled() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 12)).unwrap();

    let result = update_seat(
        &mut persistence,
        &ctx,
        &UpdateSeatRequest {
            seat_id: seat.seat_id,
            total_seats: Some(10),
            ..UpdateSeatRequest::default()
        },
    );

    expect_conflict(result, "filled_exceeds_total");
}

#[test]
fn test_update_seat_keeps_filled_count() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 3)).unwrap();

    let updated = update_seat(
        &mut persistence,
        &ctx,
        &UpdateSeatRequest {
            seat_id: seat.seat_id,
            total_seats: Some(50),
            waitlist_limit: Some(8),
            reserved_seats: None,
        },
    )
    .unwrap();

    assert_eq!(updated.total_seats, 50);
    assert_eq!(updated.filled_seats, 3);
    assert_eq!(updated.available_seats, 47);
    assert_eq!(updated.waitlist_limit, 8);
}

#[test]
fn test_delete_seat_requires_no_filled_seats() {
    let mut persistence = create_test_persistence();
    let ctx = create_test_context();
    let session = create_open_session(&mut persistence, &ctx);
    let seat = create_test_seat(&mut persistence, &ctx, session.session_id, "Grade 1", 40);
    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, 1)).unwrap();

    expect_precondition(
        delete_seat(&mut persistence, &ctx, seat.seat_id),
        "seat_in_use",
    );

    increment_filled_seats(&mut persistence, &ctx, &fill(seat.seat_id, -1)).unwrap();
    delete_seat(&mut persistence, &ctx, seat.seat_id).expect("Failed to delete seat");

    expect_not_found(get_seat(&mut persistence, &ctx, seat.seat_id), "Seat");
    assert!(
        list_seats(&mut persistence, &ctx, session.session_id)
            .unwrap()
            .is_empty()
    );
}
