// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat allocation per class.
//!
//! The filled count only changes through `increment_filled_seats` and
//! enrollment, both of which use a single conditional update in the store.

use std::collections::BTreeMap;

use admissions_audit::{EntityKind, StateSnapshot};
use admissions_domain::{
    AdmissionSeat, AdmissionSession, apply_fill_delta, validate_reserved_quotas,
    validate_seat_total,
};
use admissions_persistence::Persistence;
use tracing::info;

use super::{snapshot_of, to_count};
use crate::context::RequestContext;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateSeatRequest, IncrementFilledSeatsRequest, SeatInfo, UpdateSeatRequest,
};

fn reserved_quotas(reserved: &BTreeMap<String, i64>) -> Result<BTreeMap<String, u32>, ApiError> {
    reserved
        .iter()
        .map(|(category, count)| Ok((category.clone(), to_count(*count, "reserved_seats")?)))
        .collect()
}

/// Configures seats for a class in a session that is not closed.
///
/// # Errors
///
/// Returns an error if:
/// - The session does not exist or is closed
/// - A count is negative or the reserved quotas exceed the total
/// - The class already has a seat configuration in the session
pub fn create_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateSeatRequest,
) -> Result<SeatInfo, ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, request.session_id)
        .map_err(translate_persistence_error)?;
    session.ensure_not_closed().map_err(translate_domain_error)?;

    let seat: AdmissionSeat = AdmissionSeat::new(
        ctx.tenant_id,
        request.session_id,
        &request.class_name,
        to_count(request.total_seats, "total_seats")?,
        to_count(request.waitlist_limit, "waitlist_limit")?,
        reserved_quotas(&request.reserved_seats)?,
    )
    .map_err(translate_domain_error)?;

    let event = ctx.audit_event(
        EntityKind::Seat,
        0,
        "CreateSeat",
        format!(
            "Configured {} seats for '{}' in session '{}'",
            seat.total_seats, seat.class_name, session.name
        ),
        StateSnapshot::empty(),
        snapshot_of(&seat)?,
    );
    let stored: AdmissionSeat = persistence
        .create_seat(&seat, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        session_id = stored.session_id,
        seat_id = stored.seat_id,
        class_name = %stored.class_name,
        total_seats = stored.total_seats,
        "Created seat configuration"
    );

    Ok(SeatInfo::from(&stored))
}

/// Changes a seat configuration. Absent fields are left unchanged.
///
/// # Errors
///
/// Returns an error if:
/// - The seat does not exist or its session is closed
/// - The new total is below the seats already filled
/// - The reserved quotas exceed the total
pub fn update_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateSeatRequest,
) -> Result<SeatInfo, ApiError> {
    let current: AdmissionSeat = persistence
        .get_seat(ctx.tenant_id, request.seat_id)
        .map_err(translate_persistence_error)?;
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, current.session_id)
        .map_err(translate_persistence_error)?;
    session.ensure_not_closed().map_err(translate_domain_error)?;

    let mut seat: AdmissionSeat = current.clone();
    if let Some(total) = request.total_seats {
        seat.total_seats = to_count(total, "total_seats")?;
    }
    if let Some(limit) = request.waitlist_limit {
        seat.waitlist_limit = to_count(limit, "waitlist_limit")?;
    }
    if let Some(reserved) = &request.reserved_seats {
        seat.reserved_seats = reserved_quotas(reserved)?;
    }
    validate_seat_total(seat.total_seats, seat.filled_seats).map_err(translate_domain_error)?;
    validate_reserved_quotas(&seat.reserved_seats, seat.total_seats)
        .map_err(translate_domain_error)?;

    let event = ctx.audit_event(
        EntityKind::Seat,
        request.seat_id,
        "UpdateSeat",
        format!("Updated seats for '{}'", seat.class_name),
        snapshot_of(&current)?,
        snapshot_of(&seat)?,
    );
    let stored: AdmissionSeat = persistence
        .update_seat(&seat, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        seat_id = request.seat_id,
        total_seats = stored.total_seats,
        filled_seats = stored.filled_seats,
        "Updated seat configuration"
    );

    Ok(SeatInfo::from(&stored))
}

/// Fills (positive `count`) or releases (negative `count`) seats.
///
/// Filling beyond the total fails. Releasing below zero clamps to zero.
/// The store re-checks capacity in the statement that writes and records
/// the row as it was before and after that statement.
///
/// # Errors
///
/// Returns an error if the seat does not exist or the fill would exceed
/// capacity.
pub fn increment_filled_seats(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &IncrementFilledSeatsRequest,
) -> Result<SeatInfo, ApiError> {
    let current: AdmissionSeat = persistence
        .get_seat(ctx.tenant_id, request.seat_id)
        .map_err(translate_persistence_error)?;
    apply_fill_delta(current.filled_seats, current.total_seats, request.count)
        .map_err(translate_domain_error)?;

    // Snapshots are taken by the store around the write.
    let event = ctx.audit_event(
        EntityKind::Seat,
        request.seat_id,
        "IncrementFilledSeats",
        format!(
            "Changed filled seats for '{}' by {}",
            current.class_name, request.count
        ),
        StateSnapshot::empty(),
        StateSnapshot::empty(),
    );

    let stored: AdmissionSeat = persistence
        .adjust_filled_seats(ctx.tenant_id, request.seat_id, request.count, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        seat_id = request.seat_id,
        delta = request.count,
        filled_seats = stored.filled_seats,
        total_seats = stored.total_seats,
        "Adjusted filled seats"
    );

    Ok(SeatInfo::from(&stored))
}

/// Deletes a seat configuration with no seats filled.
///
/// # Errors
///
/// Returns an error if the seat does not exist or has filled seats.
pub fn delete_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    seat_id: i64,
) -> Result<(), ApiError> {
    let current: AdmissionSeat = persistence
        .get_seat(ctx.tenant_id, seat_id)
        .map_err(translate_persistence_error)?;
    current.ensure_deletable().map_err(translate_domain_error)?;

    let event = ctx.audit_event(
        EntityKind::Seat,
        seat_id,
        "DeleteSeat",
        format!("Deleted seats for '{}'", current.class_name),
        snapshot_of(&current)?,
        StateSnapshot::empty(),
    );
    persistence
        .delete_seat(ctx.tenant_id, seat_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        seat_id, "Deleted seat configuration"
    );
    Ok(())
}

/// Loads a seat configuration.
///
/// # Errors
///
/// Returns an error if the seat does not exist.
pub fn get_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    seat_id: i64,
) -> Result<SeatInfo, ApiError> {
    let seat: AdmissionSeat = persistence
        .get_seat(ctx.tenant_id, seat_id)
        .map_err(translate_persistence_error)?;
    Ok(SeatInfo::from(&seat))
}

/// Lists a session's seat configurations.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn list_seats(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<Vec<SeatInfo>, ApiError> {
    persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    let seats: Vec<AdmissionSeat> = persistence
        .list_seats(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    Ok(seats.iter().map(SeatInfo::from).collect())
}
