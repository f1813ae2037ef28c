// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seat configuration writes.
//!
//! The filled counter only changes through single conditional `UPDATE`
//! statements; the affected row count decides success, so two writers can
//! never both pass a capacity check.

use admissions_domain::{AdmissionSeat, DomainError, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info, warn};

use crate::backend::PersistenceBackend;
use crate::conversions::{to_i32, to_u32};
use crate::diesel_schema::admission_seats;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a seat configuration with nothing filled.
///
/// # Errors
///
/// Returns `RuleViolation(DuplicateSeatClass)` if the class already has a
/// configuration in the session.
pub fn insert_seat(
    conn: &mut SqliteConnection,
    seat: &AdmissionSeat,
) -> Result<i64, PersistenceError> {
    let result = diesel::insert_into(admission_seats::table)
        .values((
            admission_seats::tenant_id.eq(seat.tenant_id.value()),
            admission_seats::session_id.eq(seat.session_id),
            admission_seats::class_name.eq(&seat.class_name),
            admission_seats::total_seats.eq(to_i32(seat.total_seats, "total_seats")?),
            admission_seats::filled_seats.eq(0),
            admission_seats::waitlist_limit.eq(to_i32(seat.waitlist_limit, "waitlist_limit")?),
            admission_seats::reserved_seats_json.eq(serde_json::to_string(&seat.reserved_seats)?),
        ))
        .execute(conn);

    match result.map_err(PersistenceError::from) {
        Ok(_) => {}
        Err(PersistenceError::UniqueViolation(_)) => {
            return Err(DomainError::DuplicateSeatClass {
                session_id: seat.session_id,
                class_name: seat.class_name.clone(),
            }
            .into());
        }
        Err(other) => return Err(other),
    }

    let seat_id: i64 = conn.get_last_insert_rowid()?;
    info!(
        seat_id,
        session_id = seat.session_id,
        class_name = %seat.class_name,
        total = seat.total_seats,
        "Created seat configuration"
    );
    Ok(seat_id)
}

/// Writes total, waitlist limit and reserved quotas.
///
/// The total is only lowered if it stays at or above the filled count at
/// the moment of the write.
///
/// # Errors
///
/// Returns `RuleViolation(FilledExceedsTotal)` if the new total is below the
/// filled count, or `NotFound` if the seat does not exist.
pub fn update_seat_config(
    conn: &mut SqliteConnection,
    seat: &AdmissionSeat,
) -> Result<(), PersistenceError> {
    let seat_id: i64 = seat.seat_id.unwrap_or_default();
    let total: i32 = to_i32(seat.total_seats, "total_seats")?;
    let affected: usize = diesel::update(
        admission_seats::table
            .filter(admission_seats::seat_id.eq(seat_id))
            .filter(admission_seats::tenant_id.eq(seat.tenant_id.value()))
            .filter(admission_seats::filled_seats.le(total)),
    )
    .set((
        admission_seats::total_seats.eq(total),
        admission_seats::waitlist_limit.eq(to_i32(seat.waitlist_limit, "waitlist_limit")?),
        admission_seats::reserved_seats_json.eq(serde_json::to_string(&seat.reserved_seats)?),
    ))
    .execute(conn)?;

    if affected == 0 {
        let current: AdmissionSeat = queries::seats::get_seat(conn, seat.tenant_id, seat_id)?;
        return Err(DomainError::FilledExceedsTotal {
            total: seat.total_seats,
            filled: current.filled_seats,
        }
        .into());
    }
    debug!(seat_id, total = seat.total_seats, "Updated seat configuration");
    Ok(())
}

/// Changes the filled count of a seat by `delta`.
///
/// An increase is applied only if it keeps `filled <= total`. A decrease
/// that would go below zero sets the count to zero.
///
/// # Returns
///
/// The filled count after the change.
///
/// # Errors
///
/// Returns `RuleViolation(SeatCapacityExceeded)` if the increase does not
/// fit, or `NotFound` if the seat does not exist.
pub fn adjust_filled_seats(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    seat_id: i64,
    delta: i32,
) -> Result<u32, PersistenceError> {
    let target = || {
        admission_seats::table
            .filter(admission_seats::seat_id.eq(seat_id))
            .filter(admission_seats::tenant_id.eq(tenant_id.value()))
    };

    let filled: Option<i32> = if delta >= 0 {
        diesel::update(
            target().filter((admission_seats::filled_seats + delta).le(admission_seats::total_seats)),
        )
        .set(admission_seats::filled_seats.eq(admission_seats::filled_seats + delta))
        .returning(admission_seats::filled_seats)
        .get_result(conn)
        .optional()?
    } else {
        let decreased: Option<i32> = diesel::update(
            target().filter((admission_seats::filled_seats + delta).ge(0)),
        )
        .set(admission_seats::filled_seats.eq(admission_seats::filled_seats + delta))
        .returning(admission_seats::filled_seats)
        .get_result(conn)
        .optional()?;
        match decreased {
            Some(value) => Some(value),
            None => diesel::update(target())
                .set(admission_seats::filled_seats.eq(0))
                .returning(admission_seats::filled_seats)
                .get_result(conn)
                .optional()?,
        }
    };

    if let Some(filled) = filled {
        debug!(seat_id, delta, filled, "Adjusted filled seats");
        return to_u32(filled, "filled_seats");
    }

    let current: AdmissionSeat = queries::seats::get_seat(conn, tenant_id, seat_id)?;
    warn!(
        seat_id,
        delta,
        filled = current.filled_seats,
        total = current.total_seats,
        "Seat capacity exceeded"
    );
    Err(DomainError::SeatCapacityExceeded {
        total: current.total_seats,
        filled: current.filled_seats,
        requested: delta,
    }
    .into())
}

/// Deletes a seat configuration that has nothing filled.
///
/// # Errors
///
/// Returns `RuleViolation(SeatInUse)` if any seat is filled, or `NotFound`.
pub fn delete_seat(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    seat_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(
        admission_seats::table
            .filter(admission_seats::seat_id.eq(seat_id))
            .filter(admission_seats::tenant_id.eq(tenant_id.value()))
            .filter(admission_seats::filled_seats.eq(0)),
    )
    .execute(conn)?;

    if affected == 0 {
        let current: AdmissionSeat = queries::seats::get_seat(conn, tenant_id, seat_id)?;
        current.ensure_deletable()?;
        return Err(PersistenceError::not_found("seat", seat_id));
    }
    info!(seat_id, "Deleted seat configuration");
    Ok(())
}
