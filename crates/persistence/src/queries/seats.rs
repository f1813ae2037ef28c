// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{AdmissionSeat, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::SeatRow;
use crate::diesel_schema::admission_seats;
use crate::error::PersistenceError;

/// Loads a seat configuration by id.
///
/// # Errors
///
/// Returns `NotFound` if the seat does not exist for the tenant.
pub fn get_seat(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    seat_id: i64,
) -> Result<AdmissionSeat, PersistenceError> {
    admission_seats::table
        .filter(admission_seats::tenant_id.eq(tenant_id.value()))
        .filter(admission_seats::seat_id.eq(seat_id))
        .select(SeatRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("seat", seat_id))?
        .into_domain()
}

/// Finds the seat configuration for a class in a session.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_seat_for_class(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
    class_name: &str,
) -> Result<Option<AdmissionSeat>, PersistenceError> {
    admission_seats::table
        .filter(admission_seats::tenant_id.eq(tenant_id.value()))
        .filter(admission_seats::session_id.eq(session_id))
        .filter(admission_seats::class_name.eq(class_name))
        .select(SeatRow::as_select())
        .first(conn)
        .optional()?
        .map(SeatRow::into_domain)
        .transpose()
}

/// Lists a session's seat configurations by class name.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_seats(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<Vec<AdmissionSeat>, PersistenceError> {
    let rows: Vec<SeatRow> = admission_seats::table
        .filter(admission_seats::tenant_id.eq(tenant_id.value()))
        .filter(admission_seats::session_id.eq(session_id))
        .order(admission_seats::class_name.asc())
        .select(SeatRow::as_select())
        .load(conn)?;
    rows.into_iter().map(SeatRow::into_domain).collect()
}
