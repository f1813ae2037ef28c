// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{AdmissionSession, SessionStatus, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::SessionRow;
use crate::diesel_schema::{admission_applications, admission_sessions};
use crate::error::PersistenceError;

/// Loads a session by id.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist for the tenant.
pub fn get_session(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<AdmissionSession, PersistenceError> {
    admission_sessions::table
        .filter(admission_sessions::tenant_id.eq(tenant_id.value()))
        .filter(admission_sessions::session_id.eq(session_id))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("session", session_id))?
        .into_domain()
}

/// Lists sessions, newest academic year first, optionally filtered.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_sessions(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    status: Option<SessionStatus>,
    academic_year: Option<&str>,
) -> Result<Vec<AdmissionSession>, PersistenceError> {
    let mut query = admission_sessions::table
        .filter(admission_sessions::tenant_id.eq(tenant_id.value()))
        .select(SessionRow::as_select())
        .into_boxed();
    if let Some(status) = status {
        query = query.filter(admission_sessions::status.eq(status.as_str()));
    }
    if let Some(year) = academic_year {
        query = query.filter(admission_sessions::academic_year.eq(year.to_string()));
    }

    let rows: Vec<SessionRow> = query
        .order((
            admission_sessions::academic_year.desc(),
            admission_sessions::start_date.asc(),
            admission_sessions::session_id.asc(),
        ))
        .load(conn)?;
    rows.into_iter().map(SessionRow::into_domain).collect()
}

/// Counts the applications linked to a session.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_session_applications(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(admission_applications::table
        .filter(admission_applications::tenant_id.eq(tenant_id.value()))
        .filter(admission_applications::session_id.eq(session_id))
        .count()
        .get_result(conn)?)
}
