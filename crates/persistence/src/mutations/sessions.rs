// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{AdmissionSession, DomainError, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::conversions::format_date;
use crate::data_models::NewSessionRow;
use crate::diesel_schema::admission_sessions;
use crate::error::PersistenceError;

fn duplicate_name(session: &AdmissionSession) -> impl FnOnce(PersistenceError) -> PersistenceError {
    let academic_year: String = session.academic_year.clone();
    let name: String = session.name.clone();
    move |err| match err {
        PersistenceError::UniqueViolation(_) => {
            PersistenceError::RuleViolation(DomainError::DuplicateSessionName {
                academic_year,
                name,
            })
        }
        other => other,
    }
}

/// Inserts a new session at version 1.
///
/// # Errors
///
/// Returns `RuleViolation(DuplicateSessionName)` if the name is taken for
/// the academic year.
pub fn insert_session(
    conn: &mut SqliteConnection,
    session: &AdmissionSession,
) -> Result<i64, PersistenceError> {
    let row = NewSessionRow {
        tenant_id: session.tenant_id.value(),
        branch_id: session.branch_id,
        academic_year: &session.academic_year,
        name: &session.name,
        start_date: format_date(session.start_date)?,
        end_date: format_date(session.end_date)?,
        status: session.status.as_str(),
        application_fee: session.application_fee,
        required_documents_json: serde_json::to_string(&session.required_documents)?,
        settings_json: serde_json::to_string(&session.settings)?,
        version: 1,
    };

    diesel::insert_into(admission_sessions::table)
        .values(&row)
        .execute(conn)
        .map_err(PersistenceError::from)
        .map_err(duplicate_name(session))?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    info!(session_id, name = %session.name, "Created admission session");
    Ok(session_id)
}

/// Writes every mutable column of `session`, guarded by its version.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored version differs, or
/// `RuleViolation(DuplicateSessionName)` on a name clash.
pub fn update_session(
    conn: &mut SqliteConnection,
    session: &AdmissionSession,
) -> Result<i64, PersistenceError> {
    let session_id: i64 = session.id();
    let affected: usize = diesel::update(
        admission_sessions::table
            .filter(admission_sessions::session_id.eq(session_id))
            .filter(admission_sessions::tenant_id.eq(session.tenant_id.value()))
            .filter(admission_sessions::version.eq(session.version)),
    )
    .set((
        admission_sessions::branch_id.eq(session.branch_id),
        admission_sessions::academic_year.eq(&session.academic_year),
        admission_sessions::name.eq(&session.name),
        admission_sessions::start_date.eq(format_date(session.start_date)?),
        admission_sessions::end_date.eq(format_date(session.end_date)?),
        admission_sessions::status.eq(session.status.as_str()),
        admission_sessions::application_fee.eq(session.application_fee),
        admission_sessions::required_documents_json
            .eq(serde_json::to_string(&session.required_documents)?),
        admission_sessions::settings_json.eq(serde_json::to_string(&session.settings)?),
        admission_sessions::version.eq(admission_sessions::version + 1),
    ))
    .execute(conn)
    .map_err(PersistenceError::from)
    .map_err(duplicate_name(session))?;

    if affected == 0 {
        return Err(PersistenceError::ConcurrentModification {
            resource: "session",
            id: session_id,
        });
    }
    debug!(session_id, status = %session.status, "Updated admission session");
    Ok(session.version + 1)
}

/// Deletes a session. Seat configurations and merit lists cascade.
///
/// # Errors
///
/// Returns `NotFound` if nothing was deleted.
pub fn delete_session(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(
        admission_sessions::table
            .filter(admission_sessions::session_id.eq(session_id))
            .filter(admission_sessions::tenant_id.eq(tenant_id.value())),
    )
    .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::not_found("session", session_id));
    }
    info!(session_id, "Deleted admission session");
    Ok(())
}
