// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{
    AdmissionApplication, ApplicationDocument, ApplicationStatus, MeritCandidate, ParentDetails,
    StageHistoryEntry, TenantId,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;

use crate::conversions::parse_optional_timestamp;
use crate::data_models::{ApplicationRow, DocumentRow, ParentRow, StageHistoryRow};
use crate::diesel_schema::{
    admission_applications, application_documents, application_parents,
    application_stage_history,
};
use crate::error::PersistenceError;

/// Narrows an application listing. Unset fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationFilter {
    pub session_id: Option<i64>,
    pub class_name: Option<String>,
    pub status: Option<ApplicationStatus>,
}

/// id, number, first name, last name, status, submitted at, previous marks.
type CandidateRow = (
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    Option<f64>,
);

fn load_parents(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<Vec<ParentDetails>, PersistenceError> {
    let rows: Vec<ParentRow> = application_parents::table
        .filter(application_parents::application_id.eq(application_id))
        .order(application_parents::position.asc())
        .select(ParentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(ParentRow::into_domain).collect()
}

/// Loads an application with its parents.
///
/// # Errors
///
/// Returns `NotFound` if the application does not exist for the tenant.
pub fn get_application(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<AdmissionApplication, PersistenceError> {
    let row: ApplicationRow = admission_applications::table
        .filter(admission_applications::tenant_id.eq(tenant_id.value()))
        .filter(admission_applications::application_id.eq(application_id))
        .select(ApplicationRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("application", application_id))?;
    let parents: Vec<ParentDetails> = load_parents(conn, application_id)?;
    row.into_domain(parents)
}

/// Looks an application id up by its number.
///
/// # Errors
///
/// Returns `NotFound` if no application carries the number.
pub fn find_application_id_by_number(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_number: &str,
) -> Result<i64, PersistenceError> {
    admission_applications::table
        .filter(admission_applications::tenant_id.eq(tenant_id.value()))
        .filter(admission_applications::application_number.eq(application_number))
        .select(admission_applications::application_id)
        .first::<i64>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("application", application_number))
}

/// Lists applications matching `filter`, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_applications(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    filter: &ApplicationFilter,
) -> Result<Vec<AdmissionApplication>, PersistenceError> {
    let mut query = admission_applications::table
        .filter(admission_applications::tenant_id.eq(tenant_id.value()))
        .select(ApplicationRow::as_select())
        .into_boxed();
    if let Some(session_id) = filter.session_id {
        query = query.filter(admission_applications::session_id.eq(session_id));
    }
    if let Some(class_name) = &filter.class_name {
        query = query.filter(admission_applications::class_applied.eq(class_name.clone()));
    }
    if let Some(status) = filter.status {
        query = query.filter(admission_applications::status.eq(status.as_str()));
    }
    let rows: Vec<ApplicationRow> = query
        .order(admission_applications::application_id.asc())
        .load(conn)?;

    let ids: Vec<i64> = rows.iter().map(|r| r.application_id).collect();
    let parent_rows: Vec<(i64, ParentRow)> = application_parents::table
        .filter(application_parents::application_id.eq_any(&ids))
        .order((
            application_parents::application_id.asc(),
            application_parents::position.asc(),
        ))
        .select((application_parents::application_id, ParentRow::as_select()))
        .load(conn)?;
    let mut parents: BTreeMap<i64, Vec<ParentDetails>> = BTreeMap::new();
    for (application_id, row) in parent_rows {
        parents
            .entry(application_id)
            .or_default()
            .push(row.into_domain()?);
    }

    rows.into_iter()
        .map(|row| {
            let own: Vec<ParentDetails> = parents.remove(&row.application_id).unwrap_or_default();
            row.into_domain(own)
        })
        .collect()
}

/// Lists the documents attached to an application.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_documents(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<Vec<ApplicationDocument>, PersistenceError> {
    let rows: Vec<DocumentRow> = application_documents::table
        .filter(application_documents::tenant_id.eq(tenant_id.value()))
        .filter(application_documents::application_id.eq(application_id))
        .order(application_documents::document_id.asc())
        .select(DocumentRow::as_select())
        .load(conn)?;
    rows.into_iter().map(DocumentRow::into_domain).collect()
}

/// Returns the stage history of an application in order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn stage_history(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<Vec<StageHistoryEntry>, PersistenceError> {
    let rows: Vec<StageHistoryRow> = application_stage_history::table
        .filter(application_stage_history::tenant_id.eq(tenant_id.value()))
        .filter(application_stage_history::application_id.eq(application_id))
        .order(application_stage_history::sequence.asc())
        .select(StageHistoryRow::as_select())
        .load(conn)?;
    rows.into_iter().map(StageHistoryRow::into_domain).collect()
}

/// Returns the highest stage-history sequence for an application, or 0.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn last_stage_sequence(
    conn: &mut SqliteConnection,
    application_id: i64,
) -> Result<i64, PersistenceError> {
    let max: Option<i64> = application_stage_history::table
        .filter(application_stage_history::application_id.eq(application_id))
        .select(diesel::dsl::max(application_stage_history::sequence))
        .first(conn)?;
    Ok(max.unwrap_or(0))
}

/// Loads the merit-list pool for a class in a session.
///
/// Only applications in a merit-eligible status are returned; contact
/// details come from the first parent that has them.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn load_merit_candidates(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
    class_name: &str,
) -> Result<Vec<MeritCandidate>, PersistenceError> {
    let eligible: Vec<&'static str> = ApplicationStatus::MERIT_ELIGIBLE
        .iter()
        .map(ApplicationStatus::as_str)
        .collect();

    let rows: Vec<CandidateRow> = admission_applications::table
        .filter(admission_applications::tenant_id.eq(tenant_id.value()))
        .filter(admission_applications::session_id.eq(session_id))
        .filter(admission_applications::class_applied.eq(class_name))
        .filter(admission_applications::status.eq_any(eligible))
        .order(admission_applications::application_id.asc())
        .select((
            admission_applications::application_id,
            admission_applications::application_number,
            admission_applications::first_name,
            admission_applications::last_name,
            admission_applications::status,
            admission_applications::submitted_at,
            admission_applications::previous_marks,
        ))
        .load(conn)?;

    let mut candidates: Vec<MeritCandidate> = Vec::with_capacity(rows.len());
    for (application_id, number, first_name, last_name, status, submitted_at, marks) in rows {
        let parents: Vec<ParentDetails> = load_parents(conn, application_id)?;
        let student_name: String = if last_name.trim().is_empty() {
            first_name
        } else {
            format!("{first_name} {last_name}")
        };
        candidates.push(MeritCandidate {
            application_id,
            application_number: number,
            student_name,
            status: status
                .parse()
                .map_err(|e| PersistenceError::CorruptRow(format!("status: {e}")))?,
            submitted_at: parse_optional_timestamp(submitted_at.as_deref())?,
            previous_marks: marks,
            contact_phone: parents.iter().find_map(|p| p.phone.clone()),
            contact_email: parents.iter().find_map(|p| p.email.clone()),
        });
    }
    Ok(candidates)
}
