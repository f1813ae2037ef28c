// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{AdmissionDecision, DecisionType, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::DecisionRow;
use crate::diesel_schema::{admission_applications, admission_decisions};
use crate::error::PersistenceError;

/// Loads the decision recorded for an application, if any.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_decision(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<Option<AdmissionDecision>, PersistenceError> {
    admission_decisions::table
        .filter(admission_decisions::tenant_id.eq(tenant_id.value()))
        .filter(admission_decisions::application_id.eq(application_id))
        .select(DecisionRow::as_select())
        .first(conn)
        .optional()?
        .map(DecisionRow::into_domain)
        .transpose()
}

/// Lists the waitlisted decisions for a class in a session by position.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_waitlist(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
    class_name: &str,
) -> Result<Vec<AdmissionDecision>, PersistenceError> {
    let rows: Vec<DecisionRow> = admission_decisions::table
        .inner_join(admission_applications::table)
        .filter(admission_decisions::tenant_id.eq(tenant_id.value()))
        .filter(admission_decisions::decision_type.eq(DecisionType::Waitlisted.as_str()))
        .filter(admission_applications::session_id.eq(session_id))
        .filter(admission_applications::class_applied.eq(class_name))
        .order((
            admission_decisions::waitlist_position.asc(),
            admission_decisions::decision_id.asc(),
        ))
        .select(DecisionRow::as_select())
        .load(conn)?;
    rows.into_iter().map(DecisionRow::into_domain).collect()
}
