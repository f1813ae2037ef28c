// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{AdmissionDecision, DomainError};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::conversions::{
    bool_to_int, format_date, format_optional_date, format_optional_timestamp, format_timestamp,
    to_i32,
};
use crate::data_models::DecisionChangesetRow;
use crate::diesel_schema::admission_decisions;
use crate::error::PersistenceError;

fn changeset(decision: &AdmissionDecision) -> Result<DecisionChangesetRow, PersistenceError> {
    Ok(DecisionChangesetRow {
        decision_type: decision.decision_type.as_str(),
        section_assigned: decision.section_assigned.clone(),
        waitlist_position: decision
            .waitlist_position
            .map(|p| to_i32(p, "waitlist_position"))
            .transpose()?,
        rejection_reason: decision.rejection_reason.clone(),
        offer_letter_url: decision.offer.letter_url.clone(),
        offer_valid_until: format_optional_date(decision.offer.valid_until)?,
        offer_accepted: bool_to_int(decision.offer.accepted),
        offer_accepted_at: format_optional_timestamp(decision.offer.accepted_at)?,
    })
}

/// Inserts the decision for an application.
///
/// The unique index on `application_id` is the final guard against a
/// second decision.
///
/// # Errors
///
/// Returns `RuleViolation(DecisionExists)` if the application already has
/// a decision.
pub fn insert_decision(
    conn: &mut SqliteConnection,
    decision: &AdmissionDecision,
) -> Result<i64, PersistenceError> {
    let row: DecisionChangesetRow = changeset(decision)?;
    let result = diesel::insert_into(admission_decisions::table)
        .values((
            admission_decisions::tenant_id.eq(decision.tenant_id.value()),
            admission_decisions::application_id.eq(decision.application_id),
            admission_decisions::decision_type.eq(row.decision_type),
            admission_decisions::decision_date.eq(format_date(decision.decision_date)?),
            admission_decisions::decided_by.eq(&decision.decided_by),
            admission_decisions::section_assigned.eq(row.section_assigned),
            admission_decisions::waitlist_position.eq(row.waitlist_position),
            admission_decisions::rejection_reason.eq(row.rejection_reason),
            admission_decisions::offer_letter_url.eq(row.offer_letter_url),
            admission_decisions::offer_valid_until.eq(row.offer_valid_until),
            admission_decisions::offer_accepted.eq(row.offer_accepted),
            admission_decisions::offer_accepted_at.eq(row.offer_accepted_at),
            admission_decisions::created_at.eq(format_timestamp(decision.created_at)?),
            admission_decisions::version.eq(1_i64),
        ))
        .execute(conn)
        .map_err(PersistenceError::from);

    match result {
        Ok(_) => {}
        Err(PersistenceError::UniqueViolation(_)) => {
            return Err(DomainError::DecisionExists {
                application_id: decision.application_id,
            }
            .into());
        }
        Err(other) => return Err(other),
    }

    let decision_id: i64 = conn.get_last_insert_rowid()?;
    debug!(
        decision_id,
        application_id = decision.application_id,
        decision_type = %decision.decision_type,
        "Inserted decision"
    );
    Ok(decision_id)
}

/// Writes the mutable columns of a decision, guarded by its version.
///
/// The guard is what makes offer acceptance safe: of two concurrent
/// acceptances computed from the same version only one updates a row.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored version differs.
pub fn update_decision(
    conn: &mut SqliteConnection,
    decision: &AdmissionDecision,
) -> Result<i64, PersistenceError> {
    let decision_id: i64 = decision.decision_id.unwrap_or_default();
    let affected: usize = diesel::update(
        admission_decisions::table
            .filter(admission_decisions::decision_id.eq(decision_id))
            .filter(admission_decisions::tenant_id.eq(decision.tenant_id.value()))
            .filter(admission_decisions::version.eq(decision.version)),
    )
    .set((
        &changeset(decision)?,
        admission_decisions::version.eq(admission_decisions::version + 1),
    ))
    .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::ConcurrentModification {
            resource: "decision",
            id: decision_id,
        });
    }
    debug!(decision_id, decision_type = %decision.decision_type, "Updated decision");
    Ok(decision.version + 1)
}
