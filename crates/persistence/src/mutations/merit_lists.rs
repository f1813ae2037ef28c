// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merit list writes.
//!
//! Every write to an existing list is conditional on `is_final = 0`, so a
//! finalized list cannot change even under a concurrent finalize.

use admissions_domain::{MeritList, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::conversions::{bool_to_int, format_timestamp, to_i32};
use crate::diesel_schema::{merit_list_entries, merit_lists};
use crate::error::PersistenceError;
use crate::queries;

/// Replaces the working list for the list's key with `list`.
///
/// An existing non-final list for the key is deleted with its entries.
/// Must run inside a transaction so readers never see the gap.
///
/// # Returns
///
/// The id of the new list.
///
/// # Errors
///
/// Returns `RuleViolation(MeritListFinalized)` if the key already has a
/// final list.
pub fn replace_merit_list(
    conn: &mut SqliteConnection,
    list: &MeritList,
) -> Result<i64, PersistenceError> {
    if let Some(existing) = queries::merit_lists::find_merit_list(conn, list.tenant_id, &list.key)?
    {
        existing.ensure_mutable()?;
        let existing_id: i64 = existing.merit_list_id.unwrap_or_default();
        diesel::delete(merit_lists::table.filter(merit_lists::merit_list_id.eq(existing_id)))
            .execute(conn)?;
        debug!(merit_list_id = existing_id, "Discarded previous working merit list");
    }

    diesel::insert_into(merit_lists::table)
        .values((
            merit_lists::tenant_id.eq(list.tenant_id.value()),
            merit_lists::session_id.eq(list.key.session_id),
            merit_lists::class_name.eq(&list.key.class_name),
            merit_lists::test_id.eq(list.key.test_id),
            merit_lists::generated_at.eq(format_timestamp(list.generated_at)?),
            merit_lists::generated_by.eq(&list.generated_by),
            merit_lists::cutoff_score.eq(list.cutoff_score),
            merit_lists::is_final.eq(bool_to_int(list.is_final)),
            merit_lists::excluded_below_cutoff
                .eq(to_i32(list.excluded_below_cutoff, "excluded_below_cutoff")?),
        ))
        .execute(conn)?;
    let merit_list_id: i64 = conn.get_last_insert_rowid()?;

    for entry in &list.entries {
        diesel::insert_into(merit_list_entries::table)
            .values((
                merit_list_entries::merit_list_id.eq(merit_list_id),
                merit_list_entries::merit_rank.eq(to_i32(entry.rank, "merit_rank")?),
                merit_list_entries::application_id.eq(entry.application_id),
                merit_list_entries::application_number.eq(&entry.application_number),
                merit_list_entries::student_name.eq(&entry.student_name),
                merit_list_entries::score.eq(entry.score),
                merit_list_entries::status.eq(entry.status.as_str()),
                merit_list_entries::contact_phone.eq(entry.contact_phone.as_deref()),
                merit_list_entries::contact_email.eq(entry.contact_email.as_deref()),
            ))
            .execute(conn)?;
    }

    info!(
        merit_list_id,
        session_id = list.key.session_id,
        class_name = %list.key.class_name,
        entries = list.entries.len(),
        excluded = list.excluded_below_cutoff,
        "Generated merit list"
    );
    Ok(merit_list_id)
}

/// Loads the list after a conditional write touched no row, and reports
/// why: finalized, or missing.
fn explain_untouched(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    merit_list_id: i64,
) -> PersistenceError {
    match queries::merit_lists::get_merit_list(conn, tenant_id, merit_list_id) {
        Ok(list) => match list.ensure_mutable() {
            Err(err) => err.into(),
            Ok(()) => PersistenceError::not_found("merit list", merit_list_id),
        },
        Err(err) => err,
    }
}

/// Marks a list final. Irreversible.
///
/// # Errors
///
/// Returns `RuleViolation(MeritListFinalized)` if already final, or
/// `NotFound`.
pub fn finalize_merit_list(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    merit_list_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        merit_lists::table
            .filter(merit_lists::merit_list_id.eq(merit_list_id))
            .filter(merit_lists::tenant_id.eq(tenant_id.value()))
            .filter(merit_lists::is_final.eq(0)),
    )
    .set(merit_lists::is_final.eq(1))
    .execute(conn)?;
    if affected == 0 {
        return Err(explain_untouched(conn, tenant_id, merit_list_id));
    }
    info!(merit_list_id, "Finalized merit list");
    Ok(())
}

/// Changes the recorded cutoff of a working list. Stored entries are not
/// re-filtered.
///
/// # Errors
///
/// Returns `RuleViolation(MeritListFinalized)` if the list is final, or
/// `NotFound`.
pub fn update_cutoff(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    merit_list_id: i64,
    cutoff_score: Option<f64>,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(
        merit_lists::table
            .filter(merit_lists::merit_list_id.eq(merit_list_id))
            .filter(merit_lists::tenant_id.eq(tenant_id.value()))
            .filter(merit_lists::is_final.eq(0)),
    )
    .set(merit_lists::cutoff_score.eq(cutoff_score))
    .execute(conn)?;
    if affected == 0 {
        return Err(explain_untouched(conn, tenant_id, merit_list_id));
    }
    debug!(merit_list_id, ?cutoff_score, "Updated merit list cutoff");
    Ok(())
}

/// Deletes a working list and its entries.
///
/// # Errors
///
/// Returns `RuleViolation(MeritListFinalized)` if the list is final, or
/// `NotFound`.
pub fn delete_merit_list(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    merit_list_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(
        merit_lists::table
            .filter(merit_lists::merit_list_id.eq(merit_list_id))
            .filter(merit_lists::tenant_id.eq(tenant_id.value()))
            .filter(merit_lists::is_final.eq(0)),
    )
    .execute(conn)?;
    if affected == 0 {
        return Err(explain_untouched(conn, tenant_id, merit_list_id));
    }
    info!(merit_list_id, "Deleted merit list");
    Ok(())
}
