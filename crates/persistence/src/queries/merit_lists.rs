// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{MeritList, MeritListEntry, MeritListKey, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::conversions::{int_to_bool, parse_timestamp, to_u32};
use crate::data_models::{MeritEntryRow, MeritListRow};
use crate::diesel_schema::{merit_list_entries, merit_lists};
use crate::error::PersistenceError;

fn assemble(
    conn: &mut SqliteConnection,
    row: MeritListRow,
) -> Result<MeritList, PersistenceError> {
    let entry_rows: Vec<MeritEntryRow> = merit_list_entries::table
        .filter(merit_list_entries::merit_list_id.eq(row.merit_list_id))
        .order(merit_list_entries::merit_rank.asc())
        .select(MeritEntryRow::as_select())
        .load(conn)?;
    let entries: Vec<MeritListEntry> = entry_rows
        .into_iter()
        .map(MeritEntryRow::into_domain)
        .collect::<Result<_, _>>()?;

    Ok(MeritList {
        merit_list_id: Some(row.merit_list_id),
        tenant_id: TenantId::new(row.tenant_id),
        key: MeritListKey {
            session_id: row.session_id,
            class_name: row.class_name,
            test_id: row.test_id,
        },
        generated_at: parse_timestamp(&row.generated_at)?,
        generated_by: row.generated_by,
        cutoff_score: row.cutoff_score,
        is_final: int_to_bool(row.is_final),
        entries,
        excluded_below_cutoff: to_u32(row.excluded_below_cutoff, "excluded_below_cutoff")?,
    })
}

/// Loads a merit list and its entries by id.
///
/// # Errors
///
/// Returns `NotFound` if the list does not exist for the tenant.
pub fn get_merit_list(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    merit_list_id: i64,
) -> Result<MeritList, PersistenceError> {
    let row: MeritListRow = merit_lists::table
        .filter(merit_lists::tenant_id.eq(tenant_id.value()))
        .filter(merit_lists::merit_list_id.eq(merit_list_id))
        .select(MeritListRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("merit list", merit_list_id))?;
    assemble(conn, row)
}

/// Loads the merit list for an exact (session, class, test) key.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn find_merit_list(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    key: &MeritListKey,
) -> Result<Option<MeritList>, PersistenceError> {
    let mut query = merit_lists::table
        .filter(merit_lists::tenant_id.eq(tenant_id.value()))
        .filter(merit_lists::session_id.eq(key.session_id))
        .filter(merit_lists::class_name.eq(key.class_name.clone()))
        .select(MeritListRow::as_select())
        .into_boxed();
    query = match key.test_id {
        Some(test_id) => query.filter(merit_lists::test_id.eq(test_id)),
        None => query.filter(merit_lists::test_id.is_null()),
    };

    let row: Option<MeritListRow> = query.first(conn).optional()?;
    row.map(|row| assemble(conn, row)).transpose()
}

/// Lists the merit lists of a session.
///
/// # Errors
///
/// Returns an error if the query fails or a row is invalid.
pub fn list_merit_lists(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<Vec<MeritList>, PersistenceError> {
    let rows: Vec<MeritListRow> = merit_lists::table
        .filter(merit_lists::tenant_id.eq(tenant_id.value()))
        .filter(merit_lists::session_id.eq(session_id))
        .order((merit_lists::class_name.asc(), merit_lists::merit_list_id.asc()))
        .select(MeritListRow::as_select())
        .load(conn)?;
    rows.into_iter().map(|row| assemble(conn, row)).collect()
}

/// Returns the id of a finalized merit list in the session, if any.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_final_merit_list_id(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    session_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(merit_lists::table
        .filter(merit_lists::tenant_id.eq(tenant_id.value()))
        .filter(merit_lists::session_id.eq(session_id))
        .filter(merit_lists::is_final.eq(1))
        .order(merit_lists::merit_list_id.asc())
        .select(merit_lists::merit_list_id)
        .first::<i64>(conn)
        .optional()?)
}
