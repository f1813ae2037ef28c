// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{Branch, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::BranchRow;
use crate::diesel_schema::branches;
use crate::error::PersistenceError;

/// Loads a branch by id.
///
/// # Errors
///
/// Returns `NotFound` if the branch does not exist for the tenant.
pub fn get_branch(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    branch_id: i64,
) -> Result<Branch, PersistenceError> {
    branches::table
        .filter(branches::tenant_id.eq(tenant_id.value()))
        .filter(branches::branch_id.eq(branch_id))
        .select(BranchRow::as_select())
        .first(conn)
        .optional()?
        .map(BranchRow::into_domain)
        .ok_or_else(|| PersistenceError::not_found("branch", branch_id))
}

/// Lists a tenant's branches by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_branches(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
) -> Result<Vec<Branch>, PersistenceError> {
    let rows: Vec<BranchRow> = branches::table
        .filter(branches::tenant_id.eq(tenant_id.value()))
        .order(branches::branch_id.asc())
        .select(BranchRow::as_select())
        .load(conn)?;
    Ok(rows.into_iter().map(BranchRow::into_domain).collect())
}

/// Resolves the branch an enrolled student belongs to.
///
/// The chain is: the preferred branch, the tenant's primary branch, then
/// the tenant's lowest-id branch. Returns `None` when the tenant has no
/// branches.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn resolve_enrollment_branch(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    preferred: Option<i64>,
) -> Result<Option<Branch>, PersistenceError> {
    if let Some(branch_id) = preferred {
        let row: Option<BranchRow> = branches::table
            .filter(branches::tenant_id.eq(tenant_id.value()))
            .filter(branches::branch_id.eq(branch_id))
            .select(BranchRow::as_select())
            .first(conn)
            .optional()?;
        if let Some(row) = row {
            return Ok(Some(row.into_domain()));
        }
    }

    let row: Option<BranchRow> = branches::table
        .filter(branches::tenant_id.eq(tenant_id.value()))
        .order((branches::is_primary.desc(), branches::branch_id.asc()))
        .select(BranchRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(BranchRow::into_domain))
}
