// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::Branch;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::conversions::bool_to_int;
use crate::diesel_schema::branches;
use crate::error::PersistenceError;

/// Inserts a branch. A new primary branch demotes the tenant's previous
/// primary branch.
///
/// # Errors
///
/// Returns `UniqueViolation` if the code is already taken.
pub fn insert_branch(
    conn: &mut SqliteConnection,
    branch: &Branch,
) -> Result<i64, PersistenceError> {
    if branch.is_primary {
        diesel::update(
            branches::table
                .filter(branches::tenant_id.eq(branch.tenant_id.value()))
                .filter(branches::is_primary.eq(1)),
        )
        .set(branches::is_primary.eq(0))
        .execute(conn)?;
    }

    diesel::insert_into(branches::table)
        .values((
            branches::tenant_id.eq(branch.tenant_id.value()),
            branches::code.eq(&branch.code),
            branches::name.eq(&branch.name),
            branches::is_primary.eq(bool_to_int(branch.is_primary)),
        ))
        .execute(conn)?;

    let branch_id: i64 = conn.get_last_insert_rowid()?;
    info!(branch_id, code = %branch.code, "Created branch");
    Ok(branch_id)
}
