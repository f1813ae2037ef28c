// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic counters behind application and admission numbers.

use admissions_domain::{SequenceScope, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::upsert::excluded;
use tracing::debug;

use crate::diesel_schema::sequence_counters;
use crate::error::PersistenceError;

/// Increments the counter for `scope` and returns the new value.
///
/// The increment and the read are one `INSERT ... ON CONFLICT DO UPDATE
/// ... RETURNING` statement, so concurrent callers always receive
/// distinct values. The first value of a scope is 1.
///
/// # Errors
///
/// Returns an error if the statement fails.
pub fn next_value(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    scope: &SequenceScope,
) -> Result<i64, PersistenceError> {
    let scope_key: String = scope.scope_key();
    let value: i64 = diesel::insert_into(sequence_counters::table)
        .values((
            sequence_counters::tenant_id.eq(tenant_id.value()),
            sequence_counters::scope_key.eq(&scope_key),
            sequence_counters::last_value.eq(1_i64),
        ))
        .on_conflict((sequence_counters::tenant_id, sequence_counters::scope_key))
        .do_update()
        .set(
            sequence_counters::last_value
                .eq(sequence_counters::last_value + excluded(sequence_counters::last_value)),
        )
        .returning(sequence_counters::last_value)
        .get_result(conn)?;

    debug!(tenant_id = tenant_id.value(), scope_key, value, "Allocated sequence value");
    Ok(value)
}

/// Allocates the next formatted number for `scope`.
///
/// # Errors
///
/// Returns an error if the counter cannot be incremented.
pub fn allocate_number(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    scope: &SequenceScope,
) -> Result<String, PersistenceError> {
    let value: i64 = next_value(conn, tenant_id, scope)?;
    Ok(scope.format_number(value))
}
