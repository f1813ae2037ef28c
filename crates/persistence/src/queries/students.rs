// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{Address, Student, TenantId};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::{AddressRow, StudentRow};
use crate::diesel_schema::{student_addresses, students};
use crate::error::PersistenceError;

/// Loads the student record created when an application was enrolled.
///
/// # Errors
///
/// Returns an error if the query fails or the row is invalid.
pub fn find_student_by_application(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<Option<Student>, PersistenceError> {
    let row: Option<StudentRow> = students::table
        .filter(students::tenant_id.eq(tenant_id.value()))
        .filter(students::application_id.eq(application_id))
        .select(StudentRow::as_select())
        .first(conn)
        .optional()?;
    let Some(row) = row else {
        return Ok(None);
    };

    let address: Option<Address> = student_addresses::table
        .filter(student_addresses::student_id.eq(row.student_id))
        .select(AddressRow::as_select())
        .first(conn)
        .optional()?
        .map(AddressRow::into_domain);
    row.into_domain(address).map(Some)
}
