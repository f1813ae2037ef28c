// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::Student;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::conversions::{format_optional_date, format_timestamp};
use crate::diesel_schema::{student_addresses, students};
use crate::error::PersistenceError;

/// Inserts a student record and its address, if any.
///
/// # Errors
///
/// Returns `UniqueViolation` if the application was already enrolled or
/// the admission number is taken.
pub fn insert_student(
    conn: &mut SqliteConnection,
    student: &Student,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(students::table)
        .values((
            students::tenant_id.eq(student.tenant_id.value()),
            students::branch_id.eq(student.branch_id),
            students::application_id.eq(student.application_id),
            students::session_id.eq(student.session_id),
            students::admission_number.eq(&student.admission_number),
            students::first_name.eq(&student.first_name),
            students::last_name.eq(&student.last_name),
            students::date_of_birth.eq(format_optional_date(student.date_of_birth)?),
            students::gender.eq(student.gender.as_deref()),
            students::class_name.eq(&student.class_name),
            students::section.eq(student.section.as_deref()),
            students::admitted_at.eq(format_timestamp(student.admitted_at)?),
        ))
        .execute(conn)?;
    let student_id: i64 = conn.get_last_insert_rowid()?;

    if let Some(address) = &student.address {
        diesel::insert_into(student_addresses::table)
            .values((
                student_addresses::student_id.eq(student_id),
                student_addresses::line1.eq(&address.line1),
                student_addresses::line2.eq(address.line2.as_deref()),
                student_addresses::city.eq(&address.city),
                student_addresses::state.eq(&address.state),
                student_addresses::postal_code.eq(&address.postal_code),
            ))
            .execute(conn)?;
    }

    info!(
        student_id,
        application_id = student.application_id,
        admission_number = %student.admission_number,
        "Created student record"
    );
    Ok(student_id)
}
