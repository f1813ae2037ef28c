// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application::{ParentDetails, StudentDetails};
use crate::error::DomainError;
use time::Date;

/// Validates the identifying fields and date range of a session.
///
/// # Errors
///
/// Returns an error if:
/// - the name or academic year is blank
/// - the end date is before the start date
pub fn validate_session_fields(
    name: &str,
    academic_year: &str,
    start_date: Date,
    end_date: Date,
) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::MissingField { field: "name" });
    }
    if academic_year.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "academic_year",
        });
    }
    if end_date < start_date {
        return Err(DomainError::InvalidDateRange {
            start: start_date,
            end: end_date,
        });
    }
    Ok(())
}

/// Validates a class name.
///
/// # Errors
///
/// Returns `DomainError::MissingField` if the name is blank.
pub fn validate_class_name(class_name: &str) -> Result<(), DomainError> {
    if class_name.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "class_name",
        });
    }
    Ok(())
}

/// Validates a previous-school percentage.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` unless the value lies in `0..=100`.
pub fn validate_previous_marks(marks: f64) -> Result<(), DomainError> {
    if !marks.is_finite() || !(0.0..=100.0).contains(&marks) {
        return Err(DomainError::InvalidField {
            field: "previous_marks",
            reason: format!("{marks} is not between 0 and 100"),
        });
    }
    Ok(())
}

/// Validates student details for creating or updating an application.
///
/// # Errors
///
/// Returns an error if the first name or class is blank, or the previous
/// marks are out of range.
pub fn validate_student_details(student: &StudentDetails) -> Result<(), DomainError> {
    if student.first_name.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "first_name",
        });
    }
    validate_class_name(&student.class_applied)?;
    if let Some(marks) = student.previous_marks {
        validate_previous_marks(marks)?;
    }
    Ok(())
}

/// Validates a parent or guardian record.
///
/// # Errors
///
/// Returns an error if the name is blank or the e-mail is malformed.
pub fn validate_parent(parent: &ParentDetails) -> Result<(), DomainError> {
    if parent.name.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "parent_name",
        });
    }
    if let Some(email) = &parent.email {
        let email = email.trim();
        let well_formed = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(DomainError::InvalidField {
                field: "parent_email",
                reason: format!("'{email}' is not an e-mail address"),
            });
        }
    }
    Ok(())
}

/// Validates a waitlist position and narrows it.
///
/// # Errors
///
/// Returns `DomainError::InvalidField` unless the position is positive.
pub fn validate_waitlist_position(position: i64) -> Result<u32, DomainError> {
    if position <= 0 {
        return Err(DomainError::InvalidField {
            field: "waitlist_position",
            reason: format!("{position} is not a positive position"),
        });
    }
    u32::try_from(position).map_err(|_| DomainError::InvalidField {
        field: "waitlist_position",
        reason: format!("{position} is out of range"),
    })
}
