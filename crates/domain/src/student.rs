// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::application::{AdmissionApplication, Address};
use crate::types::TenantId;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// The student record derived from an enrolled application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// The canonical identifier. `None` until persisted.
    pub student_id: Option<i64>,
    pub tenant_id: TenantId,
    pub branch_id: i64,
    pub application_id: i64,
    pub session_id: i64,
    /// Unique per tenant, e.g. `ADM-NORTH-2026-0001`.
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub class_name: String,
    pub section: Option<String>,
    pub address: Option<Address>,
    pub admitted_at: OffsetDateTime,
}

impl Student {
    /// Derives the student record from an application being enrolled.
    #[must_use]
    pub fn from_application(
        application: &AdmissionApplication,
        branch_id: i64,
        admission_number: String,
        section: Option<String>,
        admitted_at: OffsetDateTime,
    ) -> Self {
        Self {
            student_id: None,
            tenant_id: application.tenant_id,
            branch_id,
            application_id: application.id(),
            session_id: application.session_id,
            admission_number,
            first_name: application.student.first_name.trim().to_string(),
            last_name: application.student.last_name.trim().to_string(),
            date_of_birth: application.student.date_of_birth,
            gender: application.student.gender.clone(),
            class_name: application.student.class_applied.trim().to_string(),
            section,
            address: application.student.address.clone(),
            admitted_at,
        }
    }
}
