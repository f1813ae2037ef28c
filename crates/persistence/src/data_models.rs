// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_domain::{
    Address, AdmissionApplication, AdmissionDecision, AdmissionSeat, AdmissionSession,
    ApplicationDocument, ApplicationStatus, Branch, DecisionType, MeritListEntry, Offer,
    ParentDetails, SessionStatus, StageEvent, StageHistoryEntry, Student, StudentDetails, TenantId,
};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::conversions::{
    int_to_bool, parse_date, parse_optional_date, parse_optional_timestamp, parse_timestamp,
    to_u32,
};
use crate::diesel_schema;
use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

fn corrupt<E: std::fmt::Display>(column: &'static str) -> impl FnOnce(E) -> PersistenceError {
    move |e| PersistenceError::CorruptRow(format!("{column}: {e}"))
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::branches)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BranchRow {
    pub branch_id: i64,
    pub tenant_id: i64,
    pub code: String,
    pub name: String,
    pub is_primary: i32,
}

impl BranchRow {
    pub fn into_domain(self) -> Branch {
        Branch {
            branch_id: Some(self.branch_id),
            tenant_id: TenantId::new(self.tenant_id),
            code: self.code,
            name: self.name,
            is_primary: int_to_bool(self.is_primary),
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::admission_sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SessionRow {
    pub session_id: i64,
    pub tenant_id: i64,
    pub branch_id: Option<i64>,
    pub academic_year: String,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub application_fee: i64,
    pub required_documents_json: String,
    pub settings_json: String,
    pub version: i64,
}

impl SessionRow {
    pub fn into_domain(self) -> Result<AdmissionSession, PersistenceError> {
        let status: SessionStatus = self.status.parse().map_err(corrupt("status"))?;
        let required_documents: Vec<String> =
            serde_json::from_str(&self.required_documents_json)?;
        let settings: BTreeMap<String, String> = serde_json::from_str(&self.settings_json)?;
        Ok(AdmissionSession {
            session_id: Some(self.session_id),
            tenant_id: TenantId::new(self.tenant_id),
            branch_id: self.branch_id,
            academic_year: self.academic_year,
            name: self.name,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            status,
            application_fee: self.application_fee,
            required_documents,
            settings,
            version: self.version,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = diesel_schema::admission_sessions)]
pub struct NewSessionRow<'a> {
    pub tenant_id: i64,
    pub branch_id: Option<i64>,
    pub academic_year: &'a str,
    pub name: &'a str,
    pub start_date: String,
    pub end_date: String,
    pub status: &'static str,
    pub application_fee: i64,
    pub required_documents_json: String,
    pub settings_json: String,
    pub version: i64,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::admission_seats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SeatRow {
    pub seat_id: i64,
    pub tenant_id: i64,
    pub session_id: i64,
    pub class_name: String,
    pub total_seats: i32,
    pub filled_seats: i32,
    pub waitlist_limit: i32,
    pub reserved_seats_json: String,
}

impl SeatRow {
    pub fn into_domain(self) -> Result<AdmissionSeat, PersistenceError> {
        let reserved_seats: BTreeMap<String, u32> =
            serde_json::from_str(&self.reserved_seats_json)?;
        Ok(AdmissionSeat {
            seat_id: Some(self.seat_id),
            tenant_id: TenantId::new(self.tenant_id),
            session_id: self.session_id,
            class_name: self.class_name,
            total_seats: to_u32(self.total_seats, "total_seats")?,
            filled_seats: to_u32(self.filled_seats, "filled_seats")?,
            waitlist_limit: to_u32(self.waitlist_limit, "waitlist_limit")?,
            reserved_seats,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::admission_applications)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApplicationRow {
    pub application_id: i64,
    pub tenant_id: i64,
    pub session_id: i64,
    pub branch_id: Option<i64>,
    pub enquiry_id: Option<i64>,
    pub application_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub class_applied: String,
    pub previous_school: Option<String>,
    pub previous_marks: Option<f64>,
    pub address_json: Option<String>,
    pub status: String,
    pub submitted_at: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
    pub enrolled_at: Option<String>,
    pub waitlist_position: Option<i32>,
    pub fee_paid: i32,
    pub remarks: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

impl ApplicationRow {
    /// Converts the row, attaching the parents loaded separately.
    pub fn into_domain(
        self,
        parents: Vec<ParentDetails>,
    ) -> Result<AdmissionApplication, PersistenceError> {
        let status: ApplicationStatus = self.status.parse().map_err(corrupt("status"))?;
        let address: Option<Address> = self
            .address_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?;
        let waitlist_position: Option<u32> = self
            .waitlist_position
            .map(|p| to_u32(p, "waitlist_position"))
            .transpose()?;

        Ok(AdmissionApplication {
            application_id: Some(self.application_id),
            tenant_id: TenantId::new(self.tenant_id),
            session_id: self.session_id,
            branch_id: self.branch_id,
            enquiry_id: self.enquiry_id,
            application_number: self.application_number,
            student: StudentDetails {
                first_name: self.first_name,
                last_name: self.last_name,
                date_of_birth: parse_optional_date(self.date_of_birth.as_deref())?,
                gender: self.gender,
                class_applied: self.class_applied,
                previous_school: self.previous_school,
                previous_marks: self.previous_marks,
                address,
            },
            parents,
            status,
            submitted_at: parse_optional_timestamp(self.submitted_at.as_deref())?,
            approved_at: parse_optional_timestamp(self.approved_at.as_deref())?,
            approved_by: self.approved_by,
            enrolled_at: parse_optional_timestamp(self.enrolled_at.as_deref())?,
            waitlist_position,
            fee_paid: int_to_bool(self.fee_paid),
            remarks: self.remarks,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            version: self.version,
        })
    }
}

/// Columns written when an application is created or its details change.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = diesel_schema::admission_applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationDetailsRow {
    pub branch_id: Option<i64>,
    pub enquiry_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub class_applied: String,
    pub previous_school: Option<String>,
    pub previous_marks: Option<f64>,
    pub address_json: Option<String>,
    pub remarks: Option<String>,
}

/// Columns written by lifecycle transitions.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = diesel_schema::admission_applications)]
#[diesel(treat_none_as_null = true)]
pub struct ApplicationStatusRow {
    pub status: &'static str,
    pub submitted_at: Option<String>,
    pub approved_at: Option<String>,
    pub approved_by: Option<String>,
    pub enrolled_at: Option<String>,
    pub waitlist_position: Option<i32>,
    pub fee_paid: i32,
    pub updated_at: String,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::application_parents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ParentRow {
    pub relation: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
}

impl ParentRow {
    pub fn into_domain(self) -> Result<ParentDetails, PersistenceError> {
        Ok(ParentDetails {
            relation: self.relation.parse().map_err(corrupt("relation"))?,
            name: self.name,
            phone: self.phone,
            email: self.email,
            occupation: self.occupation,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = diesel_schema::application_parents)]
pub struct NewParentRow<'a> {
    pub application_id: i64,
    pub tenant_id: i64,
    pub position: i32,
    pub relation: &'static str,
    pub name: &'a str,
    pub phone: Option<&'a str>,
    pub email: Option<&'a str>,
    pub occupation: Option<&'a str>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::application_documents)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DocumentRow {
    pub document_id: i64,
    pub application_id: i64,
    pub document_type: String,
    pub file_reference: String,
    pub verified: i32,
    pub uploaded_at: String,
}

impl DocumentRow {
    pub fn into_domain(self) -> Result<ApplicationDocument, PersistenceError> {
        Ok(ApplicationDocument {
            document_id: Some(self.document_id),
            application_id: self.application_id,
            document_type: self.document_type,
            file_reference: self.file_reference,
            verified: int_to_bool(self.verified),
            uploaded_at: parse_timestamp(&self.uploaded_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::application_stage_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StageHistoryRow {
    pub sequence: i64,
    pub event_json: String,
    pub status_after: String,
    pub recorded_at: String,
    pub actor_id: String,
    pub remarks: Option<String>,
}

impl StageHistoryRow {
    pub fn into_domain(self) -> Result<StageHistoryEntry, PersistenceError> {
        let event: StageEvent = serde_json::from_str(&self.event_json)?;
        Ok(StageHistoryEntry {
            sequence: self.sequence,
            event,
            status_after: self.status_after.parse().map_err(corrupt("status_after"))?,
            recorded_at: parse_timestamp(&self.recorded_at)?,
            actor_id: self.actor_id,
            remarks: self.remarks,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::admission_decisions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DecisionRow {
    pub decision_id: i64,
    pub tenant_id: i64,
    pub application_id: i64,
    pub decision_type: String,
    pub decision_date: String,
    pub decided_by: String,
    pub section_assigned: Option<String>,
    pub waitlist_position: Option<i32>,
    pub rejection_reason: Option<String>,
    pub offer_letter_url: Option<String>,
    pub offer_valid_until: Option<String>,
    pub offer_accepted: i32,
    pub offer_accepted_at: Option<String>,
    pub created_at: String,
    pub version: i64,
}

impl DecisionRow {
    pub fn into_domain(self) -> Result<AdmissionDecision, PersistenceError> {
        let decision_type: DecisionType = self
            .decision_type
            .parse()
            .map_err(corrupt("decision_type"))?;
        Ok(AdmissionDecision {
            decision_id: Some(self.decision_id),
            tenant_id: TenantId::new(self.tenant_id),
            application_id: self.application_id,
            decision_type,
            decision_date: parse_date(&self.decision_date)?,
            decided_by: self.decided_by,
            section_assigned: self.section_assigned,
            waitlist_position: self
                .waitlist_position
                .map(|p| to_u32(p, "waitlist_position"))
                .transpose()?,
            rejection_reason: self.rejection_reason,
            offer: Offer {
                letter_url: self.offer_letter_url,
                valid_until: parse_optional_date(self.offer_valid_until.as_deref())?,
                accepted: int_to_bool(self.offer_accepted),
                accepted_at: parse_optional_timestamp(self.offer_accepted_at.as_deref())?,
            },
            created_at: parse_timestamp(&self.created_at)?,
            version: self.version,
        })
    }
}

/// Columns a decision update may change.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = diesel_schema::admission_decisions)]
#[diesel(treat_none_as_null = true)]
pub struct DecisionChangesetRow {
    pub decision_type: &'static str,
    pub section_assigned: Option<String>,
    pub waitlist_position: Option<i32>,
    pub rejection_reason: Option<String>,
    pub offer_letter_url: Option<String>,
    pub offer_valid_until: Option<String>,
    pub offer_accepted: i32,
    pub offer_accepted_at: Option<String>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::merit_lists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MeritListRow {
    pub merit_list_id: i64,
    pub tenant_id: i64,
    pub session_id: i64,
    pub class_name: String,
    pub test_id: Option<i64>,
    pub generated_at: String,
    pub generated_by: String,
    pub cutoff_score: Option<f64>,
    pub is_final: i32,
    pub excluded_below_cutoff: i32,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::merit_list_entries)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MeritEntryRow {
    pub merit_rank: i32,
    pub application_id: i64,
    pub application_number: String,
    pub student_name: String,
    pub score: f64,
    pub status: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl MeritEntryRow {
    pub fn into_domain(self) -> Result<MeritListEntry, PersistenceError> {
        Ok(MeritListEntry {
            rank: to_u32(self.merit_rank, "merit_rank")?,
            application_id: self.application_id,
            application_number: self.application_number,
            student_name: self.student_name,
            score: self.score,
            status: self.status.parse().map_err(corrupt("status"))?,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::students)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudentRow {
    pub student_id: i64,
    pub tenant_id: i64,
    pub branch_id: i64,
    pub application_id: i64,
    pub session_id: i64,
    pub admission_number: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub class_name: String,
    pub section: Option<String>,
    pub admitted_at: String,
}

impl StudentRow {
    pub fn into_domain(self, address: Option<Address>) -> Result<Student, PersistenceError> {
        Ok(Student {
            student_id: Some(self.student_id),
            tenant_id: TenantId::new(self.tenant_id),
            branch_id: self.branch_id,
            application_id: self.application_id,
            session_id: self.session_id,
            admission_number: self.admission_number,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: parse_optional_date(self.date_of_birth.as_deref())?,
            gender: self.gender,
            class_name: self.class_name,
            section: self.section,
            address,
            admitted_at: parse_timestamp(&self.admitted_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::student_addresses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AddressRow {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl AddressRow {
    pub fn into_domain(self) -> Address {
        Address {
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
        }
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = diesel_schema::audit_events)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AuditEventRow {
    pub event_id: i64,
    pub tenant_id: i64,
    pub entity_kind: String,
    pub entity_id: i64,
    pub actor_json: String,
    pub cause_json: String,
    pub action_json: String,
    pub before_snapshot_json: String,
    pub after_snapshot_json: String,
    pub recorded_at: String,
}
