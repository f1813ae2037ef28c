// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application, parent, document and stage-history writes.

use admissions::ApplicationState;
use admissions_audit::{Action, Actor, AuditEvent, Cause, EntityKind, EntityRef, StateSnapshot};
use admissions_domain::{
    AdmissionApplication, ApplicationDocument, ApplicationStatus, ParentDetails, SequenceScope,
    StageEvent, StageHistoryEntry, StudentDetails, TenantId,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::conversions::{
    bool_to_int, format_optional_date, format_optional_timestamp, format_timestamp, to_i32,
};
use crate::data_models::{ApplicationDetailsRow, ApplicationStatusRow, NewParentRow};
use crate::diesel_schema::{
    admission_applications, application_documents, application_parents,
    application_stage_history,
};
use crate::error::PersistenceError;
use crate::mutations::{audit, sequences};
use crate::queries;

/// Input for creating an application in `draft`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewApplication {
    pub tenant_id: TenantId,
    pub session_id: i64,
    pub branch_id: Option<i64>,
    pub enquiry_id: Option<i64>,
    pub student: StudentDetails,
    pub parents: Vec<ParentDetails>,
    pub remarks: Option<String>,
}

fn details_row(
    branch_id: Option<i64>,
    enquiry_id: Option<i64>,
    student: &StudentDetails,
    remarks: Option<&String>,
) -> Result<ApplicationDetailsRow, PersistenceError> {
    Ok(ApplicationDetailsRow {
        branch_id,
        enquiry_id,
        first_name: student.first_name.trim().to_string(),
        last_name: student.last_name.trim().to_string(),
        date_of_birth: format_optional_date(student.date_of_birth)?,
        gender: student.gender.clone(),
        class_applied: student.class_applied.trim().to_string(),
        previous_school: student.previous_school.clone(),
        previous_marks: student.previous_marks,
        address_json: student
            .address
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
        remarks: remarks.cloned(),
    })
}

/// Creates an application: allocates its number, inserts the row and its
/// parents, and records the `created` stage entry and audit event.
///
/// Must run inside a transaction.
///
/// # Errors
///
/// Returns an error if any write fails.
pub fn create_application(
    conn: &mut SqliteConnection,
    new: &NewApplication,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<AdmissionApplication, PersistenceError> {
    let scope = SequenceScope::Application { date: now.date() };
    let application_number: String = sequences::allocate_number(conn, new.tenant_id, &scope)?;
    let details: ApplicationDetailsRow = details_row(
        new.branch_id,
        new.enquiry_id,
        &new.student,
        new.remarks.as_ref(),
    )?;
    let created_at: String = format_timestamp(now)?;

    diesel::insert_into(admission_applications::table)
        .values((
            &details,
            admission_applications::tenant_id.eq(new.tenant_id.value()),
            admission_applications::session_id.eq(new.session_id),
            admission_applications::application_number.eq(&application_number),
            admission_applications::status.eq(ApplicationStatus::Draft.as_str()),
            admission_applications::fee_paid.eq(0),
            admission_applications::created_at.eq(&created_at),
            admission_applications::updated_at.eq(&created_at),
            admission_applications::version.eq(1_i64),
        ))
        .execute(conn)?;
    let application_id: i64 = conn.get_last_insert_rowid()?;

    insert_parents(conn, new.tenant_id, application_id, &new.parents)?;

    let entry = StageHistoryEntry::new(
        StageEvent::Created,
        ApplicationStatus::Draft,
        now,
        actor.id.clone(),
        None,
    );
    append_stage_entry(conn, new.tenant_id, application_id, &entry)?;

    let application: AdmissionApplication =
        queries::applications::get_application(conn, new.tenant_id, application_id)?;
    let event = AuditEvent::new(
        new.tenant_id,
        EntityRef::new(EntityKind::Application, application_id),
        actor,
        cause,
        Action::new(
            String::from("CreateApplication"),
            Some(format!(
                "Created application {application_number} for class '{}'",
                application.student.class_applied
            )),
        ),
        StateSnapshot::empty(),
        ApplicationState::new(application.clone(), None).to_snapshot(),
        now,
    );
    audit::persist_audit_event(conn, &event)?;

    info!(
        application_id,
        application_number = %application_number,
        session_id = new.session_id,
        "Created application"
    );
    Ok(application)
}

fn insert_parents(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
    parents: &[ParentDetails],
) -> Result<(), PersistenceError> {
    for (position, parent) in parents.iter().enumerate() {
        let row = NewParentRow {
            application_id,
            tenant_id: tenant_id.value(),
            position: i32::try_from(position)
                .map_err(|_| PersistenceError::Other(String::from("too many parents")))?,
            relation: parent.relation.as_str(),
            name: parent.name.trim(),
            phone: parent.phone.as_deref(),
            email: parent.email.as_deref(),
            occupation: parent.occupation.as_deref(),
        };
        diesel::insert_into(application_parents::table)
            .values(&row)
            .execute(conn)?;
    }
    Ok(())
}

/// Writes the student details of an application, guarded by its version.
///
/// When `parents` is given the parent rows are replaced. Must run inside a
/// transaction.
///
/// # Returns
///
/// The new version.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored version differs.
pub fn update_application_details(
    conn: &mut SqliteConnection,
    application: &AdmissionApplication,
    parents: Option<&[ParentDetails]>,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let application_id: i64 = application.id();
    let details: ApplicationDetailsRow = details_row(
        application.branch_id,
        application.enquiry_id,
        &application.student,
        application.remarks.as_ref(),
    )?;

    let affected: usize = diesel::update(
        admission_applications::table
            .filter(admission_applications::application_id.eq(application_id))
            .filter(admission_applications::tenant_id.eq(application.tenant_id.value()))
            .filter(admission_applications::version.eq(application.version)),
    )
    .set((
        &details,
        admission_applications::updated_at.eq(format_timestamp(now)?),
        admission_applications::version.eq(admission_applications::version + 1),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::ConcurrentModification {
            resource: "application",
            id: application_id,
        });
    }

    if let Some(parents) = parents {
        diesel::delete(
            application_parents::table
                .filter(application_parents::application_id.eq(application_id)),
        )
        .execute(conn)?;
        insert_parents(conn, application.tenant_id, application_id, parents)?;
    }

    debug!(application_id, "Updated application details");
    Ok(application.version + 1)
}

/// Writes the lifecycle columns of an application, guarded by its version.
///
/// `expected_version` is the version the transition was computed from.
///
/// # Errors
///
/// Returns `ConcurrentModification` if the stored version differs.
pub fn update_application_status(
    conn: &mut SqliteConnection,
    application: &AdmissionApplication,
    expected_version: i64,
) -> Result<i64, PersistenceError> {
    let application_id: i64 = application.id();
    let row = ApplicationStatusRow {
        status: application.status.as_str(),
        submitted_at: format_optional_timestamp(application.submitted_at)?,
        approved_at: format_optional_timestamp(application.approved_at)?,
        approved_by: application.approved_by.clone(),
        enrolled_at: format_optional_timestamp(application.enrolled_at)?,
        waitlist_position: application
            .waitlist_position
            .map(|p| to_i32(p, "waitlist_position"))
            .transpose()?,
        fee_paid: bool_to_int(application.fee_paid),
        updated_at: format_timestamp(application.updated_at)?,
    };

    let affected: usize = diesel::update(
        admission_applications::table
            .filter(admission_applications::application_id.eq(application_id))
            .filter(admission_applications::tenant_id.eq(application.tenant_id.value()))
            .filter(admission_applications::version.eq(expected_version)),
    )
    .set((
        &row,
        admission_applications::version.eq(admission_applications::version + 1),
    ))
    .execute(conn)?;
    if affected == 0 {
        return Err(PersistenceError::ConcurrentModification {
            resource: "application",
            id: application_id,
        });
    }
    Ok(expected_version + 1)
}

/// Deletes a draft application. Parents, documents and stage history
/// cascade.
///
/// # Errors
///
/// Returns `RuleViolation(ApplicationNotDraft)` if the application has left
/// `draft`, or `NotFound`.
pub fn delete_application(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(
        admission_applications::table
            .filter(admission_applications::application_id.eq(application_id))
            .filter(admission_applications::tenant_id.eq(tenant_id.value()))
            .filter(admission_applications::status.eq(ApplicationStatus::Draft.as_str())),
    )
    .execute(conn)?;

    if affected == 0 {
        let current: AdmissionApplication =
            queries::applications::get_application(conn, tenant_id, application_id)?;
        current.ensure_deletable()?;
        return Err(PersistenceError::not_found("application", application_id));
    }
    info!(application_id, "Deleted draft application");
    Ok(())
}

/// Appends an entry to the stage history with the next sequence number.
///
/// Must run inside a transaction.
///
/// # Returns
///
/// The sequence assigned to the entry.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn append_stage_entry(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
    entry: &StageHistoryEntry,
) -> Result<i64, PersistenceError> {
    let sequence: i64 = queries::applications::last_stage_sequence(conn, application_id)? + 1;
    diesel::insert_into(application_stage_history::table)
        .values((
            application_stage_history::application_id.eq(application_id),
            application_stage_history::tenant_id.eq(tenant_id.value()),
            application_stage_history::sequence.eq(sequence),
            application_stage_history::event_type.eq(entry.event.event_type()),
            application_stage_history::event_json.eq(serde_json::to_string(&entry.event)?),
            application_stage_history::status_after.eq(entry.status_after.as_str()),
            application_stage_history::recorded_at.eq(format_timestamp(entry.recorded_at)?),
            application_stage_history::actor_id.eq(&entry.actor_id),
            application_stage_history::remarks.eq(entry.remarks.as_deref()),
        ))
        .execute(conn)?;
    debug!(
        application_id,
        sequence,
        event = entry.event.event_type(),
        "Appended stage history entry"
    );
    Ok(sequence)
}

/// Attaches a document reference to an application.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn add_document(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    application_id: i64,
    document_type: &str,
    file_reference: &str,
    uploaded_at: OffsetDateTime,
) -> Result<ApplicationDocument, PersistenceError> {
    diesel::insert_into(application_documents::table)
        .values((
            application_documents::application_id.eq(application_id),
            application_documents::tenant_id.eq(tenant_id.value()),
            application_documents::document_type.eq(document_type),
            application_documents::file_reference.eq(file_reference),
            application_documents::verified.eq(0),
            application_documents::uploaded_at.eq(format_timestamp(uploaded_at)?),
        ))
        .execute(conn)?;
    let document_id: i64 = conn.get_last_insert_rowid()?;
    debug!(document_id, application_id, document_type, "Added document");

    Ok(ApplicationDocument {
        document_id: Some(document_id),
        application_id,
        document_type: document_type.to_string(),
        file_reference: file_reference.to_string(),
        verified: false,
        uploaded_at,
    })
}

/// Marks a document as verified.
///
/// # Returns
///
/// The application the document belongs to.
///
/// # Errors
///
/// Returns `NotFound` if the document does not exist for the tenant.
pub fn verify_document(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    document_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::update(
        application_documents::table
            .filter(application_documents::document_id.eq(document_id))
            .filter(application_documents::tenant_id.eq(tenant_id.value())),
    )
    .set(application_documents::verified.eq(1))
    .returning(application_documents::application_id)
    .get_result::<i64>(conn)
    .optional()?
    .ok_or_else(|| PersistenceError::not_found("document", document_id))
}
