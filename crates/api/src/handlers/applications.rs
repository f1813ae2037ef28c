// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application intake and staged review.
//!
//! Creating, editing and submitting an application require its session to
//! be open. Review, decision and enrollment steps do not.

use admissions::{ApplicationState, Command};
use admissions_audit::{EntityKind, StateSnapshot};
use admissions_domain::{
    AdmissionApplication, AdmissionDecision, AdmissionSession, ApplicationDocument,
    ApplicationStatus, ParentDetails, StageHistoryEntry, Student, StudentDetails,
    validate_student_details,
};
use admissions_persistence::{ApplicationFilter, NewApplication, PersistedTransition, Persistence};
use tracing::info;

use super::{parse_parents, require_text, run_command, snapshot_of, transition_response};
use crate::context::RequestContext;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    AddDocumentRequest, ApplicationDetail, ApplicationInfo, CreateApplicationRequest,
    DecisionInfo, DocumentInfo, ListApplicationsRequest, StageHistoryInfo, StudentInfo,
    TransitionResponse, UpdateApplicationRequest, UpdateStageRequest,
};

fn load_open_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<AdmissionSession, ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    session
        .ensure_accepting_applications()
        .map_err(translate_domain_error)?;
    Ok(session)
}

fn ensure_application_exists(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<AdmissionApplication, ApiError> {
    persistence
        .get_application(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)
}

/// Creates a draft application in an open session.
///
/// The application number is allocated in the same transaction as the
/// insert.
///
/// # Errors
///
/// Returns an error if:
/// - The session does not exist or is not open
/// - The branch does not exist
/// - The student's first name or class is blank, or the previous marks
///   are outside 0-100
/// - A parent has an unknown relation, a blank name or a malformed e-mail
pub fn create_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateApplicationRequest,
) -> Result<ApplicationInfo, ApiError> {
    load_open_session(persistence, ctx, request.session_id)?;
    if let Some(branch_id) = request.branch_id {
        persistence
            .get_branch(ctx.tenant_id, branch_id)
            .map_err(translate_persistence_error)?;
    }

    let mut student: StudentDetails = request.student.clone();
    student.first_name = student.first_name.trim().to_string();
    student.last_name = student.last_name.trim().to_string();
    student.class_applied = student.class_applied.trim().to_string();
    validate_student_details(&student).map_err(translate_domain_error)?;
    let parents: Vec<ParentDetails> = parse_parents(&request.parents)?;

    let new = NewApplication {
        tenant_id: ctx.tenant_id,
        session_id: request.session_id,
        branch_id: request.branch_id,
        enquiry_id: request.enquiry_id,
        student,
        parents,
        remarks: request.remarks.clone(),
    };
    let application: AdmissionApplication = persistence
        .create_application(&new, ctx.actor.clone(), ctx.cause.clone(), ctx.now())
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id = application.id(),
        application_number = %application.application_number,
        session_id = application.session_id,
        "Created application"
    );

    Ok(ApplicationInfo::from(&application))
}

/// Edits an application's details. Absent fields are left unchanged;
/// a supplied parent list replaces the stored one.
///
/// # Errors
///
/// Returns an error if:
/// - The application does not exist
/// - Its session is not open
/// - Its status no longer allows edits
/// - The edited details fail validation
/// - Another writer changed the application first
pub fn update_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateApplicationRequest,
) -> Result<ApplicationInfo, ApiError> {
    let current: AdmissionApplication =
        ensure_application_exists(persistence, ctx, request.application_id)?;
    current.ensure_editable().map_err(translate_domain_error)?;
    load_open_session(persistence, ctx, current.session_id)?;
    if let Some(branch_id) = request.branch_id {
        persistence
            .get_branch(ctx.tenant_id, branch_id)
            .map_err(translate_persistence_error)?;
    }

    let mut application: AdmissionApplication = current.clone();
    apply_detail_update(&mut application, request);
    validate_student_details(&application.student).map_err(translate_domain_error)?;
    let parents: Option<Vec<ParentDetails>> = request
        .parents
        .as_deref()
        .map(parse_parents)
        .transpose()?;
    if let Some(parents) = &parents {
        application.parents.clone_from(parents);
    }

    let event = ctx.audit_event(
        EntityKind::Application,
        request.application_id,
        "UpdateApplication",
        format!("Updated details of {}", current.application_number),
        snapshot_of(&current.student)?,
        snapshot_of(&application.student)?,
    );
    let stored: AdmissionApplication = persistence
        .update_application(&application, parents.as_deref(), ctx.now(), event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id = request.application_id,
        version = stored.version,
        "Updated application details"
    );

    Ok(ApplicationInfo::from(&stored))
}

fn apply_detail_update(
    application: &mut AdmissionApplication,
    request: &UpdateApplicationRequest,
) {
    let student: &mut StudentDetails = &mut application.student;
    if let Some(first_name) = &request.first_name {
        student.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = &request.last_name {
        student.last_name = last_name.trim().to_string();
    }
    if let Some(date_of_birth) = request.date_of_birth {
        student.date_of_birth = Some(date_of_birth);
    }
    if let Some(gender) = &request.gender {
        student.gender = Some(gender.clone());
    }
    if let Some(class_applied) = &request.class_applied {
        student.class_applied = class_applied.trim().to_string();
    }
    if let Some(previous_school) = &request.previous_school {
        student.previous_school = Some(previous_school.clone());
    }
    if let Some(previous_marks) = request.previous_marks {
        student.previous_marks = Some(previous_marks);
    }
    if let Some(address) = &request.address {
        student.address = Some(address.clone());
    }
    if let Some(branch_id) = request.branch_id {
        application.branch_id = Some(branch_id);
    }
    if let Some(remarks) = &request.remarks {
        application.remarks = Some(remarks.clone());
    }
}

/// Submits a draft, or resubmits an application that is submitted, under
/// review or waiting on documents.
///
/// # Errors
///
/// Returns an error if the session is not open, the student name or class
/// is blank, or the status does not allow submission.
pub fn submit_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<TransitionResponse, ApiError> {
    let application: AdmissionApplication =
        ensure_application_exists(persistence, ctx, application_id)?;
    load_open_session(persistence, ctx, application.session_id)?;

    let persisted: PersistedTransition =
        run_command(persistence, ctx, application_id, Command::Submit)?;
    Ok(transition_response(
        &persisted,
        format!("Submitted {}", persisted.application.application_number),
    ))
}

/// Moves an application along one edge of the stage graph.
///
/// Moving to `enrolled` runs the full enrollment in one transaction:
/// branch resolution, admission number, student record and seat.
///
/// # Errors
///
/// Returns an error if the status is unknown or the edge does not exist;
/// the conflict carries the current, requested and allowed statuses.
pub fn update_stage(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateStageRequest,
) -> Result<TransitionResponse, ApiError> {
    let target: ApplicationStatus = request.status.parse().map_err(translate_domain_error)?;
    let persisted: PersistedTransition = run_command(
        persistence,
        ctx,
        request.application_id,
        Command::ChangeStage {
            target,
            remarks: request.remarks.clone(),
        },
    )?;
    Ok(transition_response(
        &persisted,
        format!(
            "{} is now '{}'",
            persisted.application.application_number, persisted.application.status
        ),
    ))
}

/// Records that the application fee was paid.
///
/// # Errors
///
/// Returns an error if the application does not exist.
pub fn mark_fee_paid(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<TransitionResponse, ApiError> {
    let persisted: PersistedTransition =
        run_command(persistence, ctx, application_id, Command::MarkFeePaid)?;
    Ok(transition_response(
        &persisted,
        format!("Fee paid for {}", persisted.application.application_number),
    ))
}

/// Deletes a draft application with its parents, documents and history.
///
/// # Errors
///
/// Returns an error if the application does not exist or has left `draft`.
pub fn delete_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<(), ApiError> {
    let application: AdmissionApplication =
        ensure_application_exists(persistence, ctx, application_id)?;
    application
        .ensure_deletable()
        .map_err(translate_domain_error)?;

    let event = ctx.audit_event(
        EntityKind::Application,
        application_id,
        "DeleteApplication",
        format!("Deleted draft {}", application.application_number),
        ApplicationState::new(application.clone(), None).to_snapshot(),
        StateSnapshot::empty(),
    );
    persistence
        .delete_application(ctx.tenant_id, application_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id,
        application_number = %application.application_number,
        "Deleted application"
    );
    Ok(())
}

/// Loads an application with its decision and documents.
///
/// # Errors
///
/// Returns an error if the application does not exist.
pub fn get_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<ApplicationDetail, ApiError> {
    let application: AdmissionApplication =
        ensure_application_exists(persistence, ctx, application_id)?;
    let decision: Option<AdmissionDecision> = persistence
        .find_decision(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;
    let documents: Vec<ApplicationDocument> = persistence
        .list_documents(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;

    Ok(ApplicationDetail {
        application: ApplicationInfo::from(&application),
        decision: decision.as_ref().map(DecisionInfo::from),
        documents: documents.iter().map(DocumentInfo::from).collect(),
    })
}

/// Loads an application by its number.
///
/// # Errors
///
/// Returns an error if no application carries the number.
pub fn get_application_by_number(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_number: &str,
) -> Result<ApplicationDetail, ApiError> {
    let application_id: i64 = persistence
        .find_application_id(ctx.tenant_id, application_number.trim())
        .map_err(translate_persistence_error)?;
    get_application(persistence, ctx, application_id)
}

/// Lists applications by session, class and status.
///
/// # Errors
///
/// Returns an error if the status filter is not an application status.
pub fn list_applications(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ListApplicationsRequest,
) -> Result<Vec<ApplicationInfo>, ApiError> {
    let status: Option<ApplicationStatus> = request
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;
    let filter = ApplicationFilter {
        session_id: request.session_id,
        class_name: request.class_name.clone(),
        status,
    };
    let applications: Vec<AdmissionApplication> = persistence
        .list_applications(ctx.tenant_id, &filter)
        .map_err(translate_persistence_error)?;
    Ok(applications.iter().map(ApplicationInfo::from).collect())
}

/// Returns an application's stage history, oldest first.
///
/// # Errors
///
/// Returns an error if the application does not exist.
pub fn stage_history(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<Vec<StageHistoryInfo>, ApiError> {
    ensure_application_exists(persistence, ctx, application_id)?;
    let entries: Vec<StageHistoryEntry> = persistence
        .stage_history(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;
    Ok(entries.iter().map(StageHistoryInfo::from).collect())
}

/// Loads the student record created when the application was enrolled.
///
/// # Errors
///
/// Returns an error if the application does not exist or is not enrolled.
pub fn get_student(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<StudentInfo, ApiError> {
    ensure_application_exists(persistence, ctx, application_id)?;
    let student: Student = persistence
        .find_student_by_application(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Student"),
            message: format!("Application {application_id} has not been enrolled"),
        })?;
    Ok(StudentInfo::from(&student))
}

/// Attaches a document reference to an application.
///
/// # Errors
///
/// Returns an error if the application does not exist or the type or
/// reference is blank.
pub fn add_document(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &AddDocumentRequest,
) -> Result<DocumentInfo, ApiError> {
    require_text(&request.document_type, "document_type")?;
    require_text(&request.file_reference, "file_reference")?;
    let application: AdmissionApplication =
        ensure_application_exists(persistence, ctx, request.application_id)?;

    let event = ctx.audit_event(
        EntityKind::Document,
        0,
        "AddDocument",
        format!(
            "Attached '{}' to {}",
            request.document_type.trim(),
            application.application_number
        ),
        StateSnapshot::empty(),
        StateSnapshot::new(format!(
            "document_type={},file_reference={}",
            request.document_type.trim(),
            request.file_reference.trim()
        )),
    );
    let document: ApplicationDocument = persistence
        .add_document(
            ctx.tenant_id,
            request.application_id,
            request.document_type.trim(),
            request.file_reference.trim(),
            ctx.now(),
            event,
        )
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id = request.application_id,
        document_id = document.document_id,
        document_type = %document.document_type,
        "Added document"
    );

    Ok(DocumentInfo::from(&document))
}

/// Marks a document verified.
///
/// # Errors
///
/// Returns an error if the document does not exist.
pub fn verify_document(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    document_id: i64,
) -> Result<(), ApiError> {
    let event = ctx.audit_event(
        EntityKind::Document,
        document_id,
        "VerifyDocument",
        format!("Verified document {document_id}"),
        StateSnapshot::new(String::from("verified=false")),
        StateSnapshot::new(String::from("verified=true")),
    );
    let application_id: i64 = persistence
        .verify_document(ctx.tenant_id, document_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id, document_id, "Verified document"
    );
    Ok(())
}

/// Lists an application's documents.
///
/// # Errors
///
/// Returns an error if the application does not exist.
pub fn list_documents(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<Vec<DocumentInfo>, ApiError> {
    ensure_application_exists(persistence, ctx, application_id)?;
    let documents: Vec<ApplicationDocument> = persistence
        .list_documents(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;
    Ok(documents.iter().map(DocumentInfo::from).collect())
}
