// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session lifecycle: creation, edits, status changes, deadline moves and
//! deletion, plus the seat summary read.

use admissions::{
    SessionCommand, SessionTransition, SessionUpdate, apply_session, session_snapshot,
};
use admissions_audit::{EntityKind, StateSnapshot};
use admissions_domain::{AdmissionSeat, AdmissionSession, SessionStatus};
use admissions_persistence::Persistence;
use tracing::info;

use crate::context::RequestContext;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    ChangeSessionStatusRequest, CreateSessionRequest, ExtendDeadlineRequest, ListSessionsRequest,
    SeatInfo, SessionInfo, SessionResponse, SessionSeatSummary, UpdateSessionRequest,
};

/// Creates an admission session in `upcoming` status.
///
/// # Errors
///
/// Returns an error if:
/// - The name or academic year is blank, the fee is negative, or the
///   end date is before the start date
/// - The branch does not exist
/// - A session with the same name exists for the academic year
pub fn create_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateSessionRequest,
) -> Result<SessionResponse, ApiError> {
    let session: AdmissionSession = AdmissionSession::new(
        ctx.tenant_id,
        request.branch_id,
        &request.academic_year,
        &request.name,
        request.start_date,
        request.end_date,
        request.application_fee,
        request.required_documents.clone(),
        request.settings.clone(),
    )
    .map_err(translate_domain_error)?;

    if let Some(branch_id) = request.branch_id {
        persistence
            .get_branch(ctx.tenant_id, branch_id)
            .map_err(translate_persistence_error)?;
    }

    let event = ctx.audit_event(
        EntityKind::Session,
        0,
        "CreateSession",
        format!(
            "Created session '{}' for {}",
            session.name, session.academic_year
        ),
        StateSnapshot::empty(),
        session_snapshot(&session),
    );
    let stored: AdmissionSession = persistence
        .create_session(&session, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        session_id = stored.id(),
        name = %stored.name,
        academic_year = %stored.academic_year,
        "Created admission session"
    );

    Ok(SessionResponse {
        message: format!("Created session '{}'", stored.name),
        session: SessionInfo::from(&stored),
        event_id: None,
    })
}

/// Edits a session that is not closed. Absent fields are left unchanged.
///
/// # Errors
///
/// Returns an error if the session is closed or missing, the edited
/// fields are invalid, or another writer changed the session first.
pub fn update_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateSessionRequest,
) -> Result<SessionResponse, ApiError> {
    if let Some(branch_id) = request.branch_id {
        persistence
            .get_branch(ctx.tenant_id, branch_id)
            .map_err(translate_persistence_error)?;
    }

    let update = SessionUpdate {
        branch_id: request.branch_id,
        academic_year: request.academic_year.clone(),
        name: request.name.clone(),
        start_date: request.start_date,
        end_date: request.end_date,
        application_fee: request.application_fee,
        required_documents: request.required_documents.clone(),
        settings: request.settings.clone(),
    };
    run_session_command(
        persistence,
        ctx,
        request.session_id,
        SessionCommand::Update(update),
    )
}

/// Moves a session along its lifecycle.
///
/// Legal changes are `upcoming -> open | closed`, `open -> closed` and
/// `closed -> open`.
///
/// # Errors
///
/// Returns an error if the status is unknown or the change is not legal;
/// the conflict lists the statuses reachable from the current one.
pub fn change_session_status(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ChangeSessionStatusRequest,
) -> Result<SessionResponse, ApiError> {
    let target: SessionStatus = request.status.parse().map_err(translate_domain_error)?;
    run_session_command(
        persistence,
        ctx,
        request.session_id,
        SessionCommand::ChangeStatus { target },
    )
}

/// Moves a session's end date.
///
/// # Errors
///
/// Returns an error if the session is closed or the new end date is before
/// the start date.
pub fn extend_deadline(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ExtendDeadlineRequest,
) -> Result<SessionResponse, ApiError> {
    run_session_command(
        persistence,
        ctx,
        request.session_id,
        SessionCommand::ExtendDeadline {
            new_end_date: request.new_end_date,
        },
    )
}

fn run_session_command(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    command: SessionCommand,
) -> Result<SessionResponse, ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;

    let transition: SessionTransition = apply_session(
        &session,
        command,
        ctx.actor.clone(),
        ctx.cause.clone(),
        ctx.clock(),
    )
    .map_err(translate_core_error)?;

    let (stored, event_id): (AdmissionSession, i64) = persistence
        .persist_session_transition(&transition)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        session_id,
        action = %transition.audit_event.action.name,
        status = %stored.status,
        event_id,
        "Applied session command"
    );

    Ok(SessionResponse {
        message: transition
            .audit_event
            .action
            .details
            .clone()
            .unwrap_or_default(),
        session: SessionInfo::from(&stored),
        event_id: Some(event_id),
    })
}

/// Deletes a session that is not open and has no applications. Its seat
/// configurations go with it.
///
/// # Errors
///
/// Returns an error if the session is open, has applications, owns a
/// finalized merit list, or does not exist.
pub fn delete_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<(), ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    let event = ctx.audit_event(
        EntityKind::Session,
        session_id,
        "DeleteSession",
        format!("Deleted session '{}'", session.name),
        session_snapshot(&session),
        StateSnapshot::empty(),
    );

    persistence
        .delete_session(ctx.tenant_id, session_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        session_id, "Deleted admission session"
    );
    Ok(())
}

/// Loads a session.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn get_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<SessionInfo, ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    Ok(SessionInfo::from(&session))
}

/// Lists sessions, optionally filtered by status and academic year.
///
/// # Errors
///
/// Returns an error if the status filter is not a session status.
pub fn list_sessions(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &ListSessionsRequest,
) -> Result<Vec<SessionInfo>, ApiError> {
    let status: Option<SessionStatus> = request
        .status
        .as_deref()
        .map(str::parse)
        .transpose()
        .map_err(translate_domain_error)?;
    let sessions: Vec<AdmissionSession> = persistence
        .list_sessions(ctx.tenant_id, status, request.academic_year.as_deref())
        .map_err(translate_persistence_error)?;
    Ok(sessions.iter().map(SessionInfo::from).collect())
}

/// Summarizes seat capacity per class for a session.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn session_seat_summary(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<SessionSeatSummary, ApiError> {
    let session: AdmissionSession = persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    let seats: Vec<AdmissionSeat> = persistence
        .list_seats(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;

    let classes: Vec<SeatInfo> = seats.iter().map(SeatInfo::from).collect();
    let total_seats: u32 = classes.iter().map(|c| c.total_seats).sum();
    let filled_seats: u32 = classes.iter().map(|c| c.filled_seats).sum();
    let available_seats: u32 = classes.iter().map(|c| c.available_seats).sum();

    Ok(SessionSeatSummary {
        session_id,
        session_name: session.name,
        status: session.status.as_str().to_string(),
        classes,
        total_seats,
        filled_seats,
        available_seats,
    })
}
