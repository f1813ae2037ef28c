// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Decisions, offers, waitlist movement and enrollment.

use admissions::Command;
use admissions_domain::{AdmissionDecision, NewDecision, validate_class_name};
use admissions_persistence::{PersistedTransition, Persistence};

use super::{require_text, run_command, transition_response};
use crate::context::RequestContext;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CreateDecisionRequest, DecisionInfo, GenerateOfferRequest, TransitionResponse,
    UpdateWaitlistPositionRequest,
};

/// Records the single decision for an application and moves it to the
/// status the decision implies.
///
/// Approval stamps the approver and time; waitlisting copies the position
/// onto the application.
///
/// # Errors
///
/// Returns an error if:
/// - The decision type is unknown or the date is missing
/// - A waitlisted decision has no positive position
/// - A rejected decision has no reason
/// - The application does not exist or already has a decision
/// - The application is in `draft` or a terminal status
pub fn create_decision(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateDecisionRequest,
) -> Result<TransitionResponse, ApiError> {
    let decision: NewDecision = NewDecision::parse(
        &request.decision_type,
        request.decision_date,
        request.section_assigned.clone(),
        request.waitlist_position,
        request.rejection_reason.clone(),
    )
    .map_err(translate_domain_error)?;
    let decision_type = decision.decision_type;

    let persisted: PersistedTransition = run_command(
        persistence,
        ctx,
        request.application_id,
        Command::RecordDecision { decision },
    )?;
    Ok(transition_response(
        &persisted,
        format!(
            "Recorded '{decision_type}' for {}",
            persisted.application.application_number
        ),
    ))
}

/// Attaches an offer letter to an approved decision.
///
/// # Errors
///
/// Returns an error if the letter reference is blank, there is no
/// decision, the decision is not an approval, or the offer was already
/// accepted.
pub fn generate_offer_letter(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &GenerateOfferRequest,
) -> Result<TransitionResponse, ApiError> {
    require_text(&request.letter_url, "letter_url")?;
    let persisted: PersistedTransition = run_command(
        persistence,
        ctx,
        request.application_id,
        Command::GenerateOffer {
            letter_url: request.letter_url.trim().to_string(),
            valid_until: request.valid_until,
        },
    )?;
    Ok(transition_response(
        &persisted,
        format!(
            "Offer generated for {}",
            persisted.application.application_number
        ),
    ))
}

/// Accepts the offer on an approved decision.
///
/// # Errors
///
/// Returns an error if there is no approved decision, the offer was
/// already accepted, or its validity date has passed.
pub fn accept_offer(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<TransitionResponse, ApiError> {
    let persisted: PersistedTransition =
        run_command(persistence, ctx, application_id, Command::AcceptOffer)?;
    Ok(transition_response(
        &persisted,
        format!(
            "Offer accepted for {}",
            persisted.application.application_number
        ),
    ))
}

/// Enrolls an approved application whose offer was accepted.
///
/// Runs in one transaction: branch resolution, admission number, student
/// record, seat consumption and the status change. Any failure leaves the
/// application approved.
///
/// # Errors
///
/// Returns an error if:
/// - The application is not approved or has no decision
/// - The offer has not been accepted
/// - No branch can be resolved for the tenant
/// - The class has no seat left
pub fn enroll(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<TransitionResponse, ApiError> {
    let persisted: PersistedTransition =
        run_command(persistence, ctx, application_id, Command::Enroll)?;
    let admission_number: String = persisted
        .student
        .as_ref()
        .map(|s| s.admission_number.clone())
        .unwrap_or_default();
    Ok(transition_response(
        &persisted,
        format!(
            "Enrolled {} as {admission_number}",
            persisted.application.application_number
        ),
    ))
}

/// Turns a waitlisted decision into an approval.
///
/// # Errors
///
/// Returns an error if there is no decision or it is not waitlisted.
pub fn promote_from_waitlist(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<TransitionResponse, ApiError> {
    let persisted: PersistedTransition =
        run_command(persistence, ctx, application_id, Command::PromoteFromWaitlist)?;
    Ok(transition_response(
        &persisted,
        format!(
            "Promoted {} from the waitlist",
            persisted.application.application_number
        ),
    ))
}

/// Moves a waitlisted application to a new position.
///
/// # Errors
///
/// Returns an error if the position is not positive or the decision is
/// not waitlisted.
pub fn update_waitlist_position(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateWaitlistPositionRequest,
) -> Result<TransitionResponse, ApiError> {
    let persisted: PersistedTransition = run_command(
        persistence,
        ctx,
        request.application_id,
        Command::UpdateWaitlistPosition {
            position: request.position,
        },
    )?;
    Ok(transition_response(
        &persisted,
        format!(
            "{} is now at waitlist position {}",
            persisted.application.application_number, request.position
        ),
    ))
}

/// Loads the decision for an application.
///
/// # Errors
///
/// Returns an error if the application does not exist or has no decision.
pub fn get_decision(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
) -> Result<DecisionInfo, ApiError> {
    persistence
        .get_application(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;
    let decision: AdmissionDecision = persistence
        .find_decision(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Decision"),
            message: format!("No decision recorded for application {application_id}"),
        })?;
    Ok(DecisionInfo::from(&decision))
}

/// Lists waitlisted decisions for a class, by position.
///
/// # Errors
///
/// Returns an error if the session does not exist or the class is blank.
pub fn list_waitlist(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
    class_name: &str,
) -> Result<Vec<DecisionInfo>, ApiError> {
    validate_class_name(class_name).map_err(translate_domain_error)?;
    persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    let decisions: Vec<AdmissionDecision> = persistence
        .list_waitlist(ctx.tenant_id, session_id, class_name.trim())
        .map_err(translate_persistence_error)?;
    Ok(decisions.iter().map(DecisionInfo::from).collect())
}
