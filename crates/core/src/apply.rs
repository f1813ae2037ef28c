// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::clock::Clock;
use crate::command::{Command, SessionCommand, SessionUpdate};
use crate::error::CoreError;
use crate::state::{
    ApplicationState, DecisionWrite, EnrollmentPlan, SessionTransition, TransitionResult,
    session_snapshot,
};
use admissions_audit::{Action, Actor, AuditEvent, Cause, EntityKind, EntityRef, StateSnapshot};
use admissions_domain::{
    AdmissionApplication, AdmissionDecision, AdmissionSession, ApplicationStatus, DecisionType,
    DomainError, StageEvent, StageHistoryEntry, default_offer_valid_until,
    validate_session_fields, validate_waitlist_position,
};
use time::OffsetDateTime;

/// What a single command changed, before the shared bookkeeping.
struct Outcome {
    new_state: ApplicationState,
    decision_write: DecisionWrite,
    enrollment: Option<EnrollmentPlan>,
    event: StageEvent,
    remarks: Option<String>,
    details: String,
}

impl Outcome {
    fn new(new_state: ApplicationState, event: StageEvent, details: String) -> Self {
        Self {
            new_state,
            decision_write: DecisionWrite::Unchanged,
            enrollment: None,
            event,
            remarks: None,
            details,
        }
    }
}

/// Applies a command to an application, producing its new state, the
/// stage-history entry, any decision and enrollment work, and an audit event.
///
/// # Arguments
///
/// * `state` - The current application and decision (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `clock` - Source of the transition timestamp
///
/// # Errors
///
/// Returns an error if:
/// - The command violates a domain rule (illegal stage edge, duplicate
///   decision, expired or already-accepted offer, ...)
/// - The command needs a decision and none is recorded
pub fn apply(
    state: &ApplicationState,
    command: Command,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<TransitionResult, CoreError> {
    let now: OffsetDateTime = clock.now();
    let action_name: &'static str = command.name();

    let outcome: Outcome = match command {
        Command::Submit => submit(state, now)?,
        Command::ChangeStage { target, remarks } => {
            let mut outcome = change_stage(state, target, &actor, now)?;
            outcome.remarks = remarks;
            outcome
        }
        Command::RecordDecision { decision } => {
            if state.decision.is_some() {
                return Err(DomainError::DecisionExists {
                    application_id: state.application.id(),
                }
                .into());
            }
            let from: ApplicationStatus = state.application.status;
            let to: ApplicationStatus = decision.decision_type.implied_status();
            if matches!(from, ApplicationStatus::Draft) || from.is_terminal() {
                return Err(DomainError::InvalidStageTransition {
                    from,
                    to,
                    allowed: from.allowed_transitions().to_vec(),
                }
                .into());
            }

            let record: AdmissionDecision = AdmissionDecision::from_new(
                state.application.tenant_id,
                state.application.id(),
                decision,
                &actor.id,
                now,
            );

            let mut application: AdmissionApplication = state.application.clone();
            application.status = to;
            match record.decision_type {
                DecisionType::Approved => {
                    application.approved_at = Some(now);
                    application.approved_by = Some(actor.id.clone());
                }
                DecisionType::Waitlisted => {
                    application.waitlist_position = record.waitlist_position;
                }
                DecisionType::Rejected => {}
            }

            let decision_type: DecisionType = record.decision_type;
            let mut outcome = Outcome::new(
                ApplicationState::new(application, Some(record.clone())),
                StageEvent::DecisionRecorded {
                    decision: decision_type,
                },
                format!("Recorded '{decision_type}' decision ({from} -> {to})"),
            );
            outcome.decision_write = DecisionWrite::Insert(record);
            outcome
        }
        Command::GenerateOffer {
            letter_url,
            valid_until,
        } => {
            let mut decision: AdmissionDecision = require_decision(state)?;
            decision.ensure_type(DecisionType::Approved)?;
            if decision.offer.accepted {
                return Err(DomainError::OfferAlreadyAccepted.into());
            }
            let valid_until = match valid_until {
                Some(date) => date,
                None => default_offer_valid_until(now.date())?,
            };
            decision.offer.letter_url = Some(letter_url);
            decision.offer.valid_until = Some(valid_until);

            let mut outcome = Outcome::new(
                ApplicationState::new(state.application.clone(), Some(decision.clone())),
                StageEvent::OfferGenerated { valid_until },
                format!("Offer generated, valid until {valid_until}"),
            );
            outcome.decision_write = DecisionWrite::Update(decision);
            outcome
        }
        Command::AcceptOffer => {
            let mut decision: AdmissionDecision = require_decision(state)?;
            decision.ensure_offer_acceptable(now.date())?;
            ensure_approved(&state.application)?;
            decision.offer.accepted = true;
            decision.offer.accepted_at = Some(now);

            let mut outcome = Outcome::new(
                ApplicationState::new(state.application.clone(), Some(decision.clone())),
                StageEvent::OfferAccepted,
                String::from("Offer accepted"),
            );
            outcome.decision_write = DecisionWrite::Update(decision);
            outcome
        }
        Command::Enroll => {
            ensure_approved(&state.application)?;
            let decision: AdmissionDecision = require_decision(state)?;
            decision.ensure_type(DecisionType::Approved)?;
            if !decision.offer.accepted {
                return Err(DomainError::OfferNotAccepted.into());
            }
            enroll(state, now, String::from("Enrolled after accepted offer"))
        }
        Command::PromoteFromWaitlist => {
            let mut decision: AdmissionDecision = require_decision(state)?;
            decision.ensure_type(DecisionType::Waitlisted)?;
            state
                .application
                .status
                .validate_transition(ApplicationStatus::Approved)?;

            let previous: Option<u32> = decision.waitlist_position;
            decision.decision_type = DecisionType::Approved;
            decision.waitlist_position = None;

            let mut application: AdmissionApplication = state.application.clone();
            application.status = ApplicationStatus::Approved;
            application.approved_at = Some(now);
            application.approved_by = Some(actor.id.clone());
            application.waitlist_position = None;

            let details: String = previous.map_or_else(
                || String::from("Promoted from waitlist"),
                |p| format!("Promoted from waitlist position {p}"),
            );
            let mut outcome = Outcome::new(
                ApplicationState::new(application, Some(decision.clone())),
                StageEvent::PromotedFromWaitlist,
                details,
            );
            outcome.decision_write = DecisionWrite::Update(decision);
            outcome
        }
        Command::UpdateWaitlistPosition { position } => {
            let mut decision: AdmissionDecision = require_decision(state)?;
            decision.ensure_type(DecisionType::Waitlisted)?;
            let position: u32 = validate_waitlist_position(position)?;

            let from: Option<u32> = decision.waitlist_position;
            decision.waitlist_position = Some(position);
            let mut application: AdmissionApplication = state.application.clone();
            application.waitlist_position = Some(position);

            let mut outcome = Outcome::new(
                ApplicationState::new(application, Some(decision.clone())),
                StageEvent::WaitlistPositionChanged { from, to: position },
                format!("Waitlist position set to {position}"),
            );
            outcome.decision_write = DecisionWrite::Update(decision);
            outcome
        }
        Command::MarkFeePaid => {
            let mut application: AdmissionApplication = state.application.clone();
            application.fee_paid = true;
            Outcome::new(
                ApplicationState::new(application, state.decision.clone()),
                StageEvent::FeePaid,
                String::from("Application fee paid"),
            )
        }
    };

    Ok(finish(state, outcome, action_name, actor, cause, now))
}

fn submit(state: &ApplicationState, now: OffsetDateTime) -> Result<Outcome, CoreError> {
    let current: ApplicationStatus = state.application.status;
    let resubmission: bool = current.accepts_resubmission();
    if !resubmission {
        current.validate_transition(ApplicationStatus::Submitted)?;
    }

    let student = &state.application.student;
    if student.first_name.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "first_name",
        }
        .into());
    }
    if student.class_applied.trim().is_empty() {
        return Err(DomainError::MissingField {
            field: "class_name",
        }
        .into());
    }

    let mut application: AdmissionApplication = state.application.clone();
    application.status = ApplicationStatus::Submitted;
    application.submitted_at = Some(now);

    let details: String = if resubmission {
        format!("Resubmitted from '{current}'")
    } else {
        String::from("Submitted")
    };
    Ok(Outcome::new(
        ApplicationState::new(application, state.decision.clone()),
        StageEvent::Submitted { resubmission },
        details,
    ))
}

fn change_stage(
    state: &ApplicationState,
    target: ApplicationStatus,
    actor: &Actor,
    now: OffsetDateTime,
) -> Result<Outcome, CoreError> {
    let from: ApplicationStatus = state.application.status;
    from.validate_transition(target)?;

    if target == ApplicationStatus::Enrolled {
        return Ok(enroll(state, now, format!("Stage changed {from} -> {target}")));
    }

    let mut application: AdmissionApplication = state.application.clone();
    application.status = target;
    match target {
        ApplicationStatus::Submitted => application.submitted_at = Some(now),
        ApplicationStatus::Approved => {
            application.approved_at = Some(now);
            application.approved_by = Some(actor.id.clone());
            application.waitlist_position = None;
        }
        _ => {}
    }

    Ok(Outcome::new(
        ApplicationState::new(application, state.decision.clone()),
        StageEvent::StageChanged { from, to: target },
        format!("Stage changed {from} -> {target}"),
    ))
}

fn enroll(state: &ApplicationState, now: OffsetDateTime, details: String) -> Outcome {
    let mut application: AdmissionApplication = state.application.clone();
    application.status = ApplicationStatus::Enrolled;
    application.enrolled_at = Some(now);

    let plan = EnrollmentPlan {
        session_id: application.session_id,
        class_name: application.student.class_applied.trim().to_string(),
        preferred_branch_id: application.branch_id,
    };
    let mut outcome = Outcome::new(
        ApplicationState::new(application, state.decision.clone()),
        StageEvent::Enrolled {
            admission_number: None,
        },
        details,
    );
    outcome.enrollment = Some(plan);
    outcome
}

fn require_decision(state: &ApplicationState) -> Result<AdmissionDecision, CoreError> {
    state
        .decision
        .clone()
        .ok_or(CoreError::DecisionNotFound {
            application_id: state.application.id(),
        })
}

const fn ensure_approved(application: &AdmissionApplication) -> Result<(), DomainError> {
    if matches!(application.status, ApplicationStatus::Approved) {
        Ok(())
    } else {
        Err(DomainError::ApplicationNotApproved {
            status: application.status,
        })
    }
}

fn finish(
    state: &ApplicationState,
    outcome: Outcome,
    action_name: &str,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> TransitionResult {
    let mut new_state: ApplicationState = outcome.new_state;
    new_state.application.updated_at = now;

    let before: StateSnapshot = state.to_snapshot();
    let after: StateSnapshot = new_state.to_snapshot();

    let stage_entry: StageHistoryEntry = StageHistoryEntry::new(
        outcome.event,
        new_state.application.status,
        now,
        actor.id.clone(),
        outcome.remarks,
    );

    let action: Action = Action::new(
        action_name.to_string(),
        Some(format!(
            "{} for application {}",
            outcome.details, new_state.application.application_number
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        new_state.application.tenant_id,
        EntityRef::new(EntityKind::Application, new_state.application.id()),
        actor,
        cause,
        action,
        before,
        after,
        now,
    );

    TransitionResult {
        new_state,
        decision_write: outcome.decision_write,
        enrollment: outcome.enrollment,
        stage_entry,
        audit_event,
    }
}

/// Applies a command to an admission session.
///
/// Name uniqueness within the academic year is enforced by the store.
///
/// # Errors
///
/// Returns an error if:
/// - The status change is not on the session lifecycle
/// - The session is closed and the command edits it
/// - The edited fields are invalid
pub fn apply_session(
    session: &AdmissionSession,
    command: SessionCommand,
    actor: Actor,
    cause: Cause,
    clock: &dyn Clock,
) -> Result<SessionTransition, CoreError> {
    let action_name: &'static str = command.name();
    let mut new_session: AdmissionSession = session.clone();

    let details: String = match command {
        SessionCommand::ChangeStatus { target } => {
            session.status.validate_transition(target)?;
            new_session.status = target;
            format!("Status changed {} -> {target}", session.status)
        }
        SessionCommand::ExtendDeadline { new_end_date } => {
            new_session.extend_deadline(new_end_date)?;
            format!("Deadline moved {} -> {new_end_date}", session.end_date)
        }
        SessionCommand::Update(update) => {
            session.ensure_not_closed()?;
            apply_session_update(&mut new_session, update)?;
            String::from("Session details updated")
        }
    };

    let action: Action = Action::new(
        action_name.to_string(),
        Some(format!("{details} for session '{}'", session.name)),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        session.tenant_id,
        EntityRef::new(EntityKind::Session, session.id()),
        actor,
        cause,
        action,
        session_snapshot(session),
        session_snapshot(&new_session),
        clock.now(),
    );

    Ok(SessionTransition {
        new_session,
        audit_event,
    })
}

fn apply_session_update(
    session: &mut AdmissionSession,
    update: SessionUpdate,
) -> Result<(), DomainError> {
    if let Some(branch_id) = update.branch_id {
        session.branch_id = Some(branch_id);
    }
    if let Some(academic_year) = update.academic_year {
        session.academic_year = academic_year.trim().to_string();
    }
    if let Some(name) = update.name {
        session.name = name.trim().to_string();
    }
    if let Some(start_date) = update.start_date {
        session.start_date = start_date;
    }
    if let Some(end_date) = update.end_date {
        session.end_date = end_date;
    }
    if let Some(fee) = update.application_fee {
        if fee < 0 {
            return Err(DomainError::InvalidField {
                field: "application_fee",
                reason: String::from("must not be negative"),
            });
        }
        session.application_fee = fee;
    }
    if let Some(documents) = update.required_documents {
        session.required_documents = documents;
    }
    if let Some(settings) = update.settings {
        session.settings = settings;
    }

    validate_session_fields(
        &session.name,
        &session.academic_year,
        session.start_date,
        session.end_date,
    )
}
