// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions, one module per component.
//!
//! Handlers validate input, load what the core needs, apply the command
//! and hand the result to the store. Every mutation writes exactly one
//! audit event in the same transaction as the change.

pub mod applications;
pub mod audit;
pub mod branches;
pub mod decisions;
pub mod merit;
pub mod seats;
pub mod sequences;
pub mod sessions;

use admissions::{ApplicationState, Command, TransitionResult, apply};
use admissions_audit::StateSnapshot;
use admissions_domain::{DomainError, ParentDetails, ParentRelation};
use admissions_persistence::{PersistedTransition, Persistence};
use num_traits::ToPrimitive;
use serde::Serialize;
use tracing::info;

use crate::context::RequestContext;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{DecisionInfo, ParentInput, StudentInfo, TransitionResponse};

/// Loads an application, applies `command` and persists the transition.
fn run_command(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    application_id: i64,
    command: Command,
) -> Result<PersistedTransition, ApiError> {
    let state: ApplicationState = persistence
        .get_application_state(ctx.tenant_id, application_id)
        .map_err(translate_persistence_error)?;

    let result: TransitionResult = apply(
        &state,
        command,
        ctx.actor.clone(),
        ctx.cause.clone(),
        ctx.clock(),
    )
    .map_err(translate_core_error)?;

    let persisted: PersistedTransition = persistence
        .persist_transition(&result)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        application_id,
        action = %result.audit_event.action.name,
        status = %persisted.application.status,
        event_id = persisted.event_id,
        "Applied application command"
    );

    Ok(persisted)
}

/// Shapes a persisted transition for the caller.
fn transition_response(
    persisted: &PersistedTransition,
    message: String,
) -> TransitionResponse {
    TransitionResponse {
        application: (&persisted.application).into(),
        decision: persisted.decision.as_ref().map(DecisionInfo::from),
        student: persisted.student.as_ref().map(StudentInfo::from),
        stage_sequence: persisted.stage_entry.sequence,
        event_id: persisted.event_id,
        message,
    }
}

/// Parses and validates parent input.
fn parse_parents(parents: &[ParentInput]) -> Result<Vec<ParentDetails>, ApiError> {
    parents
        .iter()
        .map(|input| {
            let relation: ParentRelation =
                input.relation.parse().map_err(translate_domain_error)?;
            let parent = ParentDetails {
                relation,
                name: input.name.trim().to_string(),
                phone: trimmed(input.phone.as_deref()),
                email: trimmed(input.email.as_deref()),
                occupation: trimmed(input.occupation.as_deref()),
            };
            admissions_domain::validate_parent(&parent).map_err(translate_domain_error)?;
            Ok(parent)
        })
        .collect()
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Narrows a caller-supplied count, rejecting negatives.
fn to_count(value: i64, field: &'static str) -> Result<u32, ApiError> {
    value.to_u32().ok_or_else(|| {
        translate_domain_error(DomainError::InvalidField {
            field,
            reason: format!("{value} must be between 0 and {}", u32::MAX),
        })
    })
}

/// Rejects a blank required text field.
fn require_text(value: &str, field: &'static str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(translate_domain_error(DomainError::MissingField { field }));
    }
    Ok(())
}

/// Serializes `value` into an audit snapshot.
fn snapshot_of<T: Serialize>(value: &T) -> Result<StateSnapshot, ApiError> {
    StateSnapshot::of(value).map_err(|e| ApiError::Internal {
        message: format!("Failed to snapshot state: {e}"),
    })
}
