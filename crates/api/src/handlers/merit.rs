// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merit-list generation and maintenance.
//!
//! There is one working list per session, class and test. Generating again
//! replaces it until it is finalized.

use admissions_audit::{EntityKind, StateSnapshot};
use admissions_domain::{
    DomainError, MeritList, MeritListKey, PreviousMarksScoring, RankedPool, ScoringStrategy,
    rank_candidates, validate_class_name,
};
use admissions_persistence::Persistence;
use tracing::info;

use super::snapshot_of;
use crate::context::RequestContext;
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{GenerateMeritListRequest, MeritListInfo, UpdateCutoffRequest};

/// Ranks the session's eligible applicants for a class by previous marks.
///
/// # Errors
///
/// See [`generate_merit_list_with`].
pub fn generate_merit_list(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &GenerateMeritListRequest,
) -> Result<MeritListInfo, ApiError> {
    generate_merit_list_with(persistence, ctx, request, &PreviousMarksScoring)
}

/// Ranks the session's eligible applicants for a class with `scorer`.
///
/// Applications that are submitted, under review, approved or waitlisted
/// are eligible. Entries scoring below the cutoff are dropped
/// and counted.
///
/// # Errors
///
/// Returns an error if:
/// - The class name is blank or the cutoff is not a finite number
/// - The session does not exist
/// - The list for this key has been finalized
pub fn generate_merit_list_with(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &GenerateMeritListRequest,
    scorer: &dyn ScoringStrategy,
) -> Result<MeritListInfo, ApiError> {
    validate_class_name(&request.class_name).map_err(translate_domain_error)?;
    persistence
        .get_session(ctx.tenant_id, request.session_id)
        .map_err(translate_persistence_error)?;

    let key = MeritListKey {
        session_id: request.session_id,
        class_name: request.class_name.trim().to_string(),
        test_id: request.test_id,
    };
    let before: StateSnapshot = match persistence
        .find_merit_list(ctx.tenant_id, &key)
        .map_err(translate_persistence_error)?
    {
        Some(existing) => snapshot_of(&existing)?,
        None => StateSnapshot::empty(),
    };

    let event = ctx.audit_event(
        EntityKind::MeritList,
        0,
        "GenerateMeritList",
        format!(
            "Generated merit list for '{}' in session {}",
            key.class_name, key.session_id
        ),
        before,
        StateSnapshot::empty(),
    );

    let tenant_id = ctx.tenant_id;
    let generated_at = ctx.now();
    let generated_by: String = ctx.actor.id.clone();
    let cutoff_score: Option<f64> = request.cutoff_score;
    let list_key: MeritListKey = key.clone();
    let stored: MeritList = persistence
        .regenerate_merit_list(
            ctx.tenant_id,
            &key,
            move |candidates| {
                let pool: RankedPool =
                    rank_candidates(candidates, scorer, list_key.test_id, cutoff_score)?;
                Ok(MeritList {
                    merit_list_id: None,
                    tenant_id,
                    key: list_key,
                    generated_at,
                    generated_by,
                    cutoff_score,
                    is_final: false,
                    entries: pool.entries,
                    excluded_below_cutoff: pool.excluded_below_cutoff,
                })
            },
            event,
        )
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        merit_list_id = stored.merit_list_id,
        session_id = key.session_id,
        class_name = %key.class_name,
        entries = stored.total_count(),
        excluded = stored.excluded_below_cutoff,
        "Generated merit list"
    );

    Ok(MeritListInfo::from(&stored))
}

/// Freezes a merit list against further change.
///
/// # Errors
///
/// Returns an error if the list does not exist or is already final.
pub fn finalize_merit_list(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    merit_list_id: i64,
) -> Result<MeritListInfo, ApiError> {
    let current: MeritList = persistence
        .get_merit_list(ctx.tenant_id, merit_list_id)
        .map_err(translate_persistence_error)?;
    current.ensure_mutable().map_err(translate_domain_error)?;

    let mut finalized: MeritList = current.clone();
    finalized.is_final = true;
    let event = ctx.audit_event(
        EntityKind::MeritList,
        merit_list_id,
        "FinalizeMeritList",
        format!("Finalized merit list for '{}'", current.key.class_name),
        snapshot_of(&current)?,
        snapshot_of(&finalized)?,
    );
    let stored: MeritList = persistence
        .finalize_merit_list(ctx.tenant_id, merit_list_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        merit_list_id, "Finalized merit list"
    );
    Ok(MeritListInfo::from(&stored))
}

/// Changes the cutoff on a working list.
///
/// Stored entries are left alone; `above_cutoff` is recomputed against the
/// new value.
///
/// # Errors
///
/// Returns an error if the list does not exist, is final, or the cutoff is
/// not a finite number.
pub fn update_merit_list_cutoff(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &UpdateCutoffRequest,
) -> Result<MeritListInfo, ApiError> {
    if request.cutoff_score.is_some_and(|c| !c.is_finite()) {
        return Err(translate_domain_error(DomainError::InvalidField {
            field: "cutoff_score",
            reason: String::from("must be a finite number"),
        }));
    }
    let current: MeritList = persistence
        .get_merit_list(ctx.tenant_id, request.merit_list_id)
        .map_err(translate_persistence_error)?;
    current.ensure_mutable().map_err(translate_domain_error)?;

    let mut updated: MeritList = current.clone();
    updated.cutoff_score = request.cutoff_score;
    let event = ctx.audit_event(
        EntityKind::MeritList,
        request.merit_list_id,
        "UpdateMeritListCutoff",
        format!(
            "Changed cutoff for '{}' to {}",
            current.key.class_name,
            request
                .cutoff_score
                .map_or_else(|| String::from("none"), |c| c.to_string())
        ),
        snapshot_of(&current)?,
        snapshot_of(&updated)?,
    );
    let stored: MeritList = persistence
        .update_merit_list_cutoff(
            ctx.tenant_id,
            request.merit_list_id,
            request.cutoff_score,
            event,
        )
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        merit_list_id = request.merit_list_id,
        above_cutoff = stored.above_cutoff(),
        "Updated merit list cutoff"
    );
    Ok(MeritListInfo::from(&stored))
}

/// Deletes a working merit list.
///
/// # Errors
///
/// Returns an error if the list does not exist or is final.
pub fn delete_merit_list(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    merit_list_id: i64,
) -> Result<(), ApiError> {
    let current: MeritList = persistence
        .get_merit_list(ctx.tenant_id, merit_list_id)
        .map_err(translate_persistence_error)?;
    current.ensure_mutable().map_err(translate_domain_error)?;

    let event = ctx.audit_event(
        EntityKind::MeritList,
        merit_list_id,
        "DeleteMeritList",
        format!("Deleted merit list for '{}'", current.key.class_name),
        snapshot_of(&current)?,
        StateSnapshot::empty(),
    );
    persistence
        .delete_merit_list(ctx.tenant_id, merit_list_id, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        merit_list_id, "Deleted merit list"
    );
    Ok(())
}

/// Loads a merit list with its entries.
///
/// # Errors
///
/// Returns an error if the list does not exist.
pub fn get_merit_list(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    merit_list_id: i64,
) -> Result<MeritListInfo, ApiError> {
    let list: MeritList = persistence
        .get_merit_list(ctx.tenant_id, merit_list_id)
        .map_err(translate_persistence_error)?;
    Ok(MeritListInfo::from(&list))
}

/// Lists the merit lists of a session.
///
/// # Errors
///
/// Returns an error if the session does not exist.
pub fn list_merit_lists(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    session_id: i64,
) -> Result<Vec<MeritListInfo>, ApiError> {
    persistence
        .get_session(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    let lists: Vec<MeritList> = persistence
        .list_merit_lists(ctx.tenant_id, session_id)
        .map_err(translate_persistence_error)?;
    Ok(lists.iter().map(MeritListInfo::from).collect())
}
