// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_audit::{AuditEvent, EntityKind, EntityRef};
use admissions_persistence::Persistence;

use crate::context::RequestContext;
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::AuditEventInfo;

/// Returns the audit trail of one entity, oldest first.
///
/// `entity_kind` is one of `branch`, `session`, `seat`, `application`,
/// `document`, `decision` or `merit_list`.
///
/// # Errors
///
/// Returns an error if the kind is unknown or the query fails.
pub fn audit_trail(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    entity_kind: &str,
    entity_id: i64,
) -> Result<Vec<AuditEventInfo>, ApiError> {
    let kind: EntityKind = entity_kind
        .trim()
        .parse()
        .map_err(|message| ApiError::InvalidInput {
            field: String::from("entity_kind"),
            message,
        })?;
    let events: Vec<AuditEvent> = persistence
        .audit_events_for_entity(ctx.tenant_id, EntityRef::new(kind, entity_id))
        .map_err(translate_persistence_error)?;
    Ok(events.iter().map(AuditEventInfo::from).collect())
}

/// Loads a single audit event.
///
/// # Errors
///
/// Returns an error if the event does not exist.
pub fn get_audit_event(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    event_id: i64,
) -> Result<AuditEventInfo, ApiError> {
    let event: AuditEvent = persistence
        .get_audit_event(ctx.tenant_id, event_id)
        .map_err(translate_persistence_error)?;
    Ok(AuditEventInfo::from(&event))
}
