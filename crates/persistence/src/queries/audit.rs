// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use admissions_audit::{Action, Actor, AuditEvent, Cause, EntityKind, EntityRef, StateSnapshot};
use admissions_domain::TenantId;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::conversions::parse_timestamp;
use crate::data_models::{ActionData, ActorData, AuditEventRow, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

fn into_event(row: AuditEventRow) -> Result<AuditEvent, PersistenceError> {
    let actor: ActorData = serde_json::from_str(&row.actor_json)?;
    let cause: CauseData = serde_json::from_str(&row.cause_json)?;
    let action: ActionData = serde_json::from_str(&row.action_json)?;
    let before: StateSnapshotData = serde_json::from_str(&row.before_snapshot_json)?;
    let after: StateSnapshotData = serde_json::from_str(&row.after_snapshot_json)?;
    let kind: EntityKind = row
        .entity_kind
        .parse()
        .map_err(PersistenceError::CorruptRow)?;

    Ok(AuditEvent {
        event_id: Some(row.event_id),
        tenant_id: TenantId::new(row.tenant_id),
        entity: EntityRef::new(kind, row.entity_id),
        actor: Actor::new(actor.id, actor.actor_type),
        cause: Cause::new(cause.id, cause.description),
        action: Action::new(action.name, action.details),
        before: StateSnapshot::new(before.data),
        after: StateSnapshot::new(after.data),
        recorded_at: parse_timestamp(&row.recorded_at)?,
    })
}

/// Returns the audit trail of one entity, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be deserialized.
pub fn audit_events_for_entity(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    entity: EntityRef,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let rows: Vec<AuditEventRow> = audit_events::table
        .filter(audit_events::tenant_id.eq(tenant_id.value()))
        .filter(audit_events::entity_kind.eq(entity.kind.as_str()))
        .filter(audit_events::entity_id.eq(entity.id))
        .order(audit_events::event_id.asc())
        .select(AuditEventRow::as_select())
        .load(conn)?;
    rows.into_iter().map(into_event).collect()
}

/// Loads a single audit event.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist for the tenant.
pub fn get_audit_event(
    conn: &mut SqliteConnection,
    tenant_id: TenantId,
    event_id: i64,
) -> Result<AuditEvent, PersistenceError> {
    let row: AuditEventRow = audit_events::table
        .filter(audit_events::tenant_id.eq(tenant_id.value()))
        .filter(audit_events::event_id.eq(event_id))
        .select(AuditEventRow::as_select())
        .first(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::not_found("audit event", event_id))?;
    into_event(row)
}
