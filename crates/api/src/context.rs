// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::sync::Arc;

use admissions::{Clock, SystemClock};
use admissions_audit::{Action, Actor, AuditEvent, Cause, EntityKind, EntityRef, StateSnapshot};
use admissions_domain::TenantId;
use time::{Date, OffsetDateTime};

/// Who is acting, for which tenant, and what time it is.
///
/// Every operation takes the tenant explicitly through this context; nothing
/// is read from ambient state.
#[derive(Clone)]
pub struct RequestContext {
    pub tenant_id: TenantId,
    pub actor: Actor,
    pub cause: Cause,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("tenant_id", &self.tenant_id)
            .field("actor", &self.actor)
            .field("cause", &self.cause)
            .finish_non_exhaustive()
    }
}

impl RequestContext {
    /// Creates a context with an explicit clock.
    #[must_use]
    pub const fn new(
        tenant_id: TenantId,
        actor: Actor,
        cause: Cause,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tenant_id,
            actor,
            cause,
            clock,
        }
    }

    /// Creates a context on the wall clock.
    #[must_use]
    pub fn with_system_clock(tenant_id: TenantId, actor: Actor, cause: Cause) -> Self {
        Self::new(tenant_id, actor, cause, Arc::new(SystemClock))
    }

    /// The clock transitions are stamped with.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    #[must_use]
    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }

    #[must_use]
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Builds the audit event for a mutation performed outside the core.
    ///
    /// Create operations pass 0 as `entity_id`; the store fills in the new
    /// identifier.
    #[must_use]
    pub fn audit_event(
        &self,
        kind: EntityKind,
        entity_id: i64,
        action: &str,
        details: String,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> AuditEvent {
        AuditEvent::new(
            self.tenant_id,
            EntityRef::new(kind, entity_id),
            self.actor.clone(),
            self.cause.clone(),
            Action::new(action.to_string(), Some(details)),
            before,
            after,
            self.now(),
        )
    }
}
