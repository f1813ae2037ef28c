// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use admissions_audit::{EntityKind, StateSnapshot};
use admissions_domain::Branch;
use admissions_persistence::Persistence;
use tracing::info;

use super::{require_text, snapshot_of};
use crate::context::RequestContext;
use crate::error::{ApiError, translate_persistence_error};
use crate::request_response::{BranchInfo, CreateBranchRequest};

/// Creates a branch. A new primary branch replaces the previous one.
///
/// # Errors
///
/// Returns an error if the code or name is blank, or the code is taken.
pub fn create_branch(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    request: &CreateBranchRequest,
) -> Result<BranchInfo, ApiError> {
    require_text(&request.code, "code")?;
    require_text(&request.name, "name")?;

    let branch: Branch = Branch::new(
        ctx.tenant_id,
        request.code.trim(),
        request.name.trim(),
        request.is_primary,
    );
    let event = ctx.audit_event(
        EntityKind::Branch,
        0,
        "CreateBranch",
        format!("Created branch '{}'", branch.code),
        StateSnapshot::empty(),
        snapshot_of(&branch)?,
    );

    let stored: Branch = persistence
        .create_branch(&branch, event)
        .map_err(translate_persistence_error)?;

    info!(
        tenant_id = ctx.tenant_id.value(),
        branch_id = stored.branch_id,
        code = %stored.code,
        is_primary = stored.is_primary,
        "Created branch"
    );

    Ok(BranchInfo::from(&stored))
}

/// Lists the tenant's branches.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_branches(
    persistence: &mut Persistence,
    ctx: &RequestContext,
) -> Result<Vec<BranchInfo>, ApiError> {
    let branches: Vec<Branch> = persistence
        .list_branches(ctx.tenant_id)
        .map_err(translate_persistence_error)?;
    Ok(branches.iter().map(BranchInfo::from).collect())
}
