// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable number allocation.
//!
//! Each call increments a counter row in one statement and returns the
//! new value, so concurrent callers never receive the same number.

use admissions_domain::{Branch, SequenceScope};
use admissions_persistence::Persistence;
use tracing::debug;

use crate::context::RequestContext;
use crate::error::{ApiError, translate_persistence_error};

/// Allocates the next application number for today: `APP-YYYYMMDD-NNNN`.
///
/// # Errors
///
/// Returns an error if the counter cannot be incremented.
pub fn generate_application_number(
    persistence: &mut Persistence,
    ctx: &RequestContext,
) -> Result<String, ApiError> {
    let scope = SequenceScope::Application { date: ctx.today() };
    let number: String = persistence
        .allocate_number(ctx.tenant_id, &scope)
        .map_err(translate_persistence_error)?;
    debug!(tenant_id = ctx.tenant_id.value(), number = %number, "Allocated application number");
    Ok(number)
}

/// Allocates the next admission number for a branch in the current year:
/// `ADM-{CODE}-YYYY-NNNN`.
///
/// # Errors
///
/// Returns an error if the branch does not exist or the counter cannot be
/// incremented.
pub fn generate_admission_number(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    branch_id: i64,
) -> Result<String, ApiError> {
    let branch: Branch = persistence
        .get_branch(ctx.tenant_id, branch_id)
        .map_err(translate_persistence_error)?;
    let scope = SequenceScope::Admission {
        branch_id,
        branch_code: branch.code,
        year: ctx.today().year(),
    };
    let number: String = persistence
        .allocate_number(ctx.tenant_id, &scope)
        .map_err(translate_persistence_error)?;
    debug!(
        tenant_id = ctx.tenant_id.value(),
        branch_id,
        number = %number,
        "Allocated admission number"
    );
    Ok(number)
}
