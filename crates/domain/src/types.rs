// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// Identifies the tenant (school or school group) that owns a record.
///
/// Every core operation takes a tenant explicitly; there is no ambient
/// tenant context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(i64);

impl TenantId {
    /// Creates a new `TenantId`.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A physical branch (campus) of a tenant.
///
/// Branches are maintained outside the admissions core; the core only
/// reads them to resolve where an enrolled student belongs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// The canonical identifier. `None` until persisted.
    pub branch_id: Option<i64>,
    pub tenant_id: TenantId,
    /// Short code used in admission numbers (e.g. `NORTH`).
    pub code: String,
    pub name: String,
    pub is_primary: bool,
}

impl Branch {
    /// Creates a new, unpersisted branch.
    ///
    /// The code is normalized to uppercase.
    #[must_use]
    pub fn new(tenant_id: TenantId, code: &str, name: &str, is_primary: bool) -> Self {
        Self {
            branch_id: None,
            tenant_id,
            code: code.trim().to_uppercase(),
            name: name.trim().to_string(),
            is_primary,
        }
    }
}
