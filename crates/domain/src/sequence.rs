// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Human-readable sequence numbers.
//!
//! Application numbers are counted per tenant and calendar day; admission
//! numbers per tenant, branch and year. The counter itself lives in the
//! store and is incremented atomically; this module only names the scope
//! and formats the result.

use time::Date;

/// The counting scope of a sequence number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceScope {
    /// Application numbers, reset each day: `APP-20260301-0001`.
    Application {
        /// The creation date.
        date: Date,
    },
    /// Admission numbers, reset each year per branch: `ADM-NORTH-2026-0001`.
    Admission {
        /// The branch identifier (part of the counter key).
        branch_id: i64,
        /// The branch code (part of the formatted number).
        branch_code: String,
        /// The admission year.
        year: i32,
    },
}

impl SequenceScope {
    /// Returns the counter key, unique within a tenant.
    #[must_use]
    pub fn scope_key(&self) -> String {
        match self {
            Self::Application { date } => format!("application:{}", compact_date(*date)),
            Self::Admission {
                branch_id, year, ..
            } => format!("admission:{branch_id}:{year}"),
        }
    }

    /// Formats the counter value as a human-readable number.
    #[must_use]
    pub fn format_number(&self, value: i64) -> String {
        match self {
            Self::Application { date } => format!("APP-{}-{value:04}", compact_date(*date)),
            Self::Admission {
                branch_code, year, ..
            } => format!("ADM-{branch_code}-{year}-{value:04}"),
        }
    }
}

fn compact_date(date: Date) -> String {
    format!(
        "{:04}{:02}{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
