// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-class seat capacity.
//!
//! Invariant: `filled_seats <= total_seats` for every seat at all times.

use crate::error::DomainError;
use crate::types::TenantId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Seat capacity for one class within one admission session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionSeat {
    /// The canonical identifier. `None` until persisted.
    pub seat_id: Option<i64>,
    pub tenant_id: TenantId,
    pub session_id: i64,
    pub class_name: String,
    pub total_seats: u32,
    pub filled_seats: u32,
    pub waitlist_limit: u32,
    /// Reserved seats per category (e.g. `staff_ward → 2`).
    pub reserved_seats: BTreeMap<String, u32>,
}

impl AdmissionSeat {
    /// Creates a new, unpersisted seat configuration with nothing filled.
    ///
    /// # Errors
    ///
    /// Returns an error if the class name is blank or the reserved quotas
    /// exceed the total.
    pub fn new(
        tenant_id: TenantId,
        session_id: i64,
        class_name: &str,
        total_seats: u32,
        waitlist_limit: u32,
        reserved_seats: BTreeMap<String, u32>,
    ) -> Result<Self, DomainError> {
        crate::validation::validate_class_name(class_name)?;
        validate_reserved_quotas(&reserved_seats, total_seats)?;

        Ok(Self {
            seat_id: None,
            tenant_id,
            session_id,
            class_name: class_name.trim().to_string(),
            total_seats,
            filled_seats: 0,
            waitlist_limit,
            reserved_seats,
        })
    }

    /// Returns the number of seats still available.
    #[must_use]
    pub const fn available_seats(&self) -> u32 {
        self.total_seats.saturating_sub(self.filled_seats)
    }

    /// Ensures the configuration can be deleted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SeatInUse` if any seat is filled.
    pub const fn ensure_deletable(&self) -> Result<(), DomainError> {
        if self.filled_seats > 0 {
            return Err(DomainError::SeatInUse {
                filled: self.filled_seats,
            });
        }
        Ok(())
    }
}

/// Validates a new total against the seats already filled.
///
/// # Errors
///
/// Returns `DomainError::FilledExceedsTotal` if `total < filled`.
pub const fn validate_seat_total(total: u32, filled: u32) -> Result<(), DomainError> {
    if total < filled {
        return Err(DomainError::FilledExceedsTotal { total, filled });
    }
    Ok(())
}

/// Validates that reserved quotas fit within the total.
///
/// # Errors
///
/// Returns an error if a category name is blank or the quotas add up to
/// more than `total`.
pub fn validate_reserved_quotas(
    reserved: &BTreeMap<String, u32>,
    total: u32,
) -> Result<(), DomainError> {
    if reserved.keys().any(|category| category.trim().is_empty()) {
        return Err(DomainError::InvalidField {
            field: "reserved_seats",
            reason: String::from("category names cannot be empty"),
        });
    }

    let sum: u64 = reserved.values().map(|v| u64::from(*v)).sum();
    if sum > u64::from(total) {
        return Err(DomainError::ReservedQuotaExceedsTotal {
            reserved: u32::try_from(sum).unwrap_or(u32::MAX),
            total,
        });
    }
    Ok(())
}

/// Computes the filled count after applying `delta`.
///
/// An increase past `total` is rejected. A decrease below zero clamps to
/// zero instead of failing; the asymmetry is intentional and mirrored by
/// the store's conditional update.
///
/// # Errors
///
/// Returns `DomainError::SeatCapacityExceeded` if the result would exceed
/// `total`.
pub fn apply_fill_delta(filled: u32, total: u32, delta: i32) -> Result<u32, DomainError> {
    let next: i64 = i64::from(filled) + i64::from(delta);
    if next > i64::from(total) {
        return Err(DomainError::SeatCapacityExceeded {
            total,
            filled,
            requested: delta,
        });
    }
    Ok(u32::try_from(next.max(0)).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_up_to_capacity_then_reject() {
        let first = apply_fill_delta(38, 40, 1);
        assert_eq!(first, Ok(39));
        let second = apply_fill_delta(39, 40, 1);
        assert_eq!(second, Ok(40));
        let third = apply_fill_delta(40, 40, 1);
        assert_eq!(
            third,
            Err(DomainError::SeatCapacityExceeded {
                total: 40,
                filled: 40,
                requested: 1,
            })
        );
    }

    #[test]
    fn test_negative_delta_clamps_to_zero() {
        assert_eq!(apply_fill_delta(2, 40, -5), Ok(0));
        assert_eq!(apply_fill_delta(5, 40, -2), Ok(3));
    }

    #[test]
    fn test_total_below_filled_is_rejected() {
        assert!(validate_seat_total(30, 30).is_ok());
        assert_eq!(
            validate_seat_total(29, 30),
            Err(DomainError::FilledExceedsTotal {
                total: 29,
                filled: 30,
            })
        );
    }

    #[test]
    fn test_reserved_quotas_must_fit() {
        let mut reserved = BTreeMap::new();
        reserved.insert(String::from("staff_ward"), 3);
        reserved.insert(String::from("sibling"), 2);

        assert!(validate_reserved_quotas(&reserved, 5).is_ok());
        assert!(matches!(
            validate_reserved_quotas(&reserved, 4),
            Err(DomainError::ReservedQuotaExceedsTotal {
                reserved: 5,
                total: 4
            })
        ));
    }
}
