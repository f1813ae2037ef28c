// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Merit-list ranking.
//!
//! Candidates are scored by a pluggable [`ScoringStrategy`], sorted by
//! score descending, and ranked `1..=N` by sorted position. Ties are broken
//! by earlier submission, then by application number, so regeneration over
//! the same pool always yields the same order.
//!
//! When a cutoff is given, entries scoring strictly below it are dropped
//! from the list; the number dropped is kept on the list as
//! `excluded_below_cutoff`.

use crate::application_status::ApplicationStatus;
use crate::error::DomainError;
use crate::types::TenantId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use time::OffsetDateTime;

/// An application considered for a merit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritCandidate {
    pub application_id: i64,
    pub application_number: String,
    pub student_name: String,
    pub status: ApplicationStatus,
    pub submitted_at: Option<OffsetDateTime>,
    pub previous_marks: Option<f64>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

/// Computes a candidate's merit score.
pub trait ScoringStrategy {
    /// Returns the score for `candidate`, optionally for a specific entrance test.
    fn score(&self, candidate: &MeritCandidate, test_id: Option<i64>) -> f64;
}

/// Scores candidates by their previous-school marks; missing marks score 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreviousMarksScoring;

impl ScoringStrategy for PreviousMarksScoring {
    fn score(&self, candidate: &MeritCandidate, _test_id: Option<i64>) -> f64 {
        candidate.previous_marks.unwrap_or(0.0)
    }
}

/// One ranked row of a merit list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritListEntry {
    pub rank: u32,
    pub application_id: i64,
    pub application_number: String,
    pub student_name: String,
    pub score: f64,
    pub status: ApplicationStatus,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

/// Identifies the single working merit list for a session, class and test.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeritListKey {
    pub session_id: i64,
    pub class_name: String,
    pub test_id: Option<i64>,
}

/// A ranked snapshot of eligible applicants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeritList {
    /// The canonical identifier. `None` until persisted.
    pub merit_list_id: Option<i64>,
    pub tenant_id: TenantId,
    pub key: MeritListKey,
    pub generated_at: OffsetDateTime,
    pub generated_by: String,
    pub cutoff_score: Option<f64>,
    pub is_final: bool,
    pub entries: Vec<MeritListEntry>,
    /// Candidates removed because they scored below the cutoff at generation.
    pub excluded_below_cutoff: u32,
}

impl MeritList {
    /// Returns the number of stored entries.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of stored entries at or above the current cutoff.
    ///
    /// Without a cutoff every entry counts.
    #[must_use]
    pub fn above_cutoff(&self) -> usize {
        self.cutoff_score.map_or(self.entries.len(), |cutoff| {
            self.entries.iter().filter(|e| e.score >= cutoff).count()
        })
    }

    /// Ensures the list may still be changed, regenerated or deleted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MeritListFinalized` if the list is final.
    pub fn ensure_mutable(&self) -> Result<(), DomainError> {
        if self.is_final {
            return Err(DomainError::MeritListFinalized {
                merit_list_id: self.merit_list_id.unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// The outcome of ranking a candidate pool.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPool {
    /// Ranked entries that survived the cutoff.
    pub entries: Vec<MeritListEntry>,
    /// How many ranked entries fell below the cutoff and were removed.
    pub excluded_below_cutoff: u32,
}

/// Ranks the eligible candidates.
///
/// Ineligible statuses are skipped. Non-finite scores count as 0.
///
/// # Errors
///
/// Returns an error if `cutoff` is not a finite number.
pub fn rank_candidates(
    candidates: Vec<MeritCandidate>,
    scorer: &dyn ScoringStrategy,
    test_id: Option<i64>,
    cutoff: Option<f64>,
) -> Result<RankedPool, DomainError> {
    if cutoff.is_some_and(|c| !c.is_finite()) {
        return Err(DomainError::InvalidField {
            field: "cutoff_score",
            reason: String::from("must be a finite number"),
        });
    }

    let mut scored: Vec<(f64, MeritCandidate)> = candidates
        .into_iter()
        .filter(|c| c.status.is_merit_eligible())
        .map(|c| {
            let raw = scorer.score(&c, test_id);
            let score = if raw.is_finite() { raw } else { 0.0 };
            (score, c)
        })
        .collect();

    scored.sort_by(|(score_a, a), (score_b, b)| {
        score_b
            .total_cmp(score_a)
            .then_with(|| compare_submitted(a.submitted_at, b.submitted_at))
            .then_with(|| a.application_number.cmp(&b.application_number))
    });

    let mut entries: Vec<MeritListEntry> = Vec::with_capacity(scored.len());
    for (position, (score, candidate)) in scored.into_iter().enumerate() {
        entries.push(MeritListEntry {
            rank: u32::try_from(position + 1).unwrap_or(u32::MAX),
            application_id: candidate.application_id,
            application_number: candidate.application_number,
            student_name: candidate.student_name,
            score,
            status: candidate.status,
            contact_phone: candidate.contact_phone,
            contact_email: candidate.contact_email,
        });
    }

    let before = entries.len();
    if let Some(c) = cutoff {
        entries.retain(|e| e.score >= c);
    }
    let excluded_below_cutoff = u32::try_from(before - entries.len()).unwrap_or(u32::MAX);

    Ok(RankedPool {
        entries,
        excluded_below_cutoff,
    })
}

/// Earlier submissions first; unsubmitted candidates last.
fn compare_submitted(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
