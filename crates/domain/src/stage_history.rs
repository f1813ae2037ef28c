// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Append-only stage history of an application.

use crate::application_status::ApplicationStatus;
use crate::decision::DecisionType;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// What happened to an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StageEvent {
    Created,
    Submitted {
        resubmission: bool,
    },
    StageChanged {
        from: ApplicationStatus,
        to: ApplicationStatus,
    },
    DecisionRecorded {
        decision: DecisionType,
    },
    OfferGenerated {
        valid_until: Date,
    },
    OfferAccepted,
    PromotedFromWaitlist,
    WaitlistPositionChanged {
        from: Option<u32>,
        to: u32,
    },
    /// The admission number is assigned by the store inside the
    /// enrollment transaction.
    Enrolled {
        admission_number: Option<String>,
    },
    FeePaid,
}

impl StageEvent {
    /// Returns the event tag stored alongside the payload.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Submitted { .. } => "submitted",
            Self::StageChanged { .. } => "stage_changed",
            Self::DecisionRecorded { .. } => "decision_recorded",
            Self::OfferGenerated { .. } => "offer_generated",
            Self::OfferAccepted => "offer_accepted",
            Self::PromotedFromWaitlist => "promoted_from_waitlist",
            Self::WaitlistPositionChanged { .. } => "waitlist_position_changed",
            Self::Enrolled { .. } => "enrolled",
            Self::FeePaid => "fee_paid",
        }
    }
}

/// One entry in an application's stage history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageHistoryEntry {
    /// Position in the log, starting at 1. Zero until persisted.
    pub sequence: i64,
    pub event: StageEvent,
    /// The application status once the event was applied.
    pub status_after: ApplicationStatus,
    pub recorded_at: OffsetDateTime,
    pub actor_id: String,
    pub remarks: Option<String>,
}

impl StageHistoryEntry {
    /// Creates an unpersisted entry.
    #[must_use]
    pub const fn new(
        event: StageEvent,
        status_after: ApplicationStatus,
        recorded_at: OffsetDateTime,
        actor_id: String,
        remarks: Option<String>,
    ) -> Self {
        Self {
            sequence: 0,
            event,
            status_after,
            recorded_at,
            actor_id,
            remarks,
        }
    }
}
