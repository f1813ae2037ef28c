// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use admissions::CoreError;
use admissions_domain::{ApplicationStatus, DomainError, SessionStatus};
use admissions_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// None of them are retried by this layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The request conflicts with the current state of an entity.
    StateConflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
        /// The state the entity is in, when one applies.
        current: Option<String>,
        /// The state the caller asked for, when one applies.
        attempted: Option<String>,
        /// The states the caller may move to instead.
        allowed: Vec<String>,
    },
    /// A precondition for the operation does not hold.
    PreconditionFailed {
        /// The precondition that failed.
        rule: String,
        /// A human-readable description of the failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Returns the rule name for conflict and precondition errors.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        match self {
            Self::StateConflict { rule, .. } | Self::PreconditionFailed { rule, .. } => {
                Some(rule.as_str())
            }
            Self::ResourceNotFound { .. } | Self::InvalidInput { .. } | Self::Internal { .. } => {
                None
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::StateConflict {
                rule,
                message,
                allowed,
                ..
            } => {
                if allowed.is_empty() {
                    write!(f, "State conflict ({rule}): {message}")
                } else {
                    write!(
                        f,
                        "State conflict ({rule}): {message}; allowed: {}",
                        allowed.join(", ")
                    )
                }
            }
            Self::PreconditionFailed { rule, message } => {
                write!(f, "Precondition failed ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

fn conflict(rule: &str, err: &DomainError) -> ApiError {
    ApiError::StateConflict {
        rule: rule.to_string(),
        message: err.to_string(),
        current: None,
        attempted: None,
        allowed: Vec::new(),
    }
}

fn precondition(rule: &str, err: &DomainError) -> ApiError {
    ApiError::PreconditionFailed {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

fn session_targets(from: SessionStatus) -> Vec<String> {
    [
        SessionStatus::Upcoming,
        SessionStatus::Open,
        SessionStatus::Closed,
    ]
    .into_iter()
    .filter(|to| from.can_transition_to(*to))
    .map(|to| to.as_str().to_string())
    .collect()
}

fn status_names(statuses: &[ApplicationStatus]) -> Vec<String> {
    statuses.iter().map(|s| s.as_str().to_string()).collect()
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
/// State conflicts carry the current, attempted and allowed states where the
/// rule has them.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::MissingField { field } | DomainError::InvalidField { field, .. } => {
            invalid(field, &err)
        }
        DomainError::InvalidDateRange { .. } => invalid("end_date", &err),
        DomainError::InvalidSessionStatus(_) | DomainError::InvalidApplicationStatus(_) => {
            invalid("status", &err)
        }
        DomainError::InvalidDecisionType(_) => invalid("decision_type", &err),
        DomainError::InvalidParentRelation(_) => invalid("relation", &err),
        DomainError::ReservedQuotaExceedsTotal { .. } => invalid("reserved_seats", &err),
        DomainError::InvalidSessionTransition { from, to } => ApiError::StateConflict {
            rule: String::from("session_transition"),
            message: err.to_string(),
            current: Some(from.as_str().to_string()),
            attempted: Some(to.as_str().to_string()),
            allowed: session_targets(*from),
        },
        DomainError::InvalidStageTransition { from, to, allowed } => ApiError::StateConflict {
            rule: String::from("stage_transition"),
            message: err.to_string(),
            current: Some(from.as_str().to_string()),
            attempted: Some(to.as_str().to_string()),
            allowed: status_names(allowed),
        },
        DomainError::SessionClosed { .. } => ApiError::StateConflict {
            rule: String::from("session_closed"),
            message: err.to_string(),
            current: Some(SessionStatus::Closed.as_str().to_string()),
            attempted: None,
            allowed: Vec::new(),
        },
        DomainError::SessionNotOpen { status, .. } => ApiError::StateConflict {
            rule: String::from("session_not_open"),
            message: err.to_string(),
            current: Some(status.as_str().to_string()),
            attempted: None,
            allowed: Vec::new(),
        },
        DomainError::ApplicationNotEditable { status } => ApiError::StateConflict {
            rule: String::from("application_not_editable"),
            message: err.to_string(),
            current: Some(status.as_str().to_string()),
            attempted: None,
            allowed: Vec::new(),
        },
        DomainError::DecisionTypeMismatch { expected, actual } => ApiError::StateConflict {
            rule: String::from("decision_type"),
            message: err.to_string(),
            current: Some(actual.as_str().to_string()),
            attempted: None,
            allowed: vec![expected.as_str().to_string()],
        },
        DomainError::DuplicateSessionName { .. } => conflict("unique_session_name", &err),
        DomainError::DuplicateSeatClass { .. } => conflict("unique_seat_class", &err),
        DomainError::FilledExceedsTotal { .. } => conflict("filled_exceeds_total", &err),
        DomainError::SeatCapacityExceeded { .. } => conflict("seat_capacity_exceeded", &err),
        DomainError::DecisionExists { .. } => conflict("decision_exists", &err),
        DomainError::OfferAlreadyAccepted => conflict("offer_already_accepted", &err),
        DomainError::OfferExpired { .. } => conflict("offer_expired", &err),
        DomainError::MeritListFinalized { .. } => conflict("merit_list_finalized", &err),
        DomainError::SessionOpen { .. } => precondition("session_open", &err),
        DomainError::SessionHasApplications { .. } => {
            precondition("session_has_applications", &err)
        }
        DomainError::SeatInUse { .. } => precondition("seat_in_use", &err),
        DomainError::ApplicationNotDraft { .. } => precondition("application_not_draft", &err),
        DomainError::ApplicationNotApproved { .. } => {
            precondition("application_not_approved", &err)
        }
        DomainError::OfferNotAccepted => precondition("offer_not_accepted", &err),
        DomainError::NoBranchAvailable => precondition("no_branch_available", &err),
        DomainError::DateArithmeticOverflow { .. } => ApiError::Internal {
            message: err.to_string(),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::DecisionNotFound { application_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Decision"),
            message: format!("No decision recorded for application {application_id}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Rule violations raised inside a transaction are translated like any other
/// domain error. A lost optimistic-version race surfaces as a state conflict.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound { resource, key } => ApiError::ResourceNotFound {
            resource_type: capitalize(resource),
            message: format!("No {resource} with key {key}"),
        },
        PersistenceError::RuleViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::ConcurrentModification { .. } => ApiError::StateConflict {
            rule: String::from("concurrent_modification"),
            message: err.to_string(),
            current: None,
            attempted: None,
            allowed: Vec::new(),
        },
        PersistenceError::UniqueViolation(_) => ApiError::StateConflict {
            rule: String::from("unique_constraint"),
            message: err.to_string(),
            current: None,
            attempted: None,
            allowed: Vec::new(),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

fn capitalize(resource: &str) -> String {
    let mut chars = resource.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
