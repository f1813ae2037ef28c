// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request/response operations for the admissions lifecycle.
//!
//! Every operation takes a [`Persistence`](admissions_persistence::Persistence)
//! handle, a [`RequestContext`] naming the tenant, actor and cause, and a
//! request DTO. Failures come back as an [`ApiError`] that names the rule
//! that was broken.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod context;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use context::RequestContext;
pub use error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
pub use handlers::applications::{
    add_document, create_application, delete_application, get_application,
    get_application_by_number, get_student, list_applications, list_documents, mark_fee_paid,
    stage_history, submit_application, update_application, update_stage, verify_document,
};
pub use handlers::audit::{audit_trail, get_audit_event};
pub use handlers::branches::{create_branch, list_branches};
pub use handlers::decisions::{
    accept_offer, create_decision, enroll, generate_offer_letter, get_decision, list_waitlist,
    promote_from_waitlist, update_waitlist_position,
};
pub use handlers::merit::{
    delete_merit_list, finalize_merit_list, generate_merit_list, generate_merit_list_with,
    get_merit_list, list_merit_lists, update_merit_list_cutoff,
};
pub use handlers::seats::{
    create_seat, delete_seat, get_seat, increment_filled_seats, list_seats, update_seat,
};
pub use handlers::sequences::{generate_admission_number, generate_application_number};
pub use handlers::sessions::{
    change_session_status, create_session, delete_session, extend_deadline, get_session,
    list_sessions, session_seat_summary, update_session,
};
pub use request_response::{
    AddDocumentRequest, ApplicationDetail, ApplicationInfo, AuditEventInfo, BranchInfo,
    ChangeSessionStatusRequest, CreateApplicationRequest, CreateBranchRequest,
    CreateDecisionRequest, CreateSeatRequest, CreateSessionRequest, DecisionInfo, DocumentInfo,
    ExtendDeadlineRequest, GenerateMeritListRequest, GenerateOfferRequest,
    IncrementFilledSeatsRequest, ListApplicationsRequest, ListSessionsRequest, MeritListEntryInfo,
    MeritListInfo, ParentInput, SeatInfo, SessionInfo, SessionResponse, SessionSeatSummary,
    StageHistoryInfo, StudentInfo, TransitionResponse, UpdateApplicationRequest,
    UpdateCutoffRequest, UpdateSeatRequest, UpdateSessionRequest, UpdateStageRequest,
    UpdateWaitlistPositionRequest,
};
