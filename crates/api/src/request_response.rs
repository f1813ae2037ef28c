// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Optional request fields follow "only update if present" semantics.

use std::collections::BTreeMap;

use admissions_audit::AuditEvent;
use admissions_domain::{
    Address, AdmissionApplication, AdmissionDecision, AdmissionSeat, AdmissionSession,
    ApplicationDocument, Branch, MeritList, MeritListEntry, ParentDetails, StageEvent,
    StageHistoryEntry, Student, StudentDetails,
};
use time::{Date, OffsetDateTime};

// ============================================================================
// Branches
// ============================================================================

/// API request to create a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBranchRequest {
    /// Short code used in admission numbers (stored uppercase).
    pub code: String,
    pub name: String,
    /// Whether the branch becomes the tenant's primary branch.
    pub is_primary: bool,
}

/// A branch as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BranchInfo {
    pub branch_id: i64,
    pub code: String,
    pub name: String,
    pub is_primary: bool,
}

impl From<&Branch> for BranchInfo {
    fn from(branch: &Branch) -> Self {
        Self {
            branch_id: branch.branch_id.unwrap_or_default(),
            code: branch.code.clone(),
            name: branch.name.clone(),
            is_primary: branch.is_primary,
        }
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// API request to create an admission session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSessionRequest {
    pub branch_id: Option<i64>,
    /// The academic year label (e.g., "2026-27").
    pub academic_year: String,
    /// Unique within the tenant and academic year.
    pub name: String,
    pub start_date: Date,
    /// Must not be before `start_date`.
    pub end_date: Date,
    /// The application fee in minor currency units.
    pub application_fee: i64,
    pub required_documents: Vec<String>,
    pub settings: BTreeMap<String, String>,
}

/// API request to edit an admission session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSessionRequest {
    pub session_id: i64,
    pub branch_id: Option<i64>,
    pub academic_year: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub application_fee: Option<i64>,
    pub required_documents: Option<Vec<String>>,
    pub settings: Option<BTreeMap<String, String>>,
}

/// API request to move a session to another status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSessionStatusRequest {
    pub session_id: i64,
    /// The target status (`upcoming`, `open` or `closed`).
    pub status: String,
}

/// API request to move a session's end date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendDeadlineRequest {
    pub session_id: i64,
    pub new_end_date: Date,
}

/// API request to list sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSessionsRequest {
    pub status: Option<String>,
    pub academic_year: Option<String>,
}

/// An admission session as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionInfo {
    pub session_id: i64,
    pub branch_id: Option<i64>,
    pub academic_year: String,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub status: String,
    pub application_fee: i64,
    pub required_documents: Vec<String>,
    pub settings: BTreeMap<String, String>,
    /// The optimistic-concurrency version.
    pub version: i64,
}

impl From<&AdmissionSession> for SessionInfo {
    fn from(session: &AdmissionSession) -> Self {
        Self {
            session_id: session.id(),
            branch_id: session.branch_id,
            academic_year: session.academic_year.clone(),
            name: session.name.clone(),
            start_date: session.start_date,
            end_date: session.end_date,
            status: session.status.as_str().to_string(),
            application_fee: session.application_fee,
            required_documents: session.required_documents.clone(),
            settings: session.settings.clone(),
            version: session.version,
        }
    }
}

/// API response for a session mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionResponse {
    pub session: SessionInfo,
    /// The audit event recorded for the change.
    pub event_id: Option<i64>,
    /// A success message.
    pub message: String,
}

/// Seat totals for every class of a session.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionSeatSummary {
    pub session_id: i64,
    pub session_name: String,
    pub status: String,
    pub classes: Vec<SeatInfo>,
    pub total_seats: u32,
    pub filled_seats: u32,
    pub available_seats: u32,
}

// ============================================================================
// Seats
// ============================================================================

/// API request to configure seats for a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSeatRequest {
    pub session_id: i64,
    pub class_name: String,
    /// Must be zero or more.
    pub total_seats: i64,
    pub waitlist_limit: i64,
    /// Reserved quota per category.
    pub reserved_seats: BTreeMap<String, i64>,
}

/// API request to change a seat configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSeatRequest {
    pub seat_id: i64,
    pub total_seats: Option<i64>,
    pub waitlist_limit: Option<i64>,
    pub reserved_seats: Option<BTreeMap<String, i64>>,
}

/// API request to change a seat's filled count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementFilledSeatsRequest {
    pub seat_id: i64,
    /// Seats to fill (positive) or release (negative).
    pub count: i32,
}

/// A seat configuration as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SeatInfo {
    pub seat_id: i64,
    pub session_id: i64,
    pub class_name: String,
    pub total_seats: u32,
    pub filled_seats: u32,
    pub available_seats: u32,
    pub waitlist_limit: u32,
    pub reserved_seats: BTreeMap<String, u32>,
}

impl From<&AdmissionSeat> for SeatInfo {
    fn from(seat: &AdmissionSeat) -> Self {
        Self {
            seat_id: seat.seat_id.unwrap_or_default(),
            session_id: seat.session_id,
            class_name: seat.class_name.clone(),
            total_seats: seat.total_seats,
            filled_seats: seat.filled_seats,
            available_seats: seat.available_seats(),
            waitlist_limit: seat.waitlist_limit,
            reserved_seats: seat.reserved_seats.clone(),
        }
    }
}

// ============================================================================
// Applications
// ============================================================================

/// A parent or guardian as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentInput {
    /// `father`, `mother` or `guardian`.
    pub relation: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub occupation: Option<String>,
}

/// API request to create a draft application.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateApplicationRequest {
    pub session_id: i64,
    pub branch_id: Option<i64>,
    /// The enquiry the application came from, if any.
    pub enquiry_id: Option<i64>,
    pub student: StudentDetails,
    pub parents: Vec<ParentInput>,
    pub remarks: Option<String>,
}

/// API request to edit an application's details.
///
/// `parents`, when present, replaces the full parent list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateApplicationRequest {
    pub application_id: i64,
    pub branch_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub class_applied: Option<String>,
    pub previous_school: Option<String>,
    pub previous_marks: Option<f64>,
    pub address: Option<Address>,
    pub parents: Option<Vec<ParentInput>>,
    pub remarks: Option<String>,
}

/// API request to move an application along the stage graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStageRequest {
    pub application_id: i64,
    /// The target status.
    pub status: String,
    pub remarks: Option<String>,
}

/// API request to list applications.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListApplicationsRequest {
    pub session_id: Option<i64>,
    pub class_name: Option<String>,
    pub status: Option<String>,
}

/// API request to attach a document reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDocumentRequest {
    pub application_id: i64,
    pub document_type: String,
    /// Where the uploaded file lives; uploads are handled elsewhere.
    pub file_reference: String,
}

/// An application as returned by the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApplicationInfo {
    pub application_id: i64,
    pub application_number: String,
    pub session_id: i64,
    pub branch_id: Option<i64>,
    pub enquiry_id: Option<i64>,
    pub student: StudentDetails,
    pub parents: Vec<ParentDetails>,
    pub status: String,
    pub submitted_at: Option<OffsetDateTime>,
    pub approved_at: Option<OffsetDateTime>,
    pub approved_by: Option<String>,
    pub enrolled_at: Option<OffsetDateTime>,
    pub waitlist_position: Option<u32>,
    pub fee_paid: bool,
    pub remarks: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i64,
}

impl From<&AdmissionApplication> for ApplicationInfo {
    fn from(app: &AdmissionApplication) -> Self {
        Self {
            application_id: app.id(),
            application_number: app.application_number.clone(),
            session_id: app.session_id,
            branch_id: app.branch_id,
            enquiry_id: app.enquiry_id,
            student: app.student.clone(),
            parents: app.parents.clone(),
            status: app.status.as_str().to_string(),
            submitted_at: app.submitted_at,
            approved_at: app.approved_at,
            approved_by: app.approved_by.clone(),
            enrolled_at: app.enrolled_at,
            waitlist_position: app.waitlist_position,
            fee_paid: app.fee_paid,
            remarks: app.remarks.clone(),
            created_at: app.created_at,
            updated_at: app.updated_at,
            version: app.version,
        }
    }
}

/// An application with its decision and documents.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ApplicationDetail {
    pub application: ApplicationInfo,
    pub decision: Option<DecisionInfo>,
    pub documents: Vec<DocumentInfo>,
}

/// A document reference as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DocumentInfo {
    pub document_id: i64,
    pub application_id: i64,
    pub document_type: String,
    pub file_reference: String,
    pub verified: bool,
    pub uploaded_at: OffsetDateTime,
}

impl From<&ApplicationDocument> for DocumentInfo {
    fn from(document: &ApplicationDocument) -> Self {
        Self {
            document_id: document.document_id.unwrap_or_default(),
            application_id: document.application_id,
            document_type: document.document_type.clone(),
            file_reference: document.file_reference.clone(),
            verified: document.verified,
            uploaded_at: document.uploaded_at,
        }
    }
}

/// One entry of an application's stage history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageHistoryInfo {
    pub sequence: i64,
    pub event_type: String,
    pub event: StageEvent,
    pub status_after: String,
    pub recorded_at: OffsetDateTime,
    pub actor_id: String,
    pub remarks: Option<String>,
}

impl From<&StageHistoryEntry> for StageHistoryInfo {
    fn from(entry: &StageHistoryEntry) -> Self {
        Self {
            sequence: entry.sequence,
            event_type: entry.event.event_type().to_string(),
            event: entry.event.clone(),
            status_after: entry.status_after.as_str().to_string(),
            recorded_at: entry.recorded_at,
            actor_id: entry.actor_id.clone(),
            remarks: entry.remarks.clone(),
        }
    }
}

/// The student record created on enrollment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StudentInfo {
    pub student_id: i64,
    pub admission_number: String,
    pub branch_id: i64,
    pub application_id: i64,
    pub session_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub class_name: String,
    pub section: Option<String>,
    pub address: Option<Address>,
    pub admitted_at: OffsetDateTime,
}

impl From<&Student> for StudentInfo {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.student_id.unwrap_or_default(),
            admission_number: student.admission_number.clone(),
            branch_id: student.branch_id,
            application_id: student.application_id,
            session_id: student.session_id,
            first_name: student.first_name.clone(),
            last_name: student.last_name.clone(),
            class_name: student.class_name.clone(),
            section: student.section.clone(),
            address: student.address.clone(),
            admitted_at: student.admitted_at,
        }
    }
}

/// API response for any application or decision transition.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransitionResponse {
    pub application: ApplicationInfo,
    pub decision: Option<DecisionInfo>,
    /// Present when the transition enrolled the application.
    pub student: Option<StudentInfo>,
    /// The stage-history sequence of this transition.
    pub stage_sequence: i64,
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

// ============================================================================
// Decisions
// ============================================================================

/// API request to record the decision for an application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDecisionRequest {
    pub application_id: i64,
    /// `approved`, `waitlisted` or `rejected`.
    pub decision_type: String,
    pub decision_date: Option<Date>,
    pub section_assigned: Option<String>,
    /// Required and positive for `waitlisted`.
    pub waitlist_position: Option<i64>,
    /// Required and non-blank for `rejected`.
    pub rejection_reason: Option<String>,
}

/// API request to issue an offer letter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOfferRequest {
    pub application_id: i64,
    /// Reference to the rendered letter.
    pub letter_url: String,
    /// Defaults to 30 days from today.
    pub valid_until: Option<Date>,
}

/// API request to move a waitlisted application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateWaitlistPositionRequest {
    pub application_id: i64,
    pub position: i64,
}

/// A decision as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecisionInfo {
    pub decision_id: i64,
    pub application_id: i64,
    pub decision_type: String,
    pub decision_date: Date,
    pub decided_by: String,
    pub section_assigned: Option<String>,
    pub waitlist_position: Option<u32>,
    pub rejection_reason: Option<String>,
    pub offer_letter_url: Option<String>,
    pub offer_valid_until: Option<Date>,
    pub offer_accepted: bool,
    pub offer_accepted_at: Option<OffsetDateTime>,
    pub version: i64,
}

impl From<&AdmissionDecision> for DecisionInfo {
    fn from(decision: &AdmissionDecision) -> Self {
        Self {
            decision_id: decision.decision_id.unwrap_or_default(),
            application_id: decision.application_id,
            decision_type: decision.decision_type.as_str().to_string(),
            decision_date: decision.decision_date,
            decided_by: decision.decided_by.clone(),
            section_assigned: decision.section_assigned.clone(),
            waitlist_position: decision.waitlist_position,
            rejection_reason: decision.rejection_reason.clone(),
            offer_letter_url: decision.offer.letter_url.clone(),
            offer_valid_until: decision.offer.valid_until,
            offer_accepted: decision.offer.accepted,
            offer_accepted_at: decision.offer.accepted_at,
            version: decision.version,
        }
    }
}

// ============================================================================
// Merit Lists
// ============================================================================

/// API request to (re)generate the merit list for a class.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateMeritListRequest {
    pub session_id: i64,
    pub class_name: String,
    pub test_id: Option<i64>,
    /// Entries scoring below this are left out of the stored list.
    pub cutoff_score: Option<f64>,
}

/// API request to change the cutoff recorded on a working list.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateCutoffRequest {
    pub merit_list_id: i64,
    pub cutoff_score: Option<f64>,
}

/// One ranked entry.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeritListEntryInfo {
    pub rank: u32,
    pub application_id: i64,
    pub application_number: String,
    pub student_name: String,
    pub score: f64,
    pub status: String,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
}

impl From<&MeritListEntry> for MeritListEntryInfo {
    fn from(entry: &MeritListEntry) -> Self {
        Self {
            rank: entry.rank,
            application_id: entry.application_id,
            application_number: entry.application_number.clone(),
            student_name: entry.student_name.clone(),
            score: entry.score,
            status: entry.status.as_str().to_string(),
            contact_phone: entry.contact_phone.clone(),
            contact_email: entry.contact_email.clone(),
        }
    }
}

/// A merit list as returned by the API.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeritListInfo {
    pub merit_list_id: i64,
    pub session_id: i64,
    pub class_name: String,
    pub test_id: Option<i64>,
    pub generated_at: OffsetDateTime,
    pub generated_by: String,
    pub cutoff_score: Option<f64>,
    pub is_final: bool,
    /// Entries stored on the list.
    pub total_count: usize,
    /// Stored entries at or above the current cutoff.
    pub above_cutoff: usize,
    /// Eligible applicants left out by the cutoff at generation time.
    pub excluded_below_cutoff: u32,
    pub entries: Vec<MeritListEntryInfo>,
}

impl From<&MeritList> for MeritListInfo {
    fn from(list: &MeritList) -> Self {
        Self {
            merit_list_id: list.merit_list_id.unwrap_or_default(),
            session_id: list.key.session_id,
            class_name: list.key.class_name.clone(),
            test_id: list.key.test_id,
            generated_at: list.generated_at,
            generated_by: list.generated_by.clone(),
            cutoff_score: list.cutoff_score,
            is_final: list.is_final,
            total_count: list.total_count(),
            above_cutoff: list.above_cutoff(),
            excluded_below_cutoff: list.excluded_below_cutoff,
            entries: list.entries.iter().map(MeritListEntryInfo::from).collect(),
        }
    }
}

// ============================================================================
// Audit
// ============================================================================

/// An audit event as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    pub event_id: i64,
    pub entity_kind: String,
    pub entity_id: i64,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
    pub recorded_at: OffsetDateTime,
}

impl From<&AuditEvent> for AuditEventInfo {
    fn from(event: &AuditEvent) -> Self {
        Self {
            event_id: event.event_id.unwrap_or_default(),
            entity_kind: event.entity.kind.as_str().to_string(),
            entity_id: event.entity.id,
            actor_id: event.actor.id.clone(),
            actor_type: event.actor.actor_type.clone(),
            cause_id: event.cause.id.clone(),
            cause_description: event.cause.description.clone(),
            action: event.action.name.clone(),
            details: event.action.details.clone(),
            before: event.before.data.clone(),
            after: event.after.data.clone(),
            recorded_at: event.recorded_at,
        }
    }
}
