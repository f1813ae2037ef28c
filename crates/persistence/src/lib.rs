// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` persistence for the admissions lifecycle.
//!
//! The store owns everything that must hold under concurrency:
//!
//! - Sessions, applications and decisions carry a `version` column and
//!   every update is conditional on it.
//! - Application and admission numbers come from a single
//!   increment-and-return statement per allocation.
//! - Seat counters change through conditional `UPDATE`s whose affected row
//!   count decides success.
//! - Multi-statement writes run in `BEGIN IMMEDIATE` transactions, so the
//!   write lock is held before the first read.
//!
//! ## Testing
//!
//! Tests run against a fresh shared-cache in-memory database per
//! `Persistence::new_in_memory()` call.

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

use admissions::{ApplicationState, SessionTransition, TransitionResult};
use admissions_audit::{Actor, AuditEvent, Cause, EntityRef, StateSnapshot};
use admissions_domain::{
    AdmissionApplication, AdmissionDecision, AdmissionSeat, AdmissionSession, ApplicationDocument,
    Branch, DomainError, MeritCandidate, MeritList, MeritListKey, ParentDetails, SequenceScope,
    SessionStatus, StageHistoryEntry, Student, TenantId,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod conversions;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::{NewApplication, PersistedTransition};
pub use queries::applications::ApplicationFilter;

use backend::PersistenceBackend;

/// Settings for a file-backed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceConfig {
    /// How long a writer waits for a competing write lock.
    pub busy_timeout_ms: u32,
    /// Whether to switch the database to WAL journaling.
    pub enable_wal: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            busy_timeout_ms: 5_000,
            enable_wal: true,
        }
    }
}

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// so tests are isolated from each other.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_admissions_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(
        path: P,
        config: PersistenceConfig,
    ) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::set_busy_timeout(&mut conn, config.busy_timeout_ms)?;
        if config.enable_wal {
            backend::sqlite::enable_wal_mode(&mut conn)?;
        }
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Branches
    // ========================================================================

    /// Creates a branch.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` if the code is taken for the tenant.
    pub fn create_branch(
        &mut self,
        branch: &Branch,
        event: AuditEvent,
    ) -> Result<Branch, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let branch_id: i64 = mutations::branches::insert_branch(conn, branch)?;
            mutations::audit::persist_audit_event(conn, &event.with_entity_id(branch_id))?;
            queries::branches::get_branch(conn, branch.tenant_id, branch_id)
        })
    }

    /// Loads a branch.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the branch does not exist.
    pub fn get_branch(
        &mut self,
        tenant_id: TenantId,
        branch_id: i64,
    ) -> Result<Branch, PersistenceError> {
        queries::branches::get_branch(&mut self.conn, tenant_id, branch_id)
    }

    /// Lists a tenant's branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_branches(&mut self, tenant_id: TenantId) -> Result<Vec<Branch>, PersistenceError> {
        queries::branches::list_branches(&mut self.conn, tenant_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session and records its audit event.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(DuplicateSessionName)` on a name clash.
    pub fn create_session(
        &mut self,
        session: &AdmissionSession,
        event: AuditEvent,
    ) -> Result<AdmissionSession, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let session_id: i64 = mutations::sessions::insert_session(conn, session)?;
            mutations::audit::persist_audit_event(conn, &event.with_entity_id(session_id))?;
            queries::sessions::get_session(conn, session.tenant_id, session_id)
        })
    }

    /// Loads a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist.
    pub fn get_session(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
    ) -> Result<AdmissionSession, PersistenceError> {
        queries::sessions::get_session(&mut self.conn, tenant_id, session_id)
    }

    /// Lists sessions, optionally filtered by status and academic year.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_sessions(
        &mut self,
        tenant_id: TenantId,
        status: Option<SessionStatus>,
        academic_year: Option<&str>,
    ) -> Result<Vec<AdmissionSession>, PersistenceError> {
        queries::sessions::list_sessions(&mut self.conn, tenant_id, status, academic_year)
    }

    /// Persists a session transition produced by the core.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if the session changed since it
    /// was read.
    pub fn persist_session_transition(
        &mut self,
        transition: &SessionTransition,
    ) -> Result<(AdmissionSession, i64), PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::persist_session_transition(conn, transition))
    }

    /// Deletes a session that is not open, has no applications and owns no
    /// finalized merit list.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(SessionOpen)`,
    /// `RuleViolation(SessionHasApplications)` or
    /// `RuleViolation(MeritListFinalized)` when blocked.
    pub fn delete_session(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
        event: AuditEvent,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let session: AdmissionSession =
                queries::sessions::get_session(conn, tenant_id, session_id)?;
            session.ensure_deletable()?;
            let count: i64 =
                queries::sessions::count_session_applications(conn, tenant_id, session_id)?;
            if count > 0 {
                return Err(DomainError::SessionHasApplications { session_id, count }.into());
            }
            if let Some(merit_list_id) =
                queries::merit_lists::find_final_merit_list_id(conn, tenant_id, session_id)?
            {
                return Err(DomainError::MeritListFinalized { merit_list_id }.into());
            }
            mutations::sessions::delete_session(conn, tenant_id, session_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(())
        })
    }

    // ========================================================================
    // Seats
    // ========================================================================

    /// Creates a seat configuration.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(DuplicateSeatClass)` if the class exists.
    pub fn create_seat(
        &mut self,
        seat: &AdmissionSeat,
        event: AuditEvent,
    ) -> Result<AdmissionSeat, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let seat_id: i64 = mutations::seats::insert_seat(conn, seat)?;
            mutations::audit::persist_audit_event(conn, &event.with_entity_id(seat_id))?;
            queries::seats::get_seat(conn, seat.tenant_id, seat_id)
        })
    }

    /// Updates total, waitlist limit and reserved quotas of a seat.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(FilledExceedsTotal)` if the total would drop
    /// below the filled count.
    pub fn update_seat(
        &mut self,
        seat: &AdmissionSeat,
        event: AuditEvent,
    ) -> Result<AdmissionSeat, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::seats::update_seat_config(conn, seat)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            queries::seats::get_seat(conn, seat.tenant_id, seat.seat_id.unwrap_or_default())
        })
    }

    /// Changes a seat's filled count by `delta`.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(SeatCapacityExceeded)` if the increase does
    /// not fit.
    pub fn adjust_filled_seats(
        &mut self,
        tenant_id: TenantId,
        seat_id: i64,
        delta: i32,
        event: AuditEvent,
    ) -> Result<AdmissionSeat, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let before: AdmissionSeat = queries::seats::get_seat(conn, tenant_id, seat_id)?;
            mutations::seats::adjust_filled_seats(conn, tenant_id, seat_id, delta)?;
            let after: AdmissionSeat = queries::seats::get_seat(conn, tenant_id, seat_id)?;
            let event: AuditEvent =
                event.with_snapshots(StateSnapshot::of(&before)?, StateSnapshot::of(&after)?);
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(after)
        })
    }

    /// Deletes a seat configuration with nothing filled.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(SeatInUse)` if seats are filled.
    pub fn delete_seat(
        &mut self,
        tenant_id: TenantId,
        seat_id: i64,
        event: AuditEvent,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::seats::delete_seat(conn, tenant_id, seat_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(())
        })
    }

    /// Loads a seat configuration.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the seat does not exist.
    pub fn get_seat(
        &mut self,
        tenant_id: TenantId,
        seat_id: i64,
    ) -> Result<AdmissionSeat, PersistenceError> {
        queries::seats::get_seat(&mut self.conn, tenant_id, seat_id)
    }

    /// Finds the seat configuration for a class in a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_seat_for_class(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
        class_name: &str,
    ) -> Result<Option<AdmissionSeat>, PersistenceError> {
        queries::seats::find_seat_for_class(&mut self.conn, tenant_id, session_id, class_name)
    }

    /// Lists a session's seat configurations.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_seats(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
    ) -> Result<Vec<AdmissionSeat>, PersistenceError> {
        queries::seats::list_seats(&mut self.conn, tenant_id, session_id)
    }

    // ========================================================================
    // Sequences
    // ========================================================================

    /// Allocates the next formatted number for `scope`.
    ///
    /// # Errors
    ///
    /// Returns an error if the counter cannot be incremented.
    pub fn allocate_number(
        &mut self,
        tenant_id: TenantId,
        scope: &SequenceScope,
    ) -> Result<String, PersistenceError> {
        mutations::sequences::allocate_number(&mut self.conn, tenant_id, scope)
    }

    // ========================================================================
    // Applications
    // ========================================================================

    /// Creates a draft application with a freshly allocated number.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; nothing is stored in that case.
    pub fn create_application(
        &mut self,
        new: &NewApplication,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<AdmissionApplication, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::create_application(conn, new, actor, cause, now)
        })
    }

    /// Writes edited application details, replacing parents when given.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrentModification` if the application changed since
    /// it was read.
    pub fn update_application(
        &mut self,
        application: &AdmissionApplication,
        parents: Option<&[ParentDetails]>,
        now: OffsetDateTime,
        event: AuditEvent,
    ) -> Result<AdmissionApplication, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::applications::update_application_details(
                conn,
                application,
                parents,
                now,
            )?;
            mutations::audit::persist_audit_event(conn, &event)?;
            queries::applications::get_application(conn, application.tenant_id, application.id())
        })
    }

    /// Deletes a draft application and its children.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(ApplicationNotDraft)` if it has left `draft`.
    pub fn delete_application(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
        event: AuditEvent,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::applications::delete_application(conn, tenant_id, application_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(())
        })
    }

    /// Loads an application with its parents.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application does not exist.
    pub fn get_application(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<AdmissionApplication, PersistenceError> {
        queries::applications::get_application(&mut self.conn, tenant_id, application_id)
    }

    /// Resolves an application number to its id.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no application carries the number.
    pub fn find_application_id(
        &mut self,
        tenant_id: TenantId,
        application_number: &str,
    ) -> Result<i64, PersistenceError> {
        queries::applications::find_application_id_by_number(
            &mut self.conn,
            tenant_id,
            application_number,
        )
    }

    /// Loads an application together with its decision.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the application does not exist.
    pub fn get_application_state(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<ApplicationState, PersistenceError> {
        let application: AdmissionApplication =
            queries::applications::get_application(&mut self.conn, tenant_id, application_id)?;
        let decision: Option<AdmissionDecision> =
            queries::decisions::find_decision(&mut self.conn, tenant_id, application_id)?;
        Ok(ApplicationState::new(application, decision))
    }

    /// Lists applications matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_applications(
        &mut self,
        tenant_id: TenantId,
        filter: &ApplicationFilter,
    ) -> Result<Vec<AdmissionApplication>, PersistenceError> {
        queries::applications::list_applications(&mut self.conn, tenant_id, filter)
    }

    /// Returns an application's stage history in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn stage_history(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<Vec<StageHistoryEntry>, PersistenceError> {
        queries::applications::stage_history(&mut self.conn, tenant_id, application_id)
    }

    /// Persists an application transition produced by the core.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails; the transaction then rolls back
    /// every write, including enrollment side effects.
    pub fn persist_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<PersistedTransition, PersistenceError> {
        self.conn
            .immediate_transaction(|conn| mutations::persist_transition(conn, result))
    }

    // ========================================================================
    // Documents
    // ========================================================================

    /// Attaches a document reference to an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn add_document(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
        document_type: &str,
        file_reference: &str,
        uploaded_at: OffsetDateTime,
        event: AuditEvent,
    ) -> Result<ApplicationDocument, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let document: ApplicationDocument = mutations::applications::add_document(
                conn,
                tenant_id,
                application_id,
                document_type,
                file_reference,
                uploaded_at,
            )?;
            mutations::audit::persist_audit_event(
                conn,
                &event.with_entity_id(document.document_id.unwrap_or_default()),
            )?;
            Ok(document)
        })
    }

    /// Marks a document verified.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the document does not exist.
    pub fn verify_document(
        &mut self,
        tenant_id: TenantId,
        document_id: i64,
        event: AuditEvent,
    ) -> Result<i64, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            let application_id: i64 =
                mutations::applications::verify_document(conn, tenant_id, document_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(application_id)
        })
    }

    /// Lists an application's documents.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_documents(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<Vec<ApplicationDocument>, PersistenceError> {
        queries::applications::list_documents(&mut self.conn, tenant_id, application_id)
    }

    // ========================================================================
    // Decisions & Students
    // ========================================================================

    /// Loads the decision for an application, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_decision(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<Option<AdmissionDecision>, PersistenceError> {
        queries::decisions::find_decision(&mut self.conn, tenant_id, application_id)
    }

    /// Lists waitlisted decisions for a class, by position.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_waitlist(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
        class_name: &str,
    ) -> Result<Vec<AdmissionDecision>, PersistenceError> {
        queries::decisions::list_waitlist(&mut self.conn, tenant_id, session_id, class_name)
    }

    /// Loads the student created by enrolling an application.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_student_by_application(
        &mut self,
        tenant_id: TenantId,
        application_id: i64,
    ) -> Result<Option<Student>, PersistenceError> {
        queries::students::find_student_by_application(&mut self.conn, tenant_id, application_id)
    }

    // ========================================================================
    // Merit Lists
    // ========================================================================

    /// Ranks the current pool and replaces the working list for `key`.
    ///
    /// The pool is read and the list written in one transaction. `build`
    /// receives the candidates and returns the list to store.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(MeritListFinalized)` if the key has a final
    /// list, or any error returned by `build`.
    pub fn regenerate_merit_list<F>(
        &mut self,
        tenant_id: TenantId,
        key: &MeritListKey,
        build: F,
        event: AuditEvent,
    ) -> Result<MeritList, PersistenceError>
    where
        F: FnOnce(Vec<MeritCandidate>) -> Result<MeritList, DomainError>,
    {
        self.conn.immediate_transaction(|conn| {
            if let Some(existing) = queries::merit_lists::find_merit_list(conn, tenant_id, key)? {
                existing.ensure_mutable()?;
            }
            let candidates = queries::applications::load_merit_candidates(
                conn,
                tenant_id,
                key.session_id,
                &key.class_name,
            )?;
            let list: MeritList = build(candidates)?;
            let merit_list_id: i64 = mutations::merit_lists::replace_merit_list(conn, &list)?;
            mutations::audit::persist_audit_event(conn, &event.with_entity_id(merit_list_id))?;
            queries::merit_lists::get_merit_list(conn, tenant_id, merit_list_id)
        })
    }

    /// Marks a merit list final.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(MeritListFinalized)` if already final.
    pub fn finalize_merit_list(
        &mut self,
        tenant_id: TenantId,
        merit_list_id: i64,
        event: AuditEvent,
    ) -> Result<MeritList, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::merit_lists::finalize_merit_list(conn, tenant_id, merit_list_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            queries::merit_lists::get_merit_list(conn, tenant_id, merit_list_id)
        })
    }

    /// Changes the cutoff recorded on a working list.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(MeritListFinalized)` if the list is final.
    pub fn update_merit_list_cutoff(
        &mut self,
        tenant_id: TenantId,
        merit_list_id: i64,
        cutoff_score: Option<f64>,
        event: AuditEvent,
    ) -> Result<MeritList, PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::merit_lists::update_cutoff(conn, tenant_id, merit_list_id, cutoff_score)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            queries::merit_lists::get_merit_list(conn, tenant_id, merit_list_id)
        })
    }

    /// Deletes a working merit list.
    ///
    /// # Errors
    ///
    /// Returns `RuleViolation(MeritListFinalized)` if the list is final.
    pub fn delete_merit_list(
        &mut self,
        tenant_id: TenantId,
        merit_list_id: i64,
        event: AuditEvent,
    ) -> Result<(), PersistenceError> {
        self.conn.immediate_transaction(|conn| {
            mutations::merit_lists::delete_merit_list(conn, tenant_id, merit_list_id)?;
            mutations::audit::persist_audit_event(conn, &event)?;
            Ok(())
        })
    }

    /// Loads a merit list with its entries.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the list does not exist.
    pub fn get_merit_list(
        &mut self,
        tenant_id: TenantId,
        merit_list_id: i64,
    ) -> Result<MeritList, PersistenceError> {
        queries::merit_lists::get_merit_list(&mut self.conn, tenant_id, merit_list_id)
    }

    /// Loads the list stored for an exact key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_merit_list(
        &mut self,
        tenant_id: TenantId,
        key: &MeritListKey,
    ) -> Result<Option<MeritList>, PersistenceError> {
        queries::merit_lists::find_merit_list(&mut self.conn, tenant_id, key)
    }

    /// Lists a session's merit lists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_merit_lists(
        &mut self,
        tenant_id: TenantId,
        session_id: i64,
    ) -> Result<Vec<MeritList>, PersistenceError> {
        queries::merit_lists::list_merit_lists(&mut self.conn, tenant_id, session_id)
    }

    // ========================================================================
    // Audit
    // ========================================================================

    /// Persists a standalone audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        mutations::audit::persist_audit_event(&mut self.conn, event)
    }

    /// Returns the audit trail of one entity, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn audit_events_for_entity(
        &mut self,
        tenant_id: TenantId,
        entity: EntityRef,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::audit_events_for_entity(&mut self.conn, tenant_id, entity)
    }

    /// Loads a single audit event.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the event does not exist.
    pub fn get_audit_event(
        &mut self,
        tenant_id: TenantId,
        event_id: i64,
    ) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, tenant_id, event_id)
    }
}
