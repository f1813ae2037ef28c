// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator subcommands and their dispatch onto the api crate.

use std::collections::BTreeMap;

use admissions_api::{
    ChangeSessionStatusRequest, CreateBranchRequest, CreateSeatRequest, CreateSessionRequest,
    ExtendDeadlineRequest, GenerateMeritListRequest, ListSessionsRequest, RequestContext,
    UpdateSeatRequest,
};
use admissions_persistence::Persistence;
use clap::{Args, Subcommand};
use serde::Serialize;
use time::Date;
use time::macros::format_description;
use tracing::debug;

use crate::error::CliError;

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    /// Manage branches
    #[command(subcommand)]
    Branch(BranchAction),
    /// Manage admission sessions
    #[command(subcommand)]
    Session(SessionAction),
    /// Manage class seat configurations
    #[command(subcommand)]
    Seat(SeatAction),
    /// Inspect applications
    #[command(subcommand)]
    Application(ApplicationAction),
    /// Generate and inspect merit lists
    #[command(subcommand)]
    Merit(MeritAction),
}

#[derive(Clone, Debug, Subcommand)]
pub enum BranchAction {
    /// Create a branch
    Create {
        /// Short code used in admission numbers
        code: String,
        name: String,
        /// Make this the tenant's primary branch
        #[arg(long)]
        primary: bool,
    },
    /// List branches
    List,
}

#[derive(Clone, Debug, Args)]
pub struct NewSession {
    #[arg(long)]
    pub name: String,
    /// Academic year label, e.g. 2026-27
    #[arg(long)]
    pub academic_year: String,
    /// First day of the session (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub start: Date,
    /// Last day of the session (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub end: Date,
    /// Application fee in minor currency units
    #[arg(long, default_value_t = 0)]
    pub fee: i64,
    #[arg(long)]
    pub branch: Option<i64>,
    /// Required document type; repeat for more than one
    #[arg(long = "document")]
    pub documents: Vec<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum SessionAction {
    /// Create an upcoming session
    Create(NewSession),
    /// Move a session to upcoming, open or closed
    Status { session_id: i64, status: String },
    /// Push a session's end date later
    Extend {
        session_id: i64,
        #[arg(value_parser = parse_date)]
        end: Date,
    },
    /// List sessions
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        academic_year: Option<String>,
    },
    /// Show seat totals for a session
    Summary { session_id: i64 },
}

#[derive(Clone, Debug, Subcommand)]
pub enum SeatAction {
    /// Configure seats for a class
    Create {
        session_id: i64,
        class: String,
        #[arg(long)]
        total: i64,
        #[arg(long, default_value_t = 0)]
        waitlist: i64,
        /// Reserved quota as CATEGORY=COUNT; repeat for more than one
        #[arg(long = "reserved", value_parser = parse_reservation)]
        reserved: Vec<(String, i64)>,
    },
    /// Change a seat configuration
    Update {
        seat_id: i64,
        #[arg(long)]
        total: Option<i64>,
        #[arg(long)]
        waitlist: Option<i64>,
        /// Replaces every reserved quota when given
        #[arg(long = "reserved", value_parser = parse_reservation)]
        reserved: Vec<(String, i64)>,
    },
    /// List the seat configurations of a session
    List { session_id: i64 },
}

#[derive(Clone, Debug, Subcommand)]
pub enum ApplicationAction {
    /// Show an application by id or application number
    Show { application: String },
    /// Show the stage history of an application
    History { application_id: i64 },
}

#[derive(Clone, Debug, Subcommand)]
pub enum MeritAction {
    /// Rank eligible applicants for a class
    Generate {
        session_id: i64,
        class: String,
        #[arg(long)]
        test: Option<i64>,
        #[arg(long)]
        cutoff: Option<f64>,
    },
    /// Freeze a merit list
    Finalize { merit_list_id: i64 },
    /// Show a merit list with its entries
    Show { merit_list_id: i64 },
}

impl Command {
    /// Short label recorded as the audit cause.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Branch(_) => "admissions branch",
            Self::Session(_) => "admissions session",
            Self::Seat(_) => "admissions seat",
            Self::Application(_) => "admissions application",
            Self::Merit(_) => "admissions merit",
        }
    }
}

/// Parses a calendar date written as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if the text is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, String> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

/// Parses a reserved quota written as `CATEGORY=COUNT`.
///
/// # Errors
///
/// Returns an error if the separator is missing, the category is blank, or
/// the count is not an integer.
pub fn parse_reservation(value: &str) -> Result<(String, i64), String> {
    let (category, count) = value
        .split_once('=')
        .ok_or_else(|| String::from("expected CATEGORY=COUNT"))?;
    let category: &str = category.trim();
    if category.is_empty() {
        return Err(String::from("category must not be blank"));
    }
    let count: i64 = count
        .trim()
        .parse()
        .map_err(|e| format!("invalid count '{count}': {e}"))?;
    Ok((category.to_string(), count))
}

fn render<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Runs one subcommand and renders its result as pretty JSON.
///
/// # Errors
///
/// Returns an error if the operation fails or its result cannot be
/// rendered.
pub fn run(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    command: Command,
) -> Result<String, CliError> {
    debug!(tenant_id = ctx.tenant_id.value(), command = ?command, "Running command");
    match command {
        Command::Branch(action) => run_branch(persistence, ctx, action),
        Command::Session(action) => run_session(persistence, ctx, action),
        Command::Seat(action) => run_seat(persistence, ctx, action),
        Command::Application(action) => run_application(persistence, ctx, action),
        Command::Merit(action) => run_merit(persistence, ctx, action),
    }
}

fn run_branch(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    action: BranchAction,
) -> Result<String, CliError> {
    match action {
        BranchAction::Create {
            code,
            name,
            primary,
        } => {
            let request = CreateBranchRequest {
                code,
                name,
                is_primary: primary,
            };
            render(&admissions_api::create_branch(persistence, ctx, &request)?)
        }
        BranchAction::List => render(&admissions_api::list_branches(persistence, ctx)?),
    }
}

fn run_session(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    action: SessionAction,
) -> Result<String, CliError> {
    match action {
        SessionAction::Create(new) => {
            let request = CreateSessionRequest {
                branch_id: new.branch,
                academic_year: new.academic_year,
                name: new.name,
                start_date: new.start,
                end_date: new.end,
                application_fee: new.fee,
                required_documents: new.documents,
                settings: BTreeMap::new(),
            };
            render(&admissions_api::create_session(persistence, ctx, &request)?)
        }
        SessionAction::Status { session_id, status } => {
            let request = ChangeSessionStatusRequest { session_id, status };
            render(&admissions_api::change_session_status(
                persistence,
                ctx,
                &request,
            )?)
        }
        SessionAction::Extend { session_id, end } => {
            let request = ExtendDeadlineRequest {
                session_id,
                new_end_date: end,
            };
            render(&admissions_api::extend_deadline(persistence, ctx, &request)?)
        }
        SessionAction::List {
            status,
            academic_year,
        } => {
            let request = ListSessionsRequest {
                status,
                academic_year,
            };
            render(&admissions_api::list_sessions(persistence, ctx, &request)?)
        }
        SessionAction::Summary { session_id } => render(&admissions_api::session_seat_summary(
            persistence,
            ctx,
            session_id,
        )?),
    }
}

fn run_seat(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    action: SeatAction,
) -> Result<String, CliError> {
    match action {
        SeatAction::Create {
            session_id,
            class,
            total,
            waitlist,
            reserved,
        } => {
            let request = CreateSeatRequest {
                session_id,
                class_name: class,
                total_seats: total,
                waitlist_limit: waitlist,
                reserved_seats: reserved.into_iter().collect(),
            };
            render(&admissions_api::create_seat(persistence, ctx, &request)?)
        }
        SeatAction::Update {
            seat_id,
            total,
            waitlist,
            reserved,
        } => {
            let reserved_seats: Option<BTreeMap<String, i64>> = if reserved.is_empty() {
                None
            } else {
                Some(reserved.into_iter().collect())
            };
            let request = UpdateSeatRequest {
                seat_id,
                total_seats: total,
                waitlist_limit: waitlist,
                reserved_seats,
            };
            render(&admissions_api::update_seat(persistence, ctx, &request)?)
        }
        SeatAction::List { session_id } => {
            render(&admissions_api::list_seats(persistence, ctx, session_id)?)
        }
    }
}

fn run_application(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    action: ApplicationAction,
) -> Result<String, CliError> {
    match action {
        ApplicationAction::Show { application } => match application.trim().parse::<i64>() {
            Ok(application_id) => render(&admissions_api::get_application(
                persistence,
                ctx,
                application_id,
            )?),
            Err(_) => render(&admissions_api::get_application_by_number(
                persistence,
                ctx,
                application.trim(),
            )?),
        },
        ApplicationAction::History { application_id } => render(
            &admissions_api::stage_history(persistence, ctx, application_id)?,
        ),
    }
}

fn run_merit(
    persistence: &mut Persistence,
    ctx: &RequestContext,
    action: MeritAction,
) -> Result<String, CliError> {
    match action {
        MeritAction::Generate {
            session_id,
            class,
            test,
            cutoff,
        } => {
            let request = GenerateMeritListRequest {
                session_id,
                class_name: class,
                test_id: test,
                cutoff_score: cutoff,
            };
            render(&admissions_api::generate_merit_list(
                persistence,
                ctx,
                &request,
            )?)
        }
        MeritAction::Finalize { merit_list_id } => render(&admissions_api::finalize_merit_list(
            persistence,
            ctx,
            merit_list_id,
        )?),
        MeritAction::Show { merit_list_id } => render(&admissions_api::get_merit_list(
            persistence,
            ctx,
            merit_list_id,
        )?),
    }
}
