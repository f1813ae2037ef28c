// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use admissions_api::{ApiError, RequestContext};
use admissions_audit::{Actor, Cause};
use admissions_domain::TenantId;
use admissions_persistence::Persistence;
use clap::Parser;
use serde_json::Value;
use time::macros::date;

use crate::Args;
use crate::commands::{
    ApplicationAction, BranchAction, Command, SeatAction, SessionAction, parse_date,
    parse_reservation, run,
};
use crate::error::CliError;

fn context() -> RequestContext {
    RequestContext::with_system_clock(
        TenantId::new(1),
        Actor::new(String::from("operator"), String::from("operator")),
        Cause::new(String::from("cli"), String::from("test")),
    )
}

fn run_json(persistence: &mut Persistence, args: &[&str]) -> Value {
    let mut argv: Vec<&str> = vec!["admissions"];
    argv.extend_from_slice(args);
    let parsed: Args = Args::try_parse_from(argv).unwrap();
    let output: String = run(persistence, &context(), parsed.command).unwrap();
    serde_json::from_str(&output).unwrap()
}

#[test]
fn test_global_options_have_defaults() {
    let args: Args = Args::try_parse_from(["admissions", "branch", "list"]).unwrap();
    assert_eq!(args.database, None);
    assert_eq!(args.tenant, 1);
    assert_eq!(args.actor, "operator");
    assert_eq!(args.log_level, "info");
    assert_eq!(args.busy_timeout_ms, 5000);
    assert!(matches!(args.command, Command::Branch(BranchAction::List)));
}

#[test]
fn test_global_options_are_parsed() {
    let args: Args = Args::try_parse_from([
        "admissions",
        "--database",
        "/tmp/admissions.db",
        "--tenant",
        "7",
        "--actor",
        "registrar",
        "--busy-timeout-ms",
        "250",
        "application",
        "show",
        "APP-20260310-0001",
    ])
    .unwrap();
    assert_eq!(
        args.database.as_deref(),
        Some(std::path::Path::new("/tmp/admissions.db"))
    );
    assert_eq!(args.tenant, 7);
    assert_eq!(args.actor, "registrar");
    assert_eq!(args.busy_timeout_ms, 250);
    match args.command {
        Command::Application(ApplicationAction::Show { application }) => {
            assert_eq!(application, "APP-20260310-0001");
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_session_create_parses_dates_and_documents() {
    let args: Args = Args::try_parse_from([
        "admissions",
        "session",
        "create",
        "--name",
        "Main Intake",
        "--academic-year",
        "2026-27",
        "--start",
        "2026-03-01",
        "--end",
        "2026-04-30",
        "--document",
        "birth_certificate",
        "--document",
        "photo",
    ])
    .unwrap();
    match args.command {
        Command::Session(SessionAction::Create(new)) => {
            assert_eq!(new.start, date!(2026 - 03 - 01));
            assert_eq!(new.end, date!(2026 - 04 - 30));
            assert_eq!(new.fee, 0);
            assert_eq!(new.documents, vec!["birth_certificate", "photo"]);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_seat_reservations_are_collected() {
    let args: Args = Args::try_parse_from([
        "admissions",
        "seat",
        "create",
        "3",
        "Grade 1",
        "--total",
        "40",
        "--reserved",
        "sibling=4",
        "--reserved",
        "staff=2",
    ])
    .unwrap();
    match args.command {
        Command::Seat(SeatAction::Create {
            session_id,
            total,
            waitlist,
            reserved,
            ..
        }) => {
            assert_eq!(session_id, 3);
            assert_eq!(total, 40);
            assert_eq!(waitlist, 0);
            assert_eq!(
                reserved,
                vec![(String::from("sibling"), 4), (String::from("staff"), 2)]
            );
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_bad_date_is_rejected_by_the_parser() {
    assert!(parse_date("2026-02-30").is_err());
    assert!(parse_date("10/03/2026").is_err());
    assert_eq!(parse_date(" 2026-03-10 ").unwrap(), date!(2026 - 03 - 10));
    assert!(Args::try_parse_from(["admissions", "session", "extend", "1", "tomorrow"]).is_err());
}

#[test]
fn test_reservation_parser() {
    assert_eq!(
        parse_reservation("sports = 3").unwrap(),
        (String::from("sports"), 3)
    );
    assert!(parse_reservation("sports").is_err());
    assert!(parse_reservation("=3").is_err());
    assert!(parse_reservation("sports=many").is_err());
}

#[test]
fn test_branch_commands_render_json() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let created: Value = run_json(
        &mut persistence,
        &["branch", "create", "nb", "North", "--primary"],
    );
    assert_eq!(created["code"], "NB");
    assert_eq!(created["is_primary"], true);

    let listed: Value = run_json(&mut persistence, &["branch", "list"]);
    assert_eq!(listed.as_array().unwrap().len(), 1);
}

#[test]
fn test_session_and_seat_commands() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let created: Value = run_json(
        &mut persistence,
        &[
            "session",
            "create",
            "--name",
            "Main Intake",
            "--academic-year",
            "2026-27",
            "--start",
            "2026-03-01",
            "--end",
            "2026-04-30",
            "--fee",
            "500",
        ],
    );
    assert_eq!(created["session"]["status"], "upcoming");
    let session_id: i64 = created["session"]["session_id"].as_i64().unwrap();
    let id: String = session_id.to_string();

    let seat: Value = run_json(
        &mut persistence,
        &[
            "seat",
            "create",
            &id,
            "Grade 1",
            "--total",
            "30",
            "--reserved",
            "staff=2",
        ],
    );
    assert_eq!(seat["available_seats"], 30);
    assert_eq!(seat["reserved_seats"]["staff"], 2);

    let opened: Value = run_json(&mut persistence, &["session", "status", &id, "open"]);
    assert_eq!(opened["session"]["status"], "open");

    let summary: Value = run_json(&mut persistence, &["session", "summary", &id]);
    assert_eq!(summary["total_seats"], 30);
    assert_eq!(summary["classes"].as_array().unwrap().len(), 1);

    let open_sessions: Value =
        run_json(&mut persistence, &["session", "list", "--status", "open"]);
    assert_eq!(open_sessions.as_array().unwrap().len(), 1);
}

#[test]
fn test_api_errors_surface_unchanged() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let args: Args =
        Args::try_parse_from(["admissions", "application", "show", "APP-20260310-0001"]).unwrap();
    let err: CliError = run(&mut persistence, &context(), args.command).unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::ResourceNotFound { .. })));

    let args: Args = Args::try_parse_from(["admissions", "application", "show", "42"]).unwrap();
    let err: CliError = run(&mut persistence, &context(), args.command).unwrap_err();
    assert!(matches!(err, CliError::Api(ApiError::ResourceNotFound { .. })));
}
