// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{ApplicationState, FixedClock};
use admissions_audit::{Actor, Cause};
use admissions_domain::{
    AdmissionApplication, AdmissionDecision, ApplicationStatus, DecisionType, NewDecision, Offer,
    ParentDetails, ParentRelation, StudentDetails, TenantId,
};
use time::macros::{date, datetime};

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("officer-1"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Officer request"))
}

pub fn create_test_clock() -> FixedClock {
    FixedClock(datetime!(2026-03-10 10:30 UTC))
}

pub fn create_test_application(status: ApplicationStatus) -> AdmissionApplication {
    AdmissionApplication {
        application_id: Some(11),
        tenant_id: TenantId::new(1),
        session_id: 3,
        branch_id: None,
        enquiry_id: None,
        application_number: String::from("APP-20260301-0001"),
        student: StudentDetails {
            first_name: String::from("Asha"),
            last_name: String::from("Rao"),
            date_of_birth: Some(date!(2020 - 05 - 14)),
            gender: None,
            class_applied: String::from("Grade 1"),
            previous_school: None,
            previous_marks: Some(88.0),
            address: None,
        },
        parents: vec![ParentDetails {
            relation: ParentRelation::Mother,
            name: String::from("Meera Rao"),
            phone: Some(String::from("555-0100")),
            email: None,
            occupation: None,
        }],
        status,
        submitted_at: None,
        approved_at: None,
        approved_by: None,
        enrolled_at: None,
        waitlist_position: None,
        fee_paid: false,
        remarks: None,
        created_at: datetime!(2026-03-01 09:00 UTC),
        updated_at: datetime!(2026-03-01 09:00 UTC),
        version: 1,
    }
}

pub fn create_test_decision(decision_type: DecisionType, offer: Offer) -> AdmissionDecision {
    let input: NewDecision = match decision_type {
        DecisionType::Approved => {
            NewDecision::parse("approved", Some(date!(2026 - 03 - 05)), None, None, None)
        }
        DecisionType::Waitlisted => {
            NewDecision::parse("waitlisted", Some(date!(2026 - 03 - 05)), None, Some(4), None)
        }
        DecisionType::Rejected => NewDecision::parse(
            "rejected",
            Some(date!(2026 - 03 - 05)),
            None,
            None,
            Some(String::from("Incomplete documents")),
        ),
    }
    .unwrap();

    let mut decision: AdmissionDecision = AdmissionDecision::from_new(
        TenantId::new(1),
        11,
        input,
        "officer-1",
        datetime!(2026-03-05 12:00 UTC),
    );
    decision.decision_id = Some(21);
    decision.offer = offer;
    decision
}

pub fn state_with(status: ApplicationStatus, decision: Option<AdmissionDecision>) -> ApplicationState {
    let mut application = create_test_application(status);
    if let Some(d) = &decision {
        application.waitlist_position = d.waitlist_position;
    }
    ApplicationState::new(application, decision)
}

pub fn accepted_offer() -> Offer {
    Offer {
        letter_url: Some(String::from("https://letters.example/11")),
        valid_until: Some(date!(2026 - 04 - 04)),
        accepted: true,
        accepted_at: Some(datetime!(2026-03-08 08:00 UTC)),
    }
}
