//! Golden tests for the patient form: age derivation, validation, and
//! payload shaping against known cases.

use casebook_core::forms::{age_on, validate, FormError, PatientDraft, PatientPayload};
use chrono::NaiveDate;

struct AgeCase {
    id: &'static str,
    dob: &'static str,
    today: (i32, u32, u32),
    expected: Option<u32>,
}

fn age_cases() -> Vec<AgeCase> {
    vec![
        AgeCase {
            id: "day-before-birthday",
            dob: "2000-06-15",
            today: (2024, 6, 14),
            expected: Some(23),
        },
        AgeCase {
            id: "on-birthday",
            dob: "2000-06-15",
            today: (2024, 6, 15),
            expected: Some(24),
        },
        AgeCase {
            id: "day-after-birthday",
            dob: "2000-06-15",
            today: (2024, 6, 16),
            expected: Some(24),
        },
        AgeCase {
            id: "year-end-not-reached",
            dob: "2000-12-31",
            today: (2024, 12, 30),
            expected: Some(23),
        },
        AgeCase {
            id: "newborn",
            dob: "2024-01-10",
            today: (2024, 6, 1),
            expected: Some(0),
        },
        AgeCase {
            id: "empty-dob",
            dob: "",
            today: (2024, 1, 1),
            expected: None,
        },
        AgeCase {
            id: "unparseable-dob",
            dob: "15/06/2000",
            today: (2024, 1, 1),
            expected: None,
        },
        AgeCase {
            id: "future-dob-clamps",
            dob: "2030-01-01",
            today: (2024, 1, 1),
            expected: Some(0),
        },
    ]
}

#[test]
fn test_age_golden_cases() {
    for case in age_cases() {
        let (y, m, d) = case.today;
        let today = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        assert_eq!(
            age_on(case.dob, today),
            case.expected,
            "age case failed: {}",
            case.id
        );
    }
}

struct ValidationCase {
    id: &'static str,
    name: &'static str,
    mobile: &'static str,
    email: &'static str,
    fee: &'static str,
    expected: Result<(), FormError>,
}

fn validation_cases() -> Vec<ValidationCase> {
    vec![
        ValidationCase {
            id: "all-valid",
            name: "Asha",
            mobile: "9876543210",
            email: "a@b.com",
            fee: "20.50",
            expected: Ok(()),
        },
        ValidationCase {
            id: "optional-fields-empty",
            name: "Asha",
            mobile: "9876543210",
            email: "",
            fee: "",
            expected: Ok(()),
        },
        ValidationCase {
            id: "blank-name",
            name: "   ",
            mobile: "9876543210",
            email: "",
            fee: "",
            expected: Err(FormError::NameRequired),
        },
        ValidationCase {
            id: "mobile-too-short",
            name: "Asha",
            mobile: "12345",
            email: "",
            fee: "",
            expected: Err(FormError::InvalidMobile),
        },
        ValidationCase {
            id: "mobile-too-long",
            name: "Asha",
            mobile: "12345678901",
            email: "",
            fee: "",
            expected: Err(FormError::InvalidMobile),
        },
        ValidationCase {
            id: "email-missing-tld",
            name: "Asha",
            mobile: "9876543210",
            email: "a@b",
            fee: "",
            expected: Err(FormError::InvalidEmail),
        },
        ValidationCase {
            id: "negative-fee",
            name: "Asha",
            mobile: "9876543210",
            email: "",
            fee: "-5",
            expected: Err(FormError::InvalidFee),
        },
        ValidationCase {
            id: "zero-fee",
            name: "Asha",
            mobile: "9876543210",
            email: "",
            fee: "0",
            expected: Ok(()),
        },
    ]
}

fn draft_for(case: &ValidationCase) -> PatientDraft {
    let mut draft = PatientDraft::default();
    draft.name = case.name.into();
    draft.mobile = case.mobile.into();
    draft.email = case.email.into();
    draft.first_visit.fee = case.fee.into();
    draft
}

#[test]
fn test_validation_golden_cases() {
    for case in validation_cases() {
        assert_eq!(
            validate(&draft_for(&case)),
            case.expected,
            "validation case failed: {}",
            case.id
        );
    }
}

#[test]
fn test_validation_message_wording() {
    assert_eq!(FormError::NameRequired.to_string(), "name required");
    assert_eq!(
        FormError::InvalidMobile.to_string(),
        "mobile must be exactly 10 digits"
    );
}

#[test]
fn test_shaped_payload_json() {
    let mut draft = PatientDraft::default();
    draft.name = "Asha Nair".into();
    draft.mobile = "9876543210".into();
    draft.set_date_of_birth("1991-03-10");
    draft.first_visit.date = "2024-02-01".into();
    draft.first_visit.vitals.height = "160".into();
    draft.first_visit.vitals.bp = "110/70".into();
    draft.first_visit.symptoms = "cough".into();
    draft.first_visit.fee = "200".into();

    let payload = PatientPayload::from_draft(&draft).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&payload.to_json().unwrap()).unwrap();

    // Flat demographics plus a one-element visits array.
    assert_eq!(json["name"], "Asha Nair");
    assert_eq!(json["dateOfBirth"], "1991-03-10");
    let visits = json["visits"].as_array().unwrap();
    assert_eq!(visits.len(), 1);

    // Vitals nest under `vitals`; the fee leaves as a number.
    assert_eq!(visits[0]["vitals"]["height"], "160");
    assert_eq!(visits[0]["vitals"]["bp"], "110/70");
    assert_eq!(visits[0]["fee"], 200.0);

    // The first-visit sub-draft never travels under its own key.
    assert!(json.get("firstVisit").is_none());
}

#[test]
fn test_invalid_draft_produces_no_payload() {
    let mut draft = PatientDraft::default();
    draft.name = "Asha".into();
    draft.mobile = "123".into();

    assert_eq!(
        PatientPayload::from_draft(&draft),
        Err(FormError::InvalidMobile)
    );
}
