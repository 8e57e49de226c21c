//! Outgoing payload shaping for patient submissions.

use serde::Serialize;

use super::age;
use super::draft::{PatientDraft, VisitDraft};
use super::validate::{self, FormResult};
use crate::models::Vitals;

/// The shaped patient submission: flat demographics plus a one-element
/// `visits` array. The form's first-visit sub-draft never appears under its
/// own key.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub name: String,
    pub age: Option<u32>,
    pub sex: String,
    pub date_of_birth: String,
    pub address: String,
    pub mobile: String,
    pub email: String,
    pub reference_id: String,
    pub guardian_name: String,
    pub id_proof: String,
    pub occupation: String,
    pub diagnosis: String,
    pub provisional_diagnosis: String,
    pub clinical_history: String,
    pub family_history: String,
    pub visits: Vec<VisitPayload>,
}

/// One visit in an outgoing payload, vitals nested, fee numeric.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitPayload {
    pub date: String,
    pub vitals: Vitals,
    pub symptoms: String,
    pub prescription: String,
    pub fee: Option<f64>,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

impl PatientPayload {
    /// Validate the draft and shape it for submission. Age is recomputed
    /// from the date of birth; the stored value only survives for records
    /// without one.
    pub fn from_draft(draft: &PatientDraft) -> FormResult<Self> {
        validate::validate(draft)?;

        Ok(Self {
            name: draft.name.clone(),
            age: age::derive_age(&draft.date_of_birth).or(draft.age()),
            sex: draft.sex.clone(),
            date_of_birth: draft.date_of_birth.clone(),
            address: draft.address.clone(),
            mobile: draft.mobile.clone(),
            email: draft.email.clone(),
            reference_id: draft.reference_id.clone(),
            guardian_name: draft.guardian_name.clone(),
            id_proof: draft.id_proof.clone(),
            occupation: draft.occupation.clone(),
            diagnosis: draft.diagnosis.clone(),
            provisional_diagnosis: draft.provisional_diagnosis.clone(),
            clinical_history: draft.clinical_history.clone(),
            family_history: draft.family_history.clone(),
            visits: vec![VisitPayload::from_draft(&draft.first_visit)?],
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl VisitPayload {
    /// Shape a visit draft. The fee must be empty or a non-negative number.
    pub fn from_draft(draft: &VisitDraft) -> FormResult<Self> {
        Ok(Self {
            date: draft.date.clone(),
            vitals: draft.vitals.clone(),
            symptoms: draft.symptoms.clone(),
            prescription: draft.prescription.clone(),
            fee: validate::parse_fee(&draft.fee)?,
            lab_report_url: draft.lab_report_url.clone(),
            doctor_sign_url: draft.doctor_sign_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::validate::FormError;

    fn filled_draft() -> PatientDraft {
        let mut draft = PatientDraft::default();
        draft.name = "Asha".into();
        draft.mobile = "9876543210".into();
        draft.email = "asha@example.com".into();
        draft.set_date_of_birth("1991-03-10");
        draft.first_visit.date = "2024-02-01".into();
        draft.first_visit.vitals.height = "160".into();
        draft.first_visit.fee = "200".into();
        draft
    }

    #[test]
    fn test_payload_shape() {
        let payload = PatientPayload::from_draft(&filled_draft()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();

        assert_eq!(json["name"], "Asha");
        assert_eq!(json["visits"].as_array().unwrap().len(), 1);
        assert_eq!(json["visits"][0]["vitals"]["height"], "160");
        assert_eq!(json["visits"][0]["fee"], 200.0);
        // The sub-draft is folded into `visits`, not sent under its own key.
        assert!(json.get("firstVisit").is_none());
        assert!(json["visits"][0].get("height").is_none());
    }

    #[test]
    fn test_age_recomputed_from_dob() {
        let payload = PatientPayload::from_draft(&filled_draft()).unwrap();
        assert_eq!(
            payload.age,
            crate::forms::age::derive_age("1991-03-10"),
        );
    }

    #[test]
    fn test_empty_fee_serializes_null() {
        let mut draft = filled_draft();
        draft.first_visit.fee = "".into();

        let payload = PatientPayload::from_draft(&draft).unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert!(json["visits"][0]["fee"].is_null());
    }

    #[test]
    fn test_invalid_draft_shapes_nothing() {
        let mut draft = filled_draft();
        draft.first_visit.fee = "-5".into();
        assert_eq!(
            PatientPayload::from_draft(&draft),
            Err(FormError::InvalidFee)
        );
    }

    #[test]
    fn test_visit_payload_from_draft() {
        let mut draft = VisitDraft::default();
        draft.date = "2024-05-01".into();
        draft.fee = "20.50".into();
        draft.lab_report_url = "https://files.example/lab.pdf".into();

        let payload = VisitPayload::from_draft(&draft).unwrap();
        assert_eq!(payload.fee, Some(20.5));
        assert_eq!(payload.lab_report_url, "https://files.example/lab.pdf");
    }
}
