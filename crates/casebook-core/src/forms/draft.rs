//! Working drafts for the patient form and the visit form.

use crate::models::{NormalizedVisit, Patient, Vitals};

use super::age;

/// A visit being edited, every field held as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitDraft {
    pub date: String,
    pub vitals: Vitals,
    pub symptoms: String,
    pub prescription: String,
    /// Fee text; validated and parsed only at save time
    pub fee: String,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

impl VisitDraft {
    /// Pre-populate from an existing visit.
    pub fn from_visit(visit: &NormalizedVisit) -> Self {
        Self {
            date: visit.date.clone(),
            vitals: visit.vitals.clone(),
            symptoms: visit.symptoms.clone(),
            prescription: visit.prescription.clone(),
            fee: visit.fee.map(|f| f.to_string()).unwrap_or_default(),
            lab_report_url: visit.lab_report_url.clone(),
            doctor_sign_url: visit.doctor_sign_url.clone(),
        }
    }
}

/// The patient form's working draft: flat demographic and clinical fields
/// plus one nested first-visit sub-draft.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientDraft {
    pub name: String,
    age: Option<u32>,
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
    /// First-visit details captured on the same form
    pub first_visit: VisitDraft,
}

impl PatientDraft {
    /// Build the draft for a selection change. The draft is replaced
    /// wholesale, never merged: `None` yields the blank create-mode draft,
    /// a patient fills every field and loads the first visit into the
    /// sub-draft.
    pub fn for_patient(patient: Option<&Patient>) -> Self {
        let patient = match patient {
            Some(p) => p,
            None => return Self::default(),
        };

        let first_visit = patient
            .visit_history()
            .first()
            .map(VisitDraft::from_visit)
            .unwrap_or_default();

        Self {
            name: patient.name.clone(),
            age: patient.age,
            sex: patient.sex.clone(),
            date_of_birth: patient.date_of_birth.clone(),
            address: patient.address.clone(),
            mobile: patient.mobile.clone(),
            email: patient.email.clone(),
            reference_id: patient.reference_id.clone(),
            guardian_name: patient.guardian_name.clone(),
            id_proof: patient.id_proof.clone(),
            occupation: patient.occupation.clone(),
            diagnosis: patient.diagnosis.clone(),
            provisional_diagnosis: patient.provisional_diagnosis.clone(),
            clinical_history: patient.clinical_history.clone(),
            family_history: patient.family_history.clone(),
            first_visit,
        }
    }

    /// The displayed age. Read-only; it tracks `date_of_birth`.
    pub fn age(&self) -> Option<u32> {
        self.age
    }

    /// Store the date of birth and recompute the displayed age.
    pub fn set_date_of_birth(&mut self, dob: &str) {
        self.date_of_birth = dob.to_string();
        self.age = age::derive_age(dob);
    }

    /// Back to the blank create-mode draft.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Visit;

    fn patient_with_visit() -> Patient {
        serde_json::from_str(
            r#"{
                "_id": "p1",
                "name": "Asha",
                "age": 33,
                "sex": "F",
                "dateOfBirth": "1991-03-10",
                "mobile": "9876543210",
                "visits": [{
                    "_id": "v1",
                    "date": "2024-02-01",
                    "vitals": { "height": "160", "bp": "110/70" },
                    "symptoms": "cough",
                    "fee": 200
                }]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_for_patient_loads_every_field() {
        let draft = PatientDraft::for_patient(Some(&patient_with_visit()));

        assert_eq!(draft.name, "Asha");
        assert_eq!(draft.age(), Some(33));
        assert_eq!(draft.date_of_birth, "1991-03-10");
        assert_eq!(draft.first_visit.date, "2024-02-01");
        assert_eq!(draft.first_visit.vitals.height, "160");
        assert_eq!(draft.first_visit.symptoms, "cough");
        assert_eq!(draft.first_visit.fee, "200");
    }

    #[test]
    fn test_for_patient_none_is_blank() {
        assert_eq!(PatientDraft::for_patient(None), PatientDraft::default());
    }

    #[test]
    fn test_switching_selection_replaces_stale_fields() {
        let mut draft = PatientDraft::for_patient(Some(&patient_with_visit()));
        draft.diagnosis = "edited but unsaved".into();

        let other = Patient {
            id: "p2".into(),
            name: "Ravi".into(),
            ..Default::default()
        };
        draft = PatientDraft::for_patient(Some(&other));

        assert_eq!(draft.name, "Ravi");
        assert_eq!(draft.diagnosis, "");
        assert_eq!(draft.first_visit, VisitDraft::default());
    }

    #[test]
    fn test_set_date_of_birth_recomputes_age() {
        let mut draft = PatientDraft::default();
        draft.set_date_of_birth("1990-01-01");
        assert!(draft.age().is_some());

        draft.set_date_of_birth("");
        assert_eq!(draft.age(), None);
    }

    #[test]
    fn test_visit_draft_formats_fee() {
        let visit = Visit {
            fee: Some(20.5),
            ..Default::default()
        };
        assert_eq!(VisitDraft::from_visit(&visit.normalized()).fee, "20.5");

        let visit = Visit {
            fee: Some(200.0),
            ..Default::default()
        };
        assert_eq!(VisitDraft::from_visit(&visit.normalized()).fee, "200");

        let visit = Visit::default();
        assert_eq!(VisitDraft::from_visit(&visit.normalized()).fee, "");
    }

    #[test]
    fn test_clear() {
        let mut draft = PatientDraft::for_patient(Some(&patient_with_visit()));
        draft.clear();
        assert_eq!(draft, PatientDraft::default());
    }
}
