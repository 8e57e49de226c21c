//! Application-state coordinator.
//!
//! Owns the canonical patient collection and the transient view pointers,
//! and reconciles server responses back into every open view.

use crate::forms::PatientDraft;
use crate::models::Patient;
use crate::search;

use super::session::SessionState;
use super::visits::VisitSession;

/// The authoritative in-memory store behind every view.
///
/// The collection is loaded wholesale on login and after any patient
/// create/update/delete; visit mutations patch the one affected row from
/// the server's response instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub session: SessionState,
    pub patients: Vec<Patient>,
    /// Patient open in the edit form
    pub selected: Option<Patient>,
    /// Patient open in the detail view
    pub viewed: Option<Patient>,
    /// Patient bound to the visit manager
    pub visit_patient: Option<Patient>,
    /// Highlighted list row
    pub active_patient_id: Option<String>,
    /// Patient form draft
    pub form: PatientDraft,
    /// Visit form state
    pub visit_form: VisitSession,
    generation: u64,
}

impl AppState {
    pub fn new(token_present: bool) -> Self {
        Self {
            session: SessionState::from_token_presence(token_present),
            ..Default::default()
        }
    }

    /// Replace the whole collection. Open views keep their bound copies;
    /// the mutation paths refresh those separately.
    pub fn set_patients(&mut self, patients: Vec<Patient>) {
        self.patients = patients;
    }

    /// Filtered projection of the collection for the list view.
    pub fn filtered(&self, query: &str) -> Vec<&Patient> {
        search::filter_patients(&self.patients, query)
    }

    pub fn find(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    /// Stale-response guard. Every async visit mutation captures the value
    /// at launch; results only apply while it still matches.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Open a patient in the edit form; the draft is replaced wholesale.
    pub fn select_for_edit(&mut self, id: &str) {
        if let Some(patient) = self.find(id).cloned() {
            self.active_patient_id = Some(patient.id.clone());
            self.form = PatientDraft::for_patient(Some(&patient));
            self.selected = Some(patient);
        }
    }

    /// Back to create mode with a blank draft.
    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.form = PatientDraft::for_patient(None);
    }

    /// Open a patient in the detail view.
    pub fn view(&mut self, id: &str) {
        if let Some(patient) = self.find(id).cloned() {
            self.active_patient_id = Some(patient.id.clone());
            self.viewed = Some(patient);
        }
    }

    pub fn close_view(&mut self) {
        self.viewed = None;
    }

    /// Highlight a list row.
    pub fn set_active(&mut self, id: &str) {
        self.active_patient_id = Some(id.to_string());
    }

    // =========================================================================
    // Visit manager binding
    // =========================================================================

    /// Bind the visit manager to a patient. Rebinding bumps the generation,
    /// so anything still in flight for the previous patient lands as a
    /// no-op.
    pub fn open_visit_manager(&mut self, id: &str) {
        if let Some(patient) = self.find(id).cloned() {
            self.active_patient_id = Some(patient.id.clone());
            self.visit_patient = Some(patient);
            self.visit_form = VisitSession::default();
            self.generation = self.generation.wrapping_add(1);
        }
    }

    pub fn close_visit_manager(&mut self) {
        self.visit_patient = None;
        self.visit_form = VisitSession::default();
        self.generation = self.generation.wrapping_add(1);
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Patch the matching row by identity and refresh every open copy, so
    /// no view shows pre-mutation data.
    pub fn apply_patient_update(&mut self, fresh: Patient) {
        if let Some(row) = self.patients.iter_mut().find(|p| p.id == fresh.id) {
            *row = fresh.clone();
        }
        if self.selected.as_ref().map_or(false, |p| p.id == fresh.id) {
            self.form = PatientDraft::for_patient(Some(&fresh));
            self.selected = Some(fresh.clone());
        }
        if self.viewed.as_ref().map_or(false, |p| p.id == fresh.id) {
            self.viewed = Some(fresh.clone());
        }
        if self.visit_patient.as_ref().map_or(false, |p| p.id == fresh.id) {
            self.visit_patient = Some(fresh);
        }
    }

    /// Drop the row and clear exactly the pointers that referenced the
    /// deleted identity; everything else is untouched.
    pub fn apply_patient_deleted(&mut self, id: &str) {
        self.patients.retain(|p| p.id != id);

        if self.selected.as_ref().map_or(false, |p| p.id == id) {
            self.clear_selection();
        }
        if self.viewed.as_ref().map_or(false, |p| p.id == id) {
            self.viewed = None;
        }
        if self.visit_patient.as_ref().map_or(false, |p| p.id == id) {
            self.close_visit_manager();
        }
        if self.active_patient_id.as_deref() == Some(id) {
            self.active_patient_id = None;
        }
    }

    /// Apply a server-fresh patient coming back from a visit mutation.
    /// Returns false when the result was stale and discarded.
    pub fn apply_visit_result(&mut self, generation: u64, fresh: Patient) -> bool {
        if generation != self.generation {
            return false;
        }
        self.apply_patient_update(fresh);
        true
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub fn login(&mut self) {
        self.session.login();
    }

    /// Drop everything the session accumulated. The generation bump turns
    /// any in-flight response into a no-op.
    pub fn logout(&mut self) {
        self.session.logout();
        self.patients.clear();
        self.selected = None;
        self.viewed = None;
        self.visit_patient = None;
        self.active_patient_id = None;
        self.form = PatientDraft::default();
        self.visit_form = VisitSession::default();
        self.generation = self.generation.wrapping_add(1);
    }
}
