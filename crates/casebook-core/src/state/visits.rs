//! Visit-manager form state: modes, upload slots, delete confirmation.

use crate::forms::VisitDraft;
use crate::models::NormalizedVisit;

/// What the visit form is currently doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VisitFormMode {
    #[default]
    Idle,
    Adding,
    /// Editing the visit with this identity
    Editing(String),
}

/// The two independent upload controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSlot {
    LabReport,
    Signature,
}

/// Form state for managing one patient's visits. Upload busy flags are
/// tracked per slot so the two controls disable independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitSession {
    pub mode: VisitFormMode,
    pub draft: VisitDraft,
    pub uploading_lab: bool,
    pub uploading_signature: bool,
    /// Inline message from the last failed upload
    pub upload_error: Option<String>,
    /// Visit awaiting delete confirmation
    pub pending_delete: Option<String>,
}

impl VisitSession {
    /// Open a blank draft for a new visit.
    pub fn start_add(&mut self) {
        self.mode = VisitFormMode::Adding;
        self.draft = VisitDraft::default();
    }

    /// Open a draft pre-populated from an existing visit. A legacy visit
    /// without an identity saves as a new one, so it opens in add mode.
    pub fn start_edit(&mut self, visit: &NormalizedVisit) {
        self.mode = match &visit.id {
            Some(id) => VisitFormMode::Editing(id.clone()),
            None => VisitFormMode::Adding,
        };
        self.draft = VisitDraft::from_visit(visit);
    }

    /// Discard the form: draft, mode, upload flags, error, confirmation.
    pub fn reset_form(&mut self) {
        *self = Self::default();
    }

    /// Mark a slot busy and clear any stale inline error.
    pub fn begin_upload(&mut self, slot: UploadSlot) {
        self.upload_error = None;
        match slot {
            UploadSlot::LabReport => self.uploading_lab = true,
            UploadSlot::Signature => self.uploading_signature = true,
        }
    }

    /// Settle an upload. Success stores the URL into the matching draft
    /// field; failure records the inline message and leaves the field
    /// untouched. The busy flag drops either way.
    pub fn finish_upload(&mut self, slot: UploadSlot, outcome: Result<String, String>) {
        match slot {
            UploadSlot::LabReport => self.uploading_lab = false,
            UploadSlot::Signature => self.uploading_signature = false,
        }
        match outcome {
            Ok(url) => match slot {
                UploadSlot::LabReport => self.draft.lab_report_url = url,
                UploadSlot::Signature => self.draft.doctor_sign_url = url,
            },
            Err(message) => self.upload_error = Some(message),
        }
    }

    /// Stage a visit for deletion pending confirmation.
    pub fn request_delete(&mut self, visit_id: &str) {
        self.pending_delete = Some(visit_id.to_string());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Discard the open draft when the visit it was editing is gone.
    pub fn clear_deleted(&mut self, visit_id: &str) {
        if matches!(&self.mode, VisitFormMode::Editing(id) if id == visit_id) {
            self.reset_form();
        }
    }
}
