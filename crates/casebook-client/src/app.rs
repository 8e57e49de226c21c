//! Async application driver.
//!
//! Owns the state coordinator, the HTTP gateway, and the token store, and
//! exposes the operations a host UI calls. Every network call is a discrete
//! suspend point; nothing is cancelled once issued, so visit mutations and
//! uploads carry the generation they started under and land as no-ops when
//! the view has moved on.

use std::path::PathBuf;

use casebook_core::forms::{PatientPayload, VisitPayload};
use casebook_core::state::{AppState, UploadSlot, VisitFormMode};
use tracing::{info, warn};

use crate::gateway::{ApiClient, ApiError};
use crate::token::TokenStore;

/// How long a case-sheet PDF stays on disk before cleanup.
const CASE_SHEET_TTL: std::time::Duration = std::time::Duration::from_secs(30);

/// Fallback shown when the print endpoint fails without a message.
pub const CASE_SHEET_ERROR: &str = "Unable to generate case sheet.";

/// The driving object behind the host UI.
pub struct App {
    pub state: AppState,
    client: ApiClient,
    tokens: TokenStore,
}

impl App {
    /// Build the app against a base URL and data directory. A token left
    /// over from a previous session authenticates immediately.
    pub fn new(base_url: &str, data_dir: PathBuf) -> Result<Self, ApiError> {
        let tokens = TokenStore::new(&data_dir);
        let stored = tokens.load();

        let mut client = ApiClient::new(base_url)?;
        client.set_token(stored.clone());

        Ok(Self {
            state: AppState::new(stored.is_some()),
            client,
            tokens,
        })
    }

    // =========================================================================
    // Session
    // =========================================================================

    /// Store the token handed back by the external login flow, open the
    /// gate, and load the roster.
    pub async fn login(&mut self, token: &str) -> Result<(), ApiError> {
        if let Err(e) = self.tokens.save(token) {
            warn!("Failed to persist session token: {}", e);
        }
        self.client.set_token(Some(token.to_string()));
        self.state.login();
        info!("Logged in");
        self.refresh_patients().await
    }

    /// Drop the stored token and everything the session accumulated.
    pub fn logout(&mut self) {
        self.tokens.clear();
        self.client.set_token(None);
        self.state.logout();
        info!("Logged out");
    }

    // =========================================================================
    // Patients
    // =========================================================================

    /// Wholesale reload of the patient collection.
    pub async fn refresh_patients(&mut self) -> Result<(), ApiError> {
        let patients = self.client.list_patients().await?;
        info!("Loaded {} patients", patients.len());
        self.state.set_patients(patients);
        Ok(())
    }

    /// Submit the patient form: POST in create mode, PUT against the
    /// selected patient in edit mode. Either way the selection clears, the
    /// draft resets, and the collection reloads from the server.
    pub async fn submit_patient_form(&mut self) -> Result<(), crate::ClientError> {
        let payload = PatientPayload::from_draft(&self.state.form)?;

        match self.state.selected.as_ref().map(|p| p.id.clone()) {
            Some(id) => {
                self.client.update_patient(&id, &payload).await?;
            }
            None => {
                self.client.create_patient(&payload).await?;
            }
        }

        self.state.clear_selection();
        self.refresh_patients().await?;
        Ok(())
    }

    /// Delete a patient, clear every pointer that referenced it, and
    /// reload the collection.
    pub async fn delete_patient(&mut self, id: &str) -> Result<(), ApiError> {
        self.client.delete_patient(id).await?;
        self.state.apply_patient_deleted(id);
        self.refresh_patients().await
    }

    // =========================================================================
    // Visits
    // =========================================================================

    /// Save the open visit draft: add in adding mode, update in editing
    /// mode. The server's reply is the whole updated patient, applied
    /// through the generation guard; a current result also closes the
    /// visit form.
    pub async fn save_visit(&mut self) -> Result<(), crate::ClientError> {
        let patient_id = match self.state.visit_patient.as_ref() {
            Some(p) => p.id.clone(),
            None => return Ok(()),
        };
        let payload = VisitPayload::from_draft(&self.state.visit_form.draft)?;
        let generation = self.state.generation();

        let fresh = match self.state.visit_form.mode.clone() {
            VisitFormMode::Editing(visit_id) => {
                self.client
                    .update_visit(&patient_id, &visit_id, &payload)
                    .await?
            }
            _ => self.client.add_visit(&patient_id, &payload).await?,
        };

        if self.state.apply_visit_result(generation, fresh) {
            self.state.visit_form.reset_form();
        }
        Ok(())
    }

    /// Issue the delete staged by `request_delete`, if any. The draft is
    /// discarded when it was editing the deleted visit.
    pub async fn confirm_delete_visit(&mut self) -> Result<(), ApiError> {
        let patient_id = match self.state.visit_patient.as_ref() {
            Some(p) => p.id.clone(),
            None => return Ok(()),
        };
        let visit_id = match self.state.visit_form.pending_delete.take() {
            Some(id) => id,
            None => return Ok(()),
        };
        let generation = self.state.generation();

        let fresh = self.client.delete_visit(&patient_id, &visit_id).await?;

        if self.state.apply_visit_result(generation, fresh) {
            self.state.visit_form.clear_deleted(&visit_id);
        }
        Ok(())
    }

    /// Upload a file into one of the two slots of the open visit draft.
    /// Success stores the returned URL into the draft; failure records the
    /// inline message and leaves the field untouched. Results landing
    /// after the visit view switched are dropped.
    pub async fn upload(&mut self, slot: UploadSlot, path: &str) -> Result<(), ApiError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::Server(format!("Cannot read {}: {}", path, e)))?;
        let file_name = PathBuf::from(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        let generation = self.state.generation();
        self.state.visit_form.begin_upload(slot);

        let outcome = match slot {
            UploadSlot::LabReport => self.client.upload_lab_report(&file_name, bytes).await,
            UploadSlot::Signature => self.client.upload_signature(&file_name, bytes).await,
        };

        if generation != self.state.generation() {
            return Ok(());
        }
        self.state
            .visit_form
            .finish_upload(slot, outcome.map_err(|e| upload_failure_message(slot, &e)));
        Ok(())
    }

    // =========================================================================
    // Case sheet
    // =========================================================================

    /// Fetch the case-sheet PDF, park it in the temp directory for the
    /// host to open, and schedule its removal. The temp file is the
    /// object-URL of this client: released after a fixed delay whether or
    /// not the viewer is still open.
    pub async fn print_case_sheet(&self, patient_id: &str) -> Result<PathBuf, ApiError> {
        let bytes = self.client.fetch_case_sheet(patient_id).await?;

        let path = std::env::temp_dir().join(format!("casebook-{}.pdf", uuid::Uuid::new_v4()));
        std::fs::write(&path, &bytes)
            .map_err(|e| ApiError::Server(format!("Cannot write case sheet: {}", e)))?;
        info!("Case sheet for {} written to {:?}", patient_id, path);

        let cleanup = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(CASE_SHEET_TTL).await;
            let _ = std::fs::remove_file(&cleanup);
        });

        Ok(path)
    }
}

/// Inline message for a failed upload: the server's `message` when it sent
/// one, else the slot's stock wording.
fn upload_failure_message(slot: UploadSlot, error: &ApiError) -> String {
    match error {
        ApiError::Server(message) if !message.is_empty() && message != "request failed" => {
            message.clone()
        }
        _ => match slot {
            UploadSlot::LabReport => "Lab report upload failed".to_string(),
            UploadSlot::Signature => "Signature upload failed".to_string(),
        },
    }
}

/// User-facing message for a failed print.
pub fn case_sheet_failure_message(error: &ApiError) -> String {
    match error {
        ApiError::Server(message) if !message.is_empty() && message != "request failed" => {
            message.clone()
        }
        _ => CASE_SHEET_ERROR.to_string(),
    }
}
