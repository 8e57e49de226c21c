//! Casebook Client Library
//!
//! The asynchronous edge of the casebook patient-records client: the HTTP
//! gateway to the clinic API, file-backed session storage, the application
//! driver, and a UniFFI surface so a host UI can drive the whole client.
//!
//! # Architecture
//!
//! ```text
//!   Host UI (Swift/Kotlin via UniFFI)
//!        │
//!        ▼
//!   Casebook object ── tokio Runtime ── Mutex<App>
//!                                          │
//!                       ┌──────────────────┼──────────────────┐
//!                       ▼                  ▼                  ▼
//!                  AppState           ApiClient          TokenStore
//!              (casebook-core)     (reqwest, remote)    (data dir file)
//! ```
//!
//! # Modules
//!
//! - [`gateway`]: HTTP client for the clinic API
//! - [`token`]: Durable session-token file
//! - [`app`]: Async driver tying state, gateway, and storage together

pub mod app;
pub mod gateway;
pub mod token;

// Re-export commonly used types
pub use app::App;
pub use gateway::{ApiClient, ApiError, DEFAULT_BASE_URL};
pub use token::TokenStore;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use casebook_core::forms::{FormError, PatientDraft, VisitDraft};
use casebook_core::models::{NormalizedVisit, Patient, Vitals};
use casebook_core::state::UploadSlot;

/// Form or API failure from a mixed operation.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum CasebookError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Api error: {0}")]
    ApiFailure(String),

    #[error("Print error: {0}")]
    PrintError(String),
}

impl From<FormError> for CasebookError {
    fn from(e: FormError) -> Self {
        CasebookError::ValidationError(e.to_string())
    }
}

impl From<ApiError> for CasebookError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Unauthorized => CasebookError::NotAuthenticated,
            ApiError::NotFound(what) => CasebookError::NotFound(what),
            other => CasebookError::ApiFailure(other.to_string()),
        }
    }
}

impl From<ClientError> for CasebookError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Form(form) => form.into(),
            ClientError::Api(api) => api.into(),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for CasebookError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        CasebookError::ApiFailure(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the client against a base URL and data directory.
#[uniffi::export]
pub fn open_workspace(base_url: String, data_dir: String) -> Result<Arc<Casebook>, CasebookError> {
    Casebook::open(&base_url, PathBuf::from(data_dir))
}

/// Open the client with the compiled-in API URL and the default data
/// directory under the user's home.
#[uniffi::export]
pub fn open_workspace_default() -> Result<Arc<Casebook>, CasebookError> {
    Casebook::open(DEFAULT_BASE_URL, TokenStore::default_data_dir())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe client wrapper for FFI. Owns the async runtime; every
/// operation takes the app lock and drives the driver to completion.
#[derive(uniffi::Object)]
pub struct Casebook {
    runtime: tokio::runtime::Runtime,
    app: Mutex<App>,
}

impl Casebook {
    fn open(base_url: &str, data_dir: PathBuf) -> Result<Arc<Self>, CasebookError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| CasebookError::ApiFailure(format!("Failed to start runtime: {}", e)))?;
        let app = App::new(base_url, data_dir)?;
        Ok(Arc::new(Self {
            runtime,
            app: Mutex::new(app),
        }))
    }
}

#[uniffi::export]
impl Casebook {
    // =========================================================================
    // Session
    // =========================================================================

    pub fn is_authenticated(&self) -> Result<bool, CasebookError> {
        let app = self.app.lock()?;
        Ok(app.state.session.is_authenticated())
    }

    /// Store the token from the external login flow and load the roster.
    pub fn login(&self, token: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.login(&token))?;
        Ok(())
    }

    pub fn logout(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.logout();
        Ok(())
    }

    // =========================================================================
    // Patient List
    // =========================================================================

    /// Reload the whole collection from the server.
    pub fn refresh_patients(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.refresh_patients())?;
        Ok(())
    }

    pub fn patients(&self) -> Result<Vec<FfiPatient>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app.state.patients.iter().map(FfiPatient::from).collect())
    }

    /// Filtered projection of the collection for the list view.
    pub fn filter_patients(&self, query: String) -> Result<Vec<FfiPatient>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app
            .state
            .filtered(&query)
            .into_iter()
            .map(FfiPatient::from)
            .collect())
    }

    // =========================================================================
    // Selection Intents
    // =========================================================================

    pub fn select_for_edit(&self, patient_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.select_for_edit(&patient_id);
        Ok(())
    }

    pub fn clear_selection(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.clear_selection();
        Ok(())
    }

    pub fn view_patient(&self, patient_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.view(&patient_id);
        Ok(())
    }

    pub fn close_view(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.close_view();
        Ok(())
    }

    pub fn viewed_patient(&self) -> Result<Option<FfiPatient>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app.state.viewed.as_ref().map(FfiPatient::from))
    }

    pub fn set_active(&self, patient_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.set_active(&patient_id);
        Ok(())
    }

    pub fn active_patient_id(&self) -> Result<Option<String>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app.state.active_patient_id.clone())
    }

    // =========================================================================
    // Patient Form
    // =========================================================================

    pub fn patient_form(&self) -> Result<FfiPatientDraft, CasebookError> {
        let app = self.app.lock()?;
        Ok(FfiPatientDraft::from(&app.state.form))
    }

    /// Replace the working draft with the host's edits. The age is not an
    /// input; it recomputes from the date of birth.
    pub fn set_patient_form(&self, draft: FfiPatientDraft) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.form = draft.into();
        Ok(())
    }

    pub fn derived_age(&self) -> Result<Option<u32>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app.state.form.age())
    }

    /// Validate, shape, and submit the draft; create or update depending
    /// on the selection. The collection reloads on success.
    pub fn submit_patient_form(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.submit_patient_form())?;
        Ok(())
    }

    pub fn delete_patient(&self, patient_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.delete_patient(&patient_id))?;
        Ok(())
    }

    // =========================================================================
    // Visit Manager
    // =========================================================================

    pub fn open_visit_manager(&self, patient_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.open_visit_manager(&patient_id);
        Ok(())
    }

    pub fn close_visit_manager(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.close_visit_manager();
        Ok(())
    }

    /// Visit history of the patient bound to the manager, legacy shapes
    /// already resolved.
    pub fn visit_history(&self) -> Result<Vec<FfiVisit>, CasebookError> {
        let app = self.app.lock()?;
        Ok(app
            .state
            .visit_patient
            .as_ref()
            .map(|p| p.visit_history().iter().map(FfiVisit::from).collect())
            .unwrap_or_default())
    }

    pub fn start_add_visit(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.visit_form.start_add();
        Ok(())
    }

    pub fn start_edit_visit(&self, visit_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        let visit = app
            .state
            .visit_patient
            .as_ref()
            .and_then(|p| {
                p.visit_history()
                    .into_iter()
                    .find(|v| v.id.as_deref() == Some(visit_id.as_str()))
            })
            .ok_or_else(|| CasebookError::NotFound(format!("visit {}", visit_id)))?;
        app.state.visit_form.start_edit(&visit);
        Ok(())
    }

    pub fn cancel_visit_form(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.visit_form.reset_form();
        Ok(())
    }

    pub fn visit_form(&self) -> Result<FfiVisitForm, CasebookError> {
        let app = self.app.lock()?;
        Ok(FfiVisitForm::from(&app.state.visit_form))
    }

    /// Replace the open visit draft with the host's edits.
    pub fn set_visit_draft(&self, draft: FfiVisitDraft) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.visit_form.draft = draft.into();
        Ok(())
    }

    /// Save the open draft (add or update). The server's patient lands in
    /// every open view.
    pub fn save_visit(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.save_visit())?;
        Ok(())
    }

    pub fn request_delete_visit(&self, visit_id: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.visit_form.request_delete(&visit_id);
        Ok(())
    }

    pub fn cancel_delete_visit(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        app.state.visit_form.cancel_delete();
        Ok(())
    }

    /// Issue the staged deletion; a no-op when nothing is pending.
    pub fn confirm_delete_visit(&self) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime.block_on(app.confirm_delete_visit())?;
        Ok(())
    }

    // =========================================================================
    // Uploads
    // =========================================================================

    pub fn upload_lab_report(&self, file_path: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime
            .block_on(app.upload(UploadSlot::LabReport, &file_path))?;
        Ok(())
    }

    pub fn upload_signature(&self, file_path: String) -> Result<(), CasebookError> {
        let mut app = self.app.lock()?;
        self.runtime
            .block_on(app.upload(UploadSlot::Signature, &file_path))?;
        Ok(())
    }

    // =========================================================================
    // Case Sheet
    // =========================================================================

    /// Fetch the case-sheet PDF into a temp file and return its path. The
    /// file is removed automatically after a short viewing window.
    pub fn print_case_sheet(&self, patient_id: String) -> Result<String, CasebookError> {
        let app = self.app.lock()?;
        let path = self
            .runtime
            .block_on(app.print_case_sheet(&patient_id))
            .map_err(|e| CasebookError::PrintError(app::case_sheet_failure_message(&e)))?;
        Ok(path.to_string_lossy().into_owned())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe vitals.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVitals {
    pub height: String,
    pub weight: String,
    pub pulse: String,
    pub bp: String,
    pub temp: String,
    pub spo2: String,
}

impl From<&Vitals> for FfiVitals {
    fn from(v: &Vitals) -> Self {
        Self {
            height: v.height.clone(),
            weight: v.weight.clone(),
            pulse: v.pulse.clone(),
            bp: v.bp.clone(),
            temp: v.temp.clone(),
            spo2: v.spo2.clone(),
        }
    }
}

impl From<FfiVitals> for Vitals {
    fn from(v: FfiVitals) -> Self {
        Self {
            height: v.height,
            weight: v.weight,
            pulse: v.pulse,
            bp: v.bp,
            temp: v.temp,
            spo2: v.spo2,
        }
    }
}

/// FFI-safe visit, vitals shape already resolved.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisit {
    pub id: Option<String>,
    pub date: String,
    pub vitals: FfiVitals,
    pub symptoms: String,
    pub prescription: String,
    pub fee: Option<f64>,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

impl From<&NormalizedVisit> for FfiVisit {
    fn from(v: &NormalizedVisit) -> Self {
        Self {
            id: v.id.clone(),
            date: v.date.clone(),
            vitals: FfiVitals::from(&v.vitals),
            symptoms: v.symptoms.clone(),
            prescription: v.prescription.clone(),
            fee: v.fee,
            lab_report_url: v.lab_report_url.clone(),
            doctor_sign_url: v.doctor_sign_url.clone(),
        }
    }
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
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
    pub visits: Vec<FfiVisit>,
}

impl From<&Patient> for FfiPatient {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            age: p.age,
            sex: p.sex.clone(),
            date_of_birth: p.date_of_birth.clone(),
            address: p.address.clone(),
            mobile: p.mobile.clone(),
            email: p.email.clone(),
            reference_id: p.reference_id.clone(),
            guardian_name: p.guardian_name.clone(),
            id_proof: p.id_proof.clone(),
            occupation: p.occupation.clone(),
            diagnosis: p.diagnosis.clone(),
            provisional_diagnosis: p.provisional_diagnosis.clone(),
            clinical_history: p.clinical_history.clone(),
            family_history: p.family_history.clone(),
            visits: p.visit_history().iter().map(FfiVisit::from).collect(),
        }
    }
}

/// FFI-safe visit draft, every field as typed.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitDraft {
    pub date: String,
    pub vitals: FfiVitals,
    pub symptoms: String,
    pub prescription: String,
    pub fee: String,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

impl From<&VisitDraft> for FfiVisitDraft {
    fn from(d: &VisitDraft) -> Self {
        Self {
            date: d.date.clone(),
            vitals: FfiVitals::from(&d.vitals),
            symptoms: d.symptoms.clone(),
            prescription: d.prescription.clone(),
            fee: d.fee.clone(),
            lab_report_url: d.lab_report_url.clone(),
            doctor_sign_url: d.doctor_sign_url.clone(),
        }
    }
}

impl From<FfiVisitDraft> for VisitDraft {
    fn from(d: FfiVisitDraft) -> Self {
        Self {
            date: d.date,
            vitals: d.vitals.into(),
            symptoms: d.symptoms,
            prescription: d.prescription,
            fee: d.fee,
            lab_report_url: d.lab_report_url,
            doctor_sign_url: d.doctor_sign_url,
        }
    }
}

/// FFI-safe patient form draft. Carries no age: the displayed age always
/// derives from the date of birth.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatientDraft {
    pub name: String,
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
    pub first_visit: FfiVisitDraft,
}

impl From<&PatientDraft> for FfiPatientDraft {
    fn from(d: &PatientDraft) -> Self {
        Self {
            name: d.name.clone(),
            sex: d.sex.clone(),
            date_of_birth: d.date_of_birth.clone(),
            address: d.address.clone(),
            mobile: d.mobile.clone(),
            email: d.email.clone(),
            reference_id: d.reference_id.clone(),
            guardian_name: d.guardian_name.clone(),
            id_proof: d.id_proof.clone(),
            occupation: d.occupation.clone(),
            diagnosis: d.diagnosis.clone(),
            provisional_diagnosis: d.provisional_diagnosis.clone(),
            clinical_history: d.clinical_history.clone(),
            family_history: d.family_history.clone(),
            first_visit: FfiVisitDraft::from(&d.first_visit),
        }
    }
}

impl From<FfiPatientDraft> for PatientDraft {
    fn from(d: FfiPatientDraft) -> Self {
        let mut draft = PatientDraft::default();
        draft.name = d.name;
        draft.sex = d.sex;
        draft.address = d.address;
        draft.mobile = d.mobile;
        draft.email = d.email;
        draft.reference_id = d.reference_id;
        draft.guardian_name = d.guardian_name;
        draft.id_proof = d.id_proof;
        draft.occupation = d.occupation;
        draft.diagnosis = d.diagnosis;
        draft.provisional_diagnosis = d.provisional_diagnosis;
        draft.clinical_history = d.clinical_history;
        draft.family_history = d.family_history;
        draft.first_visit = d.first_visit.into();
        // Recomputes the derived age as a side effect.
        draft.set_date_of_birth(&d.date_of_birth);
        draft
    }
}

/// FFI-safe snapshot of the visit form.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiVisitForm {
    pub adding: bool,
    /// Identity of the visit under edit, when editing
    pub editing_visit_id: Option<String>,
    pub draft: FfiVisitDraft,
    pub uploading_lab: bool,
    pub uploading_signature: bool,
    pub upload_error: Option<String>,
    pub pending_delete: Option<String>,
}

impl From<&casebook_core::state::VisitSession> for FfiVisitForm {
    fn from(s: &casebook_core::state::VisitSession) -> Self {
        use casebook_core::state::VisitFormMode;
        let (adding, editing_visit_id) = match &s.mode {
            VisitFormMode::Idle => (false, None),
            VisitFormMode::Adding => (true, None),
            VisitFormMode::Editing(id) => (false, Some(id.clone())),
        };
        Self {
            adding,
            editing_visit_id,
            draft: FfiVisitDraft::from(&s.draft),
            uploading_lab: s.uploading_lab,
            uploading_signature: s.uploading_signature,
            upload_error: s.upload_error.clone(),
            pending_delete: s.pending_delete.clone(),
        }
    }
}
