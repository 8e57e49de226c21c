//! Casebook Core Library
//!
//! Domain models, form logic, and state coordination for a clinic
//! patient-records client. Everything here is pure and synchronous; the
//! HTTP edge lives in `casebook-client`.
//!
//! # Architecture
//!
//! ```text
//!                         Clinic API (remote)
//!                               │
//!                      [casebook-client gateway]
//!                               │
//!              ┌────────────────▼────────────────┐
//!              │       AppState coordinator      │
//!              │  canonical patient collection   │
//!              │  + transient view pointers      │
//!              └───┬───────────┬────────────┬────┘
//!                  │           │            │
//!                  ▼           ▼            ▼
//!             Patient List  Patient Form  Visit Manager
//!             (filter)      (draft →      (drafts, uploads,
//!                            payload)      delete confirm)
//! ```
//!
//! # Core Principle
//!
//! **The server's response is the truth.** Patient mutations reload the
//! whole collection; visit mutations patch the one affected row from the
//! response and refresh every open view bound to it. Nothing is applied
//! optimistically.
//!
//! # Modules
//!
//! - [`models`]: Wire types (Patient, Visit, Vitals) and the vitals-shape
//!   adapter for legacy records
//! - [`forms`]: Drafts, age derivation, validation, payload shaping
//! - [`search`]: Patient list filtering
//! - [`state`]: Session gate, visit-form state, AppState coordinator

pub mod forms;
pub mod models;
pub mod search;
pub mod state;

// Re-export commonly used types
pub use forms::{FormError, FormResult, PatientDraft, PatientPayload, VisitDraft, VisitPayload};
pub use models::{NormalizedVisit, Patient, Visit, Vitals};
pub use search::filter_patients;
pub use state::{AppState, SessionState, UploadSlot, VisitFormMode, VisitSession};
