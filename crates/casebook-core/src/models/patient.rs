//! Patient wire model.

use serde::{Deserialize, Serialize};

use super::visit::{NormalizedVisit, Visit};

/// A patient record as returned by the clinic API.
///
/// String fields default to empty so partially-filled server records still
/// deserialize. `phone` and `first_visit` only appear on older records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    /// Server-assigned identity
    #[serde(rename = "_id")]
    pub id: String,
    /// Patient name
    pub name: String,
    /// Derived from date of birth, never edited directly
    pub age: Option<u32>,
    pub sex: String,
    pub date_of_birth: String,
    pub address: String,
    /// Contact number, ten digits
    pub mobile: String,
    /// Legacy contact field on old records; searched alongside mobile
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub email: String,
    pub reference_id: String,
    pub guardian_name: String,
    pub id_proof: String,
    pub occupation: String,
    pub diagnosis: String,
    pub provisional_diagnosis: String,
    pub clinical_history: String,
    pub family_history: String,
    /// Ordered visit history (current shape)
    pub visits: Vec<Visit>,
    /// Legacy single-visit field predating the `visits` array
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_visit: Option<Visit>,
}

impl Patient {
    /// Effective visit history: the `visits` array when non-empty, else the
    /// legacy `first_visit` as a one-element history, else empty. Every
    /// element comes back with its vitals shape resolved.
    pub fn visit_history(&self) -> Vec<NormalizedVisit> {
        if !self.visits.is_empty() {
            self.visits.iter().map(Visit::normalized).collect()
        } else if let Some(first) = &self.first_visit {
            vec![first.normalized()]
        } else {
            Vec::new()
        }
    }
}
