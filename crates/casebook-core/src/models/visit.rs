//! Visit models and the vitals-shape adapter.

use serde::{Deserialize, Deserializer, Serialize};

/// Vital signs with every slot resolved to a display string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Vitals {
    pub height: String,
    pub weight: String,
    pub pulse: String,
    pub bp: String,
    pub temp: String,
    pub spo2: String,
}

/// Nested vitals as they appear on the wire. Fields are optional so a
/// missing key can fall back to its flat counterpart during normalization.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawVitals {
    pub height: Option<String>,
    pub weight: Option<String>,
    pub pulse: Option<String>,
    pub bp: Option<String>,
    pub temp: Option<String>,
    pub spo2: Option<String>,
}

/// A visit exactly as the wire delivers it.
///
/// Current records nest vitals under `vitals`; older records carry them as
/// flat top-level fields. [`Visit::normalized`] resolves the two shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Visit {
    /// Server-assigned identity, absent until the first save
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Visit date as entered
    pub date: String,
    /// Nested vitals (current shape)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vitals: Option<RawVitals>,
    /// Flat vitals (legacy shape)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spo2: Option<String>,
    pub symptoms: String,
    pub prescription: String,
    /// Consultation fee; the wire may carry a number, a numeric string,
    /// or nothing at all
    #[serde(deserialize_with = "lenient_fee")]
    pub fee: Option<f64>,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

/// A visit with the vitals shape resolved, produced by [`Visit::normalized`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct NormalizedVisit {
    pub id: Option<String>,
    pub date: String,
    pub vitals: Vitals,
    pub symptoms: String,
    pub prescription: String,
    pub fee: Option<f64>,
    pub lab_report_url: String,
    pub doctor_sign_url: String,
}

impl Visit {
    /// Resolve the two vitals shapes into one.
    ///
    /// Precedence: a nested value wins over its flat counterpart whenever
    /// the nested key is present; a missing slot resolves to empty. Flat
    /// fields never survive into the result.
    pub fn normalized(&self) -> NormalizedVisit {
        let nested = self.vitals.clone().unwrap_or_default();
        NormalizedVisit {
            id: self.id.clone(),
            date: self.date.clone(),
            vitals: Vitals {
                height: resolve(nested.height, &self.height),
                weight: resolve(nested.weight, &self.weight),
                pulse: resolve(nested.pulse, &self.pulse),
                bp: resolve(nested.bp, &self.bp),
                temp: resolve(nested.temp, &self.temp),
                spo2: resolve(nested.spo2, &self.spo2),
            },
            symptoms: self.symptoms.clone(),
            prescription: self.prescription.clone(),
            fee: self.fee,
            lab_report_url: self.lab_report_url.clone(),
            doctor_sign_url: self.doctor_sign_url.clone(),
        }
    }
}

fn resolve(nested: Option<String>, flat: &Option<String>) -> String {
    nested.or_else(|| flat.clone()).unwrap_or_default()
}

/// Accept a JSON number, a numeric string, or null for the fee field.
/// Unparseable text reads as absent rather than failing the record.
fn lenient_fee<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFee {
        Number(f64),
        Text(String),
    }

    let raw = Option::<RawFee>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawFee::Number(n)) if n.is_finite() => Some(n),
        Some(RawFee::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    })
}
