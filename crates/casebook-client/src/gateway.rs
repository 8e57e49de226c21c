//! HTTP gateway for the remote clinic API.
//!
//! Thin request/response translation: every operation maps to exactly one
//! endpoint, sends the stored session token as a raw `Authorization` value
//! (the API uses no scheme prefix), and decodes the server's reply. Visit
//! mutations return the whole updated patient, which is what keeps every
//! view server-authoritative.

use casebook_core::forms::PatientPayload;
use casebook_core::models::Patient;
use serde::Deserialize;
use tracing::{info, warn};

/// Default clinic API endpoint, fixed at build time.
pub const DEFAULT_BASE_URL: &str = "https://asoka-backend-production.up.railway.app";

/// HTTP client timeout for API requests
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// API-facing errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(String),
}

/// `{ "url": ... }` reply from the upload endpoints.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

/// Error payloads carry an optional `message` for the user.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the clinic API.
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let cleaned_url = base_url.trim_end_matches('/');
        info!("Creating ApiClient with base_url: {}", cleaned_url);

        let parsed = url::Url::parse(cleaned_url)
            .map_err(|e| ApiError::UrlError(format!("Invalid URL '{}': {}", cleaned_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::UrlError(format!(
                "URL must use http or https scheme, got: {}",
                parsed.scheme()
            )));
        }

        let http_client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(30))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http_client,
            base_url: cleaned_url.to_string(),
            token: None,
        })
    }

    /// Attach the session token sent on every subsequent request.
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .http_client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            // Raw token value; the API expects no "Bearer" prefix.
            builder = builder.header("Authorization", token);
        }
        builder
    }

    // =========================================================================
    // Patients
    // =========================================================================

    pub async fn list_patients(&self) -> Result<Vec<Patient>, ApiError> {
        let response = self.request(reqwest::Method::GET, "/patients").send().await?;
        handle_response(response).await
    }

    pub async fn create_patient(&self, payload: &PatientPayload) -> Result<Patient, ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/patients")
            .json(payload)
            .send()
            .await?;
        info!("Created patient");
        handle_response(response).await
    }

    pub async fn update_patient(
        &self,
        id: &str,
        payload: &PatientPayload,
    ) -> Result<Patient, ApiError> {
        let response = self
            .request(reqwest::Method::PUT, &format!("/patients/{}", id))
            .json(payload)
            .send()
            .await?;
        info!("Updated patient {}", id);
        handle_response(response).await
    }

    pub async fn delete_patient(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::DELETE, &format!("/patients/{}", id))
            .send()
            .await?;
        info!("Deleted patient {}", id);
        handle_empty_response(response).await
    }

    // =========================================================================
    // Visits — each reply is the whole updated patient
    // =========================================================================

    pub async fn add_visit(
        &self,
        patient_id: &str,
        visit: &casebook_core::forms::VisitPayload,
    ) -> Result<Patient, ApiError> {
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/patients/{}/visits", patient_id),
            )
            .json(visit)
            .send()
            .await?;
        info!("Added visit for patient {}", patient_id);
        handle_response(response).await
    }

    pub async fn update_visit(
        &self,
        patient_id: &str,
        visit_id: &str,
        visit: &casebook_core::forms::VisitPayload,
    ) -> Result<Patient, ApiError> {
        let response = self
            .request(
                reqwest::Method::PUT,
                &format!("/patients/{}/visits/{}", patient_id, visit_id),
            )
            .json(visit)
            .send()
            .await?;
        info!("Updated visit {} for patient {}", visit_id, patient_id);
        handle_response(response).await
    }

    pub async fn delete_visit(
        &self,
        patient_id: &str,
        visit_id: &str,
    ) -> Result<Patient, ApiError> {
        let response = self
            .request(
                reqwest::Method::DELETE,
                &format!("/patients/{}/visits/{}", patient_id, visit_id),
            )
            .send()
            .await?;
        info!("Deleted visit {} for patient {}", visit_id, patient_id);
        handle_response(response).await
    }

    // =========================================================================
    // File uploads
    // =========================================================================

    pub async fn upload_lab_report(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        self.upload("/upload/lab", file_name, bytes).await
    }

    pub async fn upload_signature(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        self.upload("/upload/signature", file_name, bytes).await
    }

    async fn upload(&self, path: &str, file_name: &str, bytes: Vec<u8>) -> Result<String, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .request(reqwest::Method::POST, path)
            .multipart(form)
            .send()
            .await?;
        let reply: UploadResponse = handle_response(response).await?;
        info!("Uploaded {} to {}", file_name, path);
        Ok(reply.url)
    }

    // =========================================================================
    // Case sheet
    // =========================================================================

    /// Fetch the generated case-sheet PDF for a patient.
    pub async fn fetch_case_sheet(&self, patient_id: &str) -> Result<Vec<u8>, ApiError> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/patients/{}/print", patient_id),
            )
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.bytes().await?.to_vec()),
            reqwest::StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
            reqwest::StatusCode::NOT_FOUND => {
                Err(ApiError::NotFound(format!("patient {}", patient_id)))
            }
            _ => Err(ApiError::Server(extract_message(response).await)),
        }
    }
}

/// Decode a successful JSON reply or map the failure status, pulling the
/// server's `message` out of the error payload when one is present.
async fn handle_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    match response.status() {
        status if status.is_success() => Ok(response.json().await?),
        reqwest::StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        reqwest::StatusCode::NOT_FOUND => Err(ApiError::NotFound("resource not found".into())),
        status => {
            let message = extract_message(response).await;
            warn!("API request failed with {}: {}", status, message);
            Err(ApiError::Server(message))
        }
    }
}

async fn handle_empty_response(response: reqwest::Response) -> Result<(), ApiError> {
    match response.status() {
        status if status.is_success() => Ok(()),
        reqwest::StatusCode::UNAUTHORIZED => Err(ApiError::Unauthorized),
        reqwest::StatusCode::NOT_FOUND => Err(ApiError::NotFound("resource not found".into())),
        status => {
            let message = extract_message(response).await;
            warn!("API request failed with {}: {}", status, message);
            Err(ApiError::Server(message))
        }
    }
}

async fn extract_message(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            message: Some(message),
        }) => message,
        _ if !body.is_empty() => body,
        _ => "request failed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(ApiClient::new(DEFAULT_BASE_URL).is_ok());
        assert!(ApiClient::new("http://localhost:5000/").is_ok());

        // Invalid URL should fail
        assert!(ApiClient::new("not-a-url").is_err());

        // Invalid scheme should fail
        assert!(ApiClient::new("ftp://localhost:5000").is_err());
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_error_body_message_extraction() {
        let body: ErrorBody = serde_json::from_str(r#"{"message":"no such patient"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("no such patient"));

        let body: ErrorBody = serde_json::from_str(r#"{"error":"other shape"}"#).unwrap();
        assert!(body.message.is_none());
    }
}
