//! HTTP client for the translation service.
//!
//! One endpoint: `POST {base_url}/translate` with a multipart form carrying
//! the file plus `documentType`, `sourceLanguage` and `targetLanguage`
//! fields. Field names and values are the service's wire contract; see
//! [`crate::vocab`] for the accepted codes.
//!
//! Failures are split by what the caller can do about them:
//! [`TraduzoError::NetworkUnreachable`] (transport never completed),
//! [`TraduzoError::ServerError`] (non-2xx status) and
//! [`TraduzoError::MalformedResponse`] (2xx but unusable body). A request is
//! sent exactly once; resubmission is a caller decision, never automatic.

use crate::config::ApiConfig;
use crate::error::TraduzoError;
use crate::upload::UploadedFile;
use crate::vocab::{DocumentType, Language};
use reqwest::multipart;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

// ───────────────────────── Request / result types ─────────────────────────

/// Everything the `/translate` endpoint needs for one attempt.
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub file: UploadedFile,
    pub document_type: DocumentType,
    pub source_language: Language,
    pub target_language: Language,
}

/// A successful translation.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationResult {
    /// Translated document text. Never empty.
    #[serde(rename = "translatedText")]
    pub translated_text: String,
    /// Structured fields the service extracted, passed through as-is.
    #[serde(rename = "extractedData", skip_serializing_if = "Option::is_none")]
    pub extracted_data: Option<Value>,
}

/// Wire shape of the service response. Both fields are optional here so the
/// presence checks below produce precise errors instead of serde's.
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    #[serde(rename = "extractedData")]
    extracted_data: Option<Value>,
}

// ───────────────────────────────── Client ─────────────────────────────────

/// Client for the translation service, reusable across requests.
#[derive(Debug, Clone)]
pub struct TranslationClient {
    http: reqwest::Client,
    base_url: String,
    timeout_secs: u64,
}

impl TranslationClient {
    /// Build a client from the resolved configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, TraduzoError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TraduzoError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Submit one translation request and wait for the outcome.
    pub async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TraduzoError> {
        let url = self.endpoint();

        let file_part = multipart::Part::bytes(request.file.bytes.clone())
            .file_name(request.file.name.clone())
            .mime_str(&request.file.mime)
            .map_err(|e| {
                TraduzoError::Internal(format!(
                    "invalid MIME type '{}' for multipart part: {e}",
                    request.file.mime
                ))
            })?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("documentType", request.document_type.code())
            .text("sourceLanguage", request.source_language.code())
            .text("targetLanguage", request.target_language.code());

        debug!(
            url = %url,
            file = %request.file.name,
            document_type = %request.document_type,
            source = %request.source_language,
            target = %request.target_language,
            size = request.file.size(),
            "submitting translation request"
        );

        let response = self.http.post(&url).multipart(form).send().await.map_err(|e| {
            let reason = if e.is_timeout() {
                format!("no response within {}s from {url}", self.timeout_secs)
            } else {
                format!("request to {url} failed: {e}")
            };
            warn!(error = %reason, "translation request did not complete");
            TraduzoError::NetworkUnreachable { reason }
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "translation service returned an error");
            return Err(TraduzoError::ServerError {
                status: status.as_u16(),
            });
        }

        let payload: TranslateResponse = response.json().await.map_err(|e| {
            TraduzoError::MalformedResponse {
                detail: format!("body is not the expected JSON shape: {e}"),
            }
        })?;

        result_from_payload(payload)
    }

    fn endpoint(&self) -> String {
        format!("{}/translate", self.base_url)
    }
}

/// Turn a decoded response into a result, rejecting a missing or empty
/// `translatedText` since there is nothing to show or export in either case.
fn result_from_payload(payload: TranslateResponse) -> Result<TranslationResult, TraduzoError> {
    match payload.translated_text {
        Some(text) if !text.is_empty() => Ok(TranslationResult {
            translated_text: text,
            extracted_data: payload.extracted_data,
        }),
        Some(_) => Err(TraduzoError::MalformedResponse {
            detail: "'translatedText' is present but empty".to_string(),
        }),
        None => Err(TraduzoError::MalformedResponse {
            detail: "'translatedText' missing from response".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn decode(json: &str) -> TranslateResponse {
        serde_json::from_str(json).expect("test payload must decode")
    }

    #[test]
    fn endpoint_joins_base_url_and_path() {
        let config = ApiConfig::new("http://localhost:4000");
        let client = TranslationClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:4000/translate");
    }

    #[test]
    fn accepts_full_payload() {
        let payload = decode(r#"{"translatedText": "Olá", "extractedData": {"nome": "Ana"}}"#);
        let result = result_from_payload(payload).unwrap();
        assert_eq!(result.translated_text, "Olá");
        assert_eq!(result.extracted_data.unwrap()["nome"], "Ana");
    }

    #[test]
    fn accepts_payload_without_extracted_data() {
        let result = result_from_payload(decode(r#"{"translatedText": "Olá"}"#)).unwrap();
        assert_eq!(result.translated_text, "Olá");
        assert!(result.extracted_data.is_none());
    }

    #[test]
    fn null_extracted_data_reads_as_absent() {
        let payload = decode(r#"{"translatedText": "Olá", "extractedData": null}"#);
        let result = result_from_payload(payload).unwrap();
        assert!(result.extracted_data.is_none());
    }

    #[test]
    fn rejects_missing_translated_text() {
        let err = result_from_payload(decode(r#"{"extractedData": {}}"#)).unwrap_err();
        assert!(matches!(err, TraduzoError::MalformedResponse { .. }));
        assert_eq!(err.user_message(), "Erro ao traduzir o texto.");
    }

    #[test]
    fn rejects_empty_translated_text() {
        let err = result_from_payload(decode(r#"{"translatedText": ""}"#)).unwrap_err();
        assert!(matches!(err, TraduzoError::MalformedResponse { .. }));
    }

    #[test]
    fn result_serialises_with_wire_field_names() {
        let result = TranslationResult {
            translated_text: "Olá".to_string(),
            extracted_data: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["translatedText"], "Olá");
        assert!(json.get("extractedData").is_none());
    }
}
