//! Error types for the traduzo library.
//!
//! Every fallible operation returns [`TraduzoError`]. The variants fall into
//! two families with very different recovery stories:
//!
//! * **Validation errors** (bad file type, oversized file, missing field,
//!   identical languages) are raised before any network traffic and are
//!   recoverable by correcting the input.
//!
//! * **Transport/server errors** (`NetworkUnreachable`, `ServerError`,
//!   `MalformedResponse`) are raised by the translation client and are
//!   recoverable by resubmitting once the service is healthy again.
//!
//! The `#[error]` messages are developer-facing diagnostics. What the user
//! sees is [`TraduzoError::user_message`]: the fixed Portuguese banner
//! strings of the product, with every transport kind collapsed into the one
//! generic "Erro ao traduzir o texto." line. The kinds stay distinct in the
//! type so logs and callers can tell a timeout from a 500 even though the
//! banner cannot.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TraduzoError>;

/// All errors returned by the traduzo library.
#[derive(Debug, Error)]
pub enum TraduzoError {
    // ── Validation errors ─────────────────────────────────────────────────
    /// The file's declared or sniffed type is not PNG, JPEG, or PDF.
    #[error("Unsupported file type: {detail}\nAccepted formats: PNG, JPEG, PDF.")]
    UnsupportedFileType { detail: String },

    /// The file exceeds the upload size cap.
    #[error("File is {size} bytes, above the {limit}-byte upload limit")]
    FileTooLarge { size: usize, limit: usize },

    /// A required submission field was left unset.
    #[error("Required field is missing: {field}")]
    MissingField { field: &'static str },

    /// Source and target language are the same.
    #[error("Source and target language must differ (both are '{language}')")]
    SameLanguage { language: String },

    /// No language matches the given code or alias.
    #[error("Unknown language '{input}'\nValid codes: 'Portuguese BR', 'Portuguese PT', 'Spanish', 'Italian', 'German' (or pt-br, pt-pt, es, it, de).")]
    UnknownLanguage { input: String },

    /// No document type matches the given code or alias.
    #[error("Unknown document type '{input}'\nValid codes: 'Nascimento', 'Obito', 'Casamento'.")]
    UnknownDocumentType { input: String },

    // ── File loading ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("File not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    // ── Transport/server errors ───────────────────────────────────────────
    /// The request never produced an HTTP response (DNS, refused connection,
    /// timeout).
    #[error("Translation service unreachable: {reason}\nCheck the service is running and TRADUZO_API_URL points at it.")]
    NetworkUnreachable { reason: String },

    /// The service answered with a non-2xx status.
    #[error("Translation service returned HTTP {status}")]
    ServerError { status: u16 },

    /// The response body was not the expected JSON payload, or the
    /// `translatedText` field was missing or empty.
    #[error("Malformed response from translation service: {detail}")]
    MalformedResponse { detail: String },

    // ── Workflow errors ───────────────────────────────────────────────────
    /// The requested action is not allowed in the current workflow phase.
    #[error("Action '{action}' is not allowed while the workflow is in the '{phase}' phase")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    // ── Export errors ─────────────────────────────────────────────────────
    /// PDF export was requested with no translated text to write.
    #[error("Nothing to export: the translated text is empty")]
    EmptyTranslation,

    /// Could not create or write the output PDF file.
    #[error("Failed to write PDF file '{path}': {source}")]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or environment validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TraduzoError {
    /// The fixed Portuguese banner string shown to the user for this error.
    ///
    /// Validation errors keep their specific messages; every transport and
    /// internal kind collapses into the generic translation-failure line, so
    /// the user-visible vocabulary never grows beyond what the product ships.
    pub fn user_message(&self) -> &'static str {
        match self {
            TraduzoError::UnsupportedFileType { .. } => {
                "Apenas arquivos PNG, JPEG ou PDF são suportados."
            }
            TraduzoError::FileTooLarge { .. } => "O arquivo excede o tamanho máximo de 5 MB.",
            TraduzoError::MissingField { .. } => "Todos os campos são obrigatórios.",
            TraduzoError::SameLanguage { .. } => {
                "O idioma de origem e destino devem ser diferentes."
            }
            TraduzoError::EmptyTranslation => "Nada para gerar no PDF!",
            _ => "Erro ao traduzir o texto.",
        }
    }

    /// True for the validation family: errors raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TraduzoError::UnsupportedFileType { .. }
                | TraduzoError::FileTooLarge { .. }
                | TraduzoError::MissingField { .. }
                | TraduzoError::SameLanguage { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_large_display() {
        let e = TraduzoError::FileTooLarge {
            size: 6_000_000,
            limit: 5_242_880,
        };
        let msg = e.to_string();
        assert!(msg.contains("6000000"), "got: {msg}");
        assert!(msg.contains("5242880"), "got: {msg}");
    }

    #[test]
    fn missing_field_display_names_the_field() {
        let e = TraduzoError::MissingField {
            field: "sourceLanguage",
        };
        assert!(e.to_string().contains("sourceLanguage"));
    }

    #[test]
    fn server_error_display() {
        let e = TraduzoError::ServerError { status: 503 };
        assert!(e.to_string().contains("503"));
    }

    #[test]
    fn validation_errors_keep_specific_banners() {
        let cases: [(TraduzoError, &str); 4] = [
            (
                TraduzoError::UnsupportedFileType {
                    detail: "image/gif".into(),
                },
                "Apenas arquivos PNG, JPEG ou PDF são suportados.",
            ),
            (
                TraduzoError::FileTooLarge {
                    size: 6_000_000,
                    limit: 5_242_880,
                },
                "O arquivo excede o tamanho máximo de 5 MB.",
            ),
            (
                TraduzoError::MissingField { field: "file" },
                "Todos os campos são obrigatórios.",
            ),
            (
                TraduzoError::SameLanguage {
                    language: "Italian".into(),
                },
                "O idioma de origem e destino devem ser diferentes.",
            ),
        ];
        for (err, banner) in cases {
            assert_eq!(err.user_message(), banner, "for {err:?}");
            assert!(err.is_validation());
        }
    }

    #[test]
    fn transport_errors_collapse_to_generic_banner() {
        let cases = [
            TraduzoError::NetworkUnreachable {
                reason: "connection refused".into(),
            },
            TraduzoError::ServerError { status: 500 },
            TraduzoError::MalformedResponse {
                detail: "missing translatedText".into(),
            },
        ];
        for err in cases {
            assert_eq!(err.user_message(), "Erro ao traduzir o texto.");
            assert!(!err.is_validation());
        }
    }

    #[test]
    fn empty_translation_banner() {
        assert_eq!(
            TraduzoError::EmptyTranslation.user_message(),
            "Nada para gerar no PDF!"
        );
    }
}
