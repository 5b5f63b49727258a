//! Translation workflow state machine.
//!
//! The workflow owns the selected file, the language and document-type
//! selections, and the current [`Phase`]:
//!
//! ```text
//! Idle ──select_file──▶ FileSelected ──submit──▶ Translating
//!                            ▲                      │   │
//!                            └───────cancel─────────┘   │ complete(seq, ..)
//!                                                       ▼
//!                                       Translated  /  Error
//! ```
//!
//! Everything that can hold a file holds it inside its phase variant, so a
//! translated result without a file, or an in-flight submission without one,
//! cannot be represented. `reset` drops the variant and with it the staged
//! preview copy.
//!
//! The workflow never talks to the network. `submit` hands back a
//! [`PendingTranslation`] carrying a sequence number; the caller performs the
//! request and reports back through [`Workflow::complete`] with that number.
//! An outcome whose number no longer matches (the submission was cancelled,
//! reset, or superseded) is dropped, so a late response can never overwrite
//! newer state.

use crate::client::{TranslationRequest, TranslationResult};
use crate::error::TraduzoError;
use crate::upload::{self, Preview, UploadedFile};
use crate::vocab::{DocumentType, Language};
use std::path::Path;
use tracing::{debug, info, warn};

// ───────────────────────────────── Phases ─────────────────────────────────

/// A validated upload together with its staged preview copy.
#[derive(Debug)]
pub struct StagedFile {
    pub file: UploadedFile,
    pub preview: Preview,
}

/// Current workflow phase. Each variant carries exactly the data that phase
/// guarantees to exist.
#[derive(Debug)]
pub enum Phase {
    /// Nothing selected yet.
    Idle,
    /// A file passed validation and is staged for submission.
    FileSelected { staged: StagedFile },
    /// A submission is in flight; `seq` identifies it.
    Translating { staged: StagedFile, seq: u64 },
    /// The service returned a usable translation.
    Translated {
        staged: StagedFile,
        result: TranslationResult,
    },
    /// Something failed; `message` is the user-facing banner text. A staged
    /// file survives a failed submission.
    Error {
        message: String,
        staged: Option<StagedFile>,
    },
}

impl Phase {
    /// Stable lowercase name, used in logs and transition errors.
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::FileSelected { .. } => "file_selected",
            Phase::Translating { .. } => "translating",
            Phase::Translated { .. } => "translated",
            Phase::Error { .. } => "error",
        }
    }

    fn staged(&self) -> Option<&StagedFile> {
        match self {
            Phase::Idle => None,
            Phase::FileSelected { staged }
            | Phase::Translating { staged, .. }
            | Phase::Translated { staged, .. } => Some(staged),
            Phase::Error { staged, .. } => staged.as_ref(),
        }
    }
}

/// A submission handed to the caller for transport.
#[derive(Debug)]
pub struct PendingTranslation {
    /// Fencing token; pass it back to [`Workflow::complete`].
    pub seq: u64,
    pub request: TranslationRequest,
}

// ──────────────────────────────── Workflow ────────────────────────────────

/// Drives one document through select, submit, and completion.
#[derive(Debug)]
pub struct Workflow {
    phase: Phase,
    source_language: Option<Language>,
    target_language: Option<Language>,
    document_type: Option<DocumentType>,
    next_seq: u64,
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            source_language: None,
            target_language: None,
            document_type: None,
            next_seq: 1,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Validate and stage a file, replacing any previous selection.
    ///
    /// Refused while a submission is in flight or a result is being shown.
    /// A file that fails validation is refused without touching anything:
    /// the phase and any previously staged file stay exactly as they were,
    /// and the error carries the banner text for the caller to show.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<(), TraduzoError> {
        match self.phase {
            Phase::Translating { .. } | Phase::Translated { .. } => {
                return Err(TraduzoError::InvalidTransition {
                    action: "select_file",
                    phase: self.phase.name(),
                })
            }
            _ => {}
        }

        if let Err(e) = upload::validate(&file) {
            warn!(file = %file.name, error = %e, "file selection rejected");
            return Err(e);
        }

        let preview = Preview::stage(&file)?;
        info!(file = %file.name, mime = %file.mime, size = file.size(), "file selected");
        self.phase = Phase::FileSelected {
            staged: StagedFile { file, preview },
        };
        Ok(())
    }

    /// Set the language to translate from. Refused mid-flight.
    pub fn set_source_language(&mut self, language: Language) -> Result<(), TraduzoError> {
        self.ensure_not_translating("set_source_language")?;
        self.source_language = Some(language);
        Ok(())
    }

    /// Set the language to translate into. Refused mid-flight.
    pub fn set_target_language(&mut self, language: Language) -> Result<(), TraduzoError> {
        self.ensure_not_translating("set_target_language")?;
        self.target_language = Some(language);
        Ok(())
    }

    /// Set the certificate type. Refused mid-flight.
    pub fn set_document_type(&mut self, document_type: DocumentType) -> Result<(), TraduzoError> {
        self.ensure_not_translating("set_document_type")?;
        self.document_type = Some(document_type);
        Ok(())
    }

    /// Check the guards and, if they pass, move to [`Phase::Translating`].
    ///
    /// Guards run in a fixed order: a staged file, then each selection, then
    /// source differing from target. The first failure moves the workflow to
    /// [`Phase::Error`] with the matching banner; the file, if any, stays
    /// staged so the user can fix the form and resubmit.
    pub fn submit(&mut self) -> Result<PendingTranslation, TraduzoError> {
        self.ensure_not_translating("submit")?;

        let (source, target, document_type) = match self.submission_fields() {
            Ok(fields) => fields,
            Err(e) => {
                warn!(error = %e, "submission refused");
                let staged = self.take_staged();
                self.phase = Phase::Error {
                    message: e.user_message().to_string(),
                    staged,
                };
                return Err(e);
            }
        };

        let Some(staged) = self.take_staged() else {
            return Err(TraduzoError::Internal(
                "staged file missing after submission guards".to_string(),
            ));
        };

        let request = TranslationRequest {
            file: staged.file.clone(),
            document_type,
            source_language: source,
            target_language: target,
        };

        let seq = self.next_seq;
        self.next_seq += 1;
        self.phase = Phase::Translating { staged, seq };
        info!(seq, file = %request.file.name, "translation submitted");

        Ok(PendingTranslation { seq, request })
    }

    /// Deliver the outcome of an in-flight submission.
    ///
    /// Applied only while the workflow is still in [`Phase::Translating`]
    /// for this exact `seq`; otherwise the outcome is stale (cancelled,
    /// reset, or superseded) and is dropped. Returns whether it was applied.
    pub fn complete(
        &mut self,
        seq: u64,
        outcome: Result<TranslationResult, TraduzoError>,
    ) -> bool {
        match &self.phase {
            Phase::Translating { seq: current, .. } if *current == seq => {}
            _ => {
                debug!(seq, phase = self.phase.name(), "dropping stale translation outcome");
                return false;
            }
        }

        let staged = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Translating { staged, .. } => staged,
            other => {
                self.phase = other;
                return false;
            }
        };

        match outcome {
            Ok(result) => {
                info!(seq, chars = result.translated_text.chars().count(), "translation completed");
                self.phase = Phase::Translated { staged, result };
            }
            Err(e) => {
                warn!(seq, error = %e, "translation failed");
                self.phase = Phase::Error {
                    message: e.user_message().to_string(),
                    staged: Some(staged),
                };
            }
        }
        true
    }

    /// Abandon the in-flight submission and return to [`Phase::FileSelected`].
    /// The eventual outcome is fenced out by its stale `seq`.
    pub fn cancel(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Translating { staged, seq } => {
                debug!(seq, "translation cancelled");
                self.phase = Phase::FileSelected { staged };
                true
            }
            other => {
                self.phase = other;
                false
            }
        }
    }

    /// Return to [`Phase::Idle`], clearing the file, the selections and any
    /// result. Dropping the staged file deletes its preview copy.
    pub fn reset(&mut self) {
        debug!(phase = self.phase.name(), "workflow reset");
        self.phase = Phase::Idle;
        self.source_language = None;
        self.target_language = None;
        self.document_type = None;
    }

    /// Start over after a completed translation. Same effect as [`reset`],
    /// but only valid from [`Phase::Translated`].
    ///
    /// [`reset`]: Workflow::reset
    pub fn new_translation(&mut self) -> Result<(), TraduzoError> {
        if !matches!(self.phase, Phase::Translated { .. }) {
            return Err(TraduzoError::InvalidTransition {
                action: "new_translation",
                phase: self.phase.name(),
            });
        }
        self.reset();
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// The staged file, whichever phase holds it.
    pub fn file(&self) -> Option<&UploadedFile> {
        self.phase.staged().map(|s| &s.file)
    }

    /// Path of the staged preview copy, while one exists.
    pub fn preview_path(&self) -> Option<&Path> {
        self.phase.staged().map(|s| s.preview.path())
    }

    /// The result, only in [`Phase::Translated`].
    pub fn translation(&self) -> Option<&TranslationResult> {
        match &self.phase {
            Phase::Translated { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The banner text, only in [`Phase::Error`].
    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn source_language(&self) -> Option<Language> {
        self.source_language
    }

    pub fn target_language(&self) -> Option<Language> {
        self.target_language
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn ensure_not_translating(&self, action: &'static str) -> Result<(), TraduzoError> {
        if matches!(self.phase, Phase::Translating { .. }) {
            return Err(TraduzoError::InvalidTransition {
                action,
                phase: self.phase.name(),
            });
        }
        Ok(())
    }

    /// Run the submission guards in order and return the selections.
    fn submission_fields(&self) -> Result<(Language, Language, DocumentType), TraduzoError> {
        if self.phase.staged().is_none() {
            return Err(TraduzoError::MissingField { field: "file" });
        }
        let Some(source) = self.source_language else {
            return Err(TraduzoError::MissingField {
                field: "sourceLanguage",
            });
        };
        let Some(target) = self.target_language else {
            return Err(TraduzoError::MissingField {
                field: "targetLanguage",
            });
        };
        let Some(document_type) = self.document_type else {
            return Err(TraduzoError::MissingField {
                field: "documentType",
            });
        };
        if source == target {
            return Err(TraduzoError::SameLanguage {
                language: source.code().to_string(),
            });
        }
        Ok((source, target, document_type))
    }

    /// Pull the staged file out of whatever phase holds it, leaving
    /// [`Phase::Idle`] behind until the caller installs the next phase.
    fn take_staged(&mut self) -> Option<StagedFile> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => None,
            Phase::FileSelected { staged } => Some(staged),
            Phase::Translating { staged, .. } => Some(staged),
            Phase::Translated { staged, .. } => Some(staged),
            Phase::Error { staged, .. } => staged,
        }
    }
}
