//! # traduzo
//!
//! Translate civil-registry certificates (birth, death, marriage) between
//! languages through a translation service, and export the result as a PDF
//! or as Markdown.
//!
//! ## How it works
//!
//! ```text
//! certificate (PNG / JPEG / PDF, ≤ 5 MB)
//!  │
//!  ├─ 1. Upload    load + validate (type, size, magic bytes), stage a preview
//!  ├─ 2. Workflow  pick file, languages and certificate type; guard submission
//!  ├─ 3. Client    multipart POST to {base_url}/translate
//!  ├─ 4. Render    split the '-----' header section, clean up the text
//!  └─ 5. Export    single-page PDF ("Texto Traduzido:") or Markdown
//! ```
//!
//! The [`workflow::Workflow`] state machine owns the selected file and the
//! submission lifecycle. It hands out a [`workflow::PendingTranslation`] for
//! the caller to transport and fences completions by sequence number, so a
//! cancelled or superseded request can never overwrite newer state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use traduzo::{ApiConfig, DocumentType, Language, TranslationClient, UploadedFile, Workflow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut workflow = Workflow::new();
//!     workflow.select_file(UploadedFile::from_path("certidao.png")?)?;
//!     workflow.set_source_language(Language::Italian)?;
//!     workflow.set_target_language(Language::PortugueseBr)?;
//!     workflow.set_document_type(DocumentType::Nascimento)?;
//!
//!     // Reads TRADUZO_API_URL (and TRADUZO_API_TIMEOUT, if set).
//!     let client = TranslationClient::new(&ApiConfig::from_env()?)?;
//!
//!     let pending = workflow.submit()?;
//!     let outcome = client.translate(&pending.request).await;
//!     workflow.complete(pending.seq, outcome);
//!
//!     if let Some(result) = workflow.translation() {
//!         traduzo::export::write_pdf(&result.translated_text, traduzo::DEFAULT_PDF_NAME)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `traduzo` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! traduzo = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod render;
pub mod upload;
pub mod vocab;
pub mod workflow;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{TranslationClient, TranslationRequest, TranslationResult};
pub use config::{ApiConfig, ApiConfigBuilder};
pub use error::{Result, TraduzoError};
pub use export::{write_pdf, DEFAULT_PDF_NAME};
pub use render::{render_markdown, split_sections, RenderedTranslation};
pub use upload::{Preview, UploadedFile, MAX_UPLOAD_BYTES};
pub use vocab::{DocumentType, Language};
pub use workflow::{PendingTranslation, Phase, StagedFile, Workflow};
