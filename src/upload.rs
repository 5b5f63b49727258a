//! File intake: load, validate, and stage the document to translate.
//!
//! Acceptance is decided here and nowhere else: MIME type in
//! {PNG, JPEG, PDF} and size at most [`MAX_UPLOAD_BYTES`]. The declared type
//! is also checked against the file's magic bytes (`%PDF` for PDFs, the
//! format signature for images), because a misnamed file would otherwise
//! travel all the way to the translation service before failing.
//!
//! An accepted file is staged as a [`Preview`]: a copy inside a `TempDir`
//! whose `Drop` deletes it. Tying the preview's lifetime to the value that
//! owns it means reset can never forget to release it.

use crate::error::TraduzoError;
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Upload size cap in bytes (5 MB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// MIME types the validator accepts.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [MIME_PNG, MIME_JPEG, MIME_PDF];

const MIME_PNG: &str = "image/png";
const MIME_JPEG: &str = "image/jpeg";
const MIME_PDF: &str = "application/pdf";

/// A document selected for translation: payload, declared MIME type, and
/// display name. Never persisted; replaced or dropped on reset.
#[derive(Clone)]
pub struct UploadedFile {
    /// Display name, usually the source file name.
    pub name: String,
    /// Declared MIME type. [`validate`] decides whether it is acceptable.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Load a file from disk, deriving the MIME type from its extension
    /// (`.png`, `.jpg`, `.jpeg`, `.pdf`).
    ///
    /// Only reads the file; acceptance (type, size, magic bytes) is decided
    /// by [`validate`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TraduzoError> {
        let path = path.as_ref();

        let mime = mime_from_extension(path)?;

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(TraduzoError::PermissionDenied {
                    path: path.to_path_buf(),
                })
            }
            Err(_) => {
                return Err(TraduzoError::FileNotFound {
                    path: path.to_path_buf(),
                })
            }
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        debug!(name = %name, mime = %mime, size = bytes.len(), "loaded upload from disk");

        Ok(Self {
            name,
            mime: mime.to_string(),
            bytes,
        })
    }

    /// Build an upload from raw parts. For callers that already hold the
    /// bytes (HTTP handlers, tests) rather than a path.
    pub fn from_parts(
        name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Byte size of the payload.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// Manual Debug: a 5 MB byte dump in a log line helps nobody.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("name", &self.name)
            .field("mime", &self.mime)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Accept or reject a candidate file.
///
/// Checks run in the order the user can fix them: declared MIME type
/// against the allow-list, then size, then content sniffing. Rejection
/// carries a user-facing message via
/// [`TraduzoError::user_message`] and leaves all caller state untouched.
pub fn validate(file: &UploadedFile) -> Result<(), TraduzoError> {
    if !ACCEPTED_MIME_TYPES.contains(&file.mime.as_str()) {
        return Err(TraduzoError::UnsupportedFileType {
            detail: format!("declared MIME type '{}'", file.mime),
        });
    }

    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(TraduzoError::FileTooLarge {
            size: file.bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    sniff_content(file)?;

    debug!(name = %file.name, mime = %file.mime, size = file.bytes.len(), "upload accepted");
    Ok(())
}

/// Verify the payload's magic bytes agree with the declared MIME type.
fn sniff_content(file: &UploadedFile) -> Result<(), TraduzoError> {
    match file.mime.as_str() {
        MIME_PDF => {
            if !file.bytes.starts_with(b"%PDF") {
                let shown = file.bytes.len().min(4);
                return Err(TraduzoError::UnsupportedFileType {
                    detail: format!(
                        "declared application/pdf but content does not start with %PDF (first bytes: {:?})",
                        &file.bytes[..shown]
                    ),
                });
            }
        }
        declared @ (MIME_PNG | MIME_JPEG) => {
            let sniffed = image::guess_format(&file.bytes).map_err(|_| {
                TraduzoError::UnsupportedFileType {
                    detail: format!("declared {declared} but content is not a recognisable image"),
                }
            })?;
            let expected = if declared == MIME_PNG {
                image::ImageFormat::Png
            } else {
                image::ImageFormat::Jpeg
            };
            if sniffed != expected {
                return Err(TraduzoError::UnsupportedFileType {
                    detail: format!("declared {declared} but content looks like {sniffed:?}"),
                });
            }
        }
        // Unreachable after the allow-list check, but keep the error anyway.
        other => {
            return Err(TraduzoError::UnsupportedFileType {
                detail: format!("declared MIME type '{other}'"),
            })
        }
    }
    Ok(())
}

/// Map a file extension to the MIME type the service expects.
fn mime_from_extension(path: &Path) -> Result<&'static str, TraduzoError> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => Ok(MIME_PNG),
        "jpg" | "jpeg" => Ok(MIME_JPEG),
        "pdf" => Ok(MIME_PDF),
        _ => Err(TraduzoError::UnsupportedFileType {
            detail: format!("file extension '.{ext}' of '{}'", path.display()),
        }),
    }
}

/// A staged local copy of an accepted upload.
///
/// Stands in for the browser's object-URL preview: a path the caller can
/// open while the file is selected. The backing `TempDir` is deleted when
/// the `Preview` is dropped, which is how reset releases the resource.
#[derive(Debug)]
pub struct Preview {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl Preview {
    /// Stage a copy of the file in a fresh temp directory.
    pub fn stage(file: &UploadedFile) -> Result<Self, TraduzoError> {
        let temp_dir = TempDir::new()
            .map_err(|e| TraduzoError::Internal(format!("failed to create preview dir: {e}")))?;

        // Keep only the final component of the name; an upload name is
        // display text, not a path.
        let file_name = Path::new(&file.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "upload".to_string());

        let path = temp_dir.path().join(file_name);
        std::fs::write(&path, &file.bytes)
            .map_err(|e| TraduzoError::Internal(format!("failed to stage preview: {e}")))?;

        debug!(path = %path.display(), "preview staged");

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Path of the staged copy. Valid until the `Preview` is dropped.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_file(len: usize) -> UploadedFile {
        let mut bytes = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        bytes.resize(len.max(8), 0);
        UploadedFile::from_parts("doc.png", MIME_PNG, bytes)
    }

    fn jpeg_file(len: usize) -> UploadedFile {
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
        bytes.resize(len.max(4), 0);
        UploadedFile::from_parts("doc.jpg", MIME_JPEG, bytes)
    }

    fn pdf_file(len: usize) -> UploadedFile {
        let mut bytes = b"%PDF-1.4\n".to_vec();
        bytes.resize(len.max(9), b' ');
        UploadedFile::from_parts("doc.pdf", MIME_PDF, bytes)
    }

    #[test]
    fn accepts_the_three_supported_types() {
        assert!(validate(&png_file(1024)).is_ok());
        assert!(validate(&jpeg_file(1024)).is_ok());
        assert!(validate(&pdf_file(1024)).is_ok());
    }

    #[test]
    fn rejects_unsupported_mime() {
        let file = UploadedFile::from_parts("anim.gif", "image/gif", vec![b'G', b'I', b'F']);
        let err = validate(&file).unwrap_err();
        assert!(matches!(err, TraduzoError::UnsupportedFileType { .. }));
        assert_eq!(
            err.user_message(),
            "Apenas arquivos PNG, JPEG ou PDF são suportados."
        );
    }

    #[test]
    fn rejects_oversized_file() {
        let err = validate(&png_file(MAX_UPLOAD_BYTES + 1)).unwrap_err();
        assert!(matches!(err, TraduzoError::FileTooLarge { .. }));
        assert_eq!(
            err.user_message(),
            "O arquivo excede o tamanho máximo de 5 MB."
        );
    }

    #[test]
    fn accepts_file_exactly_at_the_cap() {
        assert!(validate(&png_file(MAX_UPLOAD_BYTES)).is_ok());
    }

    #[test]
    fn size_cap_applies_to_every_type() {
        assert!(validate(&jpeg_file(MAX_UPLOAD_BYTES + 1)).is_err());
        assert!(validate(&pdf_file(MAX_UPLOAD_BYTES + 1)).is_err());
    }

    #[test]
    fn rejects_pdf_without_magic_bytes() {
        let file = UploadedFile::from_parts("fake.pdf", MIME_PDF, b"hello world".to_vec());
        let err = validate(&file).unwrap_err();
        assert!(matches!(err, TraduzoError::UnsupportedFileType { .. }));
    }

    #[test]
    fn rejects_declared_png_with_jpeg_content() {
        let mut file = jpeg_file(64);
        file.mime = MIME_PNG.to_string();
        let err = validate(&file).unwrap_err();
        assert!(matches!(err, TraduzoError::UnsupportedFileType { .. }));
    }

    #[test]
    fn from_path_maps_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for (name, expected_mime) in [
            ("a.png", MIME_PNG),
            ("b.jpg", MIME_JPEG),
            ("c.JPEG", MIME_JPEG),
            ("d.pdf", MIME_PDF),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"x").unwrap();
            let file = UploadedFile::from_path(&path).unwrap();
            assert_eq!(file.mime, expected_mime, "for {name}");
            assert_eq!(file.name, name);
        }
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"x").unwrap();
        let err = UploadedFile::from_path(&path).unwrap_err();
        assert!(matches!(err, TraduzoError::UnsupportedFileType { .. }));
    }

    #[test]
    fn from_path_missing_file() {
        let err = UploadedFile::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, TraduzoError::FileNotFound { .. }));
    }

    #[test]
    fn preview_is_deleted_on_drop() {
        let file = png_file(64);
        let preview = Preview::stage(&file).unwrap();
        let path = preview.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(std::fs::read(&path).unwrap(), file.bytes);

        drop(preview);
        assert!(!path.exists(), "staged copy must be removed on drop");
    }

    #[test]
    fn preview_sanitises_path_like_names() {
        let mut file = png_file(64);
        file.name = "../../etc/passwd".to_string();
        let preview = Preview::stage(&file).unwrap();
        assert!(preview.path().starts_with(preview._temp_dir.path()));
        assert_eq!(preview.path().file_name().unwrap(), "passwd");
    }

    #[test]
    fn debug_elides_payload() {
        let rendered = format!("{:?}", png_file(2048));
        assert!(rendered.contains("<2048 bytes>"), "got: {rendered}");
        assert!(!rendered.contains("137"), "payload must not be dumped");
    }
}
