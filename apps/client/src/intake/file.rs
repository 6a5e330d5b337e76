//! Candidate files and their declared media types.

use std::path::Path;

use anyhow::{Context, Result};
use bytes::Bytes;

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOC_MIME: &str = "application/msword";
const UNKNOWN_MIME: &str = "application/octet-stream";

/// Media type a file declares for itself. Only the first three are accepted for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    Docx,
    Doc,
    Other(String),
}

impl MediaType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            PDF_MIME => MediaType::Pdf,
            DOCX_MIME => MediaType::Docx,
            DOC_MIME => MediaType::Doc,
            other => MediaType::Other(other.to_string()),
        }
    }

    /// Declared type for a file name, following the picker filter `.pdf,.docx,.doc`.
    pub fn from_extension(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => MediaType::Pdf,
            "docx" => MediaType::Docx,
            "doc" => MediaType::Doc,
            _ => MediaType::Other(UNKNOWN_MIME.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Pdf => PDF_MIME,
            MediaType::Docx => DOCX_MIME,
            MediaType::Doc => DOC_MIME,
            MediaType::Other(s) => s,
        }
    }

    pub fn is_allowed(&self) -> bool {
        !matches!(self, MediaType::Other(_))
    }
}

/// A file selected for one of the two slots: content, name and declared type.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub media_type: MediaType,
    pub content: Bytes,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, media_type: MediaType, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            content,
        }
    }

    /// Reads a file from disk. The declared type comes from `declared` when given,
    /// otherwise from the extension.
    pub async fn from_path(path: &Path, declared: Option<&str>) -> Result<Self> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let media_type = match declared {
            Some(mime) => MediaType::parse(mime),
            None => MediaType::from_extension(path),
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(file_name, media_type, Bytes::from(content)))
    }

    pub fn size(&self) -> usize {
        self.content.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_parse_known_mime_types() {
        assert_eq!(MediaType::parse("application/pdf"), MediaType::Pdf);
        assert_eq!(MediaType::parse(DOCX_MIME), MediaType::Docx);
        assert_eq!(MediaType::parse("Application/MSWord"), MediaType::Doc);
    }

    #[test]
    fn test_parse_unknown_mime_is_not_allowed() {
        let mt = MediaType::parse("text/plain");
        assert_eq!(mt, MediaType::Other("text/plain".to_string()));
        assert!(!mt.is_allowed());
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(MediaType::from_extension(&PathBuf::from("cv.PDF")), MediaType::Pdf);
        assert_eq!(MediaType::from_extension(&PathBuf::from("jd.docx")), MediaType::Docx);
        assert_eq!(MediaType::from_extension(&PathBuf::from("old.doc")), MediaType::Doc);
        assert!(!MediaType::from_extension(&PathBuf::from("notes.txt")).is_allowed());
        assert!(!MediaType::from_extension(&PathBuf::from("README")).is_allowed());
    }

    #[tokio::test]
    async fn test_from_path_reads_content_and_name() {
        let mut tmp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        tmp.write_all(b"%PDF-1.4 fake").unwrap();

        let file = UploadedFile::from_path(tmp.path(), None).await.unwrap();
        assert_eq!(file.media_type, MediaType::Pdf);
        assert_eq!(file.content.as_ref(), b"%PDF-1.4 fake");
        assert_eq!(file.size(), 13);
        assert!(file.file_name.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn test_from_path_declared_type_overrides_extension() {
        let tmp = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        let file = UploadedFile::from_path(tmp.path(), Some(DOC_MIME)).await.unwrap();
        assert_eq!(file.media_type, MediaType::Doc);
    }

    #[tokio::test]
    async fn test_from_path_missing_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        let err = UploadedFile::from_path(&missing, None).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
