//! Reading input files into documents

use anyhow::{Context, Result};
use kapwa_core::Document;
use std::fs;
use std::path::Path;

/// How a file's text is obtained, decided by its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// `.txt` and `.md`, read as UTF-8
    Text,
    /// `.json`, parsed and re-serialized with indentation
    Json,
    /// `.pdf`, text extracted when built with the `pdf` feature
    Pdf,
}

impl DocumentKind {
    /// Kind for `path`, or `None` for unsupported extensions
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "txt" | "md" => Some(DocumentKind::Text),
            "json" => Some(DocumentKind::Json),
            "pdf" => Some(DocumentKind::Pdf),
            _ => None,
        }
    }
}

/// Turns input files into [`Document`]s
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Read a JSON file and re-serialize it with two-space indentation
    ///
    /// Object keys keep their order in the file.
    pub fn read_json(path: &Path) -> Result<String> {
        let raw = Self::read_text(path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?;
        Ok(serde_json::to_string_pretty(&value)?)
    }

    /// Extract the text of a PDF file
    #[cfg(feature = "pdf")]
    pub fn read_pdf(path: &Path) -> Result<Option<String>> {
        let text = pdf_extract::extract_text(path)
            .with_context(|| format!("Failed to extract PDF text: {}", path.display()))?;
        Ok(Some(text))
    }

    /// Extract the text of a PDF file
    #[cfg(not(feature = "pdf"))]
    pub fn read_pdf(path: &Path) -> Result<Option<String>> {
        log::warn!(
            "Skipping {}: PDF support requires the `pdf` feature",
            path.display()
        );
        Ok(None)
    }

    /// Read `path` into a document named after the file
    ///
    /// Returns `Ok(None)` for unsupported or empty files, which are skipped.
    pub fn read_document(path: &Path) -> Result<Option<Document>> {
        let Some(kind) = DocumentKind::from_path(path) else {
            log::info!("Skipping unsupported file type: {}", path.display());
            return Ok(None);
        };

        let content = match kind {
            DocumentKind::Text => Self::read_text(path)?,
            DocumentKind::Json => Self::read_json(path)?,
            DocumentKind::Pdf => match Self::read_pdf(path)? {
                Some(text) => text,
                None => return Ok(None),
            },
        };

        if content.trim().is_empty() {
            log::info!("Skipping empty file: {}", path.display());
            return Ok(None);
        }

        let identifier = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Some(Document::new(identifier, content)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_path(Path::new("a.txt")), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_path(Path::new("a.MD")), Some(DocumentKind::Text));
        assert_eq!(DocumentKind::from_path(Path::new("a.json")), Some(DocumentKind::Json));
        assert_eq!(DocumentKind::from_path(Path::new("a.pdf")), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_path(Path::new("a.csv")), None);
        assert_eq!(DocumentKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_read_text_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gabay.txt");
        fs::write(&path, "Kumusta, kabayan!").unwrap();

        let doc = FileReader::read_document(&path).unwrap().unwrap();
        assert_eq!(doc.identifier, "gabay.txt");
        assert_eq!(doc.content, "Kumusta, kabayan!");
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("faq.json");
        fs::write(&path, r#"{"tanong":"Ano ang OEC?","sagot":"Sertipiko"}"#).unwrap();

        let doc = FileReader::read_document(&path).unwrap().unwrap();
        assert_eq!(
            doc.content,
            "{\n  \"tanong\": \"Ano ang OEC?\",\n  \"sagot\": \"Sertipiko\"\n}"
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = FileReader::read_document(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }

    #[test]
    fn test_empty_and_unsupported_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty.txt");
        let csv = temp_dir.path().join("data.csv");
        fs::write(&empty, "  \n\n ").unwrap();
        fs::write(&csv, "a,b\n1,2\n").unwrap();

        assert!(FileReader::read_document(&empty).unwrap().is_none());
        assert!(FileReader::read_document(&csv).unwrap().is_none());
    }

    #[test]
    fn test_read_text_nonexistent_file() {
        let err = FileReader::read_text(Path::new("/nonexistent/file.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read file"));
    }

    #[cfg(not(feature = "pdf"))]
    #[test]
    fn test_pdf_skipped_without_feature() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scan.pdf");
        fs::write(&path, b"%PDF-1.4").unwrap();
        assert!(FileReader::read_document(&path).unwrap().is_none());
    }
}
