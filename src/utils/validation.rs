// file: src/utils/validation.rs
// description: input path checks and display helpers for the cli
// reference: input validation patterns

use crate::error::{ReportError, Result};
use std::path::Path;

pub struct Validator;

impl Validator {
    /// Existing regular file with a `.docx` extension.
    pub fn validate_document_path(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ReportError::Validation(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(ReportError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("docx") => Ok(()),
            _ => Err(ReportError::Validation(format!(
                "File is not a .docx document: {}",
                path.display()
            ))),
        }
    }

    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ReportError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(ReportError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    pub fn validate_output_path(path: &Path) -> Result<()> {
        if path.is_dir() {
            return Err(ReportError::Validation(format!(
                "Output path is a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_url(url: &str) -> Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ReportError::Validation(format!(
                "Invalid URL format: {}",
                url
            )));
        }
        Ok(())
    }

    /// File stem used to name outputs derived from `path`.
    pub fn output_stem(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "guide".to_string())
    }

    /// First `max_chars` characters, with "..." appended when cut.
    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &text[..idx]),
            None => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_document_path() {
        let temp = TempDir::new().unwrap();
        let docx = temp.path().join("Audi Q5.DOCX");
        let text = temp.path().join("notes.txt");
        fs::write(&docx, "zip").unwrap();
        fs::write(&text, "text").unwrap();

        assert!(Validator::validate_document_path(&docx).is_ok());
        assert!(Validator::validate_document_path(&text).is_err());
        assert!(Validator::validate_document_path(temp.path()).is_err());
        assert!(Validator::validate_document_path(Path::new("/nonexistent.docx")).is_err());
    }

    #[test]
    fn test_validate_directory() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_directory(temp.path()).is_ok());
        assert!(Validator::validate_directory(Path::new("/nonexistent")).is_err());
    }

    #[test]
    fn test_validate_output_path() {
        let temp = TempDir::new().unwrap();
        assert!(Validator::validate_output_path(temp.path()).is_err());
        assert!(Validator::validate_output_path(&temp.path().join("out.html")).is_ok());
    }

    #[test]
    fn test_validate_url() {
        assert!(Validator::validate_url("https://eeuroparts.com/").is_ok());
        assert!(Validator::validate_url("eeuroparts.com").is_err());
    }

    #[test]
    fn test_output_stem() {
        assert_eq!(Validator::output_stem(Path::new("/in/Audi Q5.docx")), "Audi Q5");
        assert_eq!(Validator::output_stem(Path::new("/")), "guide");
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(Validator::truncate_text("short", 10), "short");
        assert_eq!(Validator::truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(Validator::truncate_text("this is a very long text", 10), "this is a ...");
        assert_eq!(Validator::truncate_text("Škoda Octavia", 5), "Škoda...");
    }
}
