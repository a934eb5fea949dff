//! File type detection

use serde::{Deserialize, Serialize};

pub const PDF_MIME: &str = "application/pdf";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileType {
    Pdf,
    Docx,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "docx" => FileType::Docx,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_mime(mime: &str) -> Self {
        match mime.split(';').next().unwrap_or_default().trim() {
            PDF_MIME => FileType::Pdf,
            DOCX_MIME => FileType::Docx,
            "text/plain" => FileType::Text,
            "text/markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Resumes may only be PDF or DOCX.
    pub fn is_resume_type(&self) -> bool {
        matches!(self, FileType::Pdf | FileType::Docx)
    }
}
