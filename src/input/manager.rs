//! Input manager for handling different file types

use crate::error::{Result, ScreenerError};
use crate::input::file_detector::FileType;
use crate::input::text_extractor::{
    DocxExtractor, MarkdownExtractor, PdfExtractor, PlainTextExtractor, TextExtractor,
};
use log::info;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// An uploaded file held in memory for the duration of one run.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub file_name: String,
    pub media_type: FileType,
    pub bytes: Vec<u8>,
}

impl RawDocument {
    pub fn new(file_name: impl Into<String>, media_type: FileType, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes,
        }
    }

    /// Build from a declared MIME type, as an upload form would send it.
    pub fn from_mime(file_name: impl Into<String>, mime: &str, bytes: Vec<u8>) -> Self {
        Self::new(file_name, FileType::from_mime(mime), bytes)
    }

    /// Visible text of the document, blocks separated by blank lines.
    pub fn extract_text(&self) -> Result<String> {
        match self.media_type {
            FileType::Pdf => PdfExtractor.extract(&self.bytes),
            FileType::Docx => DocxExtractor.extract(&self.bytes),
            FileType::Text => PlainTextExtractor.extract(&self.bytes),
            FileType::Markdown => MarkdownExtractor.extract(&self.bytes),
            FileType::Unknown => Err(ScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                self.file_name
            ))),
        }
    }
}

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read resume files into memory, rejecting the whole batch when it is
    /// over `max_files` or contains anything but PDF/DOCX.
    pub async fn load_resumes(&self, paths: &[PathBuf], max_files: usize) -> Result<Vec<RawDocument>> {
        if paths.len() > max_files {
            return Err(ScreenerError::TooManyFiles {
                count: paths.len(),
                max: max_files,
            });
        }

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let file_type = self.detect_file_type(path)?;
            if !file_type.is_resume_type() {
                return Err(ScreenerError::UnsupportedFormat(format!(
                    "Resumes must be PDF or DOCX: {}",
                    path.display()
                )));
            }

            if !path.exists() {
                return Err(ScreenerError::InvalidInput(format!(
                    "File does not exist: {}",
                    path.display()
                )));
            }

            info!("Loading resume: {}", path.display());
            let bytes = fs::read(path).await?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());

            documents.push(RawDocument::new(file_name, file_type, bytes));
        }

        Ok(documents)
    }

    /// Plain text of a job description or resume file.
    pub async fn extract_text(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached_text) = self.cache.get(&path_str) {
                info!("Using cached text for: {}", path.display());
                return Ok(cached_text.clone());
            }
        }

        if !path.exists() {
            return Err(ScreenerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let file_type = self.detect_file_type(path)?;
        if file_type == FileType::Unknown {
            return Err(ScreenerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        info!("Extracting text ({:?}) from: {}", file_type, path.display());
        let bytes = fs::read(path).await?;
        let text = RawDocument::new(path_str.clone(), file_type, bytes).extract_text()?;

        if self.enable_cache {
            self.cache.insert(path_str, text.clone());
        }

        Ok(text)
    }

    fn detect_file_type(&self, path: &Path) -> Result<FileType> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ScreenerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(FileType::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
