//! Integration tests for the input layer

use resume_screener::input::{FileType, InputManager};
use resume_screener::ScreenerError;
use std::path::{Path, PathBuf};

#[tokio::test]
async fn test_job_description_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_job.txt");

    let result = manager.extract_text(path).await;
    assert!(result.is_ok());

    let text = result.unwrap();
    assert!(text.contains("Senior Rust Engineer"));
    assert!(text.contains("Tokio"));
}

#[tokio::test]
async fn test_job_description_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_job.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Senior Rust Engineer"));
    assert!(text.contains("PostgreSQL"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/sample_job.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ScreenerError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(ScreenerError::InvalidInput(_))));
}

#[tokio::test]
async fn test_load_resumes_reads_pdf_and_docx() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = dir.path().join("jane.pdf");
    let docx = dir.path().join("john.DOCX");
    std::fs::write(&pdf, b"%PDF-1.4 placeholder").unwrap();
    std::fs::write(&docx, b"PK placeholder").unwrap();

    let manager = InputManager::new();
    let documents = manager.load_resumes(&[pdf, docx], 5).await.unwrap();

    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].file_name, "jane.pdf");
    assert_eq!(documents[0].media_type, FileType::Pdf);
    assert_eq!(documents[1].media_type, FileType::Docx);
    assert_eq!(documents[0].bytes, b"%PDF-1.4 placeholder".to_vec());
}

#[tokio::test]
async fn test_load_resumes_rejects_too_many_files() {
    let paths: Vec<PathBuf> = (0..6).map(|i| PathBuf::from(format!("resume_{}.pdf", i))).collect();

    let manager = InputManager::new();
    let result = manager.load_resumes(&paths, 5).await;

    assert!(matches!(result, Err(ScreenerError::TooManyFiles { count: 6, max: 5 })));
}

#[tokio::test]
async fn test_load_resumes_rejects_non_resume_types() {
    let manager = InputManager::new();
    let paths = vec![PathBuf::from("tests/fixtures/sample_job.txt")];

    let result = manager.load_resumes(&paths, 5).await;
    assert!(matches!(result, Err(ScreenerError::UnsupportedFormat(_))));
}
