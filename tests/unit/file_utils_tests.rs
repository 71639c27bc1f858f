/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;
use proofmark::file_utils::FileManager;
use crate::common;

/// Test that file_exists distinguishes files from directories
#[test]
fn test_fileExists_withFileAndDirectory_shouldOnlyAcceptFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(temp_dir.path(), "doc.pdf", b"%PDF-1.5")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::file_exists("non_existent_file.pdf"));

    Ok(())
}

/// Result paths combine the input stem and the export name
#[test]
fn test_generateOutputPath_withExtensionDot_shouldNotDoubleIt() {
    let path = FileManager::generate_output_path(
        Path::new("/tmp/input/report.pdf"),
        Path::new("/tmp/output"),
        "검토결과",
        ".csv",
    );

    assert_eq!(path, Path::new("/tmp/output/report_검토결과.csv"));
}

/// Only PDF files are picked up in folder mode
#[test]
fn test_findFiles_withMixedFiles_shouldReturnSortedPdfs() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.pdf", b"%PDF-")?;
    common::create_test_file(temp_dir.path(), "a.PDF", b"%PDF-")?;
    common::create_test_file(temp_dir.path(), "a.pdf.txt", b"text")?;

    let files = FileManager::find_files(temp_dir.path(), "pdf")?;

    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.PDF", "b.pdf"]);

    Ok(())
}
