/*!
 * End-to-end tests: PDF file in, result file out
 */

use anyhow::Result;
use std::fs;

use proofmark::app_controller::{FileOutcome, ISSUES_LOG};
use proofmark::errors::{AppError, ReviewError};
use proofmark::export::ExportFormat;
use proofmark::providers::mock::{MockProvider, EMPTY_REVIEW};
use proofmark::review::{ErrorCategory, SortOrder};
use crate::common;

fn two_findings() -> MockProvider {
    MockProvider::scripted([
        MockProvider::review_response(&[
            (2, "recieve", "receive", "영문 오탈자"),
            (1, "Developement", "Development", "영문 오탈자"),
        ]),
        MockProvider::review_response(&[(1, "teh plan", "the plan", "오탈자")]),
        EMPTY_REVIEW.to_string(),
    ])
}

/// A reviewed document produces a CSV named after the input
#[tokio::test]
async fn test_run_withFindings_shouldWriteSortedCsv() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "plan.pdf", &["Developement teh plan", "recieve"])?;
    let output_dir = temp_dir.path().join("out");
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &two_findings());

    let outcome = controller.run(input, output_dir.clone(), false).await?;

    let expected = output_dir.join("plan_검토결과.csv");
    assert_eq!(outcome, FileOutcome::Exported(expected.clone()));

    let rows = common::read_csv(&fs::read(&expected)?)?;
    assert_eq!(rows.len(), 4);
    let pages: Vec<&str> = rows[1..].iter().map(|r| r[1].as_str()).collect();
    assert_eq!(pages, vec!["1", "1", "2"]);
    let numbers: Vec<&str> = rows[1..].iter().map(|r| r[0].as_str()).collect();
    assert_eq!(numbers, vec!["1", "2", "3"]);
    assert_eq!(rows[1][3], "Developement");
    assert_eq!(rows[3][4], "receive");

    Ok(())
}

/// Workbook export honors the configured order and category filter
#[tokio::test]
async fn test_run_withCategoryFilter_shouldExportSelectedOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "plan.pdf", &["Developement teh plan", "recieve"])?;
    let mut config = common::test_config(ExportFormat::Xlsx);
    config.export.sort = SortOrder::PageDesc;
    let controller = common::mock_controller(config, &two_findings())
        .with_category_filter(vec![ErrorCategory::EnglishTypo]);

    let outcome = controller.run(input, temp_dir.path().to_path_buf(), false).await?;

    let FileOutcome::Exported(path) = outcome.clone() else {
        panic!("expected an exported file, got {:?}", outcome);
    };
    assert_eq!(path.extension().unwrap(), "xlsx");

    let (_, rows) = common::read_xlsx(&fs::read(&path)?)?;
    let current: Vec<&str> = rows[1..].iter().map(|r| r[3].as_str()).collect();
    assert_eq!(current, vec!["recieve", "Developement"]);

    Ok(())
}

/// Clean documents produce no result file
#[tokio::test]
async fn test_run_withCleanDocument_shouldNotWriteFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "clean.pdf", &["All good"])?;
    let output_dir = temp_dir.path().join("out");
    let provider = MockProvider::clean();
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &provider);

    let outcome = controller.run(input, output_dir.clone(), false).await?;

    assert_eq!(outcome, FileOutcome::Clean);
    assert_eq!(provider.request_count(), 3);
    assert_eq!(fs::read_dir(&output_dir)?.count(), 0);

    Ok(())
}

/// Existing results are kept unless overwriting is forced
#[tokio::test]
async fn test_run_withExistingResult_shouldSkipUnlessForced() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "plan.pdf", &["Developement teh plan", "recieve"])?;
    let existing = common::create_test_file(temp_dir.path(), "plan_검토결과.csv", b"old")?;
    let provider = two_findings();
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &provider);

    let skipped = controller.run(input.clone(), temp_dir.path().to_path_buf(), false).await?;
    assert_eq!(skipped, FileOutcome::Skipped(existing.clone()));
    assert_eq!(provider.request_count(), 0);
    assert_eq!(fs::read(&existing)?, b"old");

    let forced = controller.run(input, temp_dir.path().to_path_buf(), true).await?;
    assert_eq!(forced, FileOutcome::Exported(existing.clone()));
    assert!(fs::read(&existing)?.len() > 3);

    Ok(())
}

/// Authentication failures surface as review errors and write nothing
#[tokio::test]
async fn test_run_withAuthFailure_shouldFailWithoutOutput() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_pdf(temp_dir.path(), "plan.pdf", &["text"])?;
    let output_dir = temp_dir.path().join("out");
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &MockProvider::failing(401));

    let err = controller.run(input, output_dir.clone(), false).await.unwrap_err();

    let app_error = err.downcast_ref::<AppError>().expect("review failure should be an AppError");
    assert!(matches!(app_error, AppError::Review(ReviewError::Provider { pass: 1, .. })));
    assert_eq!(fs::read_dir(&output_dir)?.count(), 0);

    Ok(())
}

/// Missing inputs are rejected up front
#[tokio::test]
async fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &MockProvider::clean());

    let result = controller
        .run(temp_dir.path().join("missing.pdf"), temp_dir.path().to_path_buf(), false)
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Folder mode keeps going past broken files and logs a summary
#[tokio::test]
async fn test_runFolder_withMixedFiles_shouldCountOutcomes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_pdf(temp_dir.path(), "a.pdf", &["Developement teh plan"])?;
    common::create_test_pdf(temp_dir.path(), "b.pdf", &["recieve"])?;
    common::create_test_file(temp_dir.path(), "broken.pdf", b"this is not a pdf")?;
    common::create_test_file(temp_dir.path(), "notes.txt", b"ignored")?;
    let output_dir = temp_dir.path().join("results");
    let provider = MockProvider::scripted([MockProvider::review_response(&[(1, "teh", "the", "오탈자")])]);
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &provider);

    let summary = controller
        .run_folder(temp_dir.path().to_path_buf(), Some(output_dir.clone()), false)
        .await?;

    assert_eq!(summary.exported, 2);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.clean + summary.skipped, 0);
    assert!(output_dir.join("a_검토결과.csv").exists());
    assert!(output_dir.join("b_검토결과.csv").exists());

    let log = fs::read_to_string(temp_dir.path().join(ISSUES_LOG))?;
    assert!(log.contains("2 exported"));
    assert!(log.contains("1 errors"));

    Ok(())
}

/// Folder mode needs at least one PDF
#[tokio::test]
async fn test_runFolder_withoutPdfs_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "notes.txt", b"ignored")?;
    let controller = common::mock_controller(common::test_config(ExportFormat::Csv), &MockProvider::clean());

    assert!(controller.run_folder(temp_dir.path().to_path_buf(), None, false).await.is_err());
    Ok(())
}
