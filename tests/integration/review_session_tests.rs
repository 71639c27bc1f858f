/*!
 * Integration tests for review sessions: PDF extraction through merged findings
 */

use std::sync::{Arc, Mutex};

use proofmark::document::PdfTextExtractor;
use proofmark::errors::{DocumentError, ProviderError, ReviewError};
use proofmark::providers::mock::{MockProvider, EMPTY_REVIEW};
use proofmark::review::{ErrorCategory, ProviderReviewer, ReviewOrchestrator, ReviewProgress, ReviewState};
use crate::common;

fn orchestrator(provider: &MockProvider) -> ReviewOrchestrator<ProviderReviewer<MockProvider>> {
    ReviewOrchestrator::new(ProviderReviewer::new(provider.clone()))
}

/// Three passes run in order and their findings are merged once
#[tokio::test]
async fn test_reviewDocument_withOverlappingPasses_shouldMergeFindings() {
    common::init_logging();
    let provider = MockProvider::scripted([
        MockProvider::review_response(&[(1, "Developement plan", "Development plan", "영문 오탈자")]),
        MockProvider::review_response(&[
            (1, "**Developement** plan", "**Development** plan", "오탈자"),
            (2, "recieve", "receive", "영문 오탈자"),
        ]),
        EMPTY_REVIEW.to_string(),
    ]);
    let mut session = orchestrator(&provider);

    let pdf = common::pdf_bytes(&["Developement plan", "Please recieve it"]);
    let (document, outcome) = session
        .review_document(Arc::new(PdfTextExtractor::new()), pdf)
        .await
        .unwrap();

    assert_eq!(document.total_pages, 2);
    assert_eq!(provider.request_count(), 3);
    assert_eq!(outcome.pass_counts, [1, 2, 0]);
    assert_eq!(outcome.stats.duplicates, 1);
    assert_eq!(outcome.records.len(), 2);

    let first = &outcome.records[0];
    assert!(first.id.starts_with("review-1-error-0-"));
    assert_eq!(first.error_type, ErrorCategory::EnglishTypo);
    assert_eq!(first.current_content, "**Developement** plan");
    assert_eq!(first.suggested_fix, "**Development** plan");

    let second = &outcome.records[1];
    assert!(second.id.starts_with("review-2-error-1-"));
    assert_eq!(second.page, 2);
    assert_eq!(second.current_content, "rec**ie**ve");
    assert_eq!(second.suggested_fix, "rec**ei**ve");
    assert_eq!(session.state(), ReviewState::Completed);
}

/// A pass with unparseable output contributes nothing but does not stop the others
#[tokio::test]
async fn test_reviewDocument_withMalformedMiddlePass_shouldKeepOtherPasses() {
    let provider = MockProvider::scripted([
        MockProvider::review_response(&[(1, "Developement plan", "Development plan", "영문 오탈자")]),
        "검토 결과 특별한 오류는 보이지 않습니다.".to_string(),
        MockProvider::review_response(&[(2, "recieve", "receive", "영문 오탈자")]),
    ]);
    let mut session = orchestrator(&provider);

    let pdf = common::pdf_bytes(&["Developement plan", "Please recieve it"]);
    let (_, outcome) = session
        .review_document(Arc::new(PdfTextExtractor::new()), pdf)
        .await
        .unwrap();

    assert_eq!(provider.request_count(), 3);
    assert_eq!(outcome.pass_counts, [1, 0, 1]);
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records[0].id.starts_with("review-1-"));
    assert!(outcome.records[1].id.starts_with("review-3-"));
    assert_eq!(session.state(), ReviewState::Completed);
}

/// The prompt carries the extracted page text
#[tokio::test]
async fn test_reviewDocument_shouldSendExtractedText() {
    let provider = MockProvider::clean();
    let mut session = orchestrator(&provider);

    let pdf = common::pdf_bytes(&["Hello proofreader"]);
    let (_, outcome) = session
        .review_document(Arc::new(PdfTextExtractor::new()), pdf)
        .await
        .unwrap();

    assert!(outcome.is_clean());
    let requests = provider.received_requests();
    assert_eq!(requests.len(), 3);
    assert!(requests
        .iter()
        .all(|r| r.user.contains("[페이지 1]") && r.user.contains("Hello proofreader")));
}

/// A provider failure in any pass aborts the whole session
#[tokio::test]
async fn test_reviewDocument_withRateLimit_shouldAbortWithPassNumber() {
    let provider = MockProvider::failing(429);
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let mut session = orchestrator(&provider).with_progress(Box::new(move |p: ReviewProgress| {
        sink.lock().unwrap().push(p.message);
    }));

    let err = session
        .review_document(Arc::new(PdfTextExtractor::new()), common::pdf_bytes(&["text"]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ReviewError::Provider { pass: 1, source: ProviderError::RateLimitExceeded(_) }
    ));
    assert_eq!(provider.request_count(), 1);
    assert_eq!(session.state(), ReviewState::Error);
    let last = messages.lock().unwrap().last().cloned().unwrap();
    assert!(last.contains("한도"));
}

/// Files that are not PDFs never reach the provider
#[tokio::test]
async fn test_reviewDocument_withNonPdfBytes_shouldFailBeforeReview() {
    let provider = MockProvider::clean();
    let mut session = orchestrator(&provider);

    let err = session
        .review_document(Arc::new(PdfTextExtractor::new()), b"plain text, not a pdf".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, ReviewError::Document(DocumentError::NotPdf)));
    assert_eq!(provider.request_count(), 0);
    assert!(err.user_message().contains("PDF"));
}

/// Candidates missing required fields are dropped, missing pages default to 0
#[tokio::test]
async fn test_review_withIncompleteCandidates_shouldKeepValidOnes() {
    let reply = r#"{"errors":[
        {"currentContent":"됬다","suggestedFix":"됐다","errorType":"맞춤법 오류"},
        {"page":"2","currentContent":"","suggestedFix":"x","errorType":"오탈자"},
        {"page":3,"currentContent":"할수","suggestedFix":"할 수","errorType":"없는 유형"}
    ]}"#;
    let provider = MockProvider::scripted([reply, EMPTY_REVIEW]);
    let mut session = orchestrator(&provider);

    let pages = vec![proofmark::PageText::new(1, "됬다. 할수 있다.")];
    let outcome = session.review(&pages).await.unwrap();

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].page, 0);
    assert_eq!(outcome.records[1].error_type, ErrorCategory::Typo);
    assert_eq!(outcome.records[1].current_content, "**할수**");
    assert_eq!(outcome.records[1].suggested_fix, "**할 수**");
}
