/*!
 * Tests for providers and the provider-backed review collaborator
 */

use proofmark::document::PageText;
use proofmark::errors::ProviderError;
use proofmark::providers::mock::{MockBehavior, MockProvider};
use proofmark::providers::Provider;
use proofmark::review::{PassIndex, ProviderReviewer, ReviewCollaborator};

fn pages() -> Vec<PageText> {
    vec![
        PageText::new(1, "멘토진를 모집합니다."),
        PageText::new(2, "컨텐츠 제작 일정"),
    ]
}

/// Each pass sends the whole document with that pass's instructions
#[tokio::test]
async fn test_reviewPass_shouldSendLabelledPagesAndPassPrompt() {
    let provider = MockProvider::clean();
    let reviewer = ProviderReviewer::new(provider.clone());

    reviewer
        .review_pass(&pages(), PassIndex::Second.profile())
        .await
        .unwrap();

    let requests = provider.received_requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].user.contains("2차 검토"));
    assert!(requests[0].user.contains("[페이지 1]\n멘토진를 모집합니다.\n\n---\n\n[페이지 2]"));
    assert!(requests[0].system.contains(PassIndex::Second.profile().instructions));
    assert!(requests[0].system.contains("\"errors\""));
}

/// JSON wrapped in prose is still picked up
#[tokio::test]
async fn test_reviewPass_withProseAroundJson_shouldParseCandidates() {
    let reply = format!(
        "검토 결과입니다.\n{}\n이상입니다.",
        MockProvider::review_response(&[(1, "멘토진**를**", "멘토진**을**", "조사 오류")])
    );
    let reviewer = ProviderReviewer::new(MockProvider::scripted([reply]));

    let candidates = reviewer
        .review_pass(&pages(), PassIndex::First.profile())
        .await
        .unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].page, Some(1));
    assert_eq!(candidates[0].error_type.as_deref(), Some("조사 오류"));
}

/// A reply without usable JSON counts as a clean pass
#[tokio::test]
async fn test_reviewPass_withMalformedReply_shouldReturnEmpty() {
    let reviewer = ProviderReviewer::new(MockProvider::malformed());

    let candidates = reviewer
        .review_pass(&pages(), PassIndex::Third.profile())
        .await
        .unwrap();

    assert!(candidates.is_empty());
}

/// Transport and authentication failures are not swallowed
#[tokio::test]
async fn test_reviewPass_withAuthFailure_shouldPropagateError() {
    let reviewer = ProviderReviewer::new(MockProvider::failing(401));

    let err = reviewer
        .review_pass(&pages(), PassIndex::First.profile())
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::AuthenticationError(_)));
    assert!(err.user_message().contains("API 키"));
}

/// Intermittent mocks fail on a fixed cadence
#[tokio::test]
async fn test_intermittentProvider_shouldFailEveryNthRequest() {
    let provider = MockProvider::new(MockBehavior::Intermittent { fail_every: 2 });
    let request = provider.prompt_request("system", "user");

    assert!(provider.complete(request.clone()).await.is_ok());
    assert!(provider.complete(request.clone()).await.is_err());
    assert!(provider.complete(request).await.is_ok());
    assert_eq!(provider.request_count(), 3);
}

/// HTTP status codes map onto error classes
#[test]
fn test_providerError_fromStatus_shouldClassify() {
    assert!(matches!(ProviderError::from_status(403, "x"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "x"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(500, "x"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

/// A failing provider reports the configured status as a server error
#[test]
fn test_complete_withFailingProvider_shouldReturnServerError() {
    let healthy = MockProvider::clean();
    let broken = MockProvider::failing(503);

    assert!(tokio_test::block_on(healthy.complete(healthy.prompt_request("system", "user"))).is_ok());
    let err = tokio_test::block_on(broken.complete(broken.prompt_request("system", "user"))).unwrap_err();
    assert!(err.user_message().contains("AI 서버"));
}
