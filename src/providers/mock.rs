/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::scripted(..)` - Replies with canned responses in order
 * - `MockProvider::malformed()` - Replies with prose instead of JSON
 * - `MockProvider::failing(status)` - Always fails with an HTTP-style error
 * - `MockProvider::intermittent(n)` - Fails every nth request
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Reply sent when no script is configured
pub const EMPTY_REVIEW: &str = r#"{"errors":[]}"#;

/// Mock request for testing
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// System instructions
    pub system: String,
    /// User prompt
    pub user: String,
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The reply text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Replies with the scripted responses in order
    Scripted,
    /// Replies with text that contains no JSON object
    Malformed,
    /// Fails every Nth request, scripted replies otherwise
    Intermittent { fail_every: usize },
    /// Always fails with the given HTTP status
    Failing { status_code: u16 },
}

/// Mock provider for testing review behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Replies by request index; the last one repeats
    responses: Arc<Vec<String>>,
    /// Every request received, shared between clones
    received: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            responses: Arc::new(Vec::new()),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a provider replying with `responses` in order
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::Scripted).with_responses(responses)
    }

    /// Create a provider that finds nothing
    pub fn clean() -> Self {
        Self::new(MockBehavior::Scripted)
    }

    /// Create a provider that replies without any JSON
    pub fn malformed() -> Self {
        Self::new(MockBehavior::Malformed)
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a failing mock provider that always errors with `status_code`
    pub fn failing(status_code: u16) -> Self {
        Self::new(MockBehavior::Failing { status_code })
    }

    /// Replace the scripted replies
    pub fn with_responses<I, S>(mut self, responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.responses = Arc::new(responses.into_iter().map(Into::into).collect());
        self
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Copy of every request received so far
    pub fn received_requests(&self) -> Vec<MockRequest> {
        self.received
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    /// Build a review reply listing the given findings.
    ///
    /// Each tuple is `(page, current, fix, category label)`.
    pub fn review_response(findings: &[(u32, &str, &str, &str)]) -> String {
        let errors: Vec<serde_json::Value> = findings
            .iter()
            .map(|(page, current, fix, error_type)| {
                serde_json::json!({
                    "page": page,
                    "location": format!("{}페이지", page),
                    "currentContent": current,
                    "suggestedFix": fix,
                    "errorType": error_type,
                })
            })
            .collect();
        serde_json::json!({ "errors": errors }).to_string()
    }

    fn scripted_reply(&self, index: usize) -> String {
        self.responses
            .get(index)
            .or_else(|| self.responses.last())
            .cloned()
            .unwrap_or_else(|| EMPTY_REVIEW.to_string())
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            responses: Arc::clone(&self.responses),
            received: Arc::clone(&self.received),
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    fn prompt_request(&self, system: &str, user: &str) -> Self::Request {
        MockRequest {
            system: system.to_string(),
            user: user.to_string(),
        }
    }

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut received) = self.received.lock() {
            received.push(request);
        }

        match self.behavior {
            MockBehavior::Scripted => Ok(MockResponse {
                text: self.scripted_reply(count),
            }),

            MockBehavior::Malformed => Ok(MockResponse {
                text: "문서를 검토했지만 결과를 정리하지 못했습니다.".to_string(),
            }),

            MockBehavior::Intermittent { fail_every } => {
                if fail_every > 0 && count % fail_every == fail_every - 1 {
                    Err(ProviderError::ApiError {
                        message: format!("Simulated intermittent failure (request #{})", count + 1),
                        status_code: 503,
                    })
                } else {
                    Ok(MockResponse {
                        text: self.scripted_reply(count),
                    })
                }
            }

            MockBehavior::Failing { status_code } => Err(ProviderError::from_status(
                status_code,
                "Simulated provider failure",
            )),
        }
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
