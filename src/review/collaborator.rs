/*!
 * The proofreading collaborator seam.
 *
 * A review pass is one request: the whole document plus the pass profile in,
 * a list of raw candidates out. `ProviderReviewer` implements this on top of
 * any LLM `Provider`.
 */

use async_trait::async_trait;
use log::{debug, info};
use std::sync::Arc;

use super::profiles::PassProfile;
use super::record::RawCandidate;
use super::response::candidates_or_empty;
use crate::document::PageText;
use crate::errors::ProviderError;
use crate::providers::Provider;

/// Separator placed between page blocks in the prompt
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Capability to run one proofreading pass over a document
#[async_trait]
pub trait ReviewCollaborator: Send + Sync {
    /// Review every page with the given profile.
    ///
    /// Malformed replies yield an empty list; only transport, authentication
    /// and server failures are errors.
    async fn review_pass(
        &self,
        pages: &[PageText],
        profile: &PassProfile,
    ) -> Result<Vec<RawCandidate>, ProviderError>;
}

#[async_trait]
impl<T: ReviewCollaborator + ?Sized> ReviewCollaborator for Arc<T> {
    async fn review_pass(
        &self,
        pages: &[PageText],
        profile: &PassProfile,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        (**self).review_pass(pages, profile).await
    }
}

/// Render pages as `[페이지 N]` blocks for the prompt
pub fn format_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|p| format!("[페이지 {}]\n{}", p.page_number, p.content))
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
}

/// `ReviewCollaborator` backed by an LLM provider
#[derive(Debug)]
pub struct ProviderReviewer<P: Provider> {
    provider: P,
}

impl<P: Provider> ProviderReviewer<P> {
    /// Wrap a provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Access the wrapped provider
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> ReviewCollaborator for ProviderReviewer<P> {
    async fn review_pass(
        &self,
        pages: &[PageText],
        profile: &PassProfile,
    ) -> Result<Vec<RawCandidate>, ProviderError> {
        let pass = profile.pass.number();
        let document = format_pages(pages);
        let request = self
            .provider
            .prompt_request(&profile.system_prompt(), &profile.render_user_prompt(&document));

        debug!("Pass {}: sending {} pages ({} chars)", pass, pages.len(), document.chars().count());
        let response = self.provider.complete(request).await?;
        let text = P::extract_text(&response);

        let candidates = candidates_or_empty(&text, pass);
        info!("Pass {} reported {} candidate errors", pass, candidates.len());
        Ok(candidates)
    }
}
