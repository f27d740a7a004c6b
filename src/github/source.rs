use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    PullRequest, PullRequestSummary, RateLimitWindow, RepoRef, Repository, Review, ReviewComment,
};

/// The slice of the hosting API the collector depends on.
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    async fn repository(&self, repo: &RepoRef) -> Result<Repository>;

    /// One page of closed pull requests, most recently updated first.
    /// Pages are 1-based; an empty page means the listing is exhausted.
    async fn closed_pulls(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestSummary>>;

    async fn pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest>;

    async fn review_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        limit: u32,
    ) -> Result<Vec<ReviewComment>>;

    async fn reviews(&self, repo: &RepoRef, number: u64) -> Result<Vec<Review>>;

    async fn rate_limit(&self) -> Result<RateLimitWindow>;
}
