//! In-memory `PullRequestSource` used by the collector tests.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{Error, Result};
use crate::github::PullRequestSource;
use crate::models::{
    GitHubUser, PullRequest, PullRequestSummary, RateLimitWindow, RepoRef, Repository,
    RepositoryOwner, Review, ReviewComment, ReviewState,
};

type Key = (RepoRef, u64);

pub struct FakeSource {
    current: RepoRef,
    pulls: HashMap<RepoRef, Vec<PullRequest>>,
    comments: HashMap<Key, Vec<ReviewComment>>,
    reviews: HashMap<Key, Vec<Review>>,
    failing_comments: HashSet<Key>,
    failing_details: HashSet<Key>,
    failing_repos: HashSet<RepoRef>,
    detail_calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(repo: RepoRef) -> Self {
        let mut pulls = HashMap::new();
        pulls.insert(repo.clone(), Vec::new());
        Self {
            current: repo,
            pulls,
            comments: HashMap::new(),
            reviews: HashMap::new(),
            failing_comments: HashSet::new(),
            failing_details: HashSet::new(),
            failing_repos: HashSet::new(),
            detail_calls: AtomicUsize::new(0),
        }
    }

    /// Registers another repository; later builder calls apply to it.
    pub fn and_repo(mut self, repo: RepoRef) -> Self {
        self.pulls.entry(repo.clone()).or_default();
        self.current = repo;
        self
    }

    pub fn with_pull(mut self, pr: PullRequest) -> Self {
        self.pulls.entry(self.current.clone()).or_default().push(pr);
        self
    }

    pub fn with_pulls(self, prs: impl IntoIterator<Item = PullRequest>) -> Self {
        prs.into_iter().fold(self, |source, pr| source.with_pull(pr))
    }

    pub fn with_comments(mut self, number: u64, comments: Vec<ReviewComment>) -> Self {
        self.comments.insert((self.current.clone(), number), comments);
        self
    }

    pub fn with_reviews(mut self, number: u64, reviews: Vec<Review>) -> Self {
        self.reviews.insert((self.current.clone(), number), reviews);
        self
    }

    pub fn failing_comments(mut self, number: u64) -> Self {
        self.failing_comments.insert((self.current.clone(), number));
        self
    }

    pub fn failing_detail(mut self, number: u64) -> Self {
        self.failing_details.insert((self.current.clone(), number));
        self
    }

    pub fn failing_repo(mut self) -> Self {
        self.failing_repos.insert(self.current.clone());
        self
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PullRequestSource for FakeSource {
    async fn repository(&self, repo: &RepoRef) -> Result<Repository> {
        if self.failing_repos.contains(repo) || !self.pulls.contains_key(repo) {
            return Err(Error::RepoNotFound(repo.full_name()));
        }
        Ok(Repository {
            id: 1,
            name: repo.name.clone(),
            full_name: repo.full_name(),
            stargazers_count: 1000,
            owner: RepositoryOwner {
                login: repo.owner.clone(),
            },
        })
    }

    async fn closed_pulls(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestSummary>> {
        let pulls = self
            .pulls
            .get(repo)
            .ok_or_else(|| Error::RepoNotFound(repo.full_name()))?;
        let start = (page.saturating_sub(1) * per_page) as usize;
        Ok(pulls
            .iter()
            .skip(start)
            .take(per_page as usize)
            .map(PullRequestSummary::from)
            .collect())
    }

    async fn pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_details.contains(&(repo.clone(), number)) {
            return Err(Error::GitHubApi(format!("detail for #{} unavailable", number)));
        }
        self.pulls
            .get(repo)
            .and_then(|prs| prs.iter().find(|pr| pr.number == number))
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("no pull request #{}", number)))
    }

    async fn review_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        limit: u32,
    ) -> Result<Vec<ReviewComment>> {
        let key = (repo.clone(), number);
        if self.failing_comments.contains(&key) {
            return Err(Error::GitHubApi("comments endpoint failed".to_string()));
        }
        Ok(self
            .comments
            .get(&key)
            .map(|c| c.iter().take(limit as usize).cloned().collect())
            .unwrap_or_default())
    }

    async fn reviews(&self, repo: &RepoRef, number: u64) -> Result<Vec<Review>> {
        Ok(self
            .reviews
            .get(&(repo.clone(), number))
            .cloned()
            .unwrap_or_default())
    }

    async fn rate_limit(&self) -> Result<RateLimitWindow> {
        Ok(RateLimitWindow {
            limit: 5000,
            remaining: 4999,
            reset: 0,
        })
    }
}

pub fn merged_pr(number: u64, loc: u64) -> PullRequest {
    let created_at = Utc::now() - Duration::days(10);
    PullRequest {
        number,
        title: format!("Change #{}", number),
        body: Some("Description".to_string()),
        user: Some(GitHubUser {
            login: "author".to_string(),
        }),
        html_url: format!("https://github.com/example/repo/pull/{}", number),
        created_at,
        merged_at: Some(created_at + Duration::days(1)),
        merged: true,
        additions: loc,
        deletions: 0,
        changed_files: 1,
        labels: Vec::new(),
    }
}

pub fn unmerged_pr(number: u64) -> PullRequest {
    PullRequest {
        merged: false,
        merged_at: None,
        ..merged_pr(number, 100)
    }
}

pub fn comment(path: &str, line: Option<u32>, body: &str) -> ReviewComment {
    ReviewComment {
        user: Some(GitHubUser {
            login: "reviewer".to_string(),
        }),
        path: path.to_string(),
        line,
        body: body.to_string(),
        created_at: Utc::now(),
    }
}

pub fn review(state: ReviewState, body: Option<&str>) -> Review {
    Review {
        user: None,
        body: body.map(str::to_string),
        state,
        submitted_at: Some(Utc::now()),
    }
}
