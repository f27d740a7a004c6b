use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::github::paginator::{ensure_success, Paginator};
use crate::github::rate_limiter::RateLimitTracker;
use crate::github::source::PullRequestSource;
use crate::models::{
    PullRequest, PullRequestSummary, RateLimitResponse, RateLimitWindow, RepoRef, Repository,
    Review, ReviewComment,
};

pub struct GitHubClient {
    client: Client,
    rate_limiter: RateLimitTracker,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: &str) -> Result<Self> {
        Self::with_base_url(token, "https://api.github.com")
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&format!("Bearer {}", token))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            header::HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_static("reviewbench-collector/0.1"),
        );

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimitTracker::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(url).send().await?;
        self.rate_limiter.update_from_response(&response);
        let response = ensure_success(response, url).await?;
        Ok(response.json().await?)
    }

    fn pulls_url(&self, repo: &RepoRef) -> String {
        format!("{}/repos/{}/{}/pulls", self.base_url, repo.owner, repo.name)
    }

    pub fn rate_limiter(&self) -> &RateLimitTracker {
        &self.rate_limiter
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn repository(&self, repo: &RepoRef) -> Result<Repository> {
        let url = format!("{}/repos/{}/{}", self.base_url, repo.owner, repo.name);
        tracing::info!("Fetching repository: {}", repo);

        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::RepoNotFound(repo.full_name()));
        }

        let response = ensure_success(response, &url).await?;
        Ok(response.json().await?)
    }

    async fn closed_pulls(
        &self,
        repo: &RepoRef,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<PullRequestSummary>> {
        let url = format!(
            "{}?state=closed&sort=updated&direction=desc",
            self.pulls_url(repo)
        );
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        let page = paginator.fetch_page(&url, per_page, page).await?;
        Ok(page.items)
    }

    async fn pull_request(&self, repo: &RepoRef, number: u64) -> Result<PullRequest> {
        let url = format!("{}/{}", self.pulls_url(repo), number);
        self.get_json(&url).await
    }

    async fn review_comments(
        &self,
        repo: &RepoRef,
        number: u64,
        limit: u32,
    ) -> Result<Vec<ReviewComment>> {
        let url = format!("{}/{}/comments", self.pulls_url(repo), number);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_limited(&url, limit.clamp(1, 100), limit).await
    }

    async fn reviews(&self, repo: &RepoRef, number: u64) -> Result<Vec<Review>> {
        let url = format!("{}/{}/reviews", self.pulls_url(repo), number);
        let paginator = Paginator::new(&self.client, &self.rate_limiter);
        paginator.fetch_all(&url, 100).await
    }

    async fn rate_limit(&self) -> Result<RateLimitWindow> {
        let url = format!("{}/rate_limit", self.base_url);
        let response: RateLimitResponse = self.get_json(&url).await?;
        self.rate_limiter.record(response.resources.core);
        Ok(response.resources.core)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn flask() -> RepoRef {
        RepoRef::new("pallets", "flask")
    }

    #[tokio::test]
    async fn test_closed_pulls_requests_updated_desc() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/pallets/flask/pulls"))
            .and(query_param("state", "closed"))
            .and(query_param("sort", "updated"))
            .and(query_param("direction", "desc"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "number": 5412,
                    "title": "Support async views",
                    "updated_at": "2024-05-01T12:00:00Z",
                    "merged_at": "2024-04-30T09:00:00Z"
                },
                {
                    "number": 5400,
                    "title": "Drop Python 3.7",
                    "updated_at": "2024-04-29T12:00:00Z",
                    "merged_at": null
                }
            ])))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let pulls = client.closed_pulls(&flask(), 2, 30).await.unwrap();

        assert_eq!(pulls.len(), 2);
        assert_eq!(pulls[0].number, 5412);
        assert!(pulls[1].merged_at.is_none());
    }

    #[tokio::test]
    async fn test_pull_request_detail_and_quota_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/pallets/flask/pulls/5412"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("x-ratelimit-limit", "5000")
                    .insert_header("x-ratelimit-remaining", "4321")
                    .insert_header("x-ratelimit-reset", "1700000000")
                    .set_body_json(json!({
                        "number": 5412,
                        "title": "Support async views",
                        "body": null,
                        "user": { "login": "davidism" },
                        "html_url": "https://github.com/pallets/flask/pull/5412",
                        "created_at": "2024-04-01T09:00:00Z",
                        "merged_at": "2024-04-30T09:00:00Z",
                        "merged": true,
                        "additions": 120,
                        "deletions": 30,
                        "changed_files": 4,
                        "labels": [{ "name": "feature" }]
                    })),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let pr = client.pull_request(&flask(), 5412).await.unwrap();

        assert!(pr.merged);
        assert_eq!(pr.loc(), 150);
        assert_eq!(pr.labels[0].name, "feature");
        assert_eq!(client.rate_limiter().snapshot().map(|w| w.remaining), Some(4321));
    }

    #[tokio::test]
    async fn test_review_comments_are_truncated_to_limit() {
        let server = MockServer::start().await;
        let comments: Vec<_> = (0..5)
            .map(|i| {
                json!({
                    "user": { "login": "reviewer" },
                    "path": "src/flask/app.py",
                    "line": i,
                    "body": format!("comment {}", i),
                    "created_at": "2024-04-02T09:00:00Z"
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/repos/pallets/flask/pulls/1/comments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(comments)))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let fetched = client.review_comments(&flask(), 1, 3).await.unwrap();

        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[2].body, "comment 2");
    }

    #[tokio::test]
    async fn test_missing_repository_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/pallets/flask"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let result = client.repository(&flask()).await;

        assert!(matches!(result, Err(Error::RepoNotFound(name)) if name == "pallets/flask"));
    }

    #[tokio::test]
    async fn test_server_error_becomes_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/pallets/flask/pulls/9/reviews"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let result = client.reviews(&flask(), 9).await;

        assert!(matches!(result, Err(Error::GitHubApi(msg)) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_rate_limit_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": { "limit": 5000, "remaining": 4999, "reset": 1700000000 }
                }
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::with_base_url("test-token", &server.uri()).unwrap();
        let window = client.rate_limit().await.unwrap();

        assert_eq!(window.limit, 5000);
        assert_eq!(window.remaining, 4999);
    }
}
