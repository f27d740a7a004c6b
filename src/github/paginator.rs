use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use crate::github::rate_limiter::RateLimitTracker;
use crate::error::{Error, Result};

pub struct Paginator<'a> {
    client: &'a Client,
    rate_limiter: &'a RateLimitTracker,
}

pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next: bool,
}

impl<'a> Paginator<'a> {
    pub fn new(client: &'a Client, rate_limiter: &'a RateLimitTracker) -> Self {
        Self {
            client,
            rate_limiter,
        }
    }

    pub async fn fetch_page<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        page: u32,
    ) -> Result<Page<T>> {
        let separator = if base_url.contains('?') { "&" } else { "?" };
        let url = format!("{}{}per_page={}&page={}", base_url, separator, per_page, page);

        tracing::debug!("Fetching: {}", url);
        let response = self.client.get(&url).send().await?;
        self.rate_limiter.update_from_response(&response);
        let response = ensure_success(response, &url).await?;

        // Check for next page in Link header
        let has_next = response
            .headers()
            .get("link")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.contains("rel=\"next\""))
            .unwrap_or(false);

        let items: Vec<T> = response.json().await?;
        Ok(Page { items, has_next })
    }

    pub async fn fetch_all<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let Page { items, has_next } = self.fetch_page(base_url, per_page, page).await?;
            let items_count = items.len();
            all_items.extend(items);

            if !has_next || items_count < per_page as usize {
                break;
            }

            page += 1;
        }

        Ok(all_items)
    }

    pub async fn fetch_limited<T: DeserializeOwned>(
        &self,
        base_url: &str,
        per_page: u32,
        max_items: u32,
    ) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        if max_items == 0 {
            return Ok(all_items);
        }

        loop {
            let Page { items, has_next } = self.fetch_page(base_url, per_page, page).await?;
            let items_count = items.len();
            all_items.extend(items);

            if all_items.len() >= max_items as usize || !has_next || items_count < per_page as usize
            {
                break;
            }

            page += 1;
        }

        all_items.truncate(max_items as usize);
        Ok(all_items)
    }
}

pub(crate) async fn ensure_success(response: Response, url: &str) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(Error::GitHubApi(format!("GET {} failed: {} - {}", url, status, body)))
}
