use std::collections::VecDeque;

use crate::error::Result;
use crate::github::PullRequestSource;
use crate::models::{PullRequestSummary, RepoRef};

/// Lazy walk over a repository's closed pull requests, one page at a time.
///
/// A new walk always starts again from the first page.
pub struct ClosedPulls<'a, S: ?Sized> {
    source: &'a S,
    repo: &'a RepoRef,
    per_page: u32,
    next_page: u32,
    buffer: VecDeque<PullRequestSummary>,
    exhausted: bool,
}

impl<'a, S: PullRequestSource + ?Sized> ClosedPulls<'a, S> {
    pub fn new(source: &'a S, repo: &'a RepoRef, per_page: u32) -> Self {
        Self {
            source,
            repo,
            per_page: per_page.max(1),
            next_page: 1,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    pub async fn next(&mut self) -> Result<Option<PullRequestSummary>> {
        if self.buffer.is_empty() && !self.exhausted {
            let items = self
                .source
                .closed_pulls(self.repo, self.next_page, self.per_page)
                .await?;
            if items.len() < self.per_page as usize {
                self.exhausted = true;
            }
            self.next_page += 1;
            self.buffer.extend(items);
        }

        Ok(self.buffer.pop_front())
    }
}
