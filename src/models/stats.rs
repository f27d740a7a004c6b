use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RepoStats {
    pub count: usize,
    pub reviews: usize,
    pub loc: u64,
}

impl RepoStats {
    pub fn avg_reviews(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.reviews as f64 / self.count as f64
        }
    }

    pub fn avg_loc(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.loc as f64 / self.count as f64
        }
    }
}

/// Aggregate over a collected corpus. Always derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStats {
    pub total_prs: usize,
    pub total_reviews: usize,
    pub inline_comments: usize,
    pub general_reviews: usize,
    pub total_loc_added: u64,
    pub total_loc_deleted: u64,
    pub total_loc: u64,
    /// Sorted, unique repository names.
    pub repos: Vec<String>,
    pub num_repos: usize,
    pub by_repo: BTreeMap<String, RepoStats>,
    pub review_counts: Vec<usize>,
    pub loc_counts: Vec<u64>,
    pub avg_reviews_per_pr: f64,
    pub avg_loc_per_pr: f64,
}

impl DatasetStats {
    /// Share of inline comments among all reviews, in percent.
    pub fn inline_share(&self) -> f64 {
        percent(self.inline_comments, self.total_reviews)
    }

    pub fn general_share(&self) -> f64 {
        percent(self.general_reviews, self.total_reviews)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Repository name without its owner.
pub fn short_repo_name(full_name: &str) -> &str {
    full_name.rsplit('/').next().unwrap_or(full_name)
}
