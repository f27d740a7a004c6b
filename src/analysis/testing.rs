//! Corpus builders shared by the analysis tests.

use chrono::{DateTime, Utc};

use crate::models::{
    CollectedPr, GeneralReview, HumanReview, InlineComment, PrMetadata, RepoRef, ReviewState,
};

fn epoch() -> DateTime<Utc> {
    "2024-01-01T00:00:00Z".parse().unwrap()
}

pub fn inline() -> HumanReview {
    HumanReview::Inline(InlineComment {
        reviewer: "r".to_string(),
        timestamp: epoch(),
        file: "f.py".to_string(),
        line_number: 1,
        content: "x".to_string(),
    })
}

pub fn general() -> HumanReview {
    HumanReview::General(GeneralReview {
        reviewer: "r".to_string(),
        timestamp: None,
        content: "Approving with minor notes".to_string(),
        state: ReviewState::Approved,
    })
}

pub fn reviews(inline_count: usize, general_count: usize) -> Vec<HumanReview> {
    std::iter::repeat_with(inline)
        .take(inline_count)
        .chain(std::iter::repeat_with(general).take(general_count))
        .collect()
}

pub fn pr(repo: &str, number: u64, reviews: Vec<HumanReview>, added: u64, deleted: u64) -> CollectedPr {
    let repository: RepoRef = repo.parse().unwrap();
    CollectedPr {
        pr_id: format!("{}#{}", repository, number),
        repository,
        pr_number: number,
        title: "t".to_string(),
        description: String::new(),
        author: "a".to_string(),
        created_at: epoch(),
        merged_at: None,
        url: String::new(),
        files_changed: Vec::new(),
        metadata: PrMetadata {
            loc_added: added,
            loc_deleted: deleted,
            num_files: 1,
            num_review_comments: reviews.len(),
            labels: Vec::new(),
        },
        human_reviews: reviews,
    }
}

/// Three repositories with uneven review activity.
pub fn sample_corpus() -> Vec<CollectedPr> {
    vec![
        pr("pallets/flask", 1, reviews(2, 1), 40, 10),
        pr("django/django", 2, reviews(0, 4), 1200, 300),
        pr("pallets/flask", 3, reviews(1, 0), 5, 5),
        pr("tiangolo/sqlmodel", 4, reviews(3, 1), 80, 20),
    ]
}
