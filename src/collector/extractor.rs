use crate::config::CollectorConfig;
use crate::error::{Error, Result};
use crate::github::PullRequestSource;
use crate::models::github::login_or_ghost;
use crate::models::{
    CollectedPr, GeneralReview, HumanReview, InlineComment, PrMetadata, PullRequest, RepoRef,
};

/// Turns an accepted pull request into a corpus record with its human reviews.
pub struct ReviewExtractor {
    inline_comment_limit: u32,
    min_review_chars: usize,
}

impl ReviewExtractor {
    pub fn new(inline_comment_limit: u32, min_review_chars: usize) -> Self {
        Self {
            inline_comment_limit,
            min_review_chars,
        }
    }

    pub fn from_config(config: &CollectorConfig) -> Self {
        Self::new(config.inline_comment_limit, config.min_review_chars)
    }

    /// Inline comments and general reviews are fetched independently; a failed
    /// fetch contributes no reviews but does not fail the record.
    pub async fn extract_pr_data<S: PullRequestSource + ?Sized>(
        &self,
        source: &S,
        repo: &RepoRef,
        pr: &PullRequest,
    ) -> Result<CollectedPr> {
        let mut record = build_record(repo, pr)?;

        match source
            .review_comments(repo, pr.number, self.inline_comment_limit)
            .await
        {
            Ok(comments) => {
                record.human_reviews.extend(comments.into_iter().map(|c| {
                    HumanReview::Inline(InlineComment {
                        reviewer: login_or_ghost(&c.user),
                        timestamp: c.created_at,
                        file: c.path,
                        line_number: c.line.unwrap_or(0),
                        content: c.body,
                    })
                }));
            }
            Err(e) => {
                tracing::warn!("Inline comments unavailable for {}: {}", record.pr_id, e);
            }
        }

        match source.reviews(repo, pr.number).await {
            Ok(reviews) => {
                for review in reviews {
                    let Some(body) = review.body.filter(|b| self.has_enough_text(b)) else {
                        continue;
                    };
                    record.human_reviews.push(HumanReview::General(GeneralReview {
                        reviewer: login_or_ghost(&review.user),
                        timestamp: review.submitted_at,
                        content: body,
                        state: review.state,
                    }));
                }
            }
            Err(e) => {
                tracing::warn!("Reviews unavailable for {}: {}", record.pr_id, e);
            }
        }

        record.metadata.num_review_comments = record.human_reviews.len();
        Ok(record)
    }

    fn has_enough_text(&self, body: &str) -> bool {
        body.trim().chars().count() > self.min_review_chars
    }
}

fn build_record(repo: &RepoRef, pr: &PullRequest) -> Result<CollectedPr> {
    let author = pr
        .user
        .as_ref()
        .map(|u| u.login.clone())
        .ok_or_else(|| Error::GitHubApi(format!("{}#{} has no author", repo, pr.number)))?;

    Ok(CollectedPr {
        pr_id: format!("{}#{}", repo, pr.number),
        repository: repo.clone(),
        pr_number: pr.number,
        title: pr.title.clone(),
        description: pr.body.clone().unwrap_or_default(),
        author,
        created_at: pr.created_at,
        merged_at: pr.merged_at,
        url: pr.html_url.clone(),
        files_changed: Vec::new(),
        human_reviews: Vec::new(),
        metadata: PrMetadata {
            loc_added: pr.additions,
            loc_deleted: pr.deletions,
            num_files: pr.changed_files,
            num_review_comments: 0,
            labels: pr.labels.iter().map(|l| l.name.clone()).collect(),
        },
    })
}
