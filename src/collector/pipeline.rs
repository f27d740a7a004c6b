use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};

use crate::collector::extractor::ReviewExtractor;
use crate::collector::filter::{RejectReason, RejectionTally, SuitabilityFilter};
use crate::collector::listing::ClosedPulls;
use crate::config::CollectorConfig;
use crate::error::Result;
use crate::github::PullRequestSource;
use crate::models::{CollectedPr, RepoRef};

const PAGE_SIZE: u32 = 30;
const PROGRESS_EVERY: usize = 15;

/// Outcome of scanning one repository.
#[derive(Debug, Default)]
pub struct RepoScan {
    pub accepted: Vec<CollectedPr>,
    pub examined: usize,
    pub rejected: RejectionTally,
}

pub struct CollectionPipeline<S> {
    source: S,
    filter: SuitabilityFilter,
    extractor: ReviewExtractor,
    config: CollectorConfig,
}

impl<S: PullRequestSource> CollectionPipeline<S> {
    pub fn new(source: S, config: CollectorConfig) -> Self {
        Self {
            source,
            filter: SuitabilityFilter::new(config.criteria),
            extractor: ReviewExtractor::from_config(&config),
            config,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Visits repositories in order until the target total is reached.
    pub async fn collect_all(&self, repos: &[RepoRef]) -> Vec<CollectedPr> {
        let mut all_prs = Vec::new();

        for (i, repo) in repos.iter().enumerate() {
            tracing::info!("Repository {}/{}: {}", i + 1, repos.len(), repo);

            let prs = self.collect_from_repo(repo, self.config.max_per_repo).await;
            all_prs.extend(prs);
            tracing::info!("Running total: {} PRs collected", all_prs.len());

            if all_prs.len() >= self.config.target_total {
                tracing::info!(
                    "Collected enough data ({}+ PRs), skipping remaining repositories",
                    self.config.target_total
                );
                break;
            }
        }

        all_prs
    }

    /// Never fails: any API error skips the whole repository.
    pub async fn collect_from_repo(&self, repo: &RepoRef, max_count: usize) -> Vec<CollectedPr> {
        match self.scan_repo(repo, max_count).await {
            Ok(scan) => scan.accepted,
            Err(e) => {
                tracing::error!("Skipping {}: {}", repo, e);
                Vec::new()
            }
        }
    }

    pub async fn scan_repo(&self, repo: &RepoRef, max_count: usize) -> Result<RepoScan> {
        let repository = self.source.repository(repo).await?;
        tracing::info!(
            "Found repository: {} ({} stars)",
            repository.full_name,
            repository.stargazers_count
        );
        self.log_rate_limit().await;

        let mut scan = RepoScan::default();
        let mut pulls = ClosedPulls::new(&self.source, repo, PAGE_SIZE);
        let now = Utc::now();
        let pb = progress_bar(self.config.examine_limit);

        while scan.accepted.len() < max_count && scan.examined < self.config.examine_limit {
            let Some(summary) = pulls.next().await? else {
                tracing::debug!("No more closed pull requests in {}", repo);
                break;
            };

            scan.examined += 1;
            pb.inc(1);
            if scan.examined % PROGRESS_EVERY == 0 {
                tracing::info!(
                    "Progress: checked {}, found {} (rejected: {})",
                    scan.examined,
                    scan.accepted.len(),
                    scan.rejected
                );
            }

            let pr = match self.source.pull_request(repo, summary.number).await {
                Ok(pr) => pr,
                Err(e) => {
                    tracing::debug!("Could not load {}#{}: {}", repo, summary.number, e);
                    scan.rejected.record(RejectReason::Error);
                    continue;
                }
            };

            if let Err(reason) = self.filter.evaluate(&pr, now) {
                scan.rejected.record(reason);
                continue;
            }

            match self.extractor.extract_pr_data(&self.source, repo, &pr).await {
                Ok(record) if !record.human_reviews.is_empty() => {
                    tracing::info!(
                        "PR #{}: {}... ({} LOC, {} reviews)",
                        pr.number,
                        pr.title.chars().take(35).collect::<String>(),
                        record.total_loc(),
                        record.human_reviews.len()
                    );
                    scan.accepted.push(record);
                    pb.set_message(format!("{} accepted", scan.accepted.len()));
                }
                Ok(_) => scan.rejected.record(RejectReason::NoReviews),
                Err(e) => {
                    tracing::warn!("Error extracting PR #{}: {}", pr.number, e);
                    scan.rejected.record(RejectReason::Error);
                }
            }

            if !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        if scan.examined >= self.config.examine_limit && scan.accepted.len() < max_count {
            tracing::warn!(
                "Checked {} PRs in {}, moving to next repository",
                scan.examined,
                repo
            );
        }
        pb.finish_and_clear();

        tracing::info!("Collected {} PRs from {}", scan.accepted.len(), repo);
        if scan.accepted.is_empty() {
            for (reason, count) in scan.rejected.non_zero() {
                tracing::info!("  rejected {}: {}", reason, count);
            }
        }

        Ok(scan)
    }

    async fn log_rate_limit(&self) {
        match self.source.rate_limit().await {
            Ok(window) => tracing::info!(
                "API calls remaining: {}/{}",
                window.remaining,
                window.limit
            ),
            Err(e) => tracing::debug!("Rate limit query failed: {}", e),
        }
    }
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} PRs {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::testing::{comment, merged_pr, review, unmerged_pr, FakeSource};
    use crate::models::ReviewState;
    use std::time::Duration;

    fn config() -> CollectorConfig {
        CollectorConfig {
            request_delay: Duration::ZERO,
            ..CollectorConfig::default()
        }
    }

    fn fastapi() -> RepoRef {
        RepoRef::new("fastapi", "fastapi")
    }

    fn reviewed(source: FakeSource, number: u64) -> FakeSource {
        source.with_comments(number, vec![comment("main.py", Some(1), "Use a constant here")])
    }

    #[tokio::test]
    async fn test_accepted_prs_always_have_reviews() {
        let mut source = FakeSource::new(fastapi())
            .with_pulls((1..=6).map(|n| merged_pr(n, 50)));
        for n in [2, 4] {
            source = reviewed(source, n);
        }
        source = source.with_reviews(6, vec![review(ReviewState::Approved, Some("ok"))]);

        let pipeline = CollectionPipeline::new(source, config());
        let scan = pipeline.scan_repo(&fastapi(), 10).await.unwrap();

        let numbers: Vec<u64> = scan.accepted.iter().map(|pr| pr.pr_number).collect();
        assert_eq!(numbers, vec![2, 4]);
        assert!(scan.accepted.iter().all(|pr| !pr.human_reviews.is_empty()));
        assert_eq!(scan.rejected.get(RejectReason::NoReviews), 4);
        assert_eq!(scan.examined, 6);
    }

    #[tokio::test]
    async fn test_stops_at_max_count() {
        let mut source = FakeSource::new(fastapi()).with_pulls((1..=20).map(|n| merged_pr(n, 50)));
        for n in 1..=20 {
            source = reviewed(source, n);
        }

        let pipeline = CollectionPipeline::new(source, config());
        let scan = pipeline.scan_repo(&fastapi(), 3).await.unwrap();

        assert_eq!(scan.accepted.len(), 3);
        assert_eq!(scan.examined, 3);
        assert_eq!(pipeline.source().detail_calls(), 3);
    }

    #[tokio::test]
    async fn test_stops_after_examine_limit() {
        let source = FakeSource::new(fastapi()).with_pulls((1..=250).map(unmerged_pr));

        let pipeline = CollectionPipeline::new(source, config());
        let scan = pipeline.scan_repo(&fastapi(), 10).await.unwrap();

        assert!(scan.accepted.is_empty());
        assert_eq!(scan.examined, 100);
        assert_eq!(scan.rejected.get(RejectReason::NotMerged), 100);
        assert_eq!(pipeline.source().detail_calls(), 100);
    }

    #[tokio::test]
    async fn test_rejections_are_tallied_by_reason() {
        let source = FakeSource::new(fastapi())
            .with_pulls([unmerged_pr(1), merged_pr(2, 3), merged_pr(3, 5000), merged_pr(4, 40)])
            .failing_detail(4);

        let pipeline = CollectionPipeline::new(source, config());
        let scan = pipeline.scan_repo(&fastapi(), 10).await.unwrap();

        assert_eq!(scan.rejected.get(RejectReason::NotMerged), 1);
        assert_eq!(scan.rejected.get(RejectReason::TooSmall), 1);
        assert_eq!(scan.rejected.get(RejectReason::TooLarge), 1);
        assert_eq!(scan.rejected.get(RejectReason::Error), 1);
        assert_eq!(scan.rejected.total(), 4);
    }

    #[tokio::test]
    async fn test_repository_failure_yields_empty() {
        let source = FakeSource::new(fastapi()).with_pull(merged_pr(1, 50)).failing_repo();
        let source = reviewed(source, 1);

        let pipeline = CollectionPipeline::new(source, config());
        assert!(pipeline.scan_repo(&fastapi(), 10).await.is_err());
        assert!(pipeline.collect_from_repo(&fastapi(), 10).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_repository_does_not_stop_others() {
        let flask = RepoRef::new("pallets", "flask");
        let source = FakeSource::new(fastapi())
            .failing_repo()
            .and_repo(flask.clone())
            .with_pull(merged_pr(9, 80));
        let source = reviewed(source, 9);

        let pipeline = CollectionPipeline::new(source, config());
        let all = pipeline.collect_all(&[fastapi(), flask]).await;

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].pr_id, "pallets/flask#9");
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_follows_each_suitable_candidate() {
        let source = FakeSource::new(fastapi()).with_pulls([
            unmerged_pr(1),
            unmerged_pr(2),
            merged_pr(3, 50),
            merged_pr(4, 50),
        ]);
        let source = reviewed(source, 3);
        let config = CollectorConfig {
            request_delay: Duration::from_millis(200),
            ..CollectorConfig::default()
        };

        let pipeline = CollectionPipeline::new(source, config);
        let started = tokio::time::Instant::now();
        let scan = pipeline.scan_repo(&fastapi(), 10).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(scan.accepted.len(), 1);
        assert_eq!(scan.rejected.get(RejectReason::NotMerged), 2);
        assert_eq!(scan.rejected.get(RejectReason::NoReviews), 1);
        // Two sleeps: the accepted PR and the one without reviews.
        assert!(elapsed >= Duration::from_millis(400), "slept {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(600), "slept {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_collected_corpus_feeds_statistics() {
        let flask = RepoRef::new("pallets", "flask");
        let mut source = FakeSource::new(fastapi())
            .with_pulls([merged_pr(1, 50), merged_pr(2, 300), merged_pr(3, 20)]);
        for (number, count) in [(1, 2), (2, 5), (3, 1)] {
            let comments = (0..count)
                .map(|i| comment("app.py", Some(i + 1), "Please rename this variable"))
                .collect();
            source = source.with_comments(number, comments);
        }
        let source = source
            .and_repo(flask.clone())
            .with_pulls((1..=4).map(|n| merged_pr(n, 3)));

        let pipeline = CollectionPipeline::new(source, config());
        let all = pipeline.collect_all(&[fastapi(), flask]).await;
        let stats = crate::analysis::generate_statistics(&all);

        assert_eq!(stats.total_prs, 3);
        assert_eq!(stats.num_repos, 1);
        assert_eq!(stats.review_counts, vec![2, 5, 1]);
        assert_eq!(stats.loc_counts, vec![50, 300, 20]);
        assert!((stats.avg_reviews_per_pr - 8.0 / 3.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_stops_visiting_repositories_at_target() {
        let repos: Vec<RepoRef> = (0..5).map(|i| RepoRef::new("org", format!("repo{}", i))).collect();
        let mut source = FakeSource::new(repos[0].clone());
        for (i, repo) in repos.iter().enumerate() {
            if i > 0 {
                source = source.and_repo(repo.clone());
            }
            source = source.with_pulls((1..=12).map(|n| merged_pr(n, 50)));
            for n in 1..=12 {
                source = reviewed(source, n);
            }
        }

        let pipeline = CollectionPipeline::new(source, config());
        let all = pipeline.collect_all(&repos).await;

        // 10 per repository, stopping once 35 is reached after the fourth.
        assert_eq!(all.len(), 40);
        assert!(all.iter().all(|pr| pr.repository != repos[4]));
    }
}
