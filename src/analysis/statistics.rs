use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::models::{CollectedPr, DatasetStats, HumanReview};

/// Aggregates the corpus in a single pass.
pub fn generate_statistics(records: &[CollectedPr]) -> DatasetStats {
    let mut stats = DatasetStats {
        total_prs: records.len(),
        ..DatasetStats::default()
    };
    let mut repos = BTreeSet::new();

    for pr in records {
        let repo = pr.repository.full_name();
        repos.insert(repo.clone());

        let num_reviews = pr.human_reviews.len();
        stats.total_reviews += num_reviews;
        stats.review_counts.push(num_reviews);

        for review in &pr.human_reviews {
            match review {
                HumanReview::Inline(_) => stats.inline_comments += 1,
                HumanReview::General(_) => stats.general_reviews += 1,
            }
        }

        let loc = pr.total_loc();
        stats.total_loc_added += pr.metadata.loc_added;
        stats.total_loc_deleted += pr.metadata.loc_deleted;
        stats.loc_counts.push(loc);

        let repo_stats = stats.by_repo.entry(repo).or_default();
        repo_stats.count += 1;
        repo_stats.reviews += num_reviews;
        repo_stats.loc += loc;
    }

    stats.repos = repos.into_iter().collect();
    stats.num_repos = stats.repos.len();
    stats.total_loc = stats.total_loc_added + stats.total_loc_deleted;
    if stats.total_prs > 0 {
        stats.avg_reviews_per_pr = stats.total_reviews as f64 / stats.total_prs as f64;
        stats.avg_loc_per_pr = stats.total_loc as f64 / stats.total_prs as f64;
    }

    stats
}

/// Summary of a per-PR sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    /// Lower middle element for even-length samples; never interpolated.
    pub median: f64,
    /// Sample standard deviation (N-1); `None` below two observations.
    pub std_dev: Option<f64>,
}

impl Distribution {
    pub fn from_sample<T: Copy + Into<f64>>(sample: &[T]) -> Result<Self> {
        if sample.is_empty() {
            return Err(Error::EmptySample("distribution"));
        }

        let mut sorted: Vec<f64> = sample.iter().map(|v| (*v).into()).collect();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let std_dev = (n > 1).then(|| {
            let sum_sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (n - 1) as f64).sqrt()
        });

        Ok(Self {
            min: sorted[0],
            max: sorted[n - 1],
            median: sorted[(n - 1) / 2],
            std_dev,
        })
    }
}

/// Review counts are small integers, so they are converted through `u32`.
pub fn review_distribution(stats: &DatasetStats) -> Result<Distribution> {
    let sample: Vec<u32> = stats
        .review_counts
        .iter()
        .map(|c| u32::try_from(*c).unwrap_or(u32::MAX))
        .collect();
    Distribution::from_sample(&sample)
}

pub fn loc_distribution(stats: &DatasetStats) -> Result<Distribution> {
    let sample: Vec<f64> = stats.loc_counts.iter().map(|c| *c as f64).collect();
    Distribution::from_sample(&sample)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Unit-width buckets `[0,1), [1,2), ... [max, max+1]`.
pub fn unit_histogram(sample: &[usize]) -> Result<Vec<Bucket>> {
    let max = *sample.iter().max().ok_or(Error::EmptySample("histogram"))?;
    let mut buckets: Vec<Bucket> = (0..=max)
        .map(|i| Bucket {
            lower: i as f64,
            upper: (i + 1) as f64,
            count: 0,
        })
        .collect();
    for value in sample {
        buckets[*value].count += 1;
    }
    Ok(buckets)
}

/// `bins` equal-width buckets spanning the sample; the last one is closed.
pub fn equal_width_histogram(sample: &[u64], bins: usize) -> Result<Vec<Bucket>> {
    let min = *sample.iter().min().ok_or(Error::EmptySample("histogram"))? as f64;
    let max = *sample.iter().max().ok_or(Error::EmptySample("histogram"))? as f64;
    let bins = bins.max(1);

    let (lo, hi) = if min == max {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut buckets: Vec<Bucket> = (0..bins)
        .map(|i| Bucket {
            lower: lo + width * i as f64,
            upper: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for value in sample {
        let index = (((*value as f64) - lo) / width).floor() as usize;
        buckets[index.min(bins - 1)].count += 1;
    }
    Ok(buckets)
}
