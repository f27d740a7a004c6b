use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::config::FilterCriteria;
use crate::models::PullRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    NotMerged,
    TooSmall,
    TooLarge,
    TooOld,
    NoReviews,
    Error,
}

const REASON_COUNT: usize = 6;

impl RejectReason {
    pub const ALL: [RejectReason; REASON_COUNT] = [
        RejectReason::NotMerged,
        RejectReason::TooSmall,
        RejectReason::TooLarge,
        RejectReason::TooOld,
        RejectReason::NoReviews,
        RejectReason::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NotMerged => "not_merged",
            RejectReason::TooSmall => "too_small",
            RejectReason::TooLarge => "too_large",
            RejectReason::TooOld => "too_old",
            RejectReason::NoReviews => "no_reviews",
            RejectReason::Error => "error",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejection counts for one repository scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RejectionTally {
    counts: [usize; REASON_COUNT],
}

impl RejectionTally {
    pub fn record(&mut self, reason: RejectReason) {
        self.counts[reason.index()] += 1;
    }

    pub fn get(&self, reason: RejectReason) -> usize {
        self.counts[reason.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Reasons with a non-zero count, in declaration order.
    pub fn non_zero(&self) -> impl Iterator<Item = (RejectReason, usize)> + '_ {
        RejectReason::ALL
            .iter()
            .map(|r| (*r, self.get(*r)))
            .filter(|(_, count)| *count > 0)
    }
}

impl fmt::Display for RejectionTally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "not_merged={}, no_reviews={}, size={}",
            self.get(RejectReason::NotMerged),
            self.get(RejectReason::NoReviews),
            self.get(RejectReason::TooSmall) + self.get(RejectReason::TooLarge)
        )
    }
}

/// Accept/reject predicate applied to a pull request before its reviews are fetched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SuitabilityFilter {
    criteria: FilterCriteria,
}

impl SuitabilityFilter {
    pub fn new(criteria: FilterCriteria) -> Self {
        Self { criteria }
    }

    pub fn evaluate(
        &self,
        pr: &PullRequest,
        now: DateTime<Utc>,
    ) -> std::result::Result<(), RejectReason> {
        if !pr.merged {
            return Err(RejectReason::NotMerged);
        }

        let total_changes = pr.loc();
        if total_changes < self.criteria.min_loc {
            return Err(RejectReason::TooSmall);
        }
        if total_changes > self.criteria.max_loc {
            return Err(RejectReason::TooLarge);
        }

        let cutoff = now - Duration::days(self.criteria.max_age_days);
        if pr.created_at < cutoff {
            return Err(RejectReason::TooOld);
        }

        Ok(())
    }
}
