pub mod extractor;
pub mod filter;
pub mod listing;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::ReviewExtractor;
pub use filter::{RejectReason, RejectionTally, SuitabilityFilter};
pub use listing::ClosedPulls;
pub use pipeline::{CollectionPipeline, RepoScan};
