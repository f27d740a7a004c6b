pub mod analysis;
pub mod collector;
pub mod config;
pub mod error;
pub mod github;
pub mod models;
pub mod storage;

pub use analysis::{generate_statistics, AnalysisPipeline};
pub use collector::CollectionPipeline;
pub use config::{AnalyzerConfig, CollectorConfig, Config};
pub use error::{Error, Result};
pub use github::{GitHubClient, PullRequestSource};
pub use storage::CorpusStore;
