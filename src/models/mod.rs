pub mod github;
pub mod record;
pub mod stats;

pub use github::*;
pub use record::*;
pub use stats::*;
