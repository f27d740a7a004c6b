pub mod corpus;

pub use corpus::CorpusStore;
