pub mod charts;
pub mod latex;
pub mod paper;
pub mod pipeline;
pub mod report;
pub mod statistics;

#[cfg(test)]
pub(crate) mod testing;

pub use charts::ChartRenderer;
pub use latex::render_latex_table;
pub use paper::render_paper_text;
pub use pipeline::{AnalysisOutputs, AnalysisPipeline};
pub use report::render_text_report;
pub use statistics::{generate_statistics, Distribution};
