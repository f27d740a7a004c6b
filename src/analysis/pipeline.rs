use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

use crate::analysis::charts::ChartRenderer;
use crate::analysis::latex::render_latex_table;
use crate::analysis::paper::render_paper_text;
use crate::analysis::report::render_text_report;
use crate::analysis::statistics::generate_statistics;
use crate::config::AnalyzerConfig;
use crate::error::Result;
use crate::models::DatasetStats;
use crate::storage::CorpusStore;

pub const REPORT_FILE: &str = "summary_report.txt";
pub const LATEX_FILE: &str = "latex_table.tex";
pub const PAPER_FILE: &str = "paper_text.txt";

/// Everything one analysis run produced.
#[derive(Debug)]
pub struct AnalysisOutputs {
    pub stats: DatasetStats,
    pub report: String,
    pub latex: String,
    pub paper: String,
    pub figures: Vec<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl AnalysisOutputs {
    pub fn generated_paths(&self) -> impl Iterator<Item = &Path> {
        self.figures.iter().chain(self.files.iter()).map(PathBuf::as_path)
    }
}

pub struct AnalysisPipeline {
    store: CorpusStore,
    charts: ChartRenderer,
    config: AnalyzerConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AnalyzerConfig) -> Self {
        Self {
            store: CorpusStore::new(&config.corpus_path),
            charts: ChartRenderer::new(&config.figures_dir),
            config,
        }
    }

    pub fn run(&self) -> Result<AnalysisOutputs> {
        let records = self.store.load()?;

        tracing::info!("Generating statistics...");
        let stats = generate_statistics(&records);

        // Render all text up front so an empty corpus fails before anything is written.
        let report = render_text_report(&stats, Utc::now())?;
        let latex = render_latex_table(&stats);
        let paper = render_paper_text(&stats);

        tracing::info!("Creating visualizations...");
        let figures = self.charts.render_all(&stats)?;

        fs::create_dir_all(&self.config.data_dir)?;
        let files = vec![
            self.write(REPORT_FILE, &report)?,
            self.write(LATEX_FILE, &latex)?,
            self.write(PAPER_FILE, &paper)?,
        ];

        Ok(AnalysisOutputs {
            stats,
            report,
            latex,
            paper,
            figures,
            files,
        })
    }

    fn write(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.config.data_dir.join(name);
        fs::write(&path, contents)?;
        tracing::info!("Saved: {}", path.display());
        Ok(path)
    }
}
