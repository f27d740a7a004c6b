use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use reviewbench::analysis::AnalysisOutputs;
use reviewbench::models::{DatasetStats, RepoRef};
use reviewbench::{
    generate_statistics, AnalysisPipeline, AnalyzerConfig, CollectionPipeline, CollectorConfig,
    Config, CorpusStore, GitHubClient,
};

#[derive(Parser, Debug)]
#[command(name = "reviewbench")]
#[command(version = "0.1.0")]
#[command(about = "Collect human code reviews from GitHub pull requests and summarize the dataset")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect merged, reviewed pull requests into a JSON corpus
    Collect {
        /// Repository to collect from as owner/name (repeatable, replaces the defaults)
        #[arg(long = "repo")]
        repos: Vec<RepoRef>,

        /// Accepted pull requests per repository
        #[arg(long)]
        max_per_repo: Option<usize>,

        /// Stop visiting repositories once this many pull requests are collected
        #[arg(long)]
        target_total: Option<usize>,

        /// Corpus file (defaults to $DATA_DIR/collected_prs.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compute statistics, charts and paper text from a collected corpus
    Analyze {
        /// Corpus file (defaults to $DATA_DIR/collected_prs.json)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory for the text outputs
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Directory for the charts
        #[arg(long)]
        figures_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("reviewbench=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Command::Collect {
            repos,
            max_per_repo,
            target_total,
            output,
        } => {
            let mut collector_config = CollectorConfig::try_from(&config)?;
            if let Some(max) = max_per_repo {
                collector_config.max_per_repo = max;
            }
            if let Some(target) = target_total {
                collector_config.target_total = target;
            }
            let repos = if repos.is_empty() {
                Config::default_repositories()
            } else {
                repos
            };
            let output = output.unwrap_or_else(|| config.corpus_path());

            collect(&config, collector_config, &repos, output).await
        }
        Command::Analyze {
            input,
            data_dir,
            figures_dir,
        } => {
            let mut analyzer_config = AnalyzerConfig::from(&config);
            if let Some(input) = input {
                analyzer_config.corpus_path = input;
            }
            if let Some(dir) = data_dir {
                analyzer_config.data_dir = dir;
            }
            if let Some(dir) = figures_dir {
                analyzer_config.figures_dir = dir;
            }

            analyze(analyzer_config);
            Ok(())
        }
    }
}

async fn collect(
    config: &Config,
    collector_config: CollectorConfig,
    repos: &[RepoRef],
    output: PathBuf,
) -> anyhow::Result<()> {
    let github = GitHubClient::with_base_url(config.github_token()?, &config.api_base_url)?;
    let pipeline = CollectionPipeline::new(github, collector_config);

    tracing::info!("Collecting from {} repositories", repos.len());
    let records = pipeline.collect_all(repos).await;

    if records.is_empty() {
        println!("{}", no_data_message());
        return Ok(());
    }

    let store = CorpusStore::new(&output);
    store.save(&records)?;

    let stats = generate_statistics(&records);
    println!("{}", collection_summary(&stats, &output));
    Ok(())
}

fn analyze(config: AnalyzerConfig) {
    let pipeline = AnalysisPipeline::new(config);

    match pipeline.run() {
        Ok(outputs) => println!("{}", analysis_summary(&outputs)),
        Err(e) => tracing::error!("Analysis failed: {}", e),
    }
}

fn collection_summary(stats: &DatasetStats, output: &std::path::Path) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("DATA COLLECTION SUCCESSFUL\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str(&format!("   Total PRs:              {}\n", stats.total_prs));
    out.push_str(&format!("   Repositories:           {}\n", stats.num_repos));
    out.push_str(&format!("   Total reviews:          {}\n", stats.total_reviews));
    out.push_str(&format!("   - Inline comments:      {}\n", stats.inline_comments));
    out.push_str(&format!("   - General reviews:      {}\n", stats.general_reviews));
    out.push_str(&format!("   Avg reviews per PR:     {:.1}\n", stats.avg_reviews_per_pr));
    out.push_str(&format!(
        "   Total lines changed:    {}\n",
        reviewbench::analysis::report::group_thousands(stats.total_loc)
    ));
    out.push_str(&format!("   Avg LOC per PR:         {:.0}\n", stats.avg_loc_per_pr));
    out.push_str(&format!("   Output file:            {}\n", output.display()));
    out.push_str(&format!("{}\n", rule));
    out.push_str("Next step: run `reviewbench analyze` to create the report and charts.");

    out
}

fn no_data_message() -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", rule));
    out.push_str("NO DATA COLLECTED\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str("Troubleshooting:\n");
    out.push_str("   1. Check your internet connection\n");
    out.push_str("   2. Verify GITHUB_TOKEN is set and valid\n");
    out.push_str("   3. Check the rate limit (you might need to wait)\n");
    out.push_str("   4. Try with just one repository first (--repo owner/name)\n");
    out.push_str(&rule);

    out
}

fn analysis_summary(outputs: &AnalysisOutputs) -> String {
    let rule = "=".repeat(70);
    let mut out = String::new();

    out.push_str(&outputs.report);
    out.push_str("\n\nLATEX TABLE\n");
    out.push_str(&format!("{}\n", "-".repeat(70)));
    out.push_str(&outputs.latex);
    out.push_str(&format!("\n{}\n\n", "-".repeat(70)));
    out.push_str(&outputs.paper);
    out.push_str(&format!("\n\n{}\n", rule));
    out.push_str("ANALYSIS COMPLETE\n");
    out.push_str(&format!("{}\n", rule));
    out.push_str("Generated files:\n");
    for path in outputs.generated_paths() {
        out.push_str(&format!("  - {}\n", path.display()));
    }
    out.push_str(&rule);

    out
}
