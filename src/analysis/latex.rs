use crate::models::{short_repo_name, DatasetStats};

fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '_' | '&' | '%' | '#' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// `booktabs` table with one row per repository and a totals row.
pub fn render_latex_table(stats: &DatasetStats) -> String {
    let mut lines: Vec<String> = vec![
        "% LaTeX Table for CodeReviewBench Dataset".to_string(),
        "% Copy this into your paper's Section 4 (Experimental Setup)".to_string(),
        String::new(),
        "\\begin{table}[t]".to_string(),
        "\\centering".to_string(),
        "\\small".to_string(),
        "\\begin{tabular}{lrrrr}".to_string(),
        "\\toprule".to_string(),
        "\\textbf{Repository} & \\textbf{PRs} & \\textbf{Reviews} & \\textbf{Avg Rev/PR} & \\textbf{Avg LOC} \\\\"
            .to_string(),
        "\\midrule".to_string(),
    ];

    for (repo, repo_stats) in &stats.by_repo {
        lines.push(format!(
            "{:<20} & {:>3} & {:>4} & {:>4.1} & {:>6.0} \\\\",
            escape_latex(short_repo_name(repo)),
            repo_stats.count,
            repo_stats.reviews,
            repo_stats.avg_reviews(),
            repo_stats.avg_loc()
        ));
    }

    lines.push("\\midrule".to_string());
    lines.push(format!(
        "\\textbf{{Total/Average}} & \\textbf{{{}}} & \\textbf{{{}}} & \\textbf{{{:.1}}} & \\textbf{{{:.0}}} \\\\",
        stats.total_prs, stats.total_reviews, stats.avg_reviews_per_pr, stats.avg_loc_per_pr
    ));
    lines.push("\\bottomrule".to_string());
    lines.push("\\end{tabular}".to_string());
    lines.push(
        "\\caption{Dataset Statistics: Collected Pull Requests and Review Comments}".to_string(),
    );
    lines.push("\\label{tab:dataset_stats}".to_string());
    lines.push("\\end{table}".to_string());

    lines.join("\n")
}
