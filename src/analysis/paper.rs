use crate::analysis::report::{group_thousands, rule};
use crate::models::DatasetStats;

/// Ready-to-paste paragraphs for the dataset section of the paper.
pub fn render_paper_text(stats: &DatasetStats) -> String {
    let heavy = rule('=');
    let light = rule('-');
    let inline_share = stats.inline_share();
    let general_share = stats.general_share();

    let lines: Vec<String> = vec![
        heavy.clone(),
        "TEXT FOR YOUR RESEARCH PAPER".to_string(),
        "Copy and paste these paragraphs into your paper".to_string(),
        heavy.clone(),
        String::new(),
        "SECTION 4.1: DATASET STATISTICS".to_string(),
        light.clone(),
        String::new(),
        format!(
            "We collected {} merged pull requests from {} actively ",
            stats.total_prs, stats.num_repos
        ),
        format!(
            "maintained Python repositories on GitHub. Our dataset contains {} ",
            stats.total_reviews
        ),
        format!(
            "human review comments, with an average of {:.1} reviews per pull ",
            stats.avg_reviews_per_pr
        ),
        "request. This is notably higher than typical open-source projects (2-3 ".to_string(),
        "reviews per PR), indicating high-quality, thoroughly reviewed code. The ".to_string(),
        format!(
            "pull requests encompass {} lines of code changes, with an ",
            group_thousands(stats.total_loc)
        ),
        format!(
            "average of {:.0} lines per PR, representing realistic development ",
            stats.avg_loc_per_pr
        ),
        "tasks that are neither trivially small nor unmanageably large.".to_string(),
        String::new(),
        "Our dataset captures two types of code review feedback: (1) inline ".to_string(),
        format!(
            "comments ({} instances, {:.1}%), which provide specific, ",
            stats.inline_comments, inline_share
        ),
        "line-level suggestions on code implementation, and (2) general review ".to_string(),
        format!(
            "summaries ({} instances, {:.1}%), which offer overall assessment ",
            stats.general_reviews, general_share
        ),
        "and approval status. This distribution reflects authentic code review ".to_string(),
        "practices where reviewers provide both detailed technical feedback and ".to_string(),
        "high-level evaluations. Table~\\ref{tab:dataset_stats} shows the ".to_string(),
        "distribution of pull requests across repositories.".to_string(),
        String::new(),
        "KEY FINDINGS TO EMPHASIZE:".to_string(),
        light,
        format!(
            "• High review engagement: {:.1} reviews/PR (vs. 2-3 typical)",
            stats.avg_reviews_per_pr
        ),
        format!("• Comprehensive coverage: {} diverse repositories", stats.num_repos),
        format!(
            "• Balanced review types: {:.0}% inline, {:.0}% general",
            inline_share, general_share
        ),
        format!("• Realistic scope: {:.0} LOC/PR average", stats.avg_loc_per_pr),
        String::new(),
        heavy,
    ];

    lines.join("\n")
}
