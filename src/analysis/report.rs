use chrono::{DateTime, Utc};

use crate::analysis::statistics::{loc_distribution, review_distribution, Distribution};
use crate::error::Result;
use crate::models::DatasetStats;

const RULE_WIDTH: usize = 70;

pub(crate) fn rule(c: char) -> String {
    std::iter::repeat(c).take(RULE_WIDTH).collect()
}

/// Formats an integer with `,` thousands separators.
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn format_std_dev(dist: &Distribution) -> String {
    dist.std_dev
        .map(|s| format!("{:.2}", s))
        .unwrap_or_else(|| "n/a".to_string())
}

/// Plain-text dataset summary. Fails on an empty corpus, since its
/// distribution sections are undefined there.
pub fn render_text_report(stats: &DatasetStats, generated_at: DateTime<Utc>) -> Result<String> {
    let reviews = review_distribution(stats)?;
    let loc = loc_distribution(stats)?;

    let mut out = String::new();
    let heavy = rule('=');
    let light = rule('-');

    out.push_str(&heavy);
    out.push('\n');
    out.push_str("CODEREVIEWBENCH DATASET SUMMARY REPORT\n");
    out.push_str(&format!("Generated: {}\n", generated_at.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&heavy);
    out.push('\n');
    out.push('\n');

    out.push_str("OVERALL STATISTICS\n");
    out.push_str(&light);
    out.push('\n');
    out.push_str(&format!("Total Pull Requests:             {}\n", stats.total_prs));
    out.push_str(&format!("Total Repositories:              {}\n", stats.num_repos));
    out.push_str(&format!("Total Review Comments:           {}\n", stats.total_reviews));
    out.push_str(&format!(
        "  - Inline Comments:             {} ({:.1}%)\n",
        stats.inline_comments,
        stats.inline_share()
    ));
    out.push_str(&format!(
        "  - General Reviews:             {} ({:.1}%)\n",
        stats.general_reviews,
        stats.general_share()
    ));
    out.push_str(&format!("Average Reviews per PR:          {:.2}\n", stats.avg_reviews_per_pr));
    out.push_str(&format!("Total Lines Changed:             {}\n", group_thousands(stats.total_loc)));
    out.push_str(&format!("  - Lines Added:                 {}\n", group_thousands(stats.total_loc_added)));
    out.push_str(&format!("  - Lines Deleted:               {}\n", group_thousands(stats.total_loc_deleted)));
    out.push_str(&format!("Average LOC Changed per PR:      {:.1}\n", stats.avg_loc_per_pr));
    out.push('\n');

    out.push_str("REVIEW COMMENT STATISTICS\n");
    out.push_str(&light);
    out.push('\n');
    out.push_str(&format!("Minimum reviews per PR:          {:.0}\n", reviews.min));
    out.push_str(&format!("Maximum reviews per PR:          {:.0}\n", reviews.max));
    out.push_str(&format!("Median reviews per PR:           {:.0}\n", reviews.median));
    out.push_str(&format!("Standard deviation:              {}\n", format_std_dev(&reviews)));
    out.push('\n');

    out.push_str("CODE CHANGE STATISTICS\n");
    out.push_str(&light);
    out.push('\n');
    out.push_str(&format!("Minimum LOC per PR:              {:.0}\n", loc.min));
    out.push_str(&format!("Maximum LOC per PR:              {:.0}\n", loc.max));
    out.push_str(&format!("Median LOC per PR:               {:.0}\n", loc.median));
    out.push_str(&format!("Standard deviation:              {}\n", format_std_dev(&loc)));
    out.push('\n');

    out.push_str("PER-REPOSITORY BREAKDOWN\n");
    out.push_str(&light);
    out.push('\n');
    out.push_str(&format!("{:<35} {:>5} {:>8} {:>6} {:>8}\n", "Repository", "PRs", "Reviews", "Avg", "LOC"));
    out.push_str(&light);
    out.push('\n');
    for (repo, repo_stats) in &stats.by_repo {
        out.push_str(&format!(
            "{:<35} {:>5} {:>8} {:>6.1} {:>8.0}\n",
            repo,
            repo_stats.count,
            repo_stats.reviews,
            repo_stats.avg_reviews(),
            repo_stats.avg_loc()
        ));
    }
    out.push('\n');

    out.push_str("REPOSITORIES INCLUDED\n");
    out.push_str(&light);
    out.push('\n');
    for repo in &stats.repos {
        out.push_str(&format!("  • {}\n", repo));
    }
    out.push('\n');

    out.push_str(&heavy);
    out.push('\n');
    out.push_str("END OF REPORT\n");
    out.push_str(&heavy);

    Ok(out)
}
