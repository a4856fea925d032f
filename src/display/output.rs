use crate::analysis::dataset::{MatchDataset, MatchQuery};
use crate::analysis::estimator::{Evidence, WinProbabilityEstimator};
use crate::analysis::recommender::PickRecommendation;
use crate::analysis::role::Role;
use crate::crawl::CrawlReport;
use colored::*;
use tabled::{settings::Style, Table, Tabled};

pub const DEFAULT_SUMMARY_TOP: usize = 3;

#[derive(Tabled)]
struct PickRow {
    rank: String,
    champion: String,
    games: String,
    #[tabled(rename = "predicted WR")]
    win_rate: String,
}

#[derive(Tabled)]
struct EvidenceRow {
    role: String,
    champion: String,
    games: String,
    #[tabled(rename = "P(pick | win)")]
    p_win: String,
    #[tabled(rename = "P(pick | loss)")]
    p_loss: String,
}

#[derive(Tabled)]
struct RoleRow {
    role: String,
    champions: String,
    #[tabled(rename = "most played")]
    most_played: String,
}

/// The `top` champions with the most games in `role`. Equal counts keep the
/// order in which the champions first appear in the data.
pub fn most_played(
    estimator: &WinProbabilityEstimator,
    role: Role,
    top: usize,
) -> Vec<(&str, usize)> {
    let mut champions: Vec<(&str, usize)> = estimator.candidates(role, 0).collect();
    champions.sort_by(|a, b| b.1.cmp(&a.1));
    champions.truncate(top);
    champions
}

/// One `Champion (WR: 0.53)` line per pick, ranked.
pub fn format_recommendation_lines(recommendations: &[PickRecommendation]) -> Vec<String> {
    recommendations
        .iter()
        .map(|rec| format!("{} (WR: {:.2})", rec.champion_name, rec.win_probability))
        .collect()
}

pub fn display_recommendations(role: Role, recommendations: &[PickRecommendation], plain: bool) {
    if plain {
        println!("Recommending for {}:", role);
        for line in format_recommendation_lines(recommendations) {
            println!("{}", line);
        }
        return;
    }

    println!("\n{}", format!("🎮 Recommendations for {}", role).bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    if recommendations.is_empty() {
        println!(
            "{}",
            "No recommendations available (no champion has enough games in this role)".yellow()
        );
        return;
    }

    let rows: Vec<PickRow> = recommendations
        .iter()
        .enumerate()
        .map(|(idx, rec)| PickRow {
            rank: format!("#{}", idx + 1),
            champion: rec.champion_name.clone(),
            games: rec.games.to_string(),
            win_rate: format!("{:.2}", rec.win_probability),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_estimate(query: &MatchQuery, probability: f64, evidence: &[Evidence]) {
    println!("\n{}", "📈 Win Probability Estimate".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());

    let filled = query.filled().count();
    if evidence.is_empty() {
        println!(
            "{}",
            format!("No evidence used ({} roles filled, none with enough games)", filled).yellow()
        );
    } else {
        let rows: Vec<EvidenceRow> = evidence
            .iter()
            .map(|e| EvidenceRow {
                role: e.role.to_string(),
                champion: e.champion.clone(),
                games: e.games.to_string(),
                p_win: format!("{:.4}", e.p_given_win),
                p_loss: format!("{:.4}", e.p_given_loss),
            })
            .collect();

        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{}", table);
    }

    let headline = format!("Team 1 win probability: {:.2}", probability);
    let headline = if probability > 0.5 {
        headline.green().bold()
    } else {
        headline.red().bold()
    };
    println!("\n{}\n", headline);
}

pub fn display_dataset_summary(
    dataset: &MatchDataset,
    estimator: &WinProbabilityEstimator,
    top: usize,
) {
    println!("\n{}", "📊 MATCH DATASET".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!(
        "{} {} rows ({} won / {} lost)\n",
        "📈 Size:".bold(),
        dataset.len(),
        dataset.wins().to_string().green(),
        dataset.losses().to_string().red()
    );

    let rows: Vec<RoleRow> = Role::ALL
        .iter()
        .map(|role| {
            let played = most_played(estimator, *role, top)
                .iter()
                .map(|(name, games)| format!("{} ({})", name, games))
                .collect::<Vec<_>>()
                .join(", ");

            RoleRow {
                role: role.to_string(),
                champions: estimator.candidates(*role, 0).count().to_string(),
                most_played: played,
            }
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}\n", table);
}

pub fn display_crawl_report(report: &CrawlReport, total_matches: usize) {
    println!("\n{}", "🕷️ CRAWL SUMMARY".bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
    println!("• Players visited: {}", report.players);
    println!("• New matches: {}", report.new_matches.to_string().green());
    println!("• Skipped matches: {}", report.skipped_matches);
    println!("• Matches stored: {}\n", total_matches);

    if let Some(err) = &report.error {
        println!("{} {}\n", "⚠️ Crawl stopped early:".yellow().bold(), err);
    }
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    println!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}
