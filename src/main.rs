use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use league_picks::analysis::estimator::DEFAULT_MIN_SAMPLES;
use league_picks::analysis::recommender::{DEFAULT_RECOMMEND_MIN_SAMPLES, DEFAULT_TOP_K};
use league_picks::api::client::RiotApiClient;
use league_picks::cache::CrawlCache;
use league_picks::config::Config;
use league_picks::crawl::{CrawlSettings, MatchCrawler};
use league_picks::display::output::{
    display_crawl_report, display_dataset_summary, display_error, display_estimate, display_info,
    display_recommendations, display_success, DEFAULT_SUMMARY_TOP,
};
use league_picks::{storage, AppError, MatchDataset, MatchQuery, PickRecommender, Role, WinProbabilityEstimator};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "League Picks")]
#[command(about = "Estimate win chances from crawled ranked games and recommend champion picks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rank champions for an open role given the other picks
    Recommend {
        /// Role to fill (top1, jg1, mid1, adc1, sp1, top2, ... sp2)
        #[arg(short, long, value_parser = parse_role)]
        role: Role,

        #[command(flatten)]
        query: QueryArgs,

        /// Minimum games a champion needs in a role to be considered
        #[arg(long, default_value_t = DEFAULT_RECOMMEND_MIN_SAMPLES)]
        min_samples: usize,

        /// Number of picks to show when enough candidates qualify
        #[arg(short, long, default_value_t = DEFAULT_TOP_K)]
        top_k: usize,

        /// Print "Champion (WR: 0.53)" lines instead of a table
        #[arg(long)]
        plain: bool,
    },

    /// Estimate the win probability of team 1 for the given picks
    Estimate {
        #[command(flatten)]
        query: QueryArgs,

        /// Minimum games a champion needs in a role to count as evidence
        #[arg(long, default_value_t = DEFAULT_MIN_SAMPLES)]
        min_samples: usize,
    },

    /// Show dataset size and the most played champions per role
    Summary {
        /// Match table (default: LEAGUE_PICKS_DATA or matches.csv)
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Champions to list per role
        #[arg(long, default_value_t = DEFAULT_SUMMARY_TOP)]
        top: usize,
    },

    /// Crawl ranked matches from the Riot API into the match table
    Crawl {
        /// Tier to crawl (default: RIOT_TIER or PLATINUM)
        #[arg(long)]
        tier: Option<String>,

        /// Division to crawl, repeatable (default: I II III IV)
        #[arg(long = "division")]
        divisions: Vec<String>,

        /// Recent matches to request per player (default: 20)
        #[arg(long)]
        per_player: Option<usize>,

        /// Where to write the match table
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Ignore previously crawled matches
        #[arg(long)]
        refresh: bool,
    },
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// A filled role, e.g. --pick top1=Shen (repeatable; empty champion leaves it blank)
    #[arg(short, long = "pick", value_parser = parse_pick)]
    picks: Vec<(String, String)>,

    /// Match table (default: LEAGUE_PICKS_DATA or matches.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,
}

impl QueryArgs {
    fn to_query(&self) -> Result<MatchQuery, AppError> {
        MatchQuery::from_pairs(self.picks.iter().map(|(role, champion)| (role, champion)))
    }
}

fn parse_role(s: &str) -> Result<Role, AppError> {
    s.parse()
}

fn parse_pick(s: &str) -> Result<(String, String), AppError> {
    let (role, champion) = s
        .split_once('=')
        .ok_or_else(|| AppError::InvalidPick(s.to_string()))?;
    Ok((role.to_string(), champion.to_string()))
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("league_picks=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env();

    match cli.command {
        Command::Recommend {
            role,
            query,
            min_samples,
            top_k,
            plain,
        } => {
            let picks = query.to_query()?;
            let (_, estimator) = load_estimator(&config, query.data.as_ref())?;
            let recommendations = PickRecommender::recommend_for_role(
                &estimator,
                &picks,
                role,
                min_samples,
                top_k,
            );
            display_recommendations(role, &recommendations, plain);
        }
        Command::Estimate { query, min_samples } => {
            let picks = query.to_query()?;
            let (_, estimator) = load_estimator(&config, query.data.as_ref())?;
            let evidence = estimator.evidence(&picks, min_samples);
            let probability = estimator.estimate_win_probability(&picks, min_samples);
            display_estimate(&picks, probability, &evidence);
        }
        Command::Summary { data, top } => {
            let (dataset, estimator) = load_estimator(&config, data.as_ref())?;
            display_dataset_summary(&dataset, &estimator, top);
        }
        Command::Crawl {
            tier,
            divisions,
            per_player,
            output,
            refresh,
        } => {
            let mut config = config.with_crawl_limits_from_env()?;
            if let Some(tier) = tier {
                config.tier = tier.to_uppercase();
            }
            if !divisions.is_empty() {
                config.divisions = divisions;
            }
            if let Some(per_player) = per_player {
                config.matches_per_player = per_player;
            }
            let output = output.unwrap_or_else(|| config.data_path.clone());
            crawl(config, &output, refresh)?;
        }
    }

    Ok(())
}

fn load_estimator(
    config: &Config,
    data: Option<&PathBuf>,
) -> anyhow::Result<(MatchDataset, WinProbabilityEstimator)> {
    let path = data.unwrap_or(&config.data_path);
    let matches = storage::load_matches(path)
        .with_context(|| format!("loading match table {}", path.display()))?;

    let dataset = MatchDataset::from_raw(&matches);
    let estimator = WinProbabilityEstimator::new(&dataset)
        .with_context(|| format!("building estimator from {}", path.display()))?;
    info!("Dataset ready: {} rows from {} matches", dataset.len(), matches.len());

    Ok((dataset, estimator))
}

fn crawl(config: Config, output: &Path, refresh: bool) -> anyhow::Result<()> {
    let cache_path = CrawlCache::default_path(&config.queue, &config.tier);
    let mut cache = if refresh {
        display_info("Ignoring cached matches (--refresh)");
        CrawlCache::new(&config.queue, &config.tier, cache_path)
    } else {
        CrawlCache::load(&config.queue, &config.tier, &cache_path)?
    };

    display_info(&format!(
        "Crawling {} {} ({}) in region {}, {} cached matches",
        config.queue,
        config.tier,
        config.divisions.join(" "),
        config.region,
        cache.matches.len()
    ));

    let settings = CrawlSettings::from(&config);
    let client = RiotApiClient::new(config)?;
    let report = MatchCrawler::new(&client, settings).crawl(&mut cache);

    // Persist whatever was collected, even after an aborted crawl.
    storage::write_matches(output, &cache.matches)
        .with_context(|| format!("writing match table {}", output.display()))?;

    display_crawl_report(&report, cache.matches.len());
    display_success(&format!(
        "Saved {} matches to {}",
        cache.matches.len(),
        output.display()
    ));

    Ok(())
}
