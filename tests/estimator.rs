use league_picks::analysis::estimator::DEFAULT_MIN_SAMPLES;
use league_picks::analysis::recommender::{DEFAULT_RECOMMEND_MIN_SAMPLES, DEFAULT_TOP_K};
use league_picks::{
    AppError, Lane, MatchDataset, MatchQuery, PickRecommender, RawMatch, Role, WinProbabilityEstimator,
};

const WINNERS: [&str; 4] = ["Garen", "LeeSin", "Ahri", "Jinx"];
const LOSERS: [&str; 4] = ["Darius", "Vi", "Zed", "Ashe"];

fn sp1() -> Role {
    Role::ally(Lane::Support)
}

fn top1() -> Role {
    Role::ally(Lane::Top)
}

/// Builds raw matches where `support` played support `wins` times on the
/// winning side and `losses` times on the losing side. The opposing support is
/// a one-off filler champion each game.
struct History {
    matches: Vec<RawMatch>,
}

impl History {
    fn new() -> Self {
        History { matches: Vec::new() }
    }

    fn support(mut self, support: &str, wins: usize, losses: usize) -> Self {
        for won in std::iter::repeat(true).take(wins).chain(std::iter::repeat(false).take(losses)) {
            let id = self.matches.len();
            let filler = format!("Filler{}", id);
            let (winning_sp, losing_sp) = if won {
                (support.to_string(), filler)
            } else {
                (filler, support.to_string())
            };

            let mut champions: Vec<String> = WINNERS.iter().map(|c| c.to_string()).collect();
            champions.push(winning_sp);
            champions.extend(LOSERS.iter().map(|c| c.to_string()));
            champions.push(losing_sp);

            self.matches.push(RawMatch {
                id: format!("NA1_{}", id),
                game_time: id as i64,
                game_duration: 1800,
                champions: champions.try_into().unwrap(),
            });
        }
        self
    }

    fn estimator(&self) -> WinProbabilityEstimator {
        WinProbabilityEstimator::new(&MatchDataset::from_raw(&self.matches)).unwrap()
    }
}

fn names(recs: &[league_picks::PickRecommendation]) -> Vec<String> {
    recs.iter().map(|r| r.champion_name.clone()).collect()
}

#[test]
fn dataset_doubles_raw_matches() {
    let history = History::new().support("Janna", 3, 2).support("Lulu", 1, 4);
    let dataset = MatchDataset::from_raw(&history.matches);

    assert_eq!(dataset.len(), 2 * history.matches.len());
    assert_eq!(dataset.wins(), history.matches.len());
    assert_eq!(dataset.losses(), history.matches.len());
}

#[test]
fn loss_rows_mirror_win_rows() {
    let history = History::new().support("Janna", 2, 2);
    let dataset = MatchDataset::from_raw(&history.matches);

    for (raw, pair) in history.matches.iter().zip(dataset.records().chunks(2)) {
        let (win_row, loss_row) = (&pair[0], &pair[1]);
        assert!(win_row.win);
        assert!(!loss_row.win);
        for role in Role::ALL {
            assert_eq!(win_row.pick(role), raw.champions[role.index()]);
            assert_eq!(loss_row.pick(role), win_row.pick(role.mirror()));
        }
    }
}

#[test]
fn empty_history_is_rejected() {
    let err = WinProbabilityEstimator::new(&MatchDataset::from_raw(&[])).unwrap_err();
    assert!(matches!(err, AppError::DataUnavailable(_)));
}

#[test]
fn conditional_probability_and_counts() {
    let history = History::new().support("Janna", 3, 1);
    let estimator = history.estimator();

    // Garen always sits on the winning side in slot top1.
    assert_eq!(estimator.conditional_probability(top1(), "Garen", true), 1.0);
    assert_eq!(estimator.conditional_probability(top1(), "Garen", false), 0.0);
    assert_eq!(estimator.conditional_probability(sp1(), "Janna", true), 0.75);
    assert_eq!(estimator.conditional_probability(sp1(), "Janna", false), 0.25);
    assert_eq!(estimator.conditional_probability(sp1(), "Teemo", true), 0.0);

    assert_eq!(estimator.occurrence_count(top1(), "Garen"), 4);
    assert_eq!(estimator.occurrence_count(sp1(), "Janna"), 4);
    assert_eq!(estimator.occurrence_count(sp1(), "Teemo"), 0);
}

#[test]
fn blank_query_is_even() {
    let estimator = History::new().support("Janna", 3, 1).estimator();
    assert_eq!(estimator.estimate_win_probability(&MatchQuery::new(), DEFAULT_MIN_SAMPLES), 0.5);
    assert_eq!(estimator.estimate_win_probability(&MatchQuery::new(), 0), 0.5);
}

#[test]
fn single_role_estimate_is_its_win_rate() {
    let estimator = History::new().support("Janna", 3, 1).support("Lulu", 1, 3).estimator();
    let janna = MatchQuery::new().with(sp1(), "Janna");
    let lulu = MatchQuery::new().with(sp1(), "Lulu");

    assert!((estimator.estimate_win_probability(&janna, 3) - 0.75).abs() < 1e-12);
    assert!((estimator.estimate_win_probability(&lulu, 3) - 0.25).abs() < 1e-12);
}

#[test]
fn estimates_stay_within_bounds() {
    let estimator = History::new().support("Janna", 5, 1).support("Lulu", 0, 6).estimator();
    let queries = [
        MatchQuery::new().with(sp1(), "Janna"),
        MatchQuery::new().with(sp1(), "Lulu"),
        MatchQuery::new().with(sp1(), "Janna").with(top1(), "Garen"),
        MatchQuery::new().with(sp1(), "Lulu").with(Role::enemy(Lane::Middle), "Zed"),
        MatchQuery::new().with(top1(), "Teemo"),
    ];

    for query in &queries {
        for min_samples in [0, 1, 3, 5, 100] {
            let p = estimator.estimate_win_probability(query, min_samples);
            assert!((0.0..=1.0).contains(&p), "{} out of range", p);
        }
    }
}

#[test]
fn contradicting_evidence_collapses_to_zero() {
    // Lulu never wins and Garen never loses, so both products are zero.
    let estimator = History::new().support("Lulu", 0, 6).estimator();
    let query = MatchQuery::new().with(sp1(), "Lulu").with(top1(), "Garen");
    assert_eq!(estimator.estimate_win_probability(&query, 3), 0.0);
}

#[test]
fn lowering_the_gate_never_drops_evidence() {
    let estimator = History::new().support("Janna", 2, 1).support("Lulu", 4, 4).estimator();
    let query = MatchQuery::new()
        .with(sp1(), "Janna")
        .with(Role::enemy(Lane::Support), "Lulu")
        .with(top1(), "Garen")
        .with(Role::ally(Lane::Jungle), "Filler0");

    let mut previous = usize::MAX;
    for min_samples in [0, 1, 2, 3, 5, 8, 12, 50] {
        let used = estimator.evidence(&query, min_samples).len();
        assert!(used <= previous);
        previous = used;
    }
    assert_eq!(estimator.evidence(&query, 0).len(), query.filled().count());
}

#[test]
fn under_sampled_pick_has_no_effect() {
    let estimator = History::new().support("Janna", 4, 2).estimator();
    let blank_support = MatchQuery::new().with(Role::enemy(Lane::Top), "Darius");
    // Filler0 appears in exactly one game.
    let rare_support = blank_support.clone().with(sp1(), "Filler0");

    assert_eq!(estimator.occurrence_count(sp1(), "Filler0"), 1);
    assert_eq!(
        estimator.estimate_win_probability(&blank_support, DEFAULT_MIN_SAMPLES),
        estimator.estimate_win_probability(&rare_support, DEFAULT_MIN_SAMPLES)
    );
    assert_ne!(
        estimator.estimate_win_probability(&blank_support, 0),
        estimator.estimate_win_probability(&rare_support, 0)
    );
}

#[test]
fn few_underdogs_are_all_returned() {
    let mut history = History::new();
    for i in 0..9 {
        history = history.support(&format!("Favourite{}", i), 5, 1);
    }
    for i in 0..3 {
        history = history.support(&format!("Underdog{}", i), 2, 4);
    }
    let estimator = history.estimator();

    let recs = PickRecommender::recommend_for_role(
        &estimator,
        &MatchQuery::new(),
        sp1(),
        DEFAULT_RECOMMEND_MIN_SAMPLES,
        DEFAULT_TOP_K,
    );

    assert_eq!(names(&recs), vec!["Underdog0", "Underdog1", "Underdog2"]);
    assert!(recs.iter().all(|r| r.win_probability <= 0.5 && r.games == 6));
}

#[test]
fn many_underdogs_fall_back_to_top_k() {
    let mut history = History::new().support("Star", 6, 0);
    for wins in 0..=10 {
        history = history.support(&format!("Pick{}", wins), wins, 20 - wins);
    }
    let estimator = history.estimator();

    let recs = PickRecommender::recommend_for_role(
        &estimator,
        &MatchQuery::new(),
        sp1(),
        DEFAULT_RECOMMEND_MIN_SAMPLES,
        DEFAULT_TOP_K,
    );

    let mut expected = vec!["Star".to_string()];
    expected.extend((2..=10).rev().map(|wins| format!("Pick{}", wins)));
    assert_eq!(names(&recs), expected);
    assert_eq!(recs[1].win_probability, 0.5);

    for pair in recs.windows(2) {
        assert!(pair[0].win_probability >= pair[1].win_probability);
    }
}

#[test]
fn ranking_is_sorted_and_gated() {
    let estimator = History::new()
        .support("Janna", 2, 4)
        .support("Lulu", 5, 1)
        .support("Nami", 3, 3)
        .support("Rare", 1, 1)
        .estimator();

    let ranked = PickRecommender::rank_candidates(&estimator, &MatchQuery::new(), sp1(), 5);
    assert_eq!(names(&ranked), vec!["Lulu", "Nami", "Janna"]);

    // Only Nami and Janna are underdogs, fewer than top_k.
    let recs = PickRecommender::recommend_for_role(&estimator, &MatchQuery::new(), sp1(), 5, 10);
    assert_eq!(names(&recs), vec!["Nami", "Janna"]);

    // With top_k at 2 the underdog list is no longer short, so the top 2 win.
    let recs = PickRecommender::recommend_for_role(&estimator, &MatchQuery::new(), sp1(), 5, 2);
    assert_eq!(names(&recs), vec!["Lulu", "Nami"]);
}

#[test]
fn filled_target_role_is_replaced() {
    let estimator = History::new().support("Janna", 2, 4).support("Lulu", 1, 5).estimator();
    let query = MatchQuery::new().with(sp1(), "Janna");

    let recs = PickRecommender::recommend_for_role(&estimator, &query, sp1(), 5, 10);
    assert_eq!(names(&recs), vec!["Janna", "Lulu"]);
    assert!((recs[1].win_probability - 1.0 / 6.0).abs() < 1e-12);
}

#[test]
fn repeated_calls_agree() {
    let estimator = History::new()
        .support("Janna", 2, 4)
        .support("Lulu", 5, 1)
        .support("Nami", 3, 3)
        .estimator();
    let query = MatchQuery::new().with(top1(), "Garen");

    let first = PickRecommender::recommend_for_role(&estimator, &query, sp1(), 5, 10);
    let second = PickRecommender::recommend_for_role(&estimator, &query, sp1(), 5, 10);
    assert_eq!(first, second);
    assert_eq!(
        estimator.estimate_win_probability(&query, 3),
        estimator.estimate_win_probability(&query, 3)
    );
}

#[test]
fn unknown_roles_are_rejected_at_the_boundary() {
    assert!(matches!("bot1".parse::<Role>(), Err(AppError::UnknownRole(_))));
    assert!(matches!(
        MatchQuery::from_pairs([("sp1", "Janna"), ("support", "Lulu")]),
        Err(AppError::UnknownRole(_))
    ));
}
