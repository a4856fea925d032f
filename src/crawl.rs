use crate::analysis::dataset::RawMatch;
use crate::analysis::role::{Lane, LANES_PER_TEAM, ROLE_COUNT};
use crate::api::client::RiotApi;
use crate::api::models::{LeagueEntryDto, MatchDto};
use crate::cache::CrawlCache;
use crate::config::Config;
use crate::error::AppError;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashSet;
use tracing::{debug, info, warn};

const CLASSIC_MODE: &str = "CLASSIC";

#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub queue: String,
    pub tier: String,
    pub divisions: Vec<String>,
    pub matches_per_player: usize,
    pub show_progress: bool,
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        CrawlSettings {
            queue: config.queue.clone(),
            tier: config.tier.clone(),
            divisions: config.divisions.clone(),
            matches_per_player: config.matches_per_player,
            show_progress: true,
        }
    }
}

/// What one player's match history yielded.
#[derive(Debug, Default)]
struct PlayerHaul {
    matches: Vec<RawMatch>,
    skipped: Vec<String>,
}

#[derive(Debug, Default)]
pub struct CrawlReport {
    pub players: usize,
    pub new_matches: usize,
    pub skipped_matches: usize,
    /// Set when the crawl stopped early; everything before it was kept.
    pub error: Option<AppError>,
}

/// Walks league entries -> players -> recent matches, storing every classic
/// match not already in the cache.
pub struct MatchCrawler<'a, A: RiotApi> {
    api: &'a A,
    settings: CrawlSettings,
    progress: MultiProgress,
}

impl<'a, A: RiotApi> MatchCrawler<'a, A> {
    pub fn new(api: &'a A, settings: CrawlSettings) -> Self {
        let progress = if settings.show_progress {
            MultiProgress::new()
        } else {
            MultiProgress::with_draw_target(ProgressDrawTarget::hidden())
        };
        MatchCrawler {
            api,
            settings,
            progress,
        }
    }

    pub fn crawl(&self, cache: &mut CrawlCache) -> CrawlReport {
        let mut report = CrawlReport::default();
        let mut seen = cache.known_ids();

        let divisions = self.progress_bar(self.settings.divisions.len());
        for division in &self.settings.divisions {
            divisions.set_message(format!("{} {}", self.settings.tier, division));

            if let Err(e) = self.crawl_division(division, cache, &mut seen, &mut report) {
                warn!("Crawl stopped in division {}: {}", division, e);
                report.error = Some(e);
                break;
            }
            divisions.inc(1);
        }
        divisions.finish_and_clear();

        info!(
            players = report.players,
            new_matches = report.new_matches,
            skipped = report.skipped_matches,
            "Crawl finished"
        );
        report
    }

    fn crawl_division(
        &self,
        division: &str,
        cache: &mut CrawlCache,
        seen: &mut HashSet<String>,
        report: &mut CrawlReport,
    ) -> Result<(), AppError> {
        let entries = self
            .api
            .league_entries(&self.settings.queue, &self.settings.tier, division)?;
        debug!("{} players in {} {}", entries.len(), self.settings.tier, division);

        let players = self.progress_bar(entries.len());
        for entry in &entries {
            let collected = self.crawl_player(entry, seen);

            // Keep what this player yielded even if a later call failed.
            let haul = match collected {
                Ok(haul) => haul,
                Err((haul, e)) => {
                    self.store(cache, haul, report);
                    players.finish_and_clear();
                    return Err(e);
                }
            };
            self.store(cache, haul, report);
            report.players += 1;
            players.inc(1);
        }
        players.finish_and_clear();

        Ok(())
    }

    fn crawl_player(
        &self,
        entry: &LeagueEntryDto,
        seen: &mut HashSet<String>,
    ) -> Result<PlayerHaul, (PlayerHaul, AppError)> {
        let mut haul = PlayerHaul::default();

        let puuid = match self.resolve_puuid(entry) {
            Ok(puuid) => puuid,
            Err(e) => return Err((haul, e)),
        };
        let match_ids = match self.api.match_ids(&puuid, self.settings.matches_per_player) {
            Ok(ids) => ids,
            Err(e) => return Err((haul, e)),
        };

        for match_id in match_ids {
            if !seen.insert(match_id.clone()) {
                continue;
            }

            let dto = match self.api.match_by_id(&match_id) {
                Ok(dto) => dto,
                Err(e) => return Err((haul, e)),
            };

            match raw_match_from_dto(&dto) {
                Some(raw) => haul.matches.push(raw),
                None => haul.skipped.push(match_id),
            }
        }

        Ok(haul)
    }

    fn resolve_puuid(&self, entry: &LeagueEntryDto) -> Result<String, AppError> {
        if let Some(puuid) = entry.puuid.as_deref().filter(|p| !p.is_empty()) {
            return Ok(puuid.to_string());
        }

        let summoner_id = entry
            .summoner_id
            .as_deref()
            .ok_or_else(|| AppError::ApiError("league entry has neither puuid nor summonerId".to_string()))?;
        Ok(self.api.summoner_by_id(summoner_id)?.puuid)
    }

    fn store(&self, cache: &mut CrawlCache, haul: PlayerHaul, report: &mut CrawlReport) {
        if haul.matches.is_empty() && haul.skipped.is_empty() {
            return;
        }
        report.skipped_matches += haul.skipped.len();
        cache.add_skipped(haul.skipped);
        report.new_matches += cache.add_matches(haul.matches);
        if let Err(e) = cache.save() {
            warn!("Failed to save crawl cache: {}", e);
        }
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        let bar = self.progress.add(ProgressBar::new(len as u64));
        if let Ok(style) = ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}") {
            bar.set_style(style);
        }
        bar
    }
}

/// Places each participant in a slot: winners 0..5, losers 5..10, lane order
/// within a team. Non-classic games and games where the ten slots are not
/// filled exactly once are dropped.
pub fn raw_match_from_dto(dto: &MatchDto) -> Option<RawMatch> {
    if dto.info.game_mode != CLASSIC_MODE {
        debug!("skipping {}: mode {}", dto.metadata.match_id, dto.info.game_mode);
        return None;
    }

    let mut slots: [Option<String>; ROLE_COUNT] = Default::default();
    for participant in &dto.info.participants {
        let Some(lane) = Lane::from_team_position(&participant.team_position) else {
            warn!(
                "skipping {}: {} has no team position",
                dto.metadata.match_id, participant.champion_name
            );
            return None;
        };

        let offset = if participant.win { 0 } else { LANES_PER_TEAM };
        let slot = &mut slots[offset + lane.index()];
        if slot.is_some() {
            warn!("skipping {}: duplicate {:?} position", dto.metadata.match_id, lane);
            return None;
        }
        *slot = Some(participant.champion_name.clone());
    }

    if slots.iter().any(Option::is_none) {
        warn!("skipping {}: incomplete teams", dto.metadata.match_id);
        return None;
    }

    Some(RawMatch {
        id: dto.metadata.match_id.clone(),
        game_time: dto.info.game_start_timestamp,
        game_duration: dto.info.game_duration,
        champions: slots.map(Option::unwrap_or_default),
    })
}
