use crate::config::Config;
use crate::error::AppError;
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::models::*;

const MAX_RETRIES: u32 = 3;

/// The Riot endpoints the crawler needs.
pub trait RiotApi {
    fn league_entries(&self, queue: &str, tier: &str, division: &str) -> Result<Vec<LeagueEntryDto>, AppError>;
    fn summoner_by_id(&self, summoner_id: &str) -> Result<SummonerDto, AppError>;
    fn match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError>;
    fn match_by_id(&self, match_id: &str) -> Result<MatchDto, AppError>;
}

pub struct RiotApiClient {
    config: Config,
    api_key: String,
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,
    clock: DefaultClock,
}

impl RiotApiClient {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let api_key = config.api_key()?.to_string();

        let burst = NonZeroU32::new(config.request_burst)
            .ok_or_else(|| AppError::ConfigError("RIOT_REQUEST_BURST must be at least 1".to_string()))?;
        let quota = Quota::with_period(Duration::from_millis(config.request_period_ms))
            .ok_or_else(|| AppError::ConfigError("RIOT_REQUEST_PERIOD_MS must be at least 1".to_string()))?
            .allow_burst(burst);

        Ok(RiotApiClient {
            config,
            api_key,
            rate_limiter: RateLimiter::direct(quota),
            clock: DefaultClock::default(),
        })
    }

    fn wait_for_quota(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            thread::sleep(not_until.wait_time_from(self.clock.now()));
        }
    }

    /// `Ok(None)` means the resource does not exist (HTTP 404).
    fn execute_request(&self, url: &str) -> Result<Option<String>, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_quota();
            debug!("GET {}", endpoints::redact(url));

            let response = ureq::get(url)
                .set("User-Agent", "league_picks/0.1.0")
                .call();

            match response {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map(Some)
                        .map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, resp)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait_secs = resp
                        .header("Retry-After")
                        .and_then(|v| v.trim().parse::<u64>().ok())
                        .unwrap_or(2 * (retry_count as u64 + 1));
                    warn!("Rate limited, waiting {}s before retry", wait_secs);
                    thread::sleep(Duration::from_secs(wait_secs));
                    retry_count += 1;
                }
                Err(ureq::Error::Status(404, _)) => return Ok(None),
                Err(ureq::Error::Status(code, _)) => {
                    return Err(AppError::ApiError(format!(
                        "status {} from {}",
                        code,
                        endpoints::redact(url)
                    )));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, AppError> {
        match self.execute_request(url)? {
            Some(body) => serde_json::from_str(&body)
                .map(Some)
                .map_err(|e| AppError::JsonError(e.to_string())),
            None => Ok(None),
        }
    }

    fn get_existing<T: DeserializeOwned>(&self, url: &str) -> Result<T, AppError> {
        self.get_json(url)?.ok_or_else(|| {
            AppError::ApiError(format!("not found: {}", endpoints::redact(url)))
        })
    }
}

impl RiotApi for RiotApiClient {
    fn league_entries(&self, queue: &str, tier: &str, division: &str) -> Result<Vec<LeagueEntryDto>, AppError> {
        let url = endpoints::league_entries(&self.config.region, queue, tier, division, 1, &self.api_key);
        self.get_existing(&url)
    }

    fn summoner_by_id(&self, summoner_id: &str) -> Result<SummonerDto, AppError> {
        let url = endpoints::summoner_by_id(&self.config.region, summoner_id, &self.api_key);
        self.get_json(&url)?
            .ok_or_else(|| AppError::PlayerNotFound(summoner_id.to_string()))
    }

    fn match_ids(&self, puuid: &str, count: usize) -> Result<Vec<String>, AppError> {
        let url = endpoints::match_ids_by_puuid(self.config.regional_routing(), puuid, count, &self.api_key);
        self.get_existing(&url)
    }

    fn match_by_id(&self, match_id: &str) -> Result<MatchDto, AppError> {
        let url = endpoints::match_by_id(self.config.regional_routing(), match_id, &self.api_key);
        self.get_existing(&url)
    }
}
