use crate::error::AppError;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub region: String,
    pub queue: String,
    pub tier: String,
    pub divisions: Vec<String>,
    pub matches_per_player: usize,
    pub data_path: PathBuf,
    /// Minimum spacing between API requests once the burst is spent.
    pub request_period_ms: u64,
    pub request_burst: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_key: None,
            region: "na1".to_string(),
            queue: "RANKED_SOLO_5x5".to_string(),
            tier: "PLATINUM".to_string(),
            divisions: ["I", "II", "III", "IV"].iter().map(|d| d.to_string()).collect(),
            matches_per_player: 20,
            data_path: PathBuf::from("matches.csv"),
            request_period_ms: 1200,
            request_burst: 20,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(env_var)
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.api_key = lookup("RIOT_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(region) = lookup("RIOT_REGION") {
            config.region = region.to_lowercase();
        }
        if let Some(queue) = lookup("RIOT_QUEUE") {
            config.queue = queue;
        }
        if let Some(tier) = lookup("RIOT_TIER") {
            config.tier = tier.to_uppercase();
        }
        if let Some(path) = lookup("LEAGUE_PICKS_DATA") {
            config.data_path = PathBuf::from(path);
        }

        config
    }

    /// Reads the numeric settings only the crawler uses, so a bad value there
    /// never blocks the offline commands.
    pub fn with_crawl_limits<F>(mut self, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("RIOT_MATCHES_PER_PLAYER") {
            self.matches_per_player = parse_number("RIOT_MATCHES_PER_PLAYER", &raw)?;
        }
        if let Some(raw) = lookup("RIOT_REQUEST_PERIOD_MS") {
            self.request_period_ms = parse_number("RIOT_REQUEST_PERIOD_MS", &raw)?;
        }
        if let Some(raw) = lookup("RIOT_REQUEST_BURST") {
            self.request_burst = parse_number("RIOT_REQUEST_BURST", &raw)?;
        }

        Ok(self)
    }

    pub fn with_crawl_limits_from_env(self) -> Result<Self, AppError> {
        self.with_crawl_limits(env_var)
    }

    pub fn api_key(&self) -> Result<&str, AppError> {
        self.api_key.as_deref().ok_or_else(|| {
            AppError::ConfigError("RIOT_API_KEY not found in .env file".to_string())
        })
    }

    /// Regional routing host for the match-v5 endpoints.
    pub fn regional_routing(&self) -> &str {
        match self.region.as_str() {
            "na1" | "br1" | "la1" | "la2" => "americas",
            "euw1" | "eun1" | "tr1" | "ru" => "europe",
            "kr" | "jp1" => "asia",
            "oc1" | "ph2" | "sg2" | "th2" | "vn2" => "sea",
            _ => "americas",
        }
    }
}

fn env_var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_number<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::ConfigError(format!("{} must be a number, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert!(config.api_key.is_none());
        assert_eq!(config.region, "na1");
        assert_eq!(config.queue, "RANKED_SOLO_5x5");
        assert_eq!(config.tier, "PLATINUM");
        assert_eq!(config.divisions, vec!["I", "II", "III", "IV"]);
        assert_eq!(config.matches_per_player, 20);
        assert_eq!(config.data_path, PathBuf::from("matches.csv"));
        assert!(config.api_key().is_err());
    }

    #[test]
    fn overrides_are_applied() {
        let lookup = lookup_from(&[
            ("RIOT_API_KEY", "RGAPI-test"),
            ("RIOT_REGION", "EUW1"),
            ("RIOT_TIER", "gold"),
            ("RIOT_MATCHES_PER_PLAYER", "5"),
        ]);
        let config = Config::from_lookup(&lookup).with_crawl_limits(&lookup).unwrap();
        assert_eq!(config.api_key().unwrap(), "RGAPI-test");
        assert_eq!(config.region, "euw1");
        assert_eq!(config.regional_routing(), "europe");
        assert_eq!(config.tier, "GOLD");
        assert_eq!(config.matches_per_player, 5);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let config = Config::from_lookup(lookup_from(&[("RIOT_API_KEY", "  ")]));
        assert!(config.api_key.is_none());
    }

    #[test]
    fn bad_crawl_number_only_fails_the_crawl() {
        let lookup = lookup_from(&[("RIOT_REQUEST_BURST", "lots"), ("RIOT_TIER", "gold")]);

        let config = Config::from_lookup(&lookup);
        assert_eq!(config.tier, "GOLD");
        assert_eq!(config.request_burst, 20);

        let err = config.with_crawl_limits(&lookup).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(msg) if msg.contains("RIOT_REQUEST_BURST")));
    }

    #[test]
    fn unknown_region_routes_to_americas() {
        let mut config = Config::default();
        config.region = "xx9".to_string();
        assert_eq!(config.regional_routing(), "americas");
        config.region = "kr".to_string();
        assert_eq!(config.regional_routing(), "asia");
    }
}
