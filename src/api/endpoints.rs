// URL builders for the Riot endpoints the crawler touches.

pub fn league_entries(platform: &str, queue: &str, tier: &str, division: &str, page: u32, api_key: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/league/v4/entries/{}/{}/{}?page={}&api_key={}",
        platform, queue, tier, division, page, api_key
    )
}

pub fn summoner_by_id(platform: &str, summoner_id: &str, api_key: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/summoner/v4/summoners/{}?api_key={}",
        platform, summoner_id, api_key
    )
}

pub fn match_ids_by_puuid(routing: &str, puuid: &str, count: usize, api_key: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/by-puuid/{}/ids?count={}&api_key={}",
        routing, puuid, count, api_key
    )
}

pub fn match_by_id(routing: &str, match_id: &str, api_key: &str) -> String {
    format!(
        "https://{}.api.riotgames.com/lol/match/v5/matches/{}?api_key={}",
        routing, match_id, api_key
    )
}

/// Strips the key before a URL reaches a log line.
pub fn redact(url: &str) -> &str {
    url.split("api_key=").next().unwrap_or(url)
}
