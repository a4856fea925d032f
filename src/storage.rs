// Match table persistence.
//
// The CSV layout matches what pandas writes for the crawled frame: an unnamed
// index column, then match_id, game_time, game_duration and player0..player9
// (winners first).

use crate::analysis::dataset::RawMatch;
use crate::analysis::role::ROLE_COUNT;
use crate::error::AppError;
use serde::Deserialize;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
struct MatchRow {
    match_id: String,
    #[serde(default)]
    game_time: Option<i64>,
    #[serde(default)]
    game_duration: Option<i64>,
    player0: String,
    player1: String,
    player2: String,
    player3: String,
    player4: String,
    player5: String,
    player6: String,
    player7: String,
    player8: String,
    player9: String,
}

impl MatchRow {
    fn into_raw(self) -> Option<RawMatch> {
        let champions: [String; ROLE_COUNT] = [
            self.player0,
            self.player1,
            self.player2,
            self.player3,
            self.player4,
            self.player5,
            self.player6,
            self.player7,
            self.player8,
            self.player9,
        ]
        .map(|name| name.trim().to_string());

        if champions.iter().any(|name| name.is_empty()) {
            warn!("skipping match {}: not every role has a champion", self.match_id);
            return None;
        }

        Some(RawMatch {
            id: self.match_id,
            game_time: self.game_time.unwrap_or_default(),
            game_duration: self.game_duration.unwrap_or_default(),
            champions,
        })
    }
}

pub fn load_matches_from_reader<R: Read>(rdr: R) -> Result<Vec<RawMatch>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(rdr);

    let headers = reader
        .headers()
        .map_err(|e| AppError::CsvError(e.to_string()))?
        .clone();
    let required = ["match_id".to_string()]
        .into_iter()
        .chain((0..ROLE_COUNT).map(|i| format!("player{}", i)));
    for column in required {
        if !headers.iter().any(|h| h == column) {
            return Err(AppError::CsvError(format!("missing column '{}'", column)));
        }
    }

    let mut matches = Vec::new();
    for result in reader.deserialize::<MatchRow>() {
        match result {
            Ok(row) => matches.extend(row.into_raw()),
            Err(e) => warn!("skipping malformed match row: {}", e),
        }
    }

    Ok(matches)
}

pub fn load_matches(path: &Path) -> Result<Vec<RawMatch>, AppError> {
    let file = std::fs::File::open(path).map_err(|e| {
        AppError::DataUnavailable(format!("cannot open {}: {}", path.display(), e))
    })?;

    let matches = load_matches_from_reader(file).map_err(|e| match e {
        AppError::CsvError(msg) => AppError::CsvError(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    info!("Loaded {} matches from {}", matches.len(), path.display());
    Ok(matches)
}

pub fn write_matches_to_writer<W: Write>(wtr: W, matches: &[RawMatch]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(wtr);

    let mut header = vec![
        String::new(),
        "match_id".to_string(),
        "game_time".to_string(),
        "game_duration".to_string(),
    ];
    header.extend((0..ROLE_COUNT).map(|i| format!("player{}", i)));
    writer.write_record(&header)?;

    for (idx, m) in matches.iter().enumerate() {
        let mut record = vec![
            idx.to_string(),
            m.id.clone(),
            m.game_time.to_string(),
            m.game_duration.to_string(),
        ];
        record.extend(m.champions.iter().cloned());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_matches(path: &Path, matches: &[RawMatch]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| AppError::IoError(format!("{}: {}", parent.display(), e)))?;
    }

    let file = std::fs::File::create(path)
        .map_err(|e| AppError::IoError(format!("{}: {}", path.display(), e)))?;

    write_matches_to_writer(file, matches)
        .map_err(|e| AppError::CsvError(format!("{}: {}", path.display(), e)))?;

    info!("Wrote {} matches to {}", matches.len(), path.display());
    Ok(())
}
