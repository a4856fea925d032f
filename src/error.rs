use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown role: {0} (expected one of top1, jg1, mid1, adc1, sp1, top2, jg2, mid2, adc2, sp2)")]
    UnknownRole(String),

    #[error("Invalid pick '{0}'. Use format: role=Champion")]
    InvalidPick(String),

    #[error("Match data unavailable: {0}")]
    DataUnavailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limit exceeded, please try again later")]
    RateLimited,

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("CSV error: {0}")]
    CsvError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}
