pub mod analysis;
pub mod api;
pub mod cache;
pub mod config;
pub mod crawl;
pub mod display;
pub mod error;
pub mod storage;

pub use analysis::dataset::{MatchDataset, MatchQuery, MatchRecord, RawMatch};
pub use analysis::estimator::WinProbabilityEstimator;
pub use analysis::recommender::{PickRecommendation, PickRecommender};
pub use analysis::role::{Lane, Role};
pub use error::AppError;
