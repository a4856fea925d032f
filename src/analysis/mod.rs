pub mod champion_stats;
pub mod dataset;
pub mod estimator;
pub mod recommender;
pub mod role;
