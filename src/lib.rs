pub mod config;
pub mod config_processors;
pub mod error;
pub mod holdout;
pub mod logging;
pub mod metrics;
pub mod preferences;

pub use error::EvaluationError;
pub use metrics::rank_distance::{rank, score, score_users};
pub use metrics::running_average::RunningAverage;
pub use preferences::PreferenceRecord;
