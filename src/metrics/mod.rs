use crate::error::EvaluationError;
use crate::preferences::PreferenceRecord;

pub mod average_absolute_difference;
pub mod evaluation_reporter;
pub mod rank_distance;
pub mod running_average;

/// A metric that folds in one user's held-out records at a time.
pub trait UserMetric {
    /// Adds one user. A rejected user leaves the metric unchanged.
    fn add(&mut self, records: &[PreferenceRecord]) -> Result<(), EvaluationError>;
    fn result(&self) -> Result<f64, EvaluationError>;
    fn get_name(&self) -> String;
}
