use crate::error::EvaluationError;
use crate::metrics::average_absolute_difference::AverageAbsoluteDifference;
use crate::metrics::rank_distance::RankDistance;
use crate::metrics::UserMetric;
use crate::preferences::{check_all_finite, PreferenceRecord};

/// Folds every evaluated user into all metrics at once.
pub struct EvaluationReporter {
    rank_distance: RankDistance,
    average_absolute_difference: AverageAbsoluteDifference,
}

impl Default for EvaluationReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluationReporter {
    pub fn new() -> EvaluationReporter {
        EvaluationReporter {
            rank_distance: RankDistance::new(),
            average_absolute_difference: AverageAbsoluteDifference::new(),
        }
    }

    /// Adds one user to every metric, or to none if a record is not finite.
    pub fn add(&mut self, records: &[PreferenceRecord]) -> Result<(), EvaluationError> {
        check_all_finite(records)?;
        self.rank_distance.add(records)?;
        self.average_absolute_difference.add(records)
    }

    /// The final rank distance score of the evaluation run.
    pub fn rank_distance(&self) -> Result<f64, EvaluationError> {
        self.rank_distance.result()
    }

    pub fn average_absolute_difference(&self) -> Result<f64, EvaluationError> {
        self.average_absolute_difference.result()
    }

    pub fn qty_users(&self) -> usize {
        self.rank_distance.qty_users()
    }

    pub fn result(&self) -> Result<String, EvaluationError> {
        let rank_distance_score = format!("{:.4}", self.rank_distance.result()?);
        let average_absolute_difference_score =
            format!("{:.4}", self.average_absolute_difference.result()?);
        Ok(format!(
            "{},{}",
            rank_distance_score, average_absolute_difference_score
        ))
    }

    pub fn get_name(&self) -> String {
        format!(
            "{},{}",
            self.rank_distance.get_name(),
            self.average_absolute_difference.get_name()
        )
    }
}
