use crate::error::EvaluationError;
use crate::metrics::running_average::RunningAverage;
use crate::metrics::UserMetric;
use crate::preferences::{check_all_finite, PreferenceRecord};

/// Mean absolute difference between true and predicted preference, taken over all estimates.
pub struct AverageAbsoluteDifference {
    average: RunningAverage,
}

impl Default for AverageAbsoluteDifference {
    fn default() -> Self {
        Self::new()
    }
}

impl AverageAbsoluteDifference {
    pub fn new() -> AverageAbsoluteDifference {
        AverageAbsoluteDifference {
            average: RunningAverage::new(),
        }
    }

    pub fn qty_estimates(&self) -> usize {
        self.average.count()
    }
}

impl UserMetric for AverageAbsoluteDifference {
    fn add(&mut self, records: &[PreferenceRecord]) -> Result<(), EvaluationError> {
        check_all_finite(records)?;
        for record in records {
            let difference = record.true_value as f64 - record.predicted_value as f64;
            self.average.add_datum(difference.abs());
        }
        Ok(())
    }

    fn result(&self) -> Result<f64, EvaluationError> {
        self.average.average()
    }

    fn get_name(&self) -> String {
        String::from("AvgAbsDiff")
    }
}

#[cfg(test)]
mod average_absolute_difference_test {
    use super::*;

    #[test]
    fn should_average_over_all_estimates() {
        let mut metric = AverageAbsoluteDifference::new();
        metric
            .add(&[PreferenceRecord::new(1, 4.0, 3.0), PreferenceRecord::new(2, 2.0, 2.0)])
            .unwrap();
        metric.add(&[PreferenceRecord::new(1, 1.0, 3.0)]).unwrap();
        assert_eq!(1.0, metric.result().unwrap());
        assert_eq!(3, metric.qty_estimates());
        assert_eq!("AvgAbsDiff", metric.get_name());
    }

    #[test]
    fn should_fail_without_estimates() {
        let mut metric = AverageAbsoluteDifference::new();
        metric.add(&[]).unwrap();
        assert!(matches!(metric.result(), Err(EvaluationError::EmptyAverage)));
    }

    #[test]
    fn should_reject_nan_estimate() {
        let mut metric = AverageAbsoluteDifference::new();
        let result = metric.add(&[PreferenceRecord::new(9, 4.0, f32::NAN)]);
        assert!(matches!(
            result,
            Err(EvaluationError::InvalidPreferenceValue { item_id: 9, .. })
        ));
    }

    #[test]
    fn should_leave_average_untouched_on_rejected_user() {
        let mut metric = AverageAbsoluteDifference::new();
        metric.add(&[PreferenceRecord::new(1, 2.0, 2.5)]).unwrap();
        let result = metric.add(&[
            PreferenceRecord::new(1, 4.0, 3.0),
            PreferenceRecord::new(2, 4.0, f32::NAN),
        ]);
        assert!(result.is_err());
        assert_eq!(1, metric.qty_estimates());
        assert_eq!(0.5, metric.result().unwrap());
    }
}
