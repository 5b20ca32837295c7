use crate::error::EvaluationError;

/// Streaming mean over an unbounded number of data points.
///
/// Only the count and the current mean are kept. The mean is updated
/// incrementally, so no large sum is ever divided by a large count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunningAverage {
    count: usize,
    mean: f64,
}

impl RunningAverage {
    pub fn new() -> RunningAverage {
        RunningAverage {
            count: 0,
            mean: 0_f64,
        }
    }

    pub fn add_datum(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;
    }

    /// The mean of all data points added so far.
    ///
    /// Fails with [`EvaluationError::EmptyAverage`] if nothing was added yet.
    pub fn average(&self) -> Result<f64, EvaluationError> {
        if self.count > 0 {
            Ok(self.mean)
        } else {
            Err(EvaluationError::EmptyAverage)
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Extend<f64> for RunningAverage {
    fn extend<T: IntoIterator<Item = f64>>(&mut self, values: T) {
        for value in values {
            self.add_datum(value);
        }
    }
}

#[cfg(test)]
mod running_average_test {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn should_return_single_datum() {
        let mut average = RunningAverage::new();
        average.add_datum(0.75);
        assert_eq!(0.75, average.average().unwrap());
        assert_eq!(1, average.count());
    }

    #[test]
    fn should_average_multiple_data() {
        let mut average = RunningAverage::new();
        average.extend(vec![1.0, 2.0, 3.0]);
        assert_eq!(2.0, average.average().unwrap());
        assert_eq!(3, average.count());
    }

    #[test]
    fn should_fail_on_empty_average() {
        let average = RunningAverage::new();
        assert!(matches!(
            average.average(),
            Err(EvaluationError::EmptyAverage)
        ));
        assert_eq!(0, average.count());
    }

    #[test]
    fn should_stay_accurate_over_many_data() {
        let mut average = RunningAverage::default();
        for _ in 0..1_000_000 {
            average.add_datum(0.1);
        }
        assert!(approx_eq!(f64, 0.1, average.average().unwrap(), epsilon = 1e-12));
        assert_eq!(1_000_000, average.count());
    }
}
