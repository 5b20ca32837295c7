use crate::preferences::{ItemId, PreferenceValue};

/// All errors that can occur while scoring and aggregating evaluation results.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    /// The average was requested before a single data point was added.
    #[error("Cannot take the average of zero data points")]
    EmptyAverage,

    /// A true or predicted preference is NaN or infinite.
    #[error("Preference value for item {item_id} is not finite: {value}")]
    InvalidPreferenceValue {
        item_id: ItemId,
        value: PreferenceValue,
    },

    /// A configuration value is outside of its allowed range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A configuration source could not be loaded, or a configured value could not be parsed.
    #[error("Failed to load config: {0}")]
    Config(String),

    /// A global logger was already installed.
    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    /// The worker pool for parallel evaluation could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod error_test {
    use super::*;

    fn assert_send_sync<T: Send + Sync + 'static>() {}

    #[test]
    fn should_cross_thread_boundaries() {
        assert_send_sync::<EvaluationError>();
    }

    #[test]
    fn should_describe_invalid_value() {
        let error = EvaluationError::InvalidPreferenceValue {
            item_id: 3,
            value: f32::NAN,
        };
        assert_eq!("Preference value for item 3 is not finite: NaN", error.to_string());
    }
}
