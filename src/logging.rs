use crate::config::LogConfig;
use crate::error::EvaluationError;

/// Installs `env_logger` as the global logger.
///
/// `RUST_LOG` takes precedence over the configured level. Fails if a logger
/// was already installed.
pub fn init_logging(config: &LogConfig) -> Result<(), EvaluationError> {
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.level.as_str()),
    )
    .try_init()?;
    Ok(())
}
