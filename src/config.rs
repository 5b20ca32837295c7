use std::ffi::OsStr;
use std::fs::File;

use justconfig::error::ConfigError;
use justconfig::item::ValueExtractor;
use justconfig::processors::Trim;
use justconfig::sources::env::Env;
use justconfig::sources::text::ConfigText;
use justconfig::ConfPath;
use justconfig::Config;

use crate::config_processors::Unquote;
use crate::error::EvaluationError;

// Set some default values
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_TRAINING_PERCENTAGE: f64 = 0.9;
const DEFAULT_EVALUATION_PERCENTAGE: f64 = 1.0;
const DEFAULT_SEED: u64 = 42;

pub struct AppConfig {
    pub log: LogConfig,
    pub evaluation: EvaluationConfig,
}

pub struct LogConfig {
    pub level: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EvaluationConfig {
    /// Share of each evaluated user's preferences used for training; the rest is held out.
    pub training_percentage: f64,
    /// Share of all users that take part in the evaluation.
    pub evaluation_percentage: f64,
    pub seed: u64,
    pub num_workers: usize,
}

// Environment variables that override the config file
const ENV_OVERRIDES: [(&str, &str, &str); 5] = [
    ("log", "level", "LOG_LEVEL"),
    ("evaluation", "training_percentage", "TRAINING_PERCENTAGE"),
    ("evaluation", "evaluation_percentage", "EVALUATION_PERCENTAGE"),
    ("evaluation", "seed", "EVALUATION_SEED"),
    ("evaluation", "num_workers", "NUM_WORKERS"),
];

impl AppConfig {
    /// Loads the configuration from an optional text file, overridden by environment variables.
    pub fn new(config_path: &str) -> Result<AppConfig, EvaluationError> {
        AppConfig::load(config_path, "")
    }

    fn load(config_path: &str, env_prefix: &str) -> Result<AppConfig, EvaluationError> {
        // Initialize config object
        let mut conf = Config::default();

        // Define config params from environment variables
        let env_names = ENV_OVERRIDES
            .iter()
            .map(|(_, _, name)| format!("{}{}", env_prefix, name))
            .collect::<Vec<_>>();
        let env_mapping = ENV_OVERRIDES
            .iter()
            .zip(env_names.iter())
            .map(|((section, key, _), name)| (ConfPath::from(&[*section, *key]), OsStr::new(name)))
            .collect::<Vec<_>>();
        // The first source holding a key wins, so environment variables go first
        conf.add_source(Env::new(&env_mapping));

        // Check if there is a config file
        if let Ok(config_file) = File::open(config_path) {
            let config_text = ConfigText::new(config_file, config_path)
                .map_err(|error| EvaluationError::Config(error.to_string()))?;
            conf.add_source(config_text);
        }

        // Parse into custom config struct
        let config = AppConfig::parse(conf)?;
        config.evaluation.validate()?;
        Ok(config)
    }

    pub(crate) fn parse(conf: Config) -> Result<AppConfig, EvaluationError> {
        Ok(AppConfig {
            log: LogConfig::parse(&conf, ConfPath::from(&["log"]))?,
            evaluation: EvaluationConfig::parse(&conf, ConfPath::from(&["evaluation"]))?,
        })
    }
}

fn config_error(error: ConfigError) -> EvaluationError {
    EvaluationError::Config(error.to_string())
}

impl LogConfig {
    fn parse(conf: &Config, path: ConfPath) -> Result<LogConfig, EvaluationError> {
        Ok(LogConfig {
            level: conf
                .get(path.push("level"))
                .unquote()
                .try_value()
                .map_err(config_error)?
                .unwrap_or_else(|| String::from(DEFAULT_LOG_LEVEL)),
        })
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            training_percentage: DEFAULT_TRAINING_PERCENTAGE,
            evaluation_percentage: DEFAULT_EVALUATION_PERCENTAGE,
            seed: DEFAULT_SEED,
            num_workers: default_num_workers(),
        }
    }
}

impl EvaluationConfig {
    // Missing keys fall back to their default, malformed values are an error.
    fn parse(conf: &Config, path: ConfPath) -> Result<EvaluationConfig, EvaluationError> {
        Ok(EvaluationConfig {
            training_percentage: conf
                .get(path.push("training_percentage"))
                .trim()
                .try_value()
                .map_err(config_error)?
                .unwrap_or(DEFAULT_TRAINING_PERCENTAGE),
            evaluation_percentage: conf
                .get(path.push("evaluation_percentage"))
                .trim()
                .try_value()
                .map_err(config_error)?
                .unwrap_or(DEFAULT_EVALUATION_PERCENTAGE),
            seed: conf
                .get(path.push("seed"))
                .trim()
                .try_value()
                .map_err(config_error)?
                .unwrap_or(DEFAULT_SEED),
            num_workers: conf
                .get(path.push("num_workers"))
                .trim()
                .try_value()
                .map_err(config_error)?
                // Detect number of CPUs
                .unwrap_or_else(default_num_workers),
        })
    }

    pub fn validate(&self) -> Result<(), EvaluationError> {
        if !(self.training_percentage > 0.0 && self.training_percentage <= 1.0) {
            return Err(EvaluationError::InvalidConfiguration(format!(
                "training_percentage must be in (0, 1], got {}",
                self.training_percentage
            )));
        }
        if !(self.evaluation_percentage > 0.0 && self.evaluation_percentage <= 1.0) {
            return Err(EvaluationError::InvalidConfiguration(format!(
                "evaluation_percentage must be in (0, 1], got {}",
                self.evaluation_percentage
            )));
        }
        if self.num_workers == 0 {
            return Err(EvaluationError::InvalidConfiguration(String::from(
                "num_workers must be at least 1",
            )));
        }
        Ok(())
    }
}

fn default_num_workers() -> usize {
    sys_info::cpu_num().map(|n| n as usize).unwrap_or(1).max(1)
}
