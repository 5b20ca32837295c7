use itertools::Itertools;
use log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::config::EvaluationConfig;
use crate::error::EvaluationError;
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::preferences::{ItemId, Preference, PreferenceRecord, PreferenceValue, Preferences, UserId};

/// A trained model that can estimate how a user would rate an item.
pub trait Recommender: Sync {
    /// Returns `None` when no estimate can be made for this user and item.
    fn estimate_preference(&self, user_id: UserId, item_id: ItemId) -> Option<PreferenceValue>;
}

/// Builds a fresh recommender from the training part of a hold-out split.
pub trait RecommenderBuilder {
    type Output: Recommender;

    fn build_recommender(&self, training: &Preferences) -> Self::Output;
}

/// Held-out preferences of the evaluated users, in ascending user id order.
type HeldOut = Vec<(UserId, Vec<Preference>)>;

/// Evaluates a recommender by hiding part of every user's preferences and
/// comparing its estimates for the hidden items with the real ratings.
pub struct HoldOutEvaluator {
    training_percentage: f64,
    evaluation_percentage: f64,
    seed: u64,
    pool: ThreadPool,
}

impl HoldOutEvaluator {
    pub fn new(config: &EvaluationConfig) -> Result<HoldOutEvaluator, EvaluationError> {
        config.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.num_workers)
            .build()?;
        Ok(HoldOutEvaluator {
            training_percentage: config.training_percentage,
            evaluation_percentage: config.evaluation_percentage,
            seed: config.seed,
            pool,
        })
    }

    pub fn evaluate<B>(
        &self,
        builder: &B,
        preferences: &Preferences,
    ) -> Result<EvaluationReporter, EvaluationError>
    where
        B: RecommenderBuilder,
    {
        let (training, held_out) = self.split(preferences);
        info!(
            "Split {} users into {} training users and {} test users",
            preferences.len(),
            training.len(),
            held_out.len()
        );

        let recommender = builder.build_recommender(&training);

        let user_records: Vec<(UserId, Vec<PreferenceRecord>)> = self.pool.install(|| {
            held_out
                .par_iter()
                .map(|(user_id, test_preferences)| {
                    (*user_id, estimate_user(&recommender, *user_id, test_preferences))
                })
                .collect()
        });

        let mut reporter = EvaluationReporter::new();
        for (user_id, records) in user_records.iter() {
            if records.is_empty() {
                debug!("No estimates for user {}, skipping", user_id);
                continue;
            }
            reporter.add(records)?;
        }
        info!("Evaluated {} users", reporter.qty_users());
        Ok(reporter)
    }

    fn split(&self, preferences: &Preferences) -> (Preferences, HeldOut) {
        let mut rng = Pcg64::seed_from_u64(self.seed);
        let mut training = Preferences::new();
        let mut held_out = HeldOut::new();

        let mut user_ids = preferences.keys().copied().collect_vec();
        user_ids.sort_unstable();
        for user_id in user_ids {
            if rng.gen::<f64>() >= self.evaluation_percentage {
                continue;
            }
            let (train, test): (Vec<Preference>, Vec<Preference>) = preferences[&user_id]
                .iter()
                .copied()
                .partition(|_| rng.gen::<f64>() < self.training_percentage);
            if !train.is_empty() {
                training.insert(user_id, train);
            }
            if !test.is_empty() {
                held_out.push((user_id, test));
            }
        }
        (training, held_out)
    }
}

fn estimate_user<R: Recommender>(
    recommender: &R,
    user_id: UserId,
    test_preferences: &[Preference],
) -> Vec<PreferenceRecord> {
    let (rated, unrated): (Vec<&Preference>, Vec<&Preference>) = test_preferences
        .iter()
        .partition(|preference| preference.value.is_finite());
    if !unrated.is_empty() {
        warn!(
            "Dropped {} held-out items of user {} with a non-finite rating",
            unrated.len(),
            user_id
        );
    }

    let records = rated
        .iter()
        .filter_map(|preference| {
            recommender
                .estimate_preference(user_id, preference.item_id)
                .filter(|estimate| estimate.is_finite())
                .map(|estimate| PreferenceRecord::new(preference.item_id, preference.value, estimate))
        })
        .collect_vec();
    if records.len() < rated.len() {
        debug!(
            "Dropped {} of {} held-out items of user {} without an estimate",
            rated.len() - records.len(),
            rated.len(),
            user_id
        );
    }
    records
}
