use rayon::prelude::*;

use crate::error::EvaluationError;
use crate::metrics::running_average::RunningAverage;
use crate::metrics::UserMetric;
use crate::preferences::{check_all_finite, PreferenceRecord, PreferenceValue};

/// A held-out record together with its position in the true and in the predicted ordering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankedRecord<'a> {
    pub record: &'a PreferenceRecord,
    pub true_rank: usize,
    pub predicted_rank: usize,
}

impl RankedRecord<'_> {
    pub fn disagreement(&self) -> usize {
        self.true_rank.abs_diff(self.predicted_rank)
    }
}

/// Ranks the records of one user by their true and by their predicted value.
///
/// Ranks are zero based and ascending. Both orderings come from a stable sort,
/// so records with equal values keep their input order and ties are not
/// corrected for. The records themselves are left untouched.
pub fn rank(records: &[PreferenceRecord]) -> Result<Vec<RankedRecord<'_>>, EvaluationError> {
    check_all_finite(records)?;
    let true_ranks = ranks_by(records, |record| record.true_value);
    let predicted_ranks = ranks_by(records, |record| record.predicted_value);

    let ranked = records
        .iter()
        .zip(true_ranks.into_iter().zip(predicted_ranks))
        .map(|(record, (true_rank, predicted_rank))| RankedRecord {
            record,
            true_rank,
            predicted_rank,
        })
        .collect();
    Ok(ranked)
}

/// Scores how well the predicted ordering of one user's items matches the true ordering.
///
/// Returns 1.0 when both orderings are identical and 0.0 when the predicted
/// ordering is the exact reverse of the true one. Sets of zero or one record
/// always score 1.0.
pub fn score(records: &[PreferenceRecord]) -> Result<f64, EvaluationError> {
    if records.len() <= 1 {
        return Ok(1_f64);
    }
    let total_disagreement: usize = rank(records)?
        .iter()
        .map(RankedRecord::disagreement)
        .sum();
    let worst_case = worst_case_disagreement(records.len()) as f64;
    Ok((worst_case - total_disagreement as f64) / worst_case)
}

/// Total disagreement of `n` items whose predicted order is the reverse of their true order.
pub fn worst_case_disagreement(n: usize) -> usize {
    n * (n + 1) / 2 - (n + 1) / 2
}

/// Scores every user on the rayon pool and folds the scores, in input order, into one average.
pub fn score_users(user_records: &[Vec<PreferenceRecord>]) -> Result<RunningAverage, EvaluationError> {
    let scores = user_records
        .par_iter()
        .map(|records| score(records))
        .collect::<Result<Vec<f64>, EvaluationError>>()?;

    let mut average = RunningAverage::new();
    average.extend(scores);
    Ok(average)
}

fn ranks_by<F>(records: &[PreferenceRecord], key: F) -> Vec<usize>
where
    F: Fn(&PreferenceRecord) -> PreferenceValue,
{
    let mut order: Vec<usize> = (0..records.len()).collect();
    // sort_by is stable
    order.sort_by(|&a, &b| key(&records[a]).total_cmp(&key(&records[b])));

    let mut ranks = vec![0; records.len()];
    for (position, index) in order.into_iter().enumerate() {
        ranks[index] = position;
    }
    ranks
}

/// Average rank distance score over all evaluated users.
///
/// Unlike [`score`], records of single-item users are checked too, so a
/// rejected user never reaches the average.
pub struct RankDistance {
    average: RunningAverage,
}

impl Default for RankDistance {
    fn default() -> Self {
        Self::new()
    }
}

impl RankDistance {
    pub fn new() -> RankDistance {
        RankDistance {
            average: RunningAverage::new(),
        }
    }

    pub fn qty_users(&self) -> usize {
        self.average.count()
    }
}

impl UserMetric for RankDistance {
    fn add(&mut self, records: &[PreferenceRecord]) -> Result<(), EvaluationError> {
        check_all_finite(records)?;
        let user_score = score(records)?;
        self.average.add_datum(user_score);
        Ok(())
    }

    fn result(&self) -> Result<f64, EvaluationError> {
        self.average.average()
    }

    fn get_name(&self) -> String {
        String::from("RankDistance")
    }
}
