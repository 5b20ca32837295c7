use hashbrown::HashMap;

use crate::error::EvaluationError;

pub type UserId = u64;
pub type ItemId = u64;
pub type PreferenceValue = f32;

/// All known preferences, grouped per user.
pub type Preferences = HashMap<UserId, Vec<Preference>>;

/// A single known rating of an item by a user.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preference {
    pub item_id: ItemId,
    pub value: PreferenceValue,
}

impl Preference {
    pub fn new(item_id: ItemId, value: PreferenceValue) -> Self {
        Preference { item_id, value }
    }
}

/// A held-out item of one user together with the recommender's estimate for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreferenceRecord {
    pub item_id: ItemId,
    pub true_value: PreferenceValue,
    pub predicted_value: PreferenceValue,
}

impl PreferenceRecord {
    pub fn new(
        item_id: ItemId,
        true_value: PreferenceValue,
        predicted_value: PreferenceValue,
    ) -> Self {
        PreferenceRecord {
            item_id,
            true_value,
            predicted_value,
        }
    }
}

impl PreferenceRecord {
    /// Fails on the first NaN or infinite value, true value first.
    pub fn check_finite(&self) -> Result<(), EvaluationError> {
        for value in [self.true_value, self.predicted_value] {
            if !value.is_finite() {
                return Err(EvaluationError::InvalidPreferenceValue {
                    item_id: self.item_id,
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Checks every record of a set before any of them is used.
pub fn check_all_finite(records: &[PreferenceRecord]) -> Result<(), EvaluationError> {
    records.iter().try_for_each(PreferenceRecord::check_finite)
}

impl From<(ItemId, PreferenceValue, PreferenceValue)> for PreferenceRecord {
    fn from((item_id, true_value, predicted_value): (ItemId, PreferenceValue, PreferenceValue)) -> Self {
        PreferenceRecord::new(item_id, true_value, predicted_value)
    }
}

/// Collects `(user, item, rating)` triples into per-user preference lists,
/// keeping the order in which the ratings of each user were given.
pub fn group_by_user<I>(ratings: I) -> Preferences
where
    I: IntoIterator<Item = (UserId, ItemId, PreferenceValue)>,
{
    let mut preferences = Preferences::new();
    for (user_id, item_id, value) in ratings {
        preferences
            .entry(user_id)
            .or_insert_with(Vec::new)
            .push(Preference::new(item_id, value));
    }
    preferences
}

#[cfg(test)]
mod preferences_test {
    use super::*;

    #[test]
    fn should_group_ratings_per_user() {
        let preferences = group_by_user(vec![(1, 10, 4.0), (2, 10, 1.0), (1, 11, 2.5)]);
        assert_eq!(2, preferences.len());
        assert_eq!(
            vec![Preference::new(10, 4.0), Preference::new(11, 2.5)],
            preferences[&1]
        );
        assert_eq!(vec![Preference::new(10, 1.0)], preferences[&2]);
    }

    #[test]
    fn should_find_first_non_finite_value() {
        let records = [
            PreferenceRecord::new(1, 4.0, 3.0),
            PreferenceRecord::new(2, 2.0, f32::NEG_INFINITY),
            PreferenceRecord::new(3, f32::NAN, 1.0),
        ];
        assert!(check_all_finite(&records[..1]).is_ok());
        assert!(matches!(
            check_all_finite(&records),
            Err(EvaluationError::InvalidPreferenceValue { item_id: 2, .. })
        ));
        assert!(matches!(
            records[2].check_finite(),
            Err(EvaluationError::InvalidPreferenceValue { item_id: 3, .. })
        ));
    }

    #[test]
    fn should_build_record_from_tuple() {
        let record: PreferenceRecord = (7, 3.0, 2.0).into();
        assert_eq!(PreferenceRecord::new(7, 3.0, 2.0), record);
    }
}
