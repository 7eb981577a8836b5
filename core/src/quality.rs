//! Data-quality profile of a generated dataset.
//!
//! Counts what the injector and child generators produced. Duplicate
//! users are reported both by key and by full row; which of the two a
//! consumer should dedup on is left to the consumer.

use crate::{
    config::UserField,
    dataset::{Dataset, TableKind},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

const PLAUSIBLE_AGES: std::ops::RangeInclusive<i32> = 16..=100;

const USER_FIELDS: [UserField; 7] = [
    UserField::SignupDate,
    UserField::Country,
    UserField::Age,
    UserField::Gender,
    UserField::PlanType,
    UserField::AcquisitionChannel,
    UserField::PrimaryDevice,
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QualityReport {
    pub row_counts: BTreeMap<String, usize>,
    pub user_null_counts: BTreeMap<String, usize>,
    pub event_null_counts: BTreeMap<String, usize>,
    /// Rows beyond the first for each repeated `user_id`.
    pub duplicate_user_keys: usize,
    /// Rows identical to an earlier row in every column.
    pub exact_duplicate_user_rows: usize,
    pub out_of_range_ages: usize,
    pub duplicate_experiment_rows: usize,
    pub orphan_rows: BTreeMap<String, usize>,
}

impl QualityReport {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let row_counts = dataset
            .row_counts()
            .into_iter()
            .map(|(name, n)| (name.to_string(), n))
            .collect();

        let user_null_counts = USER_FIELDS
            .iter()
            .map(|f| {
                let n = dataset.users.iter().filter(|u| u.is_null(*f)).count();
                (f.name().to_string(), n)
            })
            .collect();

        let mut event_null_counts = BTreeMap::new();
        event_null_counts.insert(
            "session_id".to_string(),
            dataset.events.iter().filter(|e| e.session_id.is_none()).count(),
        );
        event_null_counts.insert(
            "device_type".to_string(),
            dataset.events.iter().filter(|e| e.device_type.is_none()).count(),
        );

        let mut per_key: HashMap<&str, usize> = HashMap::new();
        for u in &dataset.users {
            *per_key.entry(u.user_id.as_str()).or_default() += 1;
        }
        let duplicate_user_keys: usize = per_key.values().map(|n| n - 1).sum();

        let exact_duplicate_user_rows = count_repeats(dataset.users.iter().map(|u| {
            // Debug output covers every column, nulls included.
            format!("{u:?}")
        }));

        let out_of_range_ages = dataset
            .users
            .iter()
            .filter_map(|u| u.age)
            .filter(|a| !PLAUSIBLE_AGES.contains(a))
            .count();

        let duplicate_experiment_rows = count_repeats(
            dataset
                .experiments
                .iter()
                .map(|x| format!("{}|{}|{}", x.exp_assignment_id, x.user_id, x.variant)),
        );

        let known: HashSet<&str> = per_key.keys().copied().collect();
        let orphans = |ids: Vec<&str>| ids.into_iter().filter(|id| !known.contains(id)).count();
        let mut orphan_rows = BTreeMap::new();
        orphan_rows.insert(
            TableKind::Subscriptions.name().to_string(),
            orphans(dataset.subscriptions.iter().map(|r| r.user_id.as_str()).collect()),
        );
        orphan_rows.insert(
            TableKind::Events.name().to_string(),
            orphans(dataset.events.iter().map(|r| r.user_id.as_str()).collect()),
        );
        orphan_rows.insert(
            TableKind::SurveyResponses.name().to_string(),
            orphans(dataset.surveys.iter().map(|r| r.user_id.as_str()).collect()),
        );
        orphan_rows.insert(
            TableKind::ExperimentAssignments.name().to_string(),
            orphans(dataset.experiments.iter().map(|r| r.user_id.as_str()).collect()),
        );

        Self {
            row_counts,
            user_null_counts,
            event_null_counts,
            duplicate_user_keys,
            exact_duplicate_user_rows,
            out_of_range_ages,
            duplicate_experiment_rows,
            orphan_rows,
        }
    }

    /// Share of user rows with a null in `field`.
    pub fn user_null_rate(&self, field: UserField) -> f64 {
        let total = self.row_counts.get("users").copied().unwrap_or(0);
        if total == 0 {
            return 0.0;
        }
        let nulls = self.user_null_counts.get(field.name()).copied().unwrap_or(0);
        nulls as f64 / total as f64
    }
}

fn count_repeats(keys: impl Iterator<Item = String>) -> usize {
    let mut seen = HashSet::new();
    keys.filter(|k| !seen.insert(k.clone())).count()
}
