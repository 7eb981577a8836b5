//! Cross-table reference properties.
//!
//! Child rows must point at a real user unless they belong to the
//! deliberately orphaned tail of events or experiment assignments.

use cxgen_core::{
    config::GeneratorConfig, dataset::Dataset, defect_injector::sample_size,
    engine::DatasetEngine, event_generator::EventGenerator,
};
use std::collections::HashSet;

fn config() -> GeneratorConfig {
    let mut config = GeneratorConfig::default_test();
    config.seed = 2024;
    config.users.count = 1000;
    config.events.avg_per_user = 10.0;
    config.experiments.orphan_count = 50;
    config
}

fn run(config: &GeneratorConfig) -> Dataset {
    DatasetEngine::new(config.clone()).unwrap().run().unwrap()
}

fn known_ids(dataset: &Dataset) -> HashSet<&str> {
    dataset.users.iter().map(|u| u.user_id.as_str()).collect()
}

#[test]
fn subscriptions_and_surveys_never_orphan() {
    let dataset = run(&config());
    let known = known_ids(&dataset);
    assert!(dataset
        .subscriptions
        .iter()
        .all(|s| known.contains(s.user_id.as_str())));
    assert!(dataset
        .surveys
        .iter()
        .all(|s| known.contains(s.user_id.as_str())));
}

#[test]
fn event_orphans_are_exactly_the_appended_tail() {
    let config = config();
    let dataset = run(&config);
    let known = known_ids(&dataset);

    let base = dataset
        .events
        .iter()
        .position(|e| !known.contains(e.user_id.as_str()))
        .expect("some orphan events");
    let (main, tail) = dataset.events.split_at(base);

    assert!(main.iter().all(|e| known.contains(e.user_id.as_str())));
    assert!(tail.iter().all(|e| !known.contains(e.user_id.as_str())));
    assert_eq!(tail.len(), EventGenerator::new(&config).orphan_count(base));

    // Orphans reference identities minted once each.
    let orphan_ids: HashSet<&str> = tail.iter().map(|e| e.user_id.as_str()).collect();
    assert_eq!(orphan_ids.len(), tail.len());
}

#[test]
fn experiment_orphans_are_the_last_rows() {
    let config = config();
    let dataset = run(&config);
    let known = known_ids(&dataset);

    let orphans = config.experiments.orphan_count;
    let (main, tail) = dataset
        .experiments
        .split_at(dataset.experiments.len() - orphans);
    assert!(main.iter().all(|x| known.contains(x.user_id.as_str())));
    assert!(tail.iter().all(|x| !known.contains(x.user_id.as_str())));

    let enrolled = sample_size(dataset.users.len(), config.experiments.proportion);
    let repeats = sample_size(enrolled, config.experiments.duplicate_fraction);
    assert_eq!(main.len(), enrolled + repeats);
}

#[test]
fn children_see_duplicated_users() {
    let dataset = run(&config());
    let dup_ids: HashSet<&str> = dataset.users[1000..]
        .iter()
        .map(|u| u.user_id.as_str())
        .collect();
    assert_eq!(dup_ids.len(), 20);

    // Each duplicated row is iterated separately, so with 40 rows at 10
    // events each some events must land on duplicated identities.
    let hits = dataset
        .events
        .iter()
        .filter(|e| dup_ids.contains(e.user_id.as_str()))
        .count();
    assert!(hits > 0);
}

#[test]
fn zero_event_mean_runs_cleanly() {
    let mut config = GeneratorConfig::default_test();
    config.users.count = 100;
    config.events.avg_per_user = 0.0;
    let dataset = run(&config);
    assert!(dataset.events.is_empty());
    assert_eq!(dataset.users.len(), 102);
}
