use cxgen_core::{
    dataset::TableKind, engine::DatasetEngine, quality::QualityReport, store::DatasetStore,
};

fn exported(seed: u64) -> (DatasetStore, cxgen_core::dataset::Dataset) {
    let dataset = DatasetEngine::build_test(seed).unwrap().run().unwrap();
    let store = DatasetStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store.insert_dataset(&dataset).expect("insert");
    (store, dataset)
}

#[test]
fn every_table_is_exported_in_full() {
    let (store, dataset) = exported(42);
    for kind in TableKind::ALL {
        let rows = store.row_count(kind).unwrap();
        assert_eq!(rows as usize, dataset.row_count(kind), "{}", kind.name());
    }
}

#[test]
fn users_round_trip_with_nulls() {
    let (store, dataset) = exported(7);
    let back = store.users().unwrap();
    assert_eq!(back, dataset.users);
    assert!(back.iter().any(|u| u.age.is_none()));
}

#[test]
fn duplicate_keys_survive_export() {
    let (store, dataset) = exported(9);
    let dups = store.duplicate_user_ids().unwrap();
    let report = QualityReport::from_dataset(&dataset);
    assert_eq!(dups.len(), report.duplicate_user_keys);
}

#[test]
fn orphan_counts_match_quality_report() {
    let (store, dataset) = exported(11);
    let report = QualityReport::from_dataset(&dataset);
    for kind in [
        TableKind::Subscriptions,
        TableKind::Events,
        TableKind::SurveyResponses,
        TableKind::ExperimentAssignments,
    ] {
        let in_db = store.orphan_count(kind).unwrap();
        assert_eq!(in_db as usize, report.orphan_rows[kind.name()], "{}", kind.name());
    }
}

#[test]
fn migration_is_idempotent() {
    let store = DatasetStore::in_memory().unwrap();
    store.migrate().unwrap();
    store.migrate().unwrap();
    assert_eq!(store.row_count(TableKind::Users).unwrap(), 0);
}

#[test]
fn re_export_replaces_previous_rows() {
    let first = DatasetEngine::build_test(3).unwrap().run().unwrap();
    let second = DatasetEngine::build_test(4).unwrap().run().unwrap();

    let path = std::env::temp_dir().join(format!("cxgen-reexport-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let path_str = path.to_string_lossy().into_owned();

    for dataset in [&first, &second] {
        let store = DatasetStore::open(&path_str).unwrap();
        store.migrate().unwrap();
        store.insert_dataset(dataset).unwrap();
    }

    let store = DatasetStore::open(&path_str).unwrap();
    for kind in TableKind::ALL {
        assert_eq!(
            store.row_count(kind).unwrap() as usize,
            second.row_count(kind),
            "{}",
            kind.name()
        );
    }
    let report = QualityReport::from_dataset(&second);
    assert_eq!(store.duplicate_user_ids().unwrap().len(), report.duplicate_user_keys);
    assert_eq!(store.users().unwrap(), second.users);

    drop(store);
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{path_str}{suffix}"));
    }
}
