use cxgen_core::{
    config::{GeneratorConfig, UserDefect},
    engine::DatasetEngine,
    error::GenError,
};

const CHECKED_IN: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../config/generator.json");

#[test]
fn checked_in_config_matches_defaults() {
    let loaded = GeneratorConfig::load(CHECKED_IN).expect("load config/generator.json");
    assert_eq!(loaded, GeneratorConfig::default());
}

#[test]
fn missing_file_names_the_path() {
    let err = GeneratorConfig::load("/nonexistent/generator.json").unwrap_err();
    assert!(err.to_string().contains("/nonexistent/generator.json"), "{err}");
}

#[test]
fn invalid_override_fails_fast() {
    let path = std::env::temp_dir().join(format!("cxgen-bad-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "window_start": "2025-01-01", "window_end": "2024-01-01" }"#).unwrap();
    let err = GeneratorConfig::load(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, GenError::InvalidDateRange { .. }), "{err}");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn custom_defect_catalog_drives_the_injector() {
    let mut config = GeneratorConfig::default_test();
    config.user_defects = vec![UserDefect::Duplicate {
        field: cxgen_core::config::UserField::Country,
        fraction: 0.5,
        renames: [("UK".to_string(), "United Kingdom".to_string())].into(),
    }];
    let users = DatasetEngine::new(config).unwrap().messy_users().unwrap();
    assert_eq!(users.len(), 300);
    assert!(users[..200].iter().all(|u| u.age.is_some()));
    assert!(users[200..]
        .iter()
        .all(|u| u.country.as_deref() != Some("UK")));
}

#[test]
fn empty_catalog_leaves_users_clean() {
    let mut config = GeneratorConfig::default_test();
    config.user_defects.clear();
    let users = DatasetEngine::new(config).unwrap().messy_users().unwrap();
    assert_eq!(users.len(), 200);
    assert!(users.iter().all(|u| u.age.is_some() && u.primary_device.is_some()));
}

fn load_json(tag: &str, json: &str) -> Result<GeneratorConfig, GenError> {
    let path = std::env::temp_dir().join(format!("cxgen-{tag}-{}.json", std::process::id()));
    std::fs::write(&path, json).unwrap();
    let result = GeneratorConfig::load(path.to_str().unwrap());
    let _ = std::fs::remove_file(&path);
    result
}

#[test]
fn malformed_files_are_rejected_on_load() {
    let cases = [
        ("tail", r#"{ "users": { "signup_tail_days": 800 } }"#),
        ("neg-tail", r#"{ "subscriptions": { "start_tail_days": -1 } }"#),
        ("empty-countries", r#"{ "users": { "countries": [] } }"#),
        (
            "zero-weights",
            r#"{ "users": { "plan_types": [ { "label": "free", "weight": 0.0 } ] } }"#,
        ),
        ("neg-mean", r#"{ "events": { "avg_per_user": -1.0 } }"#),
        ("sessions", r#"{ "events": { "events_per_session": 0 } }"#),
        ("nps", r#"{ "surveys": { "nps_min": 5, "nps_max": 1 } }"#),
        ("date-format", r#"{ "surveys": { "date_format": "%Q" } }"#),
        (
            "typo-on-age",
            r#"{ "user_defects": [ { "kind": "typos", "field": "age",
                 "fraction": 0.1, "table": {} } ] }"#,
        ),
        (
            "empty-typos",
            r#"{ "events": { "typos": { "login": [] } } }"#,
        ),
    ];
    for (tag, json) in cases {
        let err = load_json(tag, json).expect_err(tag);
        assert!(matches!(err, GenError::InvalidConfig(_)), "{tag}: {err}");
    }
}

#[test]
fn out_of_range_fractions_are_rejected_on_load() {
    let cases = [
        ("participation", r#"{ "subscriptions": { "participation_rate": 1.5 } }"#),
        ("orphan-rate", r#"{ "events": { "orphan_rate": -0.1 } }"#),
        (
            "casing-sum",
            r#"{ "user_defects": [ { "kind": "casing", "field": "country",
                 "lower_fraction": 0.7, "upper_fraction": 0.6 } ] }"#,
        ),
        (
            "missing",
            r#"{ "user_defects": [ { "kind": "missing", "field": "age", "fraction": 2.0 } ] }"#,
        ),
    ];
    for (tag, json) in cases {
        let err = load_json(tag, json).expect_err(tag);
        assert!(matches!(err, GenError::InvalidFraction { .. }), "{tag}: {err}");
    }
}

#[test]
fn huge_day_offsets_are_rejected_not_panicking() {
    let cases = [
        ("signup-tail", r#"{ "users": { "signup_tail_days": 200000000 } }"#),
        ("padding", r#"{ "events": { "window_padding_days": 200000000 } }"#),
        ("lead", r#"{ "experiments": { "lead_days": 200000000 } }"#),
        ("jitter", r#"{ "subscriptions": { "start_jitter_days": 200000000 } }"#),
        ("duration", r#"{ "subscriptions": { "durations_days": [30, -200000000] } }"#),
        ("tail-max", r#"{ "users": { "signup_tail_days": 9223372036854775807 } }"#),
    ];
    for (tag, json) in cases {
        let err = load_json(tag, json).expect_err(tag);
        assert!(matches!(err, GenError::InvalidConfig(_)), "{tag}: {err}");
    }
}

#[test]
fn unparseable_json_is_a_serialization_error() {
    let err = load_json("syntax", "{ \"seed\": ").unwrap_err();
    assert!(matches!(err, GenError::Serialization(_)), "{err}");
    let err = load_json("wrong-type", r#"{ "users": { "count": "many" } }"#).unwrap_err();
    assert!(matches!(err, GenError::Serialization(_)), "{err}");
}

#[test]
fn partial_override_keeps_other_defaults() {
    let config = load_json("partial", r#"{ "seed": 7, "users": { "count": 50 } }"#).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.users.count, 50);
    assert_eq!(config.events, GeneratorConfig::default().events);
}
