use crate::{
    error::{GenError, GenResult},
    rng::StreamRng,
};
use chrono::{
    format::{Item, StrftimeItems},
    NaiveDate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Categorical sampling ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedLabel {
    pub label: String,
    pub weight: f64,
}

impl WeightedLabel {
    pub fn new(label: &str, weight: f64) -> Self {
        Self {
            label: label.into(),
            weight,
        }
    }

    /// Cumulative roll over the weights. Weights need not sum to 1.
    pub fn pick<'a>(items: &'a [WeightedLabel], rng: &mut StreamRng) -> &'a str {
        let total: f64 = items.iter().map(|w| w.weight).sum();
        let roll = rng.next_f64() * total;
        let mut cumulative = 0.0;
        for item in items {
            cumulative += item.weight;
            if roll < cumulative {
                return &item.label;
            }
        }
        items.last().map(|w| w.label.as_str()).unwrap_or_default()
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn catalog(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), labels(v)))
        .collect()
}

// ── User defect catalog ────────────────────────────────────────────

/// A user column an injector pass can target. `user_id` is absent on
/// purpose: identity is never corrupted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    SignupDate,
    Country,
    Age,
    Gender,
    PlanType,
    AcquisitionChannel,
    PrimaryDevice,
}

impl UserField {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SignupDate => "signup_date",
            Self::Country => "country",
            Self::Age => "age",
            Self::Gender => "gender",
            Self::PlanType => "plan_type",
            Self::AcquisitionChannel => "acquisition_channel",
            Self::PrimaryDevice => "primary_device",
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, Self::Age)
    }
}

/// One injector pass over the user table. Passes run in list order,
/// each on its own RNG stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UserDefect {
    /// Re-serialize `signup_date` with a per-row random format.
    DateFormatDrift { fraction: f64, formats: Vec<String> },
    /// Lowercase one subset and uppercase a disjoint one.
    Casing {
        field: UserField,
        lower_fraction: f64,
        upper_fraction: f64,
    },
    /// Null out the field.
    Missing { field: UserField, fraction: f64 },
    /// Replace `age` with a value from `values`.
    OutOfRange { fraction: f64, values: Vec<i32> },
    /// Swap canonical values for a misspelling from `table`.
    Typos {
        field: UserField,
        fraction: f64,
        table: BTreeMap<String, Vec<String>>,
    },
    /// Append copies of sampled rows with `renames` applied to `field`.
    Duplicate {
        field: UserField,
        fraction: f64,
        renames: BTreeMap<String, String>,
    },
}

impl UserDefect {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DateFormatDrift { .. } => "date_format_drift",
            Self::Casing { .. } => "casing",
            Self::Missing { .. } => "missing",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Typos { .. } => "typos",
            Self::Duplicate { .. } => "duplicate",
        }
    }
}

fn default_user_defects() -> Vec<UserDefect> {
    vec![
        UserDefect::DateFormatDrift {
            fraction: 1.0,
            formats: labels(&["%Y-%m-%d", "%d-%m-%Y", "%m/%d/%Y", "%b %d %Y"]),
        },
        UserDefect::Casing {
            field: UserField::Country,
            lower_fraction: 0.30,
            upper_fraction: 0.15,
        },
        UserDefect::Missing {
            field: UserField::Age,
            fraction: 0.10,
        },
        UserDefect::OutOfRange {
            fraction: 0.03,
            values: vec![-5, -10, 120, 150],
        },
        UserDefect::Missing {
            field: UserField::AcquisitionChannel,
            fraction: 0.05,
        },
        UserDefect::Typos {
            field: UserField::AcquisitionChannel,
            fraction: 0.25,
            table: catalog(&[
                ("facebook_ads", &["facebook", "FB", "Fbook", "meta_ads"]),
                ("google_ads", &["google", "Adwords", "ggl"]),
                ("referral", &["referal", "friend_ref"]),
                ("organic", &["Organic", "org", "ORG"]),
                ("email", &["Email ", "e-mail", "MAIL"]),
            ]),
        },
        UserDefect::Typos {
            field: UserField::Gender,
            fraction: 0.15,
            table: catalog(&[
                ("female", &["Fmale", "Femal", "f"]),
                ("male", &["Mle", "Ml", "m"]),
            ]),
        },
        UserDefect::Missing {
            field: UserField::PrimaryDevice,
            fraction: 0.07,
        },
        UserDefect::Duplicate {
            field: UserField::PlanType,
            fraction: 0.02,
            renames: [("free".to_string(), "freemium".to_string())].into(),
        },
    ]
}

// ── Entity configs ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UserConfig {
    pub count: usize,
    pub age_mean: f64,
    pub age_std: f64,
    pub min_age: i32,
    /// Days at the end of the window no signup may fall into.
    pub signup_tail_days: i64,
    pub countries: Vec<String>,
    pub genders: Vec<String>,
    pub plan_types: Vec<WeightedLabel>,
    pub acquisition_channels: Vec<WeightedLabel>,
    pub devices: Vec<WeightedLabel>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            age_mean: 32.0,
            age_std: 10.0,
            min_age: 16,
            signup_tail_days: 90,
            countries: labels(&["USA", "Canada", "Mexico", "UK"]),
            genders: labels(&["female", "male", "nonbinary", "prefer_not_to_say"]),
            plan_types: vec![
                WeightedLabel::new("free", 0.5),
                WeightedLabel::new("basic", 0.3),
                WeightedLabel::new("premium", 0.2),
            ],
            acquisition_channels: vec![
                WeightedLabel::new("facebook_ads", 0.30),
                WeightedLabel::new("google_ads", 0.30),
                WeightedLabel::new("referral", 0.15),
                WeightedLabel::new("organic", 0.20),
                WeightedLabel::new("email", 0.05),
            ],
            devices: vec![
                WeightedLabel::new("ios", 0.4),
                WeightedLabel::new("android", 0.4),
                WeightedLabel::new("web", 0.2),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubscriptionConfig {
    /// Probability a user row gets any subscription.
    pub participation_rate: f64,
    /// Probability a participating user gets a second subscription.
    pub second_subscription_rate: f64,
    /// Days at the end of the window no base start date may fall into.
    pub start_tail_days: i64,
    pub start_jitter_days: i64,
    /// Duration pool in days; repeats weight the draw.
    pub durations_days: Vec<i64>,
    /// Durations for which a subscription can be flagged active.
    pub active_durations_days: Vec<i64>,
    pub active_rate: f64,
    pub billing_periods: Vec<String>,
    pub prices_usd: Vec<f64>,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            participation_rate: 0.7,
            second_subscription_rate: 0.2,
            start_tail_days: 365,
            start_jitter_days: 30,
            durations_days: vec![30, 30, 30, 365, -10, 0, 365 * 10],
            active_durations_days: vec![30, 365],
            active_rate: 0.7,
            billing_periods: labels(&[
                "monthly", "mth", "Monthly", "mo", "annual", "yr", "yearly", "annual ",
            ]),
            prices_usd: vec![0.0, 9.99, 14.99, 29.99, -5.00, 9999.99],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EventConfig {
    pub avg_per_user: f64,
    /// Roughly how many events share one session id.
    pub events_per_session: u64,
    /// Event times may fall this many days outside the window.
    pub window_padding_days: i64,
    /// Event type pool; repeats weight the draw.
    pub event_types: Vec<String>,
    pub typo_rate: f64,
    pub typos: BTreeMap<String, Vec<String>>,
    pub device_types: Vec<String>,
    pub platforms: Vec<String>,
    pub null_session_rate: f64,
    pub null_device_rate: f64,
    /// Extra events with never-issued users, as a share of regular events.
    pub orphan_rate: f64,
    pub orphan_event_types: Vec<String>,
    pub orphan_devices: Vec<String>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            avg_per_user: 40.0,
            events_per_session: 5,
            window_padding_days: 30,
            event_types: labels(&[
                "app_open",
                "app_open",
                "complete_session",
                "view_paywall",
                "start_trial",
                "cancel",
            ]),
            typo_rate: 0.15,
            typos: catalog(&[
                ("app_open", &["ap_open", "open", "appOpen"]),
                ("complete_session", &["complete", "finish_session"]),
                ("view_paywall", &["view_pay", "paywall_view"]),
            ]),
            device_types: labels(&["ios", "android", "web", "Windows Phone", "PlayStation"]),
            platforms: labels(&["ios", "android", "web", "PlayStation"]),
            null_session_rate: 0.03,
            null_device_rate: 0.04,
            orphan_rate: 0.03,
            orphan_event_types: labels(&["app_open", "complete_session"]),
            orphan_devices: labels(&["ios", "android", "web"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SurveyConfig {
    /// Probability a user row answers a survey.
    pub response_rate: f64,
    pub nps_min: i64,
    pub nps_max: i64,
    pub csat_scores: Vec<i64>,
    pub ease_of_use: Vec<String>,
    pub comment_words: usize,
    pub noise_rate: f64,
    pub noise_suffixes: Vec<String>,
    pub date_format: String,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            response_rate: 0.4,
            nps_min: -2,
            nps_max: 12,
            csat_scores: (0..=6).collect(),
            ease_of_use: labels(&[
                "very_easy",
                "easy",
                "neutral",
                "hard",
                "very_difficult",
                "vry_easy",
            ]),
            comment_words: 15,
            noise_rate: 0.2,
            noise_suffixes: labels(&[" \u{1F60A} <br> https://example.com"]),
            date_format: "%d-%m-%Y".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Share of user rows enrolled, sampled without replacement.
    pub proportion: f64,
    pub experiment_name: String,
    pub variants: Vec<String>,
    /// Assignments may predate the window by this many days.
    pub lead_days: i64,
    pub date_format: String,
    pub duplicate_fraction: f64,
    pub orphan_count: usize,
    pub orphan_variants: Vec<String>,
    pub orphan_date_format: String,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            proportion: 0.6,
            experiment_name: "onboarding_v2".into(),
            variants: labels(&["control", "treatment", "cntrl", "cotnrol", "TreatmentT"]),
            lead_days: 60,
            date_format: "%m/%d/%Y".into(),
            duplicate_fraction: 0.1,
            orphan_count: 50,
            orphan_variants: labels(&["control", "treatment"]),
            orphan_date_format: "%Y-%m-%d".into(),
        }
    }
}

// ── Top level ──────────────────────────────────────────────────────

/// Upper bound for any configured day offset: a century.
pub const MAX_SHIFT_DAYS: i64 = 36_525;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub users: UserConfig,
    pub user_defects: Vec<UserDefect>,
    pub subscriptions: SubscriptionConfig,
    pub events: EventConfig,
    pub surveys: SurveyConfig,
    pub experiments: ExperimentConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            window_start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            window_end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            users: UserConfig::default(),
            user_defects: default_user_defects(),
            subscriptions: SubscriptionConfig::default(),
            events: EventConfig::default(),
            surveys: SurveyConfig::default(),
            experiments: ExperimentConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Load overrides from a JSON file. Missing keys keep their defaults.
    /// In tests, use GeneratorConfig::default_test().
    pub fn load(path: &str) -> GenResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: GeneratorConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Small population with the default defect catalog, for tests.
    pub fn default_test() -> Self {
        let mut config = Self::default();
        config.users.count = 200;
        config.events.avg_per_user = 6.0;
        config.experiments.orphan_count = 10;
        config
    }

    /// Fail fast on anything that would make generation meaningless.
    pub fn validate(&self) -> GenResult<()> {
        if self.window_start > self.window_end {
            return Err(GenError::InvalidDateRange {
                start: self.window_start,
                end: self.window_end,
            });
        }
        self.check_tail("users.signup_tail_days", self.users.signup_tail_days)?;
        self.check_tail(
            "subscriptions.start_tail_days",
            self.subscriptions.start_tail_days,
        )?;
        check_days("events.window_padding_days", self.events.window_padding_days)?;
        check_days("experiments.lead_days", self.experiments.lead_days)?;
        check_days(
            "subscriptions.start_jitter_days",
            self.subscriptions.start_jitter_days,
        )?;

        let u = &self.users;
        non_negative("users.age_std", u.age_std)?;
        non_empty("users.countries", &u.countries)?;
        non_empty("users.genders", &u.genders)?;
        check_weights("users.plan_types", &u.plan_types)?;
        check_weights("users.acquisition_channels", &u.acquisition_channels)?;
        check_weights("users.devices", &u.devices)?;

        for (i, defect) in self.user_defects.iter().enumerate() {
            check_defect(i, defect)?;
        }

        let s = &self.subscriptions;
        check_fraction("subscriptions.participation_rate", s.participation_rate)?;
        check_fraction(
            "subscriptions.second_subscription_rate",
            s.second_subscription_rate,
        )?;
        check_fraction("subscriptions.active_rate", s.active_rate)?;
        non_empty("subscriptions.durations_days", &s.durations_days)?;
        for &length in &s.durations_days {
            if length.unsigned_abs() > MAX_SHIFT_DAYS as u64 {
                return Err(GenError::InvalidConfig(format!(
                    "subscriptions.durations_days entry {length} exceeds {MAX_SHIFT_DAYS} days"
                )));
            }
        }
        non_empty("subscriptions.billing_periods", &s.billing_periods)?;
        non_empty("subscriptions.prices_usd", &s.prices_usd)?;

        let e = &self.events;
        if !e.avg_per_user.is_finite() {
            return Err(GenError::InvalidConfig(
                "events.avg_per_user must be finite".into(),
            ));
        }
        non_negative("events.avg_per_user", e.avg_per_user)?;
        if e.events_per_session == 0 {
            return Err(GenError::InvalidConfig(
                "events.events_per_session must be at least 1".into(),
            ));
        }
        non_empty("events.event_types", &e.event_types)?;
        non_empty("events.device_types", &e.device_types)?;
        non_empty("events.platforms", &e.platforms)?;
        non_empty("events.orphan_event_types", &e.orphan_event_types)?;
        non_empty("events.orphan_devices", &e.orphan_devices)?;
        check_fraction("events.typo_rate", e.typo_rate)?;
        check_fraction("events.null_session_rate", e.null_session_rate)?;
        check_fraction("events.null_device_rate", e.null_device_rate)?;
        check_fraction("events.orphan_rate", e.orphan_rate)?;
        check_catalog("events.typos", &e.typos)?;

        let v = &self.surveys;
        check_fraction("surveys.response_rate", v.response_rate)?;
        check_fraction("surveys.noise_rate", v.noise_rate)?;
        if v.nps_min > v.nps_max {
            return Err(GenError::InvalidConfig(format!(
                "surveys.nps_min {} is above nps_max {}",
                v.nps_min, v.nps_max
            )));
        }
        non_empty("surveys.csat_scores", &v.csat_scores)?;
        non_empty("surveys.ease_of_use", &v.ease_of_use)?;
        non_empty("surveys.noise_suffixes", &v.noise_suffixes)?;
        check_date_format("surveys.date_format", &v.date_format)?;

        let x = &self.experiments;
        check_fraction("experiments.proportion", x.proportion)?;
        check_fraction("experiments.duplicate_fraction", x.duplicate_fraction)?;
        non_empty("experiments.variants", &x.variants)?;
        non_empty("experiments.orphan_variants", &x.orphan_variants)?;
        check_date_format("experiments.date_format", &x.date_format)?;
        check_date_format("experiments.orphan_date_format", &x.orphan_date_format)?;

        Ok(())
    }

    /// Last day a tail-reserving draw may land on.
    pub fn window_end_minus(&self, tail_days: i64) -> GenResult<NaiveDate> {
        crate::identity::shift_days(self.window_end, -tail_days)
    }

    fn check_tail(&self, name: &str, tail_days: i64) -> GenResult<()> {
        check_days(name, tail_days)?;
        let last = self.window_end_minus(tail_days)?;
        if last < self.window_start {
            return Err(GenError::InvalidConfig(format!(
                "{name}={tail_days} leaves no room in window {}..{}",
                self.window_start, self.window_end
            )));
        }
        Ok(())
    }
}

fn check_defect(index: usize, defect: &UserDefect) -> GenResult<()> {
    let name = |what: &str| format!("user_defects[{index}].{what}");
    match defect {
        UserDefect::DateFormatDrift { fraction, formats } => {
            check_fraction(&name("fraction"), *fraction)?;
            non_empty(&name("formats"), formats)?;
            for f in formats {
                check_date_format(&name("formats"), f)?;
            }
        }
        UserDefect::Casing {
            field,
            lower_fraction,
            upper_fraction,
        } => {
            check_text_field(&name("field"), *field)?;
            check_fraction(&name("lower_fraction"), *lower_fraction)?;
            check_fraction(&name("upper_fraction"), *upper_fraction)?;
            check_fraction(&name("lower_fraction + upper_fraction"), lower_fraction + upper_fraction)?;
        }
        UserDefect::Missing { fraction, .. } => {
            check_fraction(&name("fraction"), *fraction)?;
        }
        UserDefect::OutOfRange { fraction, values } => {
            check_fraction(&name("fraction"), *fraction)?;
            non_empty(&name("values"), values)?;
        }
        UserDefect::Typos {
            field,
            fraction,
            table,
        } => {
            check_text_field(&name("field"), *field)?;
            check_fraction(&name("fraction"), *fraction)?;
            check_catalog(&name("table"), table)?;
        }
        UserDefect::Duplicate {
            field, fraction, ..
        } => {
            check_text_field(&name("field"), *field)?;
            check_fraction(&name("fraction"), *fraction)?;
        }
    }
    Ok(())
}

pub(crate) fn check_fraction(name: &str, value: f64) -> GenResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(GenError::InvalidFraction {
            name: name.into(),
            value,
        })
    }
}

fn non_negative(name: &str, value: f64) -> GenResult<()> {
    if value < 0.0 {
        return Err(GenError::InvalidConfig(format!(
            "{name} must not be negative (got {value})"
        )));
    }
    Ok(())
}

/// Day offsets (tails, padding, jitter) must be non-negative and at most
/// `MAX_SHIFT_DAYS`.
fn check_days(name: &str, days: i64) -> GenResult<()> {
    if !(0..=MAX_SHIFT_DAYS).contains(&days) {
        return Err(GenError::InvalidConfig(format!(
            "{name} must be between 0 and {MAX_SHIFT_DAYS} days (got {days})"
        )));
    }
    Ok(())
}

fn non_empty<T>(name: &str, items: &[T]) -> GenResult<()> {
    if items.is_empty() {
        return Err(GenError::InvalidConfig(format!("{name} must not be empty")));
    }
    Ok(())
}

fn check_weights(name: &str, items: &[WeightedLabel]) -> GenResult<()> {
    non_empty(name, items)?;
    if items.iter().any(|w| w.weight < 0.0 || !w.weight.is_finite()) {
        return Err(GenError::InvalidConfig(format!(
            "{name} has a negative or non-finite weight"
        )));
    }
    if items.iter().map(|w| w.weight).sum::<f64>() <= 0.0 {
        return Err(GenError::InvalidConfig(format!(
            "{name} weights must sum to more than zero"
        )));
    }
    Ok(())
}

fn check_catalog(name: &str, table: &BTreeMap<String, Vec<String>>) -> GenResult<()> {
    if let Some((key, _)) = table.iter().find(|(_, v)| v.is_empty()) {
        return Err(GenError::InvalidConfig(format!(
            "{name} has no replacements for '{key}'"
        )));
    }
    Ok(())
}

fn check_text_field(name: &str, field: UserField) -> GenResult<()> {
    if !field.is_text() {
        return Err(GenError::InvalidConfig(format!(
            "{name} must be a text column, got '{}'",
            field.name()
        )));
    }
    Ok(())
}

fn check_date_format(name: &str, format: &str) -> GenResult<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(GenError::InvalidConfig(format!(
            "{name} has an invalid date format '{format}'"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GeneratorConfig::default().validate().unwrap();
        GeneratorConfig::default_test().validate().unwrap();
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut config = GeneratorConfig::default();
        std::mem::swap(&mut config.window_start, &mut config.window_end);
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidDateRange { .. })
        ));
    }

    #[test]
    fn window_too_narrow_for_subscription_tail_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.window_end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("subscriptions.start_tail_days"), "{err}");
    }

    #[test]
    fn oversized_day_offsets_fail_validation() {
        let mut config = GeneratorConfig::default();
        config.users.signup_tail_days = 200_000_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("users.signup_tail_days"), "{err}");

        let mut config = GeneratorConfig::default();
        config.events.window_padding_days = 200_000_000;
        assert!(matches!(config.validate(), Err(GenError::InvalidConfig(_))));

        let mut config = GeneratorConfig::default();
        config.experiments.lead_days = MAX_SHIFT_DAYS;
        config.validate().unwrap();
        config.experiments.lead_days = MAX_SHIFT_DAYS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn fraction_above_one_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.experiments.proportion = 1.5;
        assert!(matches!(
            config.validate(),
            Err(GenError::InvalidFraction { .. })
        ));
    }

    #[test]
    fn overlapping_casing_fractions_are_rejected() {
        let mut config = GeneratorConfig::default();
        config.user_defects = vec![UserDefect::Casing {
            field: UserField::Country,
            lower_fraction: 0.7,
            upper_fraction: 0.4,
        }];
        assert!(config.validate().is_err());
    }

    #[test]
    fn typos_on_age_are_rejected() {
        let mut config = GeneratorConfig::default();
        config.user_defects = vec![UserDefect::Typos {
            field: UserField::Age,
            fraction: 0.1,
            table: BTreeMap::new(),
        }];
        assert!(matches!(config.validate(), Err(GenError::InvalidConfig(_))));
    }

    #[test]
    fn zero_session_size_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.events.events_per_session = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_date_format_is_rejected() {
        let mut config = GeneratorConfig::default();
        config.surveys.date_format = "%Q-%Y".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_weights_are_rejected() {
        let mut config = GeneratorConfig::default();
        for w in &mut config.users.devices {
            w.weight = 0.0;
        }
        assert!(config.validate().is_err());
    }

    #[test]
    fn weighted_pick_respects_weights() {
        let items = vec![WeightedLabel::new("a", 0.9), WeightedLabel::new("b", 0.1)];
        let mut rng = StreamRng::new(5, 0);
        let a = (0..5_000)
            .filter(|_| WeightedLabel::pick(&items, &mut rng) == "a")
            .count();
        assert!((4_300..4_700).contains(&a), "picked 'a' {a} times");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "seed": 7, "users": { "count": 10 } }"#;
        let config: GeneratorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.users.count, 10);
        assert_eq!(config.users.age_mean, 32.0);
        assert_eq!(config.user_defects, default_user_defects());
    }

    #[test]
    fn defect_catalog_round_trips_through_json() {
        let config = GeneratorConfig::default();
        let json = serde_json::to_string(&config.user_defects).unwrap();
        assert!(json.contains(r#""kind":"typos""#));
        let back: Vec<UserDefect> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config.user_defects);
    }
}
