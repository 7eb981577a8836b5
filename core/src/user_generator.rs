use crate::{
    config::{GeneratorConfig, UserField, WeightedLabel},
    error::GenResult,
    identity::{new_identity, random_date},
    rng::StreamRng,
    types::{EntityId, Table, ISO_DATE},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One user row. Every column but `user_id` is nullable because the
/// injector may blank it out; a freshly generated row has them all set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub user_id: EntityId,
    pub signup_date: Option<String>,
    pub country: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub plan_type: Option<String>,
    pub acquisition_channel: Option<String>,
    pub primary_device: Option<String>,
}

impl UserRecord {
    /// Current value of a text column. `None` for `age` and for nulls.
    pub fn text(&self, field: UserField) -> Option<&str> {
        match field {
            UserField::SignupDate => self.signup_date.as_deref(),
            UserField::Country => self.country.as_deref(),
            UserField::Age => None,
            UserField::Gender => self.gender.as_deref(),
            UserField::PlanType => self.plan_type.as_deref(),
            UserField::AcquisitionChannel => self.acquisition_channel.as_deref(),
            UserField::PrimaryDevice => self.primary_device.as_deref(),
        }
    }

    /// Mutable slot of a text column, or `None` for `age`.
    pub fn text_mut(&mut self, field: UserField) -> Option<&mut Option<String>> {
        match field {
            UserField::SignupDate => Some(&mut self.signup_date),
            UserField::Country => Some(&mut self.country),
            UserField::Age => None,
            UserField::Gender => Some(&mut self.gender),
            UserField::PlanType => Some(&mut self.plan_type),
            UserField::AcquisitionChannel => Some(&mut self.acquisition_channel),
            UserField::PrimaryDevice => Some(&mut self.primary_device),
        }
    }

    pub fn is_null(&self, field: UserField) -> bool {
        match field {
            UserField::Age => self.age.is_none(),
            other => self.text(other).is_none(),
        }
    }

    pub fn clear(&mut self, field: UserField) {
        match self.text_mut(field) {
            Some(slot) => *slot = None,
            None => self.age = None,
        }
    }
}

/// Produces the clean user table. Messiness is applied afterwards by
/// the DefectInjector.
pub struct UserGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> UserGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self, rng: &mut StreamRng) -> GenResult<Table<UserRecord>> {
        let users = &self.config.users;
        let signup_start = self.config.window_start;
        let signup_end = self.config.window_end_minus(users.signup_tail_days)?;

        let mut rows = Vec::with_capacity(users.count);
        for _ in 0..users.count {
            rows.push(self.generate_one(rng, signup_start, signup_end)?);
        }
        log::info!("users: generated {} clean rows", rows.len());
        Ok(rows)
    }

    fn generate_one(
        &self,
        rng: &mut StreamRng,
        signup_start: NaiveDate,
        signup_end: NaiveDate,
    ) -> GenResult<UserRecord> {
        let users = &self.config.users;
        let user_id = new_identity(rng);
        let signup = random_date(rng, signup_start, signup_end)?;
        // Truncation matches an integer cast; the floor keeps it positive.
        let age = rng.normal(users.age_mean, users.age_std).max(users.min_age as f64) as i32;
        let gender = rng.pick(&users.genders).clone();
        let plan = WeightedLabel::pick(&users.plan_types, rng).to_string();
        let channel = WeightedLabel::pick(&users.acquisition_channels, rng).to_string();
        let device = WeightedLabel::pick(&users.devices, rng).to_string();
        let country = rng.pick(&users.countries).clone();

        Ok(UserRecord {
            user_id,
            signup_date: Some(signup.format(ISO_DATE).to_string()),
            country: Some(country),
            age: Some(age),
            gender: Some(gender),
            plan_type: Some(plan),
            acquisition_channel: Some(channel),
            primary_device: Some(device),
        })
    }
}
