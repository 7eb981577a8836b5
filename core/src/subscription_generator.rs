use crate::{
    config::GeneratorConfig,
    error::GenResult,
    generator::ChildGenerator,
    identity::{new_identity, random_date, shift_days},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Table, ISO_DATE},
    user_generator::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionRecord {
    pub subscription_id: EntityId,
    pub user_id: EntityId,
    pub start_date: String,
    pub end_date: String,
    pub billing_period: String,
    pub price_usd: f64,
    pub is_active: bool,
}

pub struct SubscriptionGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> SubscriptionGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }
}

impl ChildGenerator for SubscriptionGenerator<'_> {
    type Row = SubscriptionRecord;

    fn name(&self) -> &'static str {
        "subscriptions"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Subscriptions
    }

    fn generate(&self, users: &[UserRecord], rng: &mut StreamRng) -> GenResult<Table<SubscriptionRecord>> {
        let cfg = &self.config.subscriptions;
        let base_end = self.config.window_end_minus(cfg.start_tail_days)?;
        let mut rows = Vec::new();

        for user in users {
            if !rng.chance(cfg.participation_rate) {
                continue;
            }
            let count = if rng.chance(cfg.second_subscription_rate) { 2 } else { 1 };
            let base_start = random_date(rng, self.config.window_start, base_end)?;

            for _ in 0..count {
                let subscription_id = new_identity(rng);
                let start = shift_days(base_start, rng.range_inclusive(0, cfg.start_jitter_days))?;
                // Negative and zero lengths are part of the catalog.
                let length = *rng.pick(&cfg.durations_days);
                let end = shift_days(start, length)?;
                let billing_period = rng.pick(&cfg.billing_periods).clone();
                let price_usd = *rng.pick(&cfg.prices_usd);
                let is_active =
                    cfg.active_durations_days.contains(&length) && rng.chance(cfg.active_rate);

                rows.push(SubscriptionRecord {
                    subscription_id,
                    user_id: user.user_id.clone(),
                    start_date: start.format(ISO_DATE).to_string(),
                    end_date: end.format(ISO_DATE).to_string(),
                    billing_period,
                    price_usd,
                    is_active,
                });
            }
        }
        Ok(rows)
    }
}
