use crate::{
    config::GeneratorConfig,
    error::GenResult,
    generator::ChildGenerator,
    identity::{new_identity, random_datetime, shift_days},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Table, ISO_DATETIME},
    user_generator::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    pub event_id: EntityId,
    pub user_id: EntityId,
    pub event_time: String,
    pub event_type: String,
    pub session_id: Option<EntityId>,
    pub device_type: Option<String>,
    pub platform: String,
}

pub struct EventGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> EventGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// Number of orphan events appended after `base` regular events.
    pub fn orphan_count(&self, base: usize) -> usize {
        (base as f64 * self.config.events.orphan_rate).floor() as usize
    }

    fn user_events(
        &self,
        user_id: &str,
        rng: &mut StreamRng,
        rows: &mut Vec<EventRecord>,
    ) -> GenResult<()> {
        let cfg = &self.config.events;
        let n_events = rng.poisson(cfg.avg_per_user);
        if n_events == 0 {
            return Ok(());
        }
        // At least one session, even for a single event.
        let pool_size = (n_events / cfg.events_per_session).max(1);
        let sessions: Vec<EntityId> = (0..pool_size).map(|_| new_identity(rng)).collect();
        let first = shift_days(self.config.window_start, -cfg.window_padding_days)?;
        let last = shift_days(self.config.window_end, cfg.window_padding_days)?;

        for _ in 0..n_events {
            let event_id = new_identity(rng);
            let event_time = random_datetime(rng, first, last)?;
            let mut event_type = rng.pick(&cfg.event_types).clone();
            if rng.chance(cfg.typo_rate) {
                if let Some(typos) = cfg.typos.get(&event_type) {
                    event_type = rng.pick(typos).clone();
                }
            }
            let mut session_id = Some(rng.pick(&sessions).clone());
            let mut device_type = Some(rng.pick(&cfg.device_types).clone());
            // Drawn independently of the device, so the two can disagree.
            let platform = rng.pick(&cfg.platforms).clone();
            if rng.chance(cfg.null_session_rate) {
                session_id = None;
            }
            if rng.chance(cfg.null_device_rate) {
                device_type = None;
            }
            rows.push(EventRecord {
                event_id,
                user_id: user_id.to_string(),
                event_time: event_time.format(ISO_DATETIME).to_string(),
                event_type,
                session_id,
                device_type,
                platform,
            });
        }
        Ok(())
    }

    fn orphan_event(&self, rng: &mut StreamRng) -> GenResult<EventRecord> {
        let cfg = &self.config.events;
        let event_id = new_identity(rng);
        let user_id = new_identity(rng);
        let event_time = random_datetime(rng, self.config.window_start, self.config.window_end)?;
        let event_type = rng.pick(&cfg.orphan_event_types).clone();
        let session_id = new_identity(rng);
        let device_type = rng.pick(&cfg.orphan_devices).clone();
        let platform = rng.pick(&cfg.orphan_devices).clone();
        Ok(EventRecord {
            event_id,
            user_id,
            event_time: event_time.format(ISO_DATETIME).to_string(),
            event_type,
            session_id: Some(session_id),
            device_type: Some(device_type),
            platform,
        })
    }
}

impl ChildGenerator for EventGenerator<'_> {
    type Row = EventRecord;

    fn name(&self) -> &'static str {
        "events"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Events
    }

    fn generate(&self, users: &[UserRecord], rng: &mut StreamRng) -> GenResult<Table<EventRecord>> {
        let mut rows = Vec::new();
        for user in users {
            self.user_events(&user.user_id, rng, &mut rows)?;
        }

        let base = rows.len();
        let orphans = self.orphan_count(base);
        for _ in 0..orphans {
            rows.push(self.orphan_event(rng)?);
        }
        log::debug!("events: {base} regular, {orphans} orphaned");
        Ok(rows)
    }
}
