//! The generation engine: sequences every generator for one run.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Users                 (clean)
//!   2. User defect injector  (one stream per pass)
//!   3. Subscriptions
//!   4. Events
//!   5. Survey responses
//!   6. Experiment assignments
//!
//! RULES:
//!   - Steps 3-6 read the user table AFTER injection, so child rows can
//!     point at duplicated identities. That is intended noise.
//!   - All randomness flows through the RngBank.
//!   - Configuration is validated before the first draw.

use crate::{
    config::GeneratorConfig,
    dataset::Dataset,
    defect_injector::DefectInjector,
    error::GenResult,
    event_generator::EventGenerator,
    experiment_generator::ExperimentGenerator,
    generator::ChildGenerator,
    rng::{RngBank, StreamSlot},
    subscription_generator::SubscriptionGenerator,
    survey_generator::SurveyGenerator,
    types::Table,
    user_generator::{UserGenerator, UserRecord},
};

pub struct DatasetEngine {
    pub config: GeneratorConfig,
    pub rng_bank: RngBank,
}

impl DatasetEngine {
    /// Validate `config` and seed the bank from it.
    pub fn new(config: GeneratorConfig) -> GenResult<Self> {
        config.validate()?;
        let rng_bank = RngBank::new(config.seed);
        Ok(Self { config, rng_bank })
    }

    /// Engine over the small test configuration with the given seed.
    pub fn build_test(seed: u64) -> GenResult<Self> {
        let mut config = GeneratorConfig::default_test();
        config.seed = seed;
        Self::new(config)
    }

    /// Run the full pipeline. Each call starts from fresh streams, so
    /// repeated runs on one engine are identical.
    pub fn run(&self) -> GenResult<Dataset> {
        log::info!("run: master seed {}", self.rng_bank.master_seed());
        let users = self.messy_users()?;
        let subscriptions = self.run_child(&SubscriptionGenerator::new(&self.config), &users)?;
        let events = self.run_child(&EventGenerator::new(&self.config), &users)?;
        let surveys = self.run_child(&SurveyGenerator::new(&self.config), &users)?;
        let experiments = self.run_child(&ExperimentGenerator::new(&self.config), &users)?;

        Ok(Dataset {
            users,
            subscriptions,
            events,
            surveys,
            experiments,
        })
    }

    /// Steps 1-2: clean users, then every configured defect pass.
    pub fn messy_users(&self) -> GenResult<Table<UserRecord>> {
        let mut rng = self.rng_bank.for_stream(StreamSlot::Users);
        let clean = UserGenerator::new(&self.config).generate(&mut rng)?;
        DefectInjector::new(&self.config.user_defects).apply(clean, &self.rng_bank)
    }

    fn run_child<G: ChildGenerator>(&self, generator: &G, users: &[UserRecord]) -> GenResult<Table<G::Row>> {
        let mut rng = self.rng_bank.for_stream(generator.slot());
        let rows = generator.generate(users, &mut rng)?;
        log::info!("{}: generated {} rows", generator.name(), rows.len());
        Ok(rows)
    }
}
