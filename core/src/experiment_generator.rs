use crate::{
    config::GeneratorConfig,
    defect_injector::sample_fraction,
    error::GenResult,
    generator::ChildGenerator,
    identity::{new_identity, random_date, shift_days},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Table},
    user_generator::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExperimentAssignmentRecord {
    pub exp_assignment_id: EntityId,
    pub user_id: EntityId,
    pub experiment_name: String,
    pub variant: String,
    pub assignment_date: String,
}

pub struct ExperimentGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> ExperimentGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }
}

impl ChildGenerator for ExperimentGenerator<'_> {
    type Row = ExperimentAssignmentRecord;

    fn name(&self) -> &'static str {
        "experiment_assignments"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Experiments
    }

    fn generate(
        &self,
        users: &[UserRecord],
        rng: &mut StreamRng,
    ) -> GenResult<Table<ExperimentAssignmentRecord>> {
        let cfg = &self.config.experiments;
        let first = shift_days(self.config.window_start, -cfg.lead_days)?;

        let mut rows = Vec::new();
        for i in sample_fraction(rng, users.len(), cfg.proportion)? {
            let exp_assignment_id = new_identity(rng);
            let variant = rng.pick(&cfg.variants).clone();
            let date = random_date(rng, first, self.config.window_end)?;
            rows.push(ExperimentAssignmentRecord {
                exp_assignment_id,
                user_id: users[i].user_id.clone(),
                experiment_name: cfg.experiment_name.clone(),
                variant,
                assignment_date: date.format(&cfg.date_format).to_string(),
            });
        }

        // Verbatim repeats: same assignment id, same user.
        let repeats: Vec<_> = sample_fraction(rng, rows.len(), cfg.duplicate_fraction)?
            .into_iter()
            .map(|i| rows[i].clone())
            .collect();
        rows.extend(repeats);

        for _ in 0..cfg.orphan_count {
            let exp_assignment_id = new_identity(rng);
            let user_id = new_identity(rng);
            let variant = rng.pick(&cfg.orphan_variants).clone();
            let date = random_date(rng, self.config.window_start, self.config.window_end)?;
            rows.push(ExperimentAssignmentRecord {
                exp_assignment_id,
                user_id,
                experiment_name: cfg.experiment_name.clone(),
                variant,
                assignment_date: date.format(&cfg.orphan_date_format).to_string(),
            });
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defect_injector::sample_size, user_generator::UserGenerator};
    use std::collections::HashSet;

    #[test]
    fn enrollment_repeats_and_orphans_have_fixed_sizes() {
        let mut config = GeneratorConfig::default_test();
        config.users.count = 500;
        let users = UserGenerator::new(&config)
            .generate(&mut StreamRng::new(3, 0))
            .unwrap();
        let rows = ExperimentGenerator::new(&config)
            .generate(&users, &mut StreamRng::new(3, 5))
            .unwrap();

        let enrolled = sample_size(500, 0.6);
        let repeats = sample_size(enrolled, 0.1);
        let orphans = config.experiments.orphan_count;
        assert_eq!(rows.len(), enrolled + repeats + orphans);

        let known: HashSet<&str> = users.iter().map(|u| u.user_id.as_str()).collect();
        let (main, tail) = rows.split_at(enrolled + repeats);
        assert!(main.iter().all(|r| known.contains(r.user_id.as_str())));
        assert!(tail.iter().all(|r| !known.contains(r.user_id.as_str())));

        let distinct_main: HashSet<&str> = main[..enrolled].iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(distinct_main.len(), enrolled, "enrollment samples without replacement");
        for repeat in &main[enrolled..] {
            assert!(main[..enrolled].contains(repeat));
        }
    }

    #[test]
    fn empty_user_table_yields_only_orphans() {
        let config = GeneratorConfig::default_test();
        let rows = ExperimentGenerator::new(&config)
            .generate(&[], &mut StreamRng::new(3, 5))
            .unwrap();
        assert_eq!(rows.len(), config.experiments.orphan_count);
    }
}
