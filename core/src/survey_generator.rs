use crate::{
    comment_generator::CommentGenerator,
    config::GeneratorConfig,
    error::GenResult,
    generator::ChildGenerator,
    identity::{new_identity, random_date},
    rng::{StreamRng, StreamSlot},
    types::{EntityId, Table},
    user_generator::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurveyResponseRecord {
    pub response_id: EntityId,
    pub user_id: EntityId,
    pub response_date: String,
    /// Deliberately allowed outside 0..=10.
    pub nps_score: i64,
    pub csat_score: i64,
    pub ease_of_use: String,
    pub comment_text: String,
}

pub struct SurveyGenerator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> SurveyGenerator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }
}

impl ChildGenerator for SurveyGenerator<'_> {
    type Row = SurveyResponseRecord;

    fn name(&self) -> &'static str {
        "survey_responses"
    }

    fn slot(&self) -> StreamSlot {
        StreamSlot::Surveys
    }

    fn generate(&self, users: &[UserRecord], rng: &mut StreamRng) -> GenResult<Table<SurveyResponseRecord>> {
        let cfg = &self.config.surveys;
        let mut rows = Vec::new();

        for user in users {
            if !rng.chance(cfg.response_rate) {
                continue;
            }
            let response_id = new_identity(rng);
            let date = random_date(rng, self.config.window_start, self.config.window_end)?;
            let nps_score = rng.range_inclusive(cfg.nps_min, cfg.nps_max);
            let csat_score = *rng.pick(&cfg.csat_scores);
            let ease_of_use = rng.pick(&cfg.ease_of_use).clone();
            let mut comment_text = CommentGenerator::sentence(rng, cfg.comment_words);
            if rng.chance(cfg.noise_rate) {
                comment_text.push_str(rng.pick(&cfg.noise_suffixes).as_str());
            }

            rows.push(SurveyResponseRecord {
                response_id,
                user_id: user.user_id.clone(),
                response_date: date.format(&cfg.date_format).to_string(),
                nps_score,
                csat_score,
                ease_of_use,
                comment_text,
            });
        }
        Ok(rows)
    }
}
