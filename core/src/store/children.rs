use super::DatasetStore;
use crate::{
    dataset::TableKind,
    error::GenResult,
    event_generator::EventRecord,
    experiment_generator::ExperimentAssignmentRecord,
    subscription_generator::SubscriptionRecord,
    survey_generator::SurveyResponseRecord,
};
use rusqlite::params;

impl DatasetStore {
    // ── Subscriptions ─────────────────────────────────────────────

    pub fn insert_subscriptions(&self, rows: &[SubscriptionRecord]) -> GenResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO subscriptions (
                subscription_id, user_id, start_date, end_date,
                billing_period, price_usd, is_active
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for s in rows {
            stmt.execute(params![
                &s.subscription_id,
                &s.user_id,
                &s.start_date,
                &s.end_date,
                &s.billing_period,
                s.price_usd,
                if s.is_active { 1 } else { 0 },
            ])?;
        }
        Ok(())
    }

    // ── Events ────────────────────────────────────────────────────

    pub fn insert_events(&self, rows: &[EventRecord]) -> GenResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO events (
                event_id, user_id, event_time, event_type,
                session_id, device_type, platform
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for e in rows {
            stmt.execute(params![
                &e.event_id,
                &e.user_id,
                &e.event_time,
                &e.event_type,
                &e.session_id,
                &e.device_type,
                &e.platform,
            ])?;
        }
        Ok(())
    }

    // ── Survey responses ──────────────────────────────────────────

    pub fn insert_surveys(&self, rows: &[SurveyResponseRecord]) -> GenResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO survey_responses (
                response_id, user_id, response_date, nps_score,
                csat_score, ease_of_use, comment_text
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for r in rows {
            stmt.execute(params![
                &r.response_id,
                &r.user_id,
                &r.response_date,
                r.nps_score,
                r.csat_score,
                &r.ease_of_use,
                &r.comment_text,
            ])?;
        }
        Ok(())
    }

    // ── Experiment assignments ────────────────────────────────────

    pub fn insert_experiments(&self, rows: &[ExperimentAssignmentRecord]) -> GenResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO experiment_assignments (
                exp_assignment_id, user_id, experiment_name, variant, assignment_date
            ) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for x in rows {
            stmt.execute(params![
                &x.exp_assignment_id,
                &x.user_id,
                &x.experiment_name,
                &x.variant,
                &x.assignment_date,
            ])?;
        }
        Ok(())
    }

    /// Child rows of `kind` whose `user_id` is absent from `users`.
    pub fn orphan_count(&self, kind: TableKind) -> GenResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} c
             WHERE NOT EXISTS (SELECT 1 FROM users u WHERE u.user_id = c.user_id)",
            kind.name()
        );
        let count = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }
}
