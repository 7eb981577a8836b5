use super::DatasetStore;
use crate::{error::GenResult, user_generator::UserRecord};
use rusqlite::params;

impl DatasetStore {
    // ── Users ─────────────────────────────────────────────────────

    pub fn insert_users(&self, rows: &[UserRecord]) -> GenResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO users (
                user_id, signup_date, country, age, gender, plan_type,
                acquisition_channel, primary_device
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for u in rows {
            stmt.execute(params![
                &u.user_id,
                &u.signup_date,
                &u.country,
                u.age,
                &u.gender,
                &u.plan_type,
                &u.acquisition_channel,
                &u.primary_device,
            ])?;
        }
        Ok(())
    }

    pub fn users(&self) -> GenResult<Vec<UserRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, signup_date, country, age, gender, plan_type,
                    acquisition_channel, primary_device
             FROM users ORDER BY rowid ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(UserRecord {
                user_id: row.get(0)?,
                signup_date: row.get(1)?,
                country: row.get(2)?,
                age: row.get(3)?,
                gender: row.get(4)?,
                plan_type: row.get(5)?,
                acquisition_channel: row.get(6)?,
                primary_device: row.get(7)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// `user_id`s that appear on more than one row.
    pub fn duplicate_user_ids(&self) -> GenResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id FROM users GROUP BY user_id HAVING COUNT(*) > 1 ORDER BY user_id",
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}
