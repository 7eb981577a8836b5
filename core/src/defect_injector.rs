//! Messiness injection for the user table.
//!
//! Each pass is a pure `(table, rng) -> table` transformation driven by
//! one `UserDefect` entry. Passes compose in catalog order, so a later
//! pass may touch rows an earlier pass already corrupted.
//!
//! RULE: Row selection always goes through `sample_fraction`, which
//! draws `round(fraction * rows)` distinct rows from the pass's own
//! stream. No pass ever reads another pass's stream.

use crate::{
    config::{check_fraction, UserDefect, UserField},
    error::{GenError, GenResult},
    rng::{RngBank, StreamRng, StreamSlot},
    types::{Table, ISO_DATE},
    user_generator::UserRecord,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Rows a pass selects for a given fraction of a table. Halves round
/// to even, so 10 rows at 25% select 2.
pub fn sample_size(len: usize, fraction: f64) -> usize {
    (fraction * len as f64).round_ties_even() as usize
}

/// Uniform sample without replacement of `round(fraction * len)` rows,
/// in draw order.
pub fn sample_fraction(rng: &mut StreamRng, len: usize, fraction: f64) -> GenResult<Vec<usize>> {
    check_fraction("sample fraction", fraction)?;
    sample_count(rng, len, sample_size(len, fraction))
}

fn sample_count(rng: &mut StreamRng, len: usize, count: usize) -> GenResult<Vec<usize>> {
    if count > len {
        return Err(GenError::SampleTooLarge {
            requested: count,
            available: len,
        });
    }
    Ok(rng.sample_indices(len, count))
}

pub struct DefectInjector<'a> {
    defects: &'a [UserDefect],
}

impl<'a> DefectInjector<'a> {
    pub fn new(defects: &'a [UserDefect]) -> Self {
        Self { defects }
    }

    /// Run every pass in order, each on its own offset stream.
    pub fn apply(&self, users: Table<UserRecord>, bank: &RngBank) -> GenResult<Table<UserRecord>> {
        let before = users.len();
        let out = self
            .defects
            .iter()
            .enumerate()
            .try_fold(users, |rows, (pass, defect)| {
                let mut rng = bank.for_pass(StreamSlot::UserDefects, pass);
                apply_defect(rows, defect, &mut rng)
            })?;
        log::info!(
            "user_defects: {} passes applied, {} rows in, {} rows out",
            self.defects.len(),
            before,
            out.len()
        );
        Ok(out)
    }
}

/// Apply a single pass.
pub fn apply_defect(
    rows: Table<UserRecord>,
    defect: &UserDefect,
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    let out = match defect {
        UserDefect::DateFormatDrift { fraction, formats } => {
            drift_date_formats(rows, *fraction, formats, rng)
        }
        UserDefect::Casing {
            field,
            lower_fraction,
            upper_fraction,
        } => corrupt_casing(rows, *field, *lower_fraction, *upper_fraction, rng),
        UserDefect::Missing { field, fraction } => blank_out(rows, *field, *fraction, rng),
        UserDefect::OutOfRange { fraction, values } => {
            out_of_range_ages(rows, *fraction, values, rng)
        }
        UserDefect::Typos {
            field,
            fraction,
            table,
        } => substitute_typos(rows, *field, *fraction, table, rng),
        UserDefect::Duplicate {
            field,
            fraction,
            renames,
        } => duplicate_rows(rows, *field, *fraction, renames, rng),
    }?;
    log::debug!("{}: {} pass done ({} rows)", rng.name, defect.kind(), out.len());
    Ok(out)
}

fn drift_date_formats(
    mut rows: Table<UserRecord>,
    fraction: f64,
    formats: &[String],
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    for i in sample_fraction(rng, rows.len(), fraction)? {
        let Some(raw) = rows[i].signup_date.as_deref() else {
            continue;
        };
        // Already-drifted or blanked values are left alone.
        let Ok(date) = NaiveDate::parse_from_str(raw, ISO_DATE) else {
            continue;
        };
        let format = rng.pick(formats);
        rows[i].signup_date = Some(date.format(format).to_string());
    }
    Ok(rows)
}

fn corrupt_casing(
    mut rows: Table<UserRecord>,
    field: UserField,
    lower_fraction: f64,
    upper_fraction: f64,
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    check_fraction("lower_fraction", lower_fraction)?;
    check_fraction("upper_fraction", upper_fraction)?;
    let lower = sample_size(rows.len(), lower_fraction);
    // Rounded separately, the two counts can overshoot a tiny table.
    let upper = sample_size(rows.len(), upper_fraction).min(rows.len() - lower);
    // One draw split in two keeps the subsets disjoint.
    let picked = sample_count(rng, rows.len(), lower + upper)?;
    for (n, &i) in picked.iter().enumerate() {
        if let Some(Some(value)) = rows[i].text_mut(field) {
            *value = if n < lower {
                value.to_lowercase()
            } else {
                value.to_uppercase()
            };
        }
    }
    Ok(rows)
}

fn blank_out(
    mut rows: Table<UserRecord>,
    field: UserField,
    fraction: f64,
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    for i in sample_fraction(rng, rows.len(), fraction)? {
        rows[i].clear(field);
    }
    Ok(rows)
}

fn out_of_range_ages(
    mut rows: Table<UserRecord>,
    fraction: f64,
    values: &[i32],
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    for i in sample_fraction(rng, rows.len(), fraction)? {
        rows[i].age = Some(*rng.pick(values));
    }
    Ok(rows)
}

fn substitute_typos(
    mut rows: Table<UserRecord>,
    field: UserField,
    fraction: f64,
    table: &BTreeMap<String, Vec<String>>,
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    for i in sample_fraction(rng, rows.len(), fraction)? {
        let Some(Some(value)) = rows[i].text_mut(field) else {
            continue;
        };
        if let Some(typos) = table.get(value.as_str()) {
            *value = rng.pick(typos).clone();
        }
    }
    Ok(rows)
}

fn duplicate_rows(
    mut rows: Table<UserRecord>,
    field: UserField,
    fraction: f64,
    renames: &BTreeMap<String, String>,
    rng: &mut StreamRng,
) -> GenResult<Table<UserRecord>> {
    let picked = sample_fraction(rng, rows.len(), fraction)?;
    let mut copies = Vec::with_capacity(picked.len());
    for i in picked {
        let mut copy = rows[i].clone();
        if let Some(Some(value)) = copy.text_mut(field) {
            if let Some(renamed) = renames.get(value.as_str()) {
                *value = renamed.clone();
            }
        }
        copies.push(copy);
    }
    rows.extend(copies);
    Ok(rows)
}
