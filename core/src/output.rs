//! CSV persistence.
//!
//! Every file gets its header row, even when the table is empty.
//! Nulls are written as empty fields.

use crate::{
    dataset::{Dataset, TableKind},
    error::GenResult,
    event_generator::EventRecord,
    experiment_generator::ExperimentAssignmentRecord,
    subscription_generator::SubscriptionRecord,
    survey_generator::SurveyResponseRecord,
    user_generator::UserRecord,
};
use serde::Serialize;
use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

/// A record type with a fixed column order.
pub trait CsvRow: Serialize {
    const HEADER: &'static [&'static str];
}

impl CsvRow for UserRecord {
    const HEADER: &'static [&'static str] = &[
        "user_id",
        "signup_date",
        "country",
        "age",
        "gender",
        "plan_type",
        "acquisition_channel",
        "primary_device",
    ];
}

impl CsvRow for SubscriptionRecord {
    const HEADER: &'static [&'static str] = &[
        "subscription_id",
        "user_id",
        "start_date",
        "end_date",
        "billing_period",
        "price_usd",
        "is_active",
    ];
}

impl CsvRow for EventRecord {
    const HEADER: &'static [&'static str] = &[
        "event_id",
        "user_id",
        "event_time",
        "event_type",
        "session_id",
        "device_type",
        "platform",
    ];
}

impl CsvRow for SurveyResponseRecord {
    const HEADER: &'static [&'static str] = &[
        "response_id",
        "user_id",
        "response_date",
        "nps_score",
        "csat_score",
        "ease_of_use",
        "comment_text",
    ];
}

impl CsvRow for ExperimentAssignmentRecord {
    const HEADER: &'static [&'static str] = &[
        "exp_assignment_id",
        "user_id",
        "experiment_name",
        "variant",
        "assignment_date",
    ];
}

/// Write `rows` with a header to any writer.
pub fn write_table<W: Write, T: CsvRow>(writer: W, rows: &[T]) -> GenResult<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv.write_record(T::HEADER)?;
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// In-memory CSV bytes for one table.
pub fn table_bytes<T: CsvRow>(rows: &[T]) -> GenResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_table(&mut buf, rows)?;
    Ok(buf)
}

/// CSV bytes for every table, in persistence order.
pub fn dataset_bytes(dataset: &Dataset) -> GenResult<Vec<(TableKind, Vec<u8>)>> {
    TableKind::ALL
        .iter()
        .map(|kind| -> GenResult<(TableKind, Vec<u8>)> {
            let mut buf = Vec::new();
            write_kind(&mut buf, dataset, *kind)?;
            Ok((*kind, buf))
        })
        .collect()
}

/// Write the table `kind` selects from `dataset`.
pub fn write_kind<W: Write>(writer: W, dataset: &Dataset, kind: TableKind) -> GenResult<()> {
    match kind {
        TableKind::Users => write_table(writer, &dataset.users),
        TableKind::Subscriptions => write_table(writer, &dataset.subscriptions),
        TableKind::Events => write_table(writer, &dataset.events),
        TableKind::SurveyResponses => write_table(writer, &dataset.surveys),
        TableKind::ExperimentAssignments => write_table(writer, &dataset.experiments),
    }
}

/// Write all five tables into `dir`, creating it if absent.
/// Returns the written paths in persistence order.
pub fn write_dataset(dir: &Path, dataset: &Dataset) -> GenResult<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(TableKind::ALL.len());
    for kind in TableKind::ALL {
        let path = dir.join(kind.file_name());
        write_kind(BufWriter::new(File::create(&path)?), dataset, kind)?;
        log::info!("output: wrote {} ({} rows)", path.display(), dataset.row_count(kind));
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserRecord {
        UserRecord {
            user_id: id.into(),
            signup_date: Some("01/31/2023".into()),
            country: Some("usa".into()),
            age: None,
            gender: Some("Femal".into()),
            plan_type: Some("free".into()),
            acquisition_channel: None,
            primary_device: Some("ios".into()),
        }
    }

    #[test]
    fn empty_table_still_has_header() {
        let bytes = table_bytes::<EventRecord>(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "event_id,user_id,event_time,event_type,session_id,device_type,platform\n"
        );
    }

    #[test]
    fn nulls_are_empty_fields() {
        let bytes = table_bytes(&[user("u-1")]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let line = text.lines().nth(1).unwrap();
        assert_eq!(line, "u-1,01/31/2023,usa,,Femal,free,,ios");
    }

    #[test]
    fn header_matches_serialized_field_count() {
        let bytes = table_bytes(&[SubscriptionRecord {
            subscription_id: "s".into(),
            user_id: "u".into(),
            start_date: "2023-01-01".into(),
            end_date: "2023-01-31".into(),
            billing_period: "annual ".into(),
            price_usd: 9.99,
            is_active: true,
        }])
        .unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(headers.len(), record.len());
        assert_eq!(&record[4], "annual ");
        assert_eq!(&record[5], "9.99");
        assert_eq!(&record[6], "true");
    }

    #[test]
    fn files_match_in_memory_bytes() {
        let dataset = crate::engine::DatasetEngine::build_test(21).unwrap().run().unwrap();
        let dir = std::env::temp_dir().join(format!("cxgen-out-{}", std::process::id()));
        let paths = write_dataset(&dir, &dataset).unwrap();
        for (path, (kind, bytes)) in paths.iter().zip(dataset_bytes(&dataset).unwrap()) {
            assert_eq!(path.file_name().unwrap().to_string_lossy(), kind.file_name());
            assert_eq!(std::fs::read(path).unwrap(), bytes, "{}", kind.name());
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}
