//! cx-datagen: writes the messy customer-experience dataset.
//!
//! Usage:
//!   cx-datagen --seed 42 --users 5000 --out data
//!   cx-datagen --config config/generator.json --sqlite cx.db --report quality.json

use anyhow::{bail, Context, Result};
use cxgen_core::{
    config::GeneratorConfig, engine::DatasetEngine, output, quality::QualityReport,
    store::DatasetStore,
};
use std::{env, path::Path, str::FromStr};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = match find_arg(&args, "--config")? {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading configuration from {path}"))?,
        None => GeneratorConfig::default(),
    };
    if let Some(seed) = parse_arg(&args, "--seed")? {
        config.seed = seed;
    }
    if let Some(users) = parse_arg(&args, "--users")? {
        config.users.count = users;
    }
    let out_dir = find_arg(&args, "--out")?.unwrap_or("data");
    let sqlite = find_arg(&args, "--sqlite")?;
    let report_path = find_arg(&args, "--report")?;

    println!("cx-datagen");
    println!("  seed:      {}", config.seed);
    println!("  users:     {}", config.users.count);
    println!("  window:    {} .. {}", config.window_start, config.window_end);
    println!("  out:       {out_dir}");
    println!();

    let engine = DatasetEngine::new(config).context("invalid generator configuration")?;
    let dataset = engine.run()?;

    output::write_dataset(Path::new(out_dir), &dataset)
        .with_context(|| format!("writing CSV files to {out_dir}"))?;

    if let Some(db) = sqlite {
        let store = DatasetStore::open(db)?;
        store.migrate()?;
        store.insert_dataset(&dataset)?;
        log::info!("sqlite export written to {db}");
    }

    let report = QualityReport::from_dataset(&dataset);
    if let Some(path) = report_path {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing quality report to {path}"))?;
    }

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &QualityReport) {
    println!("Generated:");
    for (table, rows) in &report.row_counts {
        println!("  {table:<24} {rows}");
    }

    println!();
    println!("=== DATA QUALITY ===");
    println!("  duplicate user keys:    {}", report.duplicate_user_keys);
    println!("  exact duplicate users:  {}", report.exact_duplicate_user_rows);
    println!("  out-of-range ages:      {}", report.out_of_range_ages);
    println!("  repeated assignments:   {}", report.duplicate_experiment_rows);
    for (field, nulls) in &report.user_null_counts {
        if *nulls > 0 {
            println!("  users.{field:<20} {nulls} null");
        }
    }
    for (table, orphans) in &report.orphan_rows {
        if *orphans > 0 {
            println!("  {table:<24} {orphans} orphan rows");
        }
    }
}

/// Value following `flag`. A flag given without a value is an error.
fn find_arg<'a>(args: &'a [String], flag: &str) -> Result<Option<&'a str>> {
    let Some(pos) = args.iter().position(|a| a == flag) else {
        return Ok(None);
    };
    match args.get(pos + 1) {
        Some(value) if !value.starts_with("--") => Ok(Some(value.as_str())),
        _ => bail!("{flag} needs a value"),
    }
}

fn parse_arg<T>(args: &[String], flag: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    find_arg(args, flag)?
        .map(|v| {
            v.parse::<T>()
                .with_context(|| format!("invalid value for {flag}: {v:?}"))
        })
        .transpose()
}
