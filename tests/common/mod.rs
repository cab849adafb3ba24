#![allow(dead_code)]
use chrono::NaiveDate;
use label_catalog::source::load_records;
use label_catalog::{CatalogNormalizer, CatalogSnapshot, NormalizeOptions, RawVideoRecord};
use std::fs;
use std::path::PathBuf;

pub const LABEL: &str = "World Studio Records";

/// Path of a file under tests/fixtures
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn read_fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to read fixture {name}: {e}"))
}

/// The run date all fixture expectations are computed against
pub fn run_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 20).unwrap()
}

pub fn fixture_records() -> Vec<RawVideoRecord> {
    load_records(fixture_path("raw_records.json")).expect("raw_records.json should load")
}

/// Normalize the raw record fixture with default options
pub fn fixture_snapshot() -> CatalogSnapshot {
    CatalogNormalizer::new(NormalizeOptions::new(LABEL, run_date())).normalize(&fixture_records())
}
