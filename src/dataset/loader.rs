use std::collections::HashMap;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::dataset::{DatasetError, NewElectionRecord, RawElectionRow};
use crate::store::ElectionStore;

pub const REQUIRED_COLUMNS: [&str; 14] = [
    "year",
    "state",
    "constituency",
    "candidate",
    "party",
    "votes",
    "vote_share_percentage",
    "position",
    "margin",
    "margin_percentage",
    "gender",
    "education",
    "profession",
    "party_type",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LoadOutcome {
    AlreadyPopulated { existing: u64 },
    Loaded { inserted: u64 },
}

/// Populates an empty store from a CSV file. A store that already holds any
/// record is left untouched and the file is not opened.
pub fn load_csv(store: &mut ElectionStore, path: &Path) -> Result<LoadOutcome> {
    let existing = store.count()?;
    if existing > 0 {
        info!(existing, "store already populated, skipping dataset load");
        return Ok(LoadOutcome::AlreadyPopulated { existing });
    }
    let rows = read_csv_rows(path)?;
    load_records(store, rows, &path.display().to_string())
}

pub fn read_csv_rows(path: &Path) -> Result<Vec<RawElectionRow>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed opening dataset: {}", path.display()))?;
    read_csv(file).with_context(|| format!("failed reading dataset: {}", path.display()))
}

/// Reads rows by header position. When a column name repeats, its first
/// occurrence wins; unknown columns are ignored.
pub fn read_csv<R: io::Read>(reader: R) -> Result<Vec<RawElectionRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut columns = HashMap::with_capacity(REQUIRED_COLUMNS.len());
    for column in REQUIRED_COLUMNS {
        let index = headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| DatasetError::MissingColumn(column.to_string()))?;
        columns.insert(column, index);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |column: &str| {
            columns
                .get(column)
                .and_then(|&index| record.get(index))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };
        rows.push(RawElectionRow {
            line: record.position().map(|p| p.line()),
            year: cell("year"),
            state: cell("state"),
            constituency: cell("constituency"),
            candidate: cell("candidate"),
            party: cell("party"),
            votes: cell("votes"),
            vote_share_percentage: cell("vote_share_percentage"),
            position: cell("position"),
            margin: cell("margin"),
            margin_percentage: cell("margin_percentage"),
            gender: cell("gender"),
            education: cell("education"),
            profession: cell("profession"),
            party_type: cell("party_type"),
        });
    }
    debug!(rows = rows.len(), "parsed dataset rows");
    Ok(rows)
}

/// Coerces and inserts `rows` in one transaction, unless the store already
/// holds data. A row with an unusable year aborts the whole load before
/// anything is written.
pub fn load_records(
    store: &mut ElectionStore,
    rows: Vec<RawElectionRow>,
    source: &str,
) -> Result<LoadOutcome> {
    let existing = store.count()?;
    if existing > 0 {
        info!(existing, "store already populated, skipping dataset load");
        return Ok(LoadOutcome::AlreadyPopulated { existing });
    }

    let records = rows
        .iter()
        .map(NewElectionRecord::from_raw)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    let inserted = store.insert_batch(&records, source)?;
    info!(inserted, source, "loaded election dataset");

    for anomaly in store.winner_anomalies()? {
        warn!(
            year = anomaly.year,
            constituency = %anomaly.constituency,
            winners = anomaly.winners,
            "constituency does not have exactly one winner"
        );
    }
    Ok(LoadOutcome::Loaded { inserted })
}
