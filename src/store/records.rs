use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::dataset::{ElectionRecord, NewElectionRecord};
use crate::store::migrations::BASE_MIGRATION;
use crate::store::{LoadInfo, WinnerAnomaly};

const RECORD_COLUMNS: &str = "id, year, state, constituency, candidate, party, votes, \
vote_share_percentage, position, margin, margin_percentage, gender, education, profession, \
party_type, is_winner";

/// Text columns that may be grouped on or counted. Only these names are ever
/// interpolated into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColumn {
    State,
    Constituency,
    Candidate,
    Party,
    Gender,
}

impl TextColumn {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::State => "state",
            Self::Constituency => "constituency",
            Self::Candidate => "candidate",
            Self::Party => "party",
            Self::Gender => "gender",
        }
    }
}

pub struct ElectionStore {
    conn: Connection,
}

impl ElectionStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed creating store directory: {}", parent.display())
                })?;
            }
        }
        let conn = Connection::open(path)
            .with_context(|| format!("failed opening store: {}", path.display()))?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM election_results", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Inserts every record and a `dataset_loads` entry in one transaction.
    pub fn insert_batch(&mut self, records: &[NewElectionRecord], source: &str) -> Result<u64> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
INSERT INTO election_results(
    year, state, constituency, candidate, party, votes, vote_share_percentage,
    position, margin, margin_percentage, gender, education, profession, party_type, is_winner
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)
"#,
            )?;
            for record in records {
                stmt.execute(params![
                    record.year,
                    record.state,
                    record.constituency,
                    record.candidate,
                    record.party,
                    record.votes,
                    record.vote_share_percentage,
                    record.position,
                    record.margin,
                    record.margin_percentage,
                    record.gender,
                    record.education,
                    record.profession,
                    record.party_type,
                    if record.is_winner { 1 } else { 0 },
                ])?;
            }
        }
        tx.execute(
            "INSERT INTO dataset_loads(source, row_count, loaded_at) VALUES (?1, ?2, ?3)",
            params![source, records.len() as i64, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(records.len() as u64)
    }

    pub fn last_load(&self) -> Result<Option<LoadInfo>> {
        let row = self
            .conn
            .query_row(
                r#"
SELECT source, row_count, loaded_at
FROM dataset_loads
ORDER BY id DESC
LIMIT 1
"#,
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        let Some((source, row_count, loaded_at_raw)) = row else {
            return Ok(None);
        };
        let loaded_at = DateTime::parse_from_rfc3339(&loaded_at_raw)
            .map(|dt| dt.with_timezone(&Utc))
            .with_context(|| format!("invalid load timestamp: {loaded_at_raw}"))?;
        Ok(Some(LoadInfo {
            source,
            row_count: row_count as u64,
            loaded_at,
        }))
    }

    pub fn distinct_years(&self) -> Result<Vec<i32>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT year FROM election_results ORDER BY year ASC")?;
        let years = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(years)
    }

    pub fn records_for_year(&self, year: i32) -> Result<Vec<ElectionRecord>> {
        self.query_records("WHERE year = ?1 ORDER BY id ASC", params![year])
    }

    pub fn winners_for_year(&self, year: i32) -> Result<Vec<ElectionRecord>> {
        self.query_records(
            "WHERE year = ?1 AND is_winner = 1 ORDER BY id ASC",
            params![year],
        )
    }

    /// Case-insensitive substring match on candidate OR constituency, folding
    /// with Unicode lowercase. `%` and `_` in `needle` match literally.
    pub fn search_year(&self, year: i32, needle: &str) -> Result<Vec<ElectionRecord>> {
        // SQLite's LIKE only folds ASCII.
        let needle = needle.to_lowercase();
        let mut records = self.records_for_year(year)?;
        records.retain(|record| {
            record.candidate.to_lowercase().contains(&needle)
                || record.constituency.to_lowercase().contains(&needle)
        });
        Ok(records)
    }

    pub fn count_rows_for_year(&self, year: i32) -> Result<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM election_results WHERE year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn count_distinct(&self, year: i32, column: TextColumn) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(DISTINCT {}) FROM election_results WHERE year = ?1",
            column.as_sql()
        );
        let count = self.conn.query_row(&sql, params![year], |row| row.get(0))?;
        Ok(count)
    }

    /// Winner rows per value of `column`, ordered by the column value.
    pub fn count_winners_by(&self, year: i32, column: TextColumn) -> Result<Vec<(String, i64)>> {
        let column = column.as_sql();
        let sql = format!(
            r#"
SELECT {column}, COUNT(*)
FROM election_results
WHERE year = ?1 AND is_winner = 1
GROUP BY {column}
ORDER BY {column} ASC
"#
        );
        self.query_pairs(&sql, year)
    }

    /// Sum of votes per value of `column`, ordered by the column value.
    pub fn sum_votes_by(&self, year: i32, column: TextColumn) -> Result<Vec<(String, i64)>> {
        let column = column.as_sql();
        let sql = format!(
            r#"
SELECT {column}, COALESCE(SUM(votes), 0)
FROM election_results
WHERE year = ?1
GROUP BY {column}
ORDER BY {column} ASC
"#
        );
        self.query_pairs(&sql, year)
    }

    /// SQLite integer sums report overflow as an error instead of wrapping.
    pub fn total_votes(&self, year: i32) -> Result<i64> {
        let total = self.conn.query_row(
            "SELECT COALESCE(SUM(votes), 0) FROM election_results WHERE year = ?1",
            params![year],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    pub fn count_by_year_and_gender(&self) -> Result<Vec<(i32, String, i64)>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT year, gender, COUNT(*)
FROM election_results
GROUP BY year, gender
ORDER BY year ASC, gender ASC
"#,
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn winner_anomalies(&self) -> Result<Vec<WinnerAnomaly>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT year, constituency, SUM(is_winner) AS winners
FROM election_results
GROUP BY year, constituency
HAVING winners <> 1
ORDER BY year ASC, constituency ASC
"#,
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(WinnerAnomaly {
                    year: row.get(0)?,
                    constituency: row.get(1)?,
                    winners: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_records(
        &self,
        clause: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<ElectionRecord>> {
        let sql = format!("SELECT {RECORD_COLUMNS} FROM election_results {clause}");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params, row_to_election_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn query_pairs(&self, sql: &str, year: i32) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![year], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn row_to_election_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ElectionRecord> {
    Ok(ElectionRecord {
        id: row.get(0)?,
        year: row.get(1)?,
        state: row.get(2)?,
        constituency: row.get(3)?,
        candidate: row.get(4)?,
        party: row.get(5)?,
        votes: row.get(6)?,
        vote_share_percentage: row.get(7)?,
        position: row.get(8)?,
        margin: row.get(9)?,
        margin_percentage: row.get(10)?,
        gender: row.get(11)?,
        education: row.get(12)?,
        profession: row.get(13)?,
        party_type: row.get(14)?,
        is_winner: row.get::<_, i64>(15)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::{ElectionStore, TextColumn};
    use crate::dataset::NewElectionRecord;

    fn record(
        year: i32,
        constituency: &str,
        candidate: &str,
        party: &str,
        votes: i64,
        position: i64,
    ) -> NewElectionRecord {
        NewElectionRecord {
            year,
            state: "Goa".to_string(),
            constituency: constituency.to_string(),
            candidate: candidate.to_string(),
            party: party.to_string(),
            votes,
            vote_share_percentage: 0.0,
            position,
            margin: 0,
            margin_percentage: 0.0,
            gender: "FEMALE".to_string(),
            education: "Unknown".to_string(),
            profession: "Unknown".to_string(),
            party_type: "Unknown".to_string(),
            is_winner: position == 1,
        }
    }

    #[test]
    fn batch_insert_records_load_metadata() {
        let mut store = ElectionStore::open_in_memory().expect("failed to open store");
        assert!(store.last_load().expect("query failed").is_none());

        let inserted = store
            .insert_batch(
                &[
                    record(2019, "North Goa", "Shripad", "BJP", 244_844, 1),
                    record(2019, "North Goa", "Girish", "INC", 164_597, 2),
                ],
                "fixture.csv",
            )
            .expect("insert failed");
        assert_eq!(inserted, 2);
        assert_eq!(store.count().expect("count failed"), 2);

        let load = store.last_load().expect("query failed").expect("missing load");
        assert_eq!(load.source, "fixture.csv");
        assert_eq!(load.row_count, 2);
    }

    #[test]
    fn groups_and_sums_by_column() {
        let mut store = ElectionStore::open_in_memory().expect("failed to open store");
        store
            .insert_batch(
                &[
                    record(2019, "North Goa", "Shripad", "BJP", 100, 1),
                    record(2019, "North Goa", "Girish", "INC", 80, 2),
                    record(2019, "South Goa", "Francisco", "INC", 90, 1),
                    record(2014, "South Goa", "Narendra", "BJP", 70, 1),
                ],
                "fixture.csv",
            )
            .expect("insert failed");

        assert_eq!(store.distinct_years().expect("query failed"), vec![2014, 2019]);
        assert_eq!(
            store.sum_votes_by(2019, TextColumn::Party).expect("query failed"),
            vec![("BJP".to_string(), 100), ("INC".to_string(), 170)]
        );
        assert_eq!(
            store
                .count_winners_by(2019, TextColumn::Party)
                .expect("query failed"),
            vec![("BJP".to_string(), 1), ("INC".to_string(), 1)]
        );
        assert_eq!(store.total_votes(2019).expect("query failed"), 270);
        assert_eq!(store.total_votes(1900).expect("query failed"), 0);
        assert_eq!(
            store
                .count_distinct(2019, TextColumn::Constituency)
                .expect("query failed"),
            2
        );
        assert!(store.winner_anomalies().expect("query failed").is_empty());
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let mut store = ElectionStore::open_in_memory().expect("failed to open store");
        store
            .insert_batch(
                &[
                    record(2019, "Seat_1", "Alpha", "P", 1, 1),
                    record(2019, "SeatX1", "Beta", "P", 1, 1),
                ],
                "fixture.csv",
            )
            .expect("insert failed");

        let hits = store.search_year(2019, "seat_").expect("query failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].candidate, "Alpha");
        assert_eq!(store.search_year(2019, "%").expect("query failed").len(), 0);
        assert_eq!(store.search_year(2019, "").expect("query failed").len(), 2);
    }

    #[test]
    fn reports_constituencies_without_a_single_winner() {
        let mut store = ElectionStore::open_in_memory().expect("failed to open store");
        store
            .insert_batch(
                &[
                    record(2019, "Tie", "A", "P", 1, 1),
                    record(2019, "Tie", "B", "Q", 1, 1),
                    record(2019, "Empty", "C", "P", 1, 2),
                ],
                "fixture.csv",
            )
            .expect("insert failed");

        let anomalies = store.winner_anomalies().expect("query failed");
        assert_eq!(anomalies.len(), 2);
        assert_eq!(anomalies[0].constituency, "Empty");
        assert_eq!(anomalies[0].winners, 0);
        assert_eq!(anomalies[1].winners, 2);
    }

    #[test]
    fn search_folds_non_ascii_case() {
        let mut store = ElectionStore::open_in_memory().expect("failed to open store");
        store
            .insert_batch(
                &[
                    record(2019, "ÉLURU", "Alpha", "P", 1, 1),
                    record(2019, "Guntur", "Ömer", "P", 1, 1),
                ],
                "fixture.csv",
            )
            .expect("insert failed");

        let hits = store.search_year(2019, "éluru").expect("query failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].constituency, "ÉLURU");
        let hits = store.search_year(2019, "ÖMER").expect("query failed");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].candidate, "Ömer");
    }

    #[test]
    fn open_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("nested/election.db");
        let store = ElectionStore::open(&path).expect("failed to open store");
        assert_eq!(store.count().expect("count failed"), 0);
        assert!(path.exists());
    }
}
