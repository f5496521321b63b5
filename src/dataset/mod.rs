pub mod coerce;
pub mod loader;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use loader::{load_csv, load_records, read_csv, read_csv_rows, LoadOutcome, REQUIRED_COLUMNS};

/// One candidate's entry in one constituency for one election year, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub id: i64,
    pub year: i32,
    pub state: String,
    pub constituency: String,
    pub candidate: String,
    pub party: String,
    pub votes: i64,
    pub vote_share_percentage: f64,
    pub position: i64,
    pub margin: i64,
    pub margin_percentage: f64,
    pub gender: String,
    pub education: String,
    pub profession: String,
    pub party_type: String,
    pub is_winner: bool,
}

/// A coerced record that has not been assigned a row id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewElectionRecord {
    pub year: i32,
    pub state: String,
    pub constituency: String,
    pub candidate: String,
    pub party: String,
    pub votes: i64,
    pub vote_share_percentage: f64,
    pub position: i64,
    pub margin: i64,
    pub margin_percentage: f64,
    pub gender: String,
    pub education: String,
    pub profession: String,
    pub party_type: String,
    pub is_winner: bool,
}

/// A source row with every cell still as text. Blank cells arrive as `None`.
#[derive(Debug, Clone, Default)]
pub struct RawElectionRow {
    /// Line in the source file, when the row came from one.
    pub line: Option<u64>,
    pub year: Option<String>,
    pub state: Option<String>,
    pub constituency: Option<String>,
    pub candidate: Option<String>,
    pub party: Option<String>,
    pub votes: Option<String>,
    pub vote_share_percentage: Option<String>,
    pub position: Option<String>,
    pub margin: Option<String>,
    pub margin_percentage: Option<String>,
    pub gender: Option<String>,
    pub education: Option<String>,
    pub profession: Option<String>,
    pub party_type: Option<String>,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("source file is missing required column: {0}")]
    MissingColumn(String),
    #[error("row {row}: year {value:?} is not an integer")]
    InvalidYear { row: String, value: Option<String> },
}

impl NewElectionRecord {
    /// Coerces a raw row. Only `year` is strict; every other field falls back
    /// to `"Unknown"`, `0` or `0.0`.
    pub fn from_raw(raw: &RawElectionRow) -> Result<Self, DatasetError> {
        let year =
            coerce::strict_year(raw.year.as_deref()).ok_or_else(|| DatasetError::InvalidYear {
                row: raw
                    .line
                    .map(|line| format!("line {line}"))
                    .unwrap_or_else(|| "<unnumbered>".to_string()),
                value: raw.year.clone(),
            })?;
        let position = coerce::integer_or_zero(raw.position.as_deref());

        Ok(Self {
            year,
            state: coerce::categorical(raw.state.as_deref()),
            constituency: coerce::categorical(raw.constituency.as_deref()),
            candidate: coerce::categorical(raw.candidate.as_deref()),
            party: coerce::categorical(raw.party.as_deref()),
            votes: coerce::integer_or_zero(raw.votes.as_deref()).max(0),
            vote_share_percentage: coerce::float_or_zero(raw.vote_share_percentage.as_deref()),
            position,
            margin: coerce::integer_or_zero(raw.margin.as_deref()),
            margin_percentage: coerce::float_or_zero(raw.margin_percentage.as_deref()),
            gender: coerce::categorical(raw.gender.as_deref()),
            education: coerce::categorical(raw.education.as_deref()),
            profession: coerce::categorical(raw.profession.as_deref()),
            party_type: coerce::categorical(raw.party_type.as_deref()),
            is_winner: position == 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetError, NewElectionRecord, RawElectionRow};

    fn raw(year: &str, position: &str, votes: &str) -> RawElectionRow {
        RawElectionRow {
            line: Some(2),
            year: Some(year.to_string()),
            state: Some("  Kerala ".to_string()),
            constituency: Some("Wayanad".to_string()),
            candidate: Some("A. Candidate".to_string()),
            party: Some("INC".to_string()),
            votes: Some(votes.to_string()),
            position: Some(position.to_string()),
            ..RawElectionRow::default()
        }
    }

    #[test]
    fn derives_winner_from_position() {
        let winner = NewElectionRecord::from_raw(&raw("2019", "1", "706367")).expect("valid row");
        assert!(winner.is_winner);
        assert_eq!(winner.state, "Kerala");
        assert_eq!(winner.votes, 706_367);

        let runner_up = NewElectionRecord::from_raw(&raw("2019", "2", "274597")).expect("valid row");
        assert!(!runner_up.is_winner);
    }

    #[test]
    fn fills_missing_fields_with_defaults() {
        let record = NewElectionRecord::from_raw(&raw("2014", "n/a", "-")).expect("valid row");
        assert_eq!(record.position, 0);
        assert!(!record.is_winner);
        assert_eq!(record.votes, 0);
        assert_eq!(record.gender, "Unknown");
        assert_eq!(record.party_type, "Unknown");
        assert_eq!(record.vote_share_percentage, 0.0);
    }

    #[test]
    fn rejects_unparseable_year() {
        let err = NewElectionRecord::from_raw(&raw("nineteen", "1", "10")).unwrap_err();
        match err {
            DatasetError::InvalidYear { row, value } => {
                assert_eq!(row, "line 2");
                assert_eq!(value.as_deref(), Some("nineteen"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
