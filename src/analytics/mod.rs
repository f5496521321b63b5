pub mod views;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatShare {
    pub party: String,
    pub seats: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTurnout {
    pub state: String,
    pub votes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderTrend {
    pub year: i32,
    pub gender: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyVoteShare {
    pub party: String,
    /// Percentage of the year's total votes, rounded to two decimals.
    pub vote_share_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerMargin {
    pub constituency: String,
    pub state: String,
    pub candidate: String,
    pub party: String,
    pub votes: i64,
    pub margin: i64,
}

/// Headline counts for one election year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub constituencies: i64,
    pub candidates: i64,
    pub parties: i64,
    pub states: i64,
}

/// Rounds to two decimals from the exact binary value, ties to even, so
/// `3.125` becomes `3.12`.
pub fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::round_to_hundredths;

    #[test]
    fn rounds_exact_ties_to_even() {
        assert_eq!(round_to_hundredths(3.125), 3.12);
        assert_eq!(round_to_hundredths(96.875), 96.88);
        assert_eq!(round_to_hundredths(100.0 / 180.0 * 100.0), 55.56);
    }

    #[test]
    fn rounds_inexact_values_to_nearest() {
        // 2.675 is stored just below the midpoint.
        assert_eq!(round_to_hundredths(2.675), 2.67);
        assert_eq!(round_to_hundredths(0.004), 0.0);
    }
}
