//! Read-only analytical views over the election store.
//!
//! Every view takes the store handle explicitly and returns rows in a fixed
//! order so repeated calls against the same snapshot are identical.

use anyhow::Result;
use tracing::debug;

use crate::analytics::{
    round_to_hundredths, GenderTrend, PartyVoteShare, SeatShare, StateTurnout, WinnerMargin,
    YearSummary,
};
use crate::dataset::ElectionRecord;
use crate::store::records::TextColumn;
use crate::store::ElectionStore;

pub fn years(store: &ElectionStore) -> Result<Vec<i32>> {
    store.distinct_years()
}

pub fn elections_by_year(store: &ElectionStore, year: i32) -> Result<Vec<ElectionRecord>> {
    store.records_for_year(year)
}

/// Constituencies won per party, most seats first.
pub fn seat_share(store: &ElectionStore, year: i32) -> Result<Vec<SeatShare>> {
    let mut rows = store
        .count_winners_by(year, TextColumn::Party)?
        .into_iter()
        .map(|(party, seats)| SeatShare { party, seats })
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| b.seats.cmp(&a.seats).then_with(|| a.party.cmp(&b.party)));
    Ok(rows)
}

pub fn state_turnout(store: &ElectionStore, year: i32) -> Result<Vec<StateTurnout>> {
    Ok(store
        .sum_votes_by(year, TextColumn::State)?
        .into_iter()
        .map(|(state, votes)| StateTurnout { state, votes })
        .collect())
}

pub fn gender_trends(store: &ElectionStore) -> Result<Vec<GenderTrend>> {
    Ok(store
        .count_by_year_and_gender()?
        .into_iter()
        .map(|(year, gender, count)| GenderTrend {
            year,
            gender,
            count,
        })
        .collect())
}

/// Parties ranked by share of the year's total votes, truncated to `top_n`.
///
/// Ranking uses the unrounded share; ties fall back to party name. A year
/// with no votes at all yields an empty list.
pub fn top_parties(store: &ElectionStore, year: i32, top_n: usize) -> Result<Vec<PartyVoteShare>> {
    let total = store.total_votes(year)?;
    if total <= 0 {
        debug!(year, "no votes recorded for year, top parties is empty");
        return Ok(Vec::new());
    }

    let mut shares = store
        .sum_votes_by(year, TextColumn::Party)?
        .into_iter()
        .map(|(party, votes)| (party, votes as f64 / total as f64 * 100.0))
        .collect::<Vec<_>>();
    shares.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    shares.truncate(top_n);

    Ok(shares
        .into_iter()
        .map(|(party, share)| PartyVoteShare {
            party,
            vote_share_percentage: round_to_hundredths(share),
        })
        .collect())
}

/// Winners for `year` in load order. With `closest`, only the `closest`
/// narrowest wins are kept, smallest margin first and ties by constituency.
pub fn margin(
    store: &ElectionStore,
    year: i32,
    closest: Option<usize>,
) -> Result<Vec<WinnerMargin>> {
    let mut rows = store
        .winners_for_year(year)?
        .into_iter()
        .map(|r| WinnerMargin {
            constituency: r.constituency,
            state: r.state,
            candidate: r.candidate,
            party: r.party,
            votes: r.votes,
            margin: r.margin,
        })
        .collect::<Vec<_>>();
    if let Some(limit) = closest {
        rows.sort_by(|a, b| {
            a.margin
                .cmp(&b.margin)
                .then_with(|| a.constituency.cmp(&b.constituency))
        });
        rows.truncate(limit);
    }
    Ok(rows)
}

/// Records for `year` whose candidate or constituency contains `query`,
/// ignoring case. An empty query matches the whole year.
pub fn search(store: &ElectionStore, year: i32, query: &str) -> Result<Vec<ElectionRecord>> {
    store.search_year(year, query)
}

pub fn year_summary(store: &ElectionStore, year: i32) -> Result<YearSummary> {
    Ok(YearSummary {
        year,
        constituencies: store.count_distinct(year, TextColumn::Constituency)?,
        candidates: store.count_rows_for_year(year)?,
        parties: store.count_distinct(year, TextColumn::Party)?,
        states: store.count_distinct(year, TextColumn::State)?,
    })
}
