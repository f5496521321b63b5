use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::analytics::{
    GenderTrend, PartyVoteShare, SeatShare, StateTurnout, WinnerMargin, YearSummary,
};
use crate::dataset::{ElectionRecord, LoadOutcome};

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn render_years_table(years: &[i32]) -> String {
    let mut table = new_table(vec!["Year"]);
    for year in years {
        table.add_row(vec![year.to_string()]);
    }
    table.to_string()
}

pub fn render_records_table(records: &[ElectionRecord]) -> String {
    let mut table = new_table(vec![
        "Year",
        "State",
        "Constituency",
        "Candidate",
        "Party",
        "Votes",
        "Share %",
        "Pos",
        "Margin",
        "Winner",
    ]);
    for r in records {
        let winner = if r.is_winner {
            Cell::new("YES").fg(Color::Green)
        } else {
            Cell::new("-")
        };
        table.add_row(Row::from(vec![
            Cell::new(r.year),
            Cell::new(&r.state),
            Cell::new(&r.constituency),
            Cell::new(&r.candidate),
            Cell::new(&r.party),
            Cell::new(r.votes),
            Cell::new(format!("{:.2}", r.vote_share_percentage)),
            Cell::new(r.position),
            Cell::new(r.margin),
            winner,
        ]));
    }
    table.to_string()
}

pub fn render_seat_share_table(rows: &[SeatShare]) -> String {
    let mut table = new_table(vec!["Party", "Seats"]);
    for r in rows {
        table.add_row(vec![r.party.clone(), r.seats.to_string()]);
    }
    table.to_string()
}

pub fn render_turnout_table(rows: &[StateTurnout]) -> String {
    let mut table = new_table(vec!["State", "Votes"]);
    for r in rows {
        table.add_row(vec![r.state.clone(), r.votes.to_string()]);
    }
    table.to_string()
}

pub fn render_gender_trend_table(rows: &[GenderTrend]) -> String {
    let mut table = new_table(vec!["Year", "Gender", "Candidates"]);
    for r in rows {
        table.add_row(vec![r.year.to_string(), r.gender.clone(), r.count.to_string()]);
    }
    table.to_string()
}

pub fn render_top_parties_table(rows: &[PartyVoteShare]) -> String {
    let mut table = new_table(vec!["Rank", "Party", "Vote Share %"]);
    for (idx, r) in rows.iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            r.party.clone(),
            format!("{:.2}", r.vote_share_percentage),
        ]);
    }
    table.to_string()
}

pub fn render_margin_table(rows: &[WinnerMargin]) -> String {
    let mut table = new_table(vec![
        "Constituency",
        "State",
        "Winner",
        "Party",
        "Votes",
        "Margin",
    ]);
    for r in rows {
        table.add_row(vec![
            r.constituency.clone(),
            r.state.clone(),
            r.candidate.clone(),
            r.party.clone(),
            r.votes.to_string(),
            r.margin.to_string(),
        ]);
    }
    table.to_string()
}

pub fn render_summary_table(summary: &YearSummary) -> String {
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec!["Year".to_string(), summary.year.to_string()]);
    table.add_row(vec![
        "Constituencies".to_string(),
        summary.constituencies.to_string(),
    ]);
    table.add_row(vec!["Candidates".to_string(), summary.candidates.to_string()]);
    table.add_row(vec!["Parties".to_string(), summary.parties.to_string()]);
    table.add_row(vec!["States".to_string(), summary.states.to_string()]);
    table.to_string()
}

pub fn render_load_outcome(outcome: &LoadOutcome) -> String {
    match outcome {
        LoadOutcome::AlreadyPopulated { existing } => {
            format!("Store already holds {existing} records; nothing loaded.")
        }
        LoadOutcome::Loaded { inserted } => format!("Loaded {inserted} records."),
    }
}
