pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS election_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    state TEXT NOT NULL,
    constituency TEXT NOT NULL,
    candidate TEXT NOT NULL,
    party TEXT NOT NULL,
    votes INTEGER NOT NULL,
    vote_share_percentage REAL NOT NULL,
    position INTEGER NOT NULL,
    margin INTEGER NOT NULL,
    margin_percentage REAL NOT NULL,
    gender TEXT NOT NULL,
    education TEXT NOT NULL,
    profession TEXT NOT NULL,
    party_type TEXT NOT NULL,
    is_winner INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_results_year ON election_results(year);
CREATE INDEX IF NOT EXISTS idx_results_state ON election_results(state);
CREATE INDEX IF NOT EXISTS idx_results_constituency ON election_results(constituency);
CREATE INDEX IF NOT EXISTS idx_results_candidate ON election_results(candidate);
CREATE INDEX IF NOT EXISTS idx_results_party ON election_results(party);
CREATE INDEX IF NOT EXISTS idx_results_year_winner
    ON election_results(year, is_winner);

CREATE TABLE IF NOT EXISTS dataset_loads (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source TEXT NOT NULL,
    row_count INTEGER NOT NULL,
    loaded_at TEXT NOT NULL
);
"#;
