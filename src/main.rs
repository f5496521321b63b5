use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use election_dashboard::analytics::views;
use election_dashboard::config::{Config, ConfigOverrides};
use election_dashboard::dataset::{load_csv, LoadOutcome};
use election_dashboard::output::csv::{rows_to_csv, years_to_csv};
use election_dashboard::output::render_json;
use election_dashboard::output::table::{
    render_gender_trend_table, render_load_outcome, render_margin_table, render_records_table,
    render_seat_share_table, render_summary_table, render_top_parties_table,
    render_turnout_table, render_years_table,
};
use election_dashboard::server::run_server;
use election_dashboard::store::ElectionStore;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "election-dashboard",
    about = "Election results store and analytics API"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// SQLite store location
    #[arg(long)]
    db: Option<String>,
    /// CSV dataset loaded into an empty store
    #[arg(long)]
    data: Option<String>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Load,
    Years,
    Elections {
        #[arg(long)]
        year: i32,
    },
    SeatShare {
        #[arg(long)]
        year: i32,
    },
    Turnout {
        #[arg(long)]
        year: i32,
    },
    GenderTrends,
    TopParties {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        top_n: Option<usize>,
    },
    Margin {
        #[arg(long)]
        year: i32,
        /// Keep only the N narrowest wins, closest first
        #[arg(long)]
        closest: Option<usize>,
    },
    Search {
        #[arg(long)]
        year: i32,
        #[arg(long, default_value = "")]
        query: String,
    },
    Summary {
        #[arg(long)]
        year: i32,
    },
    Config {
        /// Write the default config template
        #[arg(long)]
        init: bool,
        /// Replace an existing file when used with --init
        #[arg(long, requires = "init")]
        force: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        db_path: cli.db.clone(),
        csv_path: cli.data.clone(),
        host,
        port,
    });

    if matches!(cli.command, Commands::Config { .. }) {
        return handle_config_command(&cli.command, &config, &config_path);
    }

    let (store, outcome) = bootstrap_store(&config)?;

    match &cli.command {
        Commands::Serve { .. } => {
            drop(store);
            let bind = format!("{}:{}", config.server.host, config.server.port);
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            return run_server(config, addr).await;
        }
        Commands::Load => match cli.output {
            OutputFormat::Json => println!("{}", render_json(&outcome)?),
            _ => println!("{}", render_load_outcome(&outcome)),
        },
        Commands::Years => {
            let years = views::years(&store)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_years_table(&years)),
                OutputFormat::Json => println!("{}", render_json(&years)?),
                OutputFormat::Csv => print!("{}", years_to_csv(&years)?),
            }
        }
        Commands::Elections { year } => {
            let records = views::elections_by_year(&store, *year)?;
            print_rows(&records, cli.output, render_records_table)?;
        }
        Commands::SeatShare { year } => {
            let rows = views::seat_share(&store, *year)?;
            print_rows(&rows, cli.output, render_seat_share_table)?;
        }
        Commands::Turnout { year } => {
            let rows = views::state_turnout(&store, *year)?;
            print_rows(&rows, cli.output, render_turnout_table)?;
        }
        Commands::GenderTrends => {
            let rows = views::gender_trends(&store)?;
            print_rows(&rows, cli.output, render_gender_trend_table)?;
        }
        Commands::TopParties { year, top_n } => {
            let top_n = top_n.unwrap_or(config.analysis.default_top_n);
            let rows = views::top_parties(&store, *year, top_n)?;
            print_rows(&rows, cli.output, render_top_parties_table)?;
        }
        Commands::Margin { year, closest } => {
            let rows = views::margin(&store, *year, *closest)?;
            print_rows(&rows, cli.output, render_margin_table)?;
        }
        Commands::Search { year, query } => {
            let records = views::search(&store, *year, query)?;
            print_rows(&records, cli.output, render_records_table)?;
        }
        Commands::Summary { year } => {
            let summary = views::year_summary(&store, *year)?;
            match cli.output {
                OutputFormat::Table => println!("{}", render_summary_table(&summary)),
                OutputFormat::Json => println!("{}", render_json(&summary)?),
                OutputFormat::Csv => print!("{}", rows_to_csv(std::slice::from_ref(&summary))?),
            }
        }
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Opens the configured store and populates it from the dataset if it is
/// empty. Any failure here is fatal: nothing is served from a partial store.
fn bootstrap_store(config: &Config) -> Result<(ElectionStore, LoadOutcome)> {
    let db_path = config.resolved_db_path();
    let mut store = ElectionStore::open(&db_path)?;
    let csv_path = config.resolved_csv_path();
    let outcome = load_csv(&mut store, &csv_path)
        .with_context(|| format!("failed loading dataset into {}", db_path.display()))?;
    info!(db = %db_path.display(), ?outcome, "store ready");
    Ok((store, outcome))
}

fn print_rows<T: Serialize>(
    rows: &[T],
    format: OutputFormat,
    render_table: fn(&[T]) -> String,
) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_table(rows)),
        OutputFormat::Json => println!("{}", render_json(rows)?),
        OutputFormat::Csv => print!("{}", rows_to_csv(rows)?),
    }
    Ok(())
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, force, show } = command else {
        return Ok(());
    };
    if !*init {
        println!("{}", render_json(config)?);
        return Ok(());
    }

    Config::write_template(config_path, *force)?;
    info!(path = %config_path.display(), overwrite = *force, "wrote config template");
    if *show {
        println!("{}", render_json(config)?);
    }
    Ok(())
}
