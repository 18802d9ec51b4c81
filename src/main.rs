//! # Murmr
//!
//! Command-line front end for the murmr streak and statistics engine.
//!
//! ## Usage
//!
//! ```bash
//! murmr log                # log a session now
//! murmr log --at "2025-06-14 21:30"
//! murmr expense 6.50 --note "pack"
//! murmr status
//! murmr stats --period weekly --offset -1
//! ```

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use murmr::common::{ms_to_local, Millis};
use murmr::config;
use murmr::display::{format_count_change, format_duration, format_money, format_money_change};
use murmr::error::{MurmrError, Result};
use murmr::population::target_population;
use murmr::stats::{compute_stats, StatsReport};
use murmr::store::EventStore;
use murmr::Period;

/// Murmr - streak and statistics engine for habit tracking
#[derive(Parser)]
#[command(name = "murmr")]
#[command(version)]
#[command(about = "Track habit sessions and expenses, watch the flock grow", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a session (resets the streak)
    Log {
        /// Backdate the entry, e.g. "2025-06-14 21:30"
        #[arg(long)]
        at: Option<String>,
    },

    /// Log an expense
    Expense {
        /// Amount spent (must be positive)
        amount: f64,

        /// Quantity purchased
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        /// Free-text note
        #[arg(long, default_value = "")]
        note: String,

        /// Backdate the entry, e.g. "2025-06-14 21:30"
        #[arg(long)]
        at: Option<String>,
    },

    /// Show the current streak and flock size
    Status,

    /// Show aggregated statistics for a period
    Stats {
        /// Period kind: daily, weekly, monthly, or yearly
        #[arg(long, default_value = "daily")]
        period: String,

        /// Whole periods back from the current one (0 or negative)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i32,

        /// Emit the raw JSON payload instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// List logged sessions with their ids
    Sessions,

    /// List logged expenses with their ids
    Expenses,

    /// Move a session to a new timestamp
    EditSession {
        /// Session id (see `murmr sessions`)
        id: Millis,

        /// New timestamp, e.g. "2025-06-14 21:30"
        #[arg(long)]
        at: String,
    },

    /// Delete a session
    DeleteSession {
        /// Session id (see `murmr sessions`)
        id: Millis,
    },

    /// Rewrite an expense
    EditExpense {
        /// Expense id (see `murmr expenses`)
        id: Millis,

        /// New timestamp, e.g. "2025-06-14 21:30"
        #[arg(long)]
        at: String,

        /// New amount
        #[arg(long)]
        amount: f64,

        /// New quantity
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,

        /// New note
        #[arg(long, default_value = "")]
        note: String,
    },

    /// Delete an expense
    DeleteExpense {
        /// Expense id (see `murmr expenses`)
        id: Millis,
    },

    /// Print a full snapshot export to stdout
    Export,

    /// Import a snapshot export (any subset of fields)
    Import {
        /// Path to the exported JSON file
        file: PathBuf,
    },

    /// Delete all logged data and restart the streak
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Generate example config file
    GenerateConfig,
}

/// Parses a user-supplied local datetime. The store never sees an invalid or
/// future timestamp; rejection happens here, at the caller layer.
fn parse_entry_time(input: &str, now: DateTime<Local>) -> Result<Millis> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

    let naive = FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .ok_or_else(|| {
            MurmrError::timestamp(format!(
                "cannot parse '{}' (expected e.g. \"2025-06-14 21:30\")",
                input
            ))
        })?;

    let instant = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| MurmrError::timestamp(format!("'{}' is not a valid local time", input)))?;

    if instant > now {
        return Err(MurmrError::timestamp(format!(
            "'{}' is in the future",
            input
        )));
    }

    Ok(instant.timestamp_millis())
}

fn open_store(now: Millis) -> Result<EventStore> {
    let configured = &config::get_config().data.path;
    let path = if configured.is_empty() {
        EventStore::default_path()
    } else {
        PathBuf::from(configured)
    };
    EventStore::open(path, now)
}

fn main() -> Result<()> {
    // Initialize logging with WARN level by default (can be overridden with RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let now = Local::now();
    let now_ms = now.timestamp_millis();

    match cli.command {
        Commands::Log { at } => {
            let mut store = open_store(now_ms)?;
            let (timestamp, retroactive) = match at {
                Some(input) => (parse_entry_time(&input, now)?, true),
                None => (now_ms, false),
            };
            let session = store.append_session(timestamp, retroactive)?;
            println!(
                "Logged session {} (streak before: {})",
                session.id,
                format_duration(session.previous_streak)
            );
            println!(
                "Flock resets to {} birds",
                target_population(&store, now_ms)
            );
        }

        Commands::Expense {
            amount,
            quantity,
            note,
            at,
        } => {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(MurmrError::other(format!(
                    "amount must be a positive number, got {}",
                    amount
                )));
            }
            let mut store = open_store(now_ms)?;
            let (timestamp, retroactive) = match at {
                Some(input) => (parse_entry_time(&input, now)?, true),
                None => (now_ms, false),
            };
            let expense = store.append_expense(timestamp, amount, quantity, &note, retroactive)?;
            println!("Logged expense {}: {}", expense.id, format_money(expense.amount));
        }

        Commands::Status => {
            let store = open_store(now_ms)?;
            println!("Streak: {}", format_duration(store.current_duration(now_ms)));
            println!("Longest: {}", format_duration(store.longest_streak(now_ms)));
            println!("Flock: {} birds", target_population(&store, now_ms));
        }

        Commands::Stats {
            period,
            offset,
            json,
        } => {
            let period: Period = period.parse()?;
            let store = open_store(now_ms)?;
            let report = compute_stats(&store, period, offset, now)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_report(&report);
            }
        }

        Commands::Sessions => {
            let store = open_store(now_ms)?;
            if store.sessions().is_empty() {
                println!("No sessions logged yet");
            }
            for session in store.sessions() {
                let when = ms_to_local(session.timestamp)?;
                println!(
                    "{}  {}{}",
                    session.id,
                    when.format("%Y-%m-%d %H:%M"),
                    if session.retroactive { "  (retroactive)" } else { "" }
                );
            }
        }

        Commands::Expenses => {
            let store = open_store(now_ms)?;
            if store.expenses().is_empty() {
                println!("No expenses logged yet");
            }
            for expense in store.expenses() {
                let when = ms_to_local(expense.timestamp)?;
                println!(
                    "{}  {}  {}  x{}  {}",
                    expense.id,
                    when.format("%Y-%m-%d %H:%M"),
                    format_money(expense.amount),
                    expense.quantity,
                    expense.note
                );
            }
        }

        Commands::EditSession { id, at } => {
            let mut store = open_store(now_ms)?;
            let timestamp = parse_entry_time(&at, now)?;
            if store.update_session(id, timestamp)? {
                println!("Session {} moved", id);
            } else {
                println!("No session with id {} (nothing changed)", id);
            }
        }

        Commands::DeleteSession { id } => {
            let mut store = open_store(now_ms)?;
            if store.delete_session(id)? {
                println!("Session {} deleted", id);
            } else {
                println!("No session with id {} (nothing changed)", id);
            }
        }

        Commands::EditExpense {
            id,
            at,
            amount,
            quantity,
            note,
        } => {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(MurmrError::other(format!(
                    "amount must be a positive number, got {}",
                    amount
                )));
            }
            let mut store = open_store(now_ms)?;
            let timestamp = parse_entry_time(&at, now)?;
            if store.update_expense(id, timestamp, amount, quantity, &note)? {
                println!("Expense {} updated", id);
            } else {
                println!("No expense with id {} (nothing changed)", id);
            }
        }

        Commands::DeleteExpense { id } => {
            let mut store = open_store(now_ms)?;
            if store.delete_expense(id)? {
                println!("Expense {} deleted", id);
            } else {
                println!("No expense with id {} (nothing changed)", id);
            }
        }

        Commands::Export => {
            let store = open_store(now_ms)?;
            println!("{}", store.export_all(now_ms)?);
        }

        Commands::Import { file } => {
            let blob = std::fs::read_to_string(&file)?;
            let mut store = open_store(now_ms)?;
            store.import_all(&blob)?;
            println!(
                "Imported {} sessions, {} expenses",
                store.sessions().len(),
                store.expenses().len()
            );
        }

        Commands::Clear { yes } => {
            if !yes {
                println!("This deletes all logged data. Re-run with --yes to confirm.");
                return Ok(());
            }
            let mut store = open_store(now_ms)?;
            store.clear(now_ms)?;
            println!("All data cleared, streak restarted");
        }

        Commands::GenerateConfig => {
            let config_path = config::Config::default_config_path()?;
            println!("Generating example config file at: {:?}", config_path);

            if let Some(parent) = config_path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            std::fs::write(&config_path, config::Config::example_toml())?;
            println!("Config file generated successfully!");
            println!("Edit {} to customize settings", config_path.display());
        }
    }

    Ok(())
}

fn print_report(report: &StatsReport) {
    println!("{} ({})", report.period_label, report.period);
    println!(
        "Sessions: {}  ({})",
        report.sessions,
        format_count_change(report.session_change)
    );
    println!(
        "Spending: {}  ({})",
        format_money(report.spending),
        format_money_change(report.spending_change)
    );
    println!(
        "{}: {}  ({})",
        report.spending_card_label,
        format_money(report.spending_card_amount),
        format_money_change(report.spending_card_change)
    );
    println!("Longest streak: {}", format_duration(report.longest_streak));
    match report.avg_time_between {
        Some(avg) => println!("Avg between sessions: {}", format_duration(avg as Millis)),
        None => println!("Avg between sessions: --"),
    }

    let chart = &report.chart_data;
    let max = chart.session_counts.iter().copied().max().unwrap_or(0);
    if max == 0 {
        println!("No sessions in this period");
        return;
    }
    for (i, label) in chart.labels.iter().enumerate() {
        let count = chart.session_counts[i];
        if count > 0 {
            println!("{:>4}  {} {}", label, "#".repeat(count as usize), count);
        }
    }
}
