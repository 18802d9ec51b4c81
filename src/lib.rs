//! # Murmr Engine Library
//!
//! The streak and statistics engine behind the murmr habit tracker: a user
//! logs discrete session and expense events, and the engine derives live
//! state from the mutable, retroactively-editable log.
//!
//! ## Features
//!
//! - **Event Store**: Durable JSON-snapshot storage for sessions, expenses,
//!   and the streak-start scalar, with self-healing on corruption
//! - **Streak Tracking**: Streak start stays consistent with the session log
//!   across inserts, retroactive edits, and deletes
//! - **Period Stats**: Calendar-aligned daily/weekly/monthly/yearly windows
//!   with current-vs-previous comparison and histogram chart data
//! - **Population Model**: Maps streak duration to a target bird count for
//!   the flocking visualization
//! - **Configuration**: TOML-based configuration system with sensible defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use murmr::{compute_stats, EventStore, Period};
//! use chrono::Local;
//!
//! let now = Local::now();
//! let mut store = EventStore::in_memory(now.timestamp_millis());
//!
//! store.append_session(now.timestamp_millis(), false).unwrap();
//! store
//!     .append_expense(now.timestamp_millis(), 6.50, 1.0, "pack", false)
//!     .unwrap();
//!
//! let report = compute_stats(&store, Period::Daily, 0, now).unwrap();
//! assert_eq!(report.sessions, 1);
//! ```

pub mod common;
/// Configuration management module for loading and saving settings
pub mod config;
pub mod display;
pub mod error;
pub mod models;
/// Calendar-aligned period boundary arithmetic
pub mod period;
pub mod population;
pub mod stats;
pub mod store;
pub mod streak;

pub use config::Config;
pub use display::format_duration;
pub use error::{MurmrError, Result};
pub use models::{Expense, Session};
pub use period::{Period, PeriodWindow};
pub use population::{target_population, FlockRenderer};
pub use stats::{compute_stats, ChartData, PeriodCursor, StatsReport};
pub use store::EventStore;
