//! Data model for the murmr engine.
//!
//! Records serialize with camelCase field names so snapshots stay
//! wire-compatible with exports produced by the original web app.

use serde::{Deserialize, Serialize};

use crate::common::Millis;

fn default_quantity() -> f64 {
    1.0
}

fn is_false(v: &bool) -> bool {
    !v
}

/// One logged occurrence of the tracked habit, resetting the streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Stable identifier (insertion-time milliseconds). Two retroactive
    /// entries landing on the same millisecond can collide; the store
    /// tolerates this by addressing the first match.
    pub id: Millis,

    /// Event instant in milliseconds since epoch; the only ordering key.
    pub timestamp: Millis,

    /// Streak duration (ms) reached immediately before this session was
    /// logged. Snapshot taken at insert time, never recomputed when earlier
    /// sessions are later edited or inserted.
    pub previous_streak: Millis,

    /// True when inserted via backdated entry rather than "log now".
    #[serde(default, skip_serializing_if = "is_false")]
    pub retroactive: bool,
}

/// One logged spend event, independent of the streak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Millis,

    pub timestamp: Millis,

    /// Non-negative currency amount. The store coerces invalid numeric
    /// input to 0.0 rather than failing.
    pub amount: f64,

    /// Positive count, defaults to 1.
    #[serde(default = "default_quantity")]
    pub quantity: f64,

    /// Free text, stored trimmed.
    #[serde(default)]
    pub note: String,

    #[serde(default, skip_serializing_if = "is_false")]
    pub retroactive: bool,
}

/// Durable snapshot of the whole store, written wholesale on every mutation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub sessions: Vec<Session>,
    pub expenses: Vec<Expense>,
    pub streak_start: Millis,
}

/// Export payload: the snapshot plus the instant it was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub sessions: Vec<Session>,
    pub expenses: Vec<Expense>,
    pub streak_start: Millis,
    pub exported_at: Millis,
}

/// Import blob: any subset of the snapshot fields. Absent fields leave the
/// corresponding stored state untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportBlob {
    pub sessions: Option<Vec<Session>>,
    pub expenses: Option<Vec<Expense>>,
    pub streak_start: Option<Millis>,
}
