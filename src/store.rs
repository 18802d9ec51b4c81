//! Event store: sole owner of durable state.
//!
//! The store holds both event collections plus the streak-start scalar and is
//! the only writer of the on-disk snapshot. Every mutation leaves the
//! collections sorted ascending by timestamp, recomputes the streak start for
//! session mutations, and rewrites the whole snapshot (no incremental
//! persistence). Reads always see the in-memory collections directly, so a
//! read immediately following a write observes that write.
//!
//! Records are addressed by their stable `id` for edit and delete. An unknown
//! id is a silent no-op: a deliberate tolerance for a display list that has
//! gone stale against the store.

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::common::{get_data_dir, Millis};
use crate::error::Result;
use crate::models::{Expense, ExportData, ImportBlob, Session, Snapshot};
use crate::streak;

/// Durable, mutation-capable storage for sessions, expenses, and the
/// streak-start scalar.
#[derive(Debug)]
pub struct EventStore {
    sessions: Vec<Session>,
    expenses: Vec<Expense>,
    streak_start: Millis,
    /// Snapshot location; `None` keeps the store purely in memory (tests).
    path: Option<PathBuf>,
}

impl EventStore {
    /// Default snapshot location under the XDG data directory.
    pub fn default_path() -> PathBuf {
        get_data_dir().join("events.json")
    }

    /// Creates a store with no backing file. First launch seeds the streak
    /// start at `now`; it persists until the first session ever exists.
    pub fn in_memory(now: Millis) -> Self {
        EventStore {
            sessions: Vec::new(),
            expenses: Vec::new(),
            streak_start: now,
            path: None,
        }
    }

    /// Opens (or creates) the snapshot at `path`.
    ///
    /// A missing file seeds a fresh store. An unparseable file is backed up
    /// to `.backup` and treated as empty; the store self-heals by re-seeding
    /// on the next write. Neither case is an error.
    pub fn open(path: impl AsRef<Path>, now: Millis) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let snapshot = if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => match serde_json::from_str::<Snapshot>(&contents) {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!("failed to parse snapshot {}: {}", path.display(), e);
                        let backup = path.with_extension("backup");
                        if fs::copy(&path, &backup).is_ok() {
                            warn!("corrupted snapshot backed up to {}", backup.display());
                        }
                        None
                    }
                },
                Err(e) => {
                    warn!("failed to read snapshot {}: {}", path.display(), e);
                    None
                }
            }
        } else {
            None
        };

        let mut store = match snapshot {
            Some(snapshot) => EventStore {
                sessions: snapshot.sessions,
                expenses: snapshot.expenses,
                // A snapshot without a seed (streakStart missing or zero)
                // behaves like a first launch
                streak_start: if snapshot.streak_start > 0 {
                    snapshot.streak_start
                } else {
                    now
                },
                path: Some(path),
            },
            None => {
                let mut fresh = EventStore::in_memory(now);
                fresh.path = Some(path);
                fresh
            }
        };

        store.sort_collections();
        store.persist()?;
        Ok(store)
    }

    // ---- queries ----

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn streak_start(&self) -> Millis {
        self.streak_start
    }

    /// True while no session has ever been logged.
    pub fn is_first_time(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Elapsed streak duration at `now`.
    pub fn current_duration(&self, now: Millis) -> Millis {
        streak::current_duration(self.streak_start, now)
    }

    /// Longest streak ever, counting the currently elapsing one.
    pub fn longest_streak(&self, now: Millis) -> Millis {
        streak::longest_streak(&self.sessions, self.current_duration(now))
    }

    /// Mean gap between consecutive sessions over the whole log.
    pub fn average_gap(&self) -> Option<f64> {
        streak::average_gap(&self.sessions)
    }

    /// Sessions with `start <= timestamp <= end`. Both bounds inclusive; an
    /// event landing exactly on a period boundary shows up in both adjacent
    /// windows.
    pub fn sessions_in_range(&self, start: Millis, end: Millis) -> Vec<&Session> {
        self.sessions
            .iter()
            .filter(|s| s.timestamp >= start && s.timestamp <= end)
            .collect()
    }

    /// Expenses with `start <= timestamp <= end`, bounds inclusive.
    pub fn expenses_in_range(&self, start: Millis, end: Millis) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| e.timestamp >= start && e.timestamp <= end)
            .collect()
    }

    /// Total spending within the inclusive range.
    pub fn spending_in_range(&self, start: Millis, end: Millis) -> f64 {
        self.expenses_in_range(start, end)
            .iter()
            .map(|e| e.amount)
            .sum()
    }

    // ---- mutations ----

    /// Inserts a session at `timestamp`, snapshotting the streak it breaks.
    pub fn append_session(&mut self, timestamp: Millis, retroactive: bool) -> Result<Session> {
        let session = Session {
            id: timestamp,
            timestamp,
            previous_streak: (timestamp - self.streak_start).max(0),
            retroactive,
        };

        self.sessions.push(session.clone());
        self.sort_collections();
        self.recompute_streak_start();
        self.persist()?;
        Ok(session)
    }

    /// Inserts an expense. Invalid numeric input is coerced rather than
    /// rejected: callers validate, the store stays total.
    pub fn append_expense(
        &mut self,
        timestamp: Millis,
        amount: f64,
        quantity: f64,
        note: &str,
        retroactive: bool,
    ) -> Result<Expense> {
        let expense = Expense {
            id: timestamp,
            timestamp,
            amount: if amount.is_finite() && amount >= 0.0 {
                amount
            } else {
                0.0
            },
            quantity: if quantity.is_finite() && quantity > 0.0 {
                quantity
            } else {
                1.0
            },
            note: note.trim().to_string(),
            retroactive,
        };

        self.expenses.push(expense.clone());
        self.sort_collections();
        self.persist()?;
        Ok(expense)
    }

    /// Moves the session with `id` to `new_timestamp`. The recorded
    /// `previous_streak` snapshot is deliberately left as-is. Returns false
    /// (a no-op) when no such session exists.
    pub fn update_session(&mut self, id: Millis, new_timestamp: Millis) -> Result<bool> {
        let Some(session) = self.sessions.iter_mut().find(|s| s.id == id) else {
            debug!("update_session: no session with id {}", id);
            return Ok(false);
        };
        session.timestamp = new_timestamp;

        self.sort_collections();
        self.recompute_streak_start();
        self.persist()?;
        Ok(true)
    }

    /// Rewrites the expense with `id`. Unknown ids are a no-op.
    pub fn update_expense(
        &mut self,
        id: Millis,
        timestamp: Millis,
        amount: f64,
        quantity: f64,
        note: &str,
    ) -> Result<bool> {
        let Some(expense) = self.expenses.iter_mut().find(|e| e.id == id) else {
            debug!("update_expense: no expense with id {}", id);
            return Ok(false);
        };
        expense.timestamp = timestamp;
        expense.amount = if amount.is_finite() && amount >= 0.0 {
            amount
        } else {
            0.0
        };
        expense.quantity = if quantity.is_finite() && quantity > 0.0 {
            quantity
        } else {
            1.0
        };
        expense.note = note.trim().to_string();

        self.sort_collections();
        self.persist()?;
        Ok(true)
    }

    /// Removes the session with `id`, recomputing the streak start. Unknown
    /// ids are a no-op.
    pub fn delete_session(&mut self, id: Millis) -> Result<bool> {
        let before = self.sessions.len();
        self.sessions.retain(|s| s.id != id);
        if self.sessions.len() == before {
            debug!("delete_session: no session with id {}", id);
            return Ok(false);
        }

        self.recompute_streak_start();
        self.persist()?;
        Ok(true)
    }

    /// Removes the expense with `id`. Unknown ids are a no-op.
    pub fn delete_expense(&mut self, id: Millis) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            debug!("delete_expense: no expense with id {}", id);
            return Ok(false);
        }

        self.persist()?;
        Ok(true)
    }

    /// Wipes both collections and re-seeds the streak start at `now`.
    pub fn clear(&mut self, now: Millis) -> Result<()> {
        self.sessions.clear();
        self.expenses.clear();
        self.streak_start = now;
        self.persist()
    }

    // ---- snapshot round-trip ----

    /// Full snapshot serialized as JSON, stamped with `exported_at`.
    pub fn export_all(&self, now: Millis) -> Result<String> {
        let export = ExportData {
            sessions: self.sessions.clone(),
            expenses: self.expenses.clone(),
            streak_start: self.streak_start,
            exported_at: now,
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Applies a snapshot blob. Best-effort per field: any present field
    /// overwrites wholesale, absent fields leave stored state untouched. A
    /// parse error aborts the entire import with nothing applied.
    pub fn import_all(&mut self, blob: &str) -> Result<()> {
        let blob: ImportBlob = serde_json::from_str(blob)?;

        let sessions_replaced = blob.sessions.is_some();
        if let Some(sessions) = blob.sessions {
            self.sessions = sessions;
        }
        if let Some(expenses) = blob.expenses {
            self.expenses = expenses;
        }
        self.sort_collections();

        match blob.streak_start {
            Some(start) => self.streak_start = start,
            // Imported sessions without a streak seed: derive it so the
            // streak invariant holds after the import
            None if sessions_replaced => self.recompute_streak_start(),
            None => {}
        }

        self.persist()
    }

    // ---- internals ----

    fn sort_collections(&mut self) {
        // Stable sorts: equal timestamps keep insertion order
        self.sessions.sort_by_key(|s| s.timestamp);
        self.expenses.sort_by_key(|e| e.timestamp);
    }

    /// Restores the invariant `streak_start == max(timestamp)`. Runs
    /// synchronously after every session mutation. No-op on an empty
    /// collection: the first-launch seed persists.
    fn recompute_streak_start(&mut self) {
        if let Some(latest) = streak::latest_timestamp(&self.sessions) {
            self.streak_start = latest;
        }
    }

    /// Rewrites the whole snapshot atomically (temp file, then rename).
    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let snapshot = Snapshot {
            sessions: self.sessions.clone(),
            expenses: self.expenses.clone(),
            streak_start: self.streak_start,
        };

        let temp_path = path.with_extension("tmp");
        let file = fs::File::create(&temp_path)?;
        serde_json::to_writer_pretty(file, &snapshot)?;
        fs::rename(temp_path, path)?;
        Ok(())
    }
}
