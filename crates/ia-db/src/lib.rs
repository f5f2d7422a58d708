//! Local analytics backend backed by `SQLite`.
//!
//! [`Database`] implements [`AnalyticsBackend`]: it validates each submission
//! the way a remote analytics service would, stores accepted stats, and
//! answers error lookups from a fixed catalog of status codes (see
//! [`ErrorCode`]).
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection` plus interior-mutable key and
//! status slots. It is `Send` but not `Sync`; share it behind a `Mutex` or
//! open one instance per thread.
//!
//! # Sessions
//!
//! Every `Database` instance reports into its own session, identified by a
//! UUID. The session row is written with the first accepted stat, so opening
//! a database only to read it leaves no empty session behind. A session is
//! accepted for reporting once it holds [`MIN_SESSION_STATS`] distinct stats,
//! where a stat is a `(kind, identifier)` pair.
//!
//! # Last Error
//!
//! The most recent rejection is kept in a single-row table, so the
//! last-error slot is global to the database file rather than to one process.

mod codes;

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::str::FromStr;

use chrono::{SecondsFormat, Utc};
use ia_core::{AnalyticsBackend, Formula, GestureKind, Measurement, STATUS_OK, StatKind};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use uuid::Uuid;

pub use codes::{ErrorCode, describe};
use codes::Rejection;

/// Distinct stats a session needs before the backend accepts it.
pub const MIN_SESSION_STATS: usize = 10;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A stored row could not be mapped back to a stat.
    #[error("invalid stored submission {id}: {message}")]
    InvalidRow { id: i64, message: String },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
    session_id: String,
    key: RefCell<Option<String>>,
    last_status: Cell<i32>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("session_id", &self.session_id)
            .field("key", &self.key.borrow().as_ref().map(|_| "[REDACTED]"))
            .field("last_status", &self.last_status.get())
            .finish_non_exhaustive()
    }
}

/// A stored, accepted stat.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRecord {
    pub id: i64,
    pub session_id: String,
    pub recorded_at: String,
    pub kind: StatKind,
    pub identifier: String,
    pub value: f64,
    pub measurement: Option<Measurement>,
    pub formula: Option<Formula>,
    pub gesture: Option<GestureKind>,
    pub hold_length: Option<f64>,
    pub target: Option<String>,
}

/// Submission counts for one reporting session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: String,
    pub submissions: usize,
    pub distinct_stats: usize,
}

impl SessionSummary {
    /// Whether the session has enough distinct stats to be reported.
    pub const fn accepted(&self) -> bool {
        self.distinct_stats >= MIN_SESSION_STATS
    }
}

/// The most recent rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    pub code: i32,
    pub message: String,
    pub recorded_at: String,
}

/// A validated stat ready to be written.
#[derive(Debug, Default)]
struct Submission {
    kind: StatKind,
    identifier: String,
    value: f64,
    measurement: Option<Measurement>,
    formula: Option<Formula>,
    gesture: Option<GestureKind>,
    hold_length: Option<f64>,
    target: Option<String>,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        let db = Self {
            conn,
            session_id: Uuid::new_v4().to_string(),
            key: RefCell::new(None),
            last_status: Cell::new(STATUS_OK),
        };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                started_at TEXT NOT NULL
            );

            -- kind: stat kind name (e.g., 'gain', 'gaze')
            -- measurement, formula, gesture: wire ordinals, NULL when the
            -- backend operation does not carry them
            CREATE TABLE IF NOT EXISTS submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                recorded_at TEXT NOT NULL,
                kind TEXT NOT NULL,
                identifier TEXT NOT NULL,
                value REAL NOT NULL,
                measurement INTEGER,
                formula INTEGER,
                gesture INTEGER,
                hold_length REAL,
                target TEXT,
                FOREIGN KEY (session_id) REFERENCES sessions(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_submissions_session ON submissions(session_id);
            CREATE INDEX IF NOT EXISTS idx_submissions_stat ON submissions(kind, identifier);

            CREATE TABLE IF NOT EXISTS last_error (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                code INTEGER NOT NULL,
                message TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Session this instance reports into.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Status returned by the most recent submission on this instance.
    pub fn last_status(&self) -> i32 {
        self.last_status.get()
    }

    /// Lists accepted stats in the order they were received.
    pub fn list_submissions(&self) -> Result<Vec<SubmissionRecord>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, session_id, recorded_at, kind, identifier, value,
                   measurement, formula, gesture, hold_length, target
            FROM submissions
            ORDER BY id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, f64>(5)?,
                row.get::<_, Option<u8>>(6)?,
                row.get::<_, Option<u8>>(7)?,
                row.get::<_, Option<u8>>(8)?,
                row.get::<_, Option<f64>>(9)?,
                row.get::<_, Option<String>>(10)?,
            ))
        })?;

        let mut submissions = Vec::new();
        for row in rows {
            let (
                id,
                session_id,
                recorded_at,
                kind,
                identifier,
                value,
                measurement,
                formula,
                gesture,
                hold_length,
                target,
            ) = row?;
            let invalid = |message: String| DbError::InvalidRow { id, message };
            submissions.push(SubmissionRecord {
                id,
                session_id,
                recorded_at,
                kind: StatKind::from_str(&kind).map_err(|e| invalid(e.to_string()))?,
                identifier,
                value,
                measurement: measurement
                    .map(Measurement::from_ordinal)
                    .transpose()
                    .map_err(|e| invalid(e.to_string()))?,
                formula: formula
                    .map(Formula::from_ordinal)
                    .transpose()
                    .map_err(|e| invalid(e.to_string()))?,
                gesture: gesture
                    .map(GestureKind::from_ordinal)
                    .transpose()
                    .map_err(|e| invalid(e.to_string()))?,
                hold_length,
                target,
            });
        }
        Ok(submissions)
    }

    /// Summarizes every session, oldest first.
    pub fn session_summaries(&self) -> Result<Vec<SessionSummary>, DbError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT s.id, s.started_at, COUNT(sub.id),
                   COUNT(DISTINCT sub.kind || char(31) || sub.identifier)
            FROM sessions s
            LEFT JOIN submissions sub ON sub.session_id = s.id
            GROUP BY s.id
            ORDER BY s.started_at ASC, s.id ASC
            ",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SessionSummary {
                session_id: row.get(0)?,
                started_at: row.get(1)?,
                submissions: row.get(2)?,
                distinct_stats: row.get(3)?,
            })
        })?;
        let mut summaries = Vec::new();
        for row in rows {
            summaries.push(row?);
        }
        Ok(summaries)
    }

    /// Summary of this instance's own session.
    pub fn current_session(&self) -> Result<SessionSummary, DbError> {
        let summary = self
            .session_summaries()?
            .into_iter()
            .find(|s| s.session_id == self.session_id);
        Ok(summary.unwrap_or_else(|| SessionSummary {
            session_id: self.session_id.clone(),
            started_at: String::new(),
            submissions: 0,
            distinct_stats: 0,
        }))
    }

    /// The most recent rejection recorded in this database file.
    pub fn last_error(&self) -> Result<Option<LastError>, DbError> {
        let last = self
            .conn
            .query_row(
                "SELECT code, message, recorded_at FROM last_error WHERE id = 1",
                [],
                |row| {
                    Ok(LastError {
                        code: row.get(0)?,
                        message: row.get(1)?,
                        recorded_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(last)
    }

    /// Stores a validated submission and returns its status. The key check
    /// comes before any field validation.
    fn submit(&self, submission: Result<Submission, Rejection>) -> i32 {
        let outcome = if self.key.borrow().is_none() {
            Err(Rejection::new(ErrorCode::MissingKey, "call set_key first"))
        } else {
            submission.and_then(|submission| {
                self.store(&submission).map_err(|err| {
                    tracing::error!(error = %err, "failed to store submission");
                    Rejection::new(ErrorCode::Storage, err)
                })
            })
        };

        let status = match outcome {
            Ok(()) => STATUS_OK,
            Err(rejection) => {
                self.remember_error(&rejection);
                rejection.code.code()
            }
        };
        self.last_status.set(status);
        status
    }

    fn store(&self, submission: &Submission) -> Result<(), DbError> {
        let now = format_timestamp_now();
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO sessions (id, started_at) VALUES (?, ?)",
            params![self.session_id, now],
        )?;
        tx.execute(
            "
            INSERT INTO submissions
            (session_id, recorded_at, kind, identifier, value, measurement, formula, gesture, hold_length, target)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
            params![
                self.session_id,
                now,
                submission.kind.as_str(),
                submission.identifier,
                submission.value,
                submission.measurement.map(Measurement::ordinal),
                submission.formula.map(Formula::ordinal),
                submission.gesture.map(GestureKind::ordinal),
                submission.hold_length,
                submission.target,
            ],
        )?;
        tx.commit()?;
        tracing::debug!(
            kind = %submission.kind,
            identifier = submission.identifier,
            session = self.session_id,
            "stored submission"
        );
        Ok(())
    }

    fn remember_error(&self, rejection: &Rejection) {
        tracing::debug!(code = rejection.code.code(), message = rejection.message, "submission rejected");
        let result = self.conn.execute(
            "
            INSERT INTO last_error (id, code, message, recorded_at) VALUES (1, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                code = excluded.code,
                message = excluded.message,
                recorded_at = excluded.recorded_at
            ",
            params![rejection.code.code(), rejection.message, format_timestamp_now()],
        );
        if let Err(err) = result {
            tracing::error!(error = %err, "failed to persist last error");
        }
    }
}

fn format_timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn require_identifier(field: &str, text: &str) -> Result<String, Rejection> {
    if text.is_empty() {
        return Err(Rejection::new(ErrorCode::EmptyIdentifier, field));
    }
    Ok(text.to_string())
}

/// Parses locale-invariant decimal text (`25`, `2.5`, `-0.75`).
fn parse_decimal(field: &str, text: &str) -> Result<f64, Rejection> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| Rejection::new(ErrorCode::InvalidNumber, format!("{field} '{text}'")))
}

fn parse_ordinal<T>(
    text: &str,
    from_ordinal: impl FnOnce(u8) -> Result<T, ia_core::ValidationError>,
) -> Result<T, Rejection> {
    let ordinal = text
        .parse::<u8>()
        .map_err(|_| Rejection::new(ErrorCode::InvalidOrdinal, format!("'{text}'")))?;
    from_ordinal(ordinal).map_err(|err| Rejection::new(ErrorCode::InvalidOrdinal, err))
}

fn optional_target(target: &str) -> Option<String> {
    (!target.is_empty()).then(|| target.to_string())
}

impl AnalyticsBackend for Database {
    /// A blank key clears any key set earlier.
    fn set_key(&self, key: &str) {
        let key = key.trim();
        if key.is_empty() {
            tracing::warn!("blank API key ignored");
        }
        *self.key.borrow_mut() = (!key.is_empty()).then(|| key.to_string());
    }

    fn record_gain(&self, identifier: &str, value: &str) -> i32 {
        self.submit(counted(StatKind::Gain, identifier, value))
    }

    fn record_loss(&self, identifier: &str, value: &str) -> i32 {
        self.submit(counted(StatKind::Loss, identifier, value))
    }

    fn record_custom_stat(
        &self,
        identifier: &str,
        value: &str,
        measurement: &str,
        formula: &str,
        target: &str,
    ) -> i32 {
        self.submit(custom(identifier, value, measurement, formula, target))
    }

    fn record_keyword(&self, keyword: &str, weight: &str, target: &str) -> i32 {
        self.submit(keyword_submission(keyword, weight, target))
    }

    fn record_gesture(
        &self,
        identifier: &str,
        weight: &str,
        gesture: &str,
        target: &str,
        hold_length: &str,
    ) -> i32 {
        self.submit(gesture_submission(identifier, weight, gesture, target, hold_length))
    }

    fn record_gaze(&self, target: &str, length: &str) -> i32 {
        self.submit(gaze(target, length))
    }

    fn error_message(&self, code: i32) -> String {
        describe(code)
    }

    fn last_error_message(&self) -> String {
        match self.last_error() {
            Ok(last) => last.map(|e| e.message).unwrap_or_default(),
            Err(err) => {
                tracing::error!(error = %err, "failed to read last error");
                String::new()
            }
        }
    }
}

fn counted(kind: StatKind, identifier: &str, value: &str) -> Result<Submission, Rejection> {
    Ok(Submission {
        kind,
        identifier: require_identifier("identifier", identifier)?,
        value: parse_decimal("value", value)?,
        measurement: Some(Measurement::Count),
        formula: Some(Formula::Total),
        ..Submission::default()
    })
}

fn custom(
    identifier: &str,
    value: &str,
    measurement: &str,
    formula: &str,
    target: &str,
) -> Result<Submission, Rejection> {
    Ok(Submission {
        kind: StatKind::CustomStat,
        identifier: require_identifier("identifier", identifier)?,
        value: parse_decimal("value", value)?,
        measurement: Some(parse_ordinal(measurement, Measurement::from_ordinal)?),
        formula: Some(parse_ordinal(formula, Formula::from_ordinal)?),
        target: optional_target(target),
        ..Submission::default()
    })
}

fn keyword_submission(keyword: &str, weight: &str, target: &str) -> Result<Submission, Rejection> {
    Ok(Submission {
        kind: StatKind::Keyword,
        identifier: require_identifier("keyword", keyword)?,
        value: parse_decimal("weight", weight)?,
        target: optional_target(target),
        ..Submission::default()
    })
}

fn gesture_submission(
    identifier: &str,
    weight: &str,
    gesture: &str,
    target: &str,
    hold_length: &str,
) -> Result<Submission, Rejection> {
    Ok(Submission {
        kind: StatKind::Gesture,
        identifier: require_identifier("identifier", identifier)?,
        value: parse_decimal("weight", weight)?,
        gesture: Some(parse_ordinal(gesture, GestureKind::from_ordinal)?),
        hold_length: Some(parse_decimal("hold length", hold_length)?),
        target: optional_target(target),
        ..Submission::default()
    })
}

fn gaze(target: &str, length: &str) -> Result<Submission, Rejection> {
    let target = require_identifier("gaze target", target)?;
    Ok(Submission {
        kind: StatKind::Gaze,
        identifier: target.clone(),
        value: parse_decimal("length", length)?,
        measurement: Some(Measurement::Second),
        target: Some(target),
        ..Submission::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use ia_core::{ApiKey, EventRecorder, ManualClock, RecorderOptions};

    fn keyed() -> Database {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.set_key("test-key");
        db
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(table_columns(&db.conn, "sessions"), vec!["id", "started_at"]);
        assert_eq!(
            table_columns(&db.conn, "submissions"),
            vec![
                "id",
                "session_id",
                "recorded_at",
                "kind",
                "identifier",
                "value",
                "measurement",
                "formula",
                "gesture",
                "hold_length",
                "target",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "last_error"),
            vec!["id", "code", "message", "recorded_at"]
        );

        let indexes = index_names(&db.conn, "submissions");
        assert!(indexes.contains("idx_submissions_session"));
        assert!(indexes.contains("idx_submissions_stat"));
    }

    fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .expect("prepare table_info");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query table_info");
        rows.map(|row| row.expect("table_info row")).collect()
    }

    fn index_names(conn: &Connection, table: &str) -> HashSet<String> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA index_list({table})"))
            .expect("prepare index_list");
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .expect("query index_list");
        rows.map(|row| row.expect("index_list row")).collect()
    }

    #[test]
    fn submissions_require_key() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.record_gain("Gold", "5"), ErrorCode::MissingKey.code());
        assert_eq!(db.last_status(), 1);
        assert!(db.list_submissions().unwrap().is_empty());
        assert_eq!(
            db.last_error_message(),
            "API key has not been set: call set_key first"
        );
    }

    #[test]
    fn blank_key_counts_as_unset() {
        let db = keyed();
        db.set_key("   ");

        assert_eq!(db.record_gain("Gold", "5"), ErrorCode::MissingKey.code());
        db.set_key("");
        assert_eq!(db.record_keyword("Fire", "1.0", ""), ErrorCode::MissingKey.code());
        assert!(db.list_submissions().unwrap().is_empty());

        db.set_key("key");
        assert_eq!(db.record_gain("Gold", "5"), STATUS_OK);
    }

    #[test]
    fn accepted_gain_is_stored() {
        let db = keyed();

        assert_eq!(db.record_gain("HealthGained", "25"), STATUS_OK);

        let stored = db.list_submissions().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].kind, StatKind::Gain);
        assert_eq!(stored[0].identifier, "HealthGained");
        assert!((stored[0].value - 25.0).abs() < f64::EPSILON);
        assert_eq!(stored[0].measurement, Some(Measurement::Count));
        assert_eq!(stored[0].formula, Some(Formula::Total));
        assert_eq!(stored[0].session_id, db.session_id());
    }

    #[test]
    fn rejects_locale_formatted_numbers() {
        let db = keyed();

        assert_eq!(db.record_loss("Life", "2,5"), ErrorCode::InvalidNumber.code());
        assert_eq!(db.record_gaze("Cube", "NaN"), ErrorCode::InvalidNumber.code());
        assert_eq!(db.last_error_message(), "value is not a valid decimal number: length 'NaN'");
    }

    #[test]
    fn rejects_out_of_range_ordinals() {
        let db = keyed();

        let status = db.record_custom_stat("Combo", "1", "7", "0", "");
        assert_eq!(status, ErrorCode::InvalidOrdinal.code());
        assert_eq!(
            db.last_error_message(),
            "enum ordinal is out of range: measurement ordinal out of range: 7"
        );

        let status = db.record_gesture("Tap", "1.0", "x", "", "0");
        assert_eq!(status, ErrorCode::InvalidOrdinal.code());
    }

    #[test]
    fn rejects_empty_identifiers_and_gaze_targets() {
        let db = keyed();

        assert_eq!(db.record_keyword("", "1.0", "Cube"), ErrorCode::EmptyIdentifier.code());
        assert_eq!(db.record_gaze("", "1.5"), ErrorCode::EmptyIdentifier.code());
        assert!(db.list_submissions().unwrap().is_empty());
    }

    #[test]
    fn gesture_fields_round_trip_through_storage() {
        let db = keyed();

        assert_eq!(db.record_gesture("Laser", "1.0", "2", "Ship", "1.2"), STATUS_OK);

        let stored = &db.list_submissions().unwrap()[0];
        assert_eq!(stored.gesture, Some(GestureKind::Hold));
        assert_eq!(stored.target.as_deref(), Some("Ship"));
        assert!((stored.hold_length.unwrap() - 1.2).abs() < 1e-9);
        assert_eq!(stored.measurement, None);
    }

    #[test]
    fn session_is_created_lazily() {
        let db = keyed();
        assert!(db.session_summaries().unwrap().is_empty());
        assert_eq!(db.current_session().unwrap().submissions, 0);

        db.record_gain("Gold", "1");
        let sessions = db.session_summaries().unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].session_id, db.session_id());
    }

    #[test]
    fn session_accepted_after_ten_distinct_stats() {
        let db = keyed();

        for i in 0..9 {
            db.record_gain(&format!("Stat{i}"), "1");
        }
        db.record_gain("Stat0", "1");
        db.record_loss("Stat0", "1");
        let summary = db.current_session().unwrap();
        assert_eq!(summary.submissions, 11);
        assert_eq!(summary.distinct_stats, 10);
        assert!(summary.accepted());
    }

    #[test]
    fn repeated_stat_does_not_count_twice() {
        let db = keyed();

        for _ in 0..12 {
            db.record_keyword("Fire", "1.0", "");
        }
        let summary = db.current_session().unwrap();
        assert_eq!(summary.submissions, 12);
        assert_eq!(summary.distinct_stats, 1);
        assert!(!summary.accepted());
    }

    #[test]
    fn last_error_is_shared_across_instances() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ia.db");

        let first = Database::open(&path).unwrap();
        first.set_key("key");
        first.record_gain("", "1");
        drop(first);

        let second = Database::open(&path).unwrap();
        let last = second.last_error().unwrap().expect("last error persisted");
        assert_eq!(last.code, 2);
        assert_eq!(last.message, "stat identifier cannot be empty: identifier");
    }

    #[test]
    fn each_instance_reports_its_own_session() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ia.db");

        for _ in 0..2 {
            let db = Database::open(&path).unwrap();
            db.set_key("key");
            db.record_gain("Gold", "1");
        }

        let db = Database::open(&path).unwrap();
        let sessions = db.session_summaries().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_ne!(sessions[0].session_id, sessions[1].session_id);
    }

    #[test]
    fn error_message_uses_catalog() {
        let db = keyed();
        assert_eq!(db.error_message(4), "enum ordinal is out of range");
        assert_eq!(db.error_message(99), "unknown error code: 99");
    }

    #[test]
    fn recorder_writes_through_database() {
        let db = Database::open_in_memory().unwrap();
        let clock = ManualClock::new();
        let key = ApiKey::new("key").unwrap();
        let mut recorder =
            EventRecorder::new(db, &key, RecorderOptions::default()).with_clock(clock.clone());

        recorder.record_gaze_on("Cube");
        clock.advance(std::time::Duration::from_millis(2500));
        recorder.record_gaze_off();
        recorder.record_custom_stat("Combo", 3.0);
        recorder.record_gain("", 1.0);

        let db = recorder.backend();
        let stored = db.list_submissions().unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].kind, StatKind::Gaze);
        assert_eq!(stored[0].identifier, "Cube");
        assert!((stored[0].value - 2.5).abs() < 1e-6);
        assert_eq!(stored[1].kind, StatKind::CustomStat);
        assert_eq!(db.last_status(), ErrorCode::EmptyIdentifier.code());
        assert_eq!(
            recorder.errors().last_message(),
            "stat identifier cannot be empty: identifier"
        );
    }
}
