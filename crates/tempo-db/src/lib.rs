//! SQLite storage for the tempo coding-activity tracker.
//!
//! Implements [`tempo_core::Store`]: an append-only `events` table plus four
//! daily rollup tables maintained transactionally with every append.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a single `rusqlite::Connection`, which is `Send` but
//! not `Sync`. Wrap it in a `Mutex` to share it across threads; WAL mode
//! keeps readers isolated from the in-progress writer.
//!
//! # Schema
//!
//! Event timestamps are stored as epoch seconds (UTC). Rollup rows are keyed
//! by local `YYYY-MM-DD` strings derived from the offset the database was
//! opened with, so "a day" matches what the report shows. The rollup
//! language/project/editor columns hold values raw as-ingested; readers
//! normalize.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, TimeZone, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use tempo_core::{
    EditorSummary, Event, LanguageSummary, PeriodSummary, ProjectSummary, Store, StoreError,
    IDLE_CAP_SECS,
};

/// Errors raised while opening a database.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// SQLite-backed event store.
pub struct Database {
    conn: Connection,
    offset: FixedOffset,
}

impl Database {
    /// Opens (or creates) a database keyed to UTC days.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Self::open_with_offset(path, utc_offset())
    }

    /// Opens (or creates) a database whose rollup days follow `offset`.
    pub fn open_with_offset(path: &Path, offset: FixedOffset) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let db = Self { conn, offset };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::open_in_memory_with_offset(utc_offset())
    }

    pub fn open_in_memory_with_offset(offset: FixedOffset) -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn, offset };
        db.init()?;
        Ok(db)
    }

    /// Default database location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("tempo").join("tempo.db"))
    }

    /// Initializes pragmas and schema; idempotent.
    fn init(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA cache_size = -64000;
            PRAGMA temp_store = MEMORY;
            PRAGMA busy_timeout = 5000;
            PRAGMA foreign_keys = ON;
            ",
        )?;
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                timestamp INTEGER NOT NULL,
                lines INTEGER NOT NULL DEFAULT 0,
                language TEXT NOT NULL,
                project TEXT NOT NULL,
                editor TEXT NOT NULL DEFAULT 'unknown',
                file TEXT NOT NULL DEFAULT '',
                branch TEXT,
                is_write INTEGER NOT NULL DEFAULT 1
            ) WITHOUT ROWID;

            CREATE INDEX IF NOT EXISTS idx_events_timestamp_project
                ON events(timestamp, project);
            CREATE INDEX IF NOT EXISTS idx_events_timestamp_language
                ON events(timestamp, language);
            CREATE INDEX IF NOT EXISTS idx_events_timestamp_editor
                ON events(timestamp, editor);
            -- Covers the range-scan aggregation query without a table lookup.
            CREATE INDEX IF NOT EXISTS idx_events_covering
                ON events(timestamp, language, project, editor, lines);

            CREATE TABLE IF NOT EXISTS daily_summary (
                date TEXT PRIMARY KEY,
                total_time REAL NOT NULL DEFAULT 0,
                total_lines INTEGER NOT NULL DEFAULT 0,
                activity_count INTEGER NOT NULL DEFAULT 0,
                first_activity INTEGER,
                last_activity INTEGER
            );

            CREATE TABLE IF NOT EXISTS daily_language_summary (
                date TEXT NOT NULL,
                language TEXT NOT NULL,
                total_time REAL NOT NULL DEFAULT 0,
                total_lines INTEGER NOT NULL DEFAULT 0,
                file_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (date, language)
            );

            CREATE TABLE IF NOT EXISTS daily_project_summary (
                date TEXT NOT NULL,
                project TEXT NOT NULL,
                total_time REAL NOT NULL DEFAULT 0,
                total_lines INTEGER NOT NULL DEFAULT 0,
                main_language TEXT,
                file_count INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (date, project)
            );

            CREATE TABLE IF NOT EXISTS daily_editor_summary (
                date TEXT NOT NULL,
                editor TEXT NOT NULL,
                total_time REAL NOT NULL DEFAULT 0,
                total_lines INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (date, editor)
            );
            ",
        )?;
        Ok(())
    }

    fn local_date(&self, epoch: i64) -> NaiveDate {
        DateTime::from_timestamp(epoch, 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&self.offset)
            .date_naive()
    }

    fn day_start_epoch(&self, date: NaiveDate) -> i64 {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap();
        match self.offset.from_local_datetime(&midnight) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.timestamp(),
            LocalResult::None => midnight.and_utc().timestamp(),
        }
    }

    /// Inclusive local-date bounds for a summary query. A `from` at the Unix
    /// epoch means "from the beginning" and yields no lower bound.
    fn date_bounds(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> (Option<String>, String) {
        let lower = if from.timestamp() <= 0 {
            None
        } else {
            Some(date_key(self.local_date(from.timestamp())))
        };
        (lower, date_key(self.local_date(to.timestamp())))
    }
}

fn utc_offset() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn io_err(err: rusqlite::Error) -> StoreError {
    StoreError::Io(err.to_string())
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err.sqlite_error_code(),
        Some(rusqlite::ErrorCode::ConstraintViolation)
    )
}

impl Store for Database {
    fn append(&mut self, event: &Event) -> Result<(), StoreError> {
        let ts = event.timestamp.timestamp();
        let date = self.local_date(ts);
        let day_start = self.day_start_epoch(date);
        let date = date_key(date);

        let tx = self.conn.transaction().map_err(io_err)?;

        // Largest timestamp already logged for this local date, strictly
        // before the new event.
        let last_ts: Option<i64> = tx
            .query_row(
                "SELECT MAX(timestamp) FROM events WHERE timestamp >= ?1 AND timestamp < ?2",
                params![day_start, ts],
                |row| row.get(0),
            )
            .map_err(io_err)?;
        let contribution = match last_ts {
            None => IDLE_CAP_SECS,
            Some(last) => ((ts - last) as f64).min(IDLE_CAP_SECS),
        };

        let inserted = tx.execute(
            "
            INSERT INTO events (id, timestamp, lines, language, project, editor, file, branch, is_write)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                event.id,
                ts,
                event.lines,
                event.language,
                event.project,
                event.editor,
                event.file,
                event.branch,
                event.is_write as i64,
            ],
        );
        match inserted {
            Ok(_) => {}
            Err(err) if is_unique_violation(&err) => {
                return Err(StoreError::Conflict(event.id.clone()));
            }
            Err(err) => return Err(io_err(err)),
        }

        tx.execute(
            "
            INSERT INTO daily_summary
                (date, total_time, total_lines, activity_count, first_activity, last_activity)
            VALUES (?1, ?2, ?3, 1, ?4, ?4)
            ON CONFLICT(date) DO UPDATE SET
                total_time = total_time + excluded.total_time,
                total_lines = total_lines + excluded.total_lines,
                activity_count = activity_count + 1,
                first_activity = MIN(first_activity, excluded.first_activity),
                last_activity = MAX(last_activity, excluded.last_activity)
            ",
            params![date, contribution, event.lines, ts],
        )
        .map_err(io_err)?;

        tx.execute(
            "
            INSERT INTO daily_language_summary (date, language, total_time, total_lines)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(date, language) DO UPDATE SET
                total_time = total_time + excluded.total_time,
                total_lines = total_lines + excluded.total_lines
            ",
            params![date, event.language, contribution, event.lines],
        )
        .map_err(io_err)?;

        tx.execute(
            "
            INSERT INTO daily_project_summary (date, project, total_time, total_lines)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(date, project) DO UPDATE SET
                total_time = total_time + excluded.total_time,
                total_lines = total_lines + excluded.total_lines
            ",
            params![date, event.project, contribution, event.lines],
        )
        .map_err(io_err)?;

        tx.execute(
            "
            INSERT INTO daily_editor_summary (date, editor, total_time, total_lines)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(date, editor) DO UPDATE SET
                total_time = total_time + excluded.total_time,
                total_lines = total_lines + excluded.total_lines
            ",
            params![date, event.editor, contribution, event.lines],
        )
        .map_err(io_err)?;

        tx.commit().map_err(io_err)
    }

    fn activities_since(&self, since: DateTime<Utc>) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT id, timestamp, lines, language, project, editor, file, branch, is_write
                FROM events
                WHERE timestamp >= ?1
                ORDER BY timestamp ASC, id ASC
                ",
            )
            .map_err(io_err)?;

        let rows = stmt
            .query_map(params![since.timestamp()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, i64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, Option<String>>(7)?,
                    row.get::<_, i64>(8)?,
                ))
            })
            .map_err(io_err)?;

        let mut events = Vec::new();
        let mut skipped = 0usize;
        for row in rows {
            let (id, ts, lines, language, project, editor, file, branch, is_write) =
                row.map_err(io_err)?;
            let Some(timestamp) = DateTime::from_timestamp(ts, 0) else {
                skipped += 1;
                continue;
            };
            events.push(Event {
                id,
                timestamp,
                duration: 0.0,
                lines,
                language,
                project,
                editor,
                file,
                branch,
                is_write: is_write != 0,
            });
        }
        if skipped > 0 {
            tracing::warn!(skipped, "dropped events with out-of-range timestamps");
        }
        Ok(events)
    }

    fn activity_count(&self) -> Result<i64, StoreError> {
        self.conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))
            .map_err(io_err)
    }

    fn period_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<PeriodSummary, StoreError> {
        let (lower, upper) = self.date_bounds(from, to);
        self.conn
            .query_row(
                "
                SELECT COALESCE(SUM(total_time), 0),
                       COALESCE(SUM(total_lines), 0),
                       COALESCE(SUM(activity_count), 0)
                FROM daily_summary
                WHERE (?1 IS NULL OR date >= ?1) AND date <= ?2
                ",
                params![lower, upper],
                |row| {
                    Ok(PeriodSummary {
                        total_time: row.get(0)?,
                        total_lines: row.get(1)?,
                        activity_count: row.get(2)?,
                    })
                },
            )
            .optional()
            .map_err(io_err)
            .map(Option::unwrap_or_default)
    }

    fn language_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LanguageSummary>, StoreError> {
        let (lower, upper) = self.date_bounds(from, to);
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT language, SUM(total_time) AS t, SUM(total_lines)
                FROM daily_language_summary
                WHERE (?1 IS NULL OR date >= ?1) AND date <= ?2
                GROUP BY language
                ORDER BY t DESC, language ASC
                ",
            )
            .map_err(io_err)?;
        let rows = stmt
            .query_map(params![lower, upper], |row| {
                Ok(LanguageSummary {
                    language: row.get(0)?,
                    total_time: row.get(1)?,
                    total_lines: row.get(2)?,
                })
            })
            .map_err(io_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(io_err)
    }

    fn project_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<ProjectSummary>, StoreError> {
        let (lower, upper) = self.date_bounds(from, to);
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT project, SUM(total_time) AS t, SUM(total_lines),
                       (SELECT main_language FROM daily_project_summary inner_summary
                        WHERE inner_summary.project = outer_summary.project
                          AND inner_summary.main_language IS NOT NULL
                        ORDER BY inner_summary.date DESC LIMIT 1)
                FROM daily_project_summary outer_summary
                WHERE (?1 IS NULL OR date >= ?1) AND date <= ?2
                GROUP BY project
                ORDER BY t DESC, project ASC
                ",
            )
            .map_err(io_err)?;
        let rows = stmt
            .query_map(params![lower, upper], |row| {
                Ok(ProjectSummary {
                    project: row.get(0)?,
                    total_time: row.get(1)?,
                    total_lines: row.get(2)?,
                    main_language: row.get(3)?,
                })
            })
            .map_err(io_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(io_err)
    }

    fn editor_summary(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<EditorSummary>, StoreError> {
        let (lower, upper) = self.date_bounds(from, to);
        let mut stmt = self
            .conn
            .prepare(
                "
                SELECT editor, SUM(total_time) AS t, SUM(total_lines)
                FROM daily_editor_summary
                WHERE (?1 IS NULL OR date >= ?1) AND date <= ?2
                GROUP BY editor
                ORDER BY t DESC, editor ASC
                ",
            )
            .map_err(io_err)?;
        let rows = stmt
            .query_map(params![lower, upper], |row| {
                Ok(EditorSummary {
                    editor: row.get(0)?,
                    total_time: row.get(1)?,
                    total_lines: row.get(2)?,
                })
            })
            .map_err(io_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(io_err)
    }

    fn rebuild_rollups(&mut self) -> Result<(), StoreError> {
        #[derive(Default)]
        struct DayAcc {
            time: f64,
            lines: i64,
            count: i64,
            first: Option<i64>,
            last: Option<i64>,
        }
        #[derive(Default)]
        struct GroupAcc {
            time: f64,
            lines: i64,
            files: BTreeSet<String>,
        }
        #[derive(Default)]
        struct ProjectAcc {
            time: f64,
            lines: i64,
            files: BTreeSet<String>,
            language_time: BTreeMap<String, f64>,
        }

        let rows: Vec<(i64, i64, String, String, String, String)> = {
            let mut stmt = self
                .conn
                .prepare(
                    "
                    SELECT timestamp, lines, language, project, editor, file
                    FROM events
                    ORDER BY timestamp ASC, id ASC
                    ",
                )
                .map_err(io_err)?;
            let mapped = stmt
                .query_map([], |row| {
                    Ok((
                        row.get(0)?,
                        row.get(1)?,
                        row.get(2)?,
                        row.get(3)?,
                        row.get(4)?,
                        row.get(5)?,
                    ))
                })
                .map_err(io_err)?;
            mapped.collect::<Result<Vec<_>, _>>().map_err(io_err)?
        };

        let mut days: BTreeMap<String, DayAcc> = BTreeMap::new();
        let mut languages: BTreeMap<(String, String), GroupAcc> = BTreeMap::new();
        let mut projects: BTreeMap<(String, String), ProjectAcc> = BTreeMap::new();
        let mut editors: BTreeMap<(String, String), GroupAcc> = BTreeMap::new();

        // Replay the append rule: events are ordered, so the previous event
        // on the same local date is simply the last one seen for that date.
        let mut prev: Option<(String, i64)> = None;
        for (ts, lines, language, project, editor, file) in rows {
            let date = date_key(self.local_date(ts));
            let contribution = match &prev {
                Some((prev_date, prev_ts)) if *prev_date == date => {
                    ((ts - prev_ts) as f64).min(IDLE_CAP_SECS)
                }
                _ => IDLE_CAP_SECS,
            };
            prev = Some((date.clone(), ts));

            let day = days.entry(date.clone()).or_default();
            day.time += contribution;
            day.lines += lines;
            day.count += 1;
            day.first = Some(day.first.map_or(ts, |first| first.min(ts)));
            day.last = Some(day.last.map_or(ts, |last| last.max(ts)));

            let lang = languages.entry((date.clone(), language.clone())).or_default();
            lang.time += contribution;
            lang.lines += lines;
            if !file.is_empty() {
                lang.files.insert(file.clone());
            }

            let proj = projects.entry((date.clone(), project)).or_default();
            proj.time += contribution;
            proj.lines += lines;
            if !file.is_empty() {
                proj.files.insert(file.clone());
            }
            *proj.language_time.entry(language).or_insert(0.0) += contribution;

            let ed = editors.entry((date, editor)).or_default();
            ed.time += contribution;
            ed.lines += lines;
        }

        let tx = self.conn.transaction().map_err(io_err)?;
        tx.execute_batch(
            "
            DELETE FROM daily_summary;
            DELETE FROM daily_language_summary;
            DELETE FROM daily_project_summary;
            DELETE FROM daily_editor_summary;
            ",
        )
        .map_err(io_err)?;

        for (date, acc) in days {
            tx.execute(
                "
                INSERT INTO daily_summary
                    (date, total_time, total_lines, activity_count, first_activity, last_activity)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![date, acc.time, acc.lines, acc.count, acc.first, acc.last],
            )
            .map_err(io_err)?;
        }
        for ((date, language), acc) in languages {
            tx.execute(
                "
                INSERT INTO daily_language_summary
                    (date, language, total_time, total_lines, file_count)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ",
                params![date, language, acc.time, acc.lines, acc.files.len() as i64],
            )
            .map_err(io_err)?;
        }
        for ((date, project), acc) in projects {
            let main_language = acc
                .language_time
                .iter()
                .fold(None::<(&String, f64)>, |best, (lang, &time)| {
                    match best {
                        Some((_, best_time)) if best_time >= time => best,
                        _ => Some((lang, time)),
                    }
                })
                .map(|(lang, _)| lang.clone());
            tx.execute(
                "
                INSERT INTO daily_project_summary
                    (date, project, total_time, total_lines, main_language, file_count)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
                params![
                    date,
                    project,
                    acc.time,
                    acc.lines,
                    main_language,
                    acc.files.len() as i64
                ],
            )
            .map_err(io_err)?;
        }
        for ((date, editor), acc) in editors {
            tx.execute(
                "
                INSERT INTO daily_editor_summary (date, editor, total_time, total_lines)
                VALUES (?1, ?2, ?3, ?4)
                ",
                params![date, editor, acc.time, acc.lines],
            )
            .map_err(io_err)?;
        }
        tx.commit().map_err(io_err)
    }

    fn optimize(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch("VACUUM; ANALYZE;").map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn event(id: &str, ts: &str, lines: i64, language: &str, project: &str) -> Event {
        Event {
            id: id.to_string(),
            timestamp: ts.parse().unwrap(),
            duration: 0.0,
            lines,
            language: language.to_string(),
            project: project.to_string(),
            editor: "neovim".to_string(),
            file: format!("{project}/main.go"),
            branch: Some("main".to_string()),
            is_write: true,
        }
    }

    fn utc(ts: &str) -> DateTime<Utc> {
        ts.parse().unwrap()
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

    fn daily_rows(conn: &Connection) -> Vec<(String, f64, i64, i64)> {
        let mut stmt = conn
            .prepare(
                "SELECT date, total_time, total_lines, activity_count
                 FROM daily_summary ORDER BY date",
            )
            .unwrap();
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
            })
            .unwrap();
        rows.map(Result::unwrap).collect()
    }

    #[test]
    fn open_in_memory_database() {
        assert!(Database::open_in_memory().is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");

        assert_eq!(
            table_columns(&db.conn, "events"),
            vec![
                "id",
                "timestamp",
                "lines",
                "language",
                "project",
                "editor",
                "file",
                "branch",
                "is_write",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "daily_summary"),
            vec![
                "date",
                "total_time",
                "total_lines",
                "activity_count",
                "first_activity",
                "last_activity",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "daily_language_summary"),
            vec!["date", "language", "total_time", "total_lines", "file_count"]
        );
        assert_eq!(
            table_columns(&db.conn, "daily_project_summary"),
            vec![
                "date",
                "project",
                "total_time",
                "total_lines",
                "main_language",
                "file_count",
            ]
        );
        assert_eq!(
            table_columns(&db.conn, "daily_editor_summary"),
            vec!["date", "editor", "total_time", "total_lines"]
        );

        let mut stmt = db.conn.prepare("PRAGMA index_list(events)").unwrap();
        let indexes: HashSet<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        for expected in [
            "idx_events_timestamp_project",
            "idx_events_timestamp_language",
            "idx_events_timestamp_editor",
            "idx_events_covering",
        ] {
            assert!(indexes.contains(expected), "missing index {expected}");
        }
    }

    #[test]
    fn append_rejects_duplicate_ids() {
        let mut db = Database::open_in_memory().unwrap();
        let first = event("dup", "2025-01-15T10:00:00Z", 10, "go", "p");

        db.append(&first).unwrap();
        let err = db
            .append(&event("dup", "2025-01-15T10:01:00Z", 5, "go", "p"))
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(id) if id == "dup"));

        // The failed append must not leak rollup updates.
        let rows = daily_rows(&db.conn);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].3, 1, "activity_count must stay 1");
    }

    #[test]
    fn append_applies_capped_gap_rule() {
        let mut db = Database::open_in_memory().unwrap();
        // First event of the day contributes the idle cap.
        db.append(&event("a", "2025-01-15T10:00:00Z", 50, "go", "p"))
            .unwrap();
        // 5 minutes later: contribution capped at 120.
        db.append(&event("b", "2025-01-15T10:05:00Z", 30, "go", "p"))
            .unwrap();
        // 1 minute later: raw 60 second gap.
        db.append(&event("c", "2025-01-15T10:06:00Z", 20, "go", "p"))
            .unwrap();

        let rows = daily_rows(&db.conn);
        assert_eq!(rows.len(), 1);
        let (date, time, lines, count) = &rows[0];
        assert_eq!(date, "2025-01-15");
        assert!((time - (120.0 + 120.0 + 60.0)).abs() < 1e-9);
        assert_eq!(*lines, 100);
        assert_eq!(*count, 3);

        let (first, last): (i64, i64) = db
            .conn
            .query_row(
                "SELECT first_activity, last_activity FROM daily_summary WHERE date = '2025-01-15'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(first, utc("2025-01-15T10:00:00Z").timestamp());
        assert_eq!(last, utc("2025-01-15T10:06:00Z").timestamp());
    }

    #[test]
    fn first_event_of_each_day_gets_idle_cap() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-15T23:59:00Z", 5, "go", "p"))
            .unwrap();
        db.append(&event("b", "2025-01-16T00:01:00Z", 5, "go", "p"))
            .unwrap();

        let rows = daily_rows(&db.conn);
        assert_eq!(rows.len(), 2);
        // The second event starts a new local date, so the 2 minute gap to
        // the previous day's event does not count.
        assert!((rows[0].1 - 120.0).abs() < 1e-9);
        assert!((rows[1].1 - 120.0).abs() < 1e-9);
    }

    #[test]
    fn rollup_day_follows_database_offset() {
        // 23:30 EST on Jan 15 is 04:30 UTC on Jan 16.
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let mut db = Database::open_in_memory_with_offset(est).unwrap();
        db.append(&event("a", "2025-01-16T04:30:00Z", 5, "go", "p"))
            .unwrap();
        let rows = daily_rows(&db.conn);
        assert_eq!(rows[0].0, "2025-01-15");

        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-16T04:30:00Z", 5, "go", "p"))
            .unwrap();
        let rows = daily_rows(&db.conn);
        assert_eq!(rows[0].0, "2025-01-16");
    }

    #[test]
    fn activities_since_filters_and_orders() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("c", "2025-01-15T12:00:00Z", 1, "go", "p"))
            .unwrap();
        db.append(&event("a", "2025-01-13T12:00:00Z", 1, "go", "p"))
            .unwrap();
        db.append(&event("b", "2025-01-14T12:00:00Z", 1, "go", "p"))
            .unwrap();

        let events = db.activities_since(utc("2025-01-14T00:00:00Z")).unwrap();
        assert_eq!(
            events.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
            vec!["b", "c"]
        );
        assert_eq!(events[0].branch.as_deref(), Some("main"));
        assert!(events[0].is_write);
        assert_eq!(events[0].duration, 0.0);

        let all = db.activities_since(DateTime::UNIX_EPOCH).unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(db.activity_count().unwrap(), 3);
    }

    #[test]
    fn period_summary_covers_inclusive_date_range() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-13T12:00:00Z", 10, "go", "p"))
            .unwrap();
        db.append(&event("b", "2025-01-14T12:00:00Z", 20, "go", "p"))
            .unwrap();
        db.append(&event("c", "2025-01-15T12:00:00Z", 30, "go", "p"))
            .unwrap();

        let summary = db
            .period_summary(utc("2025-01-14T00:00:00Z"), utc("2025-01-14T23:00:00Z"))
            .unwrap();
        assert_eq!(summary.total_lines, 20);
        assert_eq!(summary.activity_count, 1);

        // Zero-instant `from` means "from the beginning".
        let all = db
            .period_summary(DateTime::UNIX_EPOCH, utc("2025-01-15T23:00:00Z"))
            .unwrap();
        assert_eq!(all.total_lines, 60);
        assert_eq!(all.activity_count, 3);
        assert!((all.total_time - 360.0).abs() < 1e-9);
    }

    #[test]
    fn grouped_summaries_order_by_time() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-15T10:00:00Z", 10, "go", "api"))
            .unwrap();
        db.append(&event("b", "2025-01-15T10:01:00Z", 10, "go", "api"))
            .unwrap();
        db.append(&event("c", "2025-01-15T10:02:00Z", 10, "rust", "cli"))
            .unwrap();

        let langs = db
            .language_summary(DateTime::UNIX_EPOCH, utc("2025-01-15T23:00:00Z"))
            .unwrap();
        assert_eq!(langs.len(), 2);
        assert_eq!(langs[0].language, "go");
        assert!(langs[0].total_time >= langs[1].total_time);

        let projects = db
            .project_summary(DateTime::UNIX_EPOCH, utc("2025-01-15T23:00:00Z"))
            .unwrap();
        assert_eq!(projects[0].project, "api");

        let editors = db
            .editor_summary(DateTime::UNIX_EPOCH, utc("2025-01-15T23:00:00Z"))
            .unwrap();
        assert_eq!(editors.len(), 1);
        assert_eq!(editors[0].editor, "neovim");
        assert_eq!(editors[0].total_lines, 30);
    }

    #[test]
    fn rebuild_matches_incremental_rollups() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-15T10:00:00Z", 10, "go", "api"))
            .unwrap();
        db.append(&event("b", "2025-01-15T10:01:30Z", 20, "go", "api"))
            .unwrap();
        db.append(&event("c", "2025-01-15T10:10:00Z", 5, "rust", "cli"))
            .unwrap();
        db.append(&event("d", "2025-01-16T09:00:00Z", 7, "rust", "cli"))
            .unwrap();

        let before = daily_rows(&db.conn);
        db.rebuild_rollups().unwrap();
        let after = daily_rows(&db.conn);

        assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.0, a.0);
            assert!((b.1 - a.1).abs() < 1e-6, "time drift on {}", b.0);
            assert_eq!(b.2, a.2);
            assert_eq!(b.3, a.3);
        }
    }

    #[test]
    fn rebuild_fills_file_counts_and_main_language() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-15T10:00:00Z", 10, "go", "api"))
            .unwrap();
        db.append(&event("b", "2025-01-15T10:01:00Z", 10, "markdown", "api"))
            .unwrap();
        db.append(&event("c", "2025-01-15T10:10:00Z", 10, "go", "api"))
            .unwrap();
        db.rebuild_rollups().unwrap();

        let (main_language, file_count): (Option<String>, i64) = db
            .conn
            .query_row(
                "SELECT main_language, file_count FROM daily_project_summary
                 WHERE date = '2025-01-15' AND project = 'api'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(main_language.as_deref(), Some("go"));
        assert_eq!(file_count, 1);

        let projects = db
            .project_summary(DateTime::UNIX_EPOCH, utc("2025-01-15T23:00:00Z"))
            .unwrap();
        assert_eq!(projects[0].main_language.as_deref(), Some("go"));
    }

    #[test]
    fn rebuild_is_idempotent() {
        let mut db = Database::open_in_memory().unwrap();
        for (i, ts) in [
            "2025-01-14T09:00:00Z",
            "2025-01-14T09:03:00Z",
            "2025-01-15T22:00:00Z",
        ]
        .iter()
        .enumerate()
        {
            db.append(&event(&format!("e{i}"), ts, 10, "go", "p")).unwrap();
        }

        db.rebuild_rollups().unwrap();
        let first = daily_rows(&db.conn);
        db.rebuild_rollups().unwrap();
        let second = daily_rows(&db.conn);
        assert_eq!(first, second);
    }

    #[test]
    fn optimize_is_a_safe_noop_for_fresh_db() {
        let mut db = Database::open_in_memory().unwrap();
        db.append(&event("a", "2025-01-15T10:00:00Z", 10, "go", "p"))
            .unwrap();
        db.optimize().unwrap();
        assert_eq!(db.activity_count().unwrap(), 1);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tempo.db");

        {
            let mut db = Database::open(&path).unwrap();
            db.append(&event("a", "2025-01-15T10:00:00Z", 10, "go", "p"))
                .unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.activity_count().unwrap(), 1);
        let events = db.activities_since(DateTime::UNIX_EPOCH).unwrap();
        assert_eq!(events[0].id, "a");
    }

    #[test]
    fn default_path_points_at_data_dir() {
        if let Some(path) = Database::default_path() {
            assert!(path.ends_with("tempo/tempo.db"));
        }
    }
}
