//! Storage layer for techlog entries.
//!
//! Provides persistence for log entries and aircraft rollups using `rusqlite`.
//!
//! # Thread Safety
//!
//! The [`Database`] type wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! A `Database` can be moved between threads but not shared without external
//! synchronization.
//!
//! # Schema
//!
//! ## Entries
//!
//! One row per techlog entry. `date` is `YYYY-MM-DD` and `created_at` is
//! RFC 3339 UTC, so lexicographic order matches chronological order. The
//! `sectors` column holds the ordered sector list as a JSON array with the
//! same field names as [`ftl_core::Sector`].
//!
//! ## Aircraft stats
//!
//! `aircraft_stats` caches one rollup per registration. Every write path in
//! this crate that changes an aircraft's entries recomputes that aircraft's
//! rollup from the stored entries in the same call, so the cache only drifts
//! if rows are changed behind this API.

use std::path::Path;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use ftl_core::{AircraftStats, EntryId, LogEntry, LogRepository, Sector, ValidationError};

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// An entry failed validation before insert, or a stored row holds invalid values.
    #[error("invalid entry: {0}")]
    Validation(#[from] ValidationError),
    /// The stored sector payload is not valid JSON.
    #[error("invalid sector data for entry {entry_id}")]
    SectorData {
        entry_id: String,
        #[source]
        source: serde_json::Error,
    },
    /// Failed to parse a stored date.
    #[error("invalid date for entry {entry_id}: {value}")]
    DateParse {
        entry_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Failed to parse a stored timestamp.
    #[error("invalid timestamp for {key}: {value}")]
    TimestampParse {
        key: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Database connection wrapper.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct Database {
    conn: Connection,
}

/// Raw column values for one `entries` row.
struct EntryRow {
    id: String,
    techlog_number: String,
    date: String,
    aircraft: String,
    pilot: String,
    co_pilot: Option<String>,
    sectors: String,
    created_at: String,
}

impl EntryRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            techlog_number: row.get(1)?,
            date: row.get(2)?,
            aircraft: row.get(3)?,
            pilot: row.get(4)?,
            co_pilot: row.get(5)?,
            sectors: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_entry(self) -> Result<LogEntry, DbError> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|source| {
            DbError::DateParse {
                entry_id: self.id.clone(),
                value: self.date.clone(),
                source,
            }
        })?;
        let sectors: Vec<Sector> =
            serde_json::from_str(&self.sectors).map_err(|source| DbError::SectorData {
                entry_id: self.id.clone(),
                source,
            })?;
        let created_at = parse_timestamp(&self.created_at, &self.id)?;
        Ok(LogEntry {
            id: EntryId::new(self.id)?,
            techlog_number: self.techlog_number,
            date,
            aircraft: self.aircraft,
            pilot: self.pilot,
            co_pilot: self.co_pilot,
            sectors,
            created_at,
        })
    }
}

const ENTRY_COLUMNS: &str =
    "id, techlog_number, date, aircraft, pilot, co_pilot, sectors, created_at";

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The database schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database.
    ///
    /// Useful for testing. The database is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initializes the database schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            -- Entries table: one techlog submission per row
            -- date: 'YYYY-MM-DD'
            -- sectors: JSON array of sectors in flown order
            CREATE TABLE IF NOT EXISTS entries (
                id TEXT PRIMARY KEY,
                techlog_number TEXT NOT NULL,
                date TEXT NOT NULL,
                aircraft TEXT NOT NULL,
                pilot TEXT NOT NULL,
                co_pilot TEXT,
                sectors TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
            CREATE INDEX IF NOT EXISTS idx_entries_aircraft ON entries(aircraft);
            CREATE INDEX IF NOT EXISTS idx_entries_pilot ON entries(pilot);
            CREATE INDEX IF NOT EXISTS idx_entries_co_pilot ON entries(co_pilot);

            CREATE TABLE IF NOT EXISTS aircraft_stats (
                registration TEXT PRIMARY KEY,
                cycles INTEGER NOT NULL DEFAULT 0,
                flight_hours REAL NOT NULL DEFAULT 0,
                last_updated TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Validates and stores an entry, then refreshes its aircraft's rollup.
    ///
    /// Returns `false` if an entry with the same ID already exists.
    pub fn insert_entry(&mut self, entry: &LogEntry, now: DateTime<Utc>) -> Result<bool, DbError> {
        entry.validate()?;
        let tx = self.conn.transaction()?;
        let inserted = insert_entry_row(&tx, entry)? > 0;
        if inserted {
            let stats = recompute_stats(&tx, &entry.aircraft, now)?;
            upsert_stats_row(&tx, &stats)?;
        }
        tx.commit()?;
        tracing::debug!(entry = %entry.id, inserted, "stored entry");
        Ok(inserted)
    }

    /// Stores a batch of entries, ignoring IDs already present.
    ///
    /// Every entry is validated before anything is written. Rollups of each
    /// touched aircraft are refreshed once at the end.
    pub fn import_entries(
        &mut self,
        entries: &[LogEntry],
        now: DateTime<Utc>,
    ) -> Result<usize, DbError> {
        if entries.is_empty() {
            return Ok(0);
        }
        for entry in entries {
            entry.validate()?;
        }
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        let mut touched = std::collections::BTreeSet::new();
        for entry in entries {
            if insert_entry_row(&tx, entry)? > 0 {
                inserted += 1;
                touched.insert(entry.aircraft.as_str());
            }
        }
        for registration in touched {
            let stats = recompute_stats(&tx, registration, now)?;
            upsert_stats_row(&tx, &stats)?;
        }
        tx.commit()?;
        tracing::debug!(inserted, total = entries.len(), "imported entries");
        Ok(inserted)
    }

    /// Lists all entries ordered by date, then creation time, then ID.
    pub fn list_entries(&self) -> Result<Vec<LogEntry>, DbError> {
        query_entries(
            &self.conn,
            &format!(
                "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY date ASC, created_at ASC, id ASC"
            ),
            [],
        )
    }

    /// Lists entries for one aircraft in the same order as [`Self::list_entries`].
    pub fn list_entries_for_aircraft(&self, registration: &str) -> Result<Vec<LogEntry>, DbError> {
        query_aircraft_entries(&self.conn, registration)
    }

    /// Fetches a single entry by ID.
    pub fn get_entry(&self, id: &str) -> Result<Option<LogEntry>, DbError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?"),
                [id],
                EntryRow::from_row,
            )
            .optional()?;
        row.map(EntryRow::into_entry).transpose()
    }

    /// Deletes an entry and refreshes its aircraft's rollup.
    ///
    /// Returns the removed entry, or `None` if no entry had that ID.
    pub fn delete_entry(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<LogEntry>, DbError> {
        let Some(entry) = self.get_entry(id)? else {
            return Ok(None);
        };
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM entries WHERE id = ?", [id])?;
        let stats = recompute_stats(&tx, &entry.aircraft, now)?;
        upsert_stats_row(&tx, &stats)?;
        tx.commit()?;
        tracing::debug!(entry = id, aircraft = %entry.aircraft, "deleted entry");
        Ok(Some(entry))
    }

    /// Number of stored entries.
    pub fn entry_count(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM entries", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Most recent entry date, if any entries exist.
    pub fn latest_entry_date(&self) -> Result<Option<String>, DbError> {
        Ok(self
            .conn
            .query_row("SELECT MAX(date) FROM entries", [], |row| row.get(0))?)
    }

    /// Inserts or replaces an aircraft rollup.
    pub fn upsert_aircraft_stats(&self, stats: &AircraftStats) -> Result<(), DbError> {
        upsert_stats_row(&self.conn, stats)
    }

    /// Fetches the stored rollup for one aircraft.
    pub fn get_aircraft_stats(&self, registration: &str) -> Result<Option<AircraftStats>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT registration, cycles, flight_hours, last_updated
                 FROM aircraft_stats WHERE registration = ?",
                [registration],
                stats_row,
            )
            .optional()?;
        row.map(|(registration, cycles, flight_hours, last_updated)| {
            stats_from_row(registration, cycles, flight_hours, &last_updated)
        })
        .transpose()
    }

    /// Lists every stored rollup ordered by registration.
    pub fn list_aircraft_stats(&self) -> Result<Vec<AircraftStats>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT registration, cycles, flight_hours, last_updated
             FROM aircraft_stats ORDER BY registration ASC",
        )?;
        let rows = stmt.query_map([], stats_row)?;
        let mut stats = Vec::new();
        for row in rows {
            let (registration, cycles, flight_hours, last_updated) = row?;
            stats.push(stats_from_row(registration, cycles, flight_hours, &last_updated)?);
        }
        Ok(stats)
    }

    /// Rebuilds every rollup from the stored entries.
    ///
    /// Rollups for registrations that no longer have entries are removed.
    pub fn recompute_all_aircraft_stats(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<Vec<AircraftStats>, DbError> {
        let entries = self.list_entries()?;
        let registrations = ftl_core::fleet_registrations(&entries);
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM aircraft_stats", [])?;
        let mut all = Vec::with_capacity(registrations.len());
        for registration in &registrations {
            let stats = AircraftStats::compute(&entries, registration, now);
            upsert_stats_row(&tx, &stats)?;
            all.push(stats);
        }
        tx.commit()?;
        tracing::debug!(aircraft = all.len(), "recomputed aircraft stats");
        Ok(all)
    }
}

impl LogRepository for Database {
    type Error = DbError;

    fn list(&self) -> Result<Vec<LogEntry>, DbError> {
        self.list_entries()
    }

    fn upsert(&mut self, stats: &AircraftStats) -> Result<(), DbError> {
        self.upsert_aircraft_stats(stats)
    }
}

fn insert_entry_row(conn: &Connection, entry: &LogEntry) -> Result<usize, DbError> {
    let sectors = serde_json::to_string(&entry.sectors).map_err(|source| DbError::SectorData {
        entry_id: entry.id.to_string(),
        source,
    })?;
    let inserted = conn.execute(
        "
        INSERT OR IGNORE INTO entries
        (id, techlog_number, date, aircraft, pilot, co_pilot, sectors, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
        params![
            entry.id.as_str(),
            entry.techlog_number,
            entry.date.format("%Y-%m-%d").to_string(),
            entry.aircraft,
            entry.pilot,
            entry.co_pilot,
            sectors,
            format_timestamp(entry.created_at),
        ],
    )?;
    Ok(inserted)
}

fn query_entries<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<LogEntry>, DbError> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, EntryRow::from_row)?;
    let mut entries = Vec::new();
    for row in rows {
        entries.push(row?.into_entry()?);
    }
    Ok(entries)
}

fn query_aircraft_entries(conn: &Connection, registration: &str) -> Result<Vec<LogEntry>, DbError> {
    query_entries(
        conn,
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE aircraft = ? \
             ORDER BY date ASC, created_at ASC, id ASC"
        ),
        [registration],
    )
}

fn recompute_stats(
    conn: &Connection,
    registration: &str,
    now: DateTime<Utc>,
) -> Result<AircraftStats, DbError> {
    let entries = query_aircraft_entries(conn, registration)?;
    Ok(AircraftStats::compute(&entries, registration, now))
}

#[allow(clippy::cast_possible_wrap)]
fn upsert_stats_row(conn: &Connection, stats: &AircraftStats) -> Result<(), DbError> {
    conn.execute(
        "
        INSERT INTO aircraft_stats (registration, cycles, flight_hours, last_updated)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(registration) DO UPDATE SET
            cycles = excluded.cycles,
            flight_hours = excluded.flight_hours,
            last_updated = excluded.last_updated
        ",
        params![
            stats.registration,
            stats.cycles as i64,
            stats.flight_hours,
            format_timestamp(stats.last_updated),
        ],
    )?;
    Ok(())
}

fn stats_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, i64, f64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn stats_from_row(
    registration: String,
    cycles: i64,
    flight_hours: f64,
    last_updated: &str,
) -> Result<AircraftStats, DbError> {
    let last_updated = parse_timestamp(last_updated, &registration)?;
    Ok(AircraftStats {
        registration,
        cycles: u64::try_from(cycles).unwrap_or_default(),
        flight_hours,
        last_updated,
    })
}

fn parse_timestamp(value: &str, key: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|source| DbError::TimestampParse {
            key: key.to_string(),
            value: value.to_string(),
            source,
        })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use ftl_core::refresh_aircraft_stats;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 4, 8, 0, 0).unwrap()
    }

    fn entry(id: &str, aircraft: &str, date: (i32, u32, u32), sectors: Vec<Sector>) -> LogEntry {
        LogEntry {
            id: EntryId::new(id).unwrap(),
            techlog_number: format!("TL-{id}"),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            aircraft: aircraft.to_string(),
            pilot: "A. Smith".to_string(),
            co_pilot: Some("B. Jones".to_string()),
            sectors,
            created_at: Utc.with_ymd_and_hms(date.0, date.1, date.2, 18, 30, 15).unwrap(),
        }
    }

    fn day_one() -> LogEntry {
        entry(
            "entry-1",
            "N123AB",
            (2024, 1, 1),
            vec![
                Sector::new("KJFK", "KLAX", "07:00", "10:30"),
                Sector::new("KLAX", "KSEA", "11:30", "13:45"),
            ],
        )
    }

    fn day_three() -> LogEntry {
        entry(
            "entry-3",
            "N123AB",
            (2024, 1, 3),
            vec![Sector::new("KSEA", "KJFK", "06:00", "14:00")],
        )
    }

    #[test]
    fn entries_round_trip_exactly() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let original = day_one();
        assert!(db.insert_entry(&original, now()).expect("insert"));

        let loaded = db.get_entry("entry-1").expect("get").expect("present");
        assert_eq!(loaded, original);
        assert!(db.get_entry("missing").expect("get").is_none());
    }

    #[test]
    fn duplicate_insert_is_ignored() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        assert!(db.insert_entry(&day_one(), now()).unwrap());
        assert!(!db.insert_entry(&day_one(), now()).unwrap());
        assert_eq!(db.entry_count().unwrap(), 1);
    }

    #[test]
    fn insert_rejects_invalid_entries() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let mut invalid = day_one();
        invalid.sectors.clear();
        let err = db.insert_entry(&invalid, now()).unwrap_err();
        assert!(matches!(err, DbError::Validation(ValidationError::NoValidSectors)));
        assert_eq!(db.entry_count().unwrap(), 0);
    }

    #[test]
    fn list_orders_by_date() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.import_entries(&[day_three(), day_one()], now()).unwrap();
        let ids: Vec<String> = db
            .list_entries()
            .unwrap()
            .into_iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, ["entry-1", "entry-3"]);
        assert_eq!(db.latest_entry_date().unwrap().as_deref(), Some("2024-01-03"));
    }

    #[test]
    fn list_for_aircraft_filters_and_orders() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        let other = entry(
            "entry-2",
            "5H-TCA",
            (2024, 1, 2),
            vec![Sector::new("HTDA", "HTKJ", "07:00", "08:00")],
        );
        db.import_entries(&[day_three(), other, day_one()], now()).unwrap();

        let ids: Vec<String> = db
            .list_entries_for_aircraft("N123AB")
            .unwrap()
            .iter()
            .map(|e| e.id.to_string())
            .collect();
        assert_eq!(ids, ["entry-1", "entry-3"]);
        assert!(db.list_entries_for_aircraft("5H-ZZZ").unwrap().is_empty());
    }

    #[test]
    fn insert_keeps_aircraft_stats_current() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.insert_entry(&day_one(), now()).unwrap();
        db.insert_entry(&day_three(), now()).unwrap();

        let stats = db.get_aircraft_stats("N123AB").unwrap().expect("stats");
        assert_eq!(stats.cycles, 3);
        assert!((stats.flight_hours - 13.75).abs() < 1e-9);
        assert_eq!(stats.last_updated, now());
    }

    #[test]
    fn delete_recomputes_instead_of_leaving_stale_stats() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.import_entries(&[day_one(), day_three()], now()).unwrap();

        let removed = db.delete_entry("entry-1", now()).unwrap();
        assert_eq!(removed.map(|e| e.id.to_string()).as_deref(), Some("entry-1"));
        assert!(db.delete_entry("entry-1", now()).unwrap().is_none());

        let stats = db.get_aircraft_stats("N123AB").unwrap().unwrap();
        assert_eq!(stats.cycles, 1);
        assert!((stats.flight_hours - 8.0).abs() < 1e-9);
    }

    #[test]
    fn import_skips_existing_ids() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.insert_entry(&day_one(), now()).unwrap();
        let inserted = db.import_entries(&[day_one(), day_three()], now()).unwrap();
        assert_eq!(inserted, 1);
        assert_eq!(db.entry_count().unwrap(), 2);
    }

    #[test]
    fn recompute_all_drops_orphaned_rollups() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.insert_entry(&day_one(), now()).unwrap();
        db.upsert_aircraft_stats(&AircraftStats::empty("5H-GONE", now()))
            .unwrap();

        let rebuilt = db.recompute_all_aircraft_stats(now()).unwrap();
        assert_eq!(rebuilt.len(), 1);
        let stored: Vec<String> = db
            .list_aircraft_stats()
            .unwrap()
            .into_iter()
            .map(|s| s.registration)
            .collect();
        assert_eq!(stored, ["N123AB"]);
    }

    #[test]
    fn database_is_a_log_repository() {
        let mut db = Database::open_in_memory().expect("open in-memory db");
        db.import_entries(&[day_one()], now()).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        let stats = refresh_aircraft_stats(&mut db, "N123AB", later).unwrap();
        assert_eq!(stats.cycles, 2);
        assert_eq!(db.get_aircraft_stats("N123AB").unwrap().unwrap().last_updated, later);
    }

    #[test]
    fn corrupt_sector_payload_is_reported() {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.conn
            .execute(
                "INSERT INTO entries
                 (id, techlog_number, date, aircraft, pilot, co_pilot, sectors, created_at)
                 VALUES ('bad', 'TL-9', '2024-01-01', 'N1', 'A. Smith', NULL, 'not json',
                         '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        let err = db.list_entries().unwrap_err();
        assert!(matches!(err, DbError::SectorData { ref entry_id, .. } if entry_id == "bad"));
    }

    #[test]
    fn file_database_persists_between_opens() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ftl.db");
        let original = day_one();
        {
            let mut db = Database::open(&path).unwrap();
            db.insert_entry(&original, now()).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.list_entries().unwrap(), vec![original]);
        assert!(db.get_aircraft_stats("N123AB").unwrap().is_some());
    }
}
