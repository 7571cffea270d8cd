//! SQLite-based pour storage.
//!
//! Provides persistent storage for:
//! - Drinkers and their BAC profile
//! - Kegs
//! - Pours, each with the running BAC sample computed when it was recorded
//!
//! Timestamps are stored as RFC 3339 UTC strings at second precision, which
//! keeps them sortable as text.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::data_dir;
use super::source::PourSource;
use crate::bac::{self, BacSample};
use crate::error::{DatabaseError, Result, ValidationError};
use crate::model::{Drinker, DrinkerProfile, Gender, Keg, KegStatus, PourRecord};

const POUR_COLUMNS: &str = "d.id, d.user_id, d.keg_id, d.start_time, d.end_time, d.volume_ounces,
     b.bac, b.rec_time";

/// Fields needed to put a new keg on tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewKeg {
    pub beer_name: String,
    /// Alcohol content as a fraction (0.05 for 5%)
    pub alcohol_pct: f64,
    pub calories_per_ounce: f64,
    pub capacity_ounces: f64,
}

/// SQLite database for drinkers, kegs and pours.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/kegstats.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("kegstats.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> std::result::Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS drinkers (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                username    TEXT NOT NULL UNIQUE,
                weight_lb   REAL NOT NULL,
                gender      TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kegs (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                beer_name       TEXT NOT NULL,
                alcohol_pct     REAL NOT NULL,
                calories_oz     REAL NOT NULL DEFAULT 0,
                capacity_ounces REAL NOT NULL DEFAULT 0,
                status          TEXT NOT NULL DEFAULT 'online'
            );

            CREATE TABLE IF NOT EXISTS drinks (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id       INTEGER NOT NULL REFERENCES drinkers(id),
                keg_id        INTEGER REFERENCES kegs(id),
                start_time    TEXT NOT NULL,
                end_time      TEXT NOT NULL,
                volume_ounces REAL NOT NULL,
                status        TEXT NOT NULL DEFAULT 'valid'
            );

            CREATE TABLE IF NOT EXISTS bacs (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id   INTEGER NOT NULL REFERENCES drinkers(id),
                drink_id  INTEGER NOT NULL REFERENCES drinks(id),
                bac       REAL NOT NULL,
                rec_time  TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_drinks_user_status ON drinks(user_id, status);
            CREATE INDEX IF NOT EXISTS idx_bacs_user_rec_time ON bacs(user_id, rec_time);
            CREATE INDEX IF NOT EXISTS idx_bacs_drink ON bacs(drink_id);",
        )?;
        Ok(())
    }

    /// Register a drinker.
    ///
    /// # Errors
    /// Fails with `InvalidProfile` for a non-positive weight, or
    /// `AlreadyExists` when the username is taken.
    pub fn add_drinker(&self, username: &str, profile: DrinkerProfile) -> Result<Drinker> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::invalid_value("username", "must not be empty").into());
        }
        if !(profile.weight_lb.is_finite() && profile.weight_lb > 0.0) {
            return Err(ValidationError::InvalidProfile {
                weight_lb: profile.weight_lb,
            }
            .into());
        }
        if self.drinker_by_username(username)?.is_some() {
            return Err(DatabaseError::AlreadyExists {
                entity: "drinker",
                key: username.to_string(),
            }
            .into());
        }

        self.conn.execute(
            "INSERT INTO drinkers (username, weight_lb, gender) VALUES (?1, ?2, ?3)",
            params![username, profile.weight_lb, profile.gender.as_str()],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, username, "added drinker");

        Ok(Drinker {
            id,
            username: username.to_string(),
            profile,
        })
    }

    pub fn drinker_by_username(
        &self,
        username: &str,
    ) -> std::result::Result<Option<Drinker>, DatabaseError> {
        let drinker = self
            .conn
            .query_row(
                "SELECT id, username, weight_lb, gender FROM drinkers WHERE username = ?1",
                params![username],
                drinker_from_row,
            )
            .optional()?;
        Ok(drinker)
    }

    /// Look up a drinker by username, failing when absent.
    pub fn require_drinker(&self, username: &str) -> std::result::Result<Drinker, DatabaseError> {
        self.drinker_by_username(username)?
            .ok_or_else(|| DatabaseError::NotFound {
                entity: "drinker",
                key: username.to_string(),
            })
    }

    pub fn list_drinkers(&self) -> std::result::Result<Vec<Drinker>, DatabaseError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, username, weight_lb, gender FROM drinkers ORDER BY id")?;
        let rows = stmt.query_map([], drinker_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    /// Put a keg on tap.
    ///
    /// # Errors
    /// Fails when the alcohol fraction is outside `0..=1` or an amount is
    /// negative.
    pub fn add_keg(&self, keg: &NewKeg) -> Result<Keg> {
        if !(0.0..=1.0).contains(&keg.alcohol_pct) {
            return Err(ValidationError::invalid_value(
                "alcohol_pct",
                format!("expected a fraction between 0 and 1, got {}", keg.alcohol_pct),
            )
            .into());
        }
        if keg.calories_per_ounce < 0.0 || keg.capacity_ounces < 0.0 {
            return Err(ValidationError::invalid_value(
                "keg",
                "calories and capacity must not be negative",
            )
            .into());
        }

        self.conn.execute(
            "INSERT INTO kegs (beer_name, alcohol_pct, calories_oz, capacity_ounces, status)
             VALUES (?1, ?2, ?3, ?4, 'online')",
            params![
                keg.beer_name,
                keg.alcohol_pct,
                keg.calories_per_ounce,
                keg.capacity_ounces
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!(id, beer = %keg.beer_name, "added keg");

        Ok(Keg {
            id,
            beer_name: keg.beer_name.clone(),
            alcohol_pct: keg.alcohol_pct,
            calories_per_ounce: keg.calories_per_ounce,
            capacity_ounces: keg.capacity_ounces,
            status: KegStatus::Online,
        })
    }

    pub fn keg(&self, id: i64) -> std::result::Result<Option<Keg>, DatabaseError> {
        let keg = self
            .conn
            .query_row(
                "SELECT id, beer_name, alcohol_pct, calories_oz, capacity_ounces, status
                 FROM kegs WHERE id = ?1",
                params![id],
                keg_from_row,
            )
            .optional()?;
        Ok(keg)
    }

    /// Every keg ever tapped, ascending by id.
    pub fn list_kegs(&self) -> std::result::Result<Vec<Keg>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, beer_name, alcohol_pct, calories_oz, capacity_ounces, status
             FROM kegs ORDER BY id",
        )?;
        let rows = stmt.query_map([], keg_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn set_keg_status(
        &self,
        id: i64,
        status: KegStatus,
    ) -> std::result::Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE kegs SET status = ?1 WHERE id = ?2",
            params![status.as_str(), id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "keg",
                key: id.to_string(),
            });
        }
        info!(id, status = status.as_str(), "updated keg status");
        Ok(())
    }

    /// Record a pour and the drinker's running BAC right after it.
    ///
    /// The BAC sample is the drinker's latest sample at or before `end`,
    /// decayed to `end`, plus the pour's instant contribution. Both rows are
    /// written in one transaction.
    ///
    /// # Errors
    /// Fails on a negative volume, `end < start`, an unknown drinker or keg,
    /// or an invalid drinker profile.
    pub fn record_pour(
        &self,
        user_id: i64,
        keg_id: i64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        volume_ounces: f64,
    ) -> Result<PourRecord> {
        if !(volume_ounces.is_finite() && volume_ounces >= 0.0) {
            return Err(ValidationError::invalid_value(
                "volume_ounces",
                format!("must be a non-negative amount, got {volume_ounces}"),
            )
            .into());
        }
        let start = truncate_to_seconds(start);
        let end = truncate_to_seconds(end);
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end }.into());
        }

        let drinker = self.drinker(user_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "drinker",
            key: user_id.to_string(),
        })?;
        let keg = self.keg(keg_id)?.ok_or_else(|| DatabaseError::NotFound {
            entity: "keg",
            key: keg_id.to_string(),
        })?;

        let tx = self.conn.unchecked_transaction()?;

        let previous = self.latest_sample_at(user_id, end)?;
        let sample = bac::accumulate(
            &drinker.profile,
            previous.as_ref(),
            end,
            volume_ounces,
            keg.alcohol_pct,
        )?;

        tx.execute(
            "INSERT INTO drinks (user_id, keg_id, start_time, end_time, volume_ounces, status)
             VALUES (?1, ?2, ?3, ?4, ?5, 'valid')",
            params![
                user_id,
                keg_id,
                format_time(start),
                format_time(end),
                volume_ounces
            ],
        )?;
        let pour_id = tx.last_insert_rowid();

        tx.execute(
            "INSERT INTO bacs (user_id, drink_id, bac, rec_time) VALUES (?1, ?2, ?3, ?4)",
            params![user_id, pour_id, sample.bac, format_time(sample.sample_time)],
        )?;
        tx.commit()?;

        info!(
            pour_id,
            user = %drinker.username,
            keg_id,
            volume_ounces,
            bac = sample.bac,
            "recorded pour"
        );

        Ok(PourRecord {
            id: pour_id,
            user_id,
            keg_id: Some(keg_id),
            start_time: start,
            end_time: end,
            volume_ounces,
            recorded_bac: Some(sample),
        })
    }

    /// Mark a pour invalid so it drops out of every query.
    pub fn invalidate_pour(&self, pour_id: i64) -> std::result::Result<(), DatabaseError> {
        let changed = self.conn.execute(
            "UPDATE drinks SET status = 'invalid' WHERE id = ?1 AND status = 'valid'",
            params![pour_id],
        )?;
        if changed == 0 {
            return Err(DatabaseError::NotFound {
                entity: "pour",
                key: pour_id.to_string(),
            });
        }
        info!(pour_id, "invalidated pour");
        Ok(())
    }

    fn latest_sample_at(
        &self,
        user_id: i64,
        at: DateTime<Utc>,
    ) -> std::result::Result<Option<BacSample>, DatabaseError> {
        let sample = self
            .conn
            .query_row(
                "SELECT b.bac, b.rec_time FROM bacs b
                 JOIN drinks d ON d.id = b.drink_id
                 WHERE b.user_id = ?1 AND d.status = 'valid' AND b.rec_time <= ?2
                 ORDER BY b.rec_time DESC, b.id DESC LIMIT 1",
                params![user_id, format_time(at)],
                |row| sample_from_row(row, 0),
            )
            .optional()?;
        Ok(sample)
    }

    fn query_pours(
        &self,
        filter: &str,
        args: &[&dyn rusqlite::ToSql],
    ) -> std::result::Result<Vec<PourRecord>, DatabaseError> {
        let sql = format!(
            "SELECT {POUR_COLUMNS} FROM drinks d
             LEFT JOIN bacs b ON b.drink_id = d.id
             WHERE d.status = 'valid' {filter}
             ORDER BY d.id ASC"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, pour_from_row)?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}

impl PourSource for Database {
    fn drinker(&self, user_id: i64) -> std::result::Result<Option<Drinker>, DatabaseError> {
        let drinker = self
            .conn
            .query_row(
                "SELECT id, username, weight_lb, gender FROM drinkers WHERE id = ?1",
                params![user_id],
                drinker_from_row,
            )
            .optional()?;
        Ok(drinker)
    }

    fn pours_for_user(&self, user_id: i64) -> std::result::Result<Vec<PourRecord>, DatabaseError> {
        self.query_pours("AND d.user_id = ?1", params![user_id])
    }

    fn all_pours(&self) -> std::result::Result<Vec<PourRecord>, DatabaseError> {
        self.query_pours("", params![])
    }

    fn latest_sample(&self, user_id: i64) -> std::result::Result<Option<BacSample>, DatabaseError> {
        let sample = self
            .conn
            .query_row(
                "SELECT b.bac, b.rec_time FROM bacs b
                 JOIN drinks d ON d.id = b.drink_id
                 WHERE b.user_id = ?1 AND d.status = 'valid'
                 ORDER BY b.rec_time DESC, b.id DESC LIMIT 1",
                params![user_id],
                |row| sample_from_row(row, 0),
            )
            .optional()?;
        Ok(sample)
    }

    fn latest_samples(&self) -> std::result::Result<Vec<(i64, BacSample)>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT b.user_id, b.bac, b.rec_time FROM bacs b
             WHERE b.id = (
                 SELECT b2.id FROM bacs b2
                 JOIN drinks d2 ON d2.id = b2.drink_id
                 WHERE b2.user_id = b.user_id AND d2.status = 'valid'
                 ORDER BY b2.rec_time DESC, b2.id DESC LIMIT 1
             )
             ORDER BY b.user_id",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, sample_from_row(row, 1)?)))?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    fn kegs(&self) -> std::result::Result<Vec<Keg>, DatabaseError> {
        self.list_kegs()
    }
}

fn format_time(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn truncate_to_seconds(t: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(t.timestamp(), 0).unwrap_or(t)
}

fn parse_time(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn sample_from_row(row: &Row<'_>, first: usize) -> rusqlite::Result<BacSample> {
    let bac: f64 = row.get(first)?;
    let raw: String = row.get(first + 1)?;
    Ok(BacSample::new(bac, parse_time(first + 1, &raw)?))
}

fn drinker_from_row(row: &Row<'_>) -> rusqlite::Result<Drinker> {
    let gender_raw: String = row.get(3)?;
    let gender: Gender = gender_raw
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
    Ok(Drinker {
        id: row.get(0)?,
        username: row.get(1)?,
        profile: DrinkerProfile::new(row.get(2)?, gender),
    })
}

fn keg_from_row(row: &Row<'_>) -> rusqlite::Result<Keg> {
    let status_raw: String = row.get(5)?;
    let status: KegStatus = status_raw
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(Keg {
        id: row.get(0)?,
        beer_name: row.get(1)?,
        alcohol_pct: row.get(2)?,
        calories_per_ounce: row.get(3)?,
        capacity_ounces: row.get(4)?,
        status,
    })
}

fn pour_from_row(row: &Row<'_>) -> rusqlite::Result<PourRecord> {
    let start_raw: String = row.get(3)?;
    let end_raw: String = row.get(4)?;
    let bac: Option<f64> = row.get(6)?;
    let rec_time: Option<String> = row.get(7)?;

    let recorded_bac = match (bac, rec_time) {
        (Some(bac), Some(raw)) => Some(BacSample::new(bac, parse_time(7, &raw)?)),
        _ => None,
    };

    Ok(PourRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        keg_id: row.get(2)?,
        start_time: parse_time(3, &start_raw)?,
        end_time: parse_time(4, &end_raw)?,
        volume_ounces: row.get(5)?,
        recorded_bac,
    })
}
