//! Weight entry model
//!
//! One body-weight measurement per user per date. Recording twice on the
//! same date replaces the earlier value.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// A body-weight measurement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: i64,
    pub user_id: i64,
    pub weight_kg: f64,
    pub entry_date: NaiveDate,
    pub created_at: String,
}

impl WeightEntry {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            weight_kg: row.get("weight_kg")?,
            entry_date: row.get("entry_date")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Record a weight for a date (upsert on (user, date))
    pub fn record(
        conn: &Connection,
        user_id: i64,
        weight_kg: f64,
        entry_date: NaiveDate,
    ) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO weight_entries (user_id, weight_kg, entry_date)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(user_id, entry_date) DO UPDATE SET
                weight_kg = excluded.weight_kg
            "#,
            params![user_id, weight_kg, entry_date],
        )?;

        Self::get_for_date(conn, user_id, entry_date)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get the entry for a specific date
    pub fn get_for_date(
        conn: &Connection,
        user_id: i64,
        entry_date: NaiveDate,
    ) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries WHERE user_id = ?1 AND entry_date = ?2"
        )?;

        let result = stmt.query_row(params![user_id, entry_date], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent entry by date for a user
    pub fn latest_for_user(conn: &Connection, user_id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY entry_date DESC LIMIT 1"
        )?;

        let result = stmt.query_row([user_id], Self::from_row);
        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Entries with date >= start, ascending by date
    pub fn list_since(
        conn: &Connection,
        user_id: i64,
        start_date: NaiveDate,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries
             WHERE user_id = ?1 AND entry_date >= ?2
             ORDER BY entry_date",
        )?;

        let entries = stmt
            .query_map(params![user_id, start_date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// All entries for a user, ascending by date
    pub fn list_for_user(conn: &Connection, user_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM weight_entries WHERE user_id = ?1 ORDER BY entry_date"
        )?;

        let entries = stmt
            .query_map([user_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Delete an entry owned by the given user
    pub fn delete_for_user(conn: &Connection, id: i64, user_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM weight_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
