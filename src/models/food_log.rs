//! Food log model
//!
//! A food log is one consumption event: a food, a quantity in grams, a meal
//! bucket, and the nutrient values scaled from the food's per-100g data at
//! logging time. The engine aggregates these snapshots and never re-derives
//! them from the catalog.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::{Food, NutrientTotals};

/// Meal bucket for a consumption event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All meal buckets in display order
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Parse a meal type. Unrecognized values fall back to `Snack`, the
    /// logging default, so every stored event lands in one of the four
    /// buckets.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "breakfast" => MealType::Breakfast,
            "lunch" => MealType::Lunch,
            "dinner" => MealType::Dinner,
            _ => MealType::Snack,
        }
    }
}

/// A logged consumption event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLog {
    pub id: i64,
    pub user_id: i64,
    pub food_id: i64,
    pub quantity_g: f64,
    pub meal_type: MealType,
    pub log_date: NaiveDate,
    pub logged_at: String,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub fiber: Option<f64>,
    pub sugar: Option<f64>,
    pub sodium: Option<f64>,
}

/// Data for logging a consumption event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodLogCreate {
    pub user_id: i64,
    pub food_id: i64,
    pub quantity_g: f64,
    pub meal_type: MealType,
    pub log_date: NaiveDate,
}

impl FoodLog {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_type_str: String = row.get("meal_type")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            food_id: row.get("food_id")?,
            quantity_g: row.get("quantity_g")?,
            meal_type: MealType::from_str(&meal_type_str),
            log_date: row.get("log_date")?,
            logged_at: row.get("logged_at")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            carbs: row.get("carbs")?,
            fat: row.get("fat")?,
            fiber: row.get("fiber")?,
            sugar: row.get("sugar")?,
            sodium: row.get("sodium")?,
        })
    }

    /// Nutrient values for this event with missing fields coerced to zero.
    ///
    /// This is the single place the null-to-zero rule lives; every
    /// aggregation goes through it.
    pub fn nutrients(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories.unwrap_or(0.0),
            protein: self.protein.unwrap_or(0.0),
            carbs: self.carbs.unwrap_or(0.0),
            fat: self.fat.unwrap_or(0.0),
            fiber: self.fiber.unwrap_or(0.0),
            sugar: self.sugar.unwrap_or(0.0),
            sodium: self.sodium.unwrap_or(0.0),
        }
    }

    /// Log a consumption event.
    ///
    /// Scales the food's per-100g values by `quantity_g / 100` and stores the
    /// result as the event's nutrient snapshot.
    pub fn log(conn: &Connection, data: &FoodLogCreate) -> DbResult<Self> {
        let food = Food::get_by_id(conn, data.food_id)?
            .ok_or_else(|| crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))?;

        let nutrients = food.per_100g().scale(data.quantity_g / 100.0);

        conn.execute(
            r#"
            INSERT INTO food_logs (
                user_id, food_id, quantity_g, meal_type, log_date,
                calories, protein, carbs, fat, fiber, sugar, sodium
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
            params![
                data.user_id,
                data.food_id,
                data.quantity_g,
                data.meal_type.as_str(),
                data.log_date,
                nutrients.calories,
                nutrients.protein,
                nutrients.carbs,
                nutrients.fat,
                nutrients.fiber,
                nutrients.sugar,
                nutrients.sodium,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food log by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM food_logs WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(log) => Ok(Some(log)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All events for a user on a date
    pub fn list_for_date(conn: &Connection, user_id: i64, date: NaiveDate) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_logs WHERE user_id = ?1 AND log_date = ?2 ORDER BY logged_at, id"
        )?;

        let logs = stmt
            .query_map(params![user_id, date], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Events for a user on a date in one meal bucket
    pub fn list_for_date_and_meal(
        conn: &Connection,
        user_id: i64,
        date: NaiveDate,
        meal_type: MealType,
    ) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM food_logs
             WHERE user_id = ?1 AND log_date = ?2 AND meal_type = ?3
             ORDER BY logged_at, id",
        )?;

        let logs = stmt
            .query_map(params![user_id, date, meal_type.as_str()], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(logs)
    }

    /// Delete a food log owned by the given user
    pub fn delete_for_user(conn: &Connection, id: i64, user_id: i64) -> DbResult<bool> {
        let rows = conn.execute(
            "DELETE FROM food_logs WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(rows > 0)
    }
}
