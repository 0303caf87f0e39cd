//! Storage contract consumed by the engine
//!
//! The engine never touches SQL directly; it reads through this trait. The
//! pooled SQLite connection implements it by delegating to the model layer,
//! and tests substitute an in-memory fake.

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::DbResult;
use crate::models::{FoodLog, MealType, WeightEntry};

/// Read operations the engine requires from storage
pub trait NutritionStore {
    /// All consumption events for a user on a date
    fn food_logs_for_date(&self, user_id: i64, date: NaiveDate) -> DbResult<Vec<FoodLog>>;

    /// Consumption events for a user on a date in one meal bucket
    fn food_logs_for_meal(
        &self,
        user_id: i64,
        date: NaiveDate,
        meal_type: MealType,
    ) -> DbResult<Vec<FoodLog>>;

    /// The single most recent weight entry by date, if any
    fn latest_weight_entry(&self, user_id: i64) -> DbResult<Option<WeightEntry>>;

    /// Weight entries with date >= start, ascending by date
    fn weight_entries_since(
        &self,
        user_id: i64,
        start_date: NaiveDate,
    ) -> DbResult<Vec<WeightEntry>>;
}

impl NutritionStore for Connection {
    fn food_logs_for_date(&self, user_id: i64, date: NaiveDate) -> DbResult<Vec<FoodLog>> {
        FoodLog::list_for_date(self, user_id, date)
    }

    fn food_logs_for_meal(
        &self,
        user_id: i64,
        date: NaiveDate,
        meal_type: MealType,
    ) -> DbResult<Vec<FoodLog>> {
        FoodLog::list_for_date_and_meal(self, user_id, date, meal_type)
    }

    fn latest_weight_entry(&self, user_id: i64) -> DbResult<Option<WeightEntry>> {
        WeightEntry::latest_for_user(self, user_id)
    }

    fn weight_entries_since(
        &self,
        user_id: i64,
        start_date: NaiveDate,
    ) -> DbResult<Vec<WeightEntry>> {
        WeightEntry::list_since(self, user_id, start_date)
    }
}
