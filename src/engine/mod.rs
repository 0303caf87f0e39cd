//! Nutrition computation engine
//!
//! Pure calculations over logged data: energy expenditure estimates, daily
//! goal tracking, meal breakdowns, weight trends, and rule-based
//! recommendations. The engine owns no state and reads everything through
//! the [`NutritionStore`] collaborator; storage failures propagate unmodified
//! and every missing input degrades to a documented default instead of an
//! error.

pub mod calculator;
pub mod recommendations;
pub mod store;

pub use calculator::{
    calculate_bmr, calculate_tdee, daily_summary, daily_summary_for, latest_weight,
    meal_breakdown, weight_progress, weight_progress_as_of, DailyGoals, DailySummary,
    GoalPercentages, MealBreakdown, MealTotals, WeightPoint, WeightProgress, WeightTrend,
};
pub use recommendations::{
    fitness_recommendations, fitness_recommendations_as_of, Priority, Recommendation,
    RecommendationKind,
};
pub use store::NutritionStore;

/// Today's date in the local timezone
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for engine tests: an in-memory store fake and
    //! builders for profiles, log events, and weight entries.

    use chrono::NaiveDate;

    use crate::db::DbResult;
    use crate::models::{
        ActivityLevel, FoodLog, Goal, MealType, Sex, UserProfile, WeightEntry,
    };

    use super::store::NutritionStore;

    /// In-memory `NutritionStore` backed by plain vectors
    #[derive(Default)]
    pub struct FakeStore {
        pub logs: Vec<FoodLog>,
        pub weights: Vec<WeightEntry>,
    }

    impl NutritionStore for FakeStore {
        fn food_logs_for_date(&self, user_id: i64, date: NaiveDate) -> DbResult<Vec<FoodLog>> {
            Ok(self
                .logs
                .iter()
                .filter(|l| l.user_id == user_id && l.log_date == date)
                .cloned()
                .collect())
        }

        fn food_logs_for_meal(
            &self,
            user_id: i64,
            date: NaiveDate,
            meal_type: MealType,
        ) -> DbResult<Vec<FoodLog>> {
            Ok(self
                .logs
                .iter()
                .filter(|l| {
                    l.user_id == user_id && l.log_date == date && l.meal_type == meal_type
                })
                .cloned()
                .collect())
        }

        fn latest_weight_entry(&self, user_id: i64) -> DbResult<Option<WeightEntry>> {
            Ok(self
                .weights
                .iter()
                .filter(|w| w.user_id == user_id)
                .max_by_key(|w| w.entry_date)
                .cloned())
        }

        fn weight_entries_since(
            &self,
            user_id: i64,
            start_date: NaiveDate,
        ) -> DbResult<Vec<WeightEntry>> {
            let mut entries: Vec<WeightEntry> = self
                .weights
                .iter()
                .filter(|w| w.user_id == user_id && w.entry_date >= start_date)
                .cloned()
                .collect();
            entries.sort_by_key(|w| w.entry_date);
            Ok(entries)
        }
    }

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
    }

    /// A fully specified profile (id 1) for formula tests
    pub fn full_profile(
        age: i64,
        sex: Sex,
        height_cm: f64,
        activity_level: Option<ActivityLevel>,
        goal: Option<Goal>,
    ) -> UserProfile {
        UserProfile {
            id: 1,
            email: None,
            name: None,
            age: Some(age),
            sex: Some(sex),
            height_cm: Some(height_cm),
            activity_level,
            goal,
            daily_calorie_goal: 2000,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// A profile missing the fields BMR needs, forcing the 2000 default
    pub fn sparse_profile(activity_level: Option<ActivityLevel>, goal: Option<Goal>) -> UserProfile {
        UserProfile {
            id: 1,
            email: None,
            name: None,
            age: None,
            sex: None,
            height_cm: None,
            activity_level,
            goal,
            daily_calorie_goal: 2000,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// A log event for user 1 with explicit macro values
    pub fn event(
        log_date: NaiveDate,
        meal_type: MealType,
        calories: f64,
        protein: f64,
        carbs: f64,
        fat: f64,
    ) -> FoodLog {
        FoodLog {
            id: 0,
            user_id: 1,
            food_id: 1,
            quantity_g: 100.0,
            meal_type,
            log_date,
            logged_at: String::new(),
            calories: Some(calories),
            protein: Some(protein),
            carbs: Some(carbs),
            fat: Some(fat),
            fiber: None,
            sugar: None,
            sodium: None,
        }
    }

    /// A weight entry for user 1
    pub fn weight(entry_date: NaiveDate, weight_kg: f64) -> WeightEntry {
        WeightEntry {
            id: 0,
            user_id: 1,
            weight_kg,
            entry_date,
            created_at: String::new(),
        }
    }
}
