//! Energy and goal calculations
//!
//! BMR via Harris-Benedict, TDEE via activity scaling, daily summaries with
//! macro goals and percentage tracking, per-meal breakdowns, and weight-trend
//! analysis.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::db::DbResult;
use crate::models::{round1, FoodLog, MealType, NutrientTotals, Sex, UserProfile};

use super::store::NutritionStore;
use super::today;

/// BMR returned when the profile or weight history cannot support the
/// Harris-Benedict formula (kcal/day).
const DEFAULT_BMR: f64 = 2000.0;

/// Fraction of the calorie goal allotted to each macronutrient.
const PROTEIN_CALORIE_SHARE: f64 = 0.25;
const CARBS_CALORIE_SHARE: f64 = 0.45;
const FAT_CALORIE_SHARE: f64 = 0.30;

/// Energy density per gram of macronutrient (kcal/g).
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Weight-change magnitude below which a trend counts as stable (kg).
const STABLE_THRESHOLD_KG: f64 = 0.5;

/// Harris-Benedict coefficients.
mod harris_benedict {
    pub mod male {
        pub const BASE: f64 = 88.362;
        pub const WEIGHT: f64 = 13.397;
        pub const HEIGHT: f64 = 4.799;
        pub const AGE: f64 = 5.677;
    }

    /// Applied to every non-male profile.
    pub mod other {
        pub const BASE: f64 = 447.593;
        pub const WEIGHT: f64 = 9.247;
        pub const HEIGHT: f64 = 3.098;
        pub const AGE: f64 = 4.330;
    }
}

/// Basal Metabolic Rate in kcal/day.
///
/// Falls back to 2000 when age, sex, or height is missing, or when no weight
/// is supplied and none can be resolved from the weight history. The result
/// is not clamped; extreme inputs produce extreme outputs.
pub fn calculate_bmr<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
    current_weight_kg: Option<f64>,
) -> DbResult<f64> {
    let (age, sex, height_cm) = match (profile.age, profile.sex, profile.height_cm) {
        (Some(age), Some(sex), Some(height_cm)) => (age as f64, sex, height_cm),
        _ => return Ok(DEFAULT_BMR),
    };

    let weight_kg = match current_weight_kg {
        Some(w) => Some(w),
        None => latest_weight(store, profile.id)?,
    };
    let weight_kg = match weight_kg {
        Some(w) => w,
        None => return Ok(DEFAULT_BMR),
    };

    let bmr = match sex {
        Sex::Male => {
            harris_benedict::male::BASE + harris_benedict::male::WEIGHT * weight_kg
                + harris_benedict::male::HEIGHT * height_cm
                - harris_benedict::male::AGE * age
        }
        _ => {
            harris_benedict::other::BASE + harris_benedict::other::WEIGHT * weight_kg
                + harris_benedict::other::HEIGHT * height_cm
                - harris_benedict::other::AGE * age
        }
    };

    Ok(bmr)
}

/// Total Daily Energy Expenditure: BMR scaled by the activity multiplier.
/// An unset activity level scales by the lightly-active default.
pub fn calculate_tdee<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
    current_weight_kg: Option<f64>,
) -> DbResult<f64> {
    let bmr = calculate_bmr(store, profile, current_weight_kg)?;
    let multiplier = profile.activity_level.unwrap_or_default().multiplier();
    Ok(bmr * multiplier)
}

/// The user's most recent recorded weight, if any
pub fn latest_weight<S: NutritionStore + ?Sized>(
    store: &S,
    user_id: i64,
) -> DbResult<Option<f64>> {
    Ok(store.latest_weight_entry(user_id)?.map(|e| e.weight_kg))
}

/// Calorie and macro goals for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGoals {
    pub calories: i64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Consumed totals as a percentage of each goal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalPercentages {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Macro totals for one meal bucket
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Per-meal macro breakdown. Every bucket is present; meals without events
/// carry all-zero totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MealBreakdown {
    pub breakfast: MealTotals,
    pub lunch: MealTotals,
    pub dinner: MealTotals,
    pub snack: MealTotals,
}

impl MealBreakdown {
    /// Totals for one meal bucket
    pub fn for_meal(&self, meal_type: MealType) -> &MealTotals {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
            MealType::Snack => &self.snack,
        }
    }
}

/// Nutrition summary for one day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub totals: NutrientTotals,
    pub goals: DailyGoals,
    pub percentages: GoalPercentages,
    pub meal_breakdown: MealBreakdown,
}

/// Nutrition summary for a date, defaulting to today
pub fn daily_summary<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
    target_date: Option<NaiveDate>,
) -> DbResult<DailySummary> {
    daily_summary_for(store, profile, target_date.unwrap_or_else(today))
}

/// Nutrition summary for an explicit date
pub fn daily_summary_for<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
    date: NaiveDate,
) -> DbResult<DailySummary> {
    let logs = store.food_logs_for_date(profile.id, date)?;
    let totals: NutrientTotals = logs.iter().map(FoodLog::nutrients).sum();

    let current_weight = latest_weight(store, profile.id)?;
    let tdee = calculate_tdee(store, profile, current_weight)?;

    let adjustment = profile.goal.map_or(0.0, |g| g.calorie_adjustment());
    let calorie_goal = tdee + adjustment;

    let (protein_goal, carbs_goal, fat_goal) = macro_goals(calorie_goal);

    let percentages = GoalPercentages {
        calories: percentage_of(totals.calories, calorie_goal),
        protein: percentage_of(totals.protein, protein_goal),
        carbs: percentage_of(totals.carbs, carbs_goal),
        fat: percentage_of(totals.fat, fat_goal),
    };

    Ok(DailySummary {
        date,
        totals: totals.rounded(),
        goals: DailyGoals {
            calories: calorie_goal.round() as i64,
            protein: round1(protein_goal),
            carbs: round1(carbs_goal),
            fat: round1(fat_goal),
        },
        percentages,
        meal_breakdown: meal_breakdown(store, profile.id, date)?,
    })
}

/// Per-meal macro breakdown for a date
pub fn meal_breakdown<S: NutritionStore + ?Sized>(
    store: &S,
    user_id: i64,
    date: NaiveDate,
) -> DbResult<MealBreakdown> {
    Ok(MealBreakdown {
        breakfast: meal_totals(store, user_id, date, MealType::Breakfast)?,
        lunch: meal_totals(store, user_id, date, MealType::Lunch)?,
        dinner: meal_totals(store, user_id, date, MealType::Dinner)?,
        snack: meal_totals(store, user_id, date, MealType::Snack)?,
    })
}

/// Fetch one meal bucket's events and sum their macros
fn meal_totals<S: NutritionStore + ?Sized>(
    store: &S,
    user_id: i64,
    date: NaiveDate,
    meal_type: MealType,
) -> DbResult<MealTotals> {
    let logs = store.food_logs_for_meal(user_id, date, meal_type)?;
    let total: NutrientTotals = logs.iter().map(FoodLog::nutrients).sum();

    Ok(MealTotals {
        calories: total.calories,
        protein: total.protein,
        carbs: total.carbs,
        fat: total.fat,
    })
}

/// Raw (unrounded) macro goals derived from a calorie goal
fn macro_goals(calorie_goal: f64) -> (f64, f64, f64) {
    (
        calorie_goal * PROTEIN_CALORIE_SHARE / KCAL_PER_G_PROTEIN,
        calorie_goal * CARBS_CALORIE_SHARE / KCAL_PER_G_CARBS,
        calorie_goal * FAT_CALORIE_SHARE / KCAL_PER_G_FAT,
    )
}

/// Percentage of goal reached, one decimal. A goal of zero or less reports 0.
fn percentage_of(total: f64, goal: f64) -> f64 {
    if goal > 0.0 {
        round1(total / goal * 100.0)
    } else {
        0.0
    }
}

/// Direction of the weight trend over a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightTrend {
    NoData,
    InsufficientData,
    Stable,
    Increasing,
    Decreasing,
}

/// One (date, weight) sample in a progress window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

/// Weight history over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightProgress {
    pub entries: Vec<WeightPoint>,
    pub trend: WeightTrend,
    pub change: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_weight: Option<f64>,
}

/// Weight progress over the trailing `days` ending today
pub fn weight_progress<S: NutritionStore + ?Sized>(
    store: &S,
    user_id: i64,
    days: i64,
) -> DbResult<WeightProgress> {
    weight_progress_as_of(store, user_id, days, today())
}

/// Weight progress over the trailing `days` ending at an explicit date.
///
/// The change is measured between the chronologically first and last entries
/// inside the window, not the minimum and maximum.
pub fn weight_progress_as_of<S: NutritionStore + ?Sized>(
    store: &S,
    user_id: i64,
    days: i64,
    as_of: NaiveDate,
) -> DbResult<WeightProgress> {
    let start_date = as_of - Duration::days(days);
    let entries = store.weight_entries_since(user_id, start_date)?;

    if entries.is_empty() {
        return Ok(WeightProgress {
            entries: Vec::new(),
            trend: WeightTrend::NoData,
            change: 0.0,
            latest_weight: None,
        });
    }

    let points: Vec<WeightPoint> = entries
        .iter()
        .map(|e| WeightPoint {
            date: e.entry_date,
            weight: e.weight_kg,
        })
        .collect();

    let latest_weight = entries.last().map(|e| e.weight_kg);

    let (trend, change) = if entries.len() >= 2 {
        let first = entries[0].weight_kg;
        let last = entries[entries.len() - 1].weight_kg;
        let change = last - first;

        let trend = if change.abs() < STABLE_THRESHOLD_KG {
            WeightTrend::Stable
        } else if change > 0.0 {
            WeightTrend::Increasing
        } else {
            WeightTrend::Decreasing
        };

        (trend, change)
    } else {
        (WeightTrend::InsufficientData, 0.0)
    };

    Ok(WeightProgress {
        entries: points,
        trend,
        change: round1(change),
        latest_weight,
    })
}
