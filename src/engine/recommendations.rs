//! Rule-based fitness recommendations
//!
//! A fixed, ordered rule list over today's nutrition summary and the 30-day
//! weight trend. Every call re-reads both inputs so the output always
//! reflects current data; nothing is cached between rules or calls.

use chrono::NaiveDate;
use serde::Serialize;

use crate::db::DbResult;
use crate::models::{Goal, UserProfile};

use super::calculator::{daily_summary_for, weight_progress_as_of, WeightTrend};
use super::store::NutritionStore;
use super::today;

/// Window for the weight trend input (days).
const PROGRESS_WINDOW_DAYS: i64 = 30;

/// Calorie percentage below which the under-eating rule fires.
const UNDER_EATING_PCT: f64 = 80.0;

/// Calorie percentage above which the over-eating rule fires.
const OVER_EATING_PCT: f64 = 120.0;

/// Protein percentage below which the protein rule fires.
const LOW_PROTEIN_PCT: f64 = 80.0;

const UNDER_EATING_MSG: &str =
    "You may be under-eating. Consider adding healthy snacks to meet your calorie goals.";
const OVER_EATING_MSG: &str = "You're consuming more calories than your goal. Try reducing portion sizes or choosing lower-calorie options.";
const LOW_PROTEIN_MSG: &str =
    "Increase your protein intake with lean meats, eggs, beans, or protein shakes.";
const LOSE_WEIGHT_EXERCISE_MSG: &str =
    "Combine cardio exercises (30 min walking/running) with strength training 3-4 times per week.";
const GAIN_WEIGHT_EXERCISE_MSG: &str =
    "Focus on strength training and resistance exercises to build muscle mass.";
const BALANCED_EXERCISE_MSG: &str = "Maintain a balanced routine with 150 minutes of moderate cardio per week plus strength training.";
const GAINING_ON_CUT_MSG: &str =
    "Your weight is trending upward. Consider reviewing your calorie intake and exercise routine.";
const LOSING_ON_BULK_MSG: &str =
    "Your weight is decreasing. Make sure you're eating enough calories to support your goals.";
const HYDRATION_MSG: &str = "Don't forget to stay hydrated! Aim for 8-10 glasses of water per day.";

/// Recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    Nutrition,
    Exercise,
    Warning,
    General,
}

/// Recommendation priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A single recommendation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub message: String,
    pub priority: Priority,
}

impl Recommendation {
    fn new(kind: RecommendationKind, message: &str, priority: Priority) -> Self {
        Self {
            kind,
            message: message.to_string(),
            priority,
        }
    }
}

/// Recommendations from today's data
pub fn fitness_recommendations<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
) -> DbResult<Vec<Recommendation>> {
    fitness_recommendations_as_of(store, profile, today())
}

/// Recommendations as of an explicit date.
///
/// Output order is the rule order; entries are never sorted by priority.
pub fn fitness_recommendations_as_of<S: NutritionStore + ?Sized>(
    store: &S,
    profile: &UserProfile,
    as_of: NaiveDate,
) -> DbResult<Vec<Recommendation>> {
    let summary = daily_summary_for(store, profile, as_of)?;
    let progress = weight_progress_as_of(store, profile.id, PROGRESS_WINDOW_DAYS, as_of)?;

    let mut recommendations = Vec::new();

    // Calorie intake vs goal
    if summary.percentages.calories < UNDER_EATING_PCT {
        recommendations.push(Recommendation::new(
            RecommendationKind::Nutrition,
            UNDER_EATING_MSG,
            Priority::Medium,
        ));
    } else if summary.percentages.calories > OVER_EATING_PCT {
        recommendations.push(Recommendation::new(
            RecommendationKind::Nutrition,
            OVER_EATING_MSG,
            Priority::High,
        ));
    }

    // Protein intake
    if summary.percentages.protein < LOW_PROTEIN_PCT {
        recommendations.push(Recommendation::new(
            RecommendationKind::Nutrition,
            LOW_PROTEIN_MSG,
            Priority::Medium,
        ));
    }

    // Exactly one exercise recommendation, chosen by goal
    let exercise = match profile.goal {
        Some(Goal::LoseWeight) => {
            Recommendation::new(RecommendationKind::Exercise, LOSE_WEIGHT_EXERCISE_MSG, Priority::High)
        }
        Some(Goal::GainWeight) => {
            Recommendation::new(RecommendationKind::Exercise, GAIN_WEIGHT_EXERCISE_MSG, Priority::High)
        }
        _ => Recommendation::new(RecommendationKind::Exercise, BALANCED_EXERCISE_MSG, Priority::Medium),
    };
    recommendations.push(exercise);

    // Weight trend vs goal
    if progress.trend == WeightTrend::Increasing && profile.goal == Some(Goal::LoseWeight) {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            GAINING_ON_CUT_MSG,
            Priority::High,
        ));
    } else if progress.trend == WeightTrend::Decreasing && profile.goal == Some(Goal::GainWeight) {
        recommendations.push(Recommendation::new(
            RecommendationKind::Warning,
            LOSING_ON_BULK_MSG,
            Priority::High,
        ));
    }

    // Hydration reminder is always last
    recommendations.push(Recommendation::new(
        RecommendationKind::General,
        HYDRATION_MSG,
        Priority::Low,
    ));

    Ok(recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{date, event, sparse_profile, weight, FakeStore};
    use crate::models::{ActivityLevel, MealType};

    /// Over-eating + low protein + lose_weight goal + rising weight: all five
    /// rules fire, in rule order.
    #[test]
    fn test_full_rule_set_in_order() {
        let day = date("2025-06-10");

        // Sparse profile + sedentary: TDEE 2400, lose_weight goal -> 1900.
        // 2850 kcal is 150% of goal; protein goal is 118.75 g, 71.25 g is 60%.
        let store = FakeStore {
            logs: vec![event(day, MealType::Lunch, 2850.0, 71.25, 0.0, 0.0)],
            weights: vec![
                weight(date("2025-06-01"), 70.0),
                weight(date("2025-06-09"), 72.0),
            ],
        };
        let profile = sparse_profile(Some(ActivityLevel::Sedentary), Some(Goal::LoseWeight));

        let recs = fitness_recommendations_as_of(&store, &profile, day).expect("recommendations");

        assert_eq!(recs.len(), 5);

        assert_eq!(recs[0].kind, RecommendationKind::Nutrition);
        assert_eq!(recs[0].message, OVER_EATING_MSG);
        assert_eq!(recs[0].priority, Priority::High);

        assert_eq!(recs[1].kind, RecommendationKind::Nutrition);
        assert_eq!(recs[1].message, LOW_PROTEIN_MSG);
        assert_eq!(recs[1].priority, Priority::Medium);

        assert_eq!(recs[2].kind, RecommendationKind::Exercise);
        assert_eq!(recs[2].message, LOSE_WEIGHT_EXERCISE_MSG);
        assert_eq!(recs[2].priority, Priority::High);

        assert_eq!(recs[3].kind, RecommendationKind::Warning);
        assert_eq!(recs[3].message, GAINING_ON_CUT_MSG);
        assert_eq!(recs[3].priority, Priority::High);

        assert_eq!(recs[4].kind, RecommendationKind::General);
        assert_eq!(recs[4].message, HYDRATION_MSG);
        assert_eq!(recs[4].priority, Priority::Low);
    }

    #[test]
    fn test_under_eating_with_adequate_protein() {
        let day = date("2025-06-10");

        // Maintain goal at TDEE 2400: protein goal 150 g.
        // 1000 kcal is under 80%; 140 g protein is over 80%.
        let store = FakeStore {
            logs: vec![event(day, MealType::Dinner, 1000.0, 140.0, 0.0, 0.0)],
            weights: vec![
                weight(date("2025-06-01"), 70.0),
                weight(date("2025-06-09"), 70.1),
            ],
        };
        let profile = sparse_profile(Some(ActivityLevel::Sedentary), Some(Goal::Maintain));

        let recs = fitness_recommendations_as_of(&store, &profile, day).expect("recommendations");

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].message, UNDER_EATING_MSG);
        assert_eq!(recs[1].message, BALANCED_EXERCISE_MSG);
        assert_eq!(recs[1].priority, Priority::Medium);
        assert_eq!(recs[2].message, HYDRATION_MSG);
    }

    #[test]
    fn test_losing_weight_on_gain_goal_warns() {
        let day = date("2025-06-10");

        // Gain goal: TDEE 2400 + 300 = 2700; eat right at goal so neither
        // calorie rule fires, with plenty of protein.
        let store = FakeStore {
            logs: vec![event(day, MealType::Dinner, 2700.0, 170.0, 0.0, 0.0)],
            weights: vec![
                weight(date("2025-06-01"), 70.0),
                weight(date("2025-06-09"), 68.5),
            ],
        };
        let profile = sparse_profile(Some(ActivityLevel::Sedentary), Some(Goal::GainWeight));

        let recs = fitness_recommendations_as_of(&store, &profile, day).expect("recommendations");

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].message, GAIN_WEIGHT_EXERCISE_MSG);
        assert_eq!(recs[1].kind, RecommendationKind::Warning);
        assert_eq!(recs[1].message, LOSING_ON_BULK_MSG);
        assert_eq!(recs[2].message, HYDRATION_MSG);
    }

    #[test]
    fn test_no_goal_gets_balanced_exercise_and_no_warning() {
        let day = date("2025-06-10");

        // No goal: TDEE 2400 is the calorie goal; eat 100% of it.
        let store = FakeStore {
            logs: vec![event(day, MealType::Lunch, 2400.0, 150.0, 0.0, 0.0)],
            weights: vec![
                weight(date("2025-06-01"), 70.0),
                weight(date("2025-06-09"), 75.0),
            ],
        };
        let profile = sparse_profile(Some(ActivityLevel::Sedentary), None);

        let recs = fitness_recommendations_as_of(&store, &profile, day).expect("recommendations");

        // Rising weight without a lose_weight goal produces no warning
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].message, BALANCED_EXERCISE_MSG);
        assert_eq!(recs[1].message, HYDRATION_MSG);
    }
}
