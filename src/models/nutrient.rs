//! Shared nutrient totals structure
//!
//! Used for single consumption events and for aggregated daily sums.

use serde::{Deserialize, Serialize};

/// Nutrient values for a logged quantity of food
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutrientTotals {
    pub calories: f64,
    pub protein: f64, // grams
    pub carbs: f64,   // grams
    pub fat: f64,     // grams
    pub fiber: f64,   // grams
    pub sugar: f64,   // grams
    pub sodium: f64,  // milligrams
}

impl NutrientTotals {
    /// All-zero totals
    pub fn zero() -> Self {
        Self::default()
    }

    /// Scale every field by a multiplier
    pub fn scale(&self, multiplier: f64) -> Self {
        Self {
            calories: self.calories * multiplier,
            protein: self.protein * multiplier,
            carbs: self.carbs * multiplier,
            fat: self.fat * multiplier,
            fiber: self.fiber * multiplier,
            sugar: self.sugar * multiplier,
            sodium: self.sodium * multiplier,
        }
    }

    /// Round every field to one decimal place
    pub fn rounded(&self) -> Self {
        Self {
            calories: round1(self.calories),
            protein: round1(self.protein),
            carbs: round1(self.carbs),
            fat: round1(self.fat),
            fiber: round1(self.fiber),
            sugar: round1(self.sugar),
            sodium: round1(self.sodium),
        }
    }
}

impl std::ops::Add for NutrientTotals {
    type Output = NutrientTotals;

    fn add(self, other: NutrientTotals) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: self.sugar + other.sugar,
            sodium: self.sodium + other.sodium,
        }
    }
}

impl std::iter::Sum for NutrientTotals {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(NutrientTotals::zero(), |acc, n| acc + n)
    }
}

/// Round to one decimal place, half away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_totals() {
        let a = NutrientTotals {
            calories: 300.0,
            protein: 20.0,
            ..NutrientTotals::zero()
        };
        let b = NutrientTotals {
            calories: 150.5,
            fat: 10.0,
            ..NutrientTotals::zero()
        };

        let total: NutrientTotals = [a, b].into_iter().sum();
        assert_eq!(total.calories, 450.5);
        assert_eq!(total.protein, 20.0);
        assert_eq!(total.fat, 10.0);
        assert_eq!(total.carbs, 0.0);
    }

    #[test]
    fn test_scale() {
        let per_100g = NutrientTotals {
            calories: 52.0,
            carbs: 14.0,
            ..NutrientTotals::zero()
        };
        let scaled = per_100g.scale(1.5);
        assert_eq!(scaled.calories, 78.0);
        assert_eq!(scaled.carbs, 21.0);
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(1780.177), 1780.2);
        assert_eq!(round1(66.666), 66.7);
        assert_eq!(round1(-0.25), -0.3);
        assert_eq!(round1(0.0), 0.0);
    }
}
