//! Food recognition contract
//!
//! The application only needs a name guess for an image plus name-based
//! suggestions; wiring in a real vision backend means implementing
//! [`FoodRecognizer`]. The shipped implementor is a placeholder that answers
//! from a fixed common-food list.

use rand::seq::SliceRandom;

/// Maximum number of suggestions returned for a partial name
const MAX_SUGGESTIONS: usize = 10;

/// Foods the placeholder recognizer can report from an image
const RECOGNIZABLE_FOODS: &[&str] = &[
    "apple", "banana", "orange", "bread", "chicken breast",
    "rice", "pasta", "salad", "sandwich", "pizza",
    "yogurt", "milk", "eggs", "cheese", "vegetables",
];

/// Foods offered as name-based suggestions
const SUGGESTIBLE_FOODS: &[&str] = &[
    "apple", "apricot", "avocado", "banana", "bread", "broccoli",
    "chicken breast", "chicken thigh", "rice", "brown rice", "pasta",
    "whole wheat pasta", "salad", "caesar salad", "sandwich", "pizza",
    "yogurt", "greek yogurt", "milk", "almond milk", "eggs", "cheese",
    "cheddar cheese", "vegetables", "mixed vegetables", "salmon",
    "tuna", "beef", "pork", "turkey", "quinoa", "oats", "almonds",
    "walnuts", "strawberries", "blueberries", "spinach", "carrots",
];

/// A capability that turns an image into a food-name guess and a partial
/// name into suggestions
pub trait FoodRecognizer {
    /// Guess the food shown in the image, if any
    fn recognize(&self, image_bytes: &[u8]) -> Option<String>;

    /// Food name suggestions for a partial name
    fn suggestions(&self, partial_name: &str) -> Vec<String>;
}

/// Placeholder recognizer answering from the common-food list
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonFoodRecognizer;

impl FoodRecognizer for CommonFoodRecognizer {
    fn recognize(&self, _image_bytes: &[u8]) -> Option<String> {
        let mut rng = rand::thread_rng();
        RECOGNIZABLE_FOODS
            .choose(&mut rng)
            .map(|food| (*food).to_string())
    }

    fn suggestions(&self, partial_name: &str) -> Vec<String> {
        if partial_name.is_empty() {
            return SUGGESTIBLE_FOODS
                .iter()
                .take(MAX_SUGGESTIONS)
                .map(|food| (*food).to_string())
                .collect();
        }

        let needle = partial_name.to_lowercase();
        SUGGESTIBLE_FOODS
            .iter()
            .filter(|food| food.contains(&needle))
            .take(MAX_SUGGESTIONS)
            .map(|food| (*food).to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognize_returns_a_known_food() {
        let recognizer = CommonFoodRecognizer;
        let guess = recognizer.recognize(&[0u8; 16]).expect("a guess");
        assert!(RECOGNIZABLE_FOODS.contains(&guess.as_str()));
    }

    #[test]
    fn test_suggestions_filter_by_substring() {
        let recognizer = CommonFoodRecognizer;

        let hits = recognizer.suggestions("chick");
        assert_eq!(hits, vec!["chicken breast", "chicken thigh"]);

        let hits = recognizer.suggestions("YOGURT");
        assert_eq!(hits, vec!["yogurt", "greek yogurt"]);
    }

    #[test]
    fn test_suggestions_are_capped() {
        let recognizer = CommonFoodRecognizer;

        let empty = recognizer.suggestions("");
        assert_eq!(empty.len(), MAX_SUGGESTIONS);

        let vowels = recognizer.suggestions("a");
        assert!(vowels.len() <= MAX_SUGGESTIONS);
    }
}
