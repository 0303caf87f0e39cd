//! External food data capabilities
//!
//! Open Food Facts lookups (barcode and free-text search, nutrition per
//! 100g) and the food-recognition contract. Both feed the food catalog;
//! neither is consumed by the engine directly.

pub mod open_food_facts;
pub mod recognition;

pub use open_food_facts::{FoodRecord, LookupError, OpenFoodFacts};
pub use recognition::{CommonFoodRecognizer, FoodRecognizer};
