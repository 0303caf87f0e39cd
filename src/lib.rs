//! nutritrack library
//!
//! Backend for a personal nutrition tracker: food logging, weight history,
//! the nutrition computation engine, and food-database lookups.

pub mod build_info;
pub mod db;
pub mod engine;
pub mod lookup;
pub mod models;
