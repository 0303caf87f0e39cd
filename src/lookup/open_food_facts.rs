//! Open Food Facts client
//!
//! Fetches product nutrition (per 100g) by barcode or free-text search from
//! the public v0 API. A product that simply is not in the database is not an
//! error; only transport and HTTP failures are.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::models::FoodCreate;

const BASE_URL: &str = "https://world.openfoodfacts.org/api/v0";

/// Request timeout for lookups
const TIMEOUT: Duration = Duration::from_secs(10);

/// Lookup error types
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Food database request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// A food nutrition record, per 100g
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub barcode: Option<String>,
    pub name: String,
    pub brand: Option<String>,
    pub calories_per_100g: Option<f64>,
    pub protein_per_100g: Option<f64>,
    pub carbs_per_100g: Option<f64>,
    pub fat_per_100g: Option<f64>,
    pub fiber_per_100g: Option<f64>,
    pub sugar_per_100g: Option<f64>,
    pub sodium_per_100g: Option<f64>,
}

impl From<FoodRecord> for FoodCreate {
    fn from(record: FoodRecord) -> Self {
        Self {
            barcode: record.barcode,
            name: record.name,
            brand: record.brand,
            calories_per_100g: record.calories_per_100g,
            protein_per_100g: record.protein_per_100g,
            carbs_per_100g: record.carbs_per_100g,
            fat_per_100g: record.fat_per_100g,
            fiber_per_100g: record.fiber_per_100g,
            sugar_per_100g: record.sugar_per_100g,
            sodium_per_100g: record.sodium_per_100g,
        }
    }
}

/// Blocking Open Food Facts client
pub struct OpenFoodFacts {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl OpenFoodFacts {
    /// Build a client against the public API
    pub fn new() -> Result<Self, LookupError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    /// Build a client against a different base URL
    pub fn with_base_url(base_url: &str) -> Result<Self, LookupError> {
        let mut client = Self::new()?;
        client.base_url = base_url.trim_end_matches('/').to_string();
        Ok(client)
    }

    /// Fetch one product by barcode. Returns `None` when the product is not
    /// in the database.
    pub fn product_by_barcode(&self, barcode: &str) -> Result<Option<FoodRecord>, LookupError> {
        let url = format!("{}/product/{}.json", self.base_url, barcode);
        let data: Value = self
            .client
            .get(&url)
            .send()?
            .error_for_status()?
            .json()?;

        let found = data.get("status").and_then(Value::as_i64) == Some(1);
        let product = data.get("product");

        match (found, product) {
            (true, Some(product)) => {
                let name = extract_name(product)
                    .unwrap_or_else(|| "Unknown Product".to_string());
                let mut record = extract_record(product, name);
                record.barcode = Some(barcode.to_string());

                tracing::info!(barcode, "fetched product data");
                Ok(Some(record))
            }
            _ => {
                tracing::warn!(barcode, "product not found");
                Ok(None)
            }
        }
    }

    /// Search products by name. Products without a name are skipped.
    pub fn search(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<FoodRecord>, LookupError> {
        let url = format!("{}/cgi/search.pl", self.base_url);
        let page = page.to_string();
        let page_size = page_size.to_string();
        let data: Value = self
            .client
            .get(&url)
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page", page.as_str()),
                ("page_size", page_size.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;

        let products = data
            .get("products")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let records: Vec<FoodRecord> = products
            .iter()
            .filter_map(|product| {
                let name = extract_name(product)?;
                Some(extract_record(product, name))
            })
            .collect();

        tracing::info!(query, count = records.len(), "searched products");
        Ok(records)
    }
}

/// Non-empty product name, if present
fn extract_name(product: &Value) -> Option<String> {
    product
        .get("product_name")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First listed brand, if any
fn extract_brand(product: &Value) -> Option<String> {
    product
        .get("brands")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .and_then(|brands| brands.split(',').next())
        .map(|brand| brand.trim().to_string())
}

/// Map an API product object into a record
fn extract_record(product: &Value, name: String) -> FoodRecord {
    let null = Value::Null;
    let nutriments = product.get("nutriments").unwrap_or(&null);

    FoodRecord {
        barcode: product
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string),
        name,
        brand: extract_brand(product),
        calories_per_100g: nutrient(nutriments, "energy-kcal_100g"),
        protein_per_100g: nutrient(nutriments, "proteins_100g"),
        carbs_per_100g: nutrient(nutriments, "carbohydrates_100g"),
        fat_per_100g: nutrient(nutriments, "fat_100g"),
        fiber_per_100g: nutrient(nutriments, "fiber_100g"),
        sugar_per_100g: nutrient(nutriments, "sugars_100g"),
        sodium_per_100g: nutrient(nutriments, "sodium_100g"),
    }
}

fn nutrient(nutriments: &Value, key: &str) -> Option<f64> {
    nutriments.get(key).and_then(Value::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_record_maps_nutriments() {
        let product = json!({
            "code": "737628064502",
            "product_name": "Rice Noodles",
            "brands": "Thai Kitchen, Simply Asia",
            "nutriments": {
                "energy-kcal_100g": 385.0,
                "proteins_100g": 7.7,
                "carbohydrates_100g": 85.0,
                "fat_100g": 0.5,
                "fiber_100g": 1.9,
                "sugars_100g": 0.2,
                "sodium_100g": 0.7
            }
        });

        let name = extract_name(&product).expect("name present");
        let record = extract_record(&product, name);

        assert_eq!(record.barcode.as_deref(), Some("737628064502"));
        assert_eq!(record.name, "Rice Noodles");
        assert_eq!(record.brand.as_deref(), Some("Thai Kitchen"));
        assert_eq!(record.calories_per_100g, Some(385.0));
        assert_eq!(record.protein_per_100g, Some(7.7));
        assert_eq!(record.sodium_per_100g, Some(0.7));
    }

    #[test]
    fn test_extract_record_tolerates_missing_fields() {
        let product = json!({
            "product_name": "Mystery Snack"
        });

        let record = extract_record(&product, "Mystery Snack".to_string());

        assert_eq!(record.barcode, None);
        assert_eq!(record.brand, None);
        assert_eq!(record.calories_per_100g, None);
        assert_eq!(record.fiber_per_100g, None);
    }

    #[test]
    fn test_extract_name_rejects_empty() {
        assert_eq!(extract_name(&json!({"product_name": ""})), None);
        assert_eq!(extract_name(&json!({})), None);
        assert_eq!(
            extract_name(&json!({"product_name": "Oats"})).as_deref(),
            Some("Oats")
        );
    }

    #[test]
    fn test_food_create_from_record() {
        let record = FoodRecord {
            barcode: Some("123".to_string()),
            name: "Oats".to_string(),
            calories_per_100g: Some(389.0),
            ..FoodRecord::default()
        };

        let create = FoodCreate::from(record);
        assert_eq!(create.barcode.as_deref(), Some("123"));
        assert_eq!(create.name, "Oats");
        assert_eq!(create.calories_per_100g, Some(389.0));
        assert_eq!(create.protein_per_100g, None);
    }
}
