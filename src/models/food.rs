//! Food catalog model
//!
//! Foods carry nutrition per 100g. Values are nullable: an unknown nutrient
//! is distinct from a zero one, and only coerces to zero when aggregated.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;
use super::NutrientTotals;

/// A food catalog record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
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
    pub created_at: String,
}

/// Data for creating a food
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoodCreate {
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

impl Food {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            barcode: row.get("barcode")?,
            name: row.get("name")?,
            brand: row.get("brand")?,
            calories_per_100g: row.get("calories_per_100g")?,
            protein_per_100g: row.get("protein_per_100g")?,
            carbs_per_100g: row.get("carbs_per_100g")?,
            fat_per_100g: row.get("fat_per_100g")?,
            fiber_per_100g: row.get("fiber_per_100g")?,
            sugar_per_100g: row.get("sugar_per_100g")?,
            sodium_per_100g: row.get("sodium_per_100g")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Per-100g nutrient values with unknown fields coerced to zero
    pub fn per_100g(&self) -> NutrientTotals {
        NutrientTotals {
            calories: self.calories_per_100g.unwrap_or(0.0),
            protein: self.protein_per_100g.unwrap_or(0.0),
            carbs: self.carbs_per_100g.unwrap_or(0.0),
            fat: self.fat_per_100g.unwrap_or(0.0),
            fiber: self.fiber_per_100g.unwrap_or(0.0),
            sugar: self.sugar_per_100g.unwrap_or(0.0),
            sodium: self.sodium_per_100g.unwrap_or(0.0),
        }
    }

    /// Create a new food
    pub fn create(conn: &Connection, data: &FoodCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO foods (
                barcode, name, brand,
                calories_per_100g, protein_per_100g, carbs_per_100g, fat_per_100g,
                fiber_per_100g, sugar_per_100g, sodium_per_100g
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                data.barcode,
                data.name,
                data.brand,
                data.calories_per_100g,
                data.protein_per_100g,
                data.carbs_per_100g,
                data.fat_per_100g,
                data.fiber_per_100g,
                data.sugar_per_100g,
                data.sodium_per_100g,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a food by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a food by barcode
    pub fn get_by_barcode(conn: &Connection, barcode: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM foods WHERE barcode = ?1")?;

        let result = stmt.query_row([barcode], Self::from_row);
        match result {
            Ok(food) => Ok(Some(food)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Search foods by name substring
    pub fn search_by_name(conn: &Connection, query: &str, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM foods WHERE name LIKE ?1 ORDER BY name LIMIT ?2"
        )?;

        let pattern = format!("%{}%", query);
        let foods = stmt
            .query_map(params![pattern, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(foods)
    }

    /// Delete a food
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM foods WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        run_migrations(&conn).expect("migrations");
        conn
    }

    #[test]
    fn test_create_and_lookup_by_barcode() {
        let conn = test_conn();

        let food = Food::create(
            &conn,
            &FoodCreate {
                barcode: Some("737628064502".to_string()),
                name: "Rice Noodles".to_string(),
                calories_per_100g: Some(385.0),
                protein_per_100g: Some(7.7),
                ..FoodCreate::default()
            },
        )
        .expect("create food");

        let found = Food::get_by_barcode(&conn, "737628064502")
            .expect("query")
            .expect("food exists");
        assert_eq!(found.id, food.id);
        assert_eq!(found.name, "Rice Noodles");
        assert_eq!(found.calories_per_100g, Some(385.0));
        assert_eq!(found.fat_per_100g, None);

        assert!(Food::get_by_barcode(&conn, "000000000000")
            .expect("query")
            .is_none());

        assert!(Food::delete(&conn, food.id).expect("delete"));
        assert!(Food::get_by_id(&conn, food.id).expect("query").is_none());
    }

    #[test]
    fn test_per_100g_coerces_unknown_to_zero() {
        let conn = test_conn();

        let food = Food::create(
            &conn,
            &FoodCreate {
                name: "Mystery Snack".to_string(),
                calories_per_100g: Some(200.0),
                ..FoodCreate::default()
            },
        )
        .expect("create food");

        let per_100g = food.per_100g();
        assert_eq!(per_100g.calories, 200.0);
        assert_eq!(per_100g.protein, 0.0);
        assert_eq!(per_100g.sodium, 0.0);
    }

    #[test]
    fn test_search_by_name() {
        let conn = test_conn();

        for name in ["Greek Yogurt", "Yogurt Drink", "Cheddar"] {
            Food::create(
                &conn,
                &FoodCreate {
                    name: name.to_string(),
                    ..FoodCreate::default()
                },
            )
            .expect("create food");
        }

        let hits = Food::search_by_name(&conn, "yogurt", 10).expect("search");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|f| f.name.to_lowercase().contains("yogurt")));
    }
}
