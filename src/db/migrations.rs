//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    Ok(())
}

/// Current schema version applied by the latest migration
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Migration v1: Initial schema
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- USERS
        -- Profile data used to compute energy targets
        -- ============================================
        CREATE TABLE users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT UNIQUE,
            name TEXT,

            -- Profile fields feeding the engine (all optional)
            age INTEGER,
            sex TEXT,                            -- 'male', 'female', 'other'
            height_cm REAL,
            activity_level TEXT,                 -- sedentary .. extremely_active
            goal TEXT,                           -- lose_weight, maintain, gain_weight
            daily_calorie_goal INTEGER DEFAULT 2000,

            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_users_email ON users(email);

        -- ============================================
        -- FOODS
        -- Catalog records, nutrition per 100g
        -- ============================================
        CREATE TABLE foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            barcode TEXT UNIQUE,                 -- nullable, for scanned products
            name TEXT NOT NULL,
            brand TEXT,

            -- Nutrition per 100g (nullable: unknown, not zero)
            calories_per_100g REAL,
            protein_per_100g REAL,
            carbs_per_100g REAL,
            fat_per_100g REAL,
            fiber_per_100g REAL,
            sugar_per_100g REAL,
            sodium_per_100g REAL,

            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_foods_name ON foods(name);
        CREATE INDEX idx_foods_barcode ON foods(barcode);

        -- ============================================
        -- FOOD LOGS
        -- Consumption events with nutrition scaled at
        -- logging time from the food's per-100g values
        -- ============================================
        CREATE TABLE food_logs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            food_id INTEGER NOT NULL REFERENCES foods(id) ON DELETE RESTRICT,

            quantity_g REAL NOT NULL DEFAULT 100,
            meal_type TEXT NOT NULL,             -- breakfast, lunch, dinner, snack
            log_date TEXT NOT NULL,              -- ISO date: "2025-06-01"
            logged_at TEXT NOT NULL DEFAULT (datetime('now')),

            -- Scaled nutrition snapshot (nullable mirrors the source food)
            calories REAL,
            protein REAL,
            carbs REAL,
            fat REAL,
            fiber REAL,
            sugar REAL,
            sodium REAL
        );

        CREATE INDEX idx_food_logs_user_date ON food_logs(user_id, log_date);
        CREATE INDEX idx_food_logs_user_date_meal ON food_logs(user_id, log_date, meal_type);

        -- ============================================
        -- WEIGHT ENTRIES
        -- One entry per user per date
        -- ============================================
        CREATE TABLE weight_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,

            weight_kg REAL NOT NULL,
            entry_date TEXT NOT NULL,            -- ISO date
            created_at TEXT NOT NULL DEFAULT (datetime('now')),

            UNIQUE(user_id, entry_date)
        );

        CREATE INDEX idx_weight_entries_user_date ON weight_entries(user_id, entry_date);
        "#,
    )?;

    Ok(())
}
