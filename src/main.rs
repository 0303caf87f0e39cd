//! nutritrack CLI
//!
//! Opens the database, runs migrations, and exposes the engine and catalog
//! operations as plain subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use nutritrack::db::{migrations, Database};
use nutritrack::engine;
use nutritrack::lookup::{CommonFoodRecognizer, FoodRecognizer, OpenFoodFacts};
use nutritrack::models::{
    ActivityLevel, Food, FoodCreate, FoodLog, FoodLogCreate, Goal, MealType, Sex, UserProfile,
    UserProfileCreate, UserProfileUpdate, WeightEntry,
};

/// Get the database path from environment or use default
fn get_database_path() -> PathBuf {
    std::env::var("NUTRITRACK_DATABASE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(parent) = path.parent() {
                    if let Some(grandparent) = parent.parent() {
                        path = grandparent.to_path_buf();
                    }
                }
            }

            path.push("data");
            path.push("nutritrack.db");
            path
        })
}

/// Get the acting user id from environment, defaulting to 1
fn get_user_id() -> i64 {
    std::env::var("NUTRITRACK_USER_ID")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Parse an optional date argument, falling back to today
fn parse_date(arg: Option<&String>) -> NaiveDate {
    match arg {
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                eprintln!("Unrecognized date '{}', using today", s);
                today()
            }
        },
        None => today(),
    }
}

fn print_usage() {
    eprintln!("Usage: nutritrack <command> [args]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  summary [date]                     Daily nutrition summary");
    eprintln!("  breakdown [date]                   Per-meal macro breakdown");
    eprintln!("  progress [days]                    Weight progress (default 30 days)");
    eprintln!("  recommend                          Fitness recommendations");
    eprintln!("  log-food <food-id> <grams> [meal] [date]");
    eprintln!("  delete-log <log-id>");
    eprintln!("  add-weight <kg> [date]");
    eprintln!("  lookup <barcode>                   Find or import a food by barcode");
    eprintln!("  search <query>                     Search foods (local, then remote)");
    eprintln!("  recognize <image-path>             Guess the food in an image");
    eprintln!("  set-profile key=value ...          Keys: age, sex, height, activity, goal");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  NUTRITRACK_DATABASE_PATH           Database file location");
    eprintln!("  NUTRITRACK_USER_ID                 Acting user (default 1)");
}

/// Load the acting user's profile, creating a blank one on first run
fn load_profile(conn: &rusqlite::Connection, user_id: i64) -> nutritrack::db::DbResult<UserProfile> {
    if let Some(profile) = UserProfile::get_by_id(conn, user_id)? {
        return Ok(profile);
    }

    eprintln!("User {} not found, creating a blank profile", user_id);
    UserProfile::create(conn, &UserProfileCreate::default())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutritrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    nutritrack::build_info::print_startup_banner();

    let args: Vec<String> = std::env::args().collect();
    let command = match args.get(1) {
        Some(c) => c.as_str(),
        None => {
            print_usage();
            return Ok(());
        }
    };

    let db_path = get_database_path();
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = Database::open(&db_path)?;
    database.with_conn(|conn| {
        migrations::run_migrations(conn)?;
        let version = migrations::get_schema_version(conn)?;
        tracing::debug!(version, "database ready");
        Ok(())
    })?;

    let user_id = get_user_id();
    let conn = database.get_conn()?;

    match command {
        "summary" => {
            let profile = load_profile(&conn, user_id)?;
            let date = parse_date(args.get(2));
            let summary = engine::daily_summary(&*conn, &profile, Some(date))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        "breakdown" => {
            let profile = load_profile(&conn, user_id)?;
            let date = parse_date(args.get(2));
            let breakdown = engine::meal_breakdown(&*conn, profile.id, date)?;
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }
        "progress" => {
            let profile = load_profile(&conn, user_id)?;
            let days: i64 = args.get(2).and_then(|v| v.parse().ok()).unwrap_or(30);
            let progress = engine::weight_progress(&*conn, profile.id, days)?;
            println!("{}", serde_json::to_string_pretty(&progress)?);
        }
        "recommend" => {
            let profile = load_profile(&conn, user_id)?;
            let recommendations = engine::fitness_recommendations(&*conn, &profile)?;
            println!("{}", serde_json::to_string_pretty(&recommendations)?);
        }
        "log-food" => {
            let profile = load_profile(&conn, user_id)?;
            let food_id: i64 = match args.get(2).and_then(|v| v.parse().ok()) {
                Some(id) => id,
                None => {
                    eprintln!("log-food requires a numeric food id");
                    print_usage();
                    return Ok(());
                }
            };
            let quantity_g: f64 = args.get(3).and_then(|v| v.parse().ok()).unwrap_or(100.0);
            let meal_type = args
                .get(4)
                .map(|m| MealType::from_str(m))
                .unwrap_or(MealType::Snack);
            let log_date = parse_date(args.get(5));

            let log = FoodLog::log(
                &conn,
                &FoodLogCreate {
                    user_id: profile.id,
                    food_id,
                    quantity_g,
                    meal_type,
                    log_date,
                },
            )?;
            println!(
                "Logged {}g as {} on {} ({:.1} kcal)",
                log.quantity_g,
                log.meal_type.as_str(),
                log.log_date,
                log.nutrients().calories
            );
        }
        "delete-log" => {
            let profile = load_profile(&conn, user_id)?;
            let log_id: i64 = match args.get(2).and_then(|v| v.parse().ok()) {
                Some(id) => id,
                None => {
                    eprintln!("delete-log requires a numeric log id");
                    print_usage();
                    return Ok(());
                }
            };

            if FoodLog::delete_for_user(&conn, log_id, profile.id)? {
                println!("Deleted log {}", log_id);
            } else {
                println!("Log {} not found", log_id);
            }
        }
        "add-weight" => {
            let profile = load_profile(&conn, user_id)?;
            let weight_kg: f64 = match args.get(2).and_then(|v| v.parse().ok()) {
                Some(w) => w,
                None => {
                    eprintln!("add-weight requires a weight in kg");
                    print_usage();
                    return Ok(());
                }
            };
            let entry_date = parse_date(args.get(3));

            let entry = WeightEntry::record(&conn, profile.id, weight_kg, entry_date)?;
            println!("Recorded {:.1} kg on {}", entry.weight_kg, entry.entry_date);
        }
        "lookup" => {
            let barcode = match args.get(2) {
                Some(b) => b.as_str(),
                None => {
                    eprintln!("lookup requires a barcode");
                    print_usage();
                    return Ok(());
                }
            };

            let food = match Food::get_by_barcode(&conn, barcode)? {
                Some(food) => Some(food),
                None => {
                    let client = OpenFoodFacts::new()?;
                    match client.product_by_barcode(barcode)? {
                        Some(record) => Some(Food::create(&conn, &FoodCreate::from(record))?),
                        None => None,
                    }
                }
            };

            match food {
                Some(food) => println!("{}", serde_json::to_string_pretty(&food)?),
                None => println!("Product not found"),
            }
        }
        "search" => {
            let query = match args.get(2) {
                Some(q) => q.as_str(),
                None => {
                    eprintln!("search requires a query");
                    print_usage();
                    return Ok(());
                }
            };

            let mut foods = Food::search_by_name(&conn, query, 10)?;

            // Thin local results are topped up from the food database
            if foods.len() < 5 {
                let client = OpenFoodFacts::new()?;
                for record in client.search(query, 1, 10)? {
                    if foods.len() >= 10 {
                        break;
                    }
                    let barcode = match record.barcode.as_deref() {
                        Some(code) => code.to_string(),
                        None => continue,
                    };
                    let food = match Food::get_by_barcode(&conn, &barcode)? {
                        Some(existing) => existing,
                        None => Food::create(&conn, &FoodCreate::from(record))?,
                    };
                    foods.push(food);
                }
            }

            println!("{}", serde_json::to_string_pretty(&foods)?);
        }
        "recognize" => {
            let path = match args.get(2) {
                Some(p) => p,
                None => {
                    eprintln!("recognize requires an image path");
                    print_usage();
                    return Ok(());
                }
            };

            let image_bytes = std::fs::read(path)?;
            let recognizer = CommonFoodRecognizer;
            match recognizer.recognize(&image_bytes) {
                Some(guess) => {
                    println!("Recognized: {}", guess);
                    for suggestion in recognizer.suggestions(&guess) {
                        println!("  - {}", suggestion);
                    }
                }
                None => println!("Could not recognize a food in the image"),
            }
        }
        "set-profile" => {
            let profile = load_profile(&conn, user_id)?;
            let mut update = UserProfileUpdate::default();

            for pair in &args[2..] {
                let (key, value) = match pair.split_once('=') {
                    Some(kv) => kv,
                    None => {
                        eprintln!("Ignoring '{}': expected key=value", pair);
                        continue;
                    }
                };

                match key {
                    "age" => update.age = value.parse().ok(),
                    "sex" => update.sex = Sex::from_str(value),
                    "height" => update.height_cm = value.parse().ok(),
                    "activity" => update.activity_level = ActivityLevel::from_str(value),
                    "goal" => update.goal = Goal::from_str(value),
                    "calorie-goal" => update.daily_calorie_goal = value.parse().ok(),
                    other => eprintln!("Ignoring unknown profile key '{}'", other),
                }
            }

            let updated = UserProfile::update(&conn, profile.id, &update)?;
            match updated {
                Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                None => println!("Profile not found"),
            }
        }
        other => {
            eprintln!("Unknown command '{}'", other);
            print_usage();
        }
    }

    Ok(())
}
