//! User profile model
//!
//! Profile fields feeding the nutrition engine plus basic identity data.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::DbResult;

/// Biological sex category used by the BMR formula.
///
/// Only `Male` selects the male coefficients; `Female` and `Other` share the
/// other/female formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "male" => Some(Sex::Male),
            "female" => Some(Sex::Female),
            "other" => Some(Sex::Other),
            _ => None,
        }
    }
}

/// Activity level scaling BMR into TDEE
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    #[default]
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

impl ActivityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::LightlyActive => "lightly_active",
            ActivityLevel::ModeratelyActive => "moderately_active",
            ActivityLevel::VeryActive => "very_active",
            ActivityLevel::ExtremelyActive => "extremely_active",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sedentary" => Some(ActivityLevel::Sedentary),
            "lightly_active" => Some(ActivityLevel::LightlyActive),
            "moderately_active" => Some(ActivityLevel::ModeratelyActive),
            "very_active" => Some(ActivityLevel::VeryActive),
            "extremely_active" => Some(ActivityLevel::ExtremelyActive),
            _ => None,
        }
    }

    /// TDEE multiplier applied to BMR
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtremelyActive => 1.9,
        }
    }
}

/// Weight goal driving the calorie target adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainWeight,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "lose_weight",
            Goal::Maintain => "maintain",
            Goal::GainWeight => "gain_weight",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "lose_weight" => Some(Goal::LoseWeight),
            "maintain" => Some(Goal::Maintain),
            "gain_weight" => Some(Goal::GainWeight),
            _ => None,
        }
    }

    /// Offset applied to TDEE when computing the calorie goal
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::LoseWeight => -500.0,
            Goal::Maintain => 0.0,
            Goal::GainWeight => 300.0,
        }
    }
}

/// A user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub sex: Option<Sex>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    /// Informational only. The computed calorie goal always derives from
    /// TDEE plus the goal adjustment, not from this field.
    pub daily_calorie_goal: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a user profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileCreate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub sex: Option<Sex>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub daily_calorie_goal: Option<i64>,
}

/// Data for updating a user profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub age: Option<i64>,
    pub sex: Option<Sex>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    pub daily_calorie_goal: Option<i64>,
}

impl UserProfile {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: Option<String> = row.get("sex")?;
        let activity_level: Option<String> = row.get("activity_level")?;
        let goal: Option<String> = row.get("goal")?;

        Ok(Self {
            id: row.get("id")?,
            email: row.get("email")?,
            name: row.get("name")?,
            age: row.get("age")?,
            sex: sex.as_deref().and_then(Sex::from_str),
            height_cm: row.get("height_cm")?,
            activity_level: activity_level.as_deref().and_then(ActivityLevel::from_str),
            goal: goal.as_deref().and_then(Goal::from_str),
            daily_calorie_goal: row
                .get::<_, Option<i64>>("daily_calorie_goal")?
                .unwrap_or(2000),
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new user profile
    pub fn create(conn: &Connection, data: &UserProfileCreate) -> DbResult<Self> {
        conn.execute(
            r#"
            INSERT INTO users (email, name, age, sex, height_cm, activity_level, goal, daily_calorie_goal)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                data.email,
                data.name,
                data.age,
                data.sex.map(|s| s.as_str()),
                data.height_cm,
                data.activity_level.map(|a| a.as_str()),
                data.goal.map(|g| g.as_str()),
                data.daily_calorie_goal.unwrap_or(2000),
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a user profile by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get a user profile by email
    pub fn get_by_email(conn: &Connection, email: &str) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM users WHERE email = ?1")?;

        let result = stmt.query_row([email], Self::from_row);
        match result {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Update a user profile
    pub fn update(conn: &Connection, id: i64, data: &UserProfileUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref email) = data.email {
            updates.push(format!("email = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(email.clone()));
        }
        if let Some(ref name) = data.name {
            updates.push(format!("name = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(name.clone()));
        }
        if let Some(age) = data.age {
            updates.push(format!("age = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(age));
        }
        if let Some(sex) = data.sex {
            updates.push(format!("sex = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(sex.as_str().to_string()));
        }
        if let Some(height_cm) = data.height_cm {
            updates.push(format!("height_cm = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(height_cm));
        }
        if let Some(activity_level) = data.activity_level {
            updates.push(format!("activity_level = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(activity_level.as_str().to_string()));
        }
        if let Some(goal) = data.goal {
            updates.push(format!("goal = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(goal.as_str().to_string()));
        }
        if let Some(daily_calorie_goal) = data.daily_calorie_goal {
            updates.push(format!("daily_calorie_goal = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(daily_calorie_goal));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE users SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Delete a user profile
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::LightlyActive.multiplier(), 1.375);
        assert_eq!(ActivityLevel::ModeratelyActive.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtremelyActive.multiplier(), 1.9);
    }

    #[test]
    fn test_activity_default_is_lightly_active() {
        assert_eq!(ActivityLevel::default(), ActivityLevel::LightlyActive);
        assert_eq!(ActivityLevel::from_str("couch_potato"), None);
    }

    #[test]
    fn test_goal_adjustments() {
        assert_eq!(Goal::LoseWeight.calorie_adjustment(), -500.0);
        assert_eq!(Goal::Maintain.calorie_adjustment(), 0.0);
        assert_eq!(Goal::GainWeight.calorie_adjustment(), 300.0);
    }

    #[test]
    fn test_sex_from_str() {
        assert_eq!(Sex::from_str("Male"), Some(Sex::Male));
        assert_eq!(Sex::from_str("FEMALE"), Some(Sex::Female));
        assert_eq!(Sex::from_str("unspecified"), None);
    }

    #[test]
    fn test_profile_round_trip() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        crate::db::migrations::run_migrations(&conn).expect("migrations");

        let profile = UserProfile::create(
            &conn,
            &UserProfileCreate {
                email: Some("robin@example.com".to_string()),
                age: Some(30),
                sex: Some(Sex::Male),
                height_cm: Some(180.0),
                ..UserProfileCreate::default()
            },
        )
        .expect("create profile");

        assert_eq!(profile.daily_calorie_goal, 2000);
        assert_eq!(profile.activity_level, None);

        let by_email = UserProfile::get_by_email(&conn, "robin@example.com")
            .expect("query")
            .expect("profile exists");
        assert_eq!(by_email.id, profile.id);

        let updated = UserProfile::update(
            &conn,
            profile.id,
            &UserProfileUpdate {
                activity_level: Some(ActivityLevel::VeryActive),
                goal: Some(Goal::LoseWeight),
                ..UserProfileUpdate::default()
            },
        )
        .expect("update")
        .expect("profile exists");
        assert_eq!(updated.activity_level, Some(ActivityLevel::VeryActive));
        assert_eq!(updated.goal, Some(Goal::LoseWeight));
        assert_eq!(updated.age, Some(30));

        assert!(UserProfile::delete(&conn, profile.id).expect("delete"));
        assert!(UserProfile::get_by_id(&conn, profile.id)
            .expect("query")
            .is_none());
    }

    #[test]
    fn test_unrecognized_stored_categories_load_as_absent() {
        let conn = Connection::open_in_memory().expect("open in-memory db");
        crate::db::migrations::run_migrations(&conn).expect("migrations");

        conn.execute(
            "INSERT INTO users (sex, activity_level, goal) VALUES ('robot', 'hyperactive', 'bulk')",
            [],
        )
        .expect("raw insert");

        let profile = UserProfile::get_by_id(&conn, 1)
            .expect("query")
            .expect("profile exists");
        assert_eq!(profile.sex, None);
        assert_eq!(profile.activity_level, None);
        assert_eq!(profile.goal, None);
    }
}
