use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::category::DEFAULT_CATEGORIES;
use crate::models::{Activity, Category, UserPreferences};

const ACTIVITY_COLUMNS: &str = "id, title, description, due_date, category_id, is_completed, is_reminder_enabled, reminder_offset_days, reminder_hour, reminder_minute, created_at, updated_at";

pub async fn fetch_activities(db: &SqlitePool) -> Result<Vec<Activity>, sqlx::Error> {
    sqlx::query_as::<_, Activity>(&format!(
        "SELECT {} FROM activities ORDER BY due_date ASC, created_at ASC",
        ACTIVITY_COLUMNS
    ))
    .fetch_all(db)
    .await
}

/// Activities the reminder poller has to look at: open and with reminders on.
pub async fn fetch_reminder_candidates(db: &SqlitePool) -> Result<Vec<Activity>, sqlx::Error> {
    sqlx::query_as::<_, Activity>(&format!(
        "SELECT {} FROM activities WHERE is_completed = 0 AND is_reminder_enabled = 1 ORDER BY due_date ASC",
        ACTIVITY_COLUMNS
    ))
    .fetch_all(db)
    .await
}

pub async fn find_activity_by_id(db: &SqlitePool, id: &str) -> Result<Option<Activity>, sqlx::Error> {
    sqlx::query_as::<_, Activity>(&format!(
        "SELECT {} FROM activities WHERE id = ?",
        ACTIVITY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_activity(db: &SqlitePool, activity: &Activity) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO activities (id, title, description, due_date, category_id, is_completed, is_reminder_enabled, reminder_offset_days, reminder_hour, reminder_minute, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&activity.id)
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(activity.due_date)
    .bind(&activity.category_id)
    .bind(activity.is_completed)
    .bind(activity.is_reminder_enabled)
    .bind(activity.reminder_offset_days)
    .bind(activity.reminder_hour)
    .bind(activity.reminder_minute)
    .bind(&activity.created_at)
    .bind(&activity.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn update_activity(db: &SqlitePool, activity: &Activity) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE activities SET title = ?, description = ?, due_date = ?, category_id = ?, is_completed = ?, is_reminder_enabled = ?, reminder_offset_days = ?, reminder_hour = ?, reminder_minute = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&activity.title)
    .bind(&activity.description)
    .bind(activity.due_date)
    .bind(&activity.category_id)
    .bind(activity.is_completed)
    .bind(activity.is_reminder_enabled)
    .bind(activity.reminder_offset_days)
    .bind(activity.reminder_hour)
    .bind(activity.reminder_minute)
    .bind(&activity.updated_at)
    .bind(&activity.id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}

pub async fn set_activity_completed(
    db: &SqlitePool,
    id: &str,
    completed: bool,
) -> Result<bool, sqlx::Error> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query("UPDATE activities SET is_completed = ?, updated_at = ? WHERE id = ?")
        .bind(completed)
        .bind(now)
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn delete_activity(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM activities WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_categories(db: &SqlitePool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, is_default, created_at FROM categories ORDER BY is_default DESC, name ASC"
    )
    .fetch_all(db)
    .await
}

pub async fn find_category_by_id(db: &SqlitePool, id: &str) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "SELECT id, name, is_default, created_at FROM categories WHERE id = ?"
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn insert_category(
    db: &SqlitePool,
    name: &str,
    is_default: bool,
) -> Result<Category, sqlx::Error> {
    let category = Category {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        is_default,
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query("INSERT INTO categories (id, name, is_default, created_at) VALUES (?, ?, ?, ?)")
        .bind(&category.id)
        .bind(&category.name)
        .bind(category.is_default)
        .bind(&category.created_at)
        .execute(db)
        .await?;

    Ok(category)
}

/// Deletes a category; its activities stay and become uncategorised.
pub async fn delete_category(db: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
    let mut tx = db.begin().await?;

    sqlx::query("UPDATE activities SET category_id = NULL WHERE category_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    tx.commit().await?;
    Ok(result > 0)
}

/// Inserts the default categories when the table is empty. Returns how many were added.
pub async fn seed_default_categories(db: &SqlitePool) -> Result<usize, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM categories")
        .fetch_one(db)
        .await?;
    if count > 0 {
        return Ok(0);
    }

    for name in DEFAULT_CATEGORIES {
        insert_category(db, name, true).await?;
    }
    Ok(DEFAULT_CATEGORIES.len())
}

pub async fn fetch_preferences(db: &SqlitePool) -> Result<UserPreferences, sqlx::Error> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM preferences")
        .fetch_all(db)
        .await?;
    Ok(UserPreferences::from_entries(rows))
}

pub async fn save_preferences(db: &SqlitePool, prefs: &UserPreferences) -> Result<(), sqlx::Error> {
    let mut tx = db.begin().await?;
    for (key, value) in prefs.to_entries() {
        sqlx::query(
            "INSERT INTO preferences (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value"
        )
        .bind(key)
        .bind(value)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(())
}
