mod view;

use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{delete, patch, post};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;
use tracing::warn;

use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::services::ReminderStats;
use crate::state::AppState;

pub use view::ActivityView;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/activities", get(list_activities).post(create_activity))
        .route(
            "/activities/{id}",
            get(get_activity).patch(update_activity).delete(delete_activity),
        )
        .route("/activities/{id}/toggle", patch(toggle_activity))
        .route("/activities/{id}/complete", post(complete_from_notification))
        .route("/activities/{id}/dismiss", post(dismiss_notification))
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/preferences", get(get_preferences).put(update_preferences))
        .route("/reminders/run", post(run_reminders))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

fn view_of(state: &AppState, activity: Activity) -> ActivityView {
    ActivityView::new(activity, Utc::now(), state.reminders.timezone())
}

async fn list_activities(
    State(state): State<AppState>,
    Query(filter): Query<ActivityFilter>,
) -> Result<Json<Vec<ActivityView>>, AppError> {
    let activities = repository::fetch_activities(&state.db).await?;
    let views = activities
        .into_iter()
        .filter(|a| filter.matches(a))
        .map(|a| view_of(&state, a))
        .collect();
    Ok(Json(views))
}

async fn get_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActivityView>, AppError> {
    let activity = repository::find_activity_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(view_of(&state, activity)))
}

async fn ensure_category_exists(state: &AppState, category_id: Option<&str>) -> Result<(), AppError> {
    if let Some(id) = category_id {
        if repository::find_category_by_id(&state.db, id).await?.is_none() {
            return Err(AppError::validation(format!("unknown category: {}", id)));
        }
    }
    Ok(())
}

async fn create_activity(
    State(state): State<AppState>,
    Json(req): Json<NewActivityRequest>,
) -> Result<(StatusCode, Json<ActivityView>), AppError> {
    ensure_category_exists(&state, req.category_id.as_deref()).await?;
    let prefs = repository::fetch_preferences(&state.db).await?;
    let activity = req.into_activity(&prefs, Utc::now())?;
    repository::insert_activity(&state.db, &activity).await?;
    Ok((StatusCode::CREATED, Json(view_of(&state, activity))))
}

async fn update_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateActivityRequest>,
) -> Result<Json<ActivityView>, AppError> {
    let mut activity = repository::find_activity_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_category_exists(&state, req.category_id.as_deref()).await?;

    let before = activity.clone();
    req.apply(&mut activity, Utc::now())?;

    if !repository::update_activity(&state.db, &activity).await? {
        return Err(AppError::NotFound);
    }
    // only a rescheduled reminder may fire again today
    if activity.reminder_schedule_changed(&before) {
        state.reminders.ledger().forget(&id).await;
    }
    Ok(Json(view_of(&state, activity)))
}

async fn delete_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if repository::delete_activity(&state.db, &id).await? {
        state.reminders.ledger().forget(&id).await;
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn toggle_activity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActivityView>, AppError> {
    let activity = repository::find_activity_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    repository::set_activity_completed(&state.db, &id, !activity.is_completed).await?;

    let activity = repository::find_activity_by_id(&state.db, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(view_of(&state, activity)))
}

async fn complete_from_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if !repository::set_activity_completed(&state.db, &id, true).await? {
        return Err(AppError::NotFound);
    }
    if let Err(e) = state.reminders.notifier().cancel(&id).await {
        warn!("failed to cancel notification for completed activity {}: {}", id, e);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn dismiss_notification(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if repository::find_activity_by_id(&state.db, &id).await?.is_none() {
        return Err(AppError::NotFound);
    }
    state.reminders.notifier().cancel(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    let categories = repository::fetch_categories(&state.db).await?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<AppState>,
    Json(req): Json<NewCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("category name must not be empty"));
    }
    let category = repository::insert_category(&state.db, name, false).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if repository::delete_category(&state.db, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

async fn get_preferences(State(state): State<AppState>) -> Result<Json<UserPreferences>, AppError> {
    let prefs = repository::fetch_preferences(&state.db).await?;
    Ok(Json(prefs))
}

async fn update_preferences(
    State(state): State<AppState>,
    Json(req): Json<UpdatePreferencesRequest>,
) -> Result<Json<UserPreferences>, AppError> {
    let mut prefs = repository::fetch_preferences(&state.db).await?;
    req.apply(&mut prefs)?;
    repository::save_preferences(&state.db, &prefs).await?;
    Ok(Json(prefs))
}

async fn run_reminders(State(state): State<AppState>) -> Result<Json<ReminderStats>, AppError> {
    let stats = state.reminders.run_once(Utc::now()).await?;
    Ok(Json(stats))
}
