use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub is_default: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategoryRequest {
    pub name: String,
}

/// Categories seeded into an empty database.
pub const DEFAULT_CATEGORIES: [&str; 3] = ["Study", "Work", "Home"];
