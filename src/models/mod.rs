pub mod activity;
pub mod category;
pub mod preferences;

pub use activity::{Activity, ActivityFilter, NewActivityRequest, StatusFilter, UpdateActivityRequest};
pub use category::{Category, NewCategoryRequest};
pub use preferences::{ClickAction, NotificationStyle, UpdatePreferencesRequest, UserPreferences};
