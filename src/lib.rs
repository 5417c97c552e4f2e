pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod notifier;
pub mod reminder;
pub mod services;
pub mod state;
