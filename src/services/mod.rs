pub mod ledger;
pub mod reminder_service;
pub mod scheduler;

pub use ledger::NotifiedLedger;
pub use reminder_service::{ReminderService, ReminderStats};
pub use scheduler::ReminderScheduler;
