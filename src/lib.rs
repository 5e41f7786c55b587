pub mod app;
pub mod auth;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod palette;
pub mod storage;
pub mod ui;
pub mod state;

pub use app::router;
pub use config::Config;
pub use ledger::{LedgerError, NutritionLedger};
pub use state::AppState;
