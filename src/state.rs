use crate::auth::Session;
use crate::config::Config;
use crate::ledger::NutritionLedger;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub remember_path: PathBuf,
    pub login_delay: Duration,
    pub ledger: Arc<Mutex<NutritionLedger>>,
    pub session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(config: &Config, ledger: NutritionLedger) -> Self {
        Self {
            remember_path: config.remember_path.clone(),
            login_delay: config.login_delay,
            ledger: Arc::new(Mutex::new(ledger)),
            session: Arc::new(Mutex::new(Session::default())),
        }
    }
}
