use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::database::Database;
use crate::notification::{HttpPushGateway, Notifier, PushGateway};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Config,
    pub db: Database,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub async fn new(cfg: Config) -> Result<Self> {
        let db = Database::connect(&cfg.db).await?;
        let gateway = Arc::new(HttpPushGateway::new(cfg.notification.clone())?);
        Self::with_parts(cfg, db, gateway)
    }

    /// Assemble the state around an already opened database and gateway.
    pub fn with_parts(cfg: Config, db: Database, gateway: Arc<dyn PushGateway>) -> Result<Self> {
        let tz = cfg.notification.tz()?;
        let notifier = Arc::new(Notifier::new(db.clone(), gateway, tz));
        Ok(Self { cfg, db, notifier })
    }
}
