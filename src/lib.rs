pub mod activity;
pub mod admin;
pub mod catalog;
pub mod charts;
pub mod config;
pub mod credentials;
pub mod error;
pub mod server;
pub mod session;
pub mod settings;
pub mod tls;
pub mod ui;

use std::sync::Arc;

use admin::AdminState;
use catalog::{Catalog, StaticCatalog};
use config::Config;
use credentials::CredentialStore;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub catalog: Arc<dyn Catalog>,
    pub admin: Arc<AdminState>,
}

impl AppState {
    pub fn new(config: Config, credentials: CredentialStore) -> Self {
        Self::with_catalog(config, credentials, Arc::new(StaticCatalog))
    }

    pub fn with_catalog(config: Config, credentials: CredentialStore, catalog: Arc<dyn Catalog>) -> Self {
        let admin = AdminState::new(&config, credentials);
        Self {
            config: Arc::new(config),
            catalog,
            admin: Arc::new(admin),
        }
    }
}
