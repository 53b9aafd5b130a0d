pub mod config;
pub mod api_client;
pub mod models;
pub mod controllers;
pub mod services;
pub mod notifications;
pub mod validation;

use std::sync::Arc;

use crate::api_client::ApiClient;
use crate::controllers::{AuthController, SeatSelectionController, StudioCatalog};
use crate::notifications::{NotificationSink, Snackbar};
use crate::services::session::{AuthSession, FileStore};

// Общее состояние клиента: конфиг, HTTP-клиент, сессия и уведомления
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub api: ApiClient,
    pub session: Arc<AuthSession>,
    pub snackbar: Arc<Snackbar>,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let api = ApiClient::from_config(&config.api)?;
        let store = FileStore::open(&config.session.file)?;
        let session = Arc::new(AuthSession::load(Box::new(store)));
        let snackbar = Arc::new(Snackbar::new(config.notifications.ttl_ms));

        Ok(Self {
            config,
            api,
            session,
            snackbar,
        })
    }

    pub fn notifier(&self) -> Arc<dyn NotificationSink> {
        self.snackbar.clone()
    }

    pub fn auth(&self) -> AuthController {
        AuthController::new(self.api.clone(), self.session.clone(), self.notifier())
    }

    pub fn studios(&self) -> StudioCatalog {
        StudioCatalog::new(self.api.clone())
    }

    /// Открывает схему зала и загружает места.
    pub async fn seat_map(
        &self,
        studio_id: i64,
    ) -> Result<SeatSelectionController, api_client::ApiError> {
        SeatSelectionController::open(
            studio_id,
            self.api.clone(),
            self.session.clone(),
            self.notifier(),
        )
        .await
    }
}
