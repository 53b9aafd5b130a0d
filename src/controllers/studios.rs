use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{error, info};

use crate::api_client::{ApiClient, ApiError};
use crate::models::{BookingResponse, Studio};

#[derive(Debug, Default)]
struct CatalogState {
    studios: Vec<Studio>,
    selected: Option<Studio>,
    booking_result: Option<BookingResponse>,
}

/// Список залов, активный зал и последняя подтвержденная бронь.
pub struct StudioCatalog {
    api: ApiClient,
    state: Mutex<CatalogState>,
}

impl StudioCatalog {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: Mutex::new(CatalogState::default()),
        }
    }

    /// GET /cinema/studios; `null` считается пустым списком.
    pub async fn load(&self) -> Result<Vec<Studio>, ApiError> {
        let studios: Option<Vec<Studio>> = self.api.get("/cinema/studios").await.map_err(|e| {
            error!("Failed to load studios: {}", e);
            e
        })?;
        let studios = studios.unwrap_or_default();
        info!("Loaded {} studios", studios.len());

        self.lock().studios = studios.clone();
        Ok(studios)
    }

    pub fn studios(&self) -> Vec<Studio> {
        self.lock().studios.clone()
    }

    /// Делает зал активным; неизвестный id оставляет выбор как был.
    pub fn select(&self, studio_id: i64) -> Option<Studio> {
        let mut state = self.lock();
        let studio = state.studios.iter().find(|s| s.id == studio_id).cloned()?;
        state.selected = Some(studio.clone());
        Some(studio)
    }

    pub fn selected(&self) -> Option<Studio> {
        self.lock().selected.clone()
    }

    pub fn set_booking_result(&self, result: BookingResponse) {
        self.lock().booking_result = Some(result);
    }

    pub fn booking_result(&self) -> Option<BookingResponse> {
        self.lock().booking_result.clone()
    }

    pub fn clear_booking_result(&self) {
        self.lock().booking_result = None;
    }

    fn lock(&self) -> MutexGuard<'_, CatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
