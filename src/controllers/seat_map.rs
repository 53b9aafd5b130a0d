//! seat_map.rs
//!
//! Контроллер схемы зала: выбор мест и оформление брони.
//!
//! Ключевые моменты:
//! 1.  **Инвентарь мест** загружается при открытии и при смене зала, сортируется по числовой
//!     части номера. Ответ, пришедший после смены зала, отбрасывается (счетчик поколений).
//! 2.  **Выбор** - упорядоченный набор id; переключаются только существующие свободные места.
//! 3.  **Две ветки оформления**: онлайн (нужен токен) и касса (имя и email покупателя).
//!     Пока идет отправка, повторная отправка отклоняется.
//! 4.  После успешной брони места перечитываются с сервера, выбор очищается.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api_client::{ApiClient, ApiError};
use crate::models::{
    sort_seats, BookingResponse, OfflineBookingRequest, OnlineBookingRequest, Seat,
};
use crate::notifications::NotificationSink;
use crate::services::session::AuthSession;
use crate::validation::{validate_field, Field};

pub const BOOKING_SUCCESS: &str = "Booking successful!";
pub const LOGIN_REQUIRED: &str = "Login required for online booking";
pub const SELECT_SEATS: &str = "Select seats";
pub const ONLINE_BOOKING_FAILED: &str = "Booking failed";
pub const OFFLINE_BOOKING_FAILED: &str = "Offline booking failed";

/// Вызывается с ответом сервера после подтвержденной брони.
pub type OnBooked = Box<dyn Fn(&BookingResponse) + Send + Sync>;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("Login required for online booking")]
    LoginRequired,
    #[error("Select seats")]
    EmptySelection,
    #[error("a booking is already being submitted")]
    Busy,
    /// 2xx без `qrCode`.
    #[error("booking was not confirmed by the server")]
    Rejected,
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Состояние отправки брони.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingTab {
    #[default]
    Online,
    Offline,
}

// Поля кассовой формы и их последние сообщения валидации
#[derive(Debug, Default)]
struct CustomerForm {
    name: String,
    email: String,
    name_error: Option<&'static str>,
    email_error: Option<&'static str>,
}

#[derive(Debug, Default)]
struct SeatMapState {
    studio_id: i64,
    // Растет при каждой смене зала
    generation: u64,
    // Номер последнего отправленного и последнего примененного запроса мест
    last_request: u64,
    applied_request: u64,
    seats: Vec<Seat>,
    selected: Vec<i64>,
    phase: SubmissionPhase,
    form: CustomerForm,
    tab: BookingTab,
}

// Снимок того, что уходит на сервер
struct Submission {
    studio_id: i64,
    generation: u64,
    seat_ids: Vec<i64>,
    customer_name: String,
    customer_email: String,
}

pub struct SeatSelectionController {
    api: ApiClient,
    session: Arc<AuthSession>,
    notifier: Arc<dyn NotificationSink>,
    on_booked: Option<OnBooked>,
    state: Mutex<SeatMapState>,
}

impl SeatSelectionController {
    /// Создает контроллер без загрузки мест.
    pub fn new(
        studio_id: i64,
        api: ApiClient,
        session: Arc<AuthSession>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            api,
            session,
            notifier,
            on_booked: None,
            state: Mutex::new(SeatMapState {
                studio_id,
                ..SeatMapState::default()
            }),
        }
    }

    /// Создает контроллер и сразу загружает места зала.
    pub async fn open(
        studio_id: i64,
        api: ApiClient,
        session: Arc<AuthSession>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ApiError> {
        let controller = Self::new(studio_id, api, session, notifier);
        controller.load_seats().await?;
        Ok(controller)
    }

    pub fn with_on_booked<F>(mut self, callback: F) -> Self
    where
        F: Fn(&BookingResponse) + Send + Sync + 'static,
    {
        self.on_booked = Some(Box::new(callback));
        self
    }

    // === Места ===

    /// Перечитывает места активного зала. Заменяет инвентарь целиком и сбрасывает выбор.
    /// Ответ, обогнанный более новым запросом или сменой зала, отбрасывается.
    pub async fn load_seats(&self) -> Result<(), ApiError> {
        self.fetch_seats(None).await
    }

    // `expected_generation`: загружать только если зал с тех пор не менялся
    async fn fetch_seats(&self, expected_generation: Option<u64>) -> Result<(), ApiError> {
        let (studio_id, generation, request) = {
            let mut state = self.lock();
            if expected_generation.is_some_and(|g| g != state.generation) {
                debug!("Studio changed - skipping seat refresh");
                return Ok(());
            }
            state.last_request += 1;
            (state.studio_id, state.generation, state.last_request)
        };

        let path = format!("/cinema/studios/{}/seats", studio_id);
        let fetched: Option<Vec<Seat>> = match self.api.get(&path).await {
            Ok(seats) => seats,
            Err(e) => {
                error!("Failed to load seats for studio {}: {}", studio_id, e);
                return Err(e);
            }
        };

        let mut seats = fetched.unwrap_or_default();
        sort_seats(&mut seats);

        let mut state = self.lock();
        if state.generation != generation || request <= state.applied_request {
            debug!(
                "Discarding stale seats for studio {} (request {}, active studio {})",
                studio_id, request, state.studio_id
            );
            return Ok(());
        }
        info!("Loaded {} seats for studio {}", seats.len(), studio_id);
        state.applied_request = request;
        state.seats = seats;
        state.selected.clear();
        Ok(())
    }

    /// Переключает активный зал: выбор и инвентарь сбрасываются, места загружаются заново.
    /// Тот же зал - ничего не делает.
    pub async fn switch_studio(&self, studio_id: i64) -> Result<(), ApiError> {
        {
            let mut state = self.lock();
            if state.studio_id == studio_id {
                return Ok(());
            }
            state.studio_id = studio_id;
            state.generation += 1;
            state.seats.clear();
            state.selected.clear();
            // Ошибка прошлого зала к новому не относится; идущая отправка завершится сама
            if state.phase != SubmissionPhase::Submitting {
                state.phase = SubmissionPhase::Idle;
            }
        }
        self.load_seats().await
    }

    /// Добавляет место в выбор или убирает его оттуда.
    /// Несуществующие и занятые места игнорируются; возвращает, изменился ли выбор.
    pub fn toggle(&self, seat_id: i64) -> bool {
        let mut state = self.lock();
        let available = state
            .seats
            .iter()
            .any(|seat| seat.id == seat_id && seat.is_available);
        if !available {
            return false;
        }

        if let Some(pos) = state.selected.iter().position(|id| *id == seat_id) {
            state.selected.remove(pos);
        } else {
            state.selected.push(seat_id);
        }
        true
    }

    pub fn studio_id(&self) -> i64 {
        self.lock().studio_id
    }

    pub fn seats(&self) -> Vec<Seat> {
        self.lock().seats.clone()
    }

    /// Выбранные id в порядке выбора.
    pub fn selected(&self) -> Vec<i64> {
        self.lock().selected.clone()
    }

    /// Номера выбранных мест в порядке схемы зала, через запятую.
    pub fn selected_label(&self) -> String {
        let state = self.lock();
        state
            .seats
            .iter()
            .filter(|seat| state.selected.contains(&seat.id))
            .map(|seat| seat.seat_number.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // === Состояние формы ===

    pub fn phase(&self) -> SubmissionPhase {
        self.lock().phase.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().phase == SubmissionPhase::Submitting
    }

    pub fn active_tab(&self) -> BookingTab {
        self.lock().tab
    }

    pub fn set_active_tab(&self, tab: BookingTab) {
        self.lock().tab = tab;
    }

    /// Обновляет поле кассовой формы и пересчитывает для него сообщение валидации.
    pub fn handle_change(&self, field: Field, value: &str) {
        let message = validate_field(field, value);
        let mut state = self.lock();
        match field {
            Field::Name => {
                state.form.name = value.to_string();
                state.form.name_error = message;
            }
            Field::Email => {
                state.form.email = value.to_string();
                state.form.email_error = message;
            }
            Field::Password => debug!("Seat map form has no password field"),
        }
    }

    pub fn name(&self) -> String {
        self.lock().form.name.clone()
    }

    pub fn email(&self) -> String {
        self.lock().form.email.clone()
    }

    pub fn field_error(&self, field: Field) -> Option<&'static str> {
        let state = self.lock();
        match field {
            Field::Name => state.form.name_error,
            Field::Email => state.form.email_error,
            Field::Password => None,
        }
    }

    /// Можно ли отправлять кассовую форму.
    pub fn form_is_valid(&self) -> bool {
        let state = self.lock();
        validate_field(Field::Name, &state.form.name).is_none()
            && validate_field(Field::Email, &state.form.email).is_none()
    }

    // === Бронирование ===

    /// Онлайн-бронь от имени вошедшего пользователя.
    pub async fn book_online(&self) -> Result<BookingResponse, BookingError> {
        let Some(token) = self.session.token() else {
            self.notifier.error(LOGIN_REQUIRED);
            return Err(BookingError::LoginRequired);
        };
        let submission = self.begin_submission()?;

        info!(
            "Submitting online booking: studio={}, seats={:?}",
            submission.studio_id, submission.seat_ids
        );
        let request = OnlineBookingRequest {
            studio_id: submission.studio_id,
            seat_ids: submission.seat_ids,
        };
        let result = self
            .api
            .post::<_, BookingResponse>("/booking/online", &request, Some(&token))
            .await;

        self.finish_submission(submission.generation, result, ONLINE_BOOKING_FAILED)
            .await
    }

    /// Кассовая бронь: без токена, с именем и email покупателя из формы.
    pub async fn book_offline(&self) -> Result<BookingResponse, BookingError> {
        let submission = self.begin_submission()?;

        info!(
            "Submitting offline booking: studio={}, seats={:?}",
            submission.studio_id, submission.seat_ids
        );
        let request = OfflineBookingRequest {
            studio_id: submission.studio_id,
            seat_ids: submission.seat_ids,
            customer_name: submission.customer_name,
            customer_email: submission.customer_email,
        };
        let result = self
            .api
            .post::<_, BookingResponse>("/booking/offline", &request, None)
            .await;

        self.finish_submission(submission.generation, result, OFFLINE_BOOKING_FAILED)
            .await
    }

    fn begin_submission(&self) -> Result<Submission, BookingError> {
        let mut state = self.lock();
        if state.selected.is_empty() {
            drop(state);
            self.notifier.error(SELECT_SEATS);
            return Err(BookingError::EmptySelection);
        }
        if state.phase == SubmissionPhase::Submitting {
            warn!("Booking already in flight - ignoring duplicate submission");
            return Err(BookingError::Busy);
        }

        state.phase = SubmissionPhase::Submitting;
        Ok(Submission {
            studio_id: state.studio_id,
            generation: state.generation,
            seat_ids: state.selected.clone(),
            customer_name: state.form.name.clone(),
            customer_email: state.form.email.clone(),
        })
    }

    async fn finish_submission(
        &self,
        generation: u64,
        result: Result<BookingResponse, ApiError>,
        failure_message: &str,
    ) -> Result<BookingResponse, BookingError> {
        let response = match result {
            Ok(response) if response.is_confirmed() => response,
            Ok(_) => {
                warn!("Booking response has no QR code - treating as failure");
                self.fail_submission(generation, failure_message);
                return Err(BookingError::Rejected);
            }
            Err(e) => {
                error!("Booking request failed: {}", e);
                self.fail_submission(generation, failure_message);
                return Err(BookingError::Api(e));
            }
        };

        if let Some(callback) = &self.on_booked {
            callback(&response);
        }
        self.notifier.success(BOOKING_SUCCESS);

        if let Err(e) = self.fetch_seats(Some(generation)).await {
            warn!("Seat refresh after booking failed: {}", e);
        }

        let mut state = self.lock();
        if state.generation == generation {
            state.selected.clear();
        }
        state.phase = SubmissionPhase::Idle;
        Ok(response)
    }

    fn fail_submission(&self, generation: u64, message: &str) {
        {
            let mut state = self.lock();
            state.phase = if state.generation == generation {
                SubmissionPhase::Failed {
                    message: message.to_string(),
                }
            } else {
                SubmissionPhase::Idle
            };
        }
        self.notifier.error(message);
    }

    fn lock(&self) -> MutexGuard<'_, SeatMapState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
