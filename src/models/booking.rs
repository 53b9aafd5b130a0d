use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Used,
    Cancelled,
}

/// Подтвержденное сервером бронирование.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub booking_code: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub studio_id: i64,
    #[serde(default)]
    pub seat_ids: Vec<i64>,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub booking_type: Option<BookingType>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Ответ на POST /booking/online и /booking/offline.
/// Признак успеха - непустой `qrCode`, даже если HTTP статус 200.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingResponse {
    #[serde(default)]
    pub booking: Option<Booking>,
    #[serde(rename = "qrCode", default)]
    pub qr_code: Option<String>,
}

impl BookingResponse {
    pub fn is_confirmed(&self) -> bool {
        self.qr_code.as_deref().is_some_and(|qr| !qr.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineBookingRequest {
    pub studio_id: i64,
    pub seat_ids: Vec<i64>,
}

// Кассовая продажа: данные покупателя вместо токена
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfflineBookingRequest {
    pub studio_id: i64,
    pub seat_ids: Vec<i64>,
    pub customer_name: String,
    pub customer_email: String,
}
