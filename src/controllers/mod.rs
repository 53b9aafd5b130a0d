pub mod auth;
pub mod seat_map;
pub mod studios;

pub use auth::{AuthController, AuthError};
pub use seat_map::{BookingError, BookingTab, SeatSelectionController, SubmissionPhase};
pub use studios::StudioCatalog;
