pub mod user;
pub mod studio;
pub mod seat;
pub mod booking;

pub use user::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User};
pub use studio::Studio;
pub use seat::{sort_seats, Seat};
pub use booking::{
    Booking, BookingResponse, BookingStatus, BookingType, OfflineBookingRequest,
    OnlineBookingRequest,
};
