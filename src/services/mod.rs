pub mod booking_service;
pub mod booking_service_impl;

pub use booking_service::{AvailabilityVerdict, BookingError, BookingService};
pub use booking_service_impl::SeaOrmBookingService;
