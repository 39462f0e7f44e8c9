pub mod prelude;

pub mod bookings;
pub mod tables;
pub mod users;
