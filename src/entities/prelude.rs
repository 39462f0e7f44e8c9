pub use super::bookings::Entity as Bookings;
pub use super::tables::Entity as Tables;
pub use super::users::Entity as Users;
