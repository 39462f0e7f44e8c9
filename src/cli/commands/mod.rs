mod add_user;
mod bookings;
mod tables;

pub use add_user::cmd_add_user;
pub use bookings::cmd_list_bookings;
pub use tables::cmd_list_tables;
