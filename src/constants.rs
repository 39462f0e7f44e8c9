pub mod booking {

    /// Minimum separation, in seconds, between two active bookings for the
    /// same table on the same date. Fixed by design, not configuration.
    pub const CONFLICT_WINDOW_SECS: i64 = 3600;
}

pub mod seed {

    pub const ADMIN_NAME: &str = "Administrator";

    pub const ADMIN_EMAIL: &str = "admin@localhost";

    /// Default password for the seeded admin (change after first login).
    pub const ADMIN_PASSWORD: &str = "password";
}

pub mod limits {

    pub const MAX_LIST_LIMIT: u64 = 1000;

    pub const DEFAULT_UPCOMING_LIMIT: u64 = 50;
}
