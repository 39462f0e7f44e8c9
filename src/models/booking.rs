use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Booking status. `reserved` and `pending` bookings participate in
/// availability conflict checks; `cancelled` bookings never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Reserved,
    Cancelled,
}

impl BookingStatus {
    pub const VALID: &[&str] = &["reserved", "cancelled", "pending"];

    /// Statuses that count as active for conflict scanning.
    pub const ACTIVE: &[&str] = &["reserved", "pending"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reserved => "reserved",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "reserved" => Ok(Self::Reserved),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!(
                "invalid booking status '{}', expected one of: {}",
                other,
                Self::VALID.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i32,
    pub user_id: i32,
    pub table_id: i32,
    pub booking_date: NaiveDate,
    pub booking_time: NaiveTime,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<crate::entities::bookings::Model> for Booking {
    fn from(model: crate::entities::bookings::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            table_id: model.table_id,
            booking_date: model.booking_date,
            booking_time: model.booking_time,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for name in BookingStatus::VALID {
            let status: BookingStatus = name.parse().unwrap();
            assert_eq!(status.as_str(), *name);
        }
    }

    #[test]
    fn test_active_excludes_cancelled() {
        assert!(BookingStatus::ACTIVE.contains(&BookingStatus::Reserved.as_str()));
        assert!(BookingStatus::ACTIVE.contains(&BookingStatus::Pending.as_str()));
        assert!(!BookingStatus::ACTIVE.contains(&BookingStatus::Cancelled.as_str()));
    }
}
