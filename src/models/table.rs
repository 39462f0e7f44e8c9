use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Administrative status of a table. An operator-set override that is
/// independent of booking occupancy: an `unavailable` table cannot be booked
/// for any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    Available,
    Unavailable,
}

impl TableStatus {
    pub const VALID: &[&str] = &["available", "unavailable"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Unavailable => "unavailable",
        }
    }
}

impl Default for TableStatus {
    fn default() -> Self {
        Self::Available
    }
}

impl fmt::Display for TableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "unavailable" => Ok(Self::Unavailable),
            other => Err(format!(
                "invalid table status '{}', expected one of: {}",
                other,
                Self::VALID.join(", ")
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: i32,
    pub table_number: i32,
    pub seats: i32,
    pub status: String,
}

impl From<crate::entities::tables::Model> for DiningTable {
    fn from(model: crate::entities::tables::Model) -> Self {
        Self {
            id: model.id,
            table_number: model.table_number,
            seats: model.seats,
            status: model.status,
        }
    }
}
