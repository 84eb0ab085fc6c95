use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripStatus {
    Completed,
    CancelledByDriver,
    CancelledByClient,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Completed => "completed",
            TripStatus::CancelledByDriver => "cancelled_by_driver",
            TripStatus::CancelledByClient => "cancelled_by_client",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "completed" => Some(TripStatus::Completed),
            "cancelled_by_driver" => Some(TripStatus::CancelledByDriver),
            "cancelled_by_client" => Some(TripStatus::CancelledByClient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Trip {
    pub id: i64,
    pub client_id: i64,
    pub driver_id: i64,
    pub city_id: i64,
    pub status: String,
    pub request_at: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for the ledger; status transitions are out of scope, a
/// trip is written once with its terminal status.
#[derive(Debug, Clone, Copy)]
pub struct NewTrip {
    pub client_id: i64,
    pub driver_id: i64,
    pub city_id: i64,
    pub status: TripStatus,
    pub request_at: NaiveDate,
}
