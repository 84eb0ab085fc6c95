use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::{
    db::DbPool,
    error::AppError,
    models::{date_range::DateRange, trip::TripStatus, user::UserRole},
};

/// One aggregated row per calendar day that had at least one eligible trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RateRecord {
    pub day: NaiveDate,
    pub cancellation_rate: f64,
}

/// Read-only daily cancellation-rate aggregation over the trip ledger.
///
/// A trip is eligible only when both its client and driver are not banned
/// and hold the role the join side declares. The whole computation is
/// pushed down to the storage engine as one grouped query; repeated calls
/// over an unchanged ledger return identical output.
#[derive(Clone)]
pub struct CancellationRateService {
    db: DbPool,
}

impl CancellationRateService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn rates_for(&self, range: &DateRange) -> Result<Vec<RateRecord>, AppError> {
        // The 1.0 forces a REAL division; a group only exists when at least
        // one row matched it, so COUNT(*) >= 1 and no zero guard is needed.
        let records = sqlx::query_as::<_, RateRecord>(
            r#"
            SELECT t.request_at AS day,
                   ROUND(
                       SUM(CASE WHEN t.status IN (?1, ?2) THEN 1.0 ELSE 0.0 END) / COUNT(*),
                       2
                   ) AS cancellation_rate
            FROM trips AS t
            JOIN users AS c
              ON c.id = t.client_id AND c.banned = 0 AND c.role = ?3
            JOIN users AS d
              ON d.id = t.driver_id AND d.banned = 0 AND d.role = ?4
            WHERE t.request_at BETWEEN ?5 AND ?6
            GROUP BY t.request_at
            ORDER BY t.request_at ASC
            "#,
        )
        .bind(TripStatus::CancelledByDriver.as_str())
        .bind(TripStatus::CancelledByClient.as_str())
        .bind(UserRole::Client.as_str())
        .bind(UserRole::Driver.as_str())
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }
}
