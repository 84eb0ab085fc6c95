use chrono::{NaiveDate, Utc};

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        trip::{NewTrip, Trip, TripStatus},
        user::{User, UserRole},
    },
};

/// Write side of the trip ledger, used by the demo seeder and by tests.
/// The report path never goes through here; it stays read-only.
#[derive(Clone)]
pub struct TripLedger {
    db: DbPool,
}

impl TripLedger {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    pub async fn insert_user(&self, role: UserRole, banned: bool) -> Result<User, AppError> {
        let now = Utc::now();
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (role, banned, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3) RETURNING *",
        )
        .bind(role.as_str())
        .bind(banned)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    pub async fn insert_trip(&self, new: NewTrip) -> Result<Trip, AppError> {
        let now = Utc::now();
        let trip = sqlx::query_as::<_, Trip>(
            "INSERT INTO trips (client_id, driver_id, city_id, status, request_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6) RETURNING *",
        )
        .bind(new.client_id)
        .bind(new.driver_id)
        .bind(new.city_id)
        .bind(new.status.as_str())
        .bind(new.request_at)
        .bind(now)
        .fetch_one(&self.db)
        .await?;
        Ok(trip)
    }

    /// Seeds the demo taxi ledger: two eligible clients and drivers, one
    /// banned client and one banned driver, and seven trips across
    /// 2013-10-01..03 (two of them excluded for banned participants).
    pub async fn seed_demo(&self) -> Result<(), AppError> {
        let clients = [
            self.insert_user(UserRole::Client, false).await?,
            self.insert_user(UserRole::Client, false).await?,
        ];
        let drivers = [
            self.insert_user(UserRole::Driver, false).await?,
            self.insert_user(UserRole::Driver, false).await?,
        ];
        let banned_client = self.insert_user(UserRole::Client, true).await?;
        let banned_driver = self.insert_user(UserRole::Driver, true).await?;

        let day = |d: u32| NaiveDate::from_ymd_opt(2013, 10, d).expect("valid seed day");

        let trips = [
            NewTrip {
                client_id: clients[0].id,
                driver_id: drivers[0].id,
                city_id: 1,
                status: TripStatus::CancelledByDriver,
                request_at: day(1),
            },
            NewTrip {
                client_id: clients[1].id,
                driver_id: drivers[0].id,
                city_id: 1,
                status: TripStatus::Completed,
                request_at: day(1),
            },
            NewTrip {
                client_id: clients[0].id,
                driver_id: drivers[1].id,
                city_id: 2,
                status: TripStatus::Completed,
                request_at: day(2),
            },
            NewTrip {
                client_id: clients[1].id,
                driver_id: drivers[1].id,
                city_id: 2,
                status: TripStatus::CancelledByClient,
                request_at: day(3),
            },
            NewTrip {
                client_id: clients[1].id,
                driver_id: drivers[0].id,
                city_id: 2,
                status: TripStatus::Completed,
                request_at: day(3),
            },
            NewTrip {
                client_id: banned_client.id,
                driver_id: drivers[0].id,
                city_id: 3,
                status: TripStatus::CancelledByClient,
                request_at: day(3),
            },
            NewTrip {
                client_id: clients[0].id,
                driver_id: banned_driver.id,
                city_id: 3,
                status: TripStatus::CancelledByDriver,
                request_at: day(3),
            },
        ];

        for trip in trips {
            self.insert_trip(trip).await?;
        }

        Ok(())
    }
}
