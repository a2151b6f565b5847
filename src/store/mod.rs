#[cfg(test)]
mod mem;
mod pg;

#[cfg(test)]
pub use mem::MemStore;
pub use pg::PgStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub is_admin: bool,
    pub deletion_date: Option<OffsetDateTime>,
    pub update_date: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Full-row overwrite applied on admin edit. `password` is only replaced
/// when a new one was supplied.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    pub username: String,
    pub password: Option<String>,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeatherRecord {
    pub id: Uuid,
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub user_id: Uuid,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewWeatherRecord {
    pub city: String,
    pub temperature: f64,
    pub description: String,
    pub icon: String,
    pub user_id: Uuid,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub lon: Option<f64>,
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExchangeRateRecord {
    pub id: Uuid,
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
    pub user_id: Uuid,
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewExchangeRateRecord {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: f64,
    pub user_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AirQualityRecord {
    pub id: Uuid,
    pub city: String,
    pub aqi: f64,
    pub main_pollutant: String,
    pub user_id: Uuid,
    pub recorded_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAirQualityRecord {
    pub city: String,
    pub aqi: f64,
    pub main_pollutant: String,
    pub user_id: Uuid,
}

/// Persistence seam over the four record collections. Every write is a
/// single independent insert or full-row update; concurrent updates to the
/// same user resolve last-write-wins.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User>;
    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    /// Lookup for login. Soft-deleted users are excluded here, so they can
    /// no longer authenticate.
    async fn find_active_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>>;
    /// All users without a deletion date, oldest first.
    async fn list_active_users(&self) -> anyhow::Result<Vec<User>>;
    async fn update_user(&self, id: Uuid, update: UserUpdate) -> anyhow::Result<Option<User>>;
    /// Sets the deletion date. The row is never physically removed.
    async fn soft_delete_user(&self, id: Uuid) -> anyhow::Result<bool>;

    async fn insert_weather(&self, new: NewWeatherRecord) -> anyhow::Result<WeatherRecord>;
    /// The calling user's lookups, most recent first.
    async fn weather_history(&self, user_id: Uuid) -> anyhow::Result<Vec<WeatherRecord>>;

    async fn insert_exchange_rate(
        &self,
        new: NewExchangeRateRecord,
    ) -> anyhow::Result<ExchangeRateRecord>;
    /// The calling user's lookups, most recent first.
    async fn exchange_rate_history(&self, user_id: Uuid)
        -> anyhow::Result<Vec<ExchangeRateRecord>>;

    async fn insert_air_quality(
        &self,
        new: NewAirQualityRecord,
    ) -> anyhow::Result<AirQualityRecord>;
}
