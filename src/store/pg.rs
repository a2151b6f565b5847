use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    AirQualityRecord, ExchangeRateRecord, NewAirQualityRecord, NewExchangeRateRecord, NewUser,
    NewWeatherRecord, Store, User, UserUpdate, WeatherRecord,
};

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password, is_admin)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, is_admin, deletion_date, update_date, created_at
            "#,
        )
        .bind(&new.username)
        .bind(&new.password)
        .bind(new.is_admin)
        .fetch_one(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, is_admin, deletion_date, update_date, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn find_active_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, is_admin, deletion_date, update_date, created_at
            FROM users
            WHERE username = $1 AND deletion_date IS NULL
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn list_active_users(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password, is_admin, deletion_date, update_date, created_at
            FROM users
            WHERE deletion_date IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = $2,
                password = COALESCE($3, password),
                is_admin = $4,
                update_date = $5
            WHERE id = $1
            RETURNING id, username, password, is_admin, deletion_date, update_date, created_at
            "#,
        )
        .bind(id)
        .bind(&update.username)
        .bind(update.password.as_deref())
        .bind(update.is_admin)
        .bind(OffsetDateTime::now_utc())
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn soft_delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET deletion_date = $2
            WHERE id = $1 AND deletion_date IS NULL
            "#,
        )
        .bind(id)
        .bind(OffsetDateTime::now_utc())
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_weather(&self, new: NewWeatherRecord) -> anyhow::Result<WeatherRecord> {
        let record = sqlx::query_as::<_, WeatherRecord>(
            r#"
            INSERT INTO weather_records
                (city, temperature, description, icon, user_id, sunrise, sunset, lon, lat)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, city, temperature, description, icon, user_id,
                      sunrise, sunset, lon, lat, recorded_at
            "#,
        )
        .bind(&new.city)
        .bind(new.temperature)
        .bind(&new.description)
        .bind(&new.icon)
        .bind(new.user_id)
        .bind(new.sunrise)
        .bind(new.sunset)
        .bind(new.lon)
        .bind(new.lat)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn weather_history(&self, user_id: Uuid) -> anyhow::Result<Vec<WeatherRecord>> {
        let rows = sqlx::query_as::<_, WeatherRecord>(
            r#"
            SELECT id, city, temperature, description, icon, user_id,
                   sunrise, sunset, lon, lat, recorded_at
            FROM weather_records
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_exchange_rate(
        &self,
        new: NewExchangeRateRecord,
    ) -> anyhow::Result<ExchangeRateRecord> {
        let record = sqlx::query_as::<_, ExchangeRateRecord>(
            r#"
            INSERT INTO exchange_rate_records (from_currency, to_currency, rate, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, from_currency, to_currency, rate, user_id, recorded_at
            "#,
        )
        .bind(&new.from_currency)
        .bind(&new.to_currency)
        .bind(new.rate)
        .bind(new.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }

    async fn exchange_rate_history(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ExchangeRateRecord>> {
        let rows = sqlx::query_as::<_, ExchangeRateRecord>(
            r#"
            SELECT id, from_currency, to_currency, rate, user_id, recorded_at
            FROM exchange_rate_records
            WHERE user_id = $1
            ORDER BY recorded_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn insert_air_quality(
        &self,
        new: NewAirQualityRecord,
    ) -> anyhow::Result<AirQualityRecord> {
        let record = sqlx::query_as::<_, AirQualityRecord>(
            r#"
            INSERT INTO air_quality_records (city, aqi, main_pollutant, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, city, aqi, main_pollutant, user_id, recorded_at
            "#,
        )
        .bind(&new.city)
        .bind(new.aqi)
        .bind(&new.main_pollutant)
        .bind(new.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(record)
    }
}
