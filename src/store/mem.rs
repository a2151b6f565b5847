use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{
    AirQualityRecord, ExchangeRateRecord, NewAirQualityRecord, NewExchangeRateRecord, NewUser,
    NewWeatherRecord, Store, User, UserUpdate, WeatherRecord,
};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    // append-only, insertion order == timestamp order
    weather: Vec<WeatherRecord>,
    exchange_rates: Vec<ExchangeRateRecord>,
    air_quality: Vec<AirQualityRecord>,
}

/// In-memory store backing the handler tests. Writes take the lock for the
/// whole mutation, so concurrent edits to the same user serialize to
/// last-write-wins.
#[derive(Default)]
pub struct MemStore {
    inner: RwLock<Collections>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Air-quality lookups for one user, most recent first. There is no
    /// history route over this collection; the accessor lets tests observe
    /// inserts.
    pub fn air_quality_for(&self, user_id: Uuid) -> Vec<AirQualityRecord> {
        let inner = self.inner.read().expect("store lock poisoned");
        inner
            .air_quality
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn weather_count(&self) -> usize {
        self.inner.read().expect("store lock poisoned").weather.len()
    }

    pub fn exchange_rate_count(&self) -> usize {
        self.inner
            .read()
            .expect("store lock poisoned")
            .exchange_rates
            .len()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new: NewUser) -> anyhow::Result<User> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        if inner.users.values().any(|u| u.username == new.username) {
            anyhow::bail!("username `{}` already taken", new.username);
        }
        let user = User {
            id: Uuid::new_v4(),
            username: new.username,
            password: new.password,
            is_admin: new.is_admin,
            deletion_date: None,
            update_date: None,
            created_at: OffsetDateTime::now_utc(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_active_user_by_username(&self, username: &str) -> anyhow::Result<Option<User>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username && u.deletion_date.is_none())
            .cloned())
    }

    async fn list_active_users(&self) -> anyhow::Result<Vec<User>> {
        let inner = self.inner.read().expect("store lock poisoned");
        let mut users: Vec<User> = inner
            .users
            .values()
            .filter(|u| u.deletion_date.is_none())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn update_user(&self, id: Uuid, update: UserUpdate) -> anyhow::Result<Option<User>> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        user.username = update.username;
        if let Some(password) = update.password {
            user.password = password;
        }
        user.is_admin = update.is_admin;
        user.update_date = Some(OffsetDateTime::now_utc());
        Ok(Some(user.clone()))
    }

    async fn soft_delete_user(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        match inner.users.get_mut(&id) {
            Some(user) if user.deletion_date.is_none() => {
                user.deletion_date = Some(OffsetDateTime::now_utc());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_weather(&self, new: NewWeatherRecord) -> anyhow::Result<WeatherRecord> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let record = WeatherRecord {
            id: Uuid::new_v4(),
            city: new.city,
            temperature: new.temperature,
            description: new.description,
            icon: new.icon,
            user_id: new.user_id,
            sunrise: new.sunrise,
            sunset: new.sunset,
            lon: new.lon,
            lat: new.lat,
            recorded_at: OffsetDateTime::now_utc(),
        };
        inner.weather.push(record.clone());
        Ok(record)
    }

    async fn weather_history(&self, user_id: Uuid) -> anyhow::Result<Vec<WeatherRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .weather
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_exchange_rate(
        &self,
        new: NewExchangeRateRecord,
    ) -> anyhow::Result<ExchangeRateRecord> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let record = ExchangeRateRecord {
            id: Uuid::new_v4(),
            from_currency: new.from_currency,
            to_currency: new.to_currency,
            rate: new.rate,
            user_id: new.user_id,
            recorded_at: OffsetDateTime::now_utc(),
        };
        inner.exchange_rates.push(record.clone());
        Ok(record)
    }

    async fn exchange_rate_history(
        &self,
        user_id: Uuid,
    ) -> anyhow::Result<Vec<ExchangeRateRecord>> {
        let inner = self.inner.read().expect("store lock poisoned");
        Ok(inner
            .exchange_rates
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_air_quality(
        &self,
        new: NewAirQualityRecord,
    ) -> anyhow::Result<AirQualityRecord> {
        let mut inner = self.inner.write().expect("store lock poisoned");
        let record = AirQualityRecord {
            id: Uuid::new_v4(),
            city: new.city,
            aqi: new.aqi,
            main_pollutant: new.main_pollutant,
            user_id: new.user_id,
            recorded_at: OffsetDateTime::now_utc(),
        };
        inner.air_quality.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: "pw".into(),
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn listing_excludes_soft_deleted_users() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        assert!(store.soft_delete_user(alice.id).await.unwrap());

        let listed = store.list_active_users().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, bob.id);

        // still physically present
        let gone = store.find_user_by_id(alice.id).await.unwrap().unwrap();
        assert!(gone.deletion_date.is_some());
    }

    #[tokio::test]
    async fn soft_deleted_user_cannot_be_found_for_login() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        assert!(store
            .find_active_user_by_username("alice")
            .await
            .unwrap()
            .is_some());

        store.soft_delete_user(alice.id).await.unwrap();
        assert!(store
            .find_active_user_by_username("alice")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemStore::new();
        store.create_user(new_user("alice")).await.unwrap();
        assert!(store.create_user(new_user("alice")).await.is_err());
    }

    #[tokio::test]
    async fn history_is_scoped_to_owner_and_most_recent_first() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        for (city, owner) in [("Almaty", alice.id), ("Astana", alice.id), ("Oslo", bob.id)] {
            store
                .insert_weather(NewWeatherRecord {
                    city: city.into(),
                    temperature: 1.0,
                    description: "clear sky".into(),
                    icon: "icon".into(),
                    user_id: owner,
                    sunrise: None,
                    sunset: None,
                    lon: None,
                    lat: None,
                })
                .await
                .unwrap();
        }

        let history = store.weather_history(alice.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(history.iter().all(|r| r.user_id == alice.id));
        // newest first
        assert_eq!(history[0].city, "Astana");
        assert_eq!(history[1].city, "Almaty");
    }

    #[tokio::test]
    async fn exchange_history_is_scoped_and_descending() {
        let store = MemStore::new();
        let alice = store.create_user(new_user("alice")).await.unwrap();
        let bob = store.create_user(new_user("bob")).await.unwrap();

        for (to, owner) in [("USD", alice.id), ("EUR", alice.id), ("GBP", bob.id)] {
            store
                .insert_exchange_rate(NewExchangeRateRecord {
                    from_currency: "KZT".into(),
                    to_currency: to.into(),
                    rate: 0.002,
                    user_id: owner,
                })
                .await
                .unwrap();
        }

        let history = store.exchange_rate_history(alice.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].to_currency, "EUR");
        assert_eq!(history[1].to_currency, "USD");
    }

    #[tokio::test]
    async fn user_edit_is_last_write_wins() {
        let store = MemStore::new();
        let user = store.create_user(new_user("alice")).await.unwrap();

        store
            .update_user(
                user.id,
                UserUpdate {
                    username: "alice-a".into(),
                    password: Some("first".into()),
                    is_admin: true,
                },
            )
            .await
            .unwrap();
        let after = store
            .update_user(
                user.id,
                UserUpdate {
                    username: "alice-b".into(),
                    password: Some("second".into()),
                    is_admin: false,
                },
            )
            .await
            .unwrap()
            .unwrap();

        // the later write wins in full, no field merge
        assert_eq!(after.username, "alice-b");
        assert_eq!(after.password, "second");
        assert!(!after.is_admin);
        assert!(after.update_date.is_some());
    }

    #[tokio::test]
    async fn edit_without_password_keeps_old_one() {
        let store = MemStore::new();
        let user = store.create_user(new_user("alice")).await.unwrap();

        let after = store
            .update_user(
                user.id,
                UserUpdate {
                    username: "alice2".into(),
                    password: None,
                    is_admin: false,
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(after.username, "alice2");
        assert_eq!(after.password, "pw");
    }
}
