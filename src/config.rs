use serde::Deserialize;

/// API keys for the four upstream providers.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderKeys {
    pub openweather: String,
    pub air_quality: String,
    pub exchange_rate: String,
    pub news: String,
}

/// Fixed admin credential pair. When present, admin access is granted by
/// matching this pair at login instead of the `is_admin` flag on the user
/// record.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub providers: ProviderKeys,
    pub fixed_admin: Option<AdminCredentials>,
    /// Store new passwords as plaintext instead of argon2 hashes. Legacy
    /// compatibility switch for pre-existing user tables.
    pub legacy_plaintext_passwords: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let providers = ProviderKeys {
            openweather: std::env::var("OPENWEATHER_API_KEY").unwrap_or_default(),
            air_quality: std::env::var("AIR_QUALITY_API_KEY").unwrap_or_default(),
            exchange_rate: std::env::var("EXCHANGE_RATE_API_KEY").unwrap_or_default(),
            news: std::env::var("NEWS_API_KEY").unwrap_or_default(),
        };
        let fixed_admin = match (
            std::env::var("ADMIN_USERNAME"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };
        let legacy_plaintext_passwords = std::env::var("PASSWORD_LEGACY_PLAINTEXT")
            .map(|v| v == "1" || v == "true")
            .unwrap_or(false);
        Ok(Self {
            database_url,
            providers,
            fixed_admin,
            legacy_plaintext_passwords,
        })
    }
}
