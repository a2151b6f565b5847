use tracing::{info, warn};

use crate::auth::password::verify_credential;
use crate::config::{AdminCredentials, AppConfig};
use crate::session::Session;
use crate::store::Store;

/// Which authorization model is in effect. The two models come from the two
/// historical deployments of this portal and imply different things: a fixed
/// pair grants admin without any backing user record, while the flag model
/// reads `is_admin` off the record. Selected once at startup.
#[derive(Debug, Clone)]
pub enum AdminPolicy {
    /// `is_admin` lives on the user record.
    UserFlag,
    /// A configured credential pair is checked before the user collection
    /// and yields an admin session not backed by any user. Regular logins
    /// under this model never get the admin role from their record.
    Fixed(AdminCredentials),
}

impl AdminPolicy {
    pub fn from_config(config: &AppConfig) -> Self {
        match &config.fixed_admin {
            Some(credentials) => AdminPolicy::Fixed(credentials.clone()),
            None => AdminPolicy::UserFlag,
        }
    }

    /// Resolves a login attempt to a session, or `None` when the
    /// credentials do not match. Soft-deleted users never authenticate.
    pub async fn authenticate(
        &self,
        store: &dyn Store,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<Session>> {
        if let AdminPolicy::Fixed(pair) = self {
            if username == pair.username && password == pair.password {
                info!(%username, "fixed-credential admin login");
                return Ok(Some(Session {
                    user_id: None,
                    username: username.to_string(),
                    is_admin: true,
                }));
            }
        }

        let Some(user) = store.find_active_user_by_username(username).await? else {
            warn!(%username, "login for unknown or deleted user");
            return Ok(None);
        };

        if !verify_credential(password, &user.password) {
            warn!(%username, user_id = %user.id, "login with invalid password");
            return Ok(None);
        }

        let is_admin = match self {
            AdminPolicy::UserFlag => user.is_admin,
            AdminPolicy::Fixed(_) => false,
        };

        Ok(Some(Session {
            user_id: Some(user.id),
            username: user.username,
            is_admin,
        }))
    }
}
