use serde::Deserialize;
use uuid::Uuid;

/// Add-user form. The admin checkbox submits `"on"` when ticked and is
/// absent otherwise.
#[derive(Debug, Deserialize)]
pub struct AddUserForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteUserForm {
    pub user_id: Uuid,
}

/// Edit form. The role select submits `"true"`/`"false"`; an empty
/// password means "keep the current one".
#[derive(Debug, Deserialize)]
pub struct EditUserForm {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_admin: String,
}
