use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    admin::dto::{AddUserForm, DeleteUserForm, EditUserForm},
    auth::{handlers::is_valid_username, password::encode_password},
    session::AdminUser,
    state::AppState,
    store::{NewUser, UserUpdate},
    views,
};

// Every route here is admin-gated, /edit-user/:id included: the lenient
// historical variant left that GET unguarded.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(list_users))
        .route("/admin/add-user", get(add_user_page).post(add_user))
        .route("/delete-user", post(delete_user))
        .route("/edit-user/:id", get(edit_user_page))
        .route("/users/edit/:user_id", post(edit_user))
}

#[instrument(skip(state, admin))]
pub async fn list_users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Html<String>, (StatusCode, String)> {
    match state.store.list_active_users().await {
        Ok(users) => Ok(views::admin_users(&admin.username, &users)),
        Err(e) => {
            error!(error = %e, "listing users failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error loading admin page".into(),
            ))
        }
    }
}

#[instrument(skip(admin))]
pub async fn add_user_page(AdminUser(admin): AdminUser) -> Html<String> {
    views::add_user(&admin.username)
}

#[instrument(skip(state, admin, form))]
pub async fn add_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<AddUserForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let username = form.username.trim().to_string();
    if !is_valid_username(&username) {
        warn!(%username, "add-user with invalid username");
        return Err((StatusCode::BAD_REQUEST, "Invalid username".into()));
    }

    let password = encode_password(&form.password, state.config.legacy_plaintext_passwords)
        .map_err(|e| {
            error!(error = %e, "password encoding failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to add new user".to_string())
        })?;

    match state
        .store
        .create_user(NewUser {
            username,
            password,
            is_admin: form.is_admin.as_deref() == Some("on"),
        })
        .await
    {
        Ok(user) => {
            info!(user_id = %user.id, username = %user.username, by = %admin.username, "admin created user");
            Ok(Redirect::to("/admin"))
        }
        Err(e) => {
            error!(error = %e, "adding user failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to add new user".into(),
            ))
        }
    }
}

#[instrument(skip(state, admin, form))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Form(form): Form<DeleteUserForm>,
) -> Result<Redirect, (StatusCode, String)> {
    match state.store.soft_delete_user(form.user_id).await {
        Ok(deleted) => {
            info!(user_id = %form.user_id, deleted, by = %admin.username, "user soft-deleted");
            Ok(Redirect::to("/admin"))
        }
        Err(e) => {
            error!(error = %e, user_id = %form.user_id, "soft delete failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error deleting user".into(),
            ))
        }
    }
}

#[instrument(skip(state, admin))]
pub async fn edit_user_page(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, (StatusCode, String)> {
    match state.store.find_user_by_id(id).await {
        Ok(Some(user)) => Ok(views::edit_user(&admin.username, &user)),
        Ok(None) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, user_id = %id, "loading user failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error".into(),
            ))
        }
    }
}

#[instrument(skip(state, admin, form))]
pub async fn edit_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<Uuid>,
    Form(form): Form<EditUserForm>,
) -> Result<Redirect, (StatusCode, String)> {
    let password = if form.password.is_empty() {
        None
    } else {
        Some(
            encode_password(&form.password, state.config.legacy_plaintext_passwords).map_err(
                |e| {
                    error!(error = %e, "password encoding failed");
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
                },
            )?,
        )
    };

    let update = UserUpdate {
        username: form.username.trim().to_string(),
        password,
        is_admin: form.is_admin == "true",
    };

    match state.store.update_user(user_id, update).await {
        Ok(Some(user)) => {
            info!(user_id = %user.id, by = %admin.username, "user updated");
            Ok(Redirect::to("/admin"))
        }
        Ok(None) => Err((StatusCode::NOT_FOUND, "User not found".into())),
        Err(e) => {
            error!(error = %e, user_id = %user_id, "updating user failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, "Server error".into()))
        }
    }
}
