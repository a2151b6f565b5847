use serde::Deserialize;

/// Login form body.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Signup form body.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

/// Query string on the login view, e.g. the "please log in" notice the
/// weather lookup redirects with.
#[derive(Debug, Deserialize, Default)]
pub struct LoginQuery {
    pub message: Option<String>,
}
