use tower_sessions::Session;

use crate::{AppError, AppResult};

pub const USER_ID: &str = "user_id";
pub const USER_NAME: &str = "user_name";
pub const USER_EMAIL: &str = "user_email";
pub const CSRF_STATE: &str = "csrf_state";
pub const PKCE_VERIFIER: &str = "pkce_verifier";
pub const RETURN_URL: &str = "return_url";

/// The signed-in identity as the provider reported it. `name` and
/// `email` feed the display-name fallback chain when no profile exists.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn current_caller(session: &Session) -> AppResult<Option<Caller>> {
    let Some(user_id) = session.get::<String>(USER_ID).await? else {
        return Ok(None);
    };

    Ok(Some(Caller {
        user_id,
        name: session.get(USER_NAME).await?,
        email: session.get(USER_EMAIL).await?,
    }))
}

pub async fn require_caller(session: &Session) -> AppResult<Caller> {
    current_caller(session).await?.ok_or_else(AppError::signed_out)
}
