mod update;

use axum::{Json, Router, debug_handler, extract::{Path, State}, routing::get};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppResult, AppState, session};

pub use update::{BIO_MAX_CHARS, is_known_class, update_profile};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub class_name: String,
    pub bio: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).put(update::update))
        .route("/{user_id}", get(profile))
}

#[debug_handler]
async fn profile(
    State(db_pool): State<SqlitePool>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Option<Profile>>> {
    Ok(Json(get_profile(&db_pool, &user_id).await?))
}

/// Soft-absent: an anonymous caller gets `null`, never an error.
#[debug_handler]
async fn me(
    State(db_pool): State<SqlitePool>,
    session: Session,
) -> AppResult<Json<Option<Profile>>> {
    let Some(caller) = session::current_caller(&session).await? else {
        return Ok(Json(None));
    };

    Ok(Json(get_profile(&db_pool, &caller.user_id).await?))
}

pub async fn get_profile(db_pool: &SqlitePool, user_id: &str) -> AppResult<Option<Profile>> {
    let row: Option<(String, String, String)> =
        sqlx::query_as("SELECT display_name,class_name,bio FROM profiles WHERE user_id=?")
            .bind(user_id)
            .fetch_optional(db_pool)
            .await?;

    Ok(row.map(|(display_name, class_name, bio)| Profile {
        user_id: user_id.to_owned(),
        display_name,
        class_name,
        bio,
    }))
}
