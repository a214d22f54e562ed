use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::SqlitePool;
use subtle::ConstantTimeEq;
use time::OffsetDateTime;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, Config, session::{self, Caller}};

use super::MessageKind;

#[derive(Deserialize)]
pub(crate) struct SendMessageBody {
    content: String,
    category: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct SendAnnouncementBody {
    content: String,
    password: String,
    category: Option<String>,
}

#[debug_handler]
pub(crate) async fn send(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(SendMessageBody { content, category }): Json<SendMessageBody>,
) -> AppResult<StatusCode> {
    let caller = session::require_caller(&session).await?;
    send_message(&db_pool, &caller, &content, category.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[debug_handler(state = AppState)]
pub(crate) async fn announce(
    State(db_pool): State<SqlitePool>,
    State(config): State<Config>,
    session: Session,
    Json(SendAnnouncementBody { content, password, category }): Json<SendAnnouncementBody>,
) -> AppResult<StatusCode> {
    let caller = session::require_caller(&session).await?;
    send_announcement(
        &db_pool,
        &caller,
        &config.announcement_password,
        &password,
        &content,
        category.as_deref(),
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn send_message(
    db_pool: &SqlitePool,
    caller: &Caller,
    content: &str,
    category: Option<&str>,
) -> AppResult<Uuid> {
    insert_message(db_pool, caller, MessageKind::Message, content, category).await
}

/// The announcement gate is a shared secret, not a role: any signed-in
/// user who knows it broadcasts as themselves. Wrong password is an
/// authorization failure, distinct from not being signed in.
pub async fn send_announcement(
    db_pool: &SqlitePool,
    caller: &Caller,
    secret: &str,
    password: &str,
    content: &str,
    category: Option<&str>,
) -> AppResult<Uuid> {
    if !password_matches(secret, password) {
        return Err(AppError::Authorization(
            "Mot de passe incorrect pour publier une annonce".to_owned(),
        ));
    }

    insert_message(db_pool, caller, MessageKind::Announcement, content, category).await
}

fn password_matches(secret: &str, given: &str) -> bool {
    secret.as_bytes().ct_eq(given.as_bytes()).into()
}

async fn insert_message(
    db_pool: &SqlitePool,
    caller: &Caller,
    kind: MessageKind,
    content: &str,
    category: Option<&str>,
) -> AppResult<Uuid> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation("Le message ne peut pas être vide".to_owned()));
    }

    if let Some(category) = category {
        if sqlx::query_as::<_, (i64,)>("SELECT 1 FROM categories WHERE name=?")
            .bind(category)
            .fetch_optional(db_pool)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!("Catégorie inconnue: {category}")));
        }
    }

    let author_name = resolve_author_name(db_pool, caller, kind).await?;

    let id = Uuid::now_v7();
    let created_at = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
    sqlx::query(
        "INSERT INTO messages (id,content,author_id,author_name,kind,category,created_at)
         VALUES (?,?,?,?,?,?,?)",
    )
    .bind(id.to_string())
    .bind(content)
    .bind(&caller.user_id)
    .bind(&author_name)
    .bind(kind.as_str())
    .bind(category)
    .bind(created_at)
    .execute(db_pool)
    .await?;

    Ok(id)
}

/// authorName is a creation-time snapshot; later profile renames leave
/// past posts untouched.
async fn resolve_author_name(
    db_pool: &SqlitePool,
    caller: &Caller,
    kind: MessageKind,
) -> AppResult<String> {
    let profile_name: Option<(String,)> =
        sqlx::query_as("SELECT display_name FROM profiles WHERE user_id=?")
            .bind(&caller.user_id)
            .fetch_optional(db_pool)
            .await?;

    Ok(profile_name
        .map(|(name,)| name)
        .filter(|name| !name.is_empty())
        .or_else(|| caller.name.clone())
        .or_else(|| caller.email.clone())
        .unwrap_or_else(|| kind.anonymous_name().to_owned()))
}

#[cfg(test)]
mod tests {
    use super::password_matches;

    #[test]
    fn password_comparison() {
        assert!(password_matches("noussommeslecvl", "noussommeslecvl"));
        assert!(!password_matches("noussommeslecvl", "noussommeslecv"));
        assert!(!password_matches("noussommeslecvl", ""));
        assert!(!password_matches("noussommeslecvl", "NOUSSOMMESLECVL"));
    }
}
