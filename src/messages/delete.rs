use axum::{debug_handler, extract::{Path, State}, http::StatusCode};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppError, AppResult, session::{self, Caller}};

#[debug_handler]
pub(crate) async fn remove(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Path(message_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let caller = session::require_caller(&session).await?;
    delete_message(&db_pool, &caller, message_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Author-only. Knowing the announcement secret grants no delete
/// privilege over anyone else's posts.
pub async fn delete_message(db_pool: &SqlitePool, caller: &Caller, message_id: Uuid) -> AppResult<()> {
    let Some((author_id,)): Option<(String,)> =
        sqlx::query_as("SELECT author_id FROM messages WHERE id=?")
            .bind(message_id.to_string())
            .fetch_optional(db_pool)
            .await?
    else {
        return Err(AppError::NotFound("Message non trouvé".to_owned()));
    };

    if author_id != caller.user_id {
        return Err(AppError::Authorization(
            "Vous ne pouvez supprimer que vos propres messages".to_owned(),
        ));
    }

    sqlx::query("DELETE FROM messages WHERE id=?")
        .bind(message_id.to_string())
        .execute(db_pool)
        .await?;

    Ok(())
}
