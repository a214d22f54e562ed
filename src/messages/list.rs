use axum::{Json, debug_handler, extract::{Query, State}};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::AppResult;

use super::{LIST_WINDOW, Message, MessageKind};

#[derive(Deserialize)]
pub(crate) struct ListQuery {
    category: Option<String>,
}

#[debug_handler]
pub(crate) async fn list(
    State(db_pool): State<SqlitePool>,
    Query(ListQuery { category }): Query<ListQuery>,
) -> AppResult<Json<Vec<Message>>> {
    Ok(Json(list_messages(&db_pool, category.as_deref()).await?))
}

/// Most recent first. Anything past the window is invisible, even in a
/// filtered set.
pub async fn list_messages(db_pool: &SqlitePool, category: Option<&str>) -> AppResult<Vec<Message>> {
    let rows: Vec<(String, String, String, String, String, Option<String>, i64)> =
        if let Some(category) = category {
            sqlx::query_as(
                "SELECT id,content,author_id,author_name,kind,category,created_at
                 FROM messages WHERE category=?
                 ORDER BY created_at DESC, rowid DESC LIMIT ?",
            )
            .bind(category)
            .bind(LIST_WINDOW)
            .fetch_all(db_pool)
            .await?
        } else {
            sqlx::query_as(
                "SELECT id,content,author_id,author_name,kind,category,created_at
                 FROM messages
                 ORDER BY created_at DESC, rowid DESC LIMIT ?",
            )
            .bind(LIST_WINDOW)
            .fetch_all(db_pool)
            .await?
        };

    let mut messages = Vec::with_capacity(rows.len());
    for (id, content, author_id, author_name, kind, category, created_at) in rows {
        messages.push(Message {
            id: Uuid::parse_str(&id)?,
            content,
            author_id,
            author_name,
            kind: MessageKind::from_column(&kind),
            category,
            created_at,
        });
    }

    Ok(messages)
}
