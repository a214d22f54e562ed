mod defaults;

use axum::{Json, Router, debug_handler, extract::State, http::StatusCode, routing::{get, post}};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower_sessions::Session;
use uuid::Uuid;

use crate::{AppResult, AppState, session};

pub use defaults::{DEFAULT_CATEGORIES, initialize_default_categories};

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub color: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/init", post(init_defaults))
}

#[debug_handler]
async fn list(State(db_pool): State<SqlitePool>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(list_categories(&db_pool).await?))
}

#[derive(Deserialize)]
pub(crate) struct CreateCategoryBody {
    name: String,
    description: String,
    color: String,
}

#[debug_handler]
async fn create(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(CreateCategoryBody { name, description, color }): Json<CreateCategoryBody>,
) -> AppResult<Json<Uuid>> {
    session::require_caller(&session).await?;
    Ok(Json(create_category(&db_pool, &name, &description, &color).await?))
}

#[debug_handler]
async fn init_defaults(State(db_pool): State<SqlitePool>) -> AppResult<StatusCode> {
    initialize_default_categories(&db_pool).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Insertion order; the store makes no other guarantee.
pub async fn list_categories(db_pool: &SqlitePool) -> AppResult<Vec<Category>> {
    let rows: Vec<(String, String, String, String)> =
        sqlx::query_as("SELECT id,name,description,color FROM categories ORDER BY rowid")
            .fetch_all(db_pool)
            .await?;

    rows.into_iter()
        .map(|(id, name, description, color)| {
            Ok(Category {
                id: Uuid::parse_str(&id)?,
                name,
                description,
                color,
            })
        })
        .collect()
}

/// Any signed-in user may create a category; names are unique by
/// convention only.
pub async fn create_category(
    db_pool: &SqlitePool,
    name: &str,
    description: &str,
    color: &str,
) -> AppResult<Uuid> {
    let id = Uuid::now_v7();
    sqlx::query("INSERT INTO categories (id,name,description,color) VALUES (?,?,?,?)")
        .bind(id.to_string())
        .bind(name)
        .bind(description)
        .bind(color)
        .execute(db_pool)
        .await?;

    Ok(id)
}
