use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{AppError, AppResult, session::{self, Caller}};

pub const BIO_MAX_CHARS: usize = 200;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateProfileBody {
    display_name: String,
    class_name: String,
    bio: String,
}

#[debug_handler]
pub(crate) async fn update(
    State(db_pool): State<SqlitePool>,
    session: Session,
    Json(UpdateProfileBody { display_name, class_name, bio }): Json<UpdateProfileBody>,
) -> AppResult<StatusCode> {
    let caller = session::require_caller(&session).await?;
    update_profile(&db_pool, &caller, &display_name, &class_name, &bio).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upsert keyed on user_id: at most one profile per user, patched in
/// place on every save after the first.
pub async fn update_profile(
    db_pool: &SqlitePool,
    caller: &Caller,
    display_name: &str,
    class_name: &str,
    bio: &str,
) -> AppResult<()> {
    let display_name = display_name.trim();
    let bio = bio.trim();

    if display_name.is_empty() {
        return Err(AppError::Validation("Le nom affiché ne peut pas être vide".to_owned()));
    }
    if !is_known_class(class_name) {
        return Err(AppError::Validation(format!("Classe invalide: {class_name}")));
    }
    if bio.chars().count() > BIO_MAX_CHARS {
        return Err(AppError::Validation(format!(
            "La bio ne peut pas dépasser {BIO_MAX_CHARS} caractères"
        )));
    }

    sqlx::query(
        "INSERT INTO profiles (user_id,display_name,class_name,bio) VALUES (?,?,?,?)
         ON CONFLICT(user_id) DO UPDATE SET
            display_name=excluded.display_name,
            class_name=excluded.class_name,
            bio=excluded.bio",
    )
    .bind(&caller.user_id)
    .bind(display_name)
    .bind(class_name)
    .bind(bio)
    .execute(db_pool)
    .await?;

    Ok(())
}

/// The class codes the enrollment form offers: collège 301..608, lycée
/// 2nd01..Ter12, and the staff entries.
pub fn is_known_class(class_name: &str) -> bool {
    for niveau in 3..=6 {
        for classe in 1..=8 {
            if class_name == format!("{niveau}0{classe}") {
                return true;
            }
        }
    }

    for prefix in ["2nd", "1er", "Ter"] {
        for classe in 1..=12 {
            if class_name == format!("{prefix}{classe:02}") {
                return true;
            }
        }
    }

    matches!(class_name, "Professeur" | "Administration" | "Personnel")
}

#[cfg(test)]
mod tests {
    use super::is_known_class;

    #[test]
    fn class_codes() {
        assert!(is_known_class("601"));
        assert!(is_known_class("308"));
        assert!(is_known_class("2nd01"));
        assert!(is_known_class("1er12"));
        assert!(is_known_class("Ter09"));
        assert!(is_known_class("Professeur"));

        assert!(!is_known_class(""));
        assert!(!is_known_class("609"));
        assert!(!is_known_class("Ter13"));
        assert!(!is_known_class("2nd1"));
        assert!(!is_known_class("CM2"));
    }
}
