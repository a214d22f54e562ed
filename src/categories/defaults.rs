use sqlx::SqlitePool;
use uuid::Uuid;

use crate::AppResult;

pub const DEFAULT_CATEGORIES: [(&str, &str, &str); 5] = [
    ("Général", "Discussions générales", "#3B82F6"),
    ("Cours", "Questions sur les cours", "#10B981"),
    ("Examens", "Informations sur les examens", "#F59E0B"),
    ("Événements", "Événements scolaires", "#8B5CF6"),
    ("Aide", "Demandes d'aide", "#EF4444"),
];

/// Seeds the five defaults when the store is empty. The empty-check and
/// the inserts are a single statement, so concurrent first-time clients
/// cannot double-seed; against a non-empty store this is a no-op.
pub async fn initialize_default_categories(db_pool: &SqlitePool) -> AppResult<()> {
    let mut query = sqlx::query(
        "INSERT INTO categories (id,name,description,color)
         SELECT column1,column2,column3,column4
         FROM (VALUES (?,?,?,?),(?,?,?,?),(?,?,?,?),(?,?,?,?),(?,?,?,?))
         WHERE NOT EXISTS (SELECT 1 FROM categories)",
    );
    for (name, description, color) in DEFAULT_CATEGORIES {
        query = query
            .bind(Uuid::now_v7().to_string())
            .bind(name)
            .bind(description)
            .bind(color);
    }
    query.execute(db_pool).await?;

    Ok(())
}
