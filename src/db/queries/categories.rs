use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqliteConnection, SqlitePool};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i64,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub kind: String,
}

pub async fn get_all_categories(pool: &SqlitePool) -> sqlx::Result<Vec<Category>> {
    sqlx::query_as::<_, Category>(
        r#"
SELECT id, "type"
FROM categories
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Makes the categories table match `categories` exactly: missing ids are
/// deleted, known ids renamed, unknown ids inserted.
pub async fn import_categories(
    conn: &mut SqliteConnection,
    categories: Vec<Category>,
) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = sqlx::query_scalar::<_, i64>("SELECT id FROM categories")
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();
    let new_ids: HashSet<i64> = categories.iter().map(|c| c.id).collect();

    for category_id in existing_ids.difference(&new_ids) {
        sqlx::query("DELETE FROM categories WHERE categories.id = ?1")
            .bind(category_id)
            .execute(&mut *conn)
            .await?;
    }
    for category in categories {
        let statement = if existing_ids.contains(&category.id) {
            r#"UPDATE categories SET "type" = ?2 WHERE categories.id = ?1"#
        } else {
            r#"INSERT INTO categories (id, "type") VALUES (?1, ?2)"#
        };
        sqlx::query(statement)
            .bind(category.id)
            .bind(&category.kind)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
