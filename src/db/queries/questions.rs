use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;
use sqlx::{FromRow, SqliteConnection, SqlitePool};

use crate::db::Page;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

/// Fields of a question about to be inserted. None of them is required, and
/// form-driven clients send the numbers as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub category: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub difficulty: Option<i64>,
}

pub async fn count_questions(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(pool)
        .await
}

pub async fn get_all_questions(pool: &SqlitePool) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_questions_page(pool: &SqlitePool, page: Page) -> sqlx::Result<Vec<Question>> {
    let Some((limit, offset)) = page.window() else {
        return Ok(vec![]);
    };
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
ORDER BY id
LIMIT ?1 OFFSET ?2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn get_questions_for_category(
    pool: &SqlitePool,
    category_id: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.category = ?1
ORDER BY id
        "#,
    )
    .bind(category_id)
    .fetch_all(pool)
    .await
}

fn contains_folded(text: &str, folded_term: &str) -> bool {
    text.to_lowercase().contains(folded_term)
}

/// Every question whose text contains `term`, ignoring case, ordered by id.
///
/// SQLite only folds ASCII in `LIKE`, so the comparison happens here with
/// Unicode lowercasing.
pub async fn search_questions(pool: &SqlitePool, term: &str) -> sqlx::Result<Vec<Question>> {
    let folded_term = term.to_lowercase();
    let questions = get_all_questions(pool).await?;
    Ok(questions
        .into_iter()
        .filter(|q| {
            q.question
                .as_deref()
                .is_some_and(|text| contains_folded(text, &folded_term))
        })
        .collect())
}

pub async fn get_question_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(
        r#"
SELECT id, question, answer, category, difficulty
FROM questions
WHERE questions.id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn create_question(
    conn: &mut SqliteConnection,
    question: &NewQuestion,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question.question.as_deref())
    .bind(question.answer.as_deref())
    .bind(question.category)
    .bind(question.difficulty)
    .execute(conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

/// Returns the number of removed rows.
pub async fn delete_question(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<u64> {
    let removed = sqlx::query("DELETE FROM questions WHERE questions.id = ?1")
        .bind(id)
        .execute(conn)
        .await?
        .rows_affected();
    Ok(removed)
}

/// Makes the questions table match `questions` exactly, keeping ids. Runs on
/// the caller's connection so it can share a transaction with other imports.
pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: Vec<Question>,
) -> sqlx::Result<()> {
    let existing_ids: HashSet<i64> = sqlx::query_scalar::<_, i64>("SELECT id FROM questions")
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();
    let new_ids: HashSet<i64> = questions.iter().map(|q| q.id).collect();

    for question_id in existing_ids.difference(&new_ids) {
        delete_question(&mut *conn, *question_id).await?;
    }
    for question in questions {
        let statement = if existing_ids.contains(&question.id) {
            r#"
UPDATE questions SET question = ?2, answer = ?3, category = ?4, difficulty = ?5
WHERE questions.id = ?1
            "#
        } else {
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
            "#
        };
        sqlx::query(statement)
            .bind(question.id)
            .bind(question.question.as_deref())
            .bind(question.answer.as_deref())
            .bind(question.category)
            .bind(question.difficulty)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}
