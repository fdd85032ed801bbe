use rand::seq::SliceRandom;
use rand::Rng;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::db::Question;

/// Questions not yet played, optionally limited to one category.
pub async fn candidate_questions(
    pool: &SqlitePool,
    previous_questions: &[i64],
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT id, question, answer, category, difficulty FROM questions WHERE 1 = 1",
    );
    if let Some(category_id) = category {
        query
            .push(" AND questions.category = ")
            .push_bind(category_id);
    }
    if !previous_questions.is_empty() {
        query.push(" AND questions.id NOT IN (");
        let mut ids = query.separated(", ");
        for id in previous_questions {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Question>().fetch_all(pool).await
}

pub fn pick<R: Rng + ?Sized>(candidates: &[Question], rng: &mut R) -> Option<Question> {
    candidates.choose(rng).cloned()
}

/// Uniformly random question outside `previous_questions`. `None` when every
/// candidate has already been played.
pub async fn next_question(
    pool: &SqlitePool,
    previous_questions: &[i64],
    category: Option<i64>,
) -> sqlx::Result<Option<Question>> {
    let candidates = candidate_questions(pool, previous_questions, category).await?;
    tracing::debug!(
        candidates = candidates.len(),
        ?category,
        "Choosing next quiz question"
    );
    Ok(pick(&candidates, &mut rand::thread_rng()))
}
