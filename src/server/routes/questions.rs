use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{self, count_questions, get_questions_page},
        },
        Category, NewQuestion, Page, Question,
    },
    server::{
        app::AppState,
        envelope::Success,
        error::ApiError,
        deserializers::deserialize_option_string_from_number,
        extract::{ApiJson, ApiPath, ApiQuery},
    },
    telemetry::MUTATIONS_CNTR,
};

use super::{ApiResponse, PageQuery};

#[derive(Deserialize)]
struct SearchBody {
    #[serde(
        rename = "searchTerm",
        default,
        deserialize_with = "deserialize_option_string_from_number"
    )]
    search_term: Option<String>,
}

#[derive(Serialize)]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: i64,
    categories: Vec<Category>,
    current_category: Vec<i64>,
}

#[derive(Serialize)]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Vec<i64>,
}

#[derive(Serialize)]
struct Deleted {
    questions: Vec<Question>,
    total_questions: i64,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    questions: Vec<Question>,
    total_questions: i64,
    created: i64,
}

fn mutation_failed(kind: &'static str) -> impl FnOnce(sqlx::Error) -> ApiError {
    move |err| {
        tracing::warn!("Failed to {kind} question: {err}");
        MUTATIONS_CNTR.with_label_values(&[kind, "failed"]).inc();
        ApiError::Unprocessable
    }
}

// The mutation is already committed when the listing that follows it fails.
fn relisting_failed(err: sqlx::Error) -> ApiError {
    tracing::warn!("Failed to list questions after a mutation: {err}");
    ApiError::Unprocessable
}

async fn questions_after_mutation(
    pool: &SqlitePool,
    page: Page,
) -> Result<(Vec<Question>, i64), ApiError> {
    let questions = get_questions_page(pool, page)
        .await
        .map_err(relisting_failed)?;
    let total_questions = count_questions(pool).await.map_err(relisting_failed)?;
    Ok((questions, total_questions))
}

async fn get_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<QuestionsPage> {
    let questions = get_questions_page(&pool, page).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Success::new(QuestionsPage {
        questions,
        total_questions: count_questions(&pool).await?,
        categories: get_all_categories(&pool).await?,
        current_category: vec![],
    }))
}

/// Removes the question inside a transaction. `Ok(false)` when nothing was
/// there to remove.
async fn delete_committed(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
    let mut tx = pool.begin().await?;
    match questions::delete_question(&mut *tx, id).await {
        Ok(0) => {
            tx.rollback().await?;
            Ok(false)
        }
        Ok(_) => {
            tx.commit().await?;
            Ok(true)
        }
        Err(err) => {
            tx.rollback().await?;
            Err(err)
        }
    }
}

async fn remove_question(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
) -> ApiResponse<Deleted> {
    if !delete_committed(&pool, id)
        .await
        .map_err(mutation_failed("delete"))?
    {
        return Err(ApiError::NotFound);
    }
    MUTATIONS_CNTR.with_label_values(&["delete", "ok"]).inc();
    tracing::info!(id, "Deleted question");

    let (questions, total_questions) = questions_after_mutation(&pool, page).await?;
    Ok(Success::new(Deleted {
        questions,
        total_questions,
        deleted: id,
    }))
}

async fn insert_committed(pool: &SqlitePool, question: &NewQuestion) -> sqlx::Result<i64> {
    let mut tx = pool.begin().await?;
    match questions::create_question(&mut *tx, question).await {
        Ok(id) => {
            tx.commit().await?;
            Ok(id)
        }
        Err(err) => {
            tx.rollback().await?;
            Err(err)
        }
    }
}

// Fields are stored as sent, absent ones included.
async fn create_question(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
    ApiJson(new_question): ApiJson<NewQuestion>,
) -> ApiResponse<Created> {
    let id = insert_committed(&pool, &new_question)
        .await
        .map_err(mutation_failed("create"))?;
    MUTATIONS_CNTR.with_label_values(&["create", "ok"]).inc();
    tracing::info!(id, "Created question");

    let (questions, total_questions) = questions_after_mutation(&pool, page).await?;
    Ok(Success::new(Created {
        questions,
        total_questions,
        created: id,
    }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    ApiQuery(PageQuery { page }): ApiQuery<PageQuery>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<SearchResults> {
    let term = match body.search_term {
        Some(term) if !term.is_empty() => term,
        _ => return Err(ApiError::BadRequest),
    };

    let matches = questions::search_questions(&pool, &term).await?;
    if matches.is_empty() {
        return Err(ApiError::NotFound);
    }
    let total_questions = matches.len();

    Ok(Success::new(SearchResults {
        questions: page.slice(matches),
        total_questions,
        current_category: vec![],
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(get_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(remove_question))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_term_is_optional_in_body() {
        let body: SearchBody = serde_json::from_str("{}").unwrap();
        assert!(body.search_term.is_none());

        let body: SearchBody = serde_json::from_str(r#"{"searchTerm": "title"}"#).unwrap();
        assert_eq!(body.search_term.as_deref(), Some("title"));
    }

    #[test]
    fn numeric_search_term_is_read_as_text() {
        let body: SearchBody = serde_json::from_str(r#"{"searchTerm": 1984}"#).unwrap();
        assert_eq!(body.search_term.as_deref(), Some("1984"));

        let body: SearchBody = serde_json::from_str(r#"{"searchTerm": null}"#).unwrap();
        assert!(body.search_term.is_none());
    }

    #[test]
    fn failed_relisting_is_unprocessable() {
        assert!(matches!(
            relisting_failed(sqlx::Error::PoolTimedOut),
            ApiError::Unprocessable
        ));
    }
}
