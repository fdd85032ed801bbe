use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions::get_questions_for_category},
        Category, Question,
    },
    server::{app::AppState, envelope::Success, error::ApiError, extract::ApiPath},
};

use super::ApiResponse;

#[derive(Serialize)]
struct CategoriesList {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryQuestions {
    current_category: i64,
    questions: Vec<Question>,
    total_questions: usize,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<CategoriesList> {
    let categories = get_all_categories(&pool).await?;
    if categories.is_empty() {
        return Err(ApiError::NotFound);
    }
    Ok(Success::new(CategoriesList { categories }))
}

// Unlike `/questions`, an empty category is a normal answer.
async fn get_questions_of_category(
    State(pool): State<SqlitePool>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResponse<CategoryQuestions> {
    let questions = get_questions_for_category(&pool, id).await?;
    Ok(Success::new(CategoryQuestions {
        current_category: id,
        total_questions: questions.len(),
        questions,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_questions_of_category))
        .with_state(state)
}
