use axum::{body::Bytes, extract::State, routing::post, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::Question,
    quiz::next_question,
    server::{app::AppState, envelope::Success, error::ApiError},
    telemetry::{ALL_CATEGORIES, QUIZ_QUESTIONS_CNTR},
};

use super::ApiResponse;

#[derive(Debug, Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    #[serde(default)]
    quiz_category: Option<QuizCategory>,
}

// the frontend sends the id back the way it received it, sometimes as text
#[derive(Debug, Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Question,
}

fn parse_request(body: &[u8]) -> Result<QuizRequest, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!("Unusable quiz request: {err}");
        ApiError::Unprocessable
    })
}

// Every failure here, including a drained category, is a 422.
async fn play_quiz(State(pool): State<SqlitePool>, body: Bytes) -> ApiResponse<NextQuestion> {
    let request = parse_request(&body)?;
    let category = request.quiz_category.map(|c| c.id);

    let question = next_question(&pool, &request.previous_questions, category)
        .await
        .map_err(|err| {
            tracing::warn!("Failed to select quiz question: {err}");
            ApiError::Unprocessable
        })?
        .ok_or(ApiError::Unprocessable)?;

    let label = category.map_or_else(|| ALL_CATEGORIES.to_owned(), |id| id.to_string());
    QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();

    Ok(Success::new(NextQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(play_quiz))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_id_may_be_text() {
        let request = parse_request(
            br#"{"previous_questions": [3, 9], "quiz_category": {"type": "Art", "id": "2"}}"#,
        )
        .unwrap();
        assert_eq!(request.previous_questions, vec![3, 9]);
        assert_eq!(request.quiz_category.map(|c| c.id), Some(2));
    }

    #[test]
    fn category_is_optional() {
        let request = parse_request(br#"{"previous_questions": []}"#).unwrap();
        assert!(request.quiz_category.is_none());
    }

    #[test]
    fn previous_questions_are_required() {
        assert!(matches!(
            parse_request(br#"{"quiz_category": {"id": 1}}"#),
            Err(ApiError::Unprocessable)
        ));
        assert!(matches!(
            parse_request(br#"{"previous_questions": ["a"]}"#),
            Err(ApiError::Unprocessable)
        ));
        assert!(matches!(parse_request(b""), Err(ApiError::Unprocessable)));
    }
}
