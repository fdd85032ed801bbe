mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use serde::Deserialize;

use super::deserializers::deserialize_page_or_first;
use super::envelope::Success;
use super::error::ApiError;
use crate::db::Page;

pub type ApiResponse<T> = Result<Success<T>, ApiError>;

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default, deserialize_with = "deserialize_page_or_first")]
    page: Page,
}
