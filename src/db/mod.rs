pub mod pagination;
pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Error;

use queries::{categories::import_categories, questions::import_questions};

pub use pagination::{Page, QUESTIONS_PER_PAGE};
pub use queries::categories::Category;
pub use queries::questions::{NewQuestion, Question};

pub async fn establish_connection(path: &str) -> Result<SqlitePool, Error> {
    let options =
        SqliteConnectOptions::from_str(format!("sqlite:{}", path).as_str())?.create_if_missing(true);
    SqlitePool::connect_with(options).await
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), Error> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Replaces categories and questions in one transaction, so a failing row
/// leaves both tables as they were.
pub async fn import_dataset(
    pool: &SqlitePool,
    categories: Vec<Category>,
    questions: Vec<Question>,
) -> Result<(), Error> {
    let mut tx = pool.begin().await?;
    import_categories(&mut *tx, categories).await?;
    import_questions(&mut *tx, questions).await?;
    tx.commit().await
}
