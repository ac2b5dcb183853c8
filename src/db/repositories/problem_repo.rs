//! Problem repository
//!
//! Read-only accessors: problem authoring lives outside this service.

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Problem, TestBundle, TestVector},
};

/// Repository for problem database operations
pub struct ProblemRepository;

impl ProblemRepository {
    /// Find problem by ID
    pub async fn find_by_id(pool: &PgPool, id: &Uuid) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problems WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(problem)
    }

    /// Fetch the full dispatch bundle for a (problem, language) pair: the
    /// source template plus the ordered test vectors. Returns None when the
    /// problem has no template for that language.
    pub async fn fetch_bundle(
        pool: &PgPool,
        problem_id: &Uuid,
        language_id: i32,
    ) -> AppResult<Option<TestBundle>> {
        let template: Option<String> = sqlx::query_scalar(
            r#"SELECT template FROM problem_templates WHERE problem_id = $1 AND language_id = $2"#,
        )
        .bind(problem_id)
        .bind(language_id)
        .fetch_optional(pool)
        .await?;

        let Some(template) = template else {
            return Ok(None);
        };

        let tests = sqlx::query_as::<_, TestVector>(
            r#"SELECT * FROM problem_test_vectors WHERE problem_id = $1 ORDER BY index"#,
        )
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(Some(TestBundle {
            problem_id: *problem_id,
            language_id,
            template,
            tests,
        }))
    }
}
