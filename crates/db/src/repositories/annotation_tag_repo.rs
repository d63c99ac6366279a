//! Repository for the `analysis_tag` annotation table.

use sqlx::PgPool;
use swinglab_core::types::DbId;

use crate::models::annotation_tag::{AnalysisTag, CreateAnalysisTag};

/// Column list for analysis_tag queries.
const COLUMNS: &str = "id, userid, analysis_id, frame_index, tag, memo, timestamp_sec";

/// Provides the append-only annotation tag operations.
pub struct AnalysisTagRepo;

impl AnalysisTagRepo {
    /// Append a tag with a server-side timestamp, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAnalysisTag,
    ) -> Result<AnalysisTag, sqlx::Error> {
        let query = format!(
            "INSERT INTO analysis_tag (userid, analysis_id, frame_index, tag, memo)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnalysisTag>(&query)
            .bind(input.userid)
            .bind(&input.analysis_id)
            .bind(input.frame_index)
            .bind(&input.tag)
            .bind(&input.memo)
            .fetch_one(pool)
            .await
    }

    /// List all tags for one analysis, ordered by frame index ascending.
    pub async fn list_by_analysis(
        pool: &PgPool,
        analysis_id: &str,
    ) -> Result<Vec<AnalysisTag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM analysis_tag
             WHERE analysis_id = $1
             ORDER BY frame_index ASC"
        );
        sqlx::query_as::<_, AnalysisTag>(&query)
            .bind(analysis_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a tag by id. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM analysis_tag WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
