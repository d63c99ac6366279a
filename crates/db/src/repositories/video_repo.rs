//! Repository for the `video` outcome table.

use sqlx::PgPool;

use crate::models::video::VideoRecord;

/// Column list for video queries.
const COLUMNS: &str = "userid, vid_name, eval, upload_date";

/// Provides the uploaded-video outcome operations.
pub struct VideoRepo;

impl VideoRepo {
    /// Persist one outcome row for a successfully analyzed upload.
    /// Called strictly after the analysis pipeline succeeds.
    pub async fn insert(
        pool: &PgPool,
        userid: &str,
        vid_name: &str,
        eval: i32,
    ) -> Result<VideoRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO video (userid, vid_name, eval)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VideoRecord>(&query)
            .bind(userid)
            .bind(vid_name)
            .bind(eval)
            .fetch_one(pool)
            .await
    }

    /// List every outcome row (admin view).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<VideoRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM video ORDER BY upload_date DESC");
        sqlx::query_as::<_, VideoRecord>(&query).fetch_all(pool).await
    }

    /// List one user's outcome rows.
    pub async fn list_by_user(
        pool: &PgPool,
        userid: &str,
    ) -> Result<Vec<VideoRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM video WHERE userid = $1 ORDER BY upload_date DESC"
        );
        sqlx::query_as::<_, VideoRecord>(&query)
            .bind(userid)
            .fetch_all(pool)
            .await
    }

    /// Delete one user's outcome row by stored filename.
    /// Returns the number of rows removed.
    pub async fn delete(
        pool: &PgPool,
        userid: &str,
        vid_name: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM video WHERE userid = $1 AND vid_name = $2")
            .bind(userid)
            .bind(vid_name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
