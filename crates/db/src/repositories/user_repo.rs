//! Repository for the `basemp` accounts table.

use sqlx::PgPool;

use crate::models::user::{UpsertUser, UserAccount};

/// Column list for basemp queries.
const COLUMNS: &str = "userid, userpass, username, usermail";

/// Provides the account pass-through operations.
pub struct UserRepo;

impl UserRepo {
    /// Look up an account by exact credential match.
    pub async fn find_by_credentials(
        pool: &PgPool,
        userid: &str,
        userpass: &str,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM basemp WHERE userid = $1 AND userpass = $2");
        sqlx::query_as::<_, UserAccount>(&query)
            .bind(userid)
            .bind(userpass)
            .fetch_optional(pool)
            .await
    }

    /// Look up an account by id.
    pub async fn find_by_id(
        pool: &PgPool,
        userid: &str,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM basemp WHERE userid = $1");
        sqlx::query_as::<_, UserAccount>(&query)
            .bind(userid)
            .fetch_optional(pool)
            .await
    }

    /// Partial-match search on username. `pattern` is a LIKE pattern; `%`
    /// lists everything.
    pub async fn search_by_name(
        pool: &PgPool,
        pattern: &str,
    ) -> Result<Vec<UserAccount>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM basemp WHERE username LIKE $1 ORDER BY userid");
        sqlx::query_as::<_, UserAccount>(&query)
            .bind(pattern)
            .fetch_all(pool)
            .await
    }

    /// Insert a new account, returning the created row.
    pub async fn create(pool: &PgPool, input: &UpsertUser) -> Result<UserAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO basemp (userid, userpass, username, usermail)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAccount>(&query)
            .bind(&input.userid)
            .bind(&input.userpass)
            .bind(&input.username)
            .bind(&input.usermail)
            .fetch_one(pool)
            .await
    }

    /// Update an existing account. Returns `None` when the id is unknown.
    pub async fn update(
        pool: &PgPool,
        input: &UpsertUser,
    ) -> Result<Option<UserAccount>, sqlx::Error> {
        let query = format!(
            "UPDATE basemp SET userpass = $1, username = $2, usermail = $3
             WHERE userid = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAccount>(&query)
            .bind(&input.userpass)
            .bind(&input.username)
            .bind(&input.usermail)
            .bind(&input.userid)
            .fetch_optional(pool)
            .await
    }

    /// Delete every account in `userids`. Returns the number of rows removed.
    pub async fn delete_many(pool: &PgPool, userids: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM basemp WHERE userid = ANY($1)")
            .bind(userids)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
