pub use crate::todos::repo_types::{Status, Todo};
use sqlx::PgPool;

impl Todo {
    /// All todos owned by the user, most recent first.
    pub async fn list_by_user(db: &PgPool, user_id: i64) -> sqlx::Result<Vec<Todo>> {
        sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, user_id, title, completed, status, year_bucket, created_at
            FROM todos
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        user_id: i64,
        title: &str,
        status: Status,
        completed: bool,
        year_bucket: i32,
    ) -> sqlx::Result<Todo> {
        sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (user_id, title, completed, status, year_bucket)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, completed, status, year_bucket, created_at
            "#,
        )
        .bind(user_id)
        .bind(title)
        .bind(completed)
        .bind(status)
        .bind(year_bucket)
        .fetch_one(db)
        .await
    }

    /// The `completed` flag of an owned todo, if it exists.
    pub async fn find_completed(db: &PgPool, user_id: i64, id: i64) -> sqlx::Result<Option<bool>> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT completed
            FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    /// Conditional write for toggle. The row may have been deleted since
    /// the read; the affected-row count is the authoritative "found".
    pub async fn set_state(
        db: &PgPool,
        user_id: i64,
        id: i64,
        status: Status,
        completed: bool,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET completed = $1, status = $2
            WHERE id = $3 AND user_id = $4
            "#,
        )
        .bind(completed)
        .bind(status)
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }

    /// Single scoped update for move; `None` means no owned row matched.
    pub async fn move_to(
        db: &PgPool,
        user_id: i64,
        id: i64,
        status: Status,
        year_bucket: i32,
        completed: bool,
    ) -> sqlx::Result<Option<Todo>> {
        sqlx::query_as::<_, Todo>(
            r#"
            UPDATE todos
            SET status = $1, year_bucket = $2, completed = $3
            WHERE id = $4 AND user_id = $5
            RETURNING id, user_id, title, completed, status, year_bucket, created_at
            "#,
        )
        .bind(status)
        .bind(year_bucket)
        .bind(completed)
        .bind(id)
        .bind(user_id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: i64, id: i64) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM todos
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
        Ok(result.rows_affected())
    }
}
