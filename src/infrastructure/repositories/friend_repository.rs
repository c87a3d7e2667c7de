//! Friend Repository Implementation
//!
//! PostgreSQL implementation of the FriendRepository trait. Friendships
//! are one row per unordered pair with `user_a < user_b`; pending
//! requests are directed rows in `friend_requests`.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Friend, FriendRepository, FriendRequestItem};
use crate::shared::error::AppError;

/// Database row for friend listings.
#[derive(Debug, sqlx::FromRow)]
struct FriendRow {
    id: i64,
    username: String,
    image: String,
}

impl From<FriendRow> for Friend {
    fn from(row: FriendRow) -> Self {
        Friend {
            id: row.id,
            username: row.username,
            image: row.image,
        }
    }
}

/// Database row for request listings. `request_type` is 1 for incoming,
/// 0 for outgoing.
#[derive(Debug, sqlx::FromRow)]
struct FriendRequestRow {
    id: i64,
    username: String,
    image: String,
    request_type: i16,
}

impl From<FriendRequestRow> for FriendRequestItem {
    fn from(row: FriendRequestRow) -> Self {
        FriendRequestItem {
            id: row.id,
            username: row.username,
            image: row.image,
            request_type: row.request_type as u8,
        }
    }
}

/// PostgreSQL friend repository implementation.
#[derive(Clone)]
pub struct PgFriendRepository {
    pool: PgPool,
}

impl PgFriendRepository {
    /// Create a new PgFriendRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendRepository for PgFriendRepository {
    async fn friends_list(&self, user_id: i64) -> Result<Vec<Friend>, AppError> {
        let rows = sqlx::query_as::<_, FriendRow>(
            r#"
            SELECT u.id, u.username, u.image
            FROM friendships f
            INNER JOIN users u
                ON u.id = CASE WHEN f.user_a = $1 THEN f.user_b ELSE f.user_a END
            WHERE f.user_a = $1 OR f.user_b = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Friend::from).collect())
    }

    async fn request_list(&self, user_id: i64) -> Result<Vec<FriendRequestItem>, AppError> {
        let rows = sqlx::query_as::<_, FriendRequestRow>(
            r#"
            SELECT u.id, u.username, u.image, 1::smallint AS request_type
            FROM friend_requests fr
            INNER JOIN users u ON u.id = fr.sender_id
            WHERE fr.receiver_id = $1
            UNION ALL
            SELECT u.id, u.username, u.image, 0::smallint AS request_type
            FROM friend_requests fr
            INNER JOIN users u ON u.id = fr.receiver_id
            WHERE fr.sender_id = $1
            ORDER BY username ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(FriendRequestItem::from).collect())
    }

    async fn is_friend(&self, a: i64, b: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM friendships
                WHERE user_a = LEAST($1, $2) AND user_b = GREATEST($1, $2)
            )
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn request_exists(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2)",
        )
        .bind(sender)
        .bind(receiver)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        // The bare ON CONFLICT covers both the directed primary key and
        // the unordered-pair unique index, so a racing reciprocal insert
        // degrades into a no-op instead of a second row.
        let result = sqlx::query(
            r#"
            INSERT INTO friend_requests (sender_id, receiver_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(sender)
        .bind(receiver)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_request(&self, sender: i64, receiver: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2",
        )
        .bind(sender)
        .bind(receiver)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn accept_request(&self, requester: i64, acceptor: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;

        // Consume the pending request. A concurrent accept or cancel may
        // have won already, in which case nothing happens.
        let consumed = sqlx::query(
            "DELETE FROM friend_requests WHERE sender_id = $1 AND receiver_id = $2",
        )
        .bind(requester)
        .bind(acceptor)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO friendships (user_a, user_b)
            VALUES (LEAST($1, $2), GREATEST($1, $2))
            ON CONFLICT (user_a, user_b) DO NOTHING
            "#,
        )
        .bind(requester)
        .bind(acceptor)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(true)
    }

    async fn remove_friend(&self, a: i64, b: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM friendships WHERE user_a = LEAST($1, $2) AND user_b = GREATEST($1, $2)",
        )
        .bind(a)
        .bind(b)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
