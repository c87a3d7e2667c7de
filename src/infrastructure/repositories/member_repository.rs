//! Member Repository Implementation
//!
//! PostgreSQL implementation of the MemberRepository trait. Covers
//! membership rows, per-guild settings, and the guild ban list.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{BannedUser, Member, MemberProfile, MemberRepository, MemberSettings};
use crate::shared::error::AppError;

/// Database row for member profile listings.
#[derive(Debug, sqlx::FromRow)]
struct MemberProfileRow {
    id: i64,
    username: String,
    image: String,
    nickname: Option<String>,
    color: Option<String>,
}

impl From<MemberProfileRow> for MemberProfile {
    fn from(row: MemberProfileRow) -> Self {
        MemberProfile {
            id: row.id,
            username: row.username,
            image: row.image,
            nickname: row.nickname,
            color: row.color,
        }
    }
}

/// Database row for ban listings.
#[derive(Debug, sqlx::FromRow)]
struct BannedUserRow {
    id: i64,
    username: String,
    image: String,
}

impl From<BannedUserRow> for BannedUser {
    fn from(row: BannedUserRow) -> Self {
        BannedUser {
            id: row.id,
            username: row.username,
            image: row.image,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct MemberSettingsRow {
    nickname: Option<String>,
    color: Option<String>,
}

impl From<MemberSettingsRow> for MemberSettings {
    fn from(row: MemberSettingsRow) -> Self {
        MemberSettings {
            nickname: row.nickname,
            color: row.color,
        }
    }
}

/// PostgreSQL member repository implementation.
#[derive(Clone)]
pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    /// Create a new PgMemberRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn is_member(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM members WHERE guild_id = $1 AND user_id = $2)",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn create(&self, member: &Member) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO members (guild_id, user_id, nickname, color, last_seen, joined_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (guild_id, user_id) DO NOTHING
            "#,
        )
        .bind(member.guild_id)
        .bind(member.user_id)
        .bind(&member.nickname)
        .bind(&member.color)
        .bind(member.last_seen)
        .bind(member.joined_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM members WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn member_ids(&self, guild_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT user_id FROM members WHERE guild_id = $1",
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn guild_ids_for_user(&self, user_id: i64) -> Result<Vec<i64>, AppError> {
        let ids = sqlx::query_scalar::<_, i64>(
            "SELECT guild_id FROM members WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn find_users_by_ids(
        &self,
        ids: &[i64],
        guild_id: i64,
    ) -> Result<Vec<MemberProfile>, AppError> {
        let rows = sqlx::query_as::<_, MemberProfileRow>(
            r#"
            SELECT u.id, u.username, u.image, m.nickname, m.color
            FROM users u
            INNER JOIN members m ON m.user_id = u.id AND m.guild_id = $2
            WHERE u.id = ANY($1)
            ORDER BY u.username ASC
            "#,
        )
        .bind(ids)
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MemberProfile::from).collect())
    }

    async fn get_settings(
        &self,
        guild_id: i64,
        user_id: i64,
    ) -> Result<Option<MemberSettings>, AppError> {
        let row = sqlx::query_as::<_, MemberSettingsRow>(
            "SELECT nickname, color FROM members WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(MemberSettings::from))
    }

    async fn update_settings(
        &self,
        guild_id: i64,
        user_id: i64,
        settings: &MemberSettings,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE members
            SET nickname = $3, color = $4
            WHERE guild_id = $1 AND user_id = $2
            "#,
        )
        .bind(guild_id)
        .bind(user_id)
        .bind(&settings.nickname)
        .bind(&settings.color)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Member not found in guild {} for user {}",
                guild_id, user_id
            )));
        }

        Ok(())
    }

    async fn update_last_seen(&self, guild_id: i64, user_id: i64) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE members SET last_seen = NOW() WHERE guild_id = $1 AND user_id = $2",
        )
        .bind(guild_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO bans (guild_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (guild_id, user_id) DO NOTHING
            "#,
        )
        .bind(guild_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_ban(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM bans WHERE guild_id = $1 AND user_id = $2")
            .bind(guild_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_banned(&self, guild_id: i64, user_id: i64) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM bans WHERE guild_id = $1 AND user_id = $2)",
        )
        .bind(guild_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_bans(&self, guild_id: i64) -> Result<Vec<BannedUser>, AppError> {
        let rows = sqlx::query_as::<_, BannedUserRow>(
            r#"
            SELECT u.id, u.username, u.image
            FROM bans b
            INNER JOIN users u ON u.id = b.user_id
            WHERE b.guild_id = $1
            ORDER BY u.username ASC
            "#,
        )
        .bind(guild_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(BannedUser::from).collect())
    }
}
