//! Guild Repository Implementation
//!
//! Read-only PostgreSQL access to guilds.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{Guild, GuildRepository};
use crate::shared::error::AppError;

/// Database row representation matching the guilds table schema.
#[derive(Debug, sqlx::FromRow)]
struct GuildRow {
    id: i64,
    name: String,
    owner_id: i64,
    icon: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<GuildRow> for Guild {
    fn from(row: GuildRow) -> Self {
        Guild {
            id: row.id,
            name: row.name,
            owner_id: row.owner_id,
            icon: row.icon,
            created_at: row.created_at,
        }
    }
}

/// PostgreSQL guild repository implementation.
#[derive(Clone)]
pub struct PgGuildRepository {
    pool: PgPool,
}

impl PgGuildRepository {
    /// Create a new PgGuildRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GuildRepository for PgGuildRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Guild>, AppError> {
        let row = sqlx::query_as::<_, GuildRow>(
            r#"
            SELECT id, name, owner_id, icon, created_at
            FROM guilds
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Guild::from))
    }
}
