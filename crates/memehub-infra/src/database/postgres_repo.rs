//! PostgreSQL repository implementations.
//!
//! The conditional mutations are single UPDATE statements whose WHERE
//! clause carries the precondition - `rows_affected` answers "did a change
//! occur", which is what makes like/unlike exactly-once under concurrency.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbConn, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use memehub_core::domain::{Meme, User};
use memehub_core::error::RepoError;
use memehub_core::ports::{MemeRepository, PageWindow, UserRepository};

use super::entity::meme::{self, Entity as MemeEntity};
use super::entity::user::{self, Entity as UserEntity};

fn map_err(e: DbErr) -> RepoError {
    match &e {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(e.to_string()),
        _ => {
            let msg = e.to_string();
            if msg.contains("duplicate") || msg.contains("unique") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// Escape LIKE wildcards so a search for "100%" matches literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// PostgreSQL user repository.
pub struct PostgresUserRepository {
    db: DbConn,
}

impl PostgresUserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, RepoError> {
        // The unique indexes on username/email turn a lost race into a
        // Constraint error rather than a silent overwrite.
        let model = user::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find_by_id(id)
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_username_or_email(&self, handle: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Username.eq(handle))
                    .add(user::Column::Email.eq(handle)),
            )
            .filter(user::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    async fn adjust_total_likes(&self, id: Uuid, delta: i64) -> Result<bool, RepoError> {
        let result = UserEntity::update_many()
            .col_expr(
                user::Column::TotalLikes,
                Expr::cust_with_values("GREATEST(total_likes + ?, 0)", [delta]),
            )
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn set_total_likes(&self, id: Uuid, value: i64) -> Result<bool, RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::TotalLikes, Expr::value(value.max(0)))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn set_profile_image(
        &self,
        id: Uuid,
        image_url: Option<String>,
    ) -> Result<bool, RepoError> {
        let result = UserEntity::update_many()
            .col_expr(user::Column::ProfileImage, Expr::value(image_url))
            .filter(user::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }
}

/// PostgreSQL meme repository.
pub struct PostgresMemeRepository {
    db: DbConn,
}

impl PostgresMemeRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// Active rows, newest first with the id tiebreak - the base of every
/// windowed read.
fn active_newest_first() -> Select<MemeEntity> {
    MemeEntity::find()
        .filter(meme::Column::IsActive.eq(true))
        .order_by_desc(meme::Column::CreatedAt)
        .order_by_desc(meme::Column::Id)
}

#[async_trait]
impl MemeRepository for PostgresMemeRepository {
    async fn create(&self, new_meme: Meme) -> Result<Meme, RepoError> {
        let model = meme::ActiveModel::from(new_meme)
            .insert(&self.db)
            .await
            .map_err(map_err)?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Meme>, RepoError> {
        let result = MemeEntity::find_by_id(id)
            .filter(meme::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.map(Into::into))
    }

    async fn find_by_owner(
        &self,
        owner_id: Uuid,
        window: PageWindow,
    ) -> Result<Vec<Meme>, RepoError> {
        let rows = active_newest_first()
            .filter(meme::Column::OwnerId.eq(owner_id))
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let rows = active_newest_first()
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn popular(&self, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let rows = MemeEntity::find()
            .filter(meme::Column::IsActive.eq(true))
            .order_by_desc(Expr::cust("cardinality(likes)"))
            .order_by_desc(meme::Column::CreatedAt)
            .order_by_desc(meme::Column::Id)
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(&self, query: &str, window: PageWindow) -> Result<Vec<Meme>, RepoError> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = active_newest_first()
            .filter(Expr::cust_with_values("caption ILIKE ?", [pattern]))
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn with_tags(
        &self,
        tags: &[String],
        window: PageWindow,
    ) -> Result<Vec<Meme>, RepoError> {
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; tags.len()].join(", ");
        let overlap = format!("tags && ARRAY[{placeholders}]::text[]");

        let rows = active_newest_first()
            .filter(Expr::cust_with_values(overlap, tags.iter().cloned()))
            .offset(window.skip)
            .limit(window.limit)
            .all(&self.db)
            .await
            .map_err(map_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn like(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        // "not already liked AND add" in one statement; a concurrent
        // duplicate like matches zero rows.
        let result = MemeEntity::update_many()
            .col_expr(
                meme::Column::Likes,
                Expr::cust_with_values("array_append(likes, ?)", [user_id]),
            )
            .filter(meme::Column::Id.eq(meme_id))
            .filter(meme::Column::IsActive.eq(true))
            .filter(Expr::cust_with_values(
                "NOT (likes @> ARRAY[?]::uuid[])",
                [user_id],
            ))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn unlike(&self, meme_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let result = MemeEntity::update_many()
            .col_expr(
                meme::Column::Likes,
                Expr::cust_with_values("array_remove(likes, ?)", [user_id]),
            )
            .filter(meme::Column::Id.eq(meme_id))
            .filter(meme::Column::IsActive.eq(true))
            .filter(Expr::cust_with_values(
                "likes @> ARRAY[?]::uuid[]",
                [user_id],
            ))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn increment_downloads(&self, meme_id: Uuid) -> Result<bool, RepoError> {
        let result = MemeEntity::update_many()
            .col_expr(
                meme::Column::DownloadCount,
                Expr::col(meme::Column::DownloadCount).add(1),
            )
            .filter(meme::Column::Id.eq(meme_id))
            .filter(meme::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn update(
        &self,
        meme_id: Uuid,
        owner_id: Uuid,
        caption: Option<String>,
        tags: Vec<String>,
    ) -> Result<bool, RepoError> {
        let mut query = MemeEntity::update_many()
            .col_expr(meme::Column::Tags, Expr::value(tags))
            .filter(meme::Column::Id.eq(meme_id))
            .filter(meme::Column::OwnerId.eq(owner_id))
            .filter(meme::Column::IsActive.eq(true));

        if let Some(caption) = caption {
            query = query.col_expr(meme::Column::Caption, Expr::value(caption));
        }

        let result = query.exec(&self.db).await.map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn soft_delete(&self, meme_id: Uuid, owner_id: Uuid) -> Result<bool, RepoError> {
        let result = MemeEntity::update_many()
            .col_expr(meme::Column::IsActive, Expr::value(false))
            .filter(meme::Column::Id.eq(meme_id))
            .filter(meme::Column::OwnerId.eq(owner_id))
            .filter(meme::Column::IsActive.eq(true))
            .exec(&self.db)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn count_by_owner(&self, owner_id: Uuid) -> Result<u64, RepoError> {
        MemeEntity::find()
            .filter(meme::Column::OwnerId.eq(owner_id))
            .filter(meme::Column::IsActive.eq(true))
            .count(&self.db)
            .await
            .map_err(map_err)
    }

    async fn likes_received(&self, owner_id: Uuid) -> Result<i64, RepoError> {
        let total: Option<i64> = MemeEntity::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(cardinality(likes)), 0)"), "total")
            .filter(meme::Column::OwnerId.eq(owner_id))
            .filter(meme::Column::IsActive.eq(true))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(map_err)?;
        Ok(total.unwrap_or(0))
    }
}
