//! Meme entity for SeaORM. `tags` maps to `text[]`, `likes` to `uuid[]`.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "memes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<Uuid>,
    pub download_count: i64,
    pub created_at: DateTimeWithTimeZone,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to domain Meme.
impl From<Model> for memehub_core::domain::Meme {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            owner_username: model.owner_username,
            image_url: model.image_url,
            caption: model.caption,
            tags: model.tags,
            likes: model.likes,
            download_count: model.download_count,
            created_at: model.created_at.into(),
            is_active: model.is_active,
        }
    }
}

/// Conversion from domain Meme to SeaORM ActiveModel.
impl From<memehub_core::domain::Meme> for ActiveModel {
    fn from(meme: memehub_core::domain::Meme) -> Self {
        Self {
            id: Set(meme.id),
            owner_id: Set(meme.owner_id),
            owner_username: Set(meme.owner_username),
            image_url: Set(meme.image_url),
            caption: Set(meme.caption),
            tags: Set(meme.tags),
            likes: Set(meme.likes),
            download_count: Set(meme.download_count),
            created_at: Set(meme.created_at.into()),
            is_active: Set(meme.is_active),
        }
    }
}
