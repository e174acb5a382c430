//! User database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Role, User};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub full_name: String,
    pub plot_number: Option<String>,
    pub blocked_at: Option<DateTimeUtc>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    /// Soft delete timestamp (NULL = active, set = deleted)
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::pass::Entity")]
    Passes,
    #[sea_orm(has_many = "super::guest_request::Entity")]
    GuestRequests,
}

impl Related<super::pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Passes.def()
    }
}

impl Related<super::guest_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GuestRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl TryFrom<Model> for User {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|e| DbErr::Custom(format!("user {}: {}", model.id, e)))?;

        Ok(User {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            role,
            full_name: model.full_name,
            plot_number: model.plot_number,
            blocked_at: model.blocked_at,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
