//! Pass database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Pass;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "passes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub plate_number: String,
    pub vehicle_brand: Option<String>,
    pub vehicle_color: Option<String>,
    pub status: String,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::OwnerUserId",
        to = "super::user::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::entry_log::Entity")]
    EntryLogs,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::entry_log::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EntryLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Pass {
    fn from(model: Model) -> Self {
        Pass {
            id: model.id,
            owner_user_id: model.owner_user_id,
            plate_number: model.plate_number,
            vehicle_brand: model.vehicle_brand,
            vehicle_color: model.vehicle_color,
            status: model.status,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
