//! Guest request database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::GuestRequest;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "guest_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub resident_user_id: Uuid,
    pub guest_full_name: String,
    pub plate_number: String,
    pub valid_from: DateTimeUtc,
    pub valid_to: DateTimeUtc,
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
        from = "Column::ResidentUserId",
        to = "super::user::Column::Id"
    )]
    Resident,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Resident.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GuestRequest {
    fn from(model: Model) -> Self {
        GuestRequest {
            id: model.id,
            resident_user_id: model.resident_user_id,
            guest_full_name: model.guest_full_name,
            plate_number: model.plate_number,
            valid_from: model.valid_from,
            valid_to: model.valid_to,
            status: model.status,
            created_by: model.created_by,
            updated_by: model.updated_by,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
