//! Entry log database entity for SeaORM. Rows are append-only.

use sea_orm::entity::prelude::*;

use domain::{EntryAction, EntryLog};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "entry_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub pass_id: Uuid,
    pub guard_user_id: Uuid,
    /// `entry` or `exit`
    pub action: String,
    pub comment: Option<String>,
    pub action_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pass::Entity",
        from = "Column::PassId",
        to = "super::pass::Column::Id"
    )]
    Pass,
}

impl Related<super::pass::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pass.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for EntryLog {
    type Error = DbErr;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let action: EntryAction = model
            .action
            .parse()
            .map_err(|e| DbErr::Custom(format!("entry log {}: {}", model.id, e)))?;

        Ok(EntryLog {
            id: model.id,
            pass_id: model.pass_id,
            guard_user_id: model.guard_user_id,
            action,
            comment: model.comment,
            action_at: model.action_at,
        })
    }
}
