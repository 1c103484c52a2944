//! Action entity (append-only activity log).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kinds of entity an action can point at.
///
/// The target is a tagged reference (`target_type`, `target_id`) resolved by
/// the feed assembler, not a database-level polymorphic relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum TargetType {
    #[sea_orm(string_value = "user")]
    User,
    #[sea_orm(string_value = "image")]
    Image,
}

/// Action entry - an actor performed a verb, optionally against a target.
///
/// Rows are immutable once written; there are no update or delete paths.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "action")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The acting user
    #[sea_orm(indexed)]
    pub user_id: String,

    /// What the actor did, e.g. "bookmarked image"
    pub verb: String,

    /// Target entity kind (None for targetless actions)
    #[sea_orm(nullable)]
    pub target_type: Option<TargetType>,

    /// Target entity ID
    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
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
