use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application user profile. Rows are written by the hosted identity service;
/// this service only reads them to bind a Google account to a user.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub email: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::google_tokens::Entity")]
    GoogleTokens,
}

impl Related<super::google_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoogleTokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
