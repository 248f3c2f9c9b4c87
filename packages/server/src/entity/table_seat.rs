use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "table_seat")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub table_id: i32,
    #[sea_orm(primary_key)]
    pub competitor_id: i32,
    #[sea_orm(belongs_to, from = "table_id", to = "id")]
    pub table: HasOne<super::judging_table::Entity>,
    #[sea_orm(belongs_to, from = "competitor_id", to = "id")]
    pub competitor: HasOne<super::competitor::Entity>,

    pub painting_id: i32,
    /// Qualification rank the seat was dealt from.
    pub qualification_rank: i32,
}

impl ActiveModelBehavior for ActiveModel {}
