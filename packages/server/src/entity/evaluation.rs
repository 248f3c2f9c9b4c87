use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "evaluation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub round_id: i32,
    #[sea_orm(belongs_to, from = "round_id", to = "id")]
    pub round: HasOne<super::round::Entity>,

    pub painting_id: i32,
    #[sea_orm(belongs_to, from = "painting_id", to = "id")]
    pub painting: HasOne<super::painting::Entity>,

    pub examiner_id: i32,
    #[sea_orm(belongs_to, from = "examiner_id", to = "id")]
    pub examiner: HasOne<super::examiner::Entity>,

    /// 0..=100
    pub score: i32,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
