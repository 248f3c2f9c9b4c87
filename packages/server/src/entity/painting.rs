use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A competitor's entry in a contest. One per competitor per contest.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "painting")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub competitor_id: i32,
    #[sea_orm(belongs_to, from = "competitor_id", to = "id")]
    pub competitor: HasOne<super::competitor::Entity>,

    pub title: String,

    /// Tie-breaker for equal Round 1 averages.
    pub submitted_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
