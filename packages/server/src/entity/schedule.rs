use common::ScheduleStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The dated visit of an examiner to a contest. One per (contest, examiner).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub examiner_id: i32,
    #[sea_orm(belongs_to, from = "examiner_id", to = "id")]
    pub examiner: HasOne<super::examiner::Entity>,

    pub task: String,
    pub date: DateTimeUtc,
    pub status: ScheduleStatus,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
