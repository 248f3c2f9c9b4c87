use common::ContestStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    pub start_date: DateTimeUtc,
    pub end_date: DateTimeUtc,

    /// Number of competitors advancing to Round 2. Zero disables Round 2.
    pub round2_quantity: i32,
    pub number_of_tables_round2: i32,

    pub status: ContestStatus,
    pub is_schedule_enforced: bool,

    #[sea_orm(has_many)]
    pub rounds: HasMany<super::round::Entity>,

    #[sea_orm(has_many)]
    pub paintings: HasMany<super::painting::Entity>,

    #[sea_orm(has_many)]
    pub schedules: HasMany<super::schedule::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
