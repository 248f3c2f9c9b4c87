use common::RoundName;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contest_round")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique together with `name` (see `seed::ensure_indexes`).
    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub name: RoundName,

    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub submission_deadline: Option<DateTimeUtc>,
    pub result_announce_date: Option<DateTimeUtc>,
    pub send_original_deadline: Option<DateTimeUtc>,

    #[sea_orm(has_many)]
    pub tables: HasMany<super::judging_table::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
