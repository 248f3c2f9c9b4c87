use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A Round 2 judging table.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "judging_table")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub round_id: i32,
    #[sea_orm(belongs_to, from = "round_id", to = "id")]
    pub round: HasOne<super::round::Entity>,

    /// 1-based, unique within the round.
    pub table_number: i32,

    /// NULL means the Round 2 dates apply.
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,

    #[sea_orm(has_many)]
    pub seats: HasMany<super::table_seat::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
