use common::ExaminerRole;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "examiner_assignment")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// (contest_id, examiner_id, role) is unique.
    pub contest_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,

    pub examiner_id: i32,
    #[sea_orm(belongs_to, from = "examiner_id", to = "id")]
    pub examiner: HasOne<super::examiner::Entity>,

    pub role: ExaminerRole,

    /// Round 2 only: the table this examiner judges. NULL means table 1.
    pub table_number: Option<i32>,

    pub assigned_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
