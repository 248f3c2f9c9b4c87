use common::OriginalSubmissionStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff-recorded receipt of a qualifier's original artwork.
/// A missing row means `NOT_SUBMITTED_ORIGINAL`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "original_submission")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub contest_id: i32,
    #[sea_orm(primary_key)]
    pub painting_id: i32,
    #[sea_orm(belongs_to, from = "contest_id", to = "id")]
    pub contest: HasOne<super::contest::Entity>,
    #[sea_orm(belongs_to, from = "painting_id", to = "id")]
    pub painting: HasOne<super::painting::Entity>,

    pub status: OriginalSubmissionStatus,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
