#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two rounds a record belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundName {
    /// Open submission round.
    #[serde(rename = "ROUND_1")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ROUND_1"))]
    Round1,
    /// Qualifier-only round, split into judging tables.
    #[serde(rename = "ROUND_2")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ROUND_2"))]
    Round2,
}

impl RoundName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Round1 => "ROUND_1",
            Self::Round2 => "ROUND_2",
        }
    }
}

impl fmt::Display for RoundName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
