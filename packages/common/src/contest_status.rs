#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Publication state of a contest.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContestStatus {
    /// Being configured. Rounds may be created and deleted freely.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "DRAFT"))]
    Draft,
    /// Published. There is no way back to `Draft`.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ACTIVE"))]
    Active,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPLETED"))]
    Completed,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "CANCELLED"))]
    Cancelled,
}

impl ContestStatus {
    /// Returns true once the contest can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    pub const ALL: &'static [ContestStatus] = &[
        Self::Draft,
        Self::Active,
        Self::Completed,
        Self::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Default for ContestStatus {
    fn default() -> Self {
        Self::Draft
    }
}

/// Error when parsing an invalid contest status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContestStatusError {
    invalid: String,
}

impl fmt::Display for ParseContestStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid contest status '{}'. Valid values: {}",
            self.invalid,
            ContestStatus::ALL
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

impl std::error::Error for ParseContestStatusError {}

impl FromStr for ContestStatus {
    type Err = ParseContestStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(Self::Draft),
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(ParseContestStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}
