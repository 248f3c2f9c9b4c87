#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::EngineError;
use crate::round::RoundName;
use crate::window::DateWindow;

/// The round an examiner judges in a contest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
pub enum ExaminerRole {
    #[serde(rename = "ROUND_1")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ROUND_1"))]
    Round1,
    #[serde(rename = "ROUND_2")]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "ROUND_2"))]
    Round2,
}

impl ExaminerRole {
    pub fn round(&self) -> RoundName {
        match self {
            Self::Round1 => RoundName::Round1,
            Self::Round2 => RoundName::Round2,
        }
    }
}

impl From<RoundName> for ExaminerRole {
    fn from(name: RoundName) -> Self {
        match name {
            RoundName::Round1 => Self::Round1,
            RoundName::Round2 => Self::Round2,
        }
    }
}

impl fmt::Display for ExaminerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.round().as_str())
    }
}

/// Progress of a scheduled examiner visit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    #[default]
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "SCHEDULED"))]
    Scheduled,
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "COMPLETED"))]
    Completed,
}

/// Checks a schedule date against the windows of the examiner's roles.
///
/// With enforcement off the date is accepted as-is. With it on, the date must
/// fall inside at least one window.
pub fn check_schedule_date(
    enforced: bool,
    date: DateTime<Utc>,
    windows: &[DateWindow],
) -> Result<(), EngineError> {
    if !enforced {
        return Ok(());
    }
    let Some(first) = windows.first() else {
        return Err(EngineError::StateConflict(
            "No round or table dates are available to check the schedule against".into(),
        ));
    };
    if windows.iter().any(|w| w.contains(date)) {
        Ok(())
    } else {
        Err(EngineError::DateOutOfWindow {
            date,
            window: *first,
        })
    }
}
