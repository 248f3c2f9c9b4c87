//! Contest configuration validation shared by every entry point that creates
//! or edits a contest or one of its rounds.
//!
//! Rules accumulate across fields but stop at the first failure within a field,
//! so each field carries at most one error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::window::DateWindow;

/// A single violated rule, tagged with the offending field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldError {
    /// Dotted field path (e.g. `round1.submission_deadline`).
    #[schema(example = "round2_quantity")]
    pub field: String,
    #[schema(example = "round2_quantity must be divisible by number_of_tables_round2")]
    pub message: String,
}

/// Accumulated validation outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_error(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Records a failure unless `field` already failed an earlier rule.
    pub fn reject(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let field = field.into();
        if !self.has_error(&field) {
            self.errors.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    /// Folds another report in, keeping the first error per field.
    pub fn merge(&mut self, other: ValidationReport) {
        for e in other.errors {
            self.reject(e.field, e.message);
        }
    }

    pub fn into_result(self) -> Result<(), EngineError> {
        if self.is_ok() {
            Ok(())
        } else {
            Err(EngineError::Validation(self))
        }
    }
}

/// Optional date set of a round, as drafted.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RoundDates {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub submission_deadline: Option<DateTime<Utc>>,
    pub result_announce_date: Option<DateTime<Utc>>,
    pub send_original_deadline: Option<DateTime<Utc>>,
}

impl RoundDates {
    pub fn window(&self) -> Option<DateWindow> {
        DateWindow::from_bounds(self.start_date, self.end_date)
    }

    fn deadlines(&self) -> [(&'static str, Option<DateTime<Utc>>); 3] {
        [
            ("submission_deadline", self.submission_deadline),
            ("result_announce_date", self.result_announce_date),
            ("send_original_deadline", self.send_original_deadline),
        ]
    }
}

/// The full contest + Round 1 configuration checked before commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContestConfig {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub round2_quantity: i32,
    pub number_of_tables_round2: i32,
    /// Round 1 dates, when the caller is creating or re-checking Round 1.
    pub round1: Option<RoundDates>,
}

impl ContestConfig {
    pub fn window(&self) -> Option<DateWindow> {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// Validates a contest configuration, collecting one error per failing field.
pub fn validate_contest_config(config: &ContestConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.end_date <= config.start_date {
        report.reject("end_date", "end_date must be after start_date");
    }

    if let Some(ref round1) = config.round1 {
        check_round_dates(&mut report, "round1", round1, config.window(), true);
    }

    check_round2_sizing(
        &mut report,
        config.round2_quantity,
        config.number_of_tables_round2,
    );

    report
}

/// Checks a round's own ordering rules and that it lies inside the contest.
///
/// `require_bounds` makes `start_date` and `end_date` mandatory (Round 1).
pub fn check_round_dates(
    report: &mut ValidationReport,
    prefix: &str,
    dates: &RoundDates,
    contest_window: Option<DateWindow>,
    require_bounds: bool,
) {
    let start_field = format!("{prefix}.start_date");
    let end_field = format!("{prefix}.end_date");

    if require_bounds {
        if dates.start_date.is_none() {
            report.reject(&start_field, format!("{start_field} is required"));
        }
        if dates.end_date.is_none() {
            report.reject(&end_field, format!("{end_field} is required"));
        }
    }

    if let (Some(start), Some(end)) = (dates.start_date, dates.end_date)
        && end <= start
    {
        report.reject(&end_field, format!("{end_field} must be after {start_field}"));
    }

    // Each bound applies on its own, even when the round itself is inverted.
    for (name, value) in dates.deadlines() {
        let Some(value) = value else { continue };
        let before_start = dates.start_date.is_some_and(|start| value < start);
        let after_end = dates.end_date.is_some_and(|end| value > end);
        let message = match (dates.start_date.is_some(), dates.end_date.is_some()) {
            (true, true) => format!("{prefix}.{name} must fall between {start_field} and {end_field}"),
            (true, false) => format!("{prefix}.{name} must not be before {start_field}"),
            _ => format!("{prefix}.{name} must not be after {end_field}"),
        };
        if before_start || after_end {
            report.reject(format!("{prefix}.{name}"), message);
        }
    }

    // Every date present must also sit inside the contest.
    let Some(contest_window) = contest_window else {
        return;
    };
    let bounds = [("start_date", dates.start_date), ("end_date", dates.end_date)];
    for (name, value) in bounds.into_iter().chain(dates.deadlines()) {
        if let Some(value) = value
            && !contest_window.contains(value)
        {
            report.reject(
                format!("{prefix}.{name}"),
                format!("{prefix}.{name} must fall within the contest dates"),
            );
        }
    }
}

/// Checks the `round2_quantity` / `number_of_tables_round2` pairing.
///
/// A quantity of zero disables Round 2 and requires zero tables.
pub fn check_round2_sizing(report: &mut ValidationReport, quantity: i32, tables: i32) {
    if quantity < 0 {
        report.reject("round2_quantity", "round2_quantity must be >= 0");
    }
    if tables < 0 {
        report.reject("number_of_tables_round2", "number_of_tables_round2 must be >= 0");
    }
    if quantity < 0 || tables < 0 {
        return;
    }

    if quantity == 0 {
        if tables != 0 {
            report.reject(
                "number_of_tables_round2",
                "number_of_tables_round2 must be 0 when round2_quantity is 0",
            );
        }
        return;
    }

    if tables == 0 {
        report.reject(
            "number_of_tables_round2",
            "number_of_tables_round2 must be at least 1 when round2_quantity is set",
        );
    } else if quantity % tables != 0 {
        report.reject(
            "round2_quantity",
            "round2_quantity must be divisible by number_of_tables_round2",
        );
    }
}

/// Checks an explicit table window against the Round 2 window.
pub fn check_table_window(
    report: &mut ValidationReport,
    table_number: i32,
    window: DateWindow,
    round2_window: Option<DateWindow>,
) {
    let field = format!("tables.{table_number}");
    if let Some(round2_window) = round2_window
        && !round2_window.encloses(&window)
    {
        report.reject(field, "table dates must fall within the Round 2 dates");
    }
}
