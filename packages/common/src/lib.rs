pub mod contest_status;
pub mod error;
pub mod event;
pub mod examiner;
pub mod lifecycle;
pub mod notify;
pub mod qualification;
pub mod round;
pub mod scoring;
pub mod tables;
pub mod validation;
pub mod window;

pub use contest_status::ContestStatus;
pub use error::EngineError;
pub use examiner::{ExaminerRole, ScheduleStatus};
pub use qualification::OriginalSubmissionStatus;
pub use round::RoundName;
pub use window::DateWindow;
