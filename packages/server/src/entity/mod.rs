pub mod competitor;
pub mod contest;
pub mod evaluation;
pub mod examiner;
pub mod examiner_assignment;
pub mod judging_table;
pub mod original_submission;
pub mod painting;
pub mod round;
pub mod schedule;
pub mod table_seat;
