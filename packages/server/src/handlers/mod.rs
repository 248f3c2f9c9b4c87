pub mod contest;
pub mod directory;
pub mod examiner;
pub mod qualification;
pub mod round;
