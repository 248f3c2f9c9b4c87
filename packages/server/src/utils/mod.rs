pub mod contest;
