pub mod grade_band;
pub mod mark;
pub mod rubric;
pub mod student;
pub mod user;
