//! Error types for departure-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Unreadable timetable: {0}")]
    Unreadable(String),

    #[error("Invalid hour: {0}")]
    InvalidHour(String),

    #[error("Invalid minute: {0}")]
    InvalidMinute(String),

    #[error("Empty timetable: {0}")]
    EmptyTimetable(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
