//! # departure-engine
//!
//! Deterministic next-departure computation for a voice assistant.
//!
//! The engine answers "when is the next bus?" against a weekly timetable
//! with one table each for weekdays, Saturdays, and Sundays, all in JST.
//! Resolution is pure over explicit inputs: the caller provides the "now"
//! anchor and a [`TimetableStore`] over a data directory (no system clock
//! access, no global state), and spoken input that does not resolve
//! unambiguously becomes `None` rather than a guess.
//!
//! ## Modules
//!
//! - [`timetable`]: day-type tables and the CSV store behind them
//! - [`departures`]: the nearest-departure resolver
//! - [`speech`]: Japanese phrase resolution and spoken answers
//! - [`error`]: error types

pub mod departures;
pub mod error;
pub mod speech;
pub mod timetable;

use chrono_tz::Tz;

/// The fixed timezone every reference instant is normalized to. The
/// route runs in one locale, so the timetable carries no zone of its own.
pub const JST: Tz = chrono_tz::Asia::Tokyo;

pub use departures::{
    next_after, next_departures, next_departures_at, next_departures_in, NextDepartures,
};
pub use error::ScheduleError;
pub use speech::{
    announce, date_in_current_week, parse_time_phrase, resolve_day_phrase,
    resolve_day_phrase_with_options, resolve_reference, spoken_date, spoken_time, weekday_kanji,
    CollectiveDayPolicy, ResolveOptions,
};
pub use timetable::{DayType, Timetable, TimetableStore};
