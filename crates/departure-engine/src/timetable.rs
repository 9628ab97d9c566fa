//! Day-type timetables and the CSV store behind them.
//!
//! A route runs one of three weekly service patterns: weekday, Saturday,
//! or Sunday/holiday. Each pattern is a headerless CSV file where a row
//! is an hour of day followed by the departure minutes within that hour,
//! listed in ascending order:
//!
//! ```csv
//! 8,0,15,30,45
//! 9,0,20
//! ```
//!
//! Rows may have different widths. An hour that never appears (or appears
//! with no minutes) is a service gap; the resolver skips over it. A later
//! row for the same hour replaces the earlier one, so a corrected line
//! appended to a file wins without editing history above it.
//!
//! Loading is explicit and stateless: [`TimetableStore`] holds only the
//! data directory and reads the file fresh on every [`TimetableStore::load`],
//! so edits to the CSVs show up on the next query without a restart.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::Weekday;
use serde::Serialize;

use crate::error::{Result, ScheduleError};

// ── Day types ───────────────────────────────────────────────────────────────

/// Which of the three weekly service patterns applies to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayType {
    /// Monday through Friday.
    Weekday,
    /// Saturday service.
    Saturday,
    /// Sunday and holiday service.
    Sunday,
}

impl DayType {
    /// The service pattern for a calendar weekday.
    ///
    /// Saturday and Sunday each run their own table; every other day
    /// shares the weekday table.
    pub fn of(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Sat => DayType::Saturday,
            Weekday::Sun => DayType::Sunday,
            _ => DayType::Weekday,
        }
    }

    /// File name of the backing table inside a store's data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            DayType::Weekday => "weekday.csv",
            DayType::Saturday => "saturday.csv",
            DayType::Sunday => "sunday.csv",
        }
    }
}

// ── Timetable ───────────────────────────────────────────────────────────────

/// Every departure for one [`DayType`]: hour of day mapped to the minutes
/// with a departure in that hour.
///
/// Invariants upheld by every constructor: hours are `0..=23`, minutes are
/// `0..=59`, no stored hour has an empty minute list, and the table as a
/// whole is never empty. Minutes keep the order of the source row, which
/// the data contract requires to be ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    hours: BTreeMap<u32, Vec<u32>>,
}

impl Timetable {
    /// Build a timetable from `(hour, minutes)` rows.
    ///
    /// Follows the same row semantics as the CSV files: a row with no
    /// minutes turns that hour into a gap, and a later row for the same
    /// hour replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidHour`] or [`ScheduleError::InvalidMinute`]
    /// for out-of-range values, and [`ScheduleError::EmptyTimetable`] if no
    /// row keeps at least one departure.
    pub fn from_hours<I>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, Vec<u32>)>,
    {
        let mut checked = Vec::new();
        for (hour, minutes) in rows {
            if hour > 23 {
                return Err(ScheduleError::InvalidHour(format!("{hour} out of range")));
            }
            if let Some(&minute) = minutes.iter().find(|&&minute| minute > 59) {
                return Err(ScheduleError::InvalidMinute(format!(
                    "{minute} out of range (hour {hour})"
                )));
            }
            checked.push((hour, minutes));
        }
        Self::collect(checked)
    }

    /// Parse the `hour,minute[,minute...]` CSV format from any reader.
    ///
    /// Rows are headerless and may have different widths. Blank lines and
    /// empty cells are skipped; a row reduced to a bare hour becomes a
    /// service gap.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Unreadable`] if the reader or the CSV
    /// framing fails, [`ScheduleError::InvalidHour`] or
    /// [`ScheduleError::InvalidMinute`] for cells that are not in-range
    /// integers, and [`ScheduleError::EmptyTimetable`] if nothing remains.
    ///
    /// # Examples
    ///
    /// ```
    /// use departure_engine::Timetable;
    ///
    /// let table = Timetable::parse_reader("8,0,15,30,45\n9,0,20\n".as_bytes()).unwrap();
    /// assert_eq!(table.min_hour(), 8);
    /// assert_eq!(table.minutes_at(9), Some(&[0, 20][..]));
    /// ```
    pub fn parse_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows = Vec::new();
        for (index, record) in csv_reader.records().enumerate() {
            let row = index + 1;
            let record =
                record.map_err(|e| ScheduleError::Unreadable(format!("row {row}: {e}")))?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let hour_cell = record.get(0).unwrap_or("").trim();
            let hour: u32 = hour_cell
                .parse()
                .map_err(|_| ScheduleError::InvalidHour(format!("'{hour_cell}' (row {row})")))?;
            if hour > 23 {
                return Err(ScheduleError::InvalidHour(format!(
                    "{hour} out of range (row {row})"
                )));
            }

            let mut minutes = Vec::new();
            for cell in record.iter().skip(1) {
                let cell = cell.trim();
                if cell.is_empty() {
                    continue;
                }
                let minute: u32 = cell.parse().map_err(|_| {
                    ScheduleError::InvalidMinute(format!("'{cell}' (row {row})"))
                })?;
                if minute > 59 {
                    return Err(ScheduleError::InvalidMinute(format!(
                        "{minute} out of range (row {row})"
                    )));
                }
                minutes.push(minute);
            }
            rows.push((hour, minutes));
        }
        Self::collect(rows)
    }

    /// Assemble validated rows into the hour map, applying the gap and
    /// last-row-wins rules.
    fn collect(rows: impl IntoIterator<Item = (u32, Vec<u32>)>) -> Result<Self> {
        let mut hours: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (hour, minutes) in rows {
            if minutes.is_empty() {
                hours.remove(&hour);
            } else {
                hours.insert(hour, minutes);
            }
        }
        if hours.is_empty() {
            return Err(ScheduleError::EmptyTimetable(
                "no rows with departures".to_string(),
            ));
        }
        Ok(Self { hours })
    }

    /// Earliest hour with scheduled service.
    pub fn min_hour(&self) -> u32 {
        self.hours.keys().next().copied().unwrap_or_default()
    }

    /// Latest hour with scheduled service.
    pub fn max_hour(&self) -> u32 {
        self.hours.keys().next_back().copied().unwrap_or_default()
    }

    /// Departure minutes within `hour`, or `None` if the hour is a gap.
    pub fn minutes_at(&self, hour: u32) -> Option<&[u32]> {
        self.hours.get(&hour).map(|minutes| minutes.as_slice())
    }

    /// First hour with service at or after `hour`, with its minutes.
    ///
    /// Returns `None` when service for the day ends before `hour`.
    pub fn service_from(&self, hour: u32) -> Option<(u32, &[u32])> {
        self.hours
            .range(hour..)
            .next()
            .map(|(&hour, minutes)| (hour, minutes.as_slice()))
    }

    /// Hours with service, ascending, each with its departure minutes.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[u32])> {
        self.hours
            .iter()
            .map(|(&hour, minutes)| (hour, minutes.as_slice()))
    }
}

// ── Store ───────────────────────────────────────────────────────────────────

/// Loader for the per-day-type CSV tables.
///
/// Holds only the data directory and performs no I/O until [`load`].
/// Every load reads and parses the file fresh, so concurrent callers
/// share nothing mutable and a failed parse never leaves a partial
/// table behind.
///
/// [`load`]: TimetableStore::load
#[derive(Debug, Clone)]
pub struct TimetableStore {
    data_dir: PathBuf,
}

impl TimetableStore {
    /// A store over `data_dir`, which should contain `weekday.csv`,
    /// `saturday.csv`, and `sunday.csv`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory the tables are read from.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load and parse the table for `day_type`.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::Unreadable`] if the file is missing or
    /// cannot be read, plus the parse errors of [`Timetable::parse_reader`].
    pub fn load(&self, day_type: DayType) -> Result<Timetable> {
        let path = self.data_dir.join(day_type.file_name());
        let file = File::open(&path)
            .map_err(|e| ScheduleError::Unreadable(format!("'{}': {e}", path.display())))?;
        Timetable::parse_reader(file)
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────
