//! The nearest-departure resolver.
//!
//! Every function here is pure over its inputs: the caller supplies the
//! reference instant (no system clock access) and either an already
//! loaded [`Timetable`] or a [`TimetableStore`] to load one from. The
//! reference is always interpreted in JST, the single timezone the
//! route operates in, so a UTC anchor is converted before any hour or
//! minute is read.
//!
//! # Functions
//!
//! - [`next_after`]: the single-candidate search over one table
//! - [`next_departures_in`]: first and second candidates over one table
//! - [`next_departures_at`]: pick the day type for a JST reference and load
//! - [`next_departures`]: the same, from a UTC anchor

use chrono::{DateTime, Datelike, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::Result;
use crate::timetable::{DayType, Timetable, TimetableStore};
use crate::JST;

// ── Results ─────────────────────────────────────────────────────────────────

/// The next one or two departures strictly after a reference instant.
///
/// `second` is the resolver re-run with `first` as the reference, so it is
/// always strictly later than `first` and absent whenever `first` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextDepartures {
    /// The nearest departure after the reference, if any remains today.
    pub first: Option<DateTime<Tz>>,
    /// The departure after `first`, if any.
    pub second: Option<DateTime<Tz>>,
}

impl NextDepartures {
    /// True when no departure remains for the day.
    pub fn service_over(&self) -> bool {
        self.first.is_none()
    }
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Find the first departure strictly after `at` on the same calendar day.
///
/// The search walks the table in three steps:
///
/// 1. Before the first service hour, snap forward to the day's first
///    departure.
/// 2. After the last service hour, there is nothing left; return `None`.
/// 3. Otherwise take the first minute strictly greater than the
///    reference minute within the reference hour, and failing that the
///    first departure of the next hour that has service. Gap hours are
///    skipped, so a table can pause at lunch and resume later.
///
/// Strictly greater means a query at an exact departure time returns the
/// one after it; a bus leaving right now cannot be caught.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use departure_engine::{next_after, Timetable, JST};
///
/// let table = Timetable::parse_reader("8,0,15,30,45\n9,0,20\n".as_bytes()).unwrap();
/// let at = JST.with_ymd_and_hms(2026, 8, 26, 8, 50, 0).unwrap();
/// let next = next_after(&table, &at).unwrap();
/// assert_eq!(next.format("%H:%M").to_string(), "09:00");
/// ```
pub fn next_after(timetable: &Timetable, at: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let (hour, minute) = (at.hour(), at.minute());

    let (first_hour, first_minutes) = timetable.service_from(0)?;
    if hour < first_hour {
        return departure_on(at, first_hour, *first_minutes.first()?);
    }
    if hour > timetable.max_hour() {
        return None;
    }

    if let Some(minutes) = timetable.minutes_at(hour) {
        if let Some(&next_minute) = minutes.iter().find(|&&m| m > minute) {
            return departure_on(at, hour, next_minute);
        }
    }

    let (next_hour, minutes) = timetable.service_from(hour + 1)?;
    departure_on(at, next_hour, *minutes.first()?)
}

/// The departure at `hour:minute` on the same calendar day as `at`.
fn departure_on(at: &DateTime<Tz>, hour: u32, minute: u32) -> Option<DateTime<Tz>> {
    let local = at.date_naive().and_hms_opt(hour, minute, 0)?;
    at.timezone().from_local_datetime(&local).single()
}

/// Resolve the first and second departures after `reference` in one table.
///
/// The second candidate is [`next_after`] re-run with the first as the
/// reference. If the first is absent the second is too; the resolver
/// never reports "nothing now, but something later today".
pub fn next_departures_in(timetable: &Timetable, reference: &DateTime<Tz>) -> NextDepartures {
    let first = next_after(timetable, reference);
    let second = first.as_ref().and_then(|found| next_after(timetable, found));
    NextDepartures { first, second }
}

/// Resolve the next departures for a reference already expressed in JST.
///
/// Picks the day type from the reference's weekday and loads that table
/// from `store`.
///
/// # Errors
///
/// Propagates the load and parse errors of [`TimetableStore::load`].
pub fn next_departures_at(store: &TimetableStore, reference: DateTime<Tz>) -> Result<NextDepartures> {
    let timetable = store.load(DayType::of(reference.weekday()))?;
    Ok(next_departures_in(&timetable, &reference))
}

/// Resolve the next departures after a UTC anchor.
///
/// The anchor is normalized to JST first, so the day type and the "today"
/// whose timetable answers the query are the local ones. An anchor late
/// in the UTC evening is already the next morning in Tokyo.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use chrono::Utc;
/// use departure_engine::{next_departures, TimetableStore};
///
/// let store = TimetableStore::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
/// // 23:30 UTC on a Tuesday is 08:30 Wednesday in Tokyo.
/// let anchor = Utc.with_ymd_and_hms(2026, 8, 25, 23, 30, 0).unwrap();
/// let board = next_departures(&store, anchor).unwrap();
/// assert_eq!(board.first.unwrap().format("%H:%M").to_string(), "08:45");
/// ```
pub fn next_departures(store: &TimetableStore, anchor: DateTime<Utc>) -> Result<NextDepartures> {
    next_departures_at(store, anchor.with_timezone(&JST))
}

// ── Tests ───────────────────────────────────────────────────────────────────
