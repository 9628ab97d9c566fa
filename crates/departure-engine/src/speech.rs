//! Japanese phrase handling at the voice boundary.
//!
//! Inbound, spoken slots become concrete values: a day-of-week word
//! ("月曜", "週末") resolves to a [`Weekday`], a time slot ("08:10")
//! to a time of day, and [`resolve_reference`] assembles both into the
//! JST instant the resolver answers against. Outbound, resolved
//! departures become the spoken phrases and answer sentences the
//! assistant reads aloud.
//!
//! Nothing here guesses. A phrase that does not resolve unambiguously
//! returns `None` and the caller re-prompts; the one configurable
//! exception is [`CollectiveDayPolicy::Representative`], which restores
//! the historical mapping of collective day words to a single day.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use chrono_tz::Tz;
use serde::Serialize;

use crate::departures::NextDepartures;
use crate::JST;

// ── Resolution options ──────────────────────────────────────────────────────

/// How collective day words (土日, 週末, 平日) resolve.
///
/// The default refuses to pick: a collective word names no single day, so
/// it resolves to `None` and the caller asks again. `Representative` maps
/// weekend words to Sunday and 平日 to Monday instead, useful when any
/// day of the group shares one timetable anyway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CollectiveDayPolicy {
    /// Collective words resolve to `None`.
    #[default]
    Ambiguous,
    /// Weekend words resolve to Sunday, 平日 to Monday.
    Representative,
}

/// Options for [`resolve_day_phrase_with_options`] and [`resolve_reference`].
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Policy for collective day words.
    pub collective_days: CollectiveDayPolicy,
}

// ── Day-of-week phrases ─────────────────────────────────────────────────────

/// What a recognized day word denotes.
#[derive(Clone, Copy)]
enum DayWord {
    Exact(Weekday),
    Weekend,
    WorkWeek,
}

/// Recognized day words. Order breaks ties between words found at the
/// same position in a phrase.
const DAY_WORDS: [(&str, DayWord); 10] = [
    ("月曜", DayWord::Exact(Weekday::Mon)),
    ("火曜", DayWord::Exact(Weekday::Tue)),
    ("水曜", DayWord::Exact(Weekday::Wed)),
    ("木曜", DayWord::Exact(Weekday::Thu)),
    ("金曜", DayWord::Exact(Weekday::Fri)),
    ("土曜", DayWord::Exact(Weekday::Sat)),
    ("日曜", DayWord::Exact(Weekday::Sun)),
    ("土日", DayWord::Weekend),
    ("週末", DayWord::Weekend),
    ("平日", DayWord::WorkWeek),
];

/// Resolve a spoken day-of-week phrase with the default options, under
/// which collective words are ambiguous.
pub fn resolve_day_phrase(phrase: &str) -> Option<Weekday> {
    resolve_day_phrase_with_options(phrase, &ResolveOptions::default())
}

/// Resolve a spoken day-of-week phrase to a concrete weekday.
///
/// Day words are matched as substrings anywhere in the phrase, so
/// "月曜日の朝" resolves like "月曜". The word occurring earliest in the
/// phrase wins; at equal positions the word table order decides.
/// Unrecognized phrases resolve to `None`.
///
/// # Examples
///
/// ```
/// use chrono::Weekday;
/// use departure_engine::resolve_day_phrase;
///
/// assert_eq!(resolve_day_phrase("月曜日の朝"), Some(Weekday::Mon));
/// assert_eq!(resolve_day_phrase("週末"), None);
/// ```
pub fn resolve_day_phrase_with_options(
    phrase: &str,
    options: &ResolveOptions,
) -> Option<Weekday> {
    let mut earliest: Option<(usize, DayWord)> = None;
    for (word, meaning) in DAY_WORDS {
        if let Some(position) = phrase.find(word) {
            if earliest.is_none_or(|(best, _)| position < best) {
                earliest = Some((position, meaning));
            }
        }
    }

    match earliest?.1 {
        DayWord::Exact(weekday) => Some(weekday),
        DayWord::Weekend => match options.collective_days {
            CollectiveDayPolicy::Ambiguous => None,
            CollectiveDayPolicy::Representative => Some(Weekday::Sun),
        },
        DayWord::WorkWeek => match options.collective_days {
            CollectiveDayPolicy::Ambiguous => None,
            CollectiveDayPolicy::Representative => Some(Weekday::Mon),
        },
    }
}

/// The date of `weekday` within the week containing `today`, with weeks
/// starting on Sunday.
///
/// The result may lie in the past: asking for 月曜 on a Wednesday names
/// the Monday two days back, not the next one. Callers wanting only
/// future dates must adjust themselves.
pub fn date_in_current_week(today: NaiveDate, weekday: Weekday) -> NaiveDate {
    let offset = i64::from(weekday.num_days_from_sunday())
        - i64::from(today.weekday().num_days_from_sunday());
    today + Duration::days(offset)
}

// ── Time phrases ────────────────────────────────────────────────────────────

/// Parse a voice time slot ("08:10", "8:10", "08:10:30") into a time of
/// day. Anything else resolves to `None` and the caller re-prompts.
pub fn parse_time_phrase(slot: &str) -> Option<NaiveTime> {
    let slot = slot.trim();
    NaiveTime::parse_from_str(slot, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(slot, "%H:%M"))
        .ok()
}

// ── Reference assembly ──────────────────────────────────────────────────────

/// Assemble the JST reference instant for a slot-filled query.
///
/// Slot precedence: an explicit day word beats an ISO `%Y-%m-%d` date
/// slot, which beats "today in JST" derived from the anchor. Returns
/// `None` whenever a supplied part does not resolve (an ambiguous day
/// word under the default policy, a malformed date, an unparsable
/// time); assembling a reference from half-understood slots would
/// answer a question the rider did not ask.
pub fn resolve_reference(
    anchor: DateTime<Utc>,
    date_slot: Option<&str>,
    day_phrase: Option<&str>,
    time_slot: &str,
    options: &ResolveOptions,
) -> Option<DateTime<Tz>> {
    let today = anchor.with_timezone(&JST).date_naive();
    let date = match (day_phrase, date_slot) {
        (Some(phrase), _) => {
            let weekday = resolve_day_phrase_with_options(phrase, options)?;
            date_in_current_week(today, weekday)
        }
        (None, Some(slot)) => NaiveDate::parse_from_str(slot.trim(), "%Y-%m-%d").ok()?,
        (None, None) => today,
    };
    let time = parse_time_phrase(time_slot)?;
    JST.from_local_datetime(&date.and_time(time)).single()
}

// ── Spoken rendering ────────────────────────────────────────────────────────

/// Spoken time of day: "08時15分", with the minutes omitted on the hour
/// ("08時"). Hours and minutes are zero-padded to two digits.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use departure_engine::{spoken_time, JST};
///
/// let on_the_hour = JST.with_ymd_and_hms(2026, 8, 26, 8, 0, 0).unwrap();
/// assert_eq!(spoken_time(&on_the_hour), "08時");
/// ```
pub fn spoken_time(at: &DateTime<Tz>) -> String {
    if at.minute() == 0 {
        format!("{:02}時", at.hour())
    } else {
        format!("{:02}時{:02}分", at.hour(), at.minute())
    }
}

/// The kanji a weekday is spoken with (月, 火, ...).
pub fn weekday_kanji(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "月",
        Weekday::Tue => "火",
        Weekday::Wed => "水",
        Weekday::Thu => "木",
        Weekday::Fri => "金",
        Weekday::Sat => "土",
        Weekday::Sun => "日",
    }
}

/// Spoken date: "08月26日水曜日".
pub fn spoken_date(at: &DateTime<Tz>) -> String {
    format!(
        "{:02}月{:02}日{}曜日",
        at.month(),
        at.day(),
        weekday_kanji(at.weekday())
    )
}

/// The answer sentence for a resolved query.
///
/// Three shapes: no departure left today, one left, or the usual two.
pub fn announce(departures: &NextDepartures) -> String {
    match (&departures.first, &departures.second) {
        (None, _) => "今日の便はもうありません。".to_string(),
        (Some(first), None) => format!(
            "次の便は{}で、その次はもうありません。",
            spoken_time(first)
        ),
        (Some(first), Some(second)) => format!(
            "次の便は{}で、その次は{}です。",
            spoken_time(first),
            spoken_time(second)
        ),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::departures::next_departures_in;
    use crate::timetable::Timetable;

    fn representative() -> ResolveOptions {
        ResolveOptions {
            collective_days: CollectiveDayPolicy::Representative,
        }
    }

    /// 2026-08-26 08:00 JST, a Wednesday morning.
    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 25, 23, 0, 0).unwrap()
    }

    // ── Day phrase tests ────────────────────────────────────────────────

    #[test]
    fn test_every_weekday_word_resolves() {
        assert_eq!(resolve_day_phrase("月曜"), Some(Weekday::Mon));
        assert_eq!(resolve_day_phrase("火曜"), Some(Weekday::Tue));
        assert_eq!(resolve_day_phrase("水曜"), Some(Weekday::Wed));
        assert_eq!(resolve_day_phrase("木曜"), Some(Weekday::Thu));
        assert_eq!(resolve_day_phrase("金曜"), Some(Weekday::Fri));
        assert_eq!(resolve_day_phrase("土曜"), Some(Weekday::Sat));
        assert_eq!(resolve_day_phrase("日曜"), Some(Weekday::Sun));
    }

    #[test]
    fn test_day_word_matches_inside_a_longer_phrase() {
        assert_eq!(resolve_day_phrase("次の金曜日の朝"), Some(Weekday::Fri));
        assert_eq!(resolve_day_phrase("土曜日"), Some(Weekday::Sat));
    }

    #[test]
    fn test_collective_words_are_ambiguous_by_default() {
        assert_eq!(resolve_day_phrase("土日"), None);
        assert_eq!(resolve_day_phrase("週末"), None);
        assert_eq!(resolve_day_phrase("平日"), None);
    }

    #[test]
    fn test_collective_words_under_the_representative_policy() {
        let options = representative();
        assert_eq!(
            resolve_day_phrase_with_options("土日", &options),
            Some(Weekday::Sun)
        );
        assert_eq!(
            resolve_day_phrase_with_options("週末", &options),
            Some(Weekday::Sun)
        );
        assert_eq!(
            resolve_day_phrase_with_options("平日", &options),
            Some(Weekday::Mon)
        );
    }

    #[test]
    fn test_earliest_word_in_the_phrase_wins() {
        // 平日 occurs first, so the phrase stays ambiguous by default
        // even though a concrete weekday follows.
        assert_eq!(resolve_day_phrase("平日の金曜"), None);
        assert_eq!(
            resolve_day_phrase_with_options("平日の金曜", &representative()),
            Some(Weekday::Mon)
        );
        assert_eq!(resolve_day_phrase("金曜か土日"), Some(Weekday::Fri));
    }

    #[test]
    fn test_unrecognized_phrase_resolves_to_none() {
        assert_eq!(resolve_day_phrase("明日"), None);
        assert_eq!(resolve_day_phrase(""), None);
        assert_eq!(resolve_day_phrase("Monday"), None);
    }

    #[test]
    fn test_date_in_current_week_counts_from_sunday() {
        let wednesday = NaiveDate::from_ymd_opt(2026, 8, 26).unwrap();
        assert_eq!(
            date_in_current_week(wednesday, Weekday::Sun),
            NaiveDate::from_ymd_opt(2026, 8, 23).unwrap()
        );
        assert_eq!(
            date_in_current_week(wednesday, Weekday::Sat),
            NaiveDate::from_ymd_opt(2026, 8, 29).unwrap()
        );
        // Earlier in the week than today: the result is in the past.
        assert_eq!(
            date_in_current_week(wednesday, Weekday::Mon),
            NaiveDate::from_ymd_opt(2026, 8, 24).unwrap()
        );
        assert_eq!(date_in_current_week(wednesday, Weekday::Wed), wednesday);
    }

    // ── Time phrase tests ───────────────────────────────────────────────

    #[test]
    fn test_parses_common_time_slot_shapes() {
        let expected = NaiveTime::from_hms_opt(8, 10, 0).unwrap();
        assert_eq!(parse_time_phrase("08:10"), Some(expected));
        assert_eq!(parse_time_phrase("8:10"), Some(expected));
        assert_eq!(parse_time_phrase(" 08:10 "), Some(expected));
        assert_eq!(
            parse_time_phrase("08:10:30"),
            NaiveTime::from_hms_opt(8, 10, 30)
        );
    }

    #[test]
    fn test_unparsable_time_slots_resolve_to_none() {
        assert_eq!(parse_time_phrase("25:00"), None);
        assert_eq!(parse_time_phrase("8時10分"), None);
        assert_eq!(parse_time_phrase("soon"), None);
        assert_eq!(parse_time_phrase(""), None);
    }

    // ── Reference assembly tests ────────────────────────────────────────

    #[test]
    fn test_day_phrase_beats_date_slot() {
        let reference = resolve_reference(
            anchor(),
            Some("2026-08-28"),
            Some("月曜"),
            "08:10",
            &ResolveOptions::default(),
        )
        .unwrap();
        assert_eq!(reference.to_rfc3339(), "2026-08-24T08:10:00+09:00");
    }

    #[test]
    fn test_date_slot_is_used_without_a_day_phrase() {
        let reference = resolve_reference(
            anchor(),
            Some("2026-08-28"),
            None,
            "9:05",
            &ResolveOptions::default(),
        )
        .unwrap();
        assert_eq!(reference.to_rfc3339(), "2026-08-28T09:05:00+09:00");
    }

    #[test]
    fn test_bare_time_falls_back_to_today_in_jst() {
        // The anchor is still Tuesday in UTC but already Wednesday in Tokyo.
        let reference =
            resolve_reference(anchor(), None, None, "09:00", &ResolveOptions::default()).unwrap();
        assert_eq!(reference.to_rfc3339(), "2026-08-26T09:00:00+09:00");
    }

    #[test]
    fn test_ambiguous_day_word_yields_no_reference() {
        let reference =
            resolve_reference(anchor(), None, Some("週末"), "08:10", &ResolveOptions::default());
        assert_eq!(reference, None);
    }

    #[test]
    fn test_collective_day_word_resolves_under_representative() {
        let reference =
            resolve_reference(anchor(), None, Some("週末"), "08:10", &representative()).unwrap();
        // Sunday of the current (Sunday-started) week.
        assert_eq!(reference.to_rfc3339(), "2026-08-23T08:10:00+09:00");
    }

    #[test]
    fn test_unparsable_slots_yield_no_reference() {
        let options = ResolveOptions::default();
        assert_eq!(resolve_reference(anchor(), None, None, "later", &options), None);
        assert_eq!(
            resolve_reference(anchor(), Some("08/28"), None, "08:10", &options),
            None
        );
    }

    #[test]
    fn test_resolved_monday_reference_finds_monday_departures() {
        let table = Timetable::parse_reader("8,0,15,30,45\n9,0,20\n".as_bytes()).unwrap();
        let reference = resolve_reference(
            anchor(),
            None,
            Some("月曜"),
            "08:10",
            &ResolveOptions::default(),
        )
        .unwrap();
        let board = next_departures_in(&table, &reference);
        assert_eq!(
            board.first.unwrap().to_rfc3339(),
            "2026-08-24T08:15:00+09:00"
        );
        assert_eq!(
            board.second.unwrap().to_rfc3339(),
            "2026-08-24T08:30:00+09:00"
        );
    }

    // ── Rendering tests ─────────────────────────────────────────────────

    fn at(hour: u32, minute: u32) -> DateTime<Tz> {
        JST.with_ymd_and_hms(2026, 8, 26, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_spoken_time_zero_pads() {
        assert_eq!(spoken_time(&at(8, 5)), "08時05分");
        assert_eq!(spoken_time(&at(21, 30)), "21時30分");
    }

    #[test]
    fn test_spoken_time_drops_minutes_on_the_hour() {
        assert_eq!(spoken_time(&at(8, 0)), "08時");
        assert_eq!(spoken_time(&at(0, 0)), "00時");
    }

    #[test]
    fn test_spoken_date() {
        assert_eq!(spoken_date(&at(8, 0)), "08月26日水曜日");
        let sunday = JST.with_ymd_and_hms(2026, 8, 30, 9, 0, 0).unwrap();
        assert_eq!(spoken_date(&sunday), "08月30日日曜日");
    }

    #[test]
    fn test_weekday_kanji() {
        assert_eq!(weekday_kanji(Weekday::Mon), "月");
        assert_eq!(weekday_kanji(Weekday::Sun), "日");
    }

    #[test]
    fn test_announce_with_two_departures() {
        let board = NextDepartures {
            first: Some(at(8, 15)),
            second: Some(at(8, 30)),
        };
        assert_eq!(announce(&board), "次の便は08時15分で、その次は08時30分です。");
    }

    #[test]
    fn test_announce_with_the_last_departure_of_the_day() {
        let board = NextDepartures {
            first: Some(at(21, 0)),
            second: None,
        };
        assert_eq!(announce(&board), "次の便は21時で、その次はもうありません。");
    }

    #[test]
    fn test_announce_when_service_is_over() {
        let board = NextDepartures {
            first: None,
            second: None,
        };
        assert_eq!(announce(&board), "今日の便はもうありません。");
    }
}
