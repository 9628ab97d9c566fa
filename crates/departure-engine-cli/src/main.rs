//! Developer harness around the departure engine.
//!
//! Mirrors the voice flow without the voice: an optional spoken day word
//! or ISO date picks the day, a time slot picks the reference time, and
//! the answer comes back as the sentence the assistant would read aloud.
//! Slots that do not resolve make the run fail instead of guessing, the
//! same refusal the assistant turns into a re-prompt.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use clap::Parser;

use departure_engine::{
    announce, next_departures_in, resolve_reference, spoken_date, CollectiveDayPolicy, DayType,
    ResolveOptions, TimetableStore, JST,
};

#[derive(Parser)]
#[command(
    name = "nextbus",
    version,
    about = "Ask the shuttle timetable when the next bus leaves"
)]
struct Args {
    /// Directory holding weekday.csv, saturday.csv, and sunday.csv
    #[arg(long, value_name = "DIR", default_value = "crates/departure-engine/data")]
    data_dir: PathBuf,

    /// Reference time slot, e.g. "08:10"; omitted means now
    #[arg(long, value_name = "HH:MM")]
    time: Option<String>,

    /// Spoken day word, e.g. 月曜 or 週末
    #[arg(long, value_name = "WORD", requires = "time")]
    day: Option<String>,

    /// Reference date as %Y-%m-%d; a --day word beats it
    #[arg(long, value_name = "DATE", requires = "time")]
    date: Option<String>,

    /// Map collective day words (土日, 週末, 平日) to a representative day
    #[arg(long)]
    representative_days: bool,

    /// Print the loaded day table before answering
    #[arg(long, conflicts_with = "json")]
    show_table: bool,

    /// Emit JSON instead of the spoken sentence
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let store = TimetableStore::new(&args.data_dir);
    let options = ResolveOptions {
        collective_days: if args.representative_days {
            CollectiveDayPolicy::Representative
        } else {
            CollectiveDayPolicy::Ambiguous
        },
    };

    let now = Utc::now();
    let reference = match &args.time {
        Some(time) => {
            let resolved =
                resolve_reference(now, args.date.as_deref(), args.day.as_deref(), time, &options);
            let Some(reference) = resolved else {
                bail!(
                    "could not resolve day={:?} date={:?} time={:?} (ambiguous or unparsable)",
                    args.day,
                    args.date,
                    time
                );
            };
            reference
        }
        None => now.with_timezone(&JST),
    };

    let day_type = DayType::of(reference.weekday());
    let table = store.load(day_type).with_context(|| {
        format!(
            "loading {} from {}",
            day_type.file_name(),
            store.data_dir().display()
        )
    })?;

    if args.show_table {
        for (hour, minutes) in table.iter() {
            let cells: Vec<String> = minutes.iter().map(|minute| format!("{minute:02}")).collect();
            println!("{hour:02}: {}", cells.join(" "));
        }
    }

    let board = next_departures_in(&table, &reference);

    if args.json {
        let payload = serde_json::json!({
            "reference": reference.to_rfc3339(),
            "date": spoken_date(&reference),
            "day_type": day_type,
            "first": board.first.map(|at| at.to_rfc3339()),
            "second": board.second.map(|at| at.to_rfc3339()),
            "answer": announce(&board),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!("{}", announce(&board));
    }

    Ok(())
}
