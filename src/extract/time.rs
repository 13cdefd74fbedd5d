use chrono::{Datelike, NaiveDateTime, Weekday};
use tracing::warn;

use crate::error::{AppError, Result};

/// Parse card time text such as `Friday, 12 May 19:30` against `year`.
///
/// The page never prints a year, so a December scrape of a January fixture lands in the
/// wrong year. A weekday that disagrees with the resulting date is the visible symptom;
/// it is logged, not corrected.
pub fn parse_event_time(text: &str, year: i32) -> Result<NaiveDateTime> {
    let err = || AppError::TimeParse {
        text: text.to_string(),
    };

    let (weekday_text, rest) = text.split_once(',').ok_or_else(err)?;
    let weekday = weekday_text.trim().parse::<Weekday>().map_err(|_| err())?;

    let start = NaiveDateTime::parse_from_str(&format!("{} {year}", rest.trim()), "%d %b %H:%M %Y")
        .map_err(|_| err())?;

    if start.weekday() != weekday {
        warn!(
            text,
            year,
            parsed = %start,
            "event weekday disagrees with date; reference year may be wrong"
        );
    }

    Ok(start)
}
