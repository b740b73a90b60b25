use chrono::{NaiveDate, NaiveTime};

/// Parses a `YYYY-MM-DD` date as used by the appointment API and the
/// `SELECTED_DATE` setting. Single digit months and days are accepted.
pub fn parse_date(datestr: &str) -> anyhow::Result<NaiveDate> {
    let invalid = || anyhow::Error::msg(format!("Invalid date: {}", datestr));

    let mut parts = datestr.trim().splitn(3, '-');
    let year = parts.next().and_then(|y| y.parse::<i32>().ok());
    let month = parts.next().and_then(|m| m.parse::<u32>().ok());
    let day = parts.next().and_then(|d| d.parse::<u32>().ok());

    match (year, month, day) {
        // The clinic has no appointments outside of this range
        (Some(year), Some(month), Some(day)) if (1970..=2100).contains(&year) => {
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

/// Parses a wall clock time. The API sends either `HH:MM` or `HH:MM:SS`.
pub fn parse_clock_time(timestr: &str) -> anyhow::Result<NaiveTime> {
    let timestr = timestr.trim();
    NaiveTime::parse_from_str(timestr, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(timestr, "%H:%M"))
        .map_err(|_| anyhow::Error::msg(timestr.to_string()))
}

pub fn format_date(date: &NaiveDate) -> String {
    // 2001-07-08
    date.format("%F").to_string()
}
