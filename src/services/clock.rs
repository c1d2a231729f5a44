use thiserror::Error;

/// Earliest bookable hour of the day.
pub const OPENING_HOUR: i32 = 8;
/// Latest bookable hour of the day.
pub const CLOSING_HOUR: i32 = 21;
/// Grid granularity in minutes.
pub const SLOT_INTERVAL: i32 = 15;
/// Shortest bookable active duration.
pub const MIN_DURATION_MINUTES: i32 = 15;

const MINUTES_PER_DAY: i32 = 24 * 60;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TimeError {
    #[error("malformed time, expected HH:MM: {0:?}")]
    Malformed(String),

    #[error("minutes out of range 0..=1440: {0}")]
    OutOfRange(i32),
}

/// Parse a strict `HH:MM` 24-hour clock string into minutes since midnight.
///
/// Both fields must be exactly two digits; hour 00-23, minute 00-59.
pub fn time_to_minutes(s: &str) -> Result<i32, TimeError> {
    let malformed = || TimeError::Malformed(s.to_string());

    let (hh, mm) = s.split_once(':').ok_or_else(malformed)?;
    if hh.len() != 2 || mm.len() != 2 {
        return Err(malformed());
    }

    let hour: i32 = hh.parse().map_err(|_| malformed())?;
    let minute: i32 = mm.parse().map_err(|_| malformed())?;
    if !(0..24).contains(&hour) || !(0..60).contains(&minute) {
        return Err(malformed());
    }

    Ok(hour * 60 + minute)
}

/// Render minutes since midnight as a zero-padded `HH:MM` string.
///
/// Accepts 0..=1440; 1440 renders as "24:00" (end-of-day marker).
pub fn minutes_to_time(minutes: i32) -> Result<String, TimeError> {
    if !(0..=MINUTES_PER_DAY).contains(&minutes) {
        return Err(TimeError::OutOfRange(minutes));
    }
    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Snap a minute offset to the nearest grid slot.
pub fn snap_to_slot(minutes: i32) -> i32 {
    ((minutes + SLOT_INTERVAL / 2) / SLOT_INTERVAL) * SLOT_INTERVAL
}
