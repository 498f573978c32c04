//! Turning user input into an absolute target timestamp.

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which kind of input the user is arming with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmMode {
    /// A time of day, `HH:MM:SS`
    #[default]
    AbsoluteTime,
    /// A (possibly fractional) number of minutes from now
    RelativeMinutes,
}

impl AlarmMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            AlarmMode::AbsoluteTime => "Specific Time (HH:MM:SS)",
            AlarmMode::RelativeMinutes => "Minutes from now",
        }
    }

    pub fn input_prompt(&self) -> &'static str {
        match self {
            AlarmMode::AbsoluteTime => "Enter time (HH:MM:SS):",
            AlarmMode::RelativeMinutes => "Enter minutes (decimal allowed, e.g. 0.5 = 30 sec):",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum AlarmError {
    #[error("Please enter a time in HH:MM:SS format.")]
    EmptyTime,
    #[error("'{0}' is not a valid time. Please enter a time in HH:MM:SS format.")]
    InvalidTime(String),
    #[error("Please enter a valid positive number of minutes.")]
    InvalidMinutes(String),
    #[error("That alarm is too far in the future.")]
    OutOfRange,
    #[error("Could not start the alarm timer: {0}")]
    Spawn(String),
}

/// Parsed user input, before it is pinned to a clock reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AlarmRequest {
    AbsoluteTime(NaiveTime),
    RelativeMinutes(f64),
}

impl AlarmRequest {
    pub fn parse(mode: AlarmMode, input: &str) -> Result<Self, AlarmError> {
        match mode {
            AlarmMode::AbsoluteTime => parse_time_of_day(input).map(AlarmRequest::AbsoluteTime),
            AlarmMode::RelativeMinutes => parse_minutes(input).map(AlarmRequest::RelativeMinutes),
        }
    }

    /// Compute the instant this request fires at, relative to `now`
    pub fn resolve(&self, now: NaiveDateTime) -> Result<NaiveDateTime, AlarmError> {
        match *self {
            AlarmRequest::AbsoluteTime(time) => Ok(next_occurrence(time, now)),
            AlarmRequest::RelativeMinutes(minutes) => offset_from(now, minutes),
        }
    }

    /// Text for the "alarm set" confirmation
    pub fn confirmation(&self) -> String {
        match self {
            AlarmRequest::AbsoluteTime(time) => {
                format!("Alarm set for {}", time.format("%H:%M:%S"))
            }
            AlarmRequest::RelativeMinutes(minutes) => {
                format!("Alarm set for {} minute(s) from now.", format_minutes(*minutes))
            }
        }
    }

    /// Short label for the alarm list
    pub fn label(&self) -> String {
        match self {
            AlarmRequest::AbsoluteTime(time) => format!("At {}", time.format("%H:%M:%S")),
            AlarmRequest::RelativeMinutes(minutes) => {
                format!("In {} min", format_minutes(*minutes))
            }
        }
    }
}

/// Whole numbers keep one decimal place (`5.0`), others print as typed (`2.5`)
pub fn format_minutes(minutes: f64) -> String {
    if minutes.fract() == 0.0 && minutes.abs() < 1e16 {
        format!("{:.1}", minutes)
    } else {
        format!("{}", minutes)
    }
}

/// Parse a strict `HH:MM:SS` time of day
pub fn parse_time_of_day(input: &str) -> Result<NaiveTime, AlarmError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AlarmError::EmptyTime);
    }

    // chrono accepts single-digit fields, so check the shape first
    let bytes = input.as_bytes();
    let well_formed = bytes.len() == 8
        && bytes[2] == b':'
        && bytes[5] == b':'
        && [0, 1, 3, 4, 6, 7].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return Err(AlarmError::InvalidTime(input.to_string()));
    }

    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .map_err(|_| AlarmError::InvalidTime(input.to_string()))
}

/// Parse a strictly positive, finite number of minutes
pub fn parse_minutes(input: &str) -> Result<f64, AlarmError> {
    let input = input.trim();
    match input.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() && minutes > 0.0 => Ok(minutes),
        _ => Err(AlarmError::InvalidMinutes(input.to_string())),
    }
}

/// Today's `time`, or tomorrow's if that has already passed
pub fn next_occurrence(time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let target = now.date().and_time(time);
    if target < now {
        target + Duration::days(1)
    } else {
        target
    }
}

pub fn offset_from(now: NaiveDateTime, minutes: f64) -> Result<NaiveDateTime, AlarmError> {
    let millis = (minutes * 60_000.0).round();
    if !millis.is_finite() || millis > i64::MAX as f64 {
        return Err(AlarmError::OutOfRange);
    }
    let offset = Duration::try_milliseconds(millis as i64).ok_or(AlarmError::OutOfRange)?;
    now.checked_add_signed(offset).ok_or(AlarmError::OutOfRange)
}
