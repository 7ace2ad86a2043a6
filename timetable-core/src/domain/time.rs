//! Clock time handling for timetable feeds.
//!
//! The timetable API provides times as "HH:MM" or "HH:MM:SS" strings in local
//! time. Only hours and minutes matter for display and for overnight
//! detection, so seconds are validated and then dropped.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};

/// Minutes in one calendar day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A local time of day with minute precision.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::ClockTime;
///
/// let t = ClockTime::parse("07:45:30").unwrap();
/// assert_eq!(t.to_string(), "07:45");
/// assert_eq!(t.minutes_since_midnight(), 7 * 60 + 45);
///
/// assert!(ClockTime::parse("7:45").is_err());
/// assert!(ClockTime::parse("24:00").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Build a time from hour and minute components.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self {
            minutes: (hour * 60 + minute) as u16,
        })
    }

    /// Parse `HH:MM` or `HH:MM:SS`.
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 && bytes.len() != 8 {
            return Err(TimeError::new(s, "expected HH:MM or HH:MM:SS"));
        }
        if bytes[2] != b':' {
            return Err(TimeError::new(s, "expected colon at position 2"));
        }

        let hour =
            parse_two_digits(&bytes[0..2]).ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;
        if hour > 23 {
            return Err(TimeError::new(s, "hour must be 0-23"));
        }

        let minute = parse_two_digits(&bytes[3..5])
            .ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        if bytes.len() == 8 {
            if bytes[5] != b':' {
                return Err(TimeError::new(s, "expected colon at position 5"));
            }
            let second = parse_two_digits(&bytes[6..8])
                .ok_or_else(|| TimeError::new(s, "invalid second digits"))?;
            if second > 59 {
                return Err(TimeError::new(s, "second must be 0-59"));
            }
        }

        Self::from_hm(hour, minute).ok_or_else(|| TimeError::new(s, "invalid time"))
    }

    /// Returns the hour (0-23).
    pub fn hour(&self) -> u32 {
        u32::from(self.minutes / 60)
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        u32::from(self.minutes % 60)
    }

    /// Minutes elapsed since 00:00.
    pub fn minutes_since_midnight(&self) -> u16 {
        self.minutes
    }

    /// True if `self` falls on the calendar day after a trip that left at
    /// `departure`, i.e. the clock wrapped past 24:00.
    ///
    /// ```
    /// use timetable_core::domain::ClockTime;
    ///
    /// let dep = ClockTime::parse("23:50").unwrap();
    /// assert!(ClockTime::parse("00:10").unwrap().wraps_after(dep));
    /// assert!(!ClockTime::parse("23:55").unwrap().wraps_after(dep));
    /// ```
    pub fn wraps_after(&self, departure: ClockTime) -> bool {
        self.minutes < departure.minutes
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl FromStr for ClockTime {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClockTime({:02}:{:02})", self.hour(), self.minute())
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

/// Parse two ASCII digit bytes into a u32.
fn parse_two_digits(bytes: &[u8]) -> Option<u32> {
    if bytes.len() != 2 {
        return None;
    }
    let d1 = (bytes[0] as char).to_digit(10)?;
    let d2 = (bytes[1] as char).to_digit(10)?;
    Some(d1 * 10 + d2)
}

/// Format a trip duration for display.
///
/// ```
/// use timetable_core::domain::format_duration;
///
/// assert_eq!(format_duration(45), "45 min");
/// assert_eq!(format_duration(60), "1 h");
/// assert_eq!(format_duration(80), "1 h 20 min");
/// ```
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let rest = minutes % 60;
    match (hours, rest) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h} h"),
        (h, m) => format!("{h} h {m} min"),
    }
}
