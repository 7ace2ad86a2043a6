//! Schedule buckets for calendar dates.
//!
//! Timetables publish one column per weekday plus a public holiday column.
//! A holiday always uses the holiday column, whatever weekday it falls on.

use std::collections::HashSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

use super::Language;

/// The schedule bucket a date maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayType {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
    /// Public holiday.
    Praznik,
}

impl DayType {
    /// All buckets in timetable column order.
    pub const ALL: [DayType; 8] = [
        DayType::Mon,
        DayType::Tue,
        DayType::Wed,
        DayType::Thu,
        DayType::Fri,
        DayType::Sat,
        DayType::Sun,
        DayType::Praznik,
    ];

    /// Resolve the bucket for a local calendar date.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use timetable_core::domain::{DayType, HolidayCalendar};
    ///
    /// let christmas = NaiveDate::from_ymd_opt(2025, 12, 25).unwrap();
    /// let holidays = HolidayCalendar::from_dates([christmas]);
    ///
    /// assert_eq!(DayType::resolve(christmas, &holidays), DayType::Praznik);
    /// let boxing_day = christmas.succ_opt().unwrap();
    /// assert_eq!(DayType::resolve(boxing_day, &holidays), DayType::Fri);
    /// ```
    pub fn resolve(date: NaiveDate, holidays: &HolidayCalendar) -> Self {
        if holidays.contains(date) {
            return DayType::Praznik;
        }
        Self::from_weekday(date.weekday())
    }

    /// Map an ISO weekday to its bucket.
    pub fn from_weekday(weekday: Weekday) -> Self {
        match weekday {
            Weekday::Mon => DayType::Mon,
            Weekday::Tue => DayType::Tue,
            Weekday::Wed => DayType::Wed,
            Weekday::Thu => DayType::Thu,
            Weekday::Fri => DayType::Fri,
            Weekday::Sat => DayType::Sat,
            Weekday::Sun => DayType::Sun,
        }
    }

    /// Stable code used by timetable feeds.
    pub fn code(&self) -> &'static str {
        match self {
            DayType::Mon => "MON",
            DayType::Tue => "TUE",
            DayType::Wed => "WED",
            DayType::Thu => "THU",
            DayType::Fri => "FRI",
            DayType::Sat => "SAT",
            DayType::Sun => "SUN",
            DayType::Praznik => "PRAZNIK",
        }
    }

    /// Human-readable name in the given display language.
    pub fn label(&self, language: Language) -> &'static str {
        match (language, self) {
            (Language::Hr, DayType::Mon) => "Ponedjeljak",
            (Language::Hr, DayType::Tue) => "Utorak",
            (Language::Hr, DayType::Wed) => "Srijeda",
            (Language::Hr, DayType::Thu) => "Četvrtak",
            (Language::Hr, DayType::Fri) => "Petak",
            (Language::Hr, DayType::Sat) => "Subota",
            (Language::Hr, DayType::Sun) => "Nedjelja",
            (Language::Hr, DayType::Praznik) => "Praznik",
            (Language::En, DayType::Mon) => "Monday",
            (Language::En, DayType::Tue) => "Tuesday",
            (Language::En, DayType::Wed) => "Wednesday",
            (Language::En, DayType::Thu) => "Thursday",
            (Language::En, DayType::Fri) => "Friday",
            (Language::En, DayType::Sat) => "Saturday",
            (Language::En, DayType::Sun) => "Sunday",
            (Language::En, DayType::Praznik) => "Public holiday",
        }
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Dates flagged as public holidays.
///
/// Which dates are holidays is decided upstream; this type only answers
/// membership.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    dates: HashSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Create an empty calendar.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a calendar from a set of holiday dates.
    pub fn from_dates(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Flag a date as a holiday.
    pub fn insert(&mut self, date: NaiveDate) {
        self.dates.insert(date);
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.dates.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
