//! Domain types for timetable resolution.
//!
//! This module contains the validated model the rest of the crate works on.
//! Feed data is converted into these types once, so code that receives them
//! can trust times are well-formed and unserved stops are explicit.

mod day_type;
mod departure;
mod language;
mod line;
mod time;

pub use day_type::{DayType, HolidayCalendar};
pub use departure::{Departure, Footnote, StopTime, footnotes, next_departure, sort_departures};
pub use language::{Language, TransportMode};
pub use line::{Banner, Contact, DirectionIndex, Line, LineId, LineKind, Route, Stop};
pub use time::{ClockTime, MINUTES_PER_DAY, TimeError, format_duration};
