//! Transport timetable resolution.
//!
//! Turns raw line and departure data into what a timetable screen shows:
//! which schedule bucket a date falls in, which direction is active, the
//! per-stop timeline of each departure, and where to buy tickets. The
//! `schedule` module coordinates the fetches behind one displayed timetable.

pub mod api;
pub mod cache;
pub mod carrier;
pub mod direction;
pub mod domain;
pub mod schedule;
pub mod timeline;
