//! Scheduled trips and their per-stop arrival records.

use super::ClockTime;
use super::time::format_duration;

/// One stop's arrival within a departure.
///
/// `arrival` is `None` when the vehicle does not serve the stop on this trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopTime {
    pub stop_name: String,
    pub arrival: Option<ClockTime>,
}

impl StopTime {
    pub fn new(stop_name: impl Into<String>, arrival: Option<ClockTime>) -> Self {
        Self {
            stop_name: stop_name.into(),
            arrival,
        }
    }

    /// Whether the vehicle stops here on this trip.
    pub fn is_served(&self) -> bool {
        self.arrival.is_some()
    }
}

/// One scheduled trip of a line on a given date and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub id: String,
    pub departure: ClockTime,
    pub destination: String,
    pub duration_mins: Option<u32>,
    /// Free-text note, usually explaining the marker.
    pub note: Option<String>,
    /// Single-character footnote symbol printed next to the time.
    pub marker: Option<char>,
    pub stop_times: Vec<StopTime>,
}

impl Departure {
    /// Number of stops actually served.
    pub fn served_stop_count(&self) -> usize {
        self.stop_times.iter().filter(|s| s.is_served()).count()
    }

    /// Trip duration for display, if the feed provides one.
    pub fn duration_label(&self) -> Option<String> {
        self.duration_mins.map(format_duration)
    }
}

/// A footnote referenced by one or more departures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footnote {
    pub marker: Option<char>,
    pub note: String,
}

/// Sort departures by departure time, keeping feed order for equal times.
pub fn sort_departures(departures: &mut [Departure]) {
    departures.sort_by_key(|d| d.departure);
}

/// Index of the first departure leaving at or after `now`.
///
/// Expects departures sorted by time. Returns `None` once the last trip of
/// the day has left.
///
/// ```
/// use timetable_core::domain::{ClockTime, Departure, next_departure};
///
/// let dep = |id: &str, t: &str| Departure {
///     id: id.into(),
///     departure: ClockTime::parse(t).unwrap(),
///     destination: "Split".into(),
///     duration_mins: None,
///     note: None,
///     marker: None,
///     stop_times: vec![],
/// };
/// let board = vec![dep("a", "05:30"), dep("b", "15:00")];
///
/// assert_eq!(next_departure(&board, ClockTime::parse("09:00").unwrap()), Some(1));
/// assert_eq!(next_departure(&board, ClockTime::parse("16:00").unwrap()), None);
/// ```
pub fn next_departure(departures: &[Departure], now: ClockTime) -> Option<usize> {
    departures.iter().position(|d| d.departure >= now)
}

/// Collect distinct footnotes in the order they first appear.
///
/// A departure contributes a footnote when it carries a note; the marker is
/// attached when present.
pub fn footnotes(departures: &[Departure]) -> Vec<Footnote> {
    let mut seen: Vec<Footnote> = Vec::new();
    for departure in departures {
        let Some(note) = departure.note.as_deref().map(str::trim) else {
            continue;
        };
        if note.is_empty() {
            continue;
        }
        let footnote = Footnote {
            marker: departure.marker,
            note: note.to_string(),
        };
        if !seen.contains(&footnote) {
            seen.push(footnote);
        }
    }
    seen
}
