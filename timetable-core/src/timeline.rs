//! Per-stop timelines for a single departure.
//!
//! Stops the vehicle does not serve are dropped entirely. Every remaining
//! stop is compared against the trip's departure time, not against the
//! previous stop, to decide whether it falls on the next calendar day.

use crate::domain::{ClockTime, Departure};

/// One served stop in a departure's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub stop_name: String,
    pub arrival: ClockTime,
    pub is_first: bool,
    pub is_last: bool,
    /// Arrival is on the day after the trip departed.
    pub crosses_midnight: bool,
}

impl TimelineEntry {
    /// Arrival as `HH:MM`.
    pub fn display_time(&self) -> String {
        self.arrival.to_string()
    }

    /// Whether this entry is a route endpoint.
    pub fn is_endpoint(&self) -> bool {
        self.is_first || self.is_last
    }
}

/// Build the display timeline for a departure.
///
/// An empty result means the feed has no stop detail for this trip; it is
/// not an error.
///
/// # Examples
///
/// ```
/// use timetable_core::domain::{ClockTime, Departure, StopTime};
/// use timetable_core::timeline::build;
///
/// let t = |s: &str| Some(ClockTime::parse(s).unwrap());
/// let departure = Departure {
///     id: "night".into(),
///     departure: ClockTime::parse("23:50").unwrap(),
///     destination: "Vis".into(),
///     duration_mins: Some(140),
///     note: None,
///     marker: None,
///     stop_times: vec![
///         StopTime::new("Split", t("23:50")),
///         StopTime::new("Milna", None),
///         StopTime::new("Hvar", t("00:45")),
///         StopTime::new("Vis", t("02:10")),
///     ],
/// };
///
/// let timeline = build(&departure);
/// assert_eq!(timeline.len(), 3);
/// assert!(!timeline[0].crosses_midnight);
/// assert!(timeline[1].crosses_midnight);
/// assert!(timeline[2].is_last);
/// ```
pub fn build(departure: &Departure) -> Vec<TimelineEntry> {
    let served: Vec<(&str, ClockTime)> = departure
        .stop_times
        .iter()
        .filter_map(|st| st.arrival.map(|t| (st.stop_name.as_str(), t)))
        .collect();

    let last = served.len().saturating_sub(1);

    served
        .into_iter()
        .enumerate()
        .map(|(i, (stop_name, arrival))| TimelineEntry {
            stop_name: stop_name.to_string(),
            arrival,
            is_first: i == 0,
            is_last: i == last,
            crosses_midnight: i != 0 && arrival.wraps_after(departure.departure),
        })
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::domain::StopTime;
    use proptest::prelude::*;

    fn clock() -> impl Strategy<Value = ClockTime> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| ClockTime::from_hm(h, m).unwrap())
    }

    fn any_departure() -> impl Strategy<Value = Departure> {
        (
            clock(),
            proptest::collection::vec(proptest::option::of(clock()), 0..12),
        )
            .prop_map(|(departure, arrivals)| Departure {
                id: "p".to_string(),
                departure,
                destination: "X".to_string(),
                duration_mins: None,
                note: None,
                marker: None,
                stop_times: arrivals
                    .into_iter()
                    .enumerate()
                    .map(|(i, a)| StopTime::new(format!("S{i}"), a))
                    .collect(),
            })
    }

    proptest! {
        /// One entry per served stop.
        #[test]
        fn length_matches_served_stops(dep in any_departure()) {
            prop_assert_eq!(build(&dep).len(), dep.served_stop_count());
        }

        /// The first entry is never flagged.
        #[test]
        fn first_never_crosses(dep in any_departure()) {
            if let Some(first) = build(&dep).first() {
                prop_assert!(!first.crosses_midnight);
                prop_assert!(first.is_first);
            }
        }

        /// Exactly one first and one last entry in any non-empty timeline.
        #[test]
        fn single_first_and_last(dep in any_departure()) {
            let timeline = build(&dep);
            if !timeline.is_empty() {
                prop_assert_eq!(timeline.iter().filter(|e| e.is_first).count(), 1);
                prop_assert_eq!(timeline.iter().filter(|e| e.is_last).count(), 1);
                prop_assert!(timeline.last().unwrap().is_last);
            }
        }
    }
}
