//! Render-ready projection of [`ScheduleState`].

use crate::carrier::{CarrierResolver, TicketPresentation};
use crate::domain::{
    Banner, ClockTime, DayType, Departure, DirectionIndex, Footnote, HolidayCalendar, Route,
    footnotes, next_departure, sort_departures,
};
use crate::timeline::{self, TimelineEntry};

use super::state::ScheduleState;

/// Where the departures list stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeparturesStatus {
    /// Nothing fetched for the current inputs yet.
    NotLoaded,
    Loading,
    /// Fetched; the line does not run on this date.
    NoService,
    Available,
}

/// One entry of the direction toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionOption {
    pub direction: DirectionIndex,
    pub label: String,
    pub selected: bool,
}

/// One row of the departures list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureView {
    pub id: String,
    pub time: ClockTime,
    pub destination: String,
    pub duration: Option<String>,
    pub marker: Option<char>,
    pub note: Option<String>,
    pub timeline: Vec<TimelineEntry>,
    /// First departure at or after the current time.
    pub is_next: bool,
}

impl DepartureView {
    fn new(departure: &Departure, is_next: bool) -> Self {
        Self {
            id: departure.id.clone(),
            time: departure.departure,
            destination: departure.destination.clone(),
            duration: departure.duration_label(),
            marker: departure.marker,
            note: departure.note.clone(),
            timeline: timeline::build(departure),
            is_next,
        }
    }
}

/// Everything the schedule screen renders, derived from one state snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleView {
    pub day_type: DayType,
    pub day_label: &'static str,
    pub title: Option<String>,
    pub show_direction_toggle: bool,
    pub directions: Vec<DirectionOption>,
    pub current_route: Option<Route>,
    pub tickets: TicketPresentation,
    pub status: DeparturesStatus,
    pub departures: Vec<DepartureView>,
    pub footnotes: Vec<Footnote>,
    pub banners: Vec<Banner>,
    pub error: Option<String>,
    pub loading: bool,
    pub refreshing: bool,
}

impl ScheduleView {
    /// Project `state` for display.
    ///
    /// `now` highlights the next departure; pass `None` when the selected
    /// date is not today.
    pub fn build(
        state: &ScheduleState,
        holidays: &HolidayCalendar,
        carriers: &CarrierResolver,
        now: Option<ClockTime>,
    ) -> Self {
        let language = state.inputs.language;
        let day_type = DayType::resolve(state.inputs.date, holidays);

        let selector = state.direction_selector();
        let directions = if selector.shows_toggle() {
            selector
                .available_directions()
                .into_iter()
                .filter_map(|d| state.line.as_deref()?.route(d))
                .map(|route| DirectionOption {
                    direction: route.direction,
                    label: route.label.clone(),
                    selected: route.direction == selector.selected(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let tickets = state
            .line
            .as_deref()
            .map(|line| carriers.presentation(line))
            .unwrap_or(TicketPresentation::Unknown);

        let mut sorted: Vec<Departure> = state
            .departures
            .as_deref()
            .map(|d| d.to_vec())
            .unwrap_or_default();
        sort_departures(&mut sorted);
        let next = now.and_then(|now| next_departure(&sorted, now));

        let status = match &state.departures {
            _ if state.departures_loading => DeparturesStatus::Loading,
            None => DeparturesStatus::NotLoaded,
            Some(d) if d.is_empty() => DeparturesStatus::NoService,
            Some(_) => DeparturesStatus::Available,
        };

        Self {
            day_type,
            day_label: day_type.label(language),
            title: state.line.as_ref().map(|line| line.name.clone()),
            show_direction_toggle: selector.shows_toggle(),
            directions,
            current_route: selector.current_route().cloned(),
            tickets,
            status,
            footnotes: footnotes(&sorted),
            departures: sorted
                .iter()
                .enumerate()
                .map(|(i, d)| DepartureView::new(d, next == Some(i)))
                .collect(),
            banners: state.banners.clone(),
            error: state.error.as_ref().map(|e| e.to_string()),
            loading: state.loading,
            refreshing: state.refreshing,
        }
    }
}
