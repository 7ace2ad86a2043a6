//! Schedule screen orchestration.
//!
//! Ties the fetch collaborators together for one displayed timetable:
//! line metadata and banners first, then departures for the selected date
//! and direction. Responses that arrive after the user has moved on are
//! discarded rather than shown.

mod orchestrator;
mod source;
mod state;
mod view;

#[cfg(test)]
mod orchestrator_tests;

pub use orchestrator::{FetchOutcome, ScheduleOrchestrator};
pub use source::{DeparturesQuery, LineQuery, TimetableSource};
pub use state::{ScheduleError, ScheduleInputs, ScheduleState};
pub use view::{DepartureView, DeparturesStatus, DirectionOption, ScheduleView};
