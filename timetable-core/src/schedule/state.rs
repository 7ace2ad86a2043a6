//! UI-facing schedule state.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::direction::DirectionSelector;
use crate::domain::{Banner, Departure, DirectionIndex, Language, Line, LineId, TransportMode};

use super::source::{DeparturesQuery, LineQuery};

/// Everything that determines what the schedule screen fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleInputs {
    pub line_id: LineId,
    pub mode: TransportMode,
    pub date: NaiveDate,
    pub direction: DirectionIndex,
    pub language: Language,
}

impl ScheduleInputs {
    /// Inputs for direction 0 in the default language.
    pub fn new(mode: TransportMode, line_id: impl Into<LineId>, date: NaiveDate) -> Self {
        Self {
            line_id: line_id.into(),
            mode,
            date,
            direction: DirectionIndex::default(),
            language: Language::default(),
        }
    }

    pub fn with_direction(mut self, direction: DirectionIndex) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }

    pub fn line_query(&self) -> LineQuery {
        LineQuery {
            mode: self.mode,
            line_id: self.line_id.clone(),
            language: self.language,
        }
    }

    pub fn departures_query(&self) -> DeparturesQuery {
        DeparturesQuery {
            mode: self.mode,
            line_id: self.line_id.clone(),
            date: self.date,
            direction: self.direction,
            language: self.language,
        }
    }
}

/// Errors recorded in schedule state.
///
/// Only line errors are meant for the user; departure errors are kept for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    #[error("failed to load line {line}: {message}")]
    Line { line: LineId, message: String },

    #[error("failed to load notices: {message}")]
    Banners { message: String },

    #[error("failed to load departures for {date}: {message}")]
    Departures { date: NaiveDate, message: String },
}

/// Snapshot of the schedule screen's state.
#[derive(Debug, Clone)]
pub struct ScheduleState {
    pub inputs: ScheduleInputs,

    pub line: Option<Arc<Line>>,
    pub banners: Vec<Banner>,

    /// First load for the current line, nothing to show yet.
    pub loading: bool,
    /// Manual refresh in flight; existing data stays visible.
    pub refreshing: bool,
    /// User-visible line or banner failure, with a retry affordance.
    pub error: Option<ScheduleError>,

    /// `None` until a departures fetch succeeds for the current inputs.
    /// `Some(empty)` means the line does not run on this date.
    pub departures: Option<Arc<Vec<Departure>>>,
    pub departures_loading: bool,
    /// Last departures failure. Not shown to the user.
    pub departures_error: Option<ScheduleError>,
}

impl ScheduleState {
    pub(crate) fn new(inputs: ScheduleInputs) -> Self {
        Self {
            inputs,
            line: None,
            banners: Vec::new(),
            loading: false,
            refreshing: false,
            error: None,
            departures: None,
            departures_loading: false,
            departures_error: None,
        }
    }

    /// Whether departures may be fetched.
    pub fn line_ready(&self) -> bool {
        self.line.is_some() && self.error.is_none()
    }

    /// Direction selection over the current line's routes.
    pub fn direction_selector(&self) -> DirectionSelector<'_> {
        let routes = self.line.as_deref().map(|l| l.routes.as_slice()).unwrap_or(&[]);
        DirectionSelector::new(routes, self.inputs.direction)
    }

    /// A successful fetch found no departures on the selected date.
    pub fn has_no_service(&self) -> bool {
        self.departures.as_ref().is_some_and(|d| d.is_empty())
    }

    /// Drop line-scoped data ahead of loading a different line or language.
    pub(crate) fn clear_line(&mut self) {
        self.line = None;
        self.banners.clear();
        self.error = None;
        self.clear_departures();
    }

    /// Drop departures that belong to previous inputs.
    pub(crate) fn clear_departures(&mut self) {
        self.departures = None;
        self.departures_error = None;
    }
}
