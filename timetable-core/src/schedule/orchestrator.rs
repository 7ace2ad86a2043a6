//! Request lifecycle for the schedule screen.
//!
//! Two fetch pipelines share one state:
//! - line metadata and contextual banners, fetched concurrently and joined
//! - departures for the selected date and direction, gated on the line
//!
//! Every fetch takes a ticket when it is issued. Its result is applied only
//! if the ticket is still the latest of its kind and the inputs it was issued
//! for still match; otherwise the result is discarded.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

use crate::direction::UnknownDirection;
use crate::domain::{DirectionIndex, Language, LineId, TransportMode};

use super::source::{DeparturesQuery, LineQuery, TimetableSource};
use super::state::{ScheduleError, ScheduleInputs, ScheduleState};

/// What happened to a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Result was applied to state.
    Applied,
    /// Fetch failed; the failure was recorded.
    Failed,
    /// Inputs moved on while the fetch was in flight; result discarded.
    Stale,
    /// No fetch was issued.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineLoad {
    Initial,
    Refresh,
}

/// An issued fetch: sequence number plus the inputs it was issued for.
struct Ticket<Q> {
    id: u64,
    query: Q,
}

struct Inner {
    state: ScheduleState,
    line_ticket: u64,
    departures_ticket: u64,
}

impl Inner {
    fn is_current_line(&self, ticket: &Ticket<LineQuery>) -> bool {
        self.line_ticket == ticket.id && self.state.inputs.line_query() == ticket.query
    }

    fn is_current_departures(&self, ticket: &Ticket<DeparturesQuery>) -> bool {
        self.departures_ticket == ticket.id && self.state.inputs.departures_query() == ticket.query
    }
}

/// Coordinates fetches for one schedule screen.
///
/// Cheap to clone; clones share state.
pub struct ScheduleOrchestrator<S> {
    source: Arc<S>,
    inner: Arc<RwLock<Inner>>,
}

impl<S> Clone for ScheduleOrchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: TimetableSource> ScheduleOrchestrator<S> {
    /// Create an orchestrator. Nothing is fetched until [`start`](Self::start).
    pub fn new(source: S, inputs: ScheduleInputs) -> Self {
        Self {
            source: Arc::new(source),
            inner: Arc::new(RwLock::new(Inner {
                state: ScheduleState::new(inputs),
                line_ticket: 0,
                departures_ticket: 0,
            })),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Current state.
    pub async fn snapshot(&self) -> ScheduleState {
        self.inner.read().await.state.clone()
    }

    /// Initial load: line metadata, then departures if the line loaded.
    ///
    /// Returns the line outcome.
    pub async fn start(&self) -> FetchOutcome {
        let outcome = self.load_line().await;
        if outcome == FetchOutcome::Applied {
            self.load_departures().await;
        }
        outcome
    }

    /// Manual refresh.
    ///
    /// Drops any cached responses, re-runs line and banner fetches with
    /// `refreshing` set so current data stays visible, then departures.
    pub async fn refresh(&self) -> FetchOutcome {
        self.source.invalidate();
        let outcome = self.fetch_line(LineLoad::Refresh).await;
        if outcome == FetchOutcome::Applied {
            self.load_departures().await;
        }
        outcome
    }

    /// Fetch line metadata and banners for the current inputs.
    pub async fn load_line(&self) -> FetchOutcome {
        self.fetch_line(LineLoad::Initial).await
    }

    async fn fetch_line(&self, kind: LineLoad) -> FetchOutcome {
        let ticket = {
            let mut inner = self.inner.write().await;
            inner.line_ticket += 1;
            match kind {
                LineLoad::Initial => inner.state.loading = true,
                LineLoad::Refresh => inner.state.refreshing = true,
            }
            Ticket {
                id: inner.line_ticket,
                query: inner.state.inputs.line_query(),
            }
        };

        debug!(
            line = %ticket.query.line_id,
            mode = %ticket.query.mode,
            lang = %ticket.query.language,
            refresh = kind == LineLoad::Refresh,
            "fetching line"
        );

        let context = ticket.query.banner_context();
        let (line, banners) = join(
            self.source.fetch_line(&ticket.query),
            self.source.fetch_banners(&context, ticket.query.language),
        )
        .await;

        let mut inner = self.inner.write().await;
        if !inner.is_current_line(&ticket) {
            debug!(line = %ticket.query.line_id, ticket = ticket.id, "discarding stale line response");
            return FetchOutcome::Stale;
        }

        let state = &mut inner.state;
        state.loading = false;
        state.refreshing = false;

        let line_id = ticket.query.line_id;
        match (line, banners) {
            (Ok(line), Ok(banners)) => {
                info!(line = %line_id, routes = line.routes.len(), banners = banners.len(), "line loaded");
                state.line = Some(line);
                state.banners = banners;
                state.error = None;
                FetchOutcome::Applied
            }
            (Err(e), _) => {
                warn!(line = %line_id, error = %e, "line fetch failed");
                state.error = Some(ScheduleError::Line {
                    line: line_id,
                    message: e.to_string(),
                });
                FetchOutcome::Failed
            }
            (Ok(line), Err(e)) => {
                warn!(line = %line_id, error = %e, "banner fetch failed");
                state.line = Some(line);
                state.error = Some(ScheduleError::Banners {
                    message: e.to_string(),
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Fetch departures for the current inputs.
    ///
    /// Skipped until the line has loaded. Failures are logged and recorded
    /// in `departures_error` but never clear departures already shown.
    pub async fn load_departures(&self) -> FetchOutcome {
        let ticket = {
            let mut inner = self.inner.write().await;
            if !inner.state.line_ready() {
                trace!("departures fetch gated on line");
                return FetchOutcome::Skipped;
            }
            inner.departures_ticket += 1;
            inner.state.departures_loading = true;
            Ticket {
                id: inner.departures_ticket,
                query: inner.state.inputs.departures_query(),
            }
        };

        debug!(
            line = %ticket.query.line_id,
            date = %ticket.query.date,
            direction = %ticket.query.direction,
            "fetching departures"
        );

        let result = self.source.fetch_departures(&ticket.query).await;

        let mut inner = self.inner.write().await;
        if !inner.is_current_departures(&ticket) {
            if inner.departures_ticket == ticket.id {
                // Inputs changed without a newer fetch being issued.
                inner.state.departures_loading = false;
            }
            debug!(
                date = %ticket.query.date,
                direction = %ticket.query.direction,
                ticket = ticket.id,
                "discarding stale departures response"
            );
            return FetchOutcome::Stale;
        }

        let state = &mut inner.state;
        state.departures_loading = false;

        match result {
            Ok(departures) => {
                debug!(count = departures.len(), "departures loaded");
                state.departures = Some(departures);
                state.departures_error = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(
                    line = %ticket.query.line_id,
                    date = %ticket.query.date,
                    error = %e,
                    "departures fetch failed"
                );
                state.departures_error = Some(ScheduleError::Departures {
                    date: ticket.query.date,
                    message: e.to_string(),
                });
                FetchOutcome::Failed
            }
        }
    }

    /// Select a date and refetch departures.
    pub async fn set_date(&self, date: NaiveDate) -> FetchOutcome {
        {
            let mut inner = self.inner.write().await;
            if inner.state.inputs.date == date {
                return FetchOutcome::Skipped;
            }
            inner.state.inputs.date = date;
            inner.state.clear_departures();
        }
        self.load_departures().await
    }

    /// Select a direction and refetch departures.
    ///
    /// A direction the current line does not have leaves everything as it
    /// was and returns the rejection.
    pub async fn set_direction(
        &self,
        direction: DirectionIndex,
    ) -> Result<FetchOutcome, UnknownDirection> {
        {
            let mut inner = self.inner.write().await;
            let mut selector = inner.state.direction_selector();
            selector.select(direction)?;
            if inner.state.inputs.direction == direction {
                return Ok(FetchOutcome::Skipped);
            }
            inner.state.inputs.direction = direction;
            inner.state.clear_departures();
        }
        Ok(self.load_departures().await)
    }

    /// Switch display language. Line content is localised, so everything
    /// is reloaded.
    pub async fn set_language(&self, language: Language) -> FetchOutcome {
        {
            let mut inner = self.inner.write().await;
            if inner.state.inputs.language == language {
                return FetchOutcome::Skipped;
            }
            inner.state.inputs.language = language;
            inner.state.clear_line();
        }
        self.start().await
    }

    /// Show a different line.
    ///
    /// Directions belong to a line, so the selection goes back to 0.
    pub async fn set_line(&self, mode: TransportMode, line_id: LineId) -> FetchOutcome {
        {
            let mut inner = self.inner.write().await;
            let inputs = &mut inner.state.inputs;
            if inputs.mode == mode && inputs.line_id == line_id {
                return FetchOutcome::Skipped;
            }
            inputs.mode = mode;
            inputs.line_id = line_id;
            inputs.direction = DirectionIndex::default();
            inner.state.clear_line();
        }
        self.start().await
    }
}
