//! Unit tests for the schedule orchestrator's fetch lifecycle.

use super::*;
use crate::api::{ApiError, MockTimetableSource};
use crate::carrier::{CarrierResolver, TicketPresentation};
use crate::domain::{
    Banner, ClockTime, Contact, Departure, DirectionIndex, HolidayCalendar, Language, Line,
    LineId, LineKind, Route, StopTime, TransportMode,
};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::oneshot;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 14).unwrap()
}

fn t(s: &str) -> ClockTime {
    ClockTime::parse(s).unwrap()
}

fn inputs() -> ScheduleInputs {
    ScheduleInputs::new(TransportMode::Sea, "602", date())
}

/// Point at which a scripted fetch can be held until released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Gate {
    Line(Language),
    Departures(u8),
}

/// Source with scripted responses and hold points.
#[derive(Default)]
struct ScriptedSource {
    gates: Mutex<HashMap<Gate, oneshot::Receiver<()>>>,
    fail_line: AtomicBool,
    fail_banners: AtomicBool,
    failing_dates: Mutex<HashSet<NaiveDate>>,
    no_service_dates: Mutex<HashSet<NaiveDate>>,
    line_calls: AtomicUsize,
    departure_calls: AtomicUsize,
    invalidations: AtomicUsize,
}

impl ScriptedSource {
    fn hold(&self, gate: Gate) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(gate, rx);
        tx
    }

    async fn wait(&self, gate: Gate) {
        let rx = self.gates.lock().unwrap().remove(&gate);
        if let Some(rx) = rx {
            let _ = rx.await;
        }
    }

    fn line_calls(&self) -> usize {
        self.line_calls.load(Ordering::SeqCst)
    }

    fn departure_calls(&self) -> usize {
        self.departure_calls.load(Ordering::SeqCst)
    }
}

fn route(direction: u8, label: &str) -> Route {
    Route {
        direction: DirectionIndex(direction),
        label: label.to_string(),
        origin: String::new(),
        destination: String::new(),
        stops: Vec::new(),
        typical_duration_mins: Some(140),
    }
}

impl TimetableSource for ScriptedSource {
    async fn fetch_line(&self, query: &LineQuery) -> Result<Arc<Line>, ApiError> {
        self.line_calls.fetch_add(1, Ordering::SeqCst);
        self.wait(Gate::Line(query.language)).await;

        if self.fail_line.load(Ordering::SeqCst) {
            return Err(ApiError::NotFound);
        }
        Ok(Arc::new(Line {
            id: query.line_id.clone(),
            number: Some(query.line_id.to_string()),
            kind: LineKind::Ferry,
            mode: query.mode,
            name: format!("Split - Vis [{}]", query.language),
            routes: vec![route(0, "Split - Vis"), route(1, "Vis - Split")],
            contacts: vec![Contact {
                operator: Some("Jadrolinija".to_string()),
                ..Contact::default()
            }],
        }))
    }

    async fn fetch_departures(
        &self,
        query: &DeparturesQuery,
    ) -> Result<Arc<Vec<Departure>>, ApiError> {
        self.departure_calls.fetch_add(1, Ordering::SeqCst);
        self.wait(Gate::Departures(query.direction.0)).await;

        if self.failing_dates.lock().unwrap().contains(&query.date) {
            return Err(ApiError::Api {
                status: 503,
                message: "unavailable".to_string(),
            });
        }
        if self.no_service_dates.lock().unwrap().contains(&query.date) {
            return Ok(Arc::new(Vec::new()));
        }
        Ok(Arc::new(vec![Departure {
            id: format!("dir{}-{}", query.direction, query.date),
            departure: t("15:00"),
            destination: "Vis".to_string(),
            duration_mins: Some(140),
            note: None,
            marker: None,
            stop_times: vec![
                StopTime::new("Split", Some(t("15:00"))),
                StopTime::new("Vis", Some(t("17:20"))),
            ],
        }]))
    }

    async fn fetch_banners(
        &self,
        _context: &str,
        _language: Language,
    ) -> Result<Vec<Banner>, ApiError> {
        if self.fail_banners.load(Ordering::SeqCst) {
            return Err(ApiError::RateLimited);
        }
        Ok(vec![Banner {
            id: "b1".to_string(),
            title: "Summer schedule".to_string(),
            body: None,
            url: None,
        }])
    }

    fn invalidate(&self) {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
    }
}

fn departure_ids(state: &ScheduleState) -> Vec<String> {
    state
        .departures
        .as_deref()
        .map(|d| d.iter().map(|d| d.id.clone()).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn start_loads_line_then_departures() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());

    assert_eq!(orch.start().await, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert!(state.line_ready());
    assert!(!state.loading);
    assert_eq!(state.banners.len(), 1);
    assert_eq!(departure_ids(&state), ["dir0-2025-07-14"]);
    assert!(!state.departures_loading);
}

#[tokio::test]
async fn departures_gated_until_line_loads() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());

    assert_eq!(orch.load_departures().await, FetchOutcome::Skipped);
    assert_eq!(orch.source().departure_calls(), 0);
    assert!(orch.snapshot().await.departures.is_none());
}

#[tokio::test]
async fn line_error_surfaces_and_skips_departures() {
    let source = ScriptedSource::default();
    source.fail_line.store(true, Ordering::SeqCst);
    let orch = ScheduleOrchestrator::new(source, inputs());

    assert_eq!(orch.start().await, FetchOutcome::Failed);

    let state = orch.snapshot().await;
    assert!(matches!(state.error, Some(ScheduleError::Line { .. })));
    assert!(!state.loading);
    assert!(state.line.is_none());
    assert!(state.departures.is_none());
    assert_eq!(orch.source().departure_calls(), 0);
}

#[tokio::test]
async fn banner_failure_is_user_visible() {
    let source = ScriptedSource::default();
    source.fail_banners.store(true, Ordering::SeqCst);
    let orch = ScheduleOrchestrator::new(source, inputs());

    assert_eq!(orch.start().await, FetchOutcome::Failed);

    let state = orch.snapshot().await;
    assert!(matches!(state.error, Some(ScheduleError::Banners { .. })));
    assert!(state.line.is_some());
    assert!(!state.line_ready());
    assert_eq!(orch.source().departure_calls(), 0);
}

#[tokio::test]
async fn direction_switch_discards_pending_fetch() {
    let source = ScriptedSource::default();
    let release = source.hold(Gate::Departures(0));
    let orch = ScheduleOrchestrator::new(source, inputs());
    assert_eq!(orch.load_line().await, FetchOutcome::Applied);

    let pending = orch.load_departures();
    let switch = async {
        while orch.source().departure_calls() == 0 {
            tokio::task::yield_now().await;
        }
        let outcome = orch.set_direction(DirectionIndex(1)).await;
        release.send(()).unwrap();
        outcome
    };

    let (stale, switched) = tokio::join!(pending, switch);
    assert_eq!(stale, FetchOutcome::Stale);
    assert_eq!(switched, Ok(FetchOutcome::Applied));

    let state = orch.snapshot().await;
    assert_eq!(state.inputs.direction, DirectionIndex(1));
    assert_eq!(departure_ids(&state), ["dir1-2025-07-14"]);
    assert!(!state.departures_loading);
}

#[tokio::test]
async fn date_switch_discards_pending_fetch() {
    let source = ScriptedSource::default();
    let orch = ScheduleOrchestrator::new(source, inputs());
    assert_eq!(orch.load_line().await, FetchOutcome::Applied);
    let release = orch.source().hold(Gate::Departures(0));

    let tomorrow = date().succ_opt().unwrap();
    let pending = orch.load_departures();
    let switch = async {
        while orch.source().departure_calls() == 0 {
            tokio::task::yield_now().await;
        }
        // The gate is consumed by the first fetch; the refetch is not held
        let outcome = orch.set_date(tomorrow).await;
        release.send(()).unwrap();
        outcome
    };

    let (stale, switched) = tokio::join!(pending, switch);
    assert_eq!(stale, FetchOutcome::Stale);
    assert_eq!(switched, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert_eq!(departure_ids(&state), ["dir0-2025-07-15"]);
}

#[tokio::test]
async fn language_switch_makes_pending_line_stale() {
    let source = ScriptedSource::default();
    let release = source.hold(Gate::Line(Language::Hr));
    let orch = ScheduleOrchestrator::new(source, inputs());

    let pending = orch.load_line();
    let switch = async {
        while orch.source().line_calls() == 0 {
            tokio::task::yield_now().await;
        }
        let outcome = orch.set_language(Language::En).await;
        release.send(()).unwrap();
        outcome
    };

    let (stale, switched) = tokio::join!(pending, switch);
    assert_eq!(stale, FetchOutcome::Stale);
    assert_eq!(switched, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert_eq!(state.inputs.language, Language::En);
    assert_eq!(
        state.line.as_ref().map(|l| l.name.as_str()),
        Some("Split - Vis [en]")
    );
    assert!(!state.loading);
    assert!(state.departures.is_some());
}

#[tokio::test]
async fn refresh_keeps_data_visible() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    let release = orch.source().hold(Gate::Line(Language::Hr));
    let refresh = orch.refresh();
    let observe = async {
        while orch.source().line_calls() < 2 {
            tokio::task::yield_now().await;
        }
        let during = orch.snapshot().await;
        release.send(()).unwrap();
        during
    };

    let (outcome, during) = tokio::join!(refresh, observe);
    assert_eq!(outcome, FetchOutcome::Applied);

    assert!(during.refreshing);
    assert!(!during.loading);
    assert!(during.line.is_some());
    assert!(during.departures.is_some());

    let after = orch.snapshot().await;
    assert!(!after.refreshing);
    assert_eq!(orch.source().invalidations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn departures_failure_on_refresh_is_silent() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    orch.source().failing_dates.lock().unwrap().insert(date());
    assert_eq!(orch.refresh().await, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert!(state.error.is_none());
    assert!(matches!(
        state.departures_error,
        Some(ScheduleError::Departures { .. })
    ));
    assert_eq!(departure_ids(&state), ["dir0-2025-07-14"]);
    assert!(!state.departures_loading);
}

#[tokio::test]
async fn empty_departures_mean_no_service() {
    let source = ScriptedSource::default();
    let sunday = NaiveDate::from_ymd_opt(2025, 7, 20).unwrap();
    source.no_service_dates.lock().unwrap().insert(sunday);
    let orch = ScheduleOrchestrator::new(source, inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    assert_eq!(orch.set_date(sunday).await, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert!(state.has_no_service());
    assert!(state.departures_error.is_none());
}

#[tokio::test]
async fn unknown_direction_is_rejected_without_fetch() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);
    let calls = orch.source().departure_calls();

    let err = orch.set_direction(DirectionIndex(7)).await.unwrap_err();
    assert_eq!(err.requested, DirectionIndex(7));
    assert_eq!(err.current, DirectionIndex(0));

    let state = orch.snapshot().await;
    assert_eq!(state.inputs.direction, DirectionIndex(0));
    assert_eq!(departure_ids(&state), ["dir0-2025-07-14"]);
    assert_eq!(orch.source().departure_calls(), calls);
}

#[tokio::test]
async fn unchanged_inputs_are_skipped() {
    let orch = ScheduleOrchestrator::new(ScriptedSource::default(), inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    assert_eq!(orch.set_date(date()).await, FetchOutcome::Skipped);
    assert_eq!(
        orch.set_direction(DirectionIndex(0)).await,
        Ok(FetchOutcome::Skipped)
    );
    assert_eq!(orch.set_language(Language::Hr).await, FetchOutcome::Skipped);
    assert_eq!(orch.source().line_calls(), 1);
    assert_eq!(orch.source().departure_calls(), 1);
}

#[tokio::test]
async fn set_line_resets_direction_and_reloads() {
    let orch = ScheduleOrchestrator::new(
        ScriptedSource::default(),
        inputs().with_direction(DirectionIndex(1)),
    );
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    let outcome = orch
        .set_line(TransportMode::Road, LineId::new("vis-1"))
        .await;
    assert_eq!(outcome, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    assert_eq!(state.inputs.direction, DirectionIndex(0));
    assert_eq!(state.inputs.mode, TransportMode::Road);
    assert_eq!(
        state.line.as_ref().map(|l| l.id.clone()),
        Some(LineId::new("vis-1"))
    );
    assert_eq!(departure_ids(&state), ["dir0-2025-07-14"]);
}

#[tokio::test]
async fn fixture_line_renders_timetable() {
    let source = MockTimetableSource::new("data/mock").unwrap();
    let orch = ScheduleOrchestrator::new(source, inputs());
    assert_eq!(orch.start().await, FetchOutcome::Applied);

    let state = orch.snapshot().await;
    let view = ScheduleView::build(
        &state,
        &HolidayCalendar::new(),
        &CarrierResolver::new(),
        Some(t("16:00")),
    );

    assert_eq!(view.status, DeparturesStatus::Available);
    assert_eq!(view.departures.len(), 2);
    assert!(view.show_direction_toggle);
    assert!(matches!(view.tickets, TicketPresentation::Online { .. }));
    assert_eq!(view.banners.len(), 1);

    let night = &view.departures[1];
    assert!(night.is_next);
    assert_eq!(night.timeline.len(), 2);
    assert!(night.timeline.iter().all(|e| e.stop_name != "Milna"));
    assert!(night.timeline[1].crosses_midnight);
    assert_eq!(view.footnotes.len(), 1);

    assert_eq!(
        orch.set_direction(DirectionIndex(1)).await,
        Ok(FetchOutcome::Applied)
    );
    let state = orch.snapshot().await;
    assert_eq!(departure_ids(&state), ["602-1-0530"]);
}
