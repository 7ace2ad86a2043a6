//! The data-source seam between the orchestrator and the outside world.

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::ApiError;
use crate::domain::{Banner, Departure, DirectionIndex, Language, Line, LineId, TransportMode};

/// Inputs identifying one line-metadata request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineQuery {
    pub mode: TransportMode,
    pub line_id: LineId,
    pub language: Language,
}

impl LineQuery {
    /// Context key for the banners shown alongside this line's timetable.
    pub fn banner_context(&self) -> String {
        format!("timetable-{}", self.mode)
    }
}

/// Inputs identifying one departures request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeparturesQuery {
    pub mode: TransportMode,
    pub line_id: LineId,
    pub date: NaiveDate,
    pub direction: DirectionIndex,
    pub language: Language,
}

/// Provider of line metadata, departures and banners.
///
/// This abstraction allows the orchestrator to be tested with scripted data.
pub trait TimetableSource: Send + Sync {
    /// Fetch a line with its routes and contacts.
    fn fetch_line(
        &self,
        query: &LineQuery,
    ) -> impl Future<Output = Result<Arc<Line>, ApiError>> + Send;

    /// Fetch departures for exactly the queried date and direction.
    ///
    /// An empty list is a valid result.
    fn fetch_departures(
        &self,
        query: &DeparturesQuery,
    ) -> impl Future<Output = Result<Arc<Vec<Departure>>, ApiError>> + Send;

    /// Fetch advisory notices for a screen context.
    fn fetch_banners(
        &self,
        context: &str,
        language: Language,
    ) -> impl Future<Output = Result<Vec<Banner>, ApiError>> + Send;

    /// Drop anything cached so the next fetch reaches the backing service.
    fn invalidate(&self) {}
}

impl<S: TimetableSource> TimetableSource for Arc<S> {
    fn fetch_line(
        &self,
        query: &LineQuery,
    ) -> impl Future<Output = Result<Arc<Line>, ApiError>> + Send {
        (**self).fetch_line(query)
    }

    fn fetch_departures(
        &self,
        query: &DeparturesQuery,
    ) -> impl Future<Output = Result<Arc<Vec<Departure>>, ApiError>> + Send {
        (**self).fetch_departures(query)
    }

    fn fetch_banners(
        &self,
        context: &str,
        language: Language,
    ) -> impl Future<Output = Result<Vec<Banner>, ApiError>> + Send {
        (**self).fetch_banners(context, language)
    }

    fn invalidate(&self) {
        (**self).invalidate()
    }
}
