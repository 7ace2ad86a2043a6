//! Caching layer for timetable API responses.
//!
//! Line detail and departures change rarely within a day, so both are cached
//! by their full request tuple. Banners are advisory and time-sensitive and
//! always go to the backing source. A manual refresh invalidates everything.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::api::ApiError;
use crate::domain::{Banner, Departure, Language, Line};
use crate::schedule::{DeparturesQuery, LineQuery, TimetableSource};

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per kind.
    pub max_capacity: u64,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(5 * 60),
            max_capacity: 500,
        }
    }
}

/// A timetable source with caching.
///
/// Wraps any `TimetableSource` and caches line and departures responses.
/// Failed fetches are not cached.
pub struct CachedTimetableSource<S> {
    inner: S,
    lines: MokaCache<LineQuery, Arc<Line>>,
    departures: MokaCache<DeparturesQuery, Arc<Vec<Departure>>>,
}

impl<S: TimetableSource> CachedTimetableSource<S> {
    /// Create a new cached source.
    pub fn new(inner: S, config: &CacheConfig) -> Self {
        let lines = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let departures = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            inner,
            lines,
            departures,
        }
    }

    /// Access the wrapped source for operations that bypass the cache.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.lines.entry_count() + self.departures.entry_count()
    }
}

impl<S: TimetableSource> TimetableSource for CachedTimetableSource<S> {
    async fn fetch_line(&self, query: &LineQuery) -> Result<Arc<Line>, ApiError> {
        if let Some(cached) = self.lines.get(query).await {
            trace!(line = %query.line_id, "line cache hit");
            return Ok(cached);
        }

        let line = self.inner.fetch_line(query).await?;
        self.lines.insert(query.clone(), line.clone()).await;
        Ok(line)
    }

    async fn fetch_departures(&self, query: &DeparturesQuery) -> Result<Arc<Vec<Departure>>, ApiError> {
        if let Some(cached) = self.departures.get(query).await {
            trace!(line = %query.line_id, date = %query.date, "departures cache hit");
            return Ok(cached);
        }

        let departures = self.inner.fetch_departures(query).await?;
        self.departures
            .insert(query.clone(), departures.clone())
            .await;
        Ok(departures)
    }

    async fn fetch_banners(&self, context: &str, language: Language) -> Result<Vec<Banner>, ApiError> {
        self.inner.fetch_banners(context, language).await
    }

    fn invalidate(&self) {
        self.lines.invalidate_all();
        self.departures.invalidate_all();
        self.inner.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::NaiveDate;

    use crate::domain::{DirectionIndex, LineId, LineKind, TransportMode};

    #[derive(Default)]
    struct CountingSource {
        line_calls: AtomicUsize,
        departure_calls: AtomicUsize,
        banner_calls: AtomicUsize,
    }

    impl TimetableSource for CountingSource {
        async fn fetch_line(&self, query: &LineQuery) -> Result<Arc<Line>, ApiError> {
            self.line_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Line {
                id: query.line_id.clone(),
                number: None,
                kind: LineKind::Bus,
                mode: query.mode,
                name: "Test".to_string(),
                routes: Vec::new(),
                contacts: Vec::new(),
            }))
        }

        async fn fetch_departures(
            &self,
            query: &DeparturesQuery,
        ) -> Result<Arc<Vec<Departure>>, ApiError> {
            self.departure_calls.fetch_add(1, Ordering::SeqCst);
            if query.direction.0 > 1 {
                return Err(ApiError::NotFound);
            }
            Ok(Arc::new(Vec::new()))
        }

        async fn fetch_banners(&self, _context: &str, _language: Language) -> Result<Vec<Banner>, ApiError> {
            self.banner_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
    }

    fn line_query(language: Language) -> LineQuery {
        LineQuery {
            mode: TransportMode::Road,
            line_id: LineId::new("1"),
            language,
        }
    }

    fn departures_query(direction: u8) -> DeparturesQuery {
        DeparturesQuery {
            mode: TransportMode::Road,
            line_id: LineId::new("1"),
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            direction: DirectionIndex(direction),
            language: Language::Hr,
        }
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(300));
        assert_eq!(config.max_capacity, 500);
        let config = config.with_ttl(Duration::from_secs(1));
        assert_eq!(config.ttl, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn line_cached_per_language() {
        let cached = CachedTimetableSource::new(CountingSource::default(), &CacheConfig::default());

        cached.fetch_line(&line_query(Language::Hr)).await.unwrap();
        cached.fetch_line(&line_query(Language::Hr)).await.unwrap();
        assert_eq!(cached.inner().line_calls.load(Ordering::SeqCst), 1);

        cached.fetch_line(&line_query(Language::En)).await.unwrap();
        assert_eq!(cached.inner().line_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn departures_cached_per_direction_and_errors_not_cached() {
        let cached = CachedTimetableSource::new(CountingSource::default(), &CacheConfig::default());

        cached.fetch_departures(&departures_query(0)).await.unwrap();
        cached.fetch_departures(&departures_query(0)).await.unwrap();
        cached.fetch_departures(&departures_query(1)).await.unwrap();
        assert_eq!(cached.inner().departure_calls.load(Ordering::SeqCst), 2);

        assert!(cached.fetch_departures(&departures_query(5)).await.is_err());
        assert!(cached.fetch_departures(&departures_query(5)).await.is_err());
        assert_eq!(cached.inner().departure_calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn invalidate_forces_refetch() {
        let cached = CachedTimetableSource::new(CountingSource::default(), &CacheConfig::default());

        cached.fetch_line(&line_query(Language::Hr)).await.unwrap();
        cached.invalidate();
        cached.fetch_line(&line_query(Language::Hr)).await.unwrap();
        assert_eq!(cached.inner().line_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn banners_bypass_cache() {
        let cached = CachedTimetableSource::new(CountingSource::default(), &CacheConfig::default());
        cached.fetch_banners("timetable-road", Language::Hr).await.unwrap();
        cached.fetch_banners("timetable-road", Language::Hr).await.unwrap();
        assert_eq!(cached.inner().banner_calls.load(Ordering::SeqCst), 2);
    }
}
