//! Mock timetable source for development without API access.
//!
//! Loads fixture files from a directory and serves them as if they were live
//! API responses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::{Banner, Departure, Language, Line, LineId, TransportMode};
use crate::schedule::{DeparturesQuery, LineQuery, TimetableSource};

use super::convert::{convert_banners, convert_departures, convert_line};
use super::error::ApiError;
use super::types::{BannerDto, DepartureDto, LineDto};

/// Contents of one `{mode}-{lineId}.json` fixture.
#[derive(Debug, Deserialize)]
struct LineFixture {
    line: LineDto,
    #[serde(default)]
    banners: Vec<BannerDto>,
    /// Departures keyed by direction index.
    #[serde(default)]
    departures: HashMap<String, Vec<DepartureDto>>,
}

#[derive(Debug, Clone)]
struct LoadedLine {
    line: Arc<Line>,
    banners: Vec<Banner>,
    departures: HashMap<u8, Arc<Vec<Departure>>>,
}

/// Mock source that serves data from JSON files.
///
/// Date and language are ignored: fixtures are static.
#[derive(Clone)]
pub struct MockTimetableSource {
    lines: Arc<RwLock<HashMap<(TransportMode, LineId), LoadedLine>>>,
}

impl MockTimetableSource {
    /// Create a new mock source by loading JSON files from a directory.
    ///
    /// Expects files named `{mode}-{lineId}.json` (e.g., `sea-602.json`).
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, ApiError> {
        let lines = load_dir(data_dir.as_ref())?;
        Ok(Self {
            lines: Arc::new(RwLock::new(lines)),
        })
    }

    /// List the lines available in the fixtures.
    pub async fn available_lines(&self) -> Vec<(TransportMode, LineId)> {
        let lines = self.lines.read().await;
        let mut keys: Vec<_> = lines.keys().cloned().collect();
        keys.sort_by(|a, b| a.1.cmp(&b.1));
        keys
    }

    /// Reload fixtures from disk.
    pub async fn reload(&self, data_dir: impl AsRef<Path>) -> Result<(), ApiError> {
        let fresh = load_dir(data_dir.as_ref())?;
        *self.lines.write().await = fresh;
        Ok(())
    }

    async fn loaded(&self, mode: TransportMode, line_id: &LineId) -> Result<LoadedLine, ApiError> {
        let lines = self.lines.read().await;
        lines
            .get(&(mode, line_id.clone()))
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

fn fixture_error(message: String) -> ApiError {
    ApiError::Api { status: 0, message }
}

fn load_dir(data_dir: &Path) -> Result<HashMap<(TransportMode, LineId), LoadedLine>, ApiError> {
    let mut lines = HashMap::new();

    let entries = std::fs::read_dir(data_dir)
        .map_err(|e| fixture_error(format!("Failed to read mock data directory: {}", e)))?;

    for entry in entries {
        let entry =
            entry.map_err(|e| fixture_error(format!("Failed to read directory entry: {}", e)))?;

        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        // "sea-602.json" -> (Sea, "602")
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| fixture_error(format!("Invalid filename: {:?}", path)))?;
        let (mode_str, id) = stem
            .split_once('-')
            .ok_or_else(|| fixture_error(format!("Expected {{mode}}-{{line}}.json: {}", stem)))?;
        let mode = TransportMode::parse(mode_str)
            .ok_or_else(|| fixture_error(format!("Invalid mode in filename: {}", stem)))?;

        let json = std::fs::read_to_string(&path)
            .map_err(|e| fixture_error(format!("Failed to read {:?}: {}", path, e)))?;

        let fixture: LineFixture = serde_json::from_str(&json).map_err(|e| ApiError::Json {
            message: format!("{:?}: {}", path, e),
            body: None,
        })?;

        let mut departures = HashMap::new();
        for (direction, dtos) in &fixture.departures {
            let direction: u8 = direction
                .parse()
                .map_err(|_| fixture_error(format!("Invalid direction key {direction:?}")))?;
            departures.insert(direction, Arc::new(convert_departures(dtos)));
        }

        let loaded = LoadedLine {
            line: Arc::new(convert_line(&fixture.line)?),
            banners: convert_banners(&fixture.banners),
            departures,
        };

        lines.insert((mode, LineId::new(id)), loaded);
    }

    if lines.is_empty() {
        return Err(fixture_error(format!(
            "No mock line files found in {:?}",
            data_dir
        )));
    }

    Ok(lines)
}

impl TimetableSource for MockTimetableSource {
    async fn fetch_line(&self, query: &LineQuery) -> Result<Arc<Line>, ApiError> {
        Ok(self.loaded(query.mode, &query.line_id).await?.line)
    }

    async fn fetch_departures(&self, query: &DeparturesQuery) -> Result<Arc<Vec<Departure>>, ApiError> {
        let loaded = self.loaded(query.mode, &query.line_id).await?;
        Ok(loaded
            .departures
            .get(&query.direction.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_banners(&self, context: &str, _language: Language) -> Result<Vec<Banner>, ApiError> {
        // Context is "timetable-{mode}"; serve every fixture's banners for that mode.
        let lines = self.lines.read().await;
        let mut banners: Vec<Banner> = lines
            .iter()
            .filter(|((mode, _), _)| context.ends_with(mode.as_str()))
            .flat_map(|(_, loaded)| loaded.banners.iter().cloned())
            .collect();
        banners.sort_by(|a, b| a.id.cmp(&b.id));
        banners.dedup_by(|a, b| a.id == b.id);
        Ok(banners)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DirectionIndex;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    const FIXTURE: &str = r#"{
        "line": {
            "id": "vis-1",
            "lineNumber": "1",
            "subtype": "bus",
            "transportType": "road",
            "name": "Vis - Komiža",
            "routes": [
                { "direction": 0, "origin": "Vis", "destination": "Komiža", "stops": [] }
            ]
        },
        "banners": [{ "id": "b1", "title": "Summer timetable" }],
        "departures": {
            "0": [
                {
                    "id": "r1",
                    "departureTime": "07:00",
                    "destination": "Komiža",
                    "stopTimes": [
                        { "stopName": "Vis", "arrivalTime": "07:00" },
                        { "stopName": "Podšpilje", "arrivalTime": null },
                        { "stopName": "Komiža", "arrivalTime": "07:25" }
                    ]
                }
            ]
        }
    }"#;

    fn line_query() -> LineQuery {
        LineQuery {
            mode: TransportMode::Road,
            line_id: LineId::new("vis-1"),
            language: Language::Hr,
        }
    }

    fn departures_query(direction: u8) -> DeparturesQuery {
        DeparturesQuery {
            mode: TransportMode::Road,
            line_id: LineId::new("vis-1"),
            date: NaiveDate::from_ymd_opt(2025, 7, 14).unwrap(),
            direction: DirectionIndex(direction),
            language: Language::Hr,
        }
    }

    #[tokio::test]
    async fn load_fixture_directory() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("road-vis-1.json"), FIXTURE).unwrap();
        std::fs::write(dir.path().join("README.txt"), "ignored").unwrap();

        let source = MockTimetableSource::new(dir.path()).unwrap();
        let available = source.available_lines().await;
        assert_eq!(available, [(TransportMode::Road, LineId::new("vis-1"))]);

        let line = source.fetch_line(&line_query()).await.unwrap();
        assert_eq!(line.name, "Vis - Komiža");

        let deps = source.fetch_departures(&departures_query(0)).await.unwrap();
        assert_eq!(deps.len(), 1);
        assert!(deps[0].stop_times[1].arrival.is_none());

        // No fixture for direction 1 means no departures, not an error
        let deps = source.fetch_departures(&departures_query(1)).await.unwrap();
        assert!(deps.is_empty());

        let banners = source.fetch_banners("timetable-road", Language::En).await.unwrap();
        assert_eq!(banners.len(), 1);
        let banners = source.fetch_banners("timetable-sea", Language::En).await.unwrap();
        assert!(banners.is_empty());
    }

    #[tokio::test]
    async fn unknown_line_is_not_found() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("road-vis-1.json"), FIXTURE).unwrap();
        let source = MockTimetableSource::new(dir.path()).unwrap();

        let mut query = line_query();
        query.mode = TransportMode::Sea;
        assert!(matches!(
            source.fetch_line(&query).await,
            Err(ApiError::NotFound)
        ));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(MockTimetableSource::new(dir.path()).is_err());
    }

    #[test]
    fn bad_filename_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("vis.json"), FIXTURE).unwrap();
        assert!(MockTimetableSource::new(dir.path()).is_err());
    }

    #[tokio::test]
    async fn shipped_fixtures_load() {
        let source = MockTimetableSource::new("data/mock").unwrap();
        let lines = source.available_lines().await;
        assert!(lines.contains(&(TransportMode::Sea, LineId::new("602"))));
    }
}
