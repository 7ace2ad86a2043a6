//! Lines, their directional routes, and operator contacts.

use std::fmt;

use super::TransportMode;

/// Identifier of a line in the timetable API.
///
/// Distinct from the public line number printed on vehicles, which may be
/// missing or shared between modes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(String);

impl LineId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for LineId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Index of a directional route within a line.
///
/// Lines usually have directions 0 and 1; branching lines may have more.
///
/// ```
/// use timetable_core::domain::DirectionIndex;
///
/// let outbound = DirectionIndex::default();
/// assert_eq!(outbound, DirectionIndex(0));
/// assert!(DirectionIndex(1) > outbound);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DirectionIndex(pub u8);

impl fmt::Display for DirectionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for DirectionIndex {
    fn from(value: u8) -> Self {
        DirectionIndex(value)
    }
}

/// Display subtype of a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LineKind {
    Bus,
    Ferry,
    Catamaran,
    Other(String),
}

impl LineKind {
    /// Parse the feed's subtype string. Unknown values are kept verbatim.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "bus" => LineKind::Bus,
            "ferry" | "trajekt" => LineKind::Ferry,
            "catamaran" | "katamaran" => LineKind::Catamaran,
            _ => LineKind::Other(s.trim().to_string()),
        }
    }
}

/// A stop served by a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stop {
    pub name: String,
}

/// Operator contact details. Every field may be missing in the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contact {
    pub operator: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

impl Contact {
    /// Operator name with surrounding whitespace removed, if non-empty.
    pub fn operator_name(&self) -> Option<&str> {
        self.operator
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One directional variant of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub direction: DirectionIndex,
    /// Human-readable label, e.g. "Vis - Split".
    pub label: String,
    pub origin: String,
    pub destination: String,
    pub stops: Vec<Stop>,
    pub typical_duration_mins: Option<u32>,
}

/// A named transport service with one route per direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub id: LineId,
    /// Public line number, e.g. "602".
    pub number: Option<String>,
    pub kind: LineKind,
    pub mode: TransportMode,
    pub name: String,
    pub routes: Vec<Route>,
    pub contacts: Vec<Contact>,
}

impl Line {
    /// Find the route for a direction.
    pub fn route(&self, direction: DirectionIndex) -> Option<&Route> {
        self.routes.iter().find(|r| r.direction == direction)
    }
}

/// Advisory notice shown above a timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub url: Option<String>,
}
