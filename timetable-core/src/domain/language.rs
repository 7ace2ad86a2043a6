//! Display language and transport mode.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Language the content API localises line names and notices into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Hr,
    En,
}

impl Language {
    /// ISO 639-1 code used in API query strings.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Hr => "hr",
            Language::En => "en",
        }
    }

    /// Parse an ISO code, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hr" => Some(Language::Hr),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether a line runs on the road network or by sea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Road,
    Sea,
}

impl TransportMode {
    /// Path segment used by the timetable API.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Road => "road",
            TransportMode::Sea => "sea",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "road" => Some(TransportMode::Road),
            "sea" => Some(TransportMode::Sea),
            _ => None,
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
