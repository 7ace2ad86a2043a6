//! Timetable API response DTOs.
//!
//! These types map directly to the JSON the timetable API returns. Fields the
//! API may omit are `Option`, and conversion to domain types decides what a
//! missing value means.

use serde::{Deserialize, Serialize};

/// Line detail response.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineDto {
    pub id: String,

    /// Public line number printed on vehicles and tickets.
    pub line_number: Option<String>,

    /// Display subtype: "bus", "ferry", "catamaran", ...
    pub subtype: Option<String>,

    /// "road" or "sea".
    pub transport_type: String,

    pub name: String,

    #[serde(default)]
    pub routes: Vec<RouteDto>,

    #[serde(default)]
    pub contacts: Vec<ContactDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    pub direction: u8,
    pub label: Option<String>,
    pub origin: String,
    pub destination: String,
    #[serde(default)]
    pub stops: Vec<StopDto>,
    pub typical_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StopDto {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContactDto {
    pub operator: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
}

/// Departures response for one date and direction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeparturesResponse {
    /// Date the departures apply to, "YYYY-MM-DD".
    pub date: Option<String>,
    pub direction: Option<u8>,
    #[serde(default)]
    pub departures: Vec<DepartureDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartureDto {
    pub id: String,

    /// "HH:MM" or "HH:MM:SS".
    pub departure_time: String,

    pub destination: String,

    pub duration_minutes: Option<u32>,

    pub note: Option<String>,

    /// Footnote symbol, a single character when present.
    pub marker: Option<String>,

    #[serde(default)]
    pub stop_times: Vec<StopTimeDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopTimeDto {
    pub stop_name: String,

    /// `null` when the vehicle does not serve this stop on the trip.
    pub arrival_time: Option<String>,
}

/// Contextual banners response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BannersResponse {
    #[serde(default)]
    pub banners: Vec<BannerDto>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BannerDto {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub url: Option<String>,
}
