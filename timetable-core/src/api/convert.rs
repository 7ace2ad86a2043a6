//! Conversion from timetable API DTOs to domain types.
//!
//! Departures are converted independently: a trip with a malformed time is
//! logged and skipped rather than failing the whole response.

use tracing::warn;

use crate::domain::{
    Banner, ClockTime, Contact, Departure, DirectionIndex, Line, LineId, LineKind, Route, Stop,
    StopTime, TransportMode,
};

use super::types::{BannerDto, ContactDto, DepartureDto, LineDto, RouteDto};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(String),

    /// Transport type was neither road nor sea
    #[error("unknown transport type: {0}")]
    UnknownTransportType(String),

    /// Two routes share a direction index
    #[error("duplicate direction {0}")]
    DuplicateDirection(u8),
}

/// Convert a line detail response.
pub fn convert_line(dto: &LineDto) -> Result<Line, ConversionError> {
    let mode = TransportMode::parse(&dto.transport_type)
        .ok_or_else(|| ConversionError::UnknownTransportType(dto.transport_type.clone()))?;

    let mut routes: Vec<Route> = Vec::with_capacity(dto.routes.len());
    for route in &dto.routes {
        if routes.iter().any(|r| r.direction.0 == route.direction) {
            return Err(ConversionError::DuplicateDirection(route.direction));
        }
        routes.push(convert_route(route));
    }

    let kind = dto
        .subtype
        .as_deref()
        .map(LineKind::parse)
        .unwrap_or(match mode {
            TransportMode::Road => LineKind::Bus,
            TransportMode::Sea => LineKind::Ferry,
        });

    Ok(Line {
        id: LineId::new(dto.id.clone()),
        number: dto
            .line_number
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string),
        kind,
        mode,
        name: dto.name.clone(),
        routes,
        contacts: dto.contacts.iter().map(convert_contact).collect(),
    })
}

fn convert_route(dto: &RouteDto) -> Route {
    let label = dto
        .label
        .clone()
        .unwrap_or_else(|| format!("{} - {}", dto.origin, dto.destination));

    Route {
        direction: DirectionIndex(dto.direction),
        label,
        origin: dto.origin.clone(),
        destination: dto.destination.clone(),
        stops: dto
            .stops
            .iter()
            .map(|s| Stop {
                name: s.name.clone(),
            })
            .collect(),
        typical_duration_mins: dto.typical_duration_minutes,
    }
}

fn convert_contact(dto: &ContactDto) -> Contact {
    Contact {
        operator: non_empty(&dto.operator),
        phone: non_empty(&dto.phone),
        email: non_empty(&dto.email),
        website: non_empty(&dto.website),
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Convert a list of departures, skipping malformed trips.
pub fn convert_departures(dtos: &[DepartureDto]) -> Vec<Departure> {
    let mut results = Vec::with_capacity(dtos.len());

    for dto in dtos {
        match convert_departure(dto) {
            Ok(departure) => results.push(departure),
            Err(e) => {
                warn!(departure = %dto.id, error = %e, "skipping departure");
            }
        }
    }

    results
}

/// Convert a single departure.
pub fn convert_departure(dto: &DepartureDto) -> Result<Departure, ConversionError> {
    let departure = parse_time(&dto.departure_time)?;

    let stop_times = dto
        .stop_times
        .iter()
        .map(|st| {
            let arrival = st.arrival_time.as_deref().map(parse_time).transpose()?;
            Ok(StopTime::new(st.stop_name.clone(), arrival))
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;

    Ok(Departure {
        id: dto.id.clone(),
        departure,
        destination: dto.destination.clone(),
        duration_mins: dto.duration_minutes,
        note: non_empty(&dto.note),
        marker: parse_marker(dto.marker.as_deref()),
        stop_times,
    })
}

fn parse_time(s: &str) -> Result<ClockTime, ConversionError> {
    ClockTime::parse(s.trim()).map_err(|_| ConversionError::InvalidTime(s.to_string()))
}

/// A marker is kept only when it is a single visible character.
fn parse_marker(marker: Option<&str>) -> Option<char> {
    let mut chars = marker?.trim().chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

pub fn convert_banners(dtos: &[BannerDto]) -> Vec<Banner> {
    dtos.iter()
        .map(|b| Banner {
            id: b.id.clone(),
            title: b.title.clone(),
            body: non_empty(&b.body),
            url: non_empty(&b.url),
        })
        .collect()
}
