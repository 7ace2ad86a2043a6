//! Timetable content API.
//!
//! This module provides the HTTP client behind the three fetch collaborators
//! the orchestrator consumes (line detail, departures, banners), the DTOs it
//! deserialises, their conversion to domain types, and a fixture-backed mock.
//!
//! Key characteristics of the API:
//! - Line detail is localised, so it is keyed by language as well as id
//! - Departures are requested for exactly one date and one direction
//! - Times are local "HH:MM" or "HH:MM:SS" strings; a `null` stop arrival
//!   means the trip does not serve that stop

mod client;
mod convert;
mod error;
mod mock;
mod types;

pub use client::{ApiConfig, TimetableClient};
pub use convert::{ConversionError, convert_banners, convert_departure, convert_departures, convert_line};
pub use error::ApiError;
pub use mock::MockTimetableSource;
pub use types::{
    BannerDto, BannersResponse, ContactDto, DepartureDto, DeparturesResponse, LineDto, RouteDto,
    StopDto, StopTimeDto,
};
