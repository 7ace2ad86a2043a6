use std::error::Error;

use chrono::{Local, NaiveDate};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use timetable_core::api::{ApiConfig, MockTimetableSource, TimetableClient};
use timetable_core::cache::{CacheConfig, CachedTimetableSource};
use timetable_core::carrier::{CarrierResolver, TicketPresentation};
use timetable_core::domain::{ClockTime, HolidayCalendar, Language, TransportMode};
use timetable_core::schedule::{
    DeparturesStatus, ScheduleInputs, ScheduleOrchestrator, ScheduleView, TimetableSource,
};

const DEFAULT_LINE: &str = "602";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let today = Local::now().date_naive();

    let mode = match std::env::var("TIMETABLE_MODE") {
        Ok(s) => TransportMode::parse(&s).ok_or(format!("Invalid TIMETABLE_MODE: {s}"))?,
        Err(_) => TransportMode::Sea,
    };
    let line = std::env::var("TIMETABLE_LINE").unwrap_or_else(|_| DEFAULT_LINE.to_string());
    let date = match std::env::var("TIMETABLE_DATE") {
        Ok(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")?,
        Err(_) => today,
    };
    let language = match std::env::var("TIMETABLE_LANG") {
        Ok(s) => Language::parse(&s).ok_or(format!("Invalid TIMETABLE_LANG: {s}"))?,
        Err(_) => Language::default(),
    };

    let inputs = ScheduleInputs::new(mode, line, date).with_language(language);
    let now = (date == today).then(|| ClockTime::from(Local::now().time()));

    // Fixture data takes precedence over the live API
    if let Ok(dir) = std::env::var("TIMETABLE_DATA_DIR") {
        info!(dir = %dir, "using mock timetable data");
        let source = MockTimetableSource::new(&dir)?;
        preview(source, inputs, now).await;
        return Ok(());
    }

    let mut config = match std::env::var("TIMETABLE_API_URL") {
        Ok(url) => ApiConfig::new(url),
        Err(_) => ApiConfig::default(),
    };
    match std::env::var("TIMETABLE_API_KEY") {
        Ok(key) => config = config.with_api_key(key),
        Err(_) => warn!("TIMETABLE_API_KEY not set, requests are unauthenticated"),
    }

    let client = TimetableClient::new(config)?;
    let source = CachedTimetableSource::new(client, &CacheConfig::default());
    preview(source, inputs, now).await;
    Ok(())
}

/// Load one timetable and print it.
async fn preview<S: TimetableSource>(source: S, inputs: ScheduleInputs, now: Option<ClockTime>) {
    let orchestrator = ScheduleOrchestrator::new(source, inputs);
    orchestrator.start().await;

    let state = orchestrator.snapshot().await;
    let view = ScheduleView::build(
        &state,
        &HolidayCalendar::new(),
        &CarrierResolver::new(),
        now,
    );

    if let Some(error) = &view.error {
        println!("Error: {error}");
        return;
    }

    println!(
        "{} | {} {} ({})",
        view.title.as_deref().unwrap_or("?"),
        state.inputs.date,
        view.day_label,
        view.day_type
    );
    if let Some(route) = &view.current_route {
        println!("Direction: {}", route.label);
    }
    if view.show_direction_toggle {
        let labels: Vec<&str> = view.directions.iter().map(|d| d.label.as_str()).collect();
        println!("Directions: {}", labels.join(" / "));
    }

    for banner in &view.banners {
        println!("! {}", banner.title);
    }
    println!();

    match view.status {
        DeparturesStatus::NotLoaded | DeparturesStatus::Loading => {
            println!("Departures unavailable.");
        }
        DeparturesStatus::NoService => println!("No departures on this date."),
        DeparturesStatus::Available => {
            for departure in &view.departures {
                let next = if departure.is_next { ">" } else { " " };
                let marker = departure.marker.map(String::from).unwrap_or_default();
                println!(
                    "{next} {}{marker:<1} {} {}",
                    departure.time,
                    departure.destination,
                    departure.duration.as_deref().unwrap_or("")
                );
                for entry in &departure.timeline {
                    let overnight = if entry.crosses_midnight { " (+1)" } else { "" };
                    println!("      {} {}{overnight}", entry.display_time(), entry.stop_name);
                }
            }
            for footnote in &view.footnotes {
                let marker = footnote.marker.map(String::from).unwrap_or_default();
                println!("{marker} {}", footnote.note);
            }
        }
    }
    println!();

    match &view.tickets {
        TicketPresentation::Online { carrier, url } => {
            println!("Tickets: {} {url}", carrier.as_deref().unwrap_or(""));
        }
        TicketPresentation::BoardingOnly { carrier } => {
            println!("Tickets: {carrier}, purchase on board");
        }
        TicketPresentation::Unknown => println!("Tickets: contact the operator"),
    }
}
