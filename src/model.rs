//! Resource and task records, and their validation at ingestion.
//!
//! Records arrive as raw text (from an upload, a form, a JSON body). Each one
//! is parsed exactly once into a typed [`Resource`] or [`Task`]; a record that
//! fails is kept as an [`InvalidInput`] so the matrix builder can mark its row
//! or column infeasible without dropping the rest of the request.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::CostMode;
use crate::error::InvalidInput;

/// Instants are naive wall-clock times; all records share one implied zone.
pub type Timestamp = NaiveDateTime;

/// Boundary format for every timestamp field.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of ingesting one record.
pub type Checked<T> = Result<T, InvalidInput>;

/// A vehicle that becomes free at a known place and time.
///
/// Release time and prices are `None` when the record was ingested for
/// distance-only pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    pub id: String,
    /// Release location (lat, lng).
    pub location: (f64, f64),
    pub released_at: Option<Timestamp>,
    /// EUR per kilometre driven to the pickup.
    pub price_per_km: Option<f64>,
    /// EUR per hour spent waiting for the cargo window to open.
    pub price_per_wait_hour: Option<f64>,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        location: (f64, f64),
        released_at: Timestamp,
        price_per_km: f64,
        price_per_wait_hour: f64,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            released_at: Some(released_at),
            price_per_km: Some(price_per_km),
            price_per_wait_hour: Some(price_per_wait_hour),
        }
    }

    /// A resource known only by its position.
    pub fn located(id: impl Into<String>, location: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            location,
            released_at: None,
            price_per_km: None,
            price_per_wait_hour: None,
        }
    }

    /// Validate `record` for `mode`. Distance-only pricing reads the id and
    /// coordinates and ignores every other column.
    pub fn from_record(record: &ResourceRecord, mode: CostMode) -> Checked<Self> {
        match mode {
            CostMode::TimeWindowed => Self::try_from(record),
            CostMode::DistanceOnly => Ok(Self::located(
                require("id", &record.id)?,
                parse_location(&record.latitude, &record.longitude)?,
            )),
        }
    }
}

/// Cargo waiting for pickup within an inclusive time window. The window is
/// `None` when the record was ingested for distance-only pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Task {
    pub id: String,
    /// Pickup location (lat, lng).
    pub location: (f64, f64),
    pub available_from: Option<Timestamp>,
    pub available_to: Option<Timestamp>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        location: (f64, f64),
        available_from: Timestamp,
        available_to: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            location,
            available_from: Some(available_from),
            available_to: Some(available_to),
        }
    }

    /// A task with no availability window.
    pub fn located(id: impl Into<String>, location: (f64, f64)) -> Self {
        Self {
            id: id.into(),
            location,
            available_from: None,
            available_to: None,
        }
    }

    pub fn from_record(record: &TaskRecord, mode: CostMode) -> Checked<Self> {
        match mode {
            CostMode::TimeWindowed => Self::try_from(record),
            CostMode::DistanceOnly => Ok(Self::located(
                require("id", &record.id)?,
                parse_location(&record.latitude, &record.longitude)?,
            )),
        }
    }

    /// False when the window closes before it opens. Such a task can still be
    /// ingested, but no resource can ever serve it.
    pub fn has_valid_window(&self) -> bool {
        match (self.available_from, self.available_to) {
            (Some(from), Some(to)) => from <= to,
            _ => true,
        }
    }
}

/// Raw resource row. Field names follow the truck upload format; the
/// snake_case aliases accept JSON bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceRecord {
    #[serde(rename = "Address", alias = "id")]
    pub id: String,
    #[serde(rename = "Latitude (dropoff)", alias = "latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude (dropoff)", alias = "longitude")]
    pub longitude: String,
    #[serde(rename = "Timestamp (dropoff)", alias = "released_at")]
    pub released_at: String,
    #[serde(rename = "price per km, Eur", alias = "price_per_km")]
    pub price_per_km: String,
    #[serde(rename = "waiting time price per h, EUR", alias = "price_per_wait_hour")]
    pub price_per_wait_hour: String,
}

impl ResourceRecord {
    pub fn new(
        id: &str,
        (latitude, longitude): (f64, f64),
        released_at: &str,
        price_per_km: f64,
        price_per_wait_hour: f64,
    ) -> Self {
        Self {
            id: id.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            released_at: released_at.to_string(),
            price_per_km: price_per_km.to_string(),
            price_per_wait_hour: price_per_wait_hour.to_string(),
        }
    }
}

/// Raw task row, following the cargo upload format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    #[serde(rename = "Address", alias = "id")]
    pub id: String,
    #[serde(rename = "Delivery_Latitude", alias = "latitude")]
    pub latitude: String,
    #[serde(rename = "Delivery_Longitude", alias = "longitude")]
    pub longitude: String,
    #[serde(rename = "Available_From", alias = "available_from")]
    pub available_from: String,
    #[serde(rename = "Available_To", alias = "available_to")]
    pub available_to: String,
}

impl TaskRecord {
    pub fn new(
        id: &str,
        (latitude, longitude): (f64, f64),
        available_from: &str,
        available_to: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
            available_from: available_from.to_string(),
            available_to: available_to.to_string(),
        }
    }
}

impl TryFrom<&ResourceRecord> for Resource {
    type Error = InvalidInput;

    fn try_from(record: &ResourceRecord) -> Result<Self, Self::Error> {
        Ok(Resource::new(
            require("id", &record.id)?,
            parse_location(&record.latitude, &record.longitude)?,
            parse_timestamp("released_at", &record.released_at)?,
            parse_price("price_per_km", &record.price_per_km)?,
            parse_price("price_per_wait_hour", &record.price_per_wait_hour)?,
        ))
    }
}

impl TryFrom<&TaskRecord> for Task {
    type Error = InvalidInput;

    fn try_from(record: &TaskRecord) -> Result<Self, Self::Error> {
        Ok(Task::new(
            require("id", &record.id)?,
            parse_location(&record.latitude, &record.longitude)?,
            parse_timestamp("available_from", &record.available_from)?,
            parse_timestamp("available_to", &record.available_to)?,
        ))
    }
}

pub fn ingest_resources(records: &[ResourceRecord], mode: CostMode) -> Vec<Checked<Resource>> {
    records
        .iter()
        .map(|record| Resource::from_record(record, mode))
        .collect()
}

pub fn ingest_tasks(records: &[TaskRecord], mode: CostMode) -> Vec<Checked<Task>> {
    records
        .iter()
        .map(|record| Task::from_record(record, mode))
        .collect()
}

/// Parse a boundary timestamp (`YYYY-MM-DD HH:MM:SS`).
pub fn parse_timestamp(field: &'static str, raw: &str) -> Result<Timestamp, InvalidInput> {
    let raw = require(field, raw)?;
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| InvalidInput::Timestamp {
        field,
        value: raw.to_string(),
    })
}

fn require<'a>(field: &'static str, raw: &'a str) -> Result<&'a str, InvalidInput> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidInput::MissingField { field });
    }
    Ok(trimmed)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, InvalidInput> {
    let raw = require(field, raw)?;
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(InvalidInput::NotNumeric {
            field,
            value: raw.to_string(),
        }),
    }
}

fn parse_location(latitude: &str, longitude: &str) -> Result<(f64, f64), InvalidInput> {
    let lat = parse_number("latitude", latitude)?;
    if !(-90.0..=90.0).contains(&lat) {
        return Err(InvalidInput::OutOfRange { field: "latitude", value: lat });
    }
    let lng = parse_number("longitude", longitude)?;
    if !(-180.0..=180.0).contains(&lng) {
        return Err(InvalidInput::OutOfRange { field: "longitude", value: lng });
    }
    Ok((lat, lng))
}

fn parse_price(field: &'static str, raw: &str) -> Result<f64, InvalidInput> {
    let value = parse_number(field, raw)?;
    if value < 0.0 {
        return Err(InvalidInput::OutOfRange { field, value });
    }
    Ok(value)
}
