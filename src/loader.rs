//! CSV upload reader for truck and cargo files.
//!
//! Only checks that the required columns exist. Values stay raw text; they are
//! validated per record at ingestion so one bad cell cannot reject a file.

use std::fmt;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::model::{ResourceRecord, TaskRecord};

/// Required truck columns as (upload header, accepted alias).
const RESOURCE_COLUMNS: &[(&str, &str)] = &[
    ("Address", "id"),
    ("Latitude (dropoff)", "latitude"),
    ("Longitude (dropoff)", "longitude"),
    ("Timestamp (dropoff)", "released_at"),
    ("price per km, Eur", "price_per_km"),
    ("waiting time price per h, EUR", "price_per_wait_hour"),
];

const TASK_COLUMNS: &[(&str, &str)] = &[
    ("Address", "id"),
    ("Delivery_Latitude", "latitude"),
    ("Delivery_Longitude", "longitude"),
    ("Available_From", "available_from"),
    ("Available_To", "available_to"),
];

#[derive(Debug)]
pub enum LoadError {
    Csv(csv::Error),
    MissingColumns(Vec<String>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Csv(err) => write!(f, "failed to read CSV: {}", err),
            LoadError::MissingColumns(columns) => {
                write!(f, "file must contain columns: {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Csv(err) => Some(err),
            LoadError::MissingColumns(_) => None,
        }
    }
}

impl From<csv::Error> for LoadError {
    fn from(err: csv::Error) -> Self {
        LoadError::Csv(err)
    }
}

pub fn read_resources<R: io::Read>(reader: R) -> Result<Vec<ResourceRecord>, LoadError> {
    read_records(reader, RESOURCE_COLUMNS)
}

pub fn read_tasks<R: io::Read>(reader: R) -> Result<Vec<TaskRecord>, LoadError> {
    read_records(reader, TASK_COLUMNS)
}

pub fn load_resources(path: impl AsRef<Path>) -> Result<Vec<ResourceRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_resources(file)
}

pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<TaskRecord>, LoadError> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_tasks(file)
}

fn read_records<R, T>(reader: R, required: &[(&str, &str)]) -> Result<Vec<T>, LoadError>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = required
        .iter()
        .filter(|(name, alias)| !headers.iter().any(|h| h == *name || h == *alias))
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns(missing));
    }

    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
