//! Record builders with sensible defaults.

use chrono::{NaiveDateTime, TimeDelta};

use haul_match::model::{Checked, TIMESTAMP_FORMAT};
use haul_match::{Resource, ResourceRecord, Task, TaskRecord};

/// Reference release time used across tests.
pub const T0: &str = "2024-03-01 08:00:00";

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).expect("fixture timestamp")
}

/// `base` shifted by a (possibly negative, possibly fractional) number of hours.
pub fn hours_after(base: &str, hours: f64) -> String {
    let shifted = ts(base) + TimeDelta::seconds((hours * 3600.0).round() as i64);
    shifted.format(TIMESTAMP_FORMAT).to_string()
}

/// Builder for test trucks.
#[derive(Clone, Debug)]
pub struct TestTruck {
    id: String,
    location: (f64, f64),
    released_at: String,
    price_per_km: f64,
    price_per_wait_hour: f64,
}

impl TestTruck {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            location: (0.0, 0.0),
            released_at: T0.to_string(),
            price_per_km: 1.0,
            price_per_wait_hour: 10.0,
        }
    }

    pub fn at(mut self, location: (f64, f64)) -> Self {
        self.location = location;
        self
    }

    pub fn released(mut self, released_at: &str) -> Self {
        self.released_at = released_at.to_string();
        self
    }

    pub fn price_per_km(mut self, price: f64) -> Self {
        self.price_per_km = price;
        self
    }

    pub fn price_per_wait_hour(mut self, price: f64) -> Self {
        self.price_per_wait_hour = price;
        self
    }

    pub fn record(&self) -> ResourceRecord {
        ResourceRecord::new(
            &self.id,
            self.location,
            &self.released_at,
            self.price_per_km,
            self.price_per_wait_hour,
        )
    }

    pub fn resource(&self) -> Checked<Resource> {
        Resource::try_from(&self.record())
    }
}

/// Builder for test cargo. Defaults to a window of `[T0, T0 + 24h]`.
#[derive(Clone, Debug)]
pub struct TestCargo {
    id: String,
    location: (f64, f64),
    available_from: String,
    available_to: String,
}

impl TestCargo {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            location: (0.0, 0.0),
            available_from: T0.to_string(),
            available_to: hours_after(T0, 24.0),
        }
    }

    pub fn at(mut self, location: (f64, f64)) -> Self {
        self.location = location;
        self
    }

    pub fn window(mut self, from: &str, to: &str) -> Self {
        self.available_from = from.to_string();
        self.available_to = to.to_string();
        self
    }

    pub fn record(&self) -> TaskRecord {
        TaskRecord::new(&self.id, self.location, &self.available_from, &self.available_to)
    }

    pub fn task(&self) -> Checked<Task> {
        Task::try_from(&self.record())
    }
}

pub fn truck_records(trucks: &[TestTruck]) -> Vec<ResourceRecord> {
    trucks.iter().map(TestTruck::record).collect()
}

pub fn cargo_records(cargo: &[TestCargo]) -> Vec<TaskRecord> {
    cargo.iter().map(TestCargo::record).collect()
}
