//! Temporal cost model.
//!
//! A vehicle is assumed to travel straight from its release point to the
//! pickup point at a fixed nominal speed. The projected pickup time is derived
//! from the release time and the travel time; the cargo window is then compared
//! against that single instant.

use chrono::TimeDelta;
use serde::Serialize;

use crate::config::{AssignmentConfig, CostMode};
use crate::error::InvalidInput;
use crate::model::{Resource, Task, Timestamp};

const MICROS_PER_HOUR: f64 = 3_600_000_000.0;

/// Cost breakdown for one feasible (resource, task) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEntry {
    pub distance_km: f64,
    /// `None` under distance-only pricing.
    pub pickup_time: Option<Timestamp>,
    /// Always zero under distance-only pricing.
    pub waiting_hours: f64,
    pub distance_cost: f64,
    pub waiting_cost: f64,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemporalCostModel {
    standard_speed: f64,
    mode: CostMode,
}

impl Default for TemporalCostModel {
    fn default() -> Self {
        Self::from_config(&AssignmentConfig::default())
    }
}

impl TemporalCostModel {
    pub fn new(standard_speed: f64) -> Self {
        Self {
            standard_speed,
            mode: CostMode::TimeWindowed,
        }
    }

    pub fn from_config(config: &AssignmentConfig) -> Self {
        Self {
            standard_speed: config.standard_speed,
            mode: config.mode,
        }
    }

    pub fn standard_speed(&self) -> f64 {
        self.standard_speed
    }

    pub fn mode(&self) -> CostMode {
        self.mode
    }

    /// Travel time in hours at the nominal speed.
    pub fn travel_hours(&self, distance_km: f64) -> Result<f64, InvalidInput> {
        if !distance_km.is_finite() {
            return Err(InvalidInput::NonFiniteCost);
        }
        if distance_km < 0.0 {
            return Err(InvalidInput::NegativeDistance(distance_km));
        }
        Ok(distance_km / self.standard_speed)
    }

    /// Release time minus the travel time to the pickup point.
    pub fn projected_pickup_time(
        &self,
        released_at: Timestamp,
        distance_km: f64,
    ) -> Result<Timestamp, InvalidInput> {
        let micros = (self.travel_hours(distance_km)? * MICROS_PER_HOUR).round();
        if micros >= i64::MAX as f64 {
            return Err(InvalidInput::TimeOverflow);
        }
        released_at
            .checked_sub_signed(TimeDelta::microseconds(micros as i64))
            .ok_or(InvalidInput::TimeOverflow)
    }

    /// Hours between arrival and the opening of the window; zero when the
    /// vehicle arrives at or after `available_from`.
    pub fn waiting_hours(pickup_time: Timestamp, available_from: Timestamp) -> f64 {
        if pickup_time >= available_from {
            return 0.0;
        }
        let wait = available_from - pickup_time;
        match wait.num_microseconds() {
            Some(micros) => micros as f64 / MICROS_PER_HOUR,
            None => wait.num_seconds() as f64 / 3600.0,
        }
    }

    pub fn total_cost(
        distance_km: f64,
        waiting_hours: f64,
        price_per_km: f64,
        price_per_wait_hour: f64,
    ) -> Result<f64, InvalidInput> {
        check_non_negative("distance", distance_km)?;
        check_non_negative("waiting_hours", waiting_hours)?;
        check_non_negative("price_per_km", price_per_km)?;
        check_non_negative("price_per_wait_hour", price_per_wait_hour)?;

        let total = distance_km * price_per_km + waiting_hours * price_per_wait_hour;
        if !total.is_finite() {
            return Err(InvalidInput::NonFiniteCost);
        }
        Ok(total)
    }

    /// Price one pair at a known distance. Does not apply the feasibility gate.
    pub fn price(
        &self,
        resource: &Resource,
        task: &Task,
        distance_km: f64,
    ) -> Result<CostEntry, InvalidInput> {
        match self.mode {
            CostMode::TimeWindowed => {
                let released_at = known("released_at", resource.released_at)?;
                let available_from = known("available_from", task.available_from)?;
                let price_per_km = known("price_per_km", resource.price_per_km)?;
                let price_per_wait_hour =
                    known("price_per_wait_hour", resource.price_per_wait_hour)?;

                let pickup_time = self.projected_pickup_time(released_at, distance_km)?;
                let waiting_hours = Self::waiting_hours(pickup_time, available_from);
                let total_cost =
                    Self::total_cost(distance_km, waiting_hours, price_per_km, price_per_wait_hour)?;
                Ok(CostEntry {
                    distance_km,
                    pickup_time: Some(pickup_time),
                    waiting_hours,
                    distance_cost: distance_km * price_per_km,
                    waiting_cost: waiting_hours * price_per_wait_hour,
                    total_cost,
                })
            }
            CostMode::DistanceOnly => {
                self.travel_hours(distance_km)?;
                Ok(CostEntry {
                    distance_km,
                    pickup_time: None,
                    waiting_hours: 0.0,
                    distance_cost: distance_km,
                    waiting_cost: 0.0,
                    total_cost: distance_km,
                })
            }
        }
    }
}

fn known<T>(field: &'static str, value: Option<T>) -> Result<T, InvalidInput> {
    value.ok_or(InvalidInput::MissingField { field })
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), InvalidInput> {
    if !value.is_finite() {
        return Err(InvalidInput::NotNumeric {
            field,
            value: value.to_string(),
        });
    }
    if value < 0.0 {
        return Err(InvalidInput::OutOfRange { field, value });
    }
    Ok(())
}
