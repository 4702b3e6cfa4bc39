//! Core domain traits for the assignment engine.
//!
//! These are intentionally minimal. The engine only needs a way to measure
//! how far a vehicle has to travel to reach a pickup point.

/// Provides the travel distance between two coordinates.
///
/// Coordinates are `(lat, lng)` in degrees. The result is in kilometres and
/// must be non-negative for valid input; a provider that returns a negative
/// or non-finite value makes that single pair infeasible.
pub trait DistanceProvider: Sync {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64;
}

impl<T: DistanceProvider + ?Sized> DistanceProvider for &T {
    fn distance_km(&self, from: (f64, f64), to: (f64, f64)) -> f64 {
        (**self).distance_km(from, to)
    }
}
