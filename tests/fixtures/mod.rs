#![allow(dead_code)]

//! Test fixtures for haul-match.
//!
//! Provides realistic test data including:
//! - Baltic / Polish city coordinates for depots and pickup points
//! - Builders for truck and cargo records with sensible defaults

pub mod baltic_locations;
pub mod builders;

pub use baltic_locations::*;
pub use builders::*;
