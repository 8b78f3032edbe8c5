//! Stats module - aggregation and derived metrics

pub mod geo;
pub mod metrics;
pub mod ranking;

pub use geo::{haversine_km, AirportIndex, GeoPoint, RouteDistance};
pub use ranking::{RankedResult, RankedRow, ValueFormat};
