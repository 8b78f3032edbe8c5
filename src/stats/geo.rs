//! Great-circle distances between airports.

use crate::data::processor::{float_values, int_values, string_values};
use crate::data::schema::{airports, routes};
use polars::prelude::*;
use rayon::prelude::*;
use std::collections::HashMap;

/// Mean Earth radius used for distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Haversine distance in kilometers.
///
/// A non-finite coordinate gives NaN.
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    if h.is_nan() {
        return f64::NAN;
    }
    // Rounding can push h just past 1 for antipodal points
    2.0 * EARTH_RADIUS_KM * h.clamp(0.0, 1.0).sqrt().asin()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Airport {
    pub iata: Option<String>,
    pub country: Option<String>,
    /// Present only when both latitude and longitude are finite
    pub coords: Option<GeoPoint>,
}

/// Airports keyed by `Airport_ID`.
#[derive(Debug, Clone, Default)]
pub struct AirportIndex {
    by_id: HashMap<i64, Airport>,
}

impl AirportIndex {
    pub fn from_table(df: &DataFrame) -> PolarsResult<Self> {
        let ids = int_values(df, airports::AIRPORT_ID)?;
        let iata = string_values(df, airports::IATA)?;
        let countries = string_values(df, airports::COUNTRY)?;
        let lats = float_values(df, airports::LATITUDE)?;
        let lons = float_values(df, airports::LONGITUDE)?;

        let mut by_id = HashMap::with_capacity(df.height());
        for (i, id) in ids.into_iter().enumerate() {
            let Some(id) = id else {
                continue;
            };
            let coords = match (lats[i], lons[i]) {
                (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => {
                    Some(GeoPoint::new(lat, lon))
                }
                _ => None,
            };
            // First row wins on duplicate ids
            by_id.entry(id).or_insert_with(|| Airport {
                iata: iata[i].clone(),
                country: countries[i].clone(),
                coords,
            });
        }

        Ok(Self { by_id })
    }

    pub fn get(&self, id: i64) -> Option<&Airport> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Country of an airport, if the id resolves and the country is known.
    pub fn country_of(&self, id: Option<i64>) -> Option<String> {
        id.and_then(|id| self.get(id))
            .and_then(|airport| airport.country.clone())
    }
}

/// One route with both endpoints resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDistance {
    pub source: String,
    pub destination: String,
    pub km: f64,
}

impl RouteDistance {
    pub fn label(&self) -> String {
        format!("{} → {}", self.source, self.destination)
    }
}

/// Distance of every route whose two airports have coordinates.
///
/// Routes with a missing id, an unknown airport or unknown coordinates are
/// left out. Output order follows route order.
pub fn route_distances(df: &DataFrame, index: &AirportIndex) -> PolarsResult<Vec<RouteDistance>> {
    let source_codes = string_values(df, routes::SOURCE_AIRPORT)?;
    let source_ids = int_values(df, routes::SOURCE_ID)?;
    let dest_codes = string_values(df, routes::DESTINATION_AIRPORT)?;
    let dest_ids = int_values(df, routes::DESTINATION_ID)?;

    let distances = (0..df.height())
        .into_par_iter()
        .filter_map(|i| {
            let (src, src_point) = resolve(index, source_ids[i])?;
            let (dst, dst_point) = resolve(index, dest_ids[i])?;
            Some(RouteDistance {
                source: endpoint_code(source_codes[i].as_deref(), src),
                destination: endpoint_code(dest_codes[i].as_deref(), dst),
                km: haversine_km(src_point, dst_point),
            })
        })
        .collect();

    Ok(distances)
}

fn resolve(index: &AirportIndex, id: Option<i64>) -> Option<(&Airport, GeoPoint)> {
    let airport = index.get(id?)?;
    Some((airport, airport.coords?))
}

fn endpoint_code(route_code: Option<&str>, airport: &Airport) -> String {
    route_code
        .or(airport.iata.as_deref())
        .unwrap_or("?")
        .to_string()
}
