//! Dataset Layouts
//! Column names and fixed schemas of the datasets the dashboards read.

use polars::prelude::*;

/// Identifier column of the MBTI-by-country table.
pub const COUNTRY: &str = "Country";

/// A named, typed column of a headerless CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnDef {
    pub name: &'static str,
    pub dtype: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Text,
    Integer,
    Float,
}

impl ColumnType {
    pub fn dtype(self) -> DataType {
        match self {
            ColumnType::Text => DataType::String,
            ColumnType::Integer => DataType::Int64,
            ColumnType::Float => DataType::Float64,
        }
    }
}

const fn text(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        dtype: ColumnType::Text,
    }
}

const fn integer(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        dtype: ColumnType::Integer,
    }
}

const fn float(name: &'static str) -> ColumnDef {
    ColumnDef {
        name,
        dtype: ColumnType::Float,
    }
}

/// OpenFlights `routes.dat` column names.
pub mod routes {
    pub const AIRLINE: &str = "Airline";
    pub const AIRLINE_ID: &str = "Airline_ID";
    pub const SOURCE_AIRPORT: &str = "Source_Airport";
    pub const SOURCE_ID: &str = "Source_ID";
    pub const DESTINATION_AIRPORT: &str = "Destination_Airport";
    pub const DESTINATION_ID: &str = "Destination_ID";
    pub const CODESHARE: &str = "Codeshare";
    pub const STOPS: &str = "Stops";
    pub const EQUIPMENT: &str = "Equipment";
}

/// OpenFlights `airports.dat` column names.
pub mod airports {
    pub const AIRPORT_ID: &str = "Airport_ID";
    pub const NAME: &str = "Name";
    pub const CITY: &str = "City";
    pub const COUNTRY: &str = "Country";
    pub const IATA: &str = "IATA";
    pub const ICAO: &str = "ICAO";
    pub const LATITUDE: &str = "Latitude";
    pub const LONGITUDE: &str = "Longitude";
    pub const ALTITUDE: &str = "Altitude";
    pub const TIMEZONE: &str = "Timezone";
    pub const DST: &str = "DST";
    pub const TZ_DATABASE_TIME_ZONE: &str = "Tz_database_time_zone";
    pub const TYPE: &str = "Type";
    pub const SOURCE: &str = "Source";
}

pub const ROUTE_COLUMNS: &[ColumnDef] = &[
    text(routes::AIRLINE),
    integer(routes::AIRLINE_ID),
    text(routes::SOURCE_AIRPORT),
    integer(routes::SOURCE_ID),
    text(routes::DESTINATION_AIRPORT),
    integer(routes::DESTINATION_ID),
    text(routes::CODESHARE),
    integer(routes::STOPS),
    text(routes::EQUIPMENT),
];

pub const AIRPORT_COLUMNS: &[ColumnDef] = &[
    integer(airports::AIRPORT_ID),
    text(airports::NAME),
    text(airports::CITY),
    text(airports::COUNTRY),
    text(airports::IATA),
    text(airports::ICAO),
    float(airports::LATITUDE),
    float(airports::LONGITUDE),
    float(airports::ALTITUDE),
    float(airports::TIMEZONE),
    text(airports::DST),
    text(airports::TZ_DATABASE_TIME_ZONE),
    text(airports::TYPE),
    text(airports::SOURCE),
];

/// Build a polars schema from fixed column definitions.
pub fn schema_of(columns: &[ColumnDef]) -> Schema {
    columns
        .iter()
        .map(|c| (PlSmallStr::from_static(c.name), c.dtype.dtype()))
        .collect()
}

/// Return the first expected column missing from `df`, if any.
pub fn missing_column<'a>(df: &DataFrame, expected: &[&'a str]) -> Option<&'a str> {
    let present: Vec<&str> = df.get_column_names().iter().map(|s| s.as_str()).collect();
    expected.iter().copied().find(|name| !present.contains(name))
}
