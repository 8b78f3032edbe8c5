//! Flight routes dashboard: hubs, route distances and destination countries
//! for one airline.

use crate::charts::{BarChartOptions, ChartSpec, TablePreview};
use crate::config::DashboardConfig;
use crate::dashboards::{PipelineError, RenderedView};
use crate::data::processor::{filter_equals, int_values, unique_values};
use crate::data::schema::{missing_column, routes, AIRPORT_COLUMNS, ROUTE_COLUMNS};
use crate::data::{CsvLayout, DataLoader, Source};
use crate::stats::geo::route_distances;
use crate::stats::metrics::mean;
use crate::stats::ranking::{group_count, group_count_column, rank_pairs, ValueFormat};
use crate::stats::{AirportIndex, RankedResult};
use polars::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub const ROUTES_FIELD: &str = "routes";
pub const DISTANCE_FIELD: &str = "distance_km";
pub const ROUTE_LABEL_FIELD: &str = "Route";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightsTab {
    #[default]
    Hubs,
    Distances,
    Destinations,
}

impl FlightsTab {
    pub const ALL: [FlightsTab; 3] = [FlightsTab::Hubs, FlightsTab::Distances, FlightsTab::Destinations];

    pub fn title(self) -> &'static str {
        match self {
            FlightsTab::Hubs => "Hub airports",
            FlightsTab::Distances => "Longest routes",
            FlightsTab::Destinations => "Destination countries",
        }
    }
}

#[derive(Clone)]
pub struct FlightsDashboard {
    routes: Arc<DataFrame>,
    airports: AirportIndex,
    airlines: Vec<String>,
}

impl FlightsDashboard {
    pub fn new(routes: Arc<DataFrame>, airports: &DataFrame) -> Result<Self, PipelineError> {
        let route_names: Vec<&str> = ROUTE_COLUMNS.iter().map(|c| c.name).collect();
        if let Some(missing) = missing_column(&routes, &route_names) {
            return Err(PipelineError::MissingColumn(missing.to_string()));
        }
        let airport_names: Vec<&str> = AIRPORT_COLUMNS.iter().map(|c| c.name).collect();
        if let Some(missing) = missing_column(airports, &airport_names) {
            return Err(PipelineError::MissingColumn(missing.to_string()));
        }

        let airports = AirportIndex::from_table(airports)?;
        let airlines = unique_values(&routes, routes::AIRLINE)?;
        debug!(airlines = airlines.len(), airports = airports.len(), "Flights dashboard ready");

        Ok(Self {
            routes,
            airports,
            airlines,
        })
    }

    /// Load both OpenFlights tables through the shared loader.
    pub fn load(
        loader: &DataLoader,
        routes_source: &Source,
        airports_source: &Source,
    ) -> Result<Self, PipelineError> {
        let routes = loader.load(routes_source, CsvLayout::Headerless(ROUTE_COLUMNS))?;
        let airports = loader.load(airports_source, CsvLayout::Headerless(AIRPORT_COLUMNS))?;
        Self::new(routes, &airports)
    }

    /// Airline codes present in the routes table, sorted.
    pub fn airlines(&self) -> &[String] {
        &self.airlines
    }

    pub fn render(
        &self,
        airline: &str,
        tab: FlightsTab,
        config: &DashboardConfig,
    ) -> Result<RenderedView, PipelineError> {
        // An airline with no routes renders empty views
        let airline_routes = filter_equals(&self.routes, routes::AIRLINE, airline)?;
        debug!(airline, ?tab, routes = airline_routes.height(), "Rendering flights tab");

        match tab {
            FlightsTab::Hubs => self.render_hubs(airline, &airline_routes, config),
            FlightsTab::Distances => self.render_distances(airline, &airline_routes, config),
            FlightsTab::Destinations => {
                self.render_destinations(airline, &airline_routes, config)
            }
        }
    }

    fn render_hubs(
        &self,
        airline: &str,
        airline_routes: &DataFrame,
        config: &DashboardConfig,
    ) -> Result<RenderedView, PipelineError> {
        let ranked = group_count_column(
            airline_routes,
            routes::SOURCE_AIRPORT,
            ROUTES_FIELD,
            config.top_n,
        )?;

        let total = airline_routes.height();
        let summary = Some(format!("{} operates {} routes in total.", airline, total));

        Ok(view(
            &ranked,
            options(
                format!("Top {} hub airports of {}", config.top_n, airline),
                "Routes",
                "Source airport",
                config,
            ),
            summary,
        ))
    }

    fn render_distances(
        &self,
        airline: &str,
        airline_routes: &DataFrame,
        config: &DashboardConfig,
    ) -> Result<RenderedView, PipelineError> {
        let distances = route_distances(airline_routes, &self.airports)?;
        let excluded = airline_routes.height() - distances.len();

        let kms: Vec<f64> = distances.iter().map(|d| d.km).collect();
        let pairs: Vec<(String, f64)> = distances.iter().map(|d| (d.label(), d.km)).collect();
        let ranked = RankedResult::new(
            ROUTE_LABEL_FIELD,
            DISTANCE_FIELD,
            ValueFormat::Decimal(2),
            rank_pairs(pairs, config.top_n),
        );

        let summary = mean(&kms).map(|avg| {
            format!(
                "Mean distance over {} resolvable routes: {:.2} km ({} routes excluded)",
                kms.len(),
                avg,
                excluded
            )
        });

        Ok(view(
            &ranked,
            options(
                format!("Top {} longest routes of {}", config.top_n, airline),
                "Distance (km)",
                "Route",
                config,
            ),
            summary,
        ))
    }

    fn render_destinations(
        &self,
        airline: &str,
        airline_routes: &DataFrame,
        config: &DashboardConfig,
    ) -> Result<RenderedView, PipelineError> {
        let countries: Vec<Option<String>> = int_values(airline_routes, routes::DESTINATION_ID)?
            .into_iter()
            .map(|id| self.airports.country_of(id))
            .collect();
        let joined = countries.iter().filter(|c| c.is_some()).count();

        let ranked = RankedResult::new(
            "Destination_Country",
            ROUTES_FIELD,
            ValueFormat::Integer,
            group_count(countries, config.top_n),
        );
        let summary = Some(format!(
            "{} of {} routes matched a destination country.",
            joined,
            airline_routes.height()
        ));

        Ok(view(
            &ranked,
            options(
                format!("Top {} destination countries of {}", config.top_n, airline),
                "Routes",
                "Country",
                config,
            ),
            summary,
        ))
    }
}

fn options(title: String, value_title: &str, label_title: &str, config: &DashboardConfig) -> BarChartOptions {
    BarChartOptions {
        title,
        value_title: value_title.to_string(),
        label_title: label_title.to_string(),
        scheme: config.color_scheme.clone(),
        width: config.chart_width,
        height: config.chart_height,
    }
}

fn view(ranked: &RankedResult, options: BarChartOptions, summary: Option<String>) -> RenderedView {
    RenderedView {
        chart: ChartSpec::bar(ranked, &options),
        preview: TablePreview::from_ranked(ranked),
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes_table() -> DataFrame {
        df!(
            "Airline" => ["XA", "XA", "XA", "XA", "YB"],
            "Airline_ID" => [Some(1i64), Some(1), Some(1), Some(1), Some(2)],
            "Source_Airport" => ["XXX", "XXX", "XXX", "QQQ", "PPP"],
            "Source_ID" => [Some(1i64), Some(1), Some(1), Some(3), Some(2)],
            "Destination_Airport" => ["PPP", "QQQ", "PPP", "ZZZ", "XXX"],
            "Destination_ID" => [Some(2i64), Some(3), Some(2), None, Some(1)],
            "Codeshare" => [None::<&str>, None, None, None, Some("Y")],
            "Stops" => [0i64, 0, 0, 0, 0],
            "Equipment" => ["320", "320", "738", "320", "CR2"],
        )
        .unwrap()
    }

    fn airports_table() -> DataFrame {
        df!(
            "Airport_ID" => [1i64, 2, 3],
            "Name" => ["X Intl", "P Field", "Q Regional"],
            "City" => ["Xville", "Ptown", "Qcity"],
            "Country" => ["Xland", "Pland", "Pland"],
            "IATA" => ["XXX", "PPP", "QQQ"],
            "ICAO" => ["KXXX", "KPPP", "KQQQ"],
            "Latitude" => [Some(10.0), Some(10.0), None],
            "Longitude" => [Some(20.0), Some(20.0), Some(30.0)],
            "Altitude" => [0.0, 0.0, 0.0],
            "Timezone" => [0.0, 0.0, 0.0],
            "DST" => ["N", "N", "N"],
            "Tz_database_time_zone" => ["UTC", "UTC", "UTC"],
            "Type" => ["airport", "airport", "airport"],
            "Source" => ["Test", "Test", "Test"],
        )
        .unwrap()
    }

    fn dashboard() -> FlightsDashboard {
        FlightsDashboard::new(Arc::new(routes_table()), &airports_table()).unwrap()
    }

    #[test]
    fn airlines_are_sorted_and_distinct() {
        assert_eq!(dashboard().airlines(), &["XA".to_string(), "YB".to_string()]);
    }

    #[test]
    fn hubs_count_rows_per_source() {
        let view = dashboard()
            .render("XA", FlightsTab::Hubs, &DashboardConfig::default())
            .unwrap();
        assert_eq!(view.chart.bars(), vec![("XXX".to_string(), 3.0), ("QQQ".to_string(), 1.0)]);
        assert_eq!(view.preview.rows[0], vec!["XXX", "3"]);
        assert_eq!(view.summary.as_deref(), Some("XA operates 4 routes in total."));
    }

    #[test]
    fn distances_keep_zero_length_routes_and_drop_unresolved() {
        let view = dashboard()
            .render("XA", FlightsTab::Distances, &DashboardConfig::default())
            .unwrap();

        // XXX and PPP share coordinates; QQQ has no latitude; ZZZ has no id
        let bars = view.chart.bars();
        assert_eq!(bars.len(), 2);
        assert!(bars.iter().all(|(label, km)| label == "XXX → PPP" && *km == 0.0));
        assert_eq!(
            view.summary.as_deref(),
            Some("Mean distance over 2 resolvable routes: 0.00 km (2 routes excluded)")
        );
    }

    #[test]
    fn destinations_count_joined_countries() {
        let view = dashboard()
            .render("XA", FlightsTab::Destinations, &DashboardConfig::default())
            .unwrap();
        assert_eq!(view.chart.bars(), vec![("Pland".to_string(), 3.0)]);
        assert_eq!(
            view.summary.as_deref(),
            Some("3 of 4 routes matched a destination country.")
        );
    }

    #[test]
    fn airline_without_resolvable_routes_renders_empty() {
        let airports = airports_table()
            .lazy()
            .filter(col("Airport_ID").eq(lit(3i64)))
            .collect()
            .unwrap();
        let dashboard = FlightsDashboard::new(Arc::new(routes_table()), &airports).unwrap();

        let view = dashboard
            .render("YB", FlightsTab::Distances, &DashboardConfig::default())
            .unwrap();
        assert!(view.is_empty());
        assert!(view.preview.is_empty());
        assert_eq!(view.summary, None);
    }

    #[test]
    fn airline_without_routes_renders_empty_tabs() {
        let dashboard = dashboard();
        for tab in FlightsTab::ALL {
            let view = dashboard
                .render("ZZ", tab, &DashboardConfig::default())
                .unwrap();
            assert!(view.is_empty(), "{:?} was not empty", tab);
            assert!(view.chart.is_empty());
            assert!(view.preview.is_empty());
        }
    }

    #[test]
    fn missing_route_column_is_rejected() {
        let routes = routes_table().drop("Equipment").unwrap();
        let err = FlightsDashboard::new(Arc::new(routes), &airports_table())
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::MissingColumn(c) if c == "Equipment"));
    }
}
