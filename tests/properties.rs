use chartboard::charts::{BarChartOptions, ChartSpec};
use chartboard::stats::metrics::percent;
use chartboard::stats::ranking::{group_count, rank_pairs};
use chartboard::stats::geo::EARTH_RADIUS_KM;
use chartboard::stats::{haversine_km, GeoPoint, RankedResult, ValueFormat};
use proptest::prelude::*;
use std::f64::consts::PI;

fn pairs_strategy() -> impl Strategy<Value = Vec<(String, f64)>> {
    prop::collection::vec(("[A-Z]{1,3}", 0u32..50), 0..40).prop_map(|raw| {
        raw.into_iter()
            .map(|(label, v)| (label, v as f64 / 10.0))
            .collect()
    })
}

fn point() -> impl Strategy<Value = GeoPoint> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lon)| GeoPoint::new(lat, lon))
}

fn options() -> BarChartOptions {
    BarChartOptions {
        title: "Top".to_string(),
        value_title: "Value".to_string(),
        label_title: "Label".to_string(),
        scheme: "tealblues".to_string(),
        width: 600,
        height: 400,
    }
}

proptest! {
    #[test]
    fn ranking_keeps_min_of_n_and_input(pairs in pairs_strategy(), n in 0usize..15) {
        let ranked = rank_pairs(pairs.clone(), n);
        prop_assert_eq!(ranked.len(), n.min(pairs.len()));
    }

    #[test]
    fn ranking_is_descending(pairs in pairs_strategy(), n in 1usize..15) {
        let ranked = rank_pairs(pairs, n);
        for w in ranked.windows(2) {
            prop_assert!(w[0].value >= w[1].value);
        }
    }

    #[test]
    fn ranking_ties_keep_input_order(pairs in pairs_strategy()) {
        let ranked = rank_pairs(pairs.clone(), pairs.len());
        for w in ranked.windows(2) {
            if w[0].value == w[1].value {
                let first = pairs.iter().position(|p| p.0 == w[0].label && p.1 == w[0].value);
                let second = pairs.iter().rposition(|p| p.0 == w[1].label && p.1 == w[1].value);
                prop_assert!(first <= second);
            }
        }
    }

    #[test]
    fn group_counts_sum_to_non_null_keys(
        keys in prop::collection::vec(prop::option::of("[a-c]"), 0..60),
    ) {
        let expected = keys.iter().filter(|k| k.is_some()).count();
        let counted: f64 = group_count(keys, usize::MAX).iter().map(|r| r.value).sum();
        prop_assert_eq!(counted as usize, expected);
    }

    #[test]
    fn percent_is_value_times_hundred(pairs in pairs_strategy()) {
        let ranked = RankedResult::new("label", "value", ValueFormat::Decimal(4), rank_pairs(pairs, 10));
        let derived = percent(&ranked);
        prop_assert_eq!(derived.len(), ranked.len());
        for (before, after) in ranked.rows.iter().zip(&derived.rows) {
            prop_assert_eq!(&before.label, &after.label);
            prop_assert_eq!(after.derived, Some(before.value * 100.0));
        }
    }

    #[test]
    fn chart_domain_covers_every_bar(pairs in pairs_strategy()) {
        let ranked = RankedResult::new("label", "value", ValueFormat::Decimal(1), rank_pairs(pairs, 10));
        let chart = ChartSpec::bar(&ranked, &options());
        prop_assert_eq!(chart.bars().len(), ranked.len());
        for (_, value) in chart.bars() {
            prop_assert!(value <= chart.value_max());
        }
    }

    #[test]
    fn haversine_is_zero_on_identity(p in point()) {
        prop_assert!(haversine_km(p, p).abs() < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric_and_bounded(a in point(), b in point()) {
        let ab = haversine_km(a, b);
        let ba = haversine_km(b, a);
        prop_assert!((ab - ba).abs() < 1e-6);
        prop_assert!(ab >= 0.0);
        prop_assert!(ab <= PI * EARTH_RADIUS_KM + 1e-6);
    }
}
