use chart_dash::api::{ChartKind, ChartRequest, DashboardConfig, build_figure, build_scene};
use chart_dash::core::{Dataset, NetworkGraph, PlotArea, SpringLayoutConfig, squarify};
use proptest::prelude::*;

fn category_csv(rows: &[(u8, f64)]) -> Vec<u8> {
    let mut csv = String::from("category,amount\n");
    for (category, amount) in rows {
        csv.push_str(&format!("c{category},{amount}\n"));
    }
    csv.into_bytes()
}

fn category_kind() -> impl Strategy<Value = ChartKind> {
    prop::sample::select(vec![
        ChartKind::RadialBar,
        ChartKind::Radar,
        ChartKind::Nightingale,
        ChartKind::Donut,
        ChartKind::Treemap,
        ChartKind::Sunburst,
    ])
}

proptest! {
    #[test]
    fn scene_build_is_deterministic_and_finite(
        rows in prop::collection::vec((0u8..12u8, -500.0f64..500.0f64), 1..40),
        kind in category_kind(),
    ) {
        let dataset = Dataset::from_csv_bytes(&category_csv(&rows)).expect("parse csv");
        let request = ChartRequest::new(kind)
            .with_category("category")
            .with_value("amount");
        let config = DashboardConfig::default();

        let figure = build_figure(&dataset, &request, &config).expect("figure");
        let first = build_scene(&figure, &config).expect("first scene");
        let second = build_scene(&figure, &config).expect("second scene");

        prop_assert_eq!(&first, &second);
        prop_assert!(first.validate().is_ok());
        prop_assert!(first.polygons().all(|polygon| polygon.points.iter().all(|p| p.is_finite())));
    }

    #[test]
    fn donut_fractions_cover_the_full_turn(
        rows in prop::collection::vec((0u8..8u8, 0.5f64..1000.0f64), 1..30),
    ) {
        let dataset = Dataset::from_csv_bytes(&category_csv(&rows)).expect("parse csv");
        let request = ChartRequest::new(ChartKind::Donut)
            .with_category("category")
            .with_value("amount");
        let figure = build_figure(&dataset, &request, &DashboardConfig::default()).expect("figure");
        let pie = figure.pie().expect("pie");

        let total: f64 = pie.fractions().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
        prop_assert!(pie.slices.windows(2).all(|pair| pair[0].value >= pair[1].value));
    }

    #[test]
    fn spring_layout_stays_within_unit_square(
        edges in prop::collection::vec((0u8..15u8, 0u8..15u8), 1..40),
        seed in any::<u64>(),
    ) {
        let mut network = NetworkGraph::from_edges(
            edges.iter().map(|(a, b)| (format!("n{a}"), format!("n{b}"))),
        );
        network.apply_layout(SpringLayoutConfig { seed, ..SpringLayoutConfig::default() });

        prop_assert_eq!(network.positions().len(), network.node_count());
        let all_in_bounds = network.positions().iter().all(|p| {
            p.is_finite() && p.x.abs() <= 1.0 + 1e-9 && p.y.abs() <= 1.0 + 1e-9
        });
        prop_assert!(all_in_bounds);
    }

    #[test]
    fn treemap_tiles_cover_their_bounds(
        weights in prop::collection::vec(0.1f64..100.0f64, 1..30),
        width in 50.0f64..1200.0f64,
        height in 50.0f64..900.0f64,
    ) {
        let bounds = PlotArea::new(10.0, 20.0, width, height);
        let tiles = squarify(&weights, bounds);
        prop_assert_eq!(tiles.len(), weights.len());

        let covered: f64 = tiles.iter().map(|tile| tile.area.area()).sum();
        prop_assert!((covered - bounds.area()).abs() <= bounds.area() * 1e-9);
        let all_within_bounds = tiles.iter().all(|tile| {
            tile.area.left >= bounds.left - 1e-6
                && tile.area.top >= bounds.top - 1e-6
                && tile.area.right() <= bounds.right() + 1e-6
                && tile.area.bottom() <= bounds.bottom() + 1e-6
        });
        prop_assert!(all_within_bounds);
    }
}
