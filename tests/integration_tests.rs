use choropleth::prelude::*;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// End-to-end tests for the load -> catalog -> paint -> hover -> reselect flow
/// on a COVID-style state document
#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    const COVID_DOCUMENT: &str = r#"
    {
        "name": "COVID-19 State-By-State Daily Statistic Heatmap Layer",
        "layers": [{
            "id": 1,
            "source": {
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {
                            "_layerId": 1,
                            "name": "Pacifica",
                            "cases": 1000,
                            "todayCases": 12,
                            "deaths": 10,
                            "casesPerOneMillion": 250,
                            "country": "USA",
                            "population": 4000000,
                            "updated": 1600000000000
                        },
                        "geometry": {"type": "Polygon", "coordinates": [[[-125, 24], [-100, 24], [-100, 50], [-125, 50], [-125, 24]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {
                            "_layerId": 1,
                            "name": "Prairie",
                            "cases": 6000,
                            "todayCases": 12,
                            "deaths": null,
                            "casesPerOneMillion": 3000,
                            "country": "USA",
                            "population": 2000000,
                            "updated": 1600000000000
                        },
                        "geometry": {"type": "Polygon", "coordinates": [[[-100, 24], [-85, 24], [-85, 50], [-100, 50], [-100, 24]]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {
                            "_layerId": 1,
                            "name": "Atlantica",
                            "cases": 11000,
                            "todayCases": 12,
                            "deaths": 110,
                            "casesPerOneMillion": 1100,
                            "country": "USA",
                            "population": 10000000,
                            "updated": 1600000000000
                        },
                        "geometry": {"type": "MultiPolygon", "coordinates": [[[[-85, 24], [-66, 24], [-66, 50], [-85, 50], [-85, 24]]]]}
                    }
                ]
            }
        }]
    }
    "#;

    const LAYER_NAME: &str = "COVID-19 State-By-State Daily Statistic Heatmap Layer";

    fn covid_source() -> InlineSource {
        InlineSource::from_json("covid", COVID_DOCUMENT).unwrap()
    }

    /// Fails with a transient error until `failures` attempts have been made
    struct FlakySource {
        attempts: AtomicUsize,
        failures: usize,
        document: MapDocument,
    }

    impl FlakySource {
        fn new(failures: usize) -> Self {
            Self {
                attempts: AtomicUsize::new(0),
                failures,
                document: MapDocument::from_json(COVID_DOCUMENT).unwrap(),
            }
        }
    }

    impl DocumentSource for FlakySource {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        fn fetch(&self) -> BoxFuture<'_, Result<MapDocument>> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            let result = if attempt < self.failures {
                Err(ChoroplethError::Http(503))
            } else {
                Ok(self.document.clone())
            };
            futures::future::ready(result).boxed()
        }
    }

    #[tokio::test]
    async fn test_full_flow() {
        println!("🧪 [TEST] Testing load -> paint -> hover -> reselect");

        let mut layer = ChoroplethLayer::new(LAYER_NAME);
        let status = layer.load(&covid_source()).await.unwrap();
        assert_eq!(status, LoadStatus::Applied(1));

        // catalog
        let catalog = layer.catalog().unwrap();
        let keys: Vec<&str> = catalog.keys().collect();
        assert_eq!(
            keys,
            vec!["cases", "todayCases", "deaths", "casesPerOneMillion", "country"]
        );
        assert_eq!(catalog.get("casesPerOneMillion").unwrap().label, "Cases/Million");
        assert_eq!(catalog.get("todayCases").unwrap().label, "Cases Today");

        // control panel
        let panel = layer.control_panel().unwrap();
        assert_eq!(panel.name, LAYER_NAME);
        assert_eq!(panel.default_key, "cases");
        assert!(panel.option("country").is_none());
        assert_eq!(panel.options.len(), 4);

        // viewport
        let viewport = layer.viewport().unwrap();
        assert!((viewport.longitude - -95.5).abs() < 1e-6);
        assert!((viewport.latitude - 38.144_379_89).abs() < 1e-6);
        assert!((viewport.zoom - 3.209_122_889).abs() < 1e-6);

        // paint for the default dimension
        let paint = layer.paint().unwrap().unwrap();
        assert_eq!(
            paint.to_style_json(),
            json!({
                "fill-color": "#1f77b4",
                "fill-opacity": [
                    "step", ["get", "cases"], 0.1,
                    1000.0, 0.2,
                    3000.0, 0.35,
                    5000.0, 0.5,
                    7000.0, 0.65,
                    9000.0, 0.8
                ],
                "fill-outline-color": "white"
            })
        );
        assert_eq!(paint.fill_opacity.evaluate(6000.0), 0.5);

        // hover
        let feature = layer.dataset().unwrap().collection.features[2].clone();
        let event = PointerEvent::moved(Point::new(640.0, 300.0), vec![feature.clone()]);
        let hover = layer.on_pointer(&event).unwrap();
        assert_eq!(hover.feature, feature);
        assert_eq!((hover.x, hover.y), (640.0, 300.0));
        assert_eq!(
            layer.tooltip().unwrap().lines(),
            vec![
                "State: Atlantica",
                "Population: 10,000,000",
                "Cases: 11,000",
                "Updated: Sep 13 2020",
            ]
        );

        // reselect through the control panel
        let change = panel.pick("deaths").unwrap();
        let selected = layer.apply_change(&change).unwrap();
        assert_eq!(selected.label, "Deaths");
        assert_eq!(selected.color, palette_color(2));

        let paint = layer.paint().unwrap().unwrap();
        assert_eq!(paint.fill_color.to_hex(), "#2ca02c");
        assert_eq!(paint.fill_opacity.breakpoints(), vec![10.0, 30.0, 50.0, 70.0, 90.0]);

        // constant dimension
        layer.select("todayCases").unwrap();
        let paint = layer.paint().unwrap().unwrap();
        assert_eq!(paint.to_style_json()["fill-opacity"], json!(0.2));

        println!("✅ [TEST] Full flow test passed");
    }

    #[tokio::test]
    async fn test_memo_does_not_leak_across_datasets() {
        let mut layer = ChoroplethLayer::new(LAYER_NAME);
        layer.load(&covid_source()).await.unwrap();
        let first = layer.paint().unwrap().unwrap();
        let first_id = layer.dataset().unwrap().id;

        let reduced = COVID_DOCUMENT.replace("11000", "2000");
        let source = InlineSource::from_json("reduced", &reduced).unwrap();
        layer.load(&source).await.unwrap();
        let second = layer.paint().unwrap().unwrap();

        assert_ne!(layer.dataset().unwrap().id, first_id);
        assert!(!layer.encoding_cache().contains(first_id, "cases"));
        assert_ne!(first.fill_opacity, second.fill_opacity);
        assert_eq!(second.fill_opacity.breakpoints()[4], 5000.0);
    }

    #[tokio::test]
    async fn test_superseded_loads_are_discarded_in_any_order() {
        println!("🧪 [TEST] Testing out-of-order load completion");

        let mut layer = ChoroplethLayer::new(LAYER_NAME);
        let old_source = covid_source();
        let new_source = covid_source();

        let old_ticket = layer.begin_load(&old_source);
        let new_ticket = layer.begin_load(&new_source);

        let (old_outcome, new_outcome) = futures::join!(
            DatasetLoader::fetch(old_ticket, &old_source),
            DatasetLoader::fetch(new_ticket.clone(), &new_source)
        );

        // newest lands first, the stale one afterwards
        assert_eq!(
            layer.finish_load(new_outcome).unwrap(),
            LoadStatus::Applied(new_ticket.id)
        );
        assert_eq!(layer.finish_load(old_outcome).unwrap(), LoadStatus::Superseded);
        assert_eq!(layer.dataset().unwrap().id, new_ticket.id);

        // stale one lands first
        let old_ticket = layer.begin_load(&old_source);
        let new_ticket = layer.begin_load(&new_source);
        let old_outcome = DatasetLoader::fetch(old_ticket, &old_source).await;
        assert_eq!(layer.finish_load(old_outcome).unwrap(), LoadStatus::Superseded);
        assert!(layer.state().is_loading());

        let new_outcome = DatasetLoader::fetch(new_ticket.clone(), &new_source).await;
        assert_eq!(
            layer.finish_load(new_outcome).unwrap(),
            LoadStatus::Applied(new_ticket.id)
        );

        println!("✅ [TEST] Out-of-order test passed");
    }

    #[tokio::test]
    async fn test_failed_fetch_can_be_retried() {
        let source = FlakySource::new(1);
        let mut layer = ChoroplethLayer::new(LAYER_NAME);

        let error = layer.load(&source).await.unwrap_err();
        assert!(error.is_transient());
        assert!(layer.dataset().is_none());
        assert!(layer.paint().unwrap().is_none());
        assert!(layer.control_panel().is_none());

        let status = layer.load(&source).await.unwrap();
        assert_eq!(status, LoadStatus::Applied(2));
        assert!(layer.paint().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_hover_ignored_while_loading() {
        let mut layer = ChoroplethLayer::new(LAYER_NAME);
        layer.load(&covid_source()).await.unwrap();
        let feature = layer.dataset().unwrap().collection.features[0].clone();

        layer.begin_load(&covid_source());
        let event = PointerEvent::moved(Point::new(1.0, 1.0), vec![feature]);
        assert!(layer.on_pointer(&event).is_none());
        assert!(layer.tooltip().is_none());
    }

    #[test]
    fn test_compact_profile_changes_frame() {
        let config = ChoroplethProfile::Compact.resolve();
        let mut layer = ChoroplethLayer::with_config(LAYER_NAME, config).unwrap();
        layer
            .load_document(MapDocument::from_json(COVID_DOCUMENT).unwrap())
            .unwrap();

        let standard = ViewportFitter::default()
            .fit_collection(&layer.dataset().unwrap().collection)
            .unwrap();
        assert!(layer.viewport().unwrap().zoom < standard.zoom);
    }
}
