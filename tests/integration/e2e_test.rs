//! End-to-end integration tests

use async_trait::async_trait;
use options_scatter::chain::OptionsChainResponse;
use options_scatter::config::Config;
use options_scatter::dashboard::{Dashboard, Panel};
use options_scatter::fetch::OptionsDataStore;
use options_scatter::polygon::{ChainQuery, FetchError, OptionsSource};
use options_scatter::render::Frame;
use serde_json::json;

struct FixtureSource;

#[async_trait]
impl OptionsSource for FixtureSource {
    async fn fetch_chain(&self, query: &ChainQuery) -> Result<OptionsChainResponse, FetchError> {
        let results = (0..40)
            .map(|i| {
                json!({
                    "underlying_ticker": query.underlying_ticker,
                    "contract_type": if i % 2 == 0 { "call" } else { "put" },
                    "expiration_date": format!("2025-{:02}-15", 6 + i % 6),
                    "strike_price": 140 + (i / 2) * 5,
                    "open_interest": i * 100,
                    "ticker": format!("O:{}{i:03}", query.underlying_ticker),
                })
            })
            .collect();
        Ok(OptionsChainResponse {
            status: "OK".to_string(),
            results: Some(results),
            ..Default::default()
        })
    }
}

#[test]
fn test_config_example_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml.example");
    let config = Config::load(path).unwrap();
    assert_eq!(config.api.ticker, "AAPL");
    assert_eq!(config.api.limit, 1000);
    assert_eq!(config.chart.margins.bottom, 80.0);
}

#[tokio::test]
async fn test_dashboard_flow() {
    let config = Config::default();
    let store = OptionsDataStore::new(FixtureSource, ChainQuery::new("AAPL"));
    let mut dashboard = Dashboard::new("AAPL", config.color_scale(), config.chart.margins);

    assert!(matches!(dashboard.panel(&store.status(), 1000.0), Panel::Loading));
    store.fetch().await;

    let scene = match dashboard.panel(&store.status(), 1000.0) {
        Panel::Chart { stats, scene } => {
            assert_eq!(stats.total_contracts, 40);
            assert_eq!(stats.calls, 20);
            assert_eq!(stats.puts, 20);
            assert_eq!(stats.total_open_interest, (0..40).map(|i| i * 100).sum::<u64>());
            scene
        }
        other => panic!("unexpected panel {other:?}"),
    };
    assert_eq!(scene.viewport.width, 968.0);
    assert_eq!(scene.viewport.height, 700.0);
    assert_eq!(scene.title.text, "AAPL Options Chain Visualization");

    // hover the largest mark through raw pointer motion
    let mark = scene.marks.last().unwrap().clone();
    let (ox, oy) = scene.plot_origin();
    let changes = dashboard.chart_mut().pointer_move(mark.cx + ox, mark.cy + oy);
    assert!(!changes.is_empty());
    let hovered = dashboard.chart().interaction().hover().unwrap().mark;
    assert!(scene.marks[hovered].contains(mark.cx, mark.cy));

    let svg = dashboard.chart().to_svg(Frame::Final).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("class=\"tooltip\""));

    // same dataset, same width: no rebuild, hover survives
    dashboard.panel(&store.status(), 1000.0);
    assert!(dashboard.chart().interaction().hover().is_some());

    // resize rebuilds and drops hover
    dashboard.panel(&store.status(), 700.0);
    assert!(dashboard.chart().interaction().hover().is_none());
    assert_eq!(dashboard.chart().scene().unwrap().viewport.width, 668.0);
}

#[tokio::test]
async fn test_render_writes_svg_file() {
    let store = OptionsDataStore::new(FixtureSource, ChainQuery::new("MSFT"));
    store.fetch().await;
    let mut dashboard = Dashboard::new("MSFT", Default::default(), Default::default());
    dashboard.panel(&store.status(), 832.0);

    let svg = dashboard.chart().to_svg(Frame::Animated).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chain.svg");
    std::fs::write(&path, &svg).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("MSFT Options Chain Visualization"));
    assert!(written.matches("<circle").count() >= 40);
}
