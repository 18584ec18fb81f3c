//! Integration tests for the normalize, scale and render pipeline

use async_trait::async_trait;
use options_scatter::chain::{normalize_payload, ChainStats, OptionsChainResponse};
use options_scatter::fetch::{FetchStatus, OptionsDataStore};
use options_scatter::interaction::InteractionLayer;
use options_scatter::polygon::{ChainQuery, FetchError, OptionsSource};
use options_scatter::render::{MarkStyle, Scene};
use options_scatter::scale::{ColorScale, ScaleSet, Viewport};
use serde_json::{json, Value};

fn scenario_payload() -> Value {
    json!({
        "status": "OK",
        "results": [
            {
                "strike_price": 150,
                "expiration_date": "2025-06-20",
                "contract_type": "call",
                "open_interest": 500,
                "ticker": "AAPL250620C00150000"
            },
            {
                "strike_price": -5,
                "expiration_date": "2025-06-20",
                "contract_type": "call",
                "open_interest": 10,
                "ticker": "BAD"
            },
            {
                "strike_price": 160,
                "expiration_date": "2025-07-18",
                "contract_type": "put",
                "open_interest": 0,
                "ticker": "X"
            }
        ]
    })
}

struct StaticSource(Value);

#[async_trait]
impl OptionsSource for StaticSource {
    async fn fetch_chain(&self, _query: &ChainQuery) -> Result<OptionsChainResponse, FetchError> {
        Ok(OptionsChainResponse::from_value(&self.0))
    }
}

#[test]
fn test_normalize_payload_scenario() {
    let normalized = normalize_payload(&scenario_payload());
    assert_eq!(normalized.contracts.len(), 2);
    assert_eq!(normalized.dropped.len(), 1);

    let stats = ChainStats::from_contracts(&normalized.contracts);
    assert_eq!(stats.calls, 1);
    assert_eq!(stats.puts, 1);
    assert_eq!(stats.total_open_interest, 500);
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let store = OptionsDataStore::new(StaticSource(scenario_payload()), ChainQuery::new("AAPL"));
    store.fetch().await;

    let data = match store.status() {
        FetchStatus::Ready(data) => data,
        other => panic!("unexpected status {other:?}"),
    };
    assert_eq!(data.len(), 2);
    assert_eq!(data[0].ticker, "AAPL250620C00150000");
    assert_eq!(data[1].ticker, "X");

    let stats = ChainStats::from_contracts(&data);
    assert_eq!((stats.calls, stats.puts, stats.total_open_interest), (1, 1, 500));

    let scales = ScaleSet::build(&data, Viewport::default(), ColorScale::default()).unwrap();
    assert_eq!(scales.radius_of(&data[0]), 15.0);
    assert_eq!(scales.radius_of(&data[1]), 2.0);

    let scene = Scene::build(data.clone(), &scales, "AAPL");
    assert_eq!(scene.marks.len(), 2);
    assert!(scene.marks[0].cx < scene.marks[1].cx);
    // nearer expiry sits lower on screen
    assert!(scene.marks[0].cy > scene.marks[1].cy);
}

#[test]
fn test_strike_ordering_and_degenerate_domain() {
    let payload = json!({
        "status": "OK",
        "results": ([100, 105, 110].iter().map(|strike| json!({
            "strike_price": strike,
            "expiration_date": "2025-06-20",
            "contract_type": "call",
            "ticker": format!("C{strike}")
        })).collect::<Vec<_>>())
    });
    let contracts = normalize_payload(&payload).contracts;
    let viewport = Viewport::default();
    let scales = ScaleSet::build(&contracts, viewport, ColorScale::default()).unwrap();

    let xs: Vec<f64> = contracts.iter().map(|c| scales.position(c).0).collect();
    assert!(xs.windows(2).all(|w| w[0] <= w[1]));
    assert!(xs.iter().all(|x| (0.0..=viewport.inner_width()).contains(x)));

    // every contract at one strike and one expiry
    let single = vec![contracts[0].clone(), contracts[0].clone()];
    let scales = ScaleSet::build(&single, viewport, ColorScale::default()).unwrap();
    let (x, y) = scales.position(&single[0]);
    assert!(x.is_finite() && y.is_finite());
}

#[test]
fn test_hover_exclusivity_across_pipeline() {
    let contracts: std::sync::Arc<[_]> = normalize_payload(&scenario_payload()).contracts.into();
    let scales = ScaleSet::build(&contracts, Viewport::default(), ColorScale::default()).unwrap();
    let scene = Scene::build(contracts, &scales, "AAPL");
    let mut layer = InteractionLayer::new();

    layer.pointer_enter(&scene, 0, 5.0, 5.0);
    layer.pointer_enter(&scene, 1, 6.0, 6.0);

    assert_eq!(layer.style_of(0), MarkStyle::RESTING);
    assert_eq!(layer.style_of(1), MarkStyle::EMPHASIZED);
    assert_eq!(layer.hover().map(|h| h.contract.ticker.as_str()), Some("X"));
}
