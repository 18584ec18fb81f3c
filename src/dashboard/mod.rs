//! Dashboard view model
//!
//! Decides which panel the host shows for the current fetch status and
//! owns the chart's scene and hover state across re-renders.

use crate::chain::{ChainStats, OptionContract};
use crate::fetch::FetchStatus;
use crate::interaction::{InteractionLayer, StyleChange};
use crate::render::{Frame, Scene, SvgOptions};
use crate::scale::{ColorScale, Margins, ScaleError, ScaleSet, Viewport};
use crate::telemetry::{record_latency, set_gauge, GaugeMetric, LatencyMetric};
use std::sync::Arc;
use std::time::Instant;

/// Horizontal padding of the chart container
const CONTAINER_PADDING: f64 = 32.0;
const MAX_CHART_WIDTH: f64 = 1200.0;
const MIN_CHART_HEIGHT: f64 = 400.0;
const MAX_CHART_HEIGHT: f64 = 700.0;
const ASPECT: f64 = 0.75;

/// Chart size derived from the container width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartDimensions {
    pub width: f64,
    pub height: f64,
}

impl ChartDimensions {
    /// `width = min(container - 32, 1200)`, `height = clamp(width * 0.75, 400, 700)`
    pub fn responsive(container_width: f64) -> Self {
        let width = (container_width - CONTAINER_PADDING).min(MAX_CHART_WIDTH).max(0.0);
        let height = (width * ASPECT).clamp(MIN_CHART_HEIGHT, MAX_CHART_HEIGHT);
        Self { width, height }
    }

    pub fn viewport(&self, margins: Margins) -> Viewport {
        Viewport::new(self.width, self.height).with_margins(margins)
    }
}

/// What the host should display
#[derive(Debug, Clone)]
pub enum Panel {
    /// Spinner while a request is in flight
    Loading,
    /// Failure message with a retry affordance when `retryable`
    Error { message: String, retryable: bool },
    /// The request succeeded but no contract survived normalization
    Empty { ticker: String },
    /// Stat cards plus the scatter plot
    Chart { stats: ChainStats, scene: Arc<Scene> },
}

impl Panel {
    pub fn headline(&self) -> &'static str {
        match self {
            Panel::Loading => "Loading options data...",
            Panel::Error { .. } => "Error Loading Data",
            Panel::Empty { .. } => "No Data Available",
            Panel::Chart { .. } => "Options Chain Scatter Plot",
        }
    }
}

/// Scene and hover state for one chart surface.
///
/// The scene is rebuilt from scratch whenever the dataset or the viewport
/// changes; hover state never survives a rebuild.
#[derive(Debug)]
pub struct ChartView {
    underlying: String,
    colors: ColorScale,
    dataset: Option<Arc<[OptionContract]>>,
    viewport: Option<Viewport>,
    scene: Option<Arc<Scene>>,
    interaction: InteractionLayer,
}

impl ChartView {
    pub fn new(underlying: impl Into<String>, colors: ColorScale) -> Self {
        Self {
            underlying: underlying.into(),
            colors,
            dataset: None,
            viewport: None,
            scene: None,
            interaction: InteractionLayer::new(),
        }
    }

    /// Make the scene current for `dataset` and `viewport`.
    ///
    /// Returns true if the scene was rebuilt. Fails only for an empty
    /// dataset, which the caller should present as [`Panel::Empty`].
    pub fn update(&mut self, dataset: &Arc<[OptionContract]>, viewport: Viewport) -> Result<bool, ScaleError> {
        let same_data = self.dataset.as_ref().is_some_and(|d| Arc::ptr_eq(d, dataset));
        if same_data && self.viewport == Some(viewport) && self.scene.is_some() {
            return Ok(false);
        }

        let started = Instant::now();
        let scales = ScaleSet::build(dataset, viewport, self.colors.clone())?;
        let scene = Scene::build(Arc::clone(dataset), &scales, &self.underlying);
        record_latency(LatencyMetric::SceneBuild, started.elapsed());
        set_gauge(GaugeMetric::RenderedMarks, scene.marks.len() as f64);

        self.interaction.reset();
        self.dataset = Some(Arc::clone(dataset));
        self.viewport = Some(viewport);
        self.scene = Some(Arc::new(scene));
        Ok(true)
    }

    /// Drop the scene, e.g. when the host switches away from the chart
    pub fn clear(&mut self) {
        self.interaction.reset();
        self.dataset = None;
        self.viewport = None;
        self.scene = None;
    }

    pub fn scene(&self) -> Option<&Arc<Scene>> {
        self.scene.as_ref()
    }

    pub fn interaction(&self) -> &InteractionLayer {
        &self.interaction
    }

    /// Forward a pointer position in surface coordinates
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<StyleChange> {
        match &self.scene {
            Some(scene) => self.interaction.pointer_move(scene, x, y),
            None => Vec::new(),
        }
    }

    pub fn pointer_enter(&mut self, mark: usize, local_x: f64, local_y: f64) -> Vec<StyleChange> {
        match &self.scene {
            Some(scene) => self.interaction.pointer_enter(scene, mark, local_x, local_y),
            None => Vec::new(),
        }
    }

    pub fn pointer_leave(&mut self, mark: usize) -> Vec<StyleChange> {
        self.interaction.pointer_leave(mark)
    }

    /// SVG for the current scene with hover emphasis and tooltip applied
    pub fn to_svg(&self, frame: Frame) -> Option<String> {
        let scene = self.scene.as_ref()?;
        let tooltip = self.interaction.tooltip();
        Some(scene.to_svg(&SvgOptions {
            frame,
            emphasized: self.interaction.emphasized(),
            tooltip: tooltip.as_ref(),
        }))
    }
}

/// Host view model: fetch status in, panel out
#[derive(Debug)]
pub struct Dashboard {
    margins: Margins,
    chart: ChartView,
}

impl Dashboard {
    pub fn new(underlying: impl Into<String>, colors: ColorScale, margins: Margins) -> Self {
        Self {
            margins,
            chart: ChartView::new(underlying, colors),
        }
    }

    pub fn chart(&self) -> &ChartView {
        &self.chart
    }

    pub fn chart_mut(&mut self) -> &mut ChartView {
        &mut self.chart
    }

    /// Refresh is offered only while no request is in flight
    pub fn can_refresh(status: &FetchStatus) -> bool {
        !status.is_loading()
    }

    /// Panel for a fetch status rendered into a container of the given width
    pub fn panel(&mut self, status: &FetchStatus, container_width: f64) -> Panel {
        match status {
            FetchStatus::Loading => Panel::Loading,
            FetchStatus::Error { message, retryable } => {
                self.chart.clear();
                Panel::Error {
                    message: message.clone(),
                    retryable: *retryable,
                }
            }
            FetchStatus::Ready(dataset) => {
                let viewport = ChartDimensions::responsive(container_width).viewport(self.margins);
                match self.chart.update(dataset, viewport) {
                    Ok(_) => match self.chart.scene() {
                        Some(scene) => Panel::Chart {
                            stats: ChainStats::from_contracts(dataset),
                            scene: Arc::clone(scene),
                        },
                        None => self.empty(),
                    },
                    Err(ScaleError::EmptyDataset) => {
                        self.chart.clear();
                        self.empty()
                    }
                }
            }
        }
    }

    fn empty(&self) -> Panel {
        Panel::Empty {
            ticker: self.chart.underlying.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ContractType, Greeks};
    use chrono::NaiveDate;

    fn dataset() -> Arc<[OptionContract]> {
        let make = |kind: ContractType, strike: f64, oi: u64| OptionContract {
            underlying_ticker: "AAPL".to_string(),
            contract_type: kind,
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            strike_price: strike,
            open_interest: oi,
            open_interest_reported: true,
            ticker: format!("T{strike}"),
            greeks: Greeks::default(),
        };
        vec![make(ContractType::Call, 150.0, 500), make(ContractType::Put, 160.0, 0)].into()
    }

    fn dashboard() -> Dashboard {
        Dashboard::new("AAPL", ColorScale::default(), Margins::default())
    }

    #[test]
    fn test_responsive_dimensions() {
        assert_eq!(
            ChartDimensions::responsive(1000.0),
            ChartDimensions { width: 968.0, height: 700.0 }
        );
        assert_eq!(
            ChartDimensions::responsive(800.0),
            ChartDimensions { width: 768.0, height: 576.0 }
        );
        assert_eq!(
            ChartDimensions::responsive(2000.0),
            ChartDimensions { width: 1200.0, height: 700.0 }
        );
        assert_eq!(
            ChartDimensions::responsive(400.0),
            ChartDimensions { width: 368.0, height: 400.0 }
        );
    }

    #[test]
    fn test_panel_loading_and_error() {
        let mut dashboard = dashboard();
        assert!(matches!(dashboard.panel(&FetchStatus::Loading, 800.0), Panel::Loading));

        let status = FetchStatus::Error {
            message: "HTTP error! status: 403 - forbidden".to_string(),
            retryable: true,
        };
        match dashboard.panel(&status, 800.0) {
            Panel::Error { message, retryable } => {
                assert!(message.contains("403"));
                assert!(retryable);
            }
            other => panic!("unexpected panel {other:?}"),
        }
        assert!(Dashboard::can_refresh(&status));
        assert!(!Dashboard::can_refresh(&FetchStatus::Loading));
    }

    #[test]
    fn test_panel_empty() {
        let mut dashboard = dashboard();
        let empty: Arc<[OptionContract]> = Vec::new().into();
        let panel = dashboard.panel(&FetchStatus::Ready(empty), 800.0);
        assert!(matches!(&panel, Panel::Empty { ticker } if ticker == "AAPL"));
        assert_eq!(panel.headline(), "No Data Available");
    }

    #[test]
    fn test_panel_chart_with_stats() {
        let mut dashboard = dashboard();
        match dashboard.panel(&FetchStatus::Ready(dataset()), 800.0) {
            Panel::Chart { stats, scene } => {
                assert_eq!(stats.total_contracts, 2);
                assert_eq!(stats.calls, 1);
                assert_eq!(stats.puts, 1);
                assert_eq!(stats.total_open_interest, 500);
                assert_eq!(scene.marks.len(), 2);
                assert_eq!(scene.viewport.width, 768.0);
            }
            other => panic!("unexpected panel {other:?}"),
        }
    }

    #[test]
    fn test_chart_view_rebuilds_only_on_change() {
        let data = dataset();
        let mut view = ChartView::new("AAPL", ColorScale::default());
        let viewport = Viewport::default();

        assert!(view.update(&data, viewport).unwrap());
        assert!(!view.update(&data, viewport).unwrap());
        assert!(view.update(&data, Viewport::new(1000.0, 700.0)).unwrap());

        // same contents, new allocation: a new dataset from a new fetch
        let refetched: Arc<[OptionContract]> = data.to_vec().into();
        assert!(view.update(&refetched, Viewport::new(1000.0, 700.0)).unwrap());
    }

    #[test]
    fn test_rebuild_clears_hover() {
        let data = dataset();
        let mut view = ChartView::new("AAPL", ColorScale::default());
        view.update(&data, Viewport::default()).unwrap();
        view.pointer_enter(0, 1.0, 1.0);
        assert_eq!(view.interaction().emphasized(), Some(0));

        view.update(&data, Viewport::new(900.0, 650.0)).unwrap();
        assert!(view.interaction().hover().is_none());
    }

    #[test]
    fn test_svg_includes_tooltip_when_hovering() {
        let data = dataset();
        let mut view = ChartView::new("AAPL", ColorScale::default());
        assert!(view.to_svg(Frame::Final).is_none());

        view.update(&data, Viewport::default()).unwrap();
        let plain = view.to_svg(Frame::Final).unwrap();
        view.pointer_enter(0, 1.0, 1.0);
        let hovered = view.to_svg(Frame::Final).unwrap();

        assert!(!plain.contains("$150"));
        assert!(hovered.contains("$150"));
        assert!(hovered.contains("T150"));
    }

    #[test]
    fn test_pointer_events_without_scene() {
        let mut view = ChartView::new("AAPL", ColorScale::default());
        assert!(view.pointer_move(10.0, 10.0).is_empty());
        assert!(view.pointer_enter(0, 0.0, 0.0).is_empty());
    }
}
