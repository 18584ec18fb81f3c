//! Scatter rendering module
//!
//! Composes a [`Scene`]: grid, axes, labels, title, one circle per contract
//! and the two legends. A scene is always built from scratch for a dataset
//! and scale set; nothing is patched in place across re-renders.

mod animation;
mod axis;
mod legend;
mod svg;

pub use animation::{ease_cubic_in_out, Entrance, ENTRANCE_DURATION, ENTRANCE_STAGGER, HOVER_TRANSITION};
pub use axis::{Axis, AxisOrient, GridLine, Tick, DATE_TICK_FORMAT};
pub use legend::{SizeLegend, SizeLegendEntry, TypeLegendEntry};
pub use svg::{Frame, SvgOptions};

use crate::chain::OptionContract;
use crate::scale::{ScaleSet, Viewport};
use std::sync::Arc;
use std::time::Duration;

/// Opacity of a mark at rest
pub const RESTING_OPACITY: f64 = 0.7;
/// Opacity of the hovered mark
pub const HOVER_OPACITY: f64 = 1.0;
/// Outline of the hovered mark
pub const HOVER_STROKE: &str = "#1F2937";
pub const HOVER_STROKE_WIDTH: f64 = 2.0;

/// Visual state of a mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkStyle {
    pub opacity: f64,
    /// Outline color and width; `None` draws no outline
    pub stroke: Option<(&'static str, f64)>,
}

impl MarkStyle {
    pub const RESTING: MarkStyle = MarkStyle {
        opacity: RESTING_OPACITY,
        stroke: None,
    };

    pub const EMPHASIZED: MarkStyle = MarkStyle {
        opacity: HOVER_OPACITY,
        stroke: Some((HOVER_STROKE, HOVER_STROKE_WIDTH)),
    };
}

/// Text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A text element
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub font_weight: u16,
    pub fill: &'static str,
    pub anchor: TextAnchor,
    /// Rotation in degrees about the origin, applied before positioning
    pub rotate: Option<f64>,
}

/// One circle per contract, positioned relative to the plot origin
#[derive(Debug, Clone, PartialEq)]
pub struct Mark {
    /// Index of the contract in the scene's dataset
    pub index: usize,
    pub cx: f64,
    pub cy: f64,
    /// Radius once the entrance animation completes
    pub radius: f64,
    pub fill: String,
    pub entrance: Entrance,
}

impl Mark {
    /// Radius at `elapsed` since the scene was built
    pub fn radius_at(&self, elapsed: Duration) -> f64 {
        self.radius * self.entrance.progress(elapsed)
    }

    /// True if the local point lies on the mark at its target radius
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (dx, dy) = (x - self.cx, y - self.cy);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// A fully composed scatter plot
#[derive(Debug, Clone)]
pub struct Scene {
    pub viewport: Viewport,
    pub title: Label,
    pub grid: Vec<GridLine>,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub x_label: Label,
    pub y_label: Label,
    pub marks: Vec<Mark>,
    pub type_legend: Vec<TypeLegendEntry>,
    pub size_legend: SizeLegend,
    dataset: Arc<[OptionContract]>,
}

impl Scene {
    /// Compose a scene for a dataset and its scales
    pub fn build(dataset: Arc<[OptionContract]>, scales: &ScaleSet, underlying: &str) -> Self {
        let viewport = scales.viewport;
        let inner_width = viewport.inner_width();
        let inner_height = viewport.inner_height();

        let x_axis = axis::strike_axis(scales);
        let y_axis = axis::expiration_axis(scales);
        let grid = axis::grid_lines(&x_axis, &y_axis, inner_width, inner_height);

        let marks = dataset
            .iter()
            .enumerate()
            .map(|(index, contract)| {
                let (cx, cy) = scales.position(contract);
                Mark {
                    index,
                    cx,
                    cy,
                    radius: scales.radius_of(contract),
                    fill: scales.color.map(contract.contract_type).to_string(),
                    entrance: Entrance::for_index(index),
                }
            })
            .collect();

        let title = Label {
            text: format!("{underlying} Options Chain Visualization"),
            x: viewport.width / 2.0,
            y: 25.0,
            font_size: 18.0,
            font_weight: 700,
            fill: "#111827",
            anchor: TextAnchor::Middle,
            rotate: None,
        };
        let x_label = Label {
            text: "Strike Price ($)".to_string(),
            x: inner_width / 2.0,
            y: inner_height + 50.0,
            font_size: 14.0,
            font_weight: 600,
            fill: "#1F2937",
            anchor: TextAnchor::Middle,
            rotate: None,
        };
        let y_label = Label {
            text: "Expiration Date".to_string(),
            x: -inner_height / 2.0,
            y: -50.0,
            font_size: 14.0,
            font_weight: 600,
            fill: "#1F2937",
            anchor: TextAnchor::Middle,
            rotate: Some(-90.0),
        };

        tracing::debug!(
            marks = dataset.len(),
            width = viewport.width,
            height = viewport.height,
            "Built scatter scene"
        );

        Self {
            viewport,
            title,
            grid,
            x_axis,
            y_axis,
            x_label,
            y_label,
            marks,
            type_legend: legend::type_legend(scales),
            size_legend: legend::size_legend(scales),
            dataset,
        }
    }

    /// Contracts the scene was built from, in mark order
    pub fn dataset(&self) -> &Arc<[OptionContract]> {
        &self.dataset
    }

    pub fn contract(&self, mark: usize) -> Option<&OptionContract> {
        self.dataset.get(mark)
    }

    pub fn mark(&self, index: usize) -> Option<&Mark> {
        self.marks.get(index)
    }

    /// Translation of the plot area inside the surface
    pub fn plot_origin(&self) -> (f64, f64) {
        self.viewport.plot_origin()
    }

    /// Topmost mark under a point in plot coordinates.
    ///
    /// Marks are hit-tested at their target radius, so they are interactive
    /// before the entrance animation finishes.
    pub fn mark_at(&self, x: f64, y: f64) -> Option<usize> {
        self.marks
            .iter()
            .rev()
            .find(|mark| mark.contains(x, y))
            .map(|mark| mark.index)
    }

    /// Time after which every mark has reached its target radius
    pub fn entrance_complete_at(&self) -> Duration {
        self.marks
            .iter()
            .map(|m| m.entrance.ends_at())
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
