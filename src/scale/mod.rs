//! Scale derivation module
//!
//! Builds the four mappings used to place marks: strike to x, expiration
//! to y, open interest to radius and contract type to color. A [`ScaleSet`]
//! is a pure function of the dataset extent and the viewport; it is rebuilt,
//! never mutated, whenever either changes.

mod color;
mod linear;
mod radius;
mod time;

pub use color::{ColorScale, CALL_COLOR, PUT_COLOR};
pub use linear::{tick_increment, tick_step, ticks, LinearScale};
pub use radius::SqrtScale;
pub use time::{TimeInterval, TimeScale};

use crate::chain::OptionContract;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest mark radius in pixels
pub const MIN_RADIUS: f64 = 2.0;
/// Largest mark radius in pixels
pub const MAX_RADIUS: f64 = 15.0;
/// Approximate tick count used for nicing and axes
pub const TICK_COUNT: usize = 10;

/// Scale construction errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    /// Scales need at least one contract to derive an extent
    #[error("Cannot build scales for an empty dataset")]
    EmptyDataset,
}

/// Space reserved around the plot area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            top: 40.0,
            right: 40.0,
            bottom: 80.0,
            left: 80.0,
        }
    }
}

/// Pixel dimensions of the rendering surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margins: Margins::default(),
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Plot width inside the margins, never negative
    pub fn inner_width(&self) -> f64 {
        (self.width - self.margins.left - self.margins.right).max(0.0)
    }

    /// Plot height inside the margins, never negative
    pub fn inner_height(&self) -> f64 {
        (self.height - self.margins.top - self.margins.bottom).max(0.0)
    }

    /// Translation of the plot's drawing origin inside the surface
    pub fn plot_origin(&self) -> (f64, f64) {
        (self.margins.left, self.margins.top)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// The four mappings for one dataset and viewport
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleSet {
    pub x: LinearScale,
    pub y: TimeScale,
    pub radius: SqrtScale,
    pub color: ColorScale,
    pub viewport: Viewport,
}

impl ScaleSet {
    /// Derive scales from the extent of a non-empty dataset
    pub fn build(
        contracts: &[OptionContract],
        viewport: Viewport,
        color: ColorScale,
    ) -> Result<Self, ScaleError> {
        let first = contracts.first().ok_or(ScaleError::EmptyDataset)?;

        let (mut min_strike, mut max_strike) = (first.strike_price, first.strike_price);
        let (mut min_expiry, mut max_expiry) = (first.expiration_date, first.expiration_date);
        let mut max_oi = 0u64;

        for contract in contracts {
            min_strike = min_strike.min(contract.strike_price);
            max_strike = max_strike.max(contract.strike_price);
            min_expiry = min_expiry.min(contract.expiration_date);
            max_expiry = max_expiry.max(contract.expiration_date);
            max_oi = max_oi.max(contract.open_interest);
        }

        let x = LinearScale::new([min_strike, max_strike], [0.0, viewport.inner_width()])
            .nice(TICK_COUNT);
        let y = TimeScale::new([min_expiry, max_expiry], [viewport.inner_height(), 0.0])
            .nice(TICK_COUNT);
        let radius = SqrtScale::new(max_oi as f64, MIN_RADIUS, MAX_RADIUS);

        tracing::trace!(
            x_domain = ?x.domain(),
            y_domain = ?y.domain(),
            max_open_interest = max_oi,
            "Built scale set"
        );

        Ok(Self {
            x,
            y,
            radius,
            color,
            viewport,
        })
    }

    /// Position of a contract's mark relative to the plot origin
    pub fn position(&self, contract: &OptionContract) -> (f64, f64) {
        (
            self.x.map(contract.strike_price),
            self.y.map(contract.expiration_date),
        )
    }

    /// Target radius of a contract's mark
    pub fn radius_of(&self, contract: &OptionContract) -> f64 {
        self.radius.map(contract.open_interest as f64)
    }

    /// Largest open interest in the dataset
    pub fn max_open_interest(&self) -> f64 {
        self.radius.max_value()
    }
}
