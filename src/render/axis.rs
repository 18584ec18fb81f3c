//! Axes and background grid

use crate::scale::{ScaleSet, TICK_COUNT};

/// Length of the outer tick marks
pub const TICK_SIZE: f64 = 6.0;
/// Gap between a tick mark and its label
pub const TICK_PADDING: f64 = 3.0;
/// Date format for expiration ticks
pub const DATE_TICK_FORMAT: &str = "%b %d, %Y";

/// Which side of the plot an axis sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Bottom,
    Left,
}

/// A labeled tick at an offset along its axis
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

/// An axis positioned relative to the plot origin
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub orient: AxisOrient,
    /// Translation of the axis line relative to the plot origin
    pub translate: (f64, f64),
    /// Range covered by the axis line
    pub range: [f64; 2],
    pub ticks: Vec<Tick>,
}

/// Dashed background line, in plot coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Strike axis along the bottom edge
pub fn strike_axis(scales: &ScaleSet) -> Axis {
    let ticks = scales
        .x
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|value| Tick {
            offset: scales.x.map(value),
            label: format!("{value:.0}"),
        })
        .collect();

    Axis {
        orient: AxisOrient::Bottom,
        translate: (0.0, scales.viewport.inner_height()),
        range: scales.x.range(),
        ticks,
    }
}

/// Expiration axis along the left edge
pub fn expiration_axis(scales: &ScaleSet) -> Axis {
    let ticks = scales
        .y
        .ticks(TICK_COUNT)
        .into_iter()
        .map(|date| Tick {
            offset: scales.y.map(date),
            label: date.format(DATE_TICK_FORMAT).to_string(),
        })
        .collect();

    Axis {
        orient: AxisOrient::Left,
        translate: (0.0, 0.0),
        range: scales.y.range(),
        ticks,
    }
}

/// Vertical lines at strike ticks and horizontal lines at expiration ticks,
/// spanning the whole plot area
pub fn grid_lines(x_axis: &Axis, y_axis: &Axis, inner_width: f64, inner_height: f64) -> Vec<GridLine> {
    let vertical = x_axis.ticks.iter().map(|tick| GridLine {
        x1: tick.offset,
        y1: 0.0,
        x2: tick.offset,
        y2: inner_height,
    });
    let horizontal = y_axis.ticks.iter().map(|tick| GridLine {
        x1: 0.0,
        y1: tick.offset,
        x2: inner_width,
        y2: tick.offset,
    });
    vertical.chain(horizontal).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ContractType, Greeks, OptionContract};
    use crate::scale::{ColorScale, Viewport};
    use chrono::NaiveDate;

    fn scales() -> ScaleSet {
        let make = |strike: f64, expiry: (i32, u32, u32)| OptionContract {
            underlying_ticker: "AAPL".to_string(),
            contract_type: ContractType::Put,
            expiration_date: NaiveDate::from_ymd_opt(expiry.0, expiry.1, expiry.2).unwrap(),
            strike_price: strike,
            open_interest: 1,
            open_interest_reported: true,
            ticker: String::new(),
            greeks: Greeks::default(),
        };
        let contracts = vec![make(100.0, (2025, 6, 1)), make(110.0, (2025, 6, 11))];
        ScaleSet::build(&contracts, Viewport::default(), ColorScale::default()).unwrap()
    }

    #[test]
    fn test_strike_axis_ticks() {
        let axis = strike_axis(&scales());
        assert_eq!(axis.orient, AxisOrient::Bottom);
        assert_eq!(axis.translate, (0.0, 480.0));
        assert_eq!(axis.ticks.len(), 11);
        assert_eq!(axis.ticks[0].label, "100");
        assert_eq!(axis.ticks[0].offset, 0.0);
        assert_eq!(axis.ticks[10].label, "110");
        assert_eq!(axis.ticks[10].offset, 680.0);
    }

    #[test]
    fn test_expiration_axis_ticks() {
        let axis = expiration_axis(&scales());
        assert_eq!(axis.orient, AxisOrient::Left);
        assert_eq!(axis.ticks.first().map(|t| t.label.as_str()), Some("Jun 01, 2025"));
        assert_eq!(axis.ticks.first().map(|t| t.offset), Some(480.0));
        assert_eq!(axis.ticks.last().map(|t| t.label.as_str()), Some("Jun 11, 2025"));
        assert_eq!(axis.ticks.last().map(|t| t.offset), Some(0.0));
    }

    #[test]
    fn test_grid_spans_plot() {
        let scales = scales();
        let x_axis = strike_axis(&scales);
        let y_axis = expiration_axis(&scales);
        let grid = grid_lines(&x_axis, &y_axis, 680.0, 480.0);
        assert_eq!(grid.len(), x_axis.ticks.len() + y_axis.ticks.len());
        assert!(grid.iter().all(|l| l.x1 == l.x2 || l.y1 == l.y2));
        assert!(grid.iter().any(|l| l.y2 == 480.0 && l.x1 == l.x2));
        assert!(grid.iter().any(|l| l.x2 == 680.0 && l.y1 == l.y2));
    }
}
