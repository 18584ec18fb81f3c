//! Type and open-interest legends

use crate::chain::ContractType;
use crate::scale::ScaleSet;

/// Legends sit this far left of the right edge of the surface
pub const LEGEND_INSET: f64 = 150.0;
/// Vertical position of the type legend
pub const TYPE_LEGEND_TOP: f64 = 50.0;
/// Vertical position of the size legend
pub const SIZE_LEGEND_TOP: f64 = 120.0;
/// Row spacing in the type legend
pub const TYPE_LEGEND_ROW: f64 = 25.0;
/// Row spacing in the size legend
pub const SIZE_LEGEND_ROW: f64 = 20.0;
/// Swatch radius in the type legend
pub const SWATCH_RADIUS: f64 = 8.0;
/// Fractions of the maximum open interest shown in the size legend
pub const SIZE_LEGEND_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// One swatch of the type legend
#[derive(Debug, Clone, PartialEq)]
pub struct TypeLegendEntry {
    pub contract_type: ContractType,
    pub color: String,
    pub label: &'static str,
    /// Center of the swatch in surface coordinates
    pub center: (f64, f64),
}

/// One representative circle of the size legend
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegendEntry {
    pub value: f64,
    pub radius: f64,
    pub label: String,
    /// Center of the circle in surface coordinates
    pub center: (f64, f64),
}

/// Open-interest legend
#[derive(Debug, Clone, PartialEq)]
pub struct SizeLegend {
    pub title: &'static str,
    /// Title anchor in surface coordinates
    pub title_at: (f64, f64),
    pub entries: Vec<SizeLegendEntry>,
}

/// Call and put swatches
pub fn type_legend(scales: &ScaleSet) -> Vec<TypeLegendEntry> {
    let left = scales.viewport.width - LEGEND_INSET;
    [(ContractType::Call, "Calls"), (ContractType::Put, "Puts")]
        .into_iter()
        .enumerate()
        .map(|(i, (contract_type, label))| TypeLegendEntry {
            contract_type,
            color: scales.color.map(contract_type).to_string(),
            label,
            center: (left, TYPE_LEGEND_TOP + i as f64 * TYPE_LEGEND_ROW),
        })
        .collect()
}

/// Circles at 25/50/75/100% of the observed maximum open interest
pub fn size_legend(scales: &ScaleSet) -> SizeLegend {
    let left = scales.viewport.width - LEGEND_INSET;
    let max = scales.max_open_interest();

    let entries = SIZE_LEGEND_FRACTIONS
        .iter()
        .enumerate()
        .map(|(i, fraction)| {
            let value = max * fraction;
            SizeLegendEntry {
                value,
                radius: scales.radius.map(value),
                label: format!("{value:.0}"),
                center: (left, SIZE_LEGEND_TOP + i as f64 * SIZE_LEGEND_ROW + 10.0),
            }
        })
        .collect();

    SizeLegend {
        title: "Open Interest",
        title_at: (left, SIZE_LEGEND_TOP - 10.0),
        entries,
    }
}
