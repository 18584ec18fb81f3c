//! Tooltip content for the hovered contract

use super::HoverState;
use crate::chain::ContractType;

/// Tooltip offset from the pointer
const OFFSET_X: f64 = 10.0;
const OFFSET_Y: f64 = -10.0;

/// Tooltip box anchored by its bottom-left corner, in surface coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub left: f64,
    pub top: f64,
    /// Contract ticker
    pub title: String,
    /// Name/value rows
    pub lines: Vec<(String, String)>,
}

impl Tooltip {
    pub fn from_hover(hover: &HoverState) -> Self {
        let contract = &hover.contract;

        let kind = match contract.contract_type {
            ContractType::Call => "Call",
            ContractType::Put => "Put",
        };
        let open_interest = if contract.open_interest_reported {
            format_thousands(contract.open_interest)
        } else {
            "Not reported".to_string()
        };

        let mut lines = vec![
            ("Type".to_string(), kind.to_string()),
            ("Strike".to_string(), format!("${}", contract.strike_price)),
            (
                "Expires".to_string(),
                contract.expiration_date.format("%-m/%-d/%Y").to_string(),
            ),
            ("Open Interest".to_string(), open_interest),
        ];

        let greeks = &contract.greeks;
        if let Some(iv) = greeks.implied_volatility {
            lines.push(("IV".to_string(), format!("{:.1}%", iv * 100.0)));
        }
        for (name, value) in [
            ("Delta", greeks.delta),
            ("Gamma", greeks.gamma),
            ("Theta", greeks.theta),
            ("Vega", greeks.vega),
        ] {
            if let Some(value) = value {
                lines.push((name.to_string(), format!("{value:.4}")));
            }
        }

        Self {
            left: hover.screen_x + OFFSET_X,
            top: hover.screen_y + OFFSET_Y,
            title: contract.ticker.clone(),
            lines,
        }
    }
}

/// Integer with comma thousands separators
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{Greeks, OptionContract};
    use chrono::NaiveDate;

    fn hover(reported: bool, greeks: Greeks) -> HoverState {
        HoverState {
            mark: 0,
            screen_x: 100.0,
            screen_y: 200.0,
            local_x: 20.0,
            local_y: 160.0,
            contract: OptionContract {
                underlying_ticker: "AAPL".to_string(),
                contract_type: ContractType::Call,
                expiration_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
                strike_price: 152.5,
                open_interest: if reported { 12_345 } else { 0 },
                open_interest_reported: reported,
                ticker: "O:AAPL250620C00152500".to_string(),
                greeks,
            },
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_tooltip_content() {
        let tooltip = Tooltip::from_hover(&hover(true, Greeks::default()));
        assert_eq!(tooltip.left, 110.0);
        assert_eq!(tooltip.top, 190.0);
        assert_eq!(tooltip.title, "O:AAPL250620C00152500");
        assert_eq!(
            tooltip.lines,
            vec![
                ("Type".to_string(), "Call".to_string()),
                ("Strike".to_string(), "$152.5".to_string()),
                ("Expires".to_string(), "6/20/2025".to_string()),
                ("Open Interest".to_string(), "12,345".to_string()),
            ]
        );
    }

    #[test]
    fn test_tooltip_missing_open_interest() {
        let tooltip = Tooltip::from_hover(&hover(false, Greeks::default()));
        assert_eq!(tooltip.lines[3].1, "Not reported");
    }

    #[test]
    fn test_tooltip_put_type() {
        let mut state = hover(true, Greeks::default());
        state.contract.contract_type = ContractType::Put;
        let tooltip = Tooltip::from_hover(&state);
        assert_eq!(tooltip.lines[0], ("Type".to_string(), "Put".to_string()));
    }

    #[test]
    fn test_tooltip_greeks() {
        let greeks = Greeks {
            implied_volatility: Some(0.284),
            delta: Some(0.51234),
            ..Default::default()
        };
        let tooltip = Tooltip::from_hover(&hover(true, greeks));
        assert_eq!(tooltip.lines.len(), 6);
        assert_eq!(tooltip.lines[4], ("IV".to_string(), "28.4%".to_string()));
        assert_eq!(tooltip.lines[5], ("Delta".to_string(), "0.5123".to_string()));
    }
}
