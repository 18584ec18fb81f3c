//! SVG serialization of a scene

use super::{Axis, AxisOrient, Label, MarkStyle, Scene, TextAnchor};
use super::axis::{TICK_PADDING, TICK_SIZE};
use super::legend::SWATCH_RADIUS;
use crate::interaction::Tooltip;
use std::fmt::{self, Write};
use std::time::Duration;

const AXIS_TEXT_FILL: &str = "#374151";
const GRID_DASH: &str = "2,2";
const GRID_OPACITY: f64 = 0.3;
const SIZE_SWATCH_FILL: &str = "#9CA3AF";
const SIZE_SWATCH_OPACITY: f64 = 0.6;
const TOOLTIP_WIDTH: f64 = 210.0;
const TOOLTIP_PADDING: f64 = 12.0;
const TOOLTIP_LINE: f64 = 16.0;

/// Which point of the entrance animation to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// Every mark at its target radius
    #[default]
    Final,
    /// Static snapshot at the given time since the scene was built
    At(Duration),
    /// Marks start at radius 0 and grow with SMIL animations
    Animated,
}

/// Options for one serialization pass
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgOptions<'a> {
    pub frame: Frame,
    /// Mark drawn with hover emphasis
    pub emphasized: Option<usize>,
    /// Tooltip overlay, in surface coordinates
    pub tooltip: Option<&'a Tooltip>,
}

impl Scene {
    /// Serialize to a standalone SVG document
    pub fn to_svg(&self, options: &SvgOptions<'_>) -> String {
        let mut out = String::with_capacity(256 * (self.marks.len() + 64));
        self.write_svg(&mut out, options).ok();
        out
    }

    /// Serialize into any formatter sink
    pub fn write_svg<W: Write>(&self, out: &mut W, options: &SvgOptions<'_>) -> fmt::Result {
        let (width, height) = (self.viewport.width, self.viewport.height);
        let (left, top) = self.plot_origin();

        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
            w = num(width),
            h = num(height),
        )?;
        writeln!(out, r#"<rect width="{}" height="{}" fill="white"/>"#, num(width), num(height))?;
        writeln!(out, r#"<g class="plot" transform="translate({},{})">"#, num(left), num(top))?;

        writeln!(
            out,
            r#"<g class="grid" stroke="currentColor" stroke-dasharray="{GRID_DASH}" opacity="{GRID_OPACITY}">"#
        )?;
        for line in &self.grid {
            writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                num(line.x1),
                num(line.y1),
                num(line.x2),
                num(line.y2)
            )?;
        }
        writeln!(out, "</g>")?;

        write_axis(out, &self.x_axis)?;
        write_axis(out, &self.y_axis)?;
        write_label(out, &self.x_label)?;
        write_label(out, &self.y_label)?;

        writeln!(out, r#"<g class="marks">"#)?;
        for mark in &self.marks {
            let style = if options.emphasized == Some(mark.index) {
                MarkStyle::EMPHASIZED
            } else {
                MarkStyle::RESTING
            };
            let radius = match options.frame {
                Frame::Final => mark.radius,
                Frame::At(elapsed) => mark.radius_at(elapsed),
                Frame::Animated => 0.0,
            };
            let ticker = self
                .contract(mark.index)
                .map(|c| escape(&c.ticker))
                .unwrap_or_default();

            write!(
                out,
                r#"<circle class="option-circle" data-index="{}" data-ticker="{}" cx="{}" cy="{}" r="{}" fill="{}" opacity="{}""#,
                mark.index,
                ticker,
                num(mark.cx),
                num(mark.cy),
                num(radius),
                escape(&mark.fill),
                style.opacity,
            )?;
            if let Some((stroke, stroke_width)) = style.stroke {
                write!(out, r#" stroke="{stroke}" stroke-width="{stroke_width}""#)?;
            }

            if options.frame == Frame::Animated {
                writeln!(out, r#" style="cursor:pointer">"#)?;
                writeln!(
                    out,
                    r#"<animate attributeName="r" from="0" to="{}" begin="{}ms" dur="{}ms" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="0.65 0 0.35 1"/>"#,
                    num(mark.radius),
                    mark.entrance.delay.as_millis(),
                    mark.entrance.duration.as_millis(),
                )?;
                writeln!(out, "</circle>")?;
            } else {
                writeln!(out, r#" style="cursor:pointer"/>"#)?;
            }
        }
        writeln!(out, "</g>")?;
        writeln!(out, "</g>")?;

        write_label(out, &self.title)?;

        writeln!(out, r#"<g class="legend">"#)?;
        for entry in &self.type_legend {
            let (x, y) = entry.center;
            writeln!(
                out,
                r#"<g class="legend-item" transform="translate({},{})"><circle r="{SWATCH_RADIUS}" fill="{}" opacity="0.7"/><text x="15" y="5" font-size="14" font-weight="500" fill="{AXIS_TEXT_FILL}">{}</text></g>"#,
                num(x),
                num(y),
                escape(&entry.color),
                entry.label,
            )?;
        }
        writeln!(out, "</g>")?;

        writeln!(out, r#"<g class="size-legend">"#)?;
        let (tx, ty) = self.size_legend.title_at;
        writeln!(
            out,
            r#"<text x="{}" y="{}" font-size="12" font-weight="600" fill="{AXIS_TEXT_FILL}">{}</text>"#,
            num(tx),
            num(ty),
            self.size_legend.title,
        )?;
        for entry in &self.size_legend.entries {
            let (x, y) = entry.center;
            writeln!(
                out,
                r##"<g class="size-legend-item" transform="translate({},{})"><circle r="{}" fill="{SIZE_SWATCH_FILL}" opacity="{SIZE_SWATCH_OPACITY}"/><text x="25" y="5" font-size="11" fill="#6B7280">{}</text></g>"##,
                num(x),
                num(y),
                num(entry.radius),
                escape(&entry.label),
            )?;
        }
        writeln!(out, "</g>")?;

        if let Some(tooltip) = options.tooltip {
            write_tooltip(out, tooltip)?;
        }

        writeln!(out, "</svg>")
    }
}

fn write_axis<W: Write>(out: &mut W, axis: &Axis) -> fmt::Result {
    let (tx, ty) = axis.translate;
    let [r0, r1] = axis.range;
    let class = match axis.orient {
        AxisOrient::Bottom => "x-axis",
        AxisOrient::Left => "y-axis",
    };

    writeln!(
        out,
        r#"<g class="{class}" transform="translate({},{})" fill="none" font-size="12">"#,
        num(tx),
        num(ty)
    )?;
    match axis.orient {
        AxisOrient::Bottom => writeln!(
            out,
            r#"<path class="domain" stroke="currentColor" d="M{},{TICK_SIZE}V0H{}V{TICK_SIZE}"/>"#,
            num(r0),
            num(r1)
        )?,
        AxisOrient::Left => writeln!(
            out,
            r#"<path class="domain" stroke="currentColor" d="M-{TICK_SIZE},{}H0V{}H-{TICK_SIZE}"/>"#,
            num(r0),
            num(r1)
        )?,
    }

    let label_offset = TICK_SIZE + TICK_PADDING;
    for tick in &axis.ticks {
        match axis.orient {
            AxisOrient::Bottom => writeln!(
                out,
                r#"<g class="tick" transform="translate({},0)"><line stroke="currentColor" y2="{TICK_SIZE}"/><text fill="{AXIS_TEXT_FILL}" y="{label_offset}" dy="0.71em" text-anchor="middle">{}</text></g>"#,
                num(tick.offset),
                escape(&tick.label)
            )?,
            AxisOrient::Left => writeln!(
                out,
                r#"<g class="tick" transform="translate(0,{})"><line stroke="currentColor" x2="-{TICK_SIZE}"/><text fill="{AXIS_TEXT_FILL}" x="-{label_offset}" dy="0.32em" text-anchor="end">{}</text></g>"#,
                num(tick.offset),
                escape(&tick.label)
            )?,
        }
    }
    writeln!(out, "</g>")
}

fn write_label<W: Write>(out: &mut W, label: &Label) -> fmt::Result {
    let anchor = match label.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    write!(out, "<text")?;
    if let Some(degrees) = label.rotate {
        write!(out, r#" transform="rotate({})""#, num(degrees))?;
    }
    writeln!(
        out,
        r#" x="{}" y="{}" text-anchor="{anchor}" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
        num(label.x),
        num(label.y),
        num(label.font_size),
        label.font_weight,
        label.fill,
        escape(&label.text)
    )
}

fn write_tooltip<W: Write>(out: &mut W, tooltip: &Tooltip) -> fmt::Result {
    let height = TOOLTIP_PADDING * 2.0 + TOOLTIP_LINE * (tooltip.lines.len() + 1) as f64;
    // anchored by its bottom-left corner
    let (x, y) = (tooltip.left, tooltip.top - height);

    writeln!(
        out,
        r#"<g class="tooltip" pointer-events="none" transform="translate({},{})">"#,
        num(x),
        num(y)
    )?;
    writeln!(
        out,
        r##"<rect width="{TOOLTIP_WIDTH}" height="{}" rx="8" fill="white" stroke="#E5E7EB"/>"##,
        num(height)
    )?;
    writeln!(
        out,
        r##"<text x="{TOOLTIP_PADDING}" y="{}" font-size="14" font-weight="600" fill="#111827">{}</text>"##,
        num(TOOLTIP_PADDING + TOOLTIP_LINE * 0.75),
        escape(&tooltip.title)
    )?;
    for (i, (name, value)) in tooltip.lines.iter().enumerate() {
        writeln!(
            out,
            r##"<text x="{TOOLTIP_PADDING}" y="{}" font-size="12" fill="#4B5563">{}: <tspan font-weight="500">{}</tspan></text>"##,
            num(TOOLTIP_PADDING + TOOLTIP_LINE * (i as f64 + 1.75)),
            escape(name),
            escape(value)
        )?;
    }
    writeln!(out, "</g>")
}

/// Compact number formatting: at most two decimals, no trailing zeros
fn num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ContractType, Greeks, OptionContract};
    use crate::scale::{ColorScale, ScaleSet, Viewport};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn scene() -> Scene {
        let make = |kind: ContractType, strike: f64, oi: u64, ticker: &str| OptionContract {
            underlying_ticker: "AAPL".to_string(),
            contract_type: kind,
            expiration_date: NaiveDate::from_ymd_opt(2025, 6, 20).unwrap(),
            strike_price: strike,
            open_interest: oi,
            open_interest_reported: true,
            ticker: ticker.to_string(),
            greeks: Greeks::default(),
        };
        let dataset: Arc<[OptionContract]> = vec![
            make(ContractType::Call, 150.0, 500, "O:AAPL250620C00150000"),
            make(ContractType::Put, 160.0, 0, "X<&>"),
        ]
        .into();
        let scales = ScaleSet::build(&dataset, Viewport::default(), ColorScale::default()).unwrap();
        Scene::build(dataset, &scales, "AAPL")
    }

    #[test]
    fn test_num_formatting() {
        assert_eq!(num(340.0), "340");
        assert_eq!(num(226.666666), "226.67");
        assert_eq!(num(-0.001), "0");
        assert_eq!(num(2.5), "2.5");
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
    }

    #[test]
    fn test_document_structure() {
        let svg = scene().to_svg(&SvgOptions::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches(r#"class="option-circle""#).count(), 2);
        assert!(svg.contains("AAPL Options Chain Visualization"));
        assert!(svg.contains("Strike Price ($)"));
        assert!(svg.contains("Expiration Date"));
        assert!(svg.contains("Open Interest"));
        assert!(svg.contains(">Calls<"));
        assert!(svg.contains(">Puts<"));
        assert!(svg.contains(r#"data-ticker="X&lt;&amp;&gt;""#));
        assert!(!svg.contains("<animate"));
        assert!(!svg.contains(r#"class="tooltip""#));
    }

    #[test]
    fn test_animated_frame_starts_at_zero() {
        let svg = scene().to_svg(&SvgOptions {
            frame: Frame::Animated,
            ..Default::default()
        });
        assert_eq!(svg.matches("<animate ").count(), 2);
        assert!(svg.contains(r#"begin="2ms""#));
        assert!(svg.contains(r#"dur="1000ms""#));
        assert!(svg.contains(r##"r="0" fill="#3B82F6""##));
    }

    #[test]
    fn test_emphasized_mark() {
        let svg = scene().to_svg(&SvgOptions {
            emphasized: Some(0),
            ..Default::default()
        });
        assert_eq!(svg.matches(r##"stroke="#1F2937""##).count(), 1);
        assert_eq!(svg.matches(r#"opacity="1" stroke="#).count(), 1);
    }

    #[test]
    fn test_tooltip_overlay() {
        let tooltip = Tooltip {
            left: 100.0,
            top: 200.0,
            title: "O:AAPL250620C00150000".to_string(),
            lines: vec![("Type".to_string(), "Call".to_string())],
        };
        let svg = scene().to_svg(&SvgOptions {
            tooltip: Some(&tooltip),
            ..Default::default()
        });
        assert!(svg.contains(r#"class="tooltip""#));
        assert!(svg.contains("Type: <tspan"));
    }
}
