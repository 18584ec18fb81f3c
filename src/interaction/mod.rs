//! Pointer interaction module
//!
//! Tracks which mark the pointer is over and publishes the hovered contract
//! with its coordinates for tooltip display. The layer never touches the
//! dataset; it only emits style changes for the renderer's host to apply.

mod tooltip;

pub use tooltip::{format_thousands, Tooltip};

use crate::chain::OptionContract;
use crate::render::{MarkStyle, Scene, HOVER_TRANSITION};
use std::time::Duration;

/// The single active hover entry
#[derive(Debug, Clone, PartialEq)]
pub struct HoverState {
    /// Hovered mark index
    pub mark: usize,
    /// Pointer position relative to the surface (plot position plus margins)
    pub screen_x: f64,
    pub screen_y: f64,
    /// Pointer position relative to the plot's drawing origin
    pub local_x: f64,
    pub local_y: f64,
    pub contract: OptionContract,
}

/// A style transition the host should apply to one mark
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleChange {
    pub mark: usize,
    pub style: MarkStyle,
    pub transition: Duration,
}

impl StyleChange {
    fn restore(mark: usize) -> Self {
        Self {
            mark,
            style: MarkStyle::RESTING,
            transition: HOVER_TRANSITION,
        }
    }

    fn emphasize(mark: usize) -> Self {
        Self {
            mark,
            style: MarkStyle::EMPHASIZED,
            transition: HOVER_TRANSITION,
        }
    }
}

/// Hover tracking for one scene
///
/// At most one mark is emphasized at any time. Changes are returned in the
/// order they must be applied: a restore of the previous mark always
/// precedes the emphasis of the next one.
#[derive(Debug, Clone, Default)]
pub struct InteractionLayer {
    hovered: Option<HoverState>,
}

impl InteractionLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently published hover state
    pub fn hover(&self) -> Option<&HoverState> {
        self.hovered.as_ref()
    }

    /// Index of the emphasized mark, if any
    pub fn emphasized(&self) -> Option<usize> {
        self.hovered.as_ref().map(|h| h.mark)
    }

    /// Resting or emphasized style for a mark
    pub fn style_of(&self, mark: usize) -> MarkStyle {
        if self.emphasized() == Some(mark) {
            MarkStyle::EMPHASIZED
        } else {
            MarkStyle::RESTING
        }
    }

    /// Pointer entered `mark` at a position relative to the plot origin
    pub fn pointer_enter(
        &mut self,
        scene: &Scene,
        mark: usize,
        local_x: f64,
        local_y: f64,
    ) -> Vec<StyleChange> {
        let Some(contract) = scene.contract(mark) else {
            tracing::trace!(mark, "Pointer enter on unknown mark ignored");
            return Vec::new();
        };

        let mut changes = Vec::with_capacity(2);
        match self.emphasized() {
            Some(current) if current == mark => {}
            Some(current) => {
                changes.push(StyleChange::restore(current));
                changes.push(StyleChange::emphasize(mark));
            }
            None => changes.push(StyleChange::emphasize(mark)),
        }

        let (origin_x, origin_y) = scene.plot_origin();
        self.hovered = Some(HoverState {
            mark,
            screen_x: local_x + origin_x,
            screen_y: local_y + origin_y,
            local_x,
            local_y,
            contract: contract.clone(),
        });

        tracing::trace!(mark, ticker = %contract.ticker, "Hover");
        changes
    }

    /// Pointer left `mark`. A leave for a mark that is not hovered is stale
    /// and ignored.
    pub fn pointer_leave(&mut self, mark: usize) -> Vec<StyleChange> {
        if self.emphasized() != Some(mark) {
            return Vec::new();
        }
        self.hovered = None;
        vec![StyleChange::restore(mark)]
    }

    /// Drive enter/leave from a raw pointer position in surface coordinates,
    /// for hosts that deliver motion rather than per-mark events
    pub fn pointer_move(&mut self, scene: &Scene, x: f64, y: f64) -> Vec<StyleChange> {
        let (origin_x, origin_y) = scene.plot_origin();
        let (local_x, local_y) = (x - origin_x, y - origin_y);

        match (self.emphasized(), scene.mark_at(local_x, local_y)) {
            (Some(current), Some(hit)) if current == hit => Vec::new(),
            (_, Some(hit)) => self.pointer_enter(scene, hit, local_x, local_y),
            (Some(current), None) => self.pointer_leave(current),
            (None, None) => Vec::new(),
        }
    }

    /// Drop hover state, e.g. when the scene is rebuilt
    pub fn reset(&mut self) -> Vec<StyleChange> {
        match self.hovered.take() {
            Some(hover) => vec![StyleChange::restore(hover.mark)],
            None => Vec::new(),
        }
    }

    /// Tooltip for the current hover
    pub fn tooltip(&self) -> Option<Tooltip> {
        self.hovered.as_ref().map(Tooltip::from_hover)
    }
}
