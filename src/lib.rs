//! options-scatter: options chain scatter plot
//!
//! This library provides the core components for:
//! - Fetching an options chain from the options reference API
//! - Normalizing loosely-typed contract records
//! - Deriving strike, expiration, open-interest and type scales
//! - Composing the scatter scene and serializing it to SVG
//! - Hover tracking and tooltip content
//! - Dashboard panel selection and stat cards
//! - Logging and metrics

pub mod chain;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod interaction;
pub mod polygon;
pub mod render;
pub mod scale;
pub mod telemetry;
