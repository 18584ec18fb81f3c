//! Square-root scale for mark radii

use super::LinearScale;

/// Maps open interest to a circle radius so that circle *area* grows
/// linearly with the value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtScale {
    max_value: f64,
    inner: LinearScale,
}

impl SqrtScale {
    /// Domain `[0, max_value]`, range `[min_radius, max_radius]`
    pub fn new(max_value: f64, min_radius: f64, max_radius: f64) -> Self {
        let max_value = if max_value.is_finite() { max_value.max(0.0) } else { 0.0 };
        Self {
            max_value,
            inner: LinearScale::new([0.0, max_value.sqrt()], [min_radius, max_radius]),
        }
    }

    pub fn max_value(&self) -> f64 {
        self.max_value
    }

    pub fn range(&self) -> [f64; 2] {
        self.inner.range()
    }

    /// Radius for a value. With a zero maximum every value gets the minimum
    /// radius, so that zero open interest always draws the smallest mark.
    pub fn map(&self, value: f64) -> f64 {
        if self.inner.is_degenerate() {
            return self.inner.range()[0];
        }
        self.inner.map(value.max(0.0).sqrt())
    }
}
