//! Continuous linear scale with nice domains and tick generation

/// Thresholds for picking 1, 2, 5 or 10 multiples of a power of ten
const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

/// Maximum refinement passes when nicing a domain
const NICE_MAX_ITER: usize = 10;

/// Linear map from a numeric domain to a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: [f64; 2],
    range: [f64; 2],
}

impl LinearScale {
    pub fn new(domain: [f64; 2], range: [f64; 2]) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> [f64; 2] {
        self.domain
    }

    pub fn range(&self) -> [f64; 2] {
        self.range
    }

    /// True when the domain has zero (or non-finite) width
    pub fn is_degenerate(&self) -> bool {
        let span = self.domain[1] - self.domain[0];
        span == 0.0 || !span.is_finite()
    }

    /// Map a domain value to the range.
    ///
    /// A degenerate domain maps every input to the middle of the range.
    pub fn map(&self, value: f64) -> f64 {
        let [r0, r1] = self.range;
        if self.is_degenerate() {
            return (r0 + r1) / 2.0;
        }
        let [d0, d1] = self.domain;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range value back to the domain
    pub fn invert(&self, position: f64) -> f64 {
        let [d0, d1] = self.domain;
        let [r0, r1] = self.range;
        if r1 == r0 || self.is_degenerate() {
            return (d0 + d1) / 2.0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to round tick boundaries.
    ///
    /// Repeats until the tick step stabilizes; a domain that does not
    /// converge, or a degenerate one, is left as is.
    pub fn nice(mut self, count: usize) -> Self {
        let [mut start, mut stop] = self.domain;
        let reversed = stop < start;
        if reversed {
            std::mem::swap(&mut start, &mut stop);
        }

        let mut prestep: Option<f64> = None;
        for _ in 0..NICE_MAX_ITER {
            let step = tick_increment(start, stop, count);
            if prestep == Some(step) {
                self.domain = if reversed { [stop, start] } else { [start, stop] };
                return self;
            } else if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            prestep = Some(step);
        }
        self
    }

    /// Round tick values covering the domain, approximately `count` of them
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain[0], self.domain[1], count)
    }
}

/// Tick values between `start` and `stop` at a 1-2-5 step
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc == 0.0 || !inc.is_finite() {
        return Vec::new();
    }

    let mut values: Vec<f64> = if inc > 0.0 {
        let i0 = (lo / inc).ceil() as i64;
        let i1 = (hi / inc).floor() as i64;
        (i0..=i1).map(|i| i as f64 * inc).collect()
    } else {
        let inc = -inc;
        let i0 = (lo * inc).ceil() as i64;
        let i1 = (hi * inc).floor() as i64;
        (i0..=i1).map(|i| i as f64 / inc).collect()
    };

    if stop < start {
        values.reverse();
    }
    values
}

/// Step between ticks as a signed power-of-ten multiple.
///
/// Positive values are the step itself; negative values are the reciprocal
/// of a fractional step (so -10 means 0.1), which keeps tick arithmetic
/// exact for small steps. Returns 0 for an empty or invalid interval.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let step = (stop - start) / count as f64;
    if !(step > 0.0) || !step.is_finite() {
        return 0.0;
    }

    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    if power < 0.0 {
        -(10f64.powf(-power)) / factor
    } else {
        factor * 10f64.powf(power)
    }
}

/// Unsigned 1-2-5 step for the given interval
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let step0 = (stop - start).abs() / count as f64;
    if !(step0 > 0.0) || !step0.is_finite() {
        return 0.0;
    }

    let mut step1 = 10f64.powf(step0.log10().floor());
    let error = step0 / step1;
    if error >= E10 {
        step1 *= 10.0;
    } else if error >= E5 {
        step1 *= 5.0;
    } else if error >= E2 {
        step1 *= 2.0;
    }

    if stop < start {
        -step1
    } else {
        step1
    }
}
