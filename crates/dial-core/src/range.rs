//! Value/bounds model backing a dial: a clamped or auto-expanding range plus
//! the labelled display intervals painted onto the scale.

use crate::paint::{Color, Paint};

/// Inclusive numeric range of a display interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub lower: f64,
    pub upper: f64,
}

impl Range {
    pub fn new(lower: f64, upper: f64) -> Self {
        debug_assert!(lower <= upper, "inverted range");
        Range { lower, upper }
    }
}

/// Labelled sub-range of the dial scale with its own outline and fill.
///
/// Intervals are advisory painting zones: they are not required to be
/// disjoint or to tile the dial's overall range.
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    pub label: String,
    pub range: Range,
    pub outline: Color,
    pub outline_width: f32,
    pub fill: Option<Paint>,
}

/// Holds the live value, the display bounds, and the interval list, and keeps
/// them mutually consistent on every mutation.
///
/// The `range_limited` flag selects the consistency policy and is fixed
/// configuration rather than transitioning state: in clamped mode
/// (`range_limited = true`) out-of-range values are clamped and the bounds
/// never move; in auto-expand mode a violated bound is widened to admit the
/// new value exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeModel {
    value: f64,
    minimum: f64,
    maximum: f64,
    range_limited: bool,
    intervals: Vec<Interval>,
}

impl RangeModel {
    pub fn new(value: f64, minimum: f64, maximum: f64, range_limited: bool) -> Self {
        debug_assert!(minimum <= maximum, "inverted bounds");
        RangeModel {
            value,
            minimum,
            maximum,
            range_limited,
            intervals: Vec::new(),
        }
    }

    /// Model with no meaningful bounds yet: the widest sentinel pair in
    /// auto-expand mode. Bounds are expected to be supplied later, either
    /// explicitly, by [`derive_min_max`](Self::derive_min_max), or by the
    /// first interval.
    pub fn unbounded(value: f64) -> Self {
        RangeModel::new(value, f64::MIN_POSITIVE, f64::MAX, false)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn range_limited(&self) -> bool {
        self.range_limited
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn set_range_limited(&mut self, range_limited: bool) {
        self.range_limited = range_limited;
    }

    /// Replace both bounds, e.g. with explicit values from a data row.
    pub fn set_bounds(&mut self, minimum: f64, maximum: f64) {
        debug_assert!(minimum <= maximum, "inverted bounds");
        self.minimum = minimum;
        self.maximum = maximum;
    }

    /// Set the displayed value.
    ///
    /// Clamped mode keeps the bounds and clamps the value; auto-expand mode
    /// keeps the value and widens the violated bound.
    pub fn set_value(&mut self, value: f64) {
        debug_assert!(value.is_finite(), "non-finite dial value");
        if self.range_limited {
            self.value = value.clamp(self.minimum, self.maximum);
        } else {
            self.value = value;
            if value < self.minimum {
                self.minimum = value;
            } else if value > self.maximum {
                self.maximum = value;
            }
        }
    }

    /// Derive display bounds from a single observed value.
    ///
    /// Only runs in clamped mode; in auto-expand mode whatever bounds the
    /// model already carries stand. The upper bound starts at 0.1 and grows
    /// through a fixed multiplicative schedule (x2, then x2.5, then x2 per
    /// round) until it covers `|value|`; the exact schedule is a behavioral
    /// contract, not an approximation. The lower bound is 0 for non-negative
    /// values and the mirrored `-max` otherwise.
    pub fn derive_min_max(&mut self, value: f64) {
        if !self.range_limited {
            return;
        }
        let mut max = 0.1;
        let abs = value.abs();
        while max < abs {
            max *= 2.0;
            if max < abs {
                max *= 2.5;
            }
            if max < abs {
                max *= 2.0;
            }
        }
        self.minimum = if value >= 0.0 { 0.0 } else { -max };
        self.maximum = max;
    }

    /// Append an interval, in document order.
    ///
    /// In clamped mode the first interval seeds the bounds outright; after
    /// that (and always in auto-expand mode) bounds only ever widen to cover
    /// the interval, never narrow.
    pub fn add_interval(&mut self, interval: Interval) {
        let Range { lower, upper } = interval.range;
        self.intervals.push(interval);
        if self.range_limited && self.intervals.len() == 1 {
            self.minimum = lower;
            self.maximum = upper;
        } else {
            if lower < self.minimum {
                self.minimum = lower;
            }
            if upper > self.maximum {
                self.maximum = upper;
            }
        }
    }
}
