use crate::error::{ChartError, ChartResult};

/// Maps a numeric domain onto a pixel range.
///
/// Polar charts use it for the radial axis and the chord diagram for its
/// categorical x axis (category index → pixel).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        let span = domain_end - domain_start;
        if !span.is_finite() || span == 0.0 {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    /// Builds a scale that covers `values` and always includes zero.
    ///
    /// A degenerate extent (all zero, or no values) widens to `[0, 1]`.
    pub fn including_zero(values: impl IntoIterator<Item = f64>) -> ChartResult<Self> {
        let (mut min, mut max) = (0.0_f64, 0.0_f64);
        for value in values.into_iter().filter(|v| v.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        if min == max {
            max = min + 1.0;
        }
        Self::new(min, max)
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn map(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }
        let normalized = (value - self.domain_start) / (self.domain_end - self.domain_start);
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    /// Like `map`, but clamps the result into the configured range.
    pub fn map_clamped(self, value: f64) -> ChartResult<f64> {
        let mapped = self.map(value)?;
        let (lo, hi) = if self.range_start <= self.range_end {
            (self.range_start, self.range_end)
        } else {
            (self.range_end, self.range_start)
        };
        Ok(mapped.clamp(lo, hi))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        let span = self.range_end - self.range_start;
        if span == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a zero-width range".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Evenly spaced tick values across the domain, endpoints included.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.domain_start];
        }
        let step = (self.domain_end - self.domain_start) / (count - 1) as f64;
        (0..count)
            .map(|i| self.domain_start + step * i as f64)
            .collect()
    }
}
