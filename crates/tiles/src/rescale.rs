use std::fmt;

use serde::{Deserialize, Serialize};

/// Display stretch half-width in standard deviations.
const STRETCH_SIGMA: f64 = 2.0;

/// Linear contrast range sent to the tile service as `low,high`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescaleRange {
    pub low: f64,
    pub high: f64,
}

impl RescaleRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Stretch covering mean ± 2σ of a band.
    pub fn from_stats(mean: f64, stddev: f64) -> Self {
        Self {
            low: mean - STRETCH_SIGMA * stddev,
            high: mean + STRETCH_SIGMA * stddev,
        }
    }
}

impl fmt::Display for RescaleRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.low, self.high)
    }
}

#[cfg(test)]
mod tests {
    use super::RescaleRange;

    #[test]
    fn from_stats_covers_two_sigma() {
        let r = RescaleRange::from_stats(101.0, 40.0);
        assert_eq!(r, RescaleRange::new(21.0, 181.0));
    }

    #[test]
    fn displays_as_comma_pair() {
        assert_eq!(RescaleRange::new(21.0, 181.0).to_string(), "21,181");
        assert_eq!(RescaleRange::new(0.5, 1.25).to_string(), "0.5,1.25");
    }
}
