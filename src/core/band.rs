/// Aggregates of one channel over one time bucket.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl Statistics {
    /// One standard deviation around the mean, clamped to the observed extremes.
    pub const fn band(&self) -> Band {
        Band {
            lower: (self.avg - self.std_dev).max(self.min),
            upper: (self.avg + self.std_dev).min(self.max),
        }
    }
}

/// Shaded spread region rendered behind a line series.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}
