//! Sample chart data for the dashboard views.
//!
//! Series come from a seeded xorshift generator so server render and
//! hydration agree; the refresh control bumps the seed.

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;

/// Minimum value any sample point may take.
pub const SERIES_FLOOR: u32 = 10;

/// One headline metric card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Metric {
    pub title: &'static str,
    pub value: &'static str,
    /// Percent change versus the previous period.
    pub change: f64,
}

impl Metric {
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.change >= 0.0
    }
}

pub const METRICS: [Metric; 4] = [
    Metric { title: "Total Users", value: "2,543", change: 12.5 },
    Metric { title: "Revenue", value: "$45,231", change: 8.2 },
    Metric { title: "Conversion Rate", value: "3.6%", change: -2.3 },
    Metric { title: "Avg. Session", value: "2m 56s", change: 14.6 },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesKind {
    Users,
    Revenue,
    Conversion,
    Engagement,
}

impl SeriesKind {
    pub const ALL: [Self; 4] = [Self::Users, Self::Revenue, Self::Conversion, Self::Engagement];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Users => "Users",
            Self::Revenue => "Revenue",
            Self::Conversion => "Conversion",
            Self::Engagement => "Engagement",
        }
    }

    fn growing(self) -> bool {
        !matches!(self, Self::Conversion)
    }

    fn salt(self) -> u64 {
        match self {
            Self::Users => 1,
            Self::Revenue => 2,
            Self::Conversion => 3,
            Self::Engagement => 4,
        }
    }
}

struct XorShift(u64);

impl XorShift {
    fn new(seed: u64) -> Self {
        // xorshift has a fixed point at zero
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }

    fn next_below(&mut self, bound: u32) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        u32::try_from(x % u64::from(bound.max(1))).unwrap_or(0)
    }
}

/// A random walk of `points` values, never below [`SERIES_FLOOR`].
#[must_use]
pub fn series(kind: SeriesKind, seed: u64, points: usize) -> Vec<u32> {
    let mut rng = XorShift::new(seed ^ kind.salt());
    let mut value = i64::from(rng.next_below(100)) + 50;
    let mut out = Vec::with_capacity(points);
    for _ in 0..points {
        let step = if kind.growing() {
            i64::from(rng.next_below(15)) - 5
        } else {
            5 - i64::from(rng.next_below(10))
        };
        value = (value + step).max(i64::from(SERIES_FLOOR));
        out.push(u32::try_from(value).unwrap_or(u32::MAX));
    }
    out
}

/// Bar heights as a percentage of the series maximum.
#[must_use]
pub fn bar_heights(values: &[u32]) -> Vec<u32> {
    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return vec![0; values.len()];
    }
    values.iter().map(|v| v * 100 / max).collect()
}
