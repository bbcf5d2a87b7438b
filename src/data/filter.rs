use std::fmt;
use std::ops::RangeInclusive;

use serde::{Serialize, Serializer};

use super::model::LaunchRecord;

// ---------------------------------------------------------------------------
// Payload slider domain
// ---------------------------------------------------------------------------

/// Fixed domain of the payload range control, in kg.
pub const PAYLOAD_DOMAIN: RangeInclusive<f64> = 0.0..=10_000.0;

/// Slider step, in kg.
pub const PAYLOAD_STEP: f64 = 1_000.0;

/// Spacing of the labelled tick marks under the slider, in kg.
pub const PAYLOAD_TICK: f64 = 2_500.0;

/// Sentinel shown for the "every site" choice.
pub const ALL_SITES: &str = "ALL";

// ---------------------------------------------------------------------------
// Site selection
// ---------------------------------------------------------------------------

/// Which launch site the charts are restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SiteSelection {
    #[default]
    All,
    Site(String),
}

impl SiteSelection {
    /// Parse a selector value; `ALL` (any case) means every site.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case(ALL_SITES) {
            SiteSelection::All
        } else {
            SiteSelection::Site(raw.to_string())
        }
    }

    /// Whether a record belongs to the selection.
    pub fn matches(&self, record: &LaunchRecord) -> bool {
        match self {
            SiteSelection::All => true,
            SiteSelection::Site(site) => record.launch_site == *site,
        }
    }
}

impl fmt::Display for SiteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SiteSelection::All => write!(f, "{ALL_SITES}"),
            SiteSelection::Site(site) => write!(f, "{site}"),
        }
    }
}

impl Serialize for SiteSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Payload range
// ---------------------------------------------------------------------------

/// Inclusive payload interval. `low <= high` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadRange {
    low: f64,
    high: f64,
}

impl PayloadRange {
    /// Build a range from its two ends, in either order.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// The whole slider domain.
    pub fn full_domain() -> Self {
        Self::new(*PAYLOAD_DOMAIN.start(), *PAYLOAD_DOMAIN.end())
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    /// Both ends are inclusive.
    pub fn contains(&self, payload_mass_kg: f64) -> bool {
        self.low <= payload_mass_kg && payload_mass_kg <= self.high
    }

    /// Same range with both ends pulled into the slider domain.
    pub fn clamped_to_domain(&self) -> Self {
        let domain = Self::full_domain();
        Self::new(
            self.low.clamp(domain.low, domain.high),
            self.high.clamp(domain.low, domain.high),
        )
    }
}

/// Labelled tick positions under the payload slider: 0, 2500, ..., 10000.
pub fn payload_ticks() -> Vec<f64> {
    let end = *PAYLOAD_DOMAIN.end();
    let mut ticks = Vec::new();
    let mut t = *PAYLOAD_DOMAIN.start();
    while t <= end {
        ticks.push(t);
        t += PAYLOAD_TICK;
    }
    ticks
}
