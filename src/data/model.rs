use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Outcome – the binary `class` column
// ---------------------------------------------------------------------------

/// Launch outcome as recorded in the `class` column (0 = failure, 1 = success).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(into = "u8")]
pub enum Outcome {
    Failure,
    Success,
}

impl Outcome {
    /// Parse a `class` cell. Accepts integer and float spellings of 0 and 1.
    pub fn from_class(raw: &str) -> Option<Self> {
        match raw.trim() {
            "0" => Some(Outcome::Failure),
            "1" => Some(Outcome::Success),
            other => match other.parse::<f64>().ok()? {
                v if v == 0.0 => Some(Outcome::Failure),
                v if v == 1.0 => Some(Outcome::Success),
                _ => None,
            },
        }
    }

    /// Numeric class value, also used as the scatter y coordinate.
    pub fn class(self) -> u8 {
        match self {
            Outcome::Failure => 0,
            Outcome::Success => 1,
        }
    }

    /// Human-friendly label for legends.
    pub fn label(self) -> &'static str {
        match self {
            Outcome::Failure => "Failure",
            Outcome::Success => "Success",
        }
    }
}

impl From<Outcome> for u8 {
    fn from(outcome: Outcome) -> u8 {
        outcome.class()
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.class())
    }
}

// ---------------------------------------------------------------------------
// LaunchRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single launch (one row of the source table).
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchRecord {
    pub launch_site: String,
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
    /// `Flight Number`, when the source carries it.
    pub flight_number: Option<u32>,
}

impl LaunchRecord {
    /// Record with only the required columns set.
    pub fn new(
        launch_site: impl Into<String>,
        payload_mass_kg: f64,
        outcome: Outcome,
        booster_version_category: impl Into<String>,
    ) -> Self {
        Self {
            launch_site: launch_site.into(),
            payload_mass_kg,
            outcome,
            booster_version_category: booster_version_category.into(),
            flight_number: None,
        }
    }
}

// ---------------------------------------------------------------------------
// PayloadBounds – derived scalars
// ---------------------------------------------------------------------------

/// Smallest and largest payload in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PayloadBounds {
    pub min: f64,
    pub max: f64,
}

impl PayloadBounds {
    /// Bounds over all records; `0..0` when there are none.
    pub fn from_records(records: &[LaunchRecord]) -> Self {
        let mut iter = records.iter().map(|r| r.payload_mass_kg);
        let Some(first) = iter.next() else {
            return Self::default();
        };
        iter.fold(Self { min: first, max: first }, |b, v| Self {
            min: b.min.min(v),
            max: b.max.max(v),
        })
    }
}

// ---------------------------------------------------------------------------
// LaunchDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed derived values.
///
/// Built once at startup and shared read-only by everything else.
#[derive(Debug, Clone, Default)]
pub struct LaunchDataset {
    /// All launches, in source order.
    pub records: Vec<LaunchRecord>,
    /// Payload min/max over `records`.
    pub bounds: PayloadBounds,
    /// Distinct launch sites in order of first appearance.
    pub sites: Vec<String>,
    /// Where the records were loaded from.
    pub source: String,
}

impl LaunchDataset {
    /// Build derived values from the loaded records.
    pub fn from_records(records: Vec<LaunchRecord>, source: impl Into<String>) -> Self {
        let mut seen = BTreeSet::new();
        let sites = records
            .iter()
            .filter(|r| seen.insert(r.launch_site.as_str()))
            .map(|r| r.launch_site.clone())
            .collect();
        let bounds = PayloadBounds::from_records(&records);

        LaunchDataset {
            records,
            bounds,
            sites,
            source: source.into(),
        }
    }

    /// Number of launches.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct booster categories, used to assign stable colours.
    pub fn booster_categories(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .map(|r| r.booster_version_category.clone())
            .collect()
    }
}
