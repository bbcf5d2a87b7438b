use std::collections::HashMap;

use serde::Serialize;

use super::filter::{PayloadRange, SiteSelection};
use super::model::{LaunchRecord, Outcome};

// ---------------------------------------------------------------------------
// Chart data
// ---------------------------------------------------------------------------

/// One pie slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
}

/// Data behind the success-proportion pie chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProportionChart {
    pub title: String,
    pub slices: Vec<Slice>,
}

impl ProportionChart {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// One scatter point: a single launch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationPoint {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: String,
    /// Carried along for the record table; not plotted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<u32>,
}

impl From<&LaunchRecord> for CorrelationPoint {
    fn from(r: &LaunchRecord) -> Self {
        Self {
            payload_mass_kg: r.payload_mass_kg,
            outcome: r.outcome,
            booster_version_category: r.booster_version_category.clone(),
            flight_number: r.flight_number,
        }
    }
}

/// Data behind the payload/outcome scatter chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CorrelationChart {
    pub title: String,
    pub points: Vec<CorrelationPoint>,
}

impl CorrelationChart {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

/// Success proportions for the pie chart.
///
/// * `All`: successful launches counted per site. Sites without a single
///   success get no slice at all, since records are filtered before grouping.
/// * One site: that site's launches counted per outcome, labelled `"0"`/`"1"`.
///
/// Slices appear in order of first occurrence in the filtered records.
pub fn proportion_view(records: &[LaunchRecord], site: &SiteSelection) -> ProportionChart {
    match site {
        SiteSelection::All => ProportionChart {
            title: "Total Successful Launches By Site".to_string(),
            slices: count_in_order(
                records
                    .iter()
                    .filter(|r| r.outcome == Outcome::Success)
                    .map(|r| r.launch_site.clone()),
            ),
        },
        SiteSelection::Site(name) => ProportionChart {
            title: format!("Success vs Failure For Site {name}"),
            slices: count_in_order(
                records
                    .iter()
                    .filter(|r| site.matches(r))
                    .map(|r| r.outcome.to_string()),
            ),
        },
    }
}

/// Launches inside `range` (and at `site`, unless `All`) for the scatter chart.
///
/// No aggregation; input order is preserved.
pub fn correlation_view(
    records: &[LaunchRecord],
    site: &SiteSelection,
    range: PayloadRange,
) -> CorrelationChart {
    let title = match site {
        SiteSelection::All => "Correlation between Payload and success for all Sites".to_string(),
        SiteSelection::Site(name) => format!("Payload vs Success for site {name}"),
    };
    let points = records
        .iter()
        .filter(|r| range.contains(r.payload_mass_kg))
        .filter(|r| site.matches(r))
        .map(CorrelationPoint::from)
        .collect();

    CorrelationChart { title, points }
}

/// Group equal labels, keeping first-occurrence order.
fn count_in_order(labels: impl Iterator<Item = String>) -> Vec<Slice> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut slices: Vec<Slice> = Vec::new();
    for label in labels {
        match index.get(&label) {
            Some(&i) => slices[i].count += 1,
            None => {
                index.insert(label.clone(), slices.len());
                slices.push(Slice { label, count: 1 });
            }
        }
    }
    slices
}
