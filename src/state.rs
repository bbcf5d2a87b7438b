use std::sync::Arc;

use serde::Serialize;

use crate::color::ColorMap;
use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::model::LaunchDataset;
use crate::data::view::{correlation_view, proportion_view, CorrelationChart, ProportionChart};

// ---------------------------------------------------------------------------
// Selection inputs and events
// ---------------------------------------------------------------------------

/// One user-controlled input a chart can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Site,
    PayloadRange,
}

/// Inputs the pie chart is computed from.
pub const PROPORTION_INPUTS: &[Input] = &[Input::Site];

/// Inputs the scatter chart is computed from.
pub const CORRELATION_INPUTS: &[Input] = &[Input::Site, Input::PayloadRange];

/// Current values of the two controls.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Selection {
    pub site: SiteSelection,
    pub payload: PayloadRange,
}

/// A change coming from one of the controls.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    SiteChanged(SiteSelection),
    PayloadRangeChanged(PayloadRange),
}

// ---------------------------------------------------------------------------
// Dashboard state
// ---------------------------------------------------------------------------

/// A chart together with how many times it has been recomputed.
#[derive(Debug, Clone)]
pub struct Computed<T> {
    pub chart: T,
    pub revision: u64,
}

impl<T> Computed<T> {
    fn new(chart: T) -> Self {
        Self { chart, revision: 0 }
    }

    fn replace(&mut self, chart: T) {
        self.chart = chart;
        self.revision += 1;
    }
}

/// The full UI state, independent of rendering.
pub struct DashboardState {
    /// Loaded dataset, shared read-only.
    pub dataset: Arc<LaunchDataset>,

    pub selection: Selection,

    pub proportion: Computed<ProportionChart>,
    pub correlation: Computed<CorrelationChart>,

    /// Stable colour per launch site.
    pub site_colors: ColorMap,
    /// Stable colour per booster category.
    pub booster_colors: ColorMap,
}

impl DashboardState {
    /// Start with every site and the full payload span of the data.
    pub fn new(dataset: Arc<LaunchDataset>) -> Self {
        let payload = PayloadRange::new(dataset.bounds.min, dataset.bounds.max);
        Self::with_selection(
            dataset,
            Selection {
                site: SiteSelection::All,
                payload,
            },
        )
    }

    pub fn with_selection(dataset: Arc<LaunchDataset>, selection: Selection) -> Self {
        let proportion = proportion_view(&dataset.records, &selection.site);
        let correlation = correlation_view(&dataset.records, &selection.site, selection.payload);
        let site_colors = ColorMap::new(dataset.sites.iter().cloned().collect());
        let booster_colors = ColorMap::new(dataset.booster_categories());

        Self {
            dataset,
            selection,
            proportion: Computed::new(proportion),
            correlation: Computed::new(correlation),
            site_colors,
            booster_colors,
        }
    }

    /// Apply a control change and recompute every chart that depends on it.
    ///
    /// Returns the input that changed, or `None` for a no-op event.
    pub fn apply(&mut self, event: SelectionEvent) -> Option<Input> {
        let changed = match event {
            SelectionEvent::SiteChanged(site) if site != self.selection.site => {
                log::debug!("Site selection: {} -> {}", self.selection.site, site);
                self.selection.site = site;
                Input::Site
            }
            SelectionEvent::PayloadRangeChanged(range) if range != self.selection.payload => {
                log::debug!("Payload range: {}..{} kg", range.low(), range.high());
                self.selection.payload = range;
                Input::PayloadRange
            }
            _ => return None,
        };
        self.recompute(changed);
        Some(changed)
    }

    fn recompute(&mut self, changed: Input) {
        let records = &self.dataset.records;
        let sel = &self.selection;

        if PROPORTION_INPUTS.contains(&changed) {
            self.proportion.replace(proportion_view(records, &sel.site));
            log::debug!("Recomputed pie chart: {} slices", self.proportion.chart.slices.len());
        }
        if CORRELATION_INPUTS.contains(&changed) {
            self.correlation
                .replace(correlation_view(records, &sel.site, sel.payload));
            log::debug!("Recomputed scatter chart: {} points", self.correlation.chart.points.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;
    use crate::data::model::Outcome::{Failure, Success};

    fn state() -> DashboardState {
        DashboardState::new(Arc::new(LaunchDataset::from_records(
            vec![
                LaunchRecord::new("CCAFS", 500.0, Success, "v1.0"),
                LaunchRecord::new("CCAFS", 2000.0, Failure, "v1.0"),
                LaunchRecord::new("KSC", 3000.0, Success, "v1.1"),
            ],
            "memory",
        )))
    }

    #[test]
    fn starts_with_all_sites_and_data_bounds() {
        let st = state();
        assert_eq!(st.selection.site, SiteSelection::All);
        assert_eq!(st.selection.payload, PayloadRange::new(500.0, 3000.0));
        assert_eq!(st.proportion.chart.total(), 2);
        assert_eq!(st.correlation.chart.points.len(), 3);
    }

    #[test]
    fn range_change_only_recomputes_scatter() {
        let mut st = state();
        let pie_before = st.proportion.clone();

        let changed = st.apply(SelectionEvent::PayloadRangeChanged(PayloadRange::new(0.0, 2500.0)));
        assert_eq!(changed, Some(Input::PayloadRange));
        assert_eq!(st.proportion.revision, pie_before.revision);
        assert_eq!(st.proportion.chart, pie_before.chart);
        assert_eq!(st.correlation.revision, 1);
        assert_eq!(st.correlation.chart.points.len(), 2);
    }

    #[test]
    fn site_change_recomputes_both() {
        let mut st = state();
        st.apply(SelectionEvent::SiteChanged(SiteSelection::parse("KSC")));
        assert_eq!(st.proportion.revision, 1);
        assert_eq!(st.correlation.revision, 1);
        assert_eq!(st.proportion.chart.slices.len(), 1);
        assert_eq!(st.correlation.chart.points.len(), 1);
    }

    #[test]
    fn unchanged_values_are_ignored() {
        let mut st = state();
        assert_eq!(st.apply(SelectionEvent::SiteChanged(SiteSelection::All)), None);
        let same = st.selection.payload;
        assert_eq!(st.apply(SelectionEvent::PayloadRangeChanged(same)), None);
        assert_eq!(st.proportion.revision, 0);
        assert_eq!(st.correlation.revision, 0);
    }

    #[test]
    fn recomputation_matches_fresh_state() {
        let mut st = state();
        st.apply(SelectionEvent::SiteChanged(SiteSelection::parse("CCAFS")));
        st.apply(SelectionEvent::PayloadRangeChanged(PayloadRange::new(1000.0, 10_000.0)));

        let fresh = DashboardState::with_selection(st.dataset.clone(), st.selection.clone());
        assert_eq!(st.proportion.chart, fresh.proportion.chart);
        assert_eq!(st.correlation.chart, fresh.correlation.chart);
    }
}
