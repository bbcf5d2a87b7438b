use clap::Parser;

use crate::data::filter::{PayloadRange, SiteSelection};
use crate::data::loader::DEFAULT_SOURCE;
use crate::data::model::LaunchDataset;

/// Interactive launch records dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "launch-dash", version, about)]
pub struct Config {
    /// CSV, JSON or Parquet launch table: a local path or an http(s) URL.
    #[arg(long, env = "LAUNCH_DASH_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Initial launch site, or ALL.
    #[arg(long, default_value = "ALL")]
    pub site: String,

    /// Initial lower payload bound in kg (defaults to the dataset minimum).
    #[arg(long)]
    pub payload_low: Option<f64>,

    /// Initial upper payload bound in kg (defaults to the dataset maximum).
    #[arg(long)]
    pub payload_high: Option<f64>,

    /// Print both charts as JSON for the initial selection and exit.
    #[arg(long)]
    pub dump_json: bool,

    /// Initial window width.
    #[arg(long, default_value_t = 1200.0)]
    pub width: f32,

    /// Initial window height.
    #[arg(long, default_value_t = 900.0)]
    pub height: f32,
}

impl Config {
    pub fn site_selection(&self) -> SiteSelection {
        SiteSelection::parse(&self.site)
    }

    /// Requested payload range, with missing ends taken from the dataset bounds.
    pub fn payload_range(&self, dataset: &LaunchDataset) -> PayloadRange {
        PayloadRange::new(
            self.payload_low.unwrap_or(dataset.bounds.min),
            self.payload_high.unwrap_or(dataset.bounds.max),
        )
    }
}
