mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use serde::Serialize;

use app::DashboardApp;
use config::Config;
use data::view::{CorrelationChart, ProportionChart};
use state::{DashboardState, Selection, SelectionEvent};

/// What `--dump-json` prints.
#[derive(Serialize)]
struct ChartDump<'a> {
    selection: &'a Selection,
    proportion: &'a ProportionChart,
    correlation: &'a CorrelationChart,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = Config::parse();

    let dataset = match data::loader::load(&config.source) {
        Ok(ds) => Arc::new(ds),
        Err(e) => {
            if e.is_unreachable() {
                log::error!("Launch data source is unreachable: {e}");
            } else {
                log::error!("Launch data could not be parsed: {e}");
            }
            return Err(e).with_context(|| format!("loading {}", config.source));
        }
    };

    let mut state = DashboardState::new(dataset.clone());
    state.apply(SelectionEvent::SiteChanged(config.site_selection()));
    state.apply(SelectionEvent::PayloadRangeChanged(config.payload_range(&dataset)));

    if config.dump_json {
        let dump = ChartDump {
            selection: &state.selection,
            proportion: &state.proportion.chart,
            correlation: &state.correlation.chart,
        };
        println!("{}", serde_json::to_string_pretty(&dump)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.width, config.height])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "SpaceX Launch Records Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window closed with error: {e}"))
}
