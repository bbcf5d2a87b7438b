use eframe::egui;

use crate::state::DashboardState;
use crate::ui::{panels, plot};

const PIE_HEIGHT: f32 = 320.0;
const SCATTER_HEIGHT: f32 = 340.0;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: DashboardState,
    /// Text typed into the site selector's filter box.
    site_query: String,
}

impl DashboardApp {
    pub fn new(state: DashboardState) -> Self {
        Self {
            state,
            site_query: String::new(),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and summary ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: site and payload controls ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &mut self.site_query);
            });

        // ---- Central panel: both charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    plot::proportion_pie(ui, &self.state, PIE_HEIGHT);
                    ui.separator();
                    plot::correlation_scatter(ui, &self.state, SCATTER_HEIGHT);
                    ui.separator();
                    plot::points_table(ui, &self.state);
                });
        });
    }
}
