use eframe::egui::{self, Align2, FontId, RichText, Sense, Slider, Ui};

use crate::data::filter::{payload_ticks, PayloadRange, SiteSelection, PAYLOAD_DOMAIN, PAYLOAD_STEP};
use crate::state::{DashboardState, SelectionEvent};

// ---------------------------------------------------------------------------
// Left side panel – selection controls
// ---------------------------------------------------------------------------

/// Render the site selector and payload range controls.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState, site_query: &mut String) {
    ui.heading("Filters");
    ui.separator();

    ui.strong("Launch site");
    if let Some(site) = site_selector(ui, state, site_query) {
        state.apply(SelectionEvent::SiteChanged(site));
    }
    ui.add_space(12.0);

    ui.strong("Payload Mass (kg):");
    if let Some(range) = payload_sliders(ui, state.selection.payload) {
        state.apply(SelectionEvent::PayloadRangeChanged(range));
    }
}

/// Combo box with a type-to-filter box; returns the newly picked site.
fn site_selector(ui: &mut Ui, state: &DashboardState, query: &mut String) -> Option<SiteSelection> {
    let current = &state.selection.site;
    let selected_text = match current {
        SiteSelection::All => "All Sites".to_string(),
        SiteSelection::Site(s) => s.clone(),
    };
    let mut picked = None;

    egui::ComboBox::from_id_salt("site_selector")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            ui.add(egui::TextEdit::singleline(query).hint_text("Select a Launch Site Here"));

            if ui
                .selectable_label(*current == SiteSelection::All, "All Sites")
                .clicked()
            {
                picked = Some(SiteSelection::All);
            }

            let needle = query.trim().to_lowercase();
            for site in &state.dataset.sites {
                if !needle.is_empty() && !site.to_lowercase().contains(&needle) {
                    continue;
                }
                let is_current = matches!(current, SiteSelection::Site(s) if s == site);
                let text = RichText::new(site).color(state.site_colors.color_for(site));
                if ui.selectable_label(is_current, text).clicked() {
                    picked = Some(SiteSelection::Site(site.clone()));
                }
            }
        });

    picked
}

/// Two sliders over the fixed payload domain. The low end never passes the
/// high end: dragging one past the other pushes it along.
fn payload_sliders(ui: &mut Ui, current: PayloadRange) -> Option<PayloadRange> {
    let mut low = current.low();
    let mut high = current.high();

    let low_changed = ui
        .add(Slider::new(&mut low, PAYLOAD_DOMAIN).step_by(PAYLOAD_STEP).text("min"))
        .changed();
    let high_resp = ui.add(Slider::new(&mut high, PAYLOAD_DOMAIN).step_by(PAYLOAD_STEP).text("max"));
    let high_changed = high_resp.changed();
    tick_labels(ui, high_resp.rect.left());

    if low_changed && low > high {
        high = low;
    }
    if high_changed && high < low {
        low = high;
    }

    (low_changed || high_changed).then(|| PayloadRange::new(low, high).clamped_to_domain())
}

/// Labels every 2500 kg under the slider rail.
fn tick_labels(ui: &mut Ui, rail_left: f32) {
    let rail_width = ui.spacing().slider_width;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(rail_width, 14.0), Sense::hover());
    let (start, end) = (*PAYLOAD_DOMAIN.start(), *PAYLOAD_DOMAIN.end());
    let color = ui.visuals().weak_text_color();

    for t in payload_ticks() {
        let frac = ((t - start) / (end - start)) as f32;
        let pos = egui::pos2(rail_left + frac * rail_width, rect.center().y);
        ui.painter()
            .text(pos, Align2::CENTER_CENTER, format!("{t:.0}"), FontId::proportional(10.0), color);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and a one-line summary of what is on screen.
pub fn top_bar(ui: &mut Ui, state: &DashboardState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(RichText::new("SpaceX Launch Records Dashboard").size(28.0));
    });

    ui.horizontal(|ui: &mut Ui| {
        let ds = &state.dataset;
        ui.label(format!("{} launches from {} sites", ds.len(), ds.sites.len()));
        ui.separator();
        ui.label(format!(
            "site: {}, payload {:.0}..{:.0} kg, {} in scatter",
            state.selection.site,
            state.selection.payload.low(),
            state.selection.payload.high(),
            state.correlation.chart.points.len()
        ));
        ui.separator();
        ui.label(RichText::new(&ds.source).weak());
    });
}
