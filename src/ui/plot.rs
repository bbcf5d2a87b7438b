use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::outcome_color;
use crate::data::filter::{SiteSelection, PAYLOAD_DOMAIN};
use crate::data::model::Outcome;
use crate::data::view::Slice;
use crate::state::DashboardState;

/// Wedges wider than this are split so every drawn polygon stays convex.
const MAX_WEDGE: f64 = FRAC_PI_2;
/// Arc segments per full turn.
const ARC_SEGMENTS: f64 = 96.0;

// ---------------------------------------------------------------------------
// Success pie chart
// ---------------------------------------------------------------------------

/// Render the proportion chart as a pie.
pub fn proportion_pie(ui: &mut Ui, state: &DashboardState, height: f32) {
    let chart = &state.proportion.chart;
    ui.strong(&chart.title);

    if chart.is_empty() {
        ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.label(RichText::new("No launches match this selection").weak());
            });
        });
        return;
    }

    let total = chart.total() as f64;

    Plot::new("proportion_pie")
        .height(height)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.1)
        .include_y(1.1)
        .show(ui, |plot_ui| {
            // Clockwise from twelve o'clock.
            let mut start = FRAC_PI_2;
            for slice in &chart.slices {
                let share = slice.count as f64 / total;
                let sweep = share * TAU;
                let (name, color) = slice_style(state, slice);
                let name = format!("{name}: {}", slice.count);

                for points in wedge(start, sweep) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(points))
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE))
                            .name(&name),
                    );
                }

                let mid = start - sweep / 2.0;
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                        RichText::new(format!("{:.1}%", share * 100.0)).strong(),
                    )
                    .color(Color32::WHITE),
                );
                start -= sweep;
            }
        });
}

/// Legend label and colour for a slice under the current site selection.
fn slice_style(state: &DashboardState, slice: &Slice) -> (String, Color32) {
    match state.selection.site {
        SiteSelection::All => (slice.label.clone(), state.site_colors.color_for(&slice.label)),
        SiteSelection::Site(_) => match Outcome::from_class(&slice.label) {
            Some(outcome) => (
                format!("{} ({})", outcome.label(), slice.label),
                outcome_color(outcome),
            ),
            None => (slice.label.clone(), Color32::GRAY),
        },
    }
}

/// Unit-circle wedge from angle `start` sweeping clockwise by `sweep`,
/// as one or more convex polygons.
fn wedge(start: f64, sweep: f64) -> Vec<Vec<[f64; 2]>> {
    let pieces = (sweep / MAX_WEDGE).ceil().max(1.0) as usize;
    let step = sweep / pieces as f64;

    (0..pieces)
        .map(|k| {
            let a0 = start - step * k as f64;
            let n = ((step / TAU) * ARC_SEGMENTS).ceil().max(1.0) as usize;
            let mut points = Vec::with_capacity(n + 2);
            points.push([0.0, 0.0]);
            for i in 0..=n {
                let a = a0 - step * i as f64 / n as f64;
                points.push([a.cos(), a.sin()]);
            }
            points
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Payload / outcome scatter chart
// ---------------------------------------------------------------------------

/// Render the correlation chart: one coloured series per booster category.
pub fn correlation_scatter(ui: &mut Ui, state: &DashboardState, height: f32) {
    let chart = &state.correlation.chart;
    ui.strong(&chart.title);

    let mut series: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for p in &chart.points {
        series
            .entry(p.booster_version_category.as_str())
            .or_default()
            .push([p.payload_mass_kg, p.outcome.class() as f64]);
    }

    Plot::new("correlation_scatter")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Payload Mass (kg)")
        .y_axis_label("class")
        .include_x(*PAYLOAD_DOMAIN.start())
        .include_x(*PAYLOAD_DOMAIN.end())
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (category, points) in series {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(category)
                        .color(state.booster_colors.color_for(category))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Launches currently in the scatter chart
// ---------------------------------------------------------------------------

/// Collapsible table listing the scatter chart's points.
pub fn points_table(ui: &mut Ui, state: &DashboardState) {
    let points = &state.correlation.chart.points;

    egui::CollapsingHeader::new(format!("Launches in view ({})", points.len()))
        .id_salt("points_table")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(240.0)
                .column(Column::auto().at_least(50.0))
                .column(Column::auto().at_least(140.0))
                .column(Column::auto().at_least(90.0))
                .column(Column::remainder())
                .header(20.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("Flight");
                    });
                    header.col(|ui: &mut Ui| {
                        ui.strong("Payload Mass (kg)");
                    });
                    header.col(|ui: &mut Ui| {
                        ui.strong("Outcome");
                    });
                    header.col(|ui: &mut Ui| {
                        ui.strong("Booster Version Category");
                    });
                })
                .body(|body| {
                    body.rows(18.0, points.len(), |mut row| {
                        let p = &points[row.index()];
                        row.col(|ui: &mut Ui| {
                            if let Some(n) = p.flight_number {
                                ui.label(n.to_string());
                            }
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(format!("{:.0}", p.payload_mass_kg));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(RichText::new(p.outcome.label()).color(outcome_color(p.outcome)));
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(&p.booster_version_category);
                        });
                    });
                });
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_cover_the_sweep_in_convex_pieces() {
        let pieces = wedge(FRAC_PI_2, TAU);
        assert_eq!(pieces.len(), 4);
        for piece in &pieces {
            assert_eq!(piece[0], [0.0, 0.0]);
            for p in &piece[1..] {
                let r = (p[0] * p[0] + p[1] * p[1]).sqrt();
                assert!((r - 1.0).abs() < 1e-9);
            }
        }
        let last = pieces[3].last().unwrap();
        assert!((last[0] - 0.0).abs() < 1e-9 && (last[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn tiny_slice_is_one_piece() {
        assert_eq!(wedge(0.0, 0.01).len(), 1);
    }
}
