use eframe::egui::{self, RichText, Ui};
use egui_plot::{Corner, HLine, Legend, Line, Plot, PlotBounds, PlotPoints};

use super::Action;
use crate::bounds::{AxisRange, ViewBounds};
use crate::color::{RESIDUAL_COLOR, ZERO_LINE_COLOR};
use crate::curves::{curve_points, plot_title, residual_points};
use crate::state::{Event, ViewerState};

/// Share of the central panel given to the spectrum plot.
const SPECTRUM_SHARE: f32 = 0.72;

// ---------------------------------------------------------------------------
// Spectrum + residual plots (central panel)
// ---------------------------------------------------------------------------

/// Render the spectrum plot with the residual plot underneath. Both share the
/// x axis and the vertical crosshair.
pub fn spectrum_plots(ui: &mut Ui, state: &ViewerState, actions: &mut Vec<Action>) {
    let session = match &state.session {
        Some(session) => session,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Select a spectrum and press \"Load spectrum\"");
            });
            return;
        }
    };
    let record = &session.record;
    let pending = state.pending_view;
    let link_group = egui::Id::new("spectrum_x_link");

    ui.label(RichText::new(plot_title(&session.name, record)).strong());
    let available = ui.available_height();

    let spectrum = Plot::new("spectrum_plot")
        .height(available * SPECTRUM_SHARE)
        .legend(Legend::default().position(Corner::RightTop))
        .y_axis_label("Transmittance")
        .link_axis(link_group, [true, false])
        .link_cursor(link_group, [true, false])
        .show_x(state.hover_enabled)
        .show_y(state.hover_enabled)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            if let Some(view) = pending {
                plot_ui.set_plot_bounds(bounds_of(view.x, view.y));
            }
            for curve in session.visible_curves() {
                let line = Line::new(PlotPoints::from(curve_points(record, curve)))
                    .name(&curve.label)
                    .color(curve.color)
                    .width(2.0);
                plot_ui.line(line);
            }
        });

    let residual = Plot::new("residual_plot")
        .height(ui.available_height())
        .x_axis_label("Wavenumber (cm⁻¹)")
        .y_axis_label("% Residuals")
        .link_axis(link_group, [true, false])
        .link_cursor(link_group, [true, false])
        .show_x(state.hover_enabled)
        .show_y(state.hover_enabled)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            if let Some(view) = pending {
                plot_ui.set_plot_bounds(bounds_of(view.x, view.residual_y));
            }
            plot_ui.line(
                Line::new(PlotPoints::from(residual_points(record)))
                    .name("residuals")
                    .color(RESIDUAL_COLOR)
                    .width(1.0),
            );
            plot_ui.hline(HLine::new(0.0).color(ZERO_LINE_COLOR).width(1.0));
        });

    let spectrum_bounds = spectrum.transform.bounds();
    let residual_bounds = residual.transform.bounds();
    let view = ViewBounds {
        x: AxisRange::new(spectrum_bounds.min()[0], spectrum_bounds.max()[0]),
        y: AxisRange::new(spectrum_bounds.min()[1], spectrum_bounds.max()[1]),
        residual_y: AxisRange::new(residual_bounds.min()[1], residual_bounds.max()[1]),
    };

    let remembered = state.axes.x().map(|x| ViewBounds {
        x,
        y: state.axes.y(),
        residual_y: state.axes.residual_y(),
    });
    let moved = remembered.map_or(true, |prev| !prev.approx_eq(&view));
    if pending.is_some() || moved {
        actions.push(Action::Dispatch(Event::ViewChanged(view)));
    }
}

fn bounds_of(x: AxisRange, y: AxisRange) -> PlotBounds {
    PlotBounds::from_min_max([x.start, y.start], [x.end, y.end])
}
