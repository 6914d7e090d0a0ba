use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use super::Action;
use crate::state::{Event, Session, ViewerState};

// ---------------------------------------------------------------------------
// Left side panel – spectrum picker and line toggles
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(
    ui: &mut Ui,
    state: &ViewerState,
    path_input: &mut String,
    actions: &mut Vec<Action>,
) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            spectrum_picker(ui, state, path_input, actions);

            if let Some(session) = &state.session {
                ui.separator();
                line_toggles(ui, session, state.hover_enabled, actions);
                ui.separator();
                metadata_table(ui, session);
            }

            if let Some(path) = &state.snapshot {
                ui.separator();
                ui.small(format!("Saved {}", path.display()));
            }
        });
}

fn spectrum_picker(
    ui: &mut Ui,
    state: &ViewerState,
    path_input: &mut String,
    actions: &mut Vec<Action>,
) {
    ui.strong("Spectra folder");
    ui.horizontal(|ui: &mut Ui| {
        let response = ui.add(
            egui::TextEdit::singleline(path_input).desired_width(ui.available_width() - 60.0),
        );
        if response.lost_focus() {
            actions.push(Action::ChangeDir(path_input.clone()));
        }
        if ui.small_button("Browse…").clicked() {
            actions.push(Action::BrowseDir);
        }
    });
    ui.add_space(4.0);

    ui.strong("Select a spectrum:");
    let selected = state.selected.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("select_spectrum")
        .width(ui.available_width())
        .selected_text(&selected)
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(selected.is_empty(), "").clicked() {
                actions.push(Action::Dispatch(Event::SpectrumSelected(None)));
            }
            for name in &state.listing {
                if ui.selectable_label(selected == *name, name).clicked() {
                    actions.push(Action::Dispatch(Event::SpectrumSelected(Some(
                        name.clone(),
                    ))));
                }
            }
        });

    let load = ui.add_enabled(state.selected.is_some(), egui::Button::new("Load spectrum"));
    if load.clicked() {
        actions.push(Action::LoadSelected);
    }
}

fn line_toggles(ui: &mut Ui, session: &Session, hover_enabled: bool, actions: &mut Vec<Action>) {
    ui.heading("Lines");
    for (i, (curve, visible)) in session.curves.iter().zip(&session.visible).enumerate() {
        ui.horizontal(|ui: &mut Ui| {
            let mut checked = *visible;
            if ui.checkbox(&mut checked, "").changed() {
                actions.push(Action::Dispatch(Event::ToggleCurve(i)));
            }
            ui.label(RichText::new("━━").color(curve.color).strong());
            ui.label(&curve.label);
        });
    }

    ui.add_space(4.0);
    if ui.button("Hide all lines").clicked() {
        actions.push(Action::Dispatch(Event::HideAll));
    }
    if ui.button("Show all lines").clicked() {
        actions.push(Action::Dispatch(Event::ShowAll));
    }

    let (label, fill) = if hover_enabled {
        ("Disable hover tools", Color32::from_rgb(240, 173, 78))
    } else {
        ("Enable hover tools", Color32::from_rgb(92, 184, 92))
    };
    if ui.add(egui::Button::new(label).fill(fill)).clicked() {
        actions.push(Action::Dispatch(Event::ToggleHover));
    }
}

fn metadata_table(ui: &mut Ui, session: &Session) {
    let record = &session.record;
    let rows = [
        ("SZA", format!("{}°", record.sza)),
        ("zobs", format!("{} km", record.zobs)),
        ("xzo", format!("{}", record.xzo)),
        ("RMS residual", format!("{:.4} %", record.rms_residual)),
        ("Samples", record.len().to_string()),
        ("Continuum", if record.has_continuum() { "yes" } else { "no" }.to_string()),
    ];

    ui.heading("Spectrum");
    TableBuilder::new(ui)
        .striped(true)
        .vscroll(false)
        .column(Column::auto())
        .column(Column::remainder())
        .body(|mut body| {
            for (key, value) in rows {
                body.row(18.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.strong(key);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(value);
                    });
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &ViewerState, actions: &mut Vec<Action>) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open spectra folder…").clicked() {
                actions.push(Action::BrowseDir);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} spectra in {}",
            state.listing.len(),
            state.spectra_dir.display()
        ));

        if let Some(session) = &state.session {
            ui.separator();
            ui.label(format!("{} – {} samples", session.name, session.record.len()));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
