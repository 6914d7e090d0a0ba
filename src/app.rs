use std::path::PathBuf;

use eframe::egui;

use crate::color::ColorTable;
use crate::config::{list_spectra, resolve_spectra_dir};
use crate::data::loader::read_spt;
use crate::export::write_snapshot;
use crate::state::{update, Event, Session, ViewerState};
use crate::ui::{panels, plot, Action};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct GggSpectraApp {
    pub state: ViewerState,
    colors: ColorTable,
    /// Where html snapshots go.
    save_path: PathBuf,
    /// Bundled spectra folder, used when no valid custom folder is given.
    default_dir: PathBuf,
    /// Text of the folder input box.
    path_input: String,
}

impl GggSpectraApp {
    pub fn new(colors: ColorTable, save_path: PathBuf, default_dir: PathBuf) -> Self {
        let mut app = Self {
            state: ViewerState::default(),
            colors,
            save_path,
            path_input: default_dir.display().to_string(),
            default_dir,
        };
        let input = app.path_input.clone();
        app.change_dir(&input);
        app
    }

    fn dispatch(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        self.state = update(state, event);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Dispatch(event) => self.dispatch(event),
            Action::ChangeDir(input) => self.change_dir(&input),
            Action::BrowseDir => self.browse_dir(),
            Action::LoadSelected => self.load_selected(),
        }
    }

    fn change_dir(&mut self, input: &str) {
        let (dir, custom) = resolve_spectra_dir(input, &self.default_dir);
        self.path_input = dir.display().to_string();
        match list_spectra(&dir) {
            Ok(listing) => {
                log::info!("{} spectra in {}", listing.len(), dir.display());
                self.dispatch(Event::SpectraDirChanged {
                    dir,
                    custom,
                    listing,
                });
            }
            Err(e) => {
                log::error!("{e:#}");
                self.dispatch(Event::ListingFailed(format!("Error: {e:#}")));
            }
        }
    }

    fn browse_dir(&mut self) {
        let folder = rfd::FileDialog::new()
            .set_title("Select spectra folder")
            .set_directory(&self.state.spectra_dir)
            .pick_folder();

        if let Some(dir) = folder {
            self.change_dir(&dir.display().to_string());
        }
    }

    /// Read the selected spectrum, snapshot it, then swap it in. On failure
    /// the spectrum on screen stays as it was.
    fn load_selected(&mut self) {
        let Some(name) = self.state.selected.clone() else {
            return;
        };
        let path = self.state.spectra_dir.join(&name);

        let record = match read_spt(&path) {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.dispatch(Event::LoadFailed(format!("Error: {e}")));
                return;
            }
        };
        log::info!(
            "Loaded {name}: {} samples, RMS residual {:.4}%",
            record.len(),
            record.rms_residual
        );

        let session = Session::new(name, record, &self.colors);
        let custom_dir = self
            .state
            .custom_dir
            .then(|| self.state.spectra_dir.clone());
        let written = write_snapshot(&self.save_path, &session, custom_dir.as_deref());

        self.dispatch(Event::SpectrumLoaded(session));
        match written {
            Ok(path) => self.dispatch(Event::SnapshotWritten(path)),
            Err(e) => {
                log::error!("{e:#}");
                self.dispatch(Event::SnapshotFailed(format!("Snapshot not saved: {e:#}")));
            }
        }
    }
}

impl eframe::App for GggSpectraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut actions = Vec::new();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state, &mut actions);
        });

        // ---- Left side panel: spectrum picker and line toggles ----
        egui::SidePanel::left("control_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &self.state, &mut self.path_input, &mut actions);
            });

        // ---- Central panel: plots ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::spectrum_plots(ui, &self.state, &mut actions);
        });

        for action in actions {
            self.apply(action);
        }
    }
}
