use crate::state::Event;

pub mod panels;
pub mod plot;

/// What the widgets asked for during a frame. Plain state changes go
/// straight to the reducer; the rest need file system access first.
#[derive(Debug, Clone)]
pub enum Action {
    Dispatch(Event),
    /// List spectra from the folder typed into the path box.
    ChangeDir(String),
    /// Pick the spectra folder with a native dialog.
    BrowseDir,
    /// Read the selected spectrum from disk.
    LoadSelected,
}
