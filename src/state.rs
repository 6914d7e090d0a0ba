use std::path::PathBuf;

use crate::bounds::{AxisMemory, ViewBounds};
use crate::color::ColorTable;
use crate::curves::{build_curves, Curve};
use crate::data::model::SpectrumRecord;

// ---------------------------------------------------------------------------
// Session – one loaded spectrum
// ---------------------------------------------------------------------------

/// Everything shown for the spectrum currently on screen. A new load builds
/// a new session; a session is never patched with another file's data.
#[derive(Debug, Clone)]
pub struct Session {
    /// File name of the spectrum.
    pub name: String,
    pub record: SpectrumRecord,
    pub curves: Vec<Curve>,
    /// One flag per entry of `curves`.
    pub visible: Vec<bool>,
}

impl Session {
    pub fn new(name: impl Into<String>, record: SpectrumRecord, colors: &ColorTable) -> Self {
        let curves = build_curves(&record, colors);
        let visible = vec![true; curves.len()];
        Self {
            name: name.into(),
            record,
            curves,
            visible,
        }
    }

    pub fn visible_curves(&self) -> impl Iterator<Item = &Curve> {
        self.curves
            .iter()
            .zip(&self.visible)
            .filter(|(_, visible)| **visible)
            .map(|(curve, _)| curve)
    }
}

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
#[derive(Debug, Clone, Default)]
pub struct ViewerState {
    /// Folder the spectrum list comes from.
    pub spectra_dir: PathBuf,
    /// Whether `spectra_dir` was supplied by the user.
    pub custom_dir: bool,
    /// Sorted file names in `spectra_dir`.
    pub listing: Vec<String>,
    /// Entry picked in the dropdown, not yet loaded.
    pub selected: Option<String>,

    pub session: Option<Session>,

    pub axes: AxisMemory,
    /// Bounds the plots must jump to on the next frame.
    pub pending_view: Option<ViewBounds>,

    /// Coordinate readouts on hover.
    pub hover_enabled: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
    /// Last snapshot written for the current session.
    pub snapshot: Option<PathBuf>,
}

/// Everything that can change the viewer state.
#[derive(Debug, Clone)]
pub enum Event {
    SpectraDirChanged {
        dir: PathBuf,
        custom: bool,
        listing: Vec<String>,
    },
    /// The spectra folder could not be listed.
    ListingFailed(String),
    SpectrumSelected(Option<String>),
    SpectrumLoaded(Session),
    LoadFailed(String),
    ToggleCurve(usize),
    ShowAll,
    HideAll,
    ToggleHover,
    /// The plots now show these bounds.
    ViewChanged(ViewBounds),
    SnapshotWritten(PathBuf),
    SnapshotFailed(String),
}

/// Fold one event into the state.
pub fn update(mut state: ViewerState, event: Event) -> ViewerState {
    match event {
        Event::SpectraDirChanged {
            dir,
            custom,
            listing,
        } => {
            if state
                .selected
                .as_ref()
                .is_some_and(|name| !listing.contains(name))
            {
                state.selected = None;
            }
            state.spectra_dir = dir;
            state.custom_dir = custom;
            state.listing = listing;
        }
        Event::ListingFailed(message) => {
            state.status_message = Some(message);
        }
        Event::SpectrumSelected(name) => {
            state.selected = name.filter(|n| !n.is_empty());
        }
        Event::SpectrumLoaded(session) => {
            state.pending_view = Some(state.axes.restore(session.record.frequency_span()));
            state.session = Some(session);
            state.status_message = None;
            state.snapshot = None;
        }
        Event::LoadFailed(message) => {
            state.status_message = Some(message);
        }
        Event::ToggleCurve(index) => {
            if let Some(flag) = state
                .session
                .as_mut()
                .and_then(|s| s.visible.get_mut(index))
            {
                *flag = !*flag;
            }
        }
        Event::ShowAll => set_all_visible(&mut state, true),
        Event::HideAll => set_all_visible(&mut state, false),
        Event::ToggleHover => {
            state.hover_enabled = !state.hover_enabled;
        }
        Event::ViewChanged(bounds) => {
            state.axes.remember(bounds);
            state.pending_view = None;
        }
        Event::SnapshotWritten(path) => {
            state.snapshot = Some(path);
        }
        Event::SnapshotFailed(message) => {
            state.status_message = Some(message);
        }
    }
    state
}

fn set_all_visible(state: &mut ViewerState, visible: bool) {
    if let Some(session) = state.session.as_mut() {
        session.visible.iter_mut().for_each(|v| *v = visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{AxisRange, DEFAULT_RESIDUAL_Y, DEFAULT_Y};
    use crate::data::loader::parse_spt;

    fn session(name: &str, f0: f64) -> Session {
        let text = format!(
            "banner\n1 2 3 4 30 0.2 7 8 9 10 0.0\nFreq Tm Tc co2\n\
             {} 0.9 0.8 0.99\n{} 0.7 0.7 0.98\n{} 0.6 0.5 0.97\n",
            f0,
            f0 + 1.0,
            f0 + 2.0
        );
        Session::new(name, parse_spt(&text).unwrap(), &ColorTable::default())
    }

    fn loaded(name: &str, f0: f64) -> ViewerState {
        update(ViewerState::default(), Event::SpectrumLoaded(session(name, f0)))
    }

    #[test]
    fn load_installs_session_and_requests_bounds() {
        let state = loaded("a.spt", 1000.0);
        let session = state.session.as_ref().unwrap();
        assert_eq!(session.name, "a.spt");
        assert_eq!(session.visible, vec![true; 3]);

        let view = state.pending_view.unwrap();
        assert_eq!(view.x, AxisRange::new(1000.0, 1002.0));
        assert_eq!(view.y, DEFAULT_Y);
        assert_eq!(view.residual_y, DEFAULT_RESIDUAL_Y);
    }

    #[test]
    fn failed_load_keeps_previous_session() {
        let state = loaded("a.spt", 1000.0);
        let state = update(state, Event::LoadFailed("line 4: bad".into()));
        assert_eq!(state.session.as_ref().unwrap().name, "a.spt");
        assert_eq!(state.status_message.as_deref(), Some("line 4: bad"));
    }

    #[test]
    fn next_load_replaces_session_and_clears_status() {
        let state = update(loaded("a.spt", 1000.0), Event::LoadFailed("oops".into()));
        let state = update(state, Event::ToggleCurve(0));
        let state = update(state, Event::SpectrumLoaded(session("b.spt", 1000.0)));

        let session = state.session.as_ref().unwrap();
        assert_eq!(session.name, "b.spt");
        assert!(session.visible.iter().all(|v| *v));
        assert!(state.status_message.is_none());
    }

    #[test]
    fn view_memory_carries_into_next_load() {
        let state = loaded("a.spt", 1000.0);
        let zoom = ViewBounds {
            x: AxisRange::new(1000.5, 1001.5),
            y: AxisRange::new(0.4, 1.0),
            residual_y: AxisRange::new(-12.0, 12.0),
        };
        let state = update(state, Event::ViewChanged(zoom));
        assert!(state.pending_view.is_none());

        let state = update(state, Event::SpectrumLoaded(session("b.spt", 1000.2)));
        assert_eq!(state.pending_view, Some(zoom));

        let state = update(state, Event::SpectrumLoaded(session("c.spt", 5000.0)));
        let view = state.pending_view.unwrap();
        assert_eq!(view.x, AxisRange::new(5000.0, 5002.0));
        assert_eq!(view.y, zoom.y);
        assert_eq!(view.residual_y, zoom.residual_y);
    }

    #[test]
    fn curve_toggles() {
        let state = loaded("a.spt", 1000.0);
        let state = update(state, Event::ToggleCurve(1));
        assert_eq!(state.session.as_ref().unwrap().visible, vec![true, false, true]);

        let state = update(state, Event::ToggleCurve(42));
        assert_eq!(state.session.as_ref().unwrap().visible, vec![true, false, true]);

        let state = update(state, Event::HideAll);
        let session = state.session.as_ref().unwrap();
        assert!(session.visible.iter().all(|v| !*v));
        assert_eq!(session.visible_curves().count(), 0);

        let state = update(state, Event::ShowAll);
        assert_eq!(state.session.as_ref().unwrap().visible_curves().count(), 3);
    }

    #[test]
    fn toggles_without_session_are_noops() {
        let state = update(ViewerState::default(), Event::ToggleCurve(0));
        let state = update(state, Event::HideAll);
        assert!(state.session.is_none());
    }

    #[test]
    fn directory_change_drops_stale_selection() {
        let state = ViewerState {
            selected: Some("gone.spt".into()),
            ..Default::default()
        };
        let state = update(
            state,
            Event::SpectraDirChanged {
                dir: PathBuf::from("/data/site/spectra"),
                custom: true,
                listing: vec!["a.spt".into()],
            },
        );
        assert!(state.selected.is_none());
        assert!(state.custom_dir);
        assert_eq!(state.listing, vec!["a.spt"]);

        let state = update(state, Event::SpectrumSelected(Some("a.spt".into())));
        assert_eq!(state.selected.as_deref(), Some("a.spt"));
        let state = update(state, Event::SpectrumSelected(Some(String::new())));
        assert!(state.selected.is_none());

        let state = update(state, Event::ListingFailed("permission denied".into()));
        assert_eq!(state.listing, vec!["a.spt"]);
        assert_eq!(state.status_message.as_deref(), Some("permission denied"));
    }

    #[test]
    fn hover_and_snapshot_bookkeeping() {
        let state = update(ViewerState::default(), Event::ToggleHover);
        assert!(state.hover_enabled);
        let state = update(state, Event::SnapshotWritten(PathBuf::from("/tmp/a.html")));
        assert_eq!(state.snapshot, Some(PathBuf::from("/tmp/a.html")));
        let state = update(state, Event::SnapshotFailed("disk full".into()));
        assert_eq!(state.status_message.as_deref(), Some("disk full"));
    }
}
