//! Viewer for the `.spt` spectrum files written by GFIT/GGG: measured vs.
//! calculated transmittance, per-species curves and residuals.

pub mod app;
pub mod bounds;
pub mod color;
pub mod config;
pub mod curves;
pub mod data;
pub mod export;
pub mod state;
pub mod ui;
