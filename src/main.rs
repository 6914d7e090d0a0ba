use anyhow::Context;
use clap::Parser;
use eframe::egui;
use ggg_spectra::app::GggSpectraApp;
use ggg_spectra::color::ColorTable;
use ggg_spectra::config::{default_spectra_dir, Cli};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = Cli::parse();
    let save_path = cli.save_path()?;
    log::info!(
        "Each opened spectrum will be saved as a standalone html file under {}",
        save_path.display()
    );

    let colors = ColorTable::bundled()?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1300.0, 800.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "TCCON",
        options,
        Box::new(move |cc| {
            // Black measured line needs a light background.
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(GggSpectraApp::new(
                colors,
                save_path,
                default_spectra_dir(),
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running viewer")
}
