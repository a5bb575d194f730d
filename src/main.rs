mod app;
mod cli;
mod color;
mod data;
mod settings;
mod state;
mod ui;

use std::process::ExitCode;

use app::DataMirindaApp;
use clap::Parser;
use cli::Cli;
use eframe::egui;
use settings::Settings;
use state::AppState;

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let settings = match settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(settings::SettingsError::MissingFile(_)) if cli.init_config => Settings::default(),
        Err(e) => {
            log::error!("{e}");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cli.init_config {
        return match settings::save(&settings, cli.config.as_deref()) {
            Ok(path) => {
                println!("Wrote settings to {}", path.display());
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{e}");
                eprintln!("Error: {e}");
                ExitCode::FAILURE
            }
        };
    }

    if let Some(out) = &cli.export {
        return match cli::run_export(&cli, &settings, out) {
            Ok(summary) => {
                println!(
                    "Exported {} of {} rows to {}",
                    summary.exported,
                    summary.total,
                    out.display()
                );
                if summary.failed_sources > 0 {
                    eprintln!("{} source file(s) could not be read", summary.failed_sources);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                eprintln!("Error: {e:#}");
                ExitCode::FAILURE
            }
        };
    }

    let mut state = AppState::new(&settings);
    let sources = cli.sources(&settings);
    if !sources.is_empty() {
        state.load_paths(&sources);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Data Mirinda – Contact Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(DataMirindaApp::new(state)))),
    );
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Window error: {e}");
            ExitCode::FAILURE
        }
    }
}
