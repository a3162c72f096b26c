mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::DreamForgeApp;

#[derive(Parser, Debug)]
#[command(name = "dreamforge-gui", about = "Desktop front end for the DreamForge agents")]
struct Args {
    /// Agent backend base URL; overrides dreamforge.toml and the environment.
    #[arg(long)]
    server_url: Option<String>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok()))
        .init();
    let args = Args::parse();

    let mut settings = client_core::load_settings();
    if let Some(server_url) = args.server_url {
        settings.server_url = server_url;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("DreamForge AI")
            .with_inner_size([1100.0, 820.0])
            .with_min_inner_size([720.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "DreamForge AI",
        options,
        Box::new(|_cc| Ok(Box::new(DreamForgeApp::new(cmd_tx, ui_rx)))),
    )
}

/// `RUST_LOG` directives when set and valid, otherwise `info`.
fn log_filter(directives: Option<String>) -> EnvFilter {
    directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn log_filter_honours_rust_log() {
        assert_eq!(
            log_filter(Some("debug".into())).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
    }
}
