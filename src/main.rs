use eframe::egui;
use visor::app::{ViewerApp, APP_TITLE};
use visor::config::{Command, Config, HELP};

fn main() -> eframe::Result<()> {
    let config = match Config::from_env() {
        Ok(Command::Run(config)) => config,
        Ok(Command::Help) => {
            print!("{HELP}");
            return Ok(());
        }
        Ok(Command::Version) => {
            println!("visor {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Err(e) => {
            eprintln!("{e}\n\n{HELP}");
            std::process::exit(2);
        }
    };

    if let Err(e) = visor::logging::init_logging() {
        eprintln!("failed to initialize logging: {e}");
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([400.0, 300.0])
            .with_app_id("visor")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "visor",
        options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
}
