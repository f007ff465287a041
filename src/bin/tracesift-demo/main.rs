use dark_light::Mode;
use eframe::egui;
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod app;

fn main() -> eframe::Result {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .unwrap();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([960.0, 680.0]),
        ..Default::default()
    };

    eframe::run_native(
        "tracesift demo",
        options,
        Box::new(|cc| {
            let theme = match dark_light::detect() {
                Ok(Mode::Light) => egui::ThemePreference::Light,
                Ok(Mode::Dark) => egui::ThemePreference::Dark,
                Ok(Mode::Unspecified) | Err(_) => egui::ThemePreference::Dark,
            };
            cc.egui_ctx.set_theme(theme);
            Ok(Box::new(app::DemoApp::new(cc)))
        }),
    )
}
