//=========================================================================
// Sandbox
//
// Opens one window and runs until it is closed.
//
// Run with:
//   cargo run --example sandbox
//   RUST_LOG=Graphics=trace cargo run --example sandbox
//
//=========================================================================

use std::process::ExitCode;

use ember_engine::core::event::{Event, EventCategory};
use ember_engine::logger::{Logger, Verbosity, ENGINE_CATEGORY, GRAPHICS_CATEGORY};
use ember_engine::platform::{WindowProperties, WinitWindow};
use ember_engine::{ember_log, log_resize, ApplicationBuilder};

fn main() -> ExitCode {
    Logger::builder()
        .with_default_verbosity(Verbosity::Trace)
        .with_category(GRAPHICS_CATEGORY, Verbosity::Info)
        .init();

    //--- One line per verbosity ------------------------------------------
    ember_log!(Verbosity::Off, "You shouldn't see this");
    ember_log!(Verbosity::Trace, "Relaying information.");
    ember_log!(Verbosity::Info, "Everything is fine.");
    ember_log!(Verbosity::Warning, "Just a warning, but you should still listen.");
    ember_log!(Verbosity::Error, "An error!");
    ember_log!(Verbosity::Fatal, "A really bad error!");

    //--- Application -----------------------------------------------------
    let built = ApplicationBuilder::new()
        .with_window(WindowProperties::new("Ember Sandbox", 1280, 720))
        .build::<WinitWindow>();

    let mut app = match built {
        Ok(app) => app,
        Err(e) => {
            ember_log!(ENGINE_CATEGORY, Verbosity::Fatal, "Could not start: {}", e);
            return ExitCode::FAILURE;
        }
    };

    app.push_handler(log_resize);
    app.push_handler(|event: &mut Event| {
        if event.is_in_category(EventCategory::APPLICATION) {
            ember_log!("Sandbox", Verbosity::Trace, "Application event: {}", event);
        }
    });

    app.run();

    ember_log!(Verbosity::Info, "Goodbye.");
    ExitCode::SUCCESS
}
