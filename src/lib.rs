//=========================================================================
// Ember Engine — Library Root
//
// This crate defines the public API surface of the Ember Engine.
//
// Responsibilities:
// - Expose the application facade (`Application`, `ApplicationBuilder`)
// - Expose the event system (`core::event`) for handlers and backends
// - Expose the platform contracts (`Window`, `RenderContext`) and the
//   shipped backends
// - Provide the category-based logging facility
//
// Typical usage:
// ```no_run
// use ember_engine::ApplicationBuilder;
// use ember_engine::platform::WinitWindow;
//
// fn main() {
//     ember_engine::logger::Logger::init();
//     let mut app = ApplicationBuilder::new().build::<WinitWindow>().unwrap();
//     app.run();
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the engine-side types that do not depend on any OS:
// events and their dispatcher.
//
pub mod core;

// `platform` defines what the application needs from a window and a
// render context, plus the winit and headless implementations.
//
pub mod platform;

// `logger` is the logging facility used throughout the engine and
// available to applications.
//
pub mod logger;

pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `application` defines the run loop and event routing. Its types are
// re-exported below.
//
mod application;

//--- Public Exports ------------------------------------------------------

pub use application::{log_resize, Application, ApplicationBuilder, ApplicationState, EventHandler};
