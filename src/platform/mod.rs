//=========================================================================
// Platform Subsystem
//
// Capability surfaces the application core depends on, and the backends
// that implement them.
//
// Architecture:
// ```text
//  Application (owns run loop)
//   │
//   │  on_update()            set_event_callback()
//   ▼                               ▲
//  ┌─────────────────────────────┐  │ Event
//  │  Window (trait)             │──┘
//  │   ├─ WinitWindow  (native)  │
//  │   └─ HeadlessWindow (tests) │
//  │        │                    │
//  │        ▼ swap_buffers()     │
//  │  RenderContext (trait)      │
//  │   ├─ WinitContext           │
//  │   └─ HeadlessContext        │
//  └─────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **Application owns the loop**: one `on_update()` processes whatever
//   the OS has queued and presents one frame. The winit backend uses
//   `pump_app_events` rather than handing control to `run_app`.
// - **Callbacks are delivery only**: the window never decides what an
//   event means. It builds the `Event`, updates its own cached state
//   (size), and passes the event to whoever registered a callback.
// - **Main thread requirement**: winit mandates the main thread on macOS,
//   so windows are neither `Send` nor `Sync`.
//
//=========================================================================

//=== Submodules ==========================================================

pub mod headless;

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub mod native;

//=== Standard Library Imports ============================================

use std::fmt;

//=== External Crates =====================================================

use log::trace;

//=== Internal Imports ====================================================

use crate::core::event::Event;
use crate::logger::GRAPHICS_CATEGORY;

//=== Public API ==========================================================

pub use headless::{HeadlessContext, HeadlessWindow};

#[cfg(not(any(target_arch = "wasm32", target_os = "ios")))]
pub use native::{WinitContext, WinitWindow};

//=== EventCallback =======================================================

/// Receiver for events produced by a window.
///
/// Invoked synchronously from inside `Window::on_update`, zero or more
/// times per pump.
pub type EventCallback = Box<dyn FnMut(Event)>;

/// Hands `event` to the registered callback, or drops it if there is none.
pub(crate) fn deliver(callback: &mut Option<EventCallback>, event: Event) {
    match callback {
        Some(callback) => callback(event),
        None => trace!(
            target: GRAPHICS_CATEGORY,
            "No event callback registered, dropping {}",
            event
        ),
    }
}

//=== WindowProperties ====================================================

/// Parameters used to create a window.
///
/// # Default Values
///
/// - **Title**: "Ember Engine"
/// - **Size**: 1280 x 720
/// - **VSync**: enabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowProperties {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

impl WindowProperties {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            width,
            height,
            vsync: true,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_vsync(mut self, enabled: bool) -> Self {
        self.vsync = enabled;
        self
    }
}

impl Default for WindowProperties {
    fn default() -> Self {
        Self::new("Ember Engine", 1280, 720)
    }
}

//=== Window ==============================================================

/// Platform window as seen by the application.
///
/// # Contract
///
/// - `on_update` performs exactly one pump: drain pending platform
///   occurrences (delivering any resulting events to the callback), then
///   present through the window's render context. It may block, e.g. to
///   pace presentation when vsync is on.
/// - The cached size reported by `width`/`height` is updated *before* the
///   matching `WindowResizedEvent` is delivered.
/// - Events produced while no callback is registered are dropped.
pub trait Window {
    /// Creates the window and its render context.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the platform library, the OS window,
    /// or the render context cannot be initialized. Callers treat this as
    /// fatal.
    fn create(properties: WindowProperties) -> Result<Self, PlatformError>
    where
        Self: Sized;

    /// Processes pending platform occurrences and presents one frame.
    fn on_update(&mut self);

    /// Replaces the event callback.
    fn set_event_callback(&mut self, callback: EventCallback);

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    fn title(&self) -> &str;

    fn toggle_vsync(&mut self, enabled: bool);

    fn is_vsync_enabled(&self) -> bool;
}

//=== RenderContext =======================================================

/// Graphics backend bound to one window.
///
/// Owned and driven by a `Window` implementation; the application never
/// talks to it directly.
pub trait RenderContext {
    /// Prepares the context for presenting.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ContextInitialization`] if the backend is
    /// unusable.
    fn initialize(&mut self) -> Result<(), PlatformError>;

    /// Presents the current frame.
    fn swap_buffers(&mut self);
}

//=== PlatformError =======================================================

/// Platform initialization and runtime errors.
///
/// These are fatal at startup: if the window cannot be created the
/// application cannot run.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// Failed to create event loop (rare, indicates OS-level issue).
    #[error("Event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// The OS refused to create the window.
    #[error("Window creation failed: {0}")]
    WindowCreation(String),

    /// The render context could not be initialized.
    #[error("Render context initialization failed: {0}")]
    ContextInitialization(String),

    /// The event loop shut down before the window came up.
    #[error("Event loop exited with code {0} during startup")]
    EventLoopExited(i32),
}

impl PlatformError {
    pub(crate) fn window_creation(error: impl fmt::Display) -> Self {
        Self::WindowCreation(error.to_string())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // WindowProperties Tests
    //=====================================================================

    #[test]
    fn properties_defaults() {
        let props = WindowProperties::default();
        assert_eq!(props.title, "Ember Engine");
        assert_eq!((props.width, props.height), (1280, 720));
        assert!(props.vsync, "VSync is on by default");
    }

    #[test]
    fn properties_fluent_api_chaining() {
        let props = WindowProperties::default()
            .with_title("Sandbox")
            .with_size(800, 600)
            .with_vsync(false);

        assert_eq!(props, WindowProperties::new("Sandbox", 800, 600).with_vsync(false));
    }

    //=====================================================================
    // PlatformError Tests
    //=====================================================================

    #[test]
    fn platform_error_is_error_trait() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<PlatformError>();
    }

    #[test]
    fn platform_error_display_format() {
        let err = PlatformError::window_creation("no display");
        assert_eq!(err.to_string(), "Window creation failed: no display");

        let err = PlatformError::EventLoopExited(3);
        assert!(err.to_string().contains('3'));
    }
}
