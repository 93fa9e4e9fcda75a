//=========================================================================
// Native Backend (Winit)
//
// Implements `Window` and `RenderContext` on top of winit.
//
// Architecture:
// ```text
//  WinitWindow::on_update()
//   │
//   ├─ EventLoop::pump_app_events(timeout, &mut WindowState)
//   │    ├─ resumed()       → create OS window + WinitContext
//   │    └─ window_event()  → Resized / CloseRequested → Event → callback
//   │
//   └─ WinitContext::swap_buffers()
// ```
//
// Key Design Decisions:
// - **Pumped, not run**: `run_app` would take the loop away from the
//   application, so each `on_update` pumps the event loop once instead.
// - **Window created in `resumed`**: winit only hands out windows from an
//   active event loop. `create` pumps a bounded number of times until the
//   window exists or startup fails.
// - **VSync as pacing**: with vsync on, a pump waits up to one refresh
//   interval of the current monitor for events; with vsync off it never
//   waits.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::sync::Arc;
use std::time::Duration;

//=== External Crates =====================================================

use log::{debug, error, info, trace, warn};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    platform::pump_events::{EventLoopExtPumpEvents, PumpStatus},
    window::{Window as OsWindow, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use super::{deliver, EventCallback, PlatformError, RenderContext, Window, WindowProperties};
use crate::core::event::{Event, WindowClosedEvent, WindowResizedEvent};
use crate::logger::GRAPHICS_CATEGORY;

//=== Constants ===========================================================

/// Pumps allowed for the OS to report the app as resumed.
const STARTUP_PUMPS: usize = 16;

/// Assumed refresh rate when the monitor does not report one.
const FALLBACK_REFRESH_MILLIHERTZ: u32 = 60_000;

//=== WinitContext ========================================================

/// Render context presenting into a winit window.
///
/// Holds a shared handle to the OS window; the owning `WinitWindow`
/// keeps the other.
pub struct WinitContext {
    window: Arc<OsWindow>,
}

impl WinitContext {
    pub fn new(window: Arc<OsWindow>) -> Self {
        Self { window }
    }
}

impl RenderContext for WinitContext {
    fn initialize(&mut self) -> Result<(), PlatformError> {
        let size = self.window.inner_size();
        info!(
            target: GRAPHICS_CATEGORY,
            "Render context initialized ({} x {} @ {}x)",
            size.width,
            size.height,
            self.window.scale_factor()
        );
        self.window.request_redraw();
        Ok(())
    }

    fn swap_buffers(&mut self) {
        self.window.pre_present_notify();
        self.window.request_redraw();
    }
}

//=== WindowState =========================================================

/// Event-loop side of the window, driven by winit callbacks.
struct WindowState {
    title: String,
    width: u32,
    height: u32,
    vsync: bool,

    window: Option<Arc<OsWindow>>,
    context: Option<Box<dyn RenderContext>>,
    callback: Option<EventCallback>,
    startup_error: Option<PlatformError>,
}

impl WindowState {
    fn new(properties: WindowProperties) -> Self {
        Self {
            title: properties.title,
            width: properties.width,
            height: properties.height,
            vsync: properties.vsync,
            window: None,
            context: None,
            callback: None,
            startup_error: None,
        }
    }

    /// How long the next pump may wait for events.
    fn pump_timeout(&self) -> Duration {
        if !self.vsync {
            return Duration::ZERO;
        }

        let refresh = self
            .window
            .as_ref()
            .and_then(|window| window.current_monitor())
            .and_then(|monitor| monitor.refresh_rate_millihertz());

        frame_interval(refresh)
    }

    fn emit(&mut self, event: Event) {
        trace!(target: GRAPHICS_CATEGORY, "Window event: {}", event);
        deliver(&mut self.callback, event);
    }
}

impl ApplicationHandler for WindowState {
    /// Creates the OS window and its context on first resume.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: GRAPHICS_CATEGORY, "Window already exists (resume after suspend?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width, self.height));

        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!(target: GRAPHICS_CATEGORY, "Window creation failed: {}", e);
                self.startup_error = Some(PlatformError::window_creation(e));
                return;
            }
        };

        let mut context = WinitContext::new(Arc::clone(&window));
        if let Err(e) = context.initialize() {
            error!(target: GRAPHICS_CATEGORY, "{}", e);
            self.startup_error = Some(e);
            return;
        }

        let size = window.inner_size();
        self.width = size.width;
        self.height = size.height;

        self.context = Some(Box::new(context));
        self.window = Some(window);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized(size) => {
                self.width = size.width;
                self.height = size.height;
                self.emit(WindowResizedEvent::new(size.width, size.height).into());
            }

            WindowEvent::CloseRequested => {
                info!(target: GRAPHICS_CATEGORY, "Window close requested");
                self.emit(WindowClosedEvent::new().into());
            }

            _ => {
                // Ignore: input, focus, redraw, etc. (no engine event yet)
            }
        }
    }
}

//=== WinitWindow =========================================================

/// OS window backed by winit.
///
/// # Thread Safety
///
/// Not Send/Sync: must be created and updated on the main thread.
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    state: WindowState,
    exited: bool,
}

impl Window for WinitWindow {
    fn create(properties: WindowProperties) -> Result<Self, PlatformError> {
        info!(
            target: GRAPHICS_CATEGORY,
            "Create window \"{}\" ({} x {})",
            properties.title,
            properties.width,
            properties.height
        );

        let mut event_loop = EventLoop::new().map_err(|e| {
            error!(target: GRAPHICS_CATEGORY, "Could not initialize winit: {}", e);
            PlatformError::EventLoopCreation(e.to_string())
        })?;

        let mut state = WindowState::new(properties);

        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) = event_loop.pump_app_events(Some(Duration::ZERO), &mut state) {
                return Err(PlatformError::EventLoopExited(code));
            }
            if let Some(e) = state.startup_error.take() {
                return Err(e);
            }
            if state.window.is_some() {
                break;
            }
        }

        if state.window.is_none() {
            return Err(PlatformError::window_creation("application was never resumed"));
        }

        Ok(Self {
            event_loop,
            state,
            exited: false,
        })
    }

    fn on_update(&mut self) {
        if !self.exited {
            let timeout = self.state.pump_timeout();
            if let PumpStatus::Exit(code) = self.event_loop.pump_app_events(Some(timeout), &mut self.state) {
                warn!(target: GRAPHICS_CATEGORY, "Event loop exited with code {}", code);
                self.exited = true;
                self.state.emit(WindowClosedEvent::new().into());
            }
        }

        if let Some(context) = self.state.context.as_mut() {
            context.swap_buffers();
        }
    }

    fn set_event_callback(&mut self, callback: EventCallback) {
        self.state.callback = Some(callback);
    }

    fn width(&self) -> u32 {
        self.state.width
    }

    fn height(&self) -> u32 {
        self.state.height
    }

    fn title(&self) -> &str {
        &self.state.title
    }

    fn toggle_vsync(&mut self, enabled: bool) {
        debug!(target: GRAPHICS_CATEGORY, "VSync {}", if enabled { "enabled" } else { "disabled" });
        self.state.vsync = enabled;
    }

    fn is_vsync_enabled(&self) -> bool {
        self.state.vsync
    }
}

impl Drop for WinitWindow {
    fn drop(&mut self) {
        info!(target: GRAPHICS_CATEGORY, "Destroy window \"{}\"", self.state.title);
    }
}

//--- Helpers -------------------------------------------------------------

/// Time between two presents at the given refresh rate.
fn frame_interval(refresh_millihertz: Option<u32>) -> Duration {
    let millihertz = match refresh_millihertz {
        Some(0) | None => FALLBACK_REFRESH_MILLIHERTZ,
        Some(rate) => rate,
    };
    Duration::from_secs_f64(1000.0 / f64::from(millihertz))
}

//=========================================================================
// Unit Tests
//=========================================================================
