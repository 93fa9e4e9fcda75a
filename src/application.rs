//=========================================================================
// Ember Application
//
// Owns the window and the run loop, and routes every window event through
// an `EventDispatcher`.
//
// Architecture:
// ```text
//     ApplicationBuilder  ──build()──>  Application  ──run()──>  [Stopped]
//         │                               │
//         ├─ with_window()                ├─ window.on_update()
//         └─ with_event_queue_capacity()  │    └─ callback → bounded queue
//                                         └─ drain queue → on_event()
//                                              ├─ WindowClosedEvent → stop
//                                              └─ EventHandlers (in order)
// ```
//
// Lifecycle:
// ```text
//   Created ──run()──> Running ──WindowClosedEvent──> Stopped
// ```
//
// The window never calls back into the application directly. Its
// callback only enqueues; the loop dequeues after each pump and
// dispatches on its own stack frame. A close that finds the queue full
// is latched instead of dropped and routed after the queued events.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::rc::Rc;

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, TrySendError};
use log::{debug, info, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::event::{Event, EventDispatcher, EventType, WindowClosedEvent, WindowResizedEvent};
use crate::logger::ENGINE_CATEGORY;
use crate::platform::{PlatformError, Window, WindowProperties};

//=== Single Instance Guard ===============================================

thread_local! {
    // Windows are bound to the thread that created them, so the
    // one-application rule is enforced per thread.
    static APPLICATION_ALIVE: Cell<bool> = const { Cell::new(false) };
}

//=== ApplicationState ====================================================

/// Lifecycle state of an [`Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationState {
    /// Constructed and subscribed to its window; loop not started.
    Created,

    /// Inside `run()`.
    Running,

    /// A close was received. No further pumps happen.
    Stopped,
}

//=== EventHandler ========================================================

/// Extension point for events the application does not consume itself.
///
/// Handlers are offered each event in registration order until one marks
/// it handled. Use an [`EventDispatcher`] inside to pick the types you
/// care about.
pub trait EventHandler {
    fn on_event(&mut self, event: &mut Event);
}

impl<F: FnMut(&mut Event)> EventHandler for F {
    fn on_event(&mut self, event: &mut Event) {
        self(event)
    }
}

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// - **Window**: [`WindowProperties::default()`]
/// - **Event queue capacity**: 128 events
///
/// # Examples
///
/// ```no_run
/// use ember_engine::{ApplicationBuilder, platform::{WinitWindow, WindowProperties}};
///
/// let mut app = ApplicationBuilder::new()
///     .with_window(WindowProperties::new("Sandbox", 1024, 768))
///     .with_event_queue_capacity(256)
///     .build::<WinitWindow>()
///     .expect("window");
///
/// app.run();
/// ```
pub struct ApplicationBuilder {
    window: WindowProperties,
    event_queue_capacity: usize,
}

impl ApplicationBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            window: WindowProperties::default(),
            event_queue_capacity: 128,
        }
    }

    /// Sets the properties of the window created by [`build`](Self::build).
    pub fn with_window(mut self, properties: WindowProperties) -> Self {
        self.window = properties;
        self
    }

    /// Sets how many window events may be pending between two drains.
    ///
    /// Events arriving while the queue is full are dropped with a warning,
    /// except closes, which are always delivered.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_event_queue_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Event queue capacity must be positive");
        self.event_queue_capacity = capacity;
        self
    }

    /// Creates the window and the application around it.
    ///
    /// # Errors
    ///
    /// Returns the window's [`PlatformError`] if it cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if another application is alive on this thread.
    pub fn build<W: Window>(self) -> Result<Application<W>, PlatformError> {
        info!(
            target: ENGINE_CATEGORY,
            "Building application (window: \"{}\", queue: {})",
            self.window.title,
            self.event_queue_capacity
        );

        let window = W::create(self.window)?;
        Ok(Application::with_capacity(window, self.event_queue_capacity))
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

/// The main application.
///
/// Exclusively owns one window for its whole lifetime; dropping the
/// application releases the window.
///
/// # Single Instance
///
/// Only one application may be alive per thread. Windows are bound to the
/// thread that created them, so an application on another thread drives
/// an unrelated window and is allowed.
///
/// # Examples
///
/// ```
/// use ember_engine::Application;
/// use ember_engine::core::event::{Event, WindowClosedEvent};
/// use ember_engine::platform::{HeadlessWindow, Window, WindowProperties};
///
/// let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();
/// window.push_frame([Event::from(WindowClosedEvent::new())]);
///
/// let mut app = Application::new(window);
/// app.run();
///
/// assert!(!app.is_running());
/// assert_eq!(app.window().pump_count(), 1);
/// ```
pub struct Application<W: Window> {
    window: W,
    events: Receiver<Event>,
    close_pending: Rc<Cell<bool>>,
    handlers: Vec<Box<dyn EventHandler>>,
    state: ApplicationState,
}

impl<W: Window> Application<W> {
    //--- Construction -----------------------------------------------------

    /// Wraps an existing window with the default queue capacity.
    ///
    /// # Panics
    ///
    /// Panics if another application is alive on this thread.
    pub fn new(window: W) -> Self {
        Self::with_capacity(window, 128)
    }

    fn with_capacity(mut window: W, capacity: usize) -> Self {
        let already_alive = APPLICATION_ALIVE.with(|alive| alive.replace(true));
        crate::ember_assert!(!already_alive, ENGINE_CATEGORY, "Application already exists!");

        let (sender, receiver) = bounded(capacity);
        let close_pending = Rc::new(Cell::new(false));
        let latch = Rc::clone(&close_pending);
        window.set_event_callback(Box::new(move |event: Event| {
            match sender.try_send(event) {
                Ok(()) => {}
                Err(TrySendError::Full(event)) if event.event_type() == EventType::WindowClosed => {
                    warn!(target: ENGINE_CATEGORY, "Event queue full, latching {}", event);
                    latch.set(true);
                }
                Err(TrySendError::Full(event)) => {
                    warn!(target: ENGINE_CATEGORY, "Event queue full, dropping {}", event);
                }
                Err(TrySendError::Disconnected(event)) => {
                    trace!(target: ENGINE_CATEGORY, "Application gone, dropping {}", event);
                }
            }
        }));

        debug!(
            target: ENGINE_CATEGORY,
            "Application created ({} x {}, vsync: {})",
            window.width(),
            window.height(),
            window.is_vsync_enabled()
        );

        Self {
            window,
            events: receiver,
            close_pending,
            handlers: Vec::new(),
            state: ApplicationState::Created,
        }
    }

    /// Registers an extension handler.
    ///
    /// Handlers see events after the application's own routing, in the
    /// order they were pushed.
    pub fn push_handler(&mut self, handler: impl EventHandler + 'static) {
        self.handlers.push(Box::new(handler));
    }

    //--- Execution --------------------------------------------------------

    /// Runs the loop until a close is received, then returns.
    ///
    /// # Lifecycle
    ///
    /// 1. `Created` → `Running`
    /// 2. Each iteration: one window pump, then every queued event is
    ///    routed through [`on_event`](Self::on_event)
    /// 3. The running state is checked only between iterations, so an
    ///    iteration always finishes once started
    /// 4. `Stopped`: no more pumps, control returns to the caller
    ///
    /// Calling `run` on a stopped application returns immediately.
    pub fn run(&mut self) {
        if self.state == ApplicationState::Stopped {
            warn!(target: ENGINE_CATEGORY, "Application already stopped, not running");
            return;
        }

        info!(target: ENGINE_CATEGORY, "Entering run loop");
        self.state = ApplicationState::Running;

        let mut iterations: u64 = 0;
        while self.is_running() {
            self.window.on_update();
            self.drain_events();
            iterations += 1;
        }

        info!(target: ENGINE_CATEGORY, "Run loop exited after {} iterations", iterations);
    }

    /// Routes one event.
    ///
    /// The application's own handlers run first; anything left unhandled
    /// is offered to the extension handlers in order, stopping at the
    /// first one that consumes it. Events nobody consumes are logged and
    /// dropped.
    pub fn on_event(&mut self, event: &mut Event) {
        debug!(target: ENGINE_CATEGORY, "{}", event);

        let mut dispatcher = EventDispatcher::new(event);
        dispatcher.dispatch::<WindowClosedEvent>(|close| self.on_window_close(close));

        for handler in &mut self.handlers {
            if event.is_handled() {
                break;
            }
            handler.on_event(event);
        }

        if !event.is_handled() {
            trace!(target: ENGINE_CATEGORY, "Unhandled event: {}", event);
        }
    }

    //--- Queries ----------------------------------------------------------

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    /// False once a close has been received.
    pub fn is_running(&self) -> bool {
        self.state != ApplicationState::Stopped
    }

    pub fn window(&self) -> &W {
        &self.window
    }

    pub fn window_mut(&mut self) -> &mut W {
        &mut self.window
    }

    //--- Internal Helpers -------------------------------------------------

    fn drain_events(&mut self) {
        while let Ok(mut event) = self.events.try_recv() {
            self.on_event(&mut event);
        }

        if self.close_pending.replace(false) {
            self.on_event(&mut Event::from(WindowClosedEvent::new()));
        }
    }

    fn on_window_close(&mut self, _event: &mut WindowClosedEvent) -> bool {
        info!(target: ENGINE_CATEGORY, "Window closed, stopping");
        self.state = ApplicationState::Stopped;
        true
    }
}

impl<W: Window> Drop for Application<W> {
    fn drop(&mut self) {
        APPLICATION_ALIVE.with(|alive| alive.set(false));
        debug!(target: ENGINE_CATEGORY, "Application destroyed");
    }
}

/// Logs resize events with the new dimensions.
///
/// Never consumes the event.
pub fn log_resize(event: &mut Event) {
    EventDispatcher::new(event).dispatch::<WindowResizedEvent>(|resize| {
        info!(target: ENGINE_CATEGORY, "Window resized to {} x {}", resize.width(), resize.height());
        false
    });
}

//=========================================================================
// Unit Tests
//=========================================================================
