//=========================================================================
// Headless Backend
//
// A `Window` with no OS behind it. Each pump replays one scripted frame
// of events through the registered callback, then presents through a
// counting render context.
//
// Used to drive the application lifecycle deterministically in tests and
// on machines without a display.
//
//=========================================================================

use std::collections::VecDeque;

use log::{debug, info};

use super::{deliver, EventCallback, PlatformError, RenderContext, Window, WindowProperties};
use crate::core::event::{Event, EventKind};
use crate::logger::GRAPHICS_CATEGORY;

//=== HeadlessContext =====================================================

/// Render context that only records presents.
#[derive(Debug, Default)]
pub struct HeadlessContext {
    initialized: bool,
    presented_frames: u64,
}

impl HeadlessContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of `swap_buffers` calls so far.
    pub fn presented_frames(&self) -> u64 {
        self.presented_frames
    }
}

impl RenderContext for HeadlessContext {
    fn initialize(&mut self) -> Result<(), PlatformError> {
        self.initialized = true;
        debug!(target: GRAPHICS_CATEGORY, "Headless render context initialized");
        Ok(())
    }

    fn swap_buffers(&mut self) {
        self.presented_frames += 1;
    }
}

//=== HeadlessWindow ======================================================

/// Scripted window.
///
/// Frames queued with [`push_frame`](Self::push_frame) are delivered one
/// per `on_update`. Once the script is exhausted pumps deliver nothing.
///
/// # Examples
///
/// ```
/// use ember_engine::core::event::{Event, WindowClosedEvent, WindowResizedEvent};
/// use ember_engine::platform::{HeadlessWindow, Window, WindowProperties};
///
/// let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();
/// window.push_frame([Event::from(WindowResizedEvent::new(800, 600))]);
/// window.push_frame([Event::from(WindowClosedEvent::new())]);
///
/// window.on_update();
/// assert_eq!(window.width(), 800);
/// assert_eq!(window.pending_frames(), 1);
/// ```
pub struct HeadlessWindow {
    title: String,
    width: u32,
    height: u32,
    vsync: bool,

    script: VecDeque<Vec<Event>>,
    callback: Option<EventCallback>,
    context: HeadlessContext,
    pumps: u64,
}

impl HeadlessWindow {
    /// Queues one frame of events for a later pump.
    pub fn push_frame(&mut self, events: impl IntoIterator<Item = Event>) {
        self.script.push_back(events.into_iter().collect());
    }

    /// Creates a window with a script already queued.
    pub fn with_frames<I>(properties: WindowProperties, frames: I) -> Result<Self, PlatformError>
    where
        I: IntoIterator<Item = Vec<Event>>,
    {
        let mut window = Self::create(properties)?;
        window.script.extend(frames);
        Ok(window)
    }

    /// Number of `on_update` calls so far.
    pub fn pump_count(&self) -> u64 {
        self.pumps
    }

    /// Frames still waiting to be delivered.
    pub fn pending_frames(&self) -> usize {
        self.script.len()
    }

    pub fn context(&self) -> &HeadlessContext {
        &self.context
    }

    fn observe(&mut self, event: &Event) {
        match event.kind() {
            EventKind::WindowResized(resize) => {
                self.width = resize.width();
                self.height = resize.height();
            }
            EventKind::WindowClosed(_) => {}
        }
    }
}

impl Window for HeadlessWindow {
    fn create(properties: WindowProperties) -> Result<Self, PlatformError> {
        info!(
            target: GRAPHICS_CATEGORY,
            "Create headless window \"{}\" ({} x {})",
            properties.title,
            properties.width,
            properties.height
        );

        let mut context = HeadlessContext::new();
        context.initialize()?;

        Ok(Self {
            title: properties.title,
            width: properties.width,
            height: properties.height,
            vsync: properties.vsync,
            script: VecDeque::new(),
            callback: None,
            context,
            pumps: 0,
        })
    }

    fn on_update(&mut self) {
        self.pumps += 1;

        if let Some(frame) = self.script.pop_front() {
            for event in frame {
                self.observe(&event);
                deliver(&mut self.callback, event);
            }
        }

        self.context.swap_buffers();
    }

    fn set_event_callback(&mut self, callback: EventCallback) {
        self.callback = Some(callback);
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn toggle_vsync(&mut self, enabled: bool) {
        self.vsync = enabled;
    }

    fn is_vsync_enabled(&self) -> bool {
        self.vsync
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventType, WindowClosedEvent, WindowResizedEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_window() -> (HeadlessWindow, Rc<RefCell<Vec<Event>>>) {
        let received = Rc::new(RefCell::new(Vec::new()));
        let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();

        let sink = Rc::clone(&received);
        window.set_event_callback(Box::new(move |event| sink.borrow_mut().push(event)));

        (window, received)
    }

    #[test]
    fn create_copies_properties_and_initializes_context() {
        let props = WindowProperties::new("Headless", 320, 200).with_vsync(false);
        let window = HeadlessWindow::create(props).unwrap();

        assert_eq!(window.title(), "Headless");
        assert_eq!((window.width(), window.height()), (320, 200));
        assert!(!window.is_vsync_enabled());
        assert!(window.context().is_initialized(), "Context must be initialized on create");
    }

    #[test]
    fn each_pump_delivers_one_frame() {
        let (mut window, received) = recording_window();
        window.push_frame([
            Event::from(WindowResizedEvent::new(800, 600)),
            Event::from(WindowResizedEvent::new(1024, 768)),
        ]);
        window.push_frame([Event::from(WindowClosedEvent::new())]);

        window.on_update();
        assert_eq!(received.borrow().len(), 2, "First pump delivers the first frame only");

        window.on_update();
        let types: Vec<EventType> = received.borrow().iter().map(Event::event_type).collect();
        assert_eq!(
            types,
            vec![EventType::WindowResized, EventType::WindowResized, EventType::WindowClosed]
        );
    }

    #[test]
    fn resize_updates_size_before_delivery() {
        let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();
        window.push_frame([Event::from(WindowResizedEvent::new(640, 480))]);

        window.on_update();

        assert_eq!((window.width(), window.height()), (640, 480));
    }

    #[test]
    fn events_without_callback_are_dropped() {
        let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();
        window.push_frame([Event::from(WindowClosedEvent::new())]);

        window.on_update();

        assert_eq!(window.pending_frames(), 0, "Frame is consumed even without a callback");
    }

    #[test]
    fn pumps_present_even_when_script_is_empty() {
        let (mut window, received) = recording_window();

        window.on_update();
        window.on_update();

        assert_eq!(window.pump_count(), 2);
        assert_eq!(window.context().presented_frames(), 2);
        assert!(received.borrow().is_empty());
    }

    #[test]
    fn toggle_vsync_is_reported() {
        let mut window = HeadlessWindow::create(WindowProperties::default()).unwrap();
        window.toggle_vsync(false);
        assert!(!window.is_vsync_enabled());
        window.toggle_vsync(true);
        assert!(window.is_vsync_enabled());
    }

    #[test]
    fn with_frames_queues_script() {
        let window = HeadlessWindow::with_frames(
            WindowProperties::default(),
            vec![vec![], vec![Event::from(WindowClosedEvent::new())]],
        )
        .unwrap();

        assert_eq!(window.pending_frames(), 2);
    }
}
