//=========================================================================
// Application Events
//
// Events raised by the window about the application surface itself.
//
//=========================================================================

use std::fmt;

use super::{Event, EventCategory, EventKind, EventType, EventVariant};

//=== WindowResizedEvent ==================================================

/// Raised whenever the window is resized.
///
/// Dimensions are the new inner size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowResizedEvent {
    width: u32,
    height: u32,
}

impl WindowResizedEvent {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl EventVariant for WindowResizedEvent {
    const TYPE: EventType = EventType::WindowResized;
    const CATEGORY: EventCategory = EventCategory::APPLICATION;

    fn into_kind(self) -> EventKind {
        EventKind::WindowResized(self)
    }

    fn narrow_mut(kind: &mut EventKind) -> Option<&mut Self> {
        match kind {
            EventKind::WindowResized(event) => Some(event),
            _ => None,
        }
    }
}

impl fmt::Display for WindowResizedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WindowResizedEvent: {}, {}", self.width, self.height)
    }
}

impl From<WindowResizedEvent> for Event {
    fn from(event: WindowResizedEvent) -> Self {
        Event::new(event)
    }
}

//=== WindowClosedEvent ===================================================

/// Raised when the user or the OS asks the window to close.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WindowClosedEvent;

impl WindowClosedEvent {
    pub fn new() -> Self {
        Self
    }
}

impl EventVariant for WindowClosedEvent {
    const TYPE: EventType = EventType::WindowClosed;
    const CATEGORY: EventCategory = EventCategory::APPLICATION;

    fn into_kind(self) -> EventKind {
        EventKind::WindowClosed(self)
    }

    fn narrow_mut(kind: &mut EventKind) -> Option<&mut Self> {
        match kind {
            EventKind::WindowClosed(event) => Some(event),
            _ => None,
        }
    }
}

impl fmt::Display for WindowClosedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WindowClosedEvent")
    }
}

impl From<WindowClosedEvent> for Event {
    fn from(event: WindowClosedEvent) -> Self {
        Event::new(event)
    }
}
