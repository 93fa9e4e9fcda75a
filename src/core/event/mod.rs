//=========================================================================
// Event Types
//
// Defines the engine-level representation of things that happened.
//
// The platform layer observes native occurrences (window resized, window
// closed, ...), wraps them into one of the concrete event structs below,
// and hands them to the application as an `Event`. Handlers receive the
// concrete struct through an `EventDispatcher`.
//
// Design:
// The set of event kinds is closed: every concrete event has a variant in
// `EventKind` and an enumerant in `EventType`. Adding a new event means
// adding both, plus an `EventVariant` impl, and the compiler points at
// every `match` that needs updating.
//
// Event Flow:
// ```text
// Platform Layer (Winit / Headless)
//         ↓
//    Event (this module)
//         ↓
//    Application::on_event
//         ↓
//    EventDispatcher → typed handler
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod application_events;
pub mod dispatcher;

//=== Standard Library Imports ============================================

use std::fmt;

//=== External Crates =====================================================

use bitflags::bitflags;

//=== Public API ==========================================================

pub use application_events::{WindowClosedEvent, WindowResizedEvent};
pub use dispatcher::EventDispatcher;

//=== EventType ===========================================================

/// Tag identifying the concrete kind of an event.
///
/// Exact-match only: there is no hierarchy between types, so an event
/// matches exactly one `EventType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    WindowResized,
    WindowClosed,
}

impl EventType {
    /// Stable name of the event type, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::WindowResized => "WindowResized",
            Self::WindowClosed => "WindowClosed",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

//=== EventCategory =======================================================

bitflags! {
    /// Coarse grouping of events, independent of their exact type.
    ///
    /// A handler can ask "is this an application event?" without
    /// matching every concrete type.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventCategory: u32 {
        const APPLICATION = 1 << 0;
    }
}

//=== EventVariant ========================================================

/// Implemented by every concrete event struct.
///
/// Bridges the compile-time type a handler asks for and the runtime kind
/// of the event it is given: `TYPE` is known without an instance, and
/// `narrow_mut` performs the checked access into an `EventKind`.
pub trait EventVariant: fmt::Display + Sized {
    /// Type tag shared by every instance of this event.
    const TYPE: EventType;

    /// Categories this event belongs to.
    const CATEGORY: EventCategory;

    /// Static accessor for the type tag.
    fn static_type() -> EventType {
        Self::TYPE
    }

    /// Instance accessor for the type tag; always equals `static_type()`.
    fn event_type(&self) -> EventType {
        Self::TYPE
    }

    /// Wraps this event into the sum type.
    fn into_kind(self) -> EventKind;

    /// Borrows the concrete event out of `kind` if it holds this type.
    fn narrow_mut(kind: &mut EventKind) -> Option<&mut Self>;
}

//=== EventKind ===========================================================

/// Sum of every concrete event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    WindowResized(WindowResizedEvent),
    WindowClosed(WindowClosedEvent),
}

impl EventKind {
    /// Runtime type tag of the wrapped event.
    pub fn event_type(&self) -> EventType {
        match self {
            Self::WindowResized(_) => EventType::WindowResized,
            Self::WindowClosed(_) => EventType::WindowClosed,
        }
    }

    /// Categories of the wrapped event.
    pub fn category(&self) -> EventCategory {
        match self {
            Self::WindowResized(_) => WindowResizedEvent::CATEGORY,
            Self::WindowClosed(_) => WindowClosedEvent::CATEGORY,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowResized(event) => fmt::Display::fmt(event, f),
            Self::WindowClosed(event) => fmt::Display::fmt(event, f),
        }
    }
}

//=== Event ===============================================================

/// An occurrence travelling through one dispatch chain.
///
/// Constructed when the platform observes something, routed by mutable
/// reference, and dropped once routing returns. `handled` starts out
/// `false` and is set by the first handler that consumes the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    kind: EventKind,
    handled: bool,
}

impl Event {
    /// Wraps a concrete event. The new event is not handled.
    pub fn new<E: EventVariant>(event: E) -> Self {
        Self {
            kind: event.into_kind(),
            handled: false,
        }
    }

    /// Runtime type tag.
    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    /// Category bitmask.
    pub fn category(&self) -> EventCategory {
        self.kind.category()
    }

    /// Returns true if the event belongs to any of the given categories.
    pub fn is_in_category(&self, category: EventCategory) -> bool {
        self.category().intersects(category)
    }

    /// Returns true once a handler has consumed the event.
    pub fn is_handled(&self) -> bool {
        self.handled
    }

    /// Marks the event as consumed.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }

    pub(crate) fn set_handled(&mut self, handled: bool) {
        self.handled = handled;
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EventKind {
        &mut self.kind
    }

    /// Human-readable rendering, e.g. `"WindowResizedEvent: 800, 600"`.
    ///
    /// Logging code should format the event directly (`{}`) instead, so
    /// the string is only built when the line is actually written.
    pub fn description(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //=====================================================================
    // Type Tag Tests
    //=====================================================================

    #[test]
    fn static_type_matches_instance_type_for_resize() {
        let event = WindowResizedEvent::new(800, 600);
        assert_eq!(WindowResizedEvent::static_type(), event.event_type());
        assert_eq!(Event::from(event).event_type(), WindowResizedEvent::static_type());
    }

    #[test]
    fn static_type_matches_instance_type_for_close() {
        let event = WindowClosedEvent::new();
        assert_eq!(WindowClosedEvent::static_type(), event.event_type());
        assert_eq!(Event::from(event).event_type(), WindowClosedEvent::static_type());
    }

    #[test]
    fn event_types_are_distinct() {
        assert_ne!(
            WindowResizedEvent::static_type(),
            WindowClosedEvent::static_type(),
            "Each concrete event needs its own tag"
        );
    }

    #[test]
    fn event_type_names() {
        assert_eq!(EventType::WindowResized.to_string(), "WindowResized");
        assert_eq!(EventType::WindowClosed.name(), "WindowClosed");
    }

    //=====================================================================
    // Category Tests
    //=====================================================================

    #[test]
    fn window_events_are_application_events() {
        let resize = Event::new(WindowResizedEvent::new(1, 1));
        let close = Event::new(WindowClosedEvent::new());

        assert!(resize.is_in_category(EventCategory::APPLICATION));
        assert!(close.is_in_category(EventCategory::APPLICATION));
    }

    #[test]
    fn empty_category_matches_nothing() {
        let close = Event::new(WindowClosedEvent::new());
        assert!(!close.is_in_category(EventCategory::empty()));
        assert_eq!(close.category(), EventCategory::all());
    }

    //=====================================================================
    // Handled Flag Tests
    //=====================================================================

    #[test]
    fn new_event_is_not_handled() {
        let event = Event::new(WindowClosedEvent::new());
        assert!(!event.is_handled(), "Events start out unhandled");
    }

    #[test]
    fn mark_handled_sets_flag() {
        let mut event = Event::new(WindowResizedEvent::new(10, 20));
        event.mark_handled();
        assert!(event.is_handled());
    }

    //=====================================================================
    // Description Tests
    //=====================================================================

    #[test]
    fn resize_description_contains_dimensions() {
        let event = Event::new(WindowResizedEvent::new(800, 600));
        let description = event.description();

        assert!(description.contains("800"), "Missing width in {description:?}");
        assert!(description.contains("600"), "Missing height in {description:?}");
    }

    #[test]
    fn close_description_names_the_event() {
        let event = Event::new(WindowClosedEvent::new());
        assert_eq!(event.to_string(), "WindowClosedEvent");
    }

    //=====================================================================
    // Narrowing Tests
    //=====================================================================

    #[test]
    fn narrow_mut_returns_matching_variant() {
        let mut event = Event::new(WindowResizedEvent::new(320, 240));
        let resize = WindowResizedEvent::narrow_mut(event.kind_mut());

        assert_eq!(resize.map(|r| (r.width(), r.height())), Some((320, 240)));
    }

    #[test]
    fn narrow_mut_rejects_other_variant() {
        let mut event = Event::new(WindowResizedEvent::new(320, 240));
        assert!(WindowClosedEvent::narrow_mut(event.kind_mut()).is_none());
    }
}
