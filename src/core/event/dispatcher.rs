//=========================================================================
// Event Dispatcher
//
// Routes one event to a typed handler when its runtime type matches.
//
// Usage:
// ```text
//   let mut dispatcher = EventDispatcher::new(&mut event);
//   dispatcher.dispatch::<WindowClosedEvent>(|e| on_close(e));
//   dispatcher.dispatch::<WindowResizedEvent>(|e| on_resize(e));
// ```
//
// Each `dispatch` call is independent: at most one handler runs per call,
// and a call whose type does not match is a silent no-op. Once a handler
// has consumed the event, later calls on the same event do nothing.
//
//=========================================================================

use log::trace;

use super::{Event, EventVariant};
use crate::logger::ENGINE_CATEGORY;

//=== EventDispatcher =====================================================

/// Short-lived helper bound to exactly one event.
///
/// Borrows the event for the duration of routing; build a new dispatcher
/// for every event.
pub struct EventDispatcher<'a> {
    event: &'a mut Event,
}

impl<'a> EventDispatcher<'a> {
    pub fn new(event: &'a mut Event) -> Self {
        Self { event }
    }

    /// Invokes `handler` if the event is of type `E`.
    ///
    /// The handler returns whether it consumed the event; that result is
    /// written into the event's handled flag.
    ///
    /// Returns true if the handler ran. Returns false without calling the
    /// handler when the type does not match or when the event has already
    /// been handled.
    ///
    /// # Panics
    ///
    /// Panics if the event's type tag says `E` but the payload is a
    /// different variant. That can only happen if an `EventVariant` impl
    /// disagrees with `EventKind::event_type`.
    pub fn dispatch<E: EventVariant>(&mut self, handler: impl FnOnce(&mut E) -> bool) -> bool {
        if self.event.is_handled() {
            trace!(
                target: ENGINE_CATEGORY,
                "Skipping {} dispatch, event already handled: {}",
                E::TYPE,
                self.event
            );
            return false;
        }

        if self.event.event_type() != E::static_type() {
            return false;
        }

        let narrowed = E::narrow_mut(self.event.kind_mut());
        crate::ember_assert!(
            narrowed.is_some(),
            ENGINE_CATEGORY,
            "event tagged {} does not hold that variant",
            E::TYPE
        );

        let handled = match narrowed {
            Some(concrete) => handler(concrete),
            None => return false,
        };
        self.event.set_handled(handled);
        true
    }

    /// The event being routed.
    pub fn event(&self) -> &Event {
        &*self.event
    }

    pub fn is_handled(&self) -> bool {
        self.event.is_handled()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventCategory, EventKind, EventType, WindowClosedEvent, WindowResizedEvent};
    use std::fmt;

    /// Claims to be a close but never narrows out of any kind.
    struct MislabeledEvent;

    impl fmt::Display for MislabeledEvent {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("MislabeledEvent")
        }
    }

    impl EventVariant for MislabeledEvent {
        const TYPE: EventType = EventType::WindowClosed;
        const CATEGORY: EventCategory = EventCategory::APPLICATION;

        fn into_kind(self) -> EventKind {
            EventKind::WindowClosed(WindowClosedEvent::new())
        }

        fn narrow_mut(_kind: &mut EventKind) -> Option<&mut Self> {
            None
        }
    }

    //=====================================================================
    // Mismatch Tests
    //=====================================================================

    #[test]
    fn mismatched_type_does_not_invoke_handler() {
        let mut event = Event::new(WindowResizedEvent::new(800, 600));
        let mut calls = 0;

        let ran = EventDispatcher::new(&mut event).dispatch::<WindowClosedEvent>(|_| {
            calls += 1;
            true
        });

        assert!(!ran, "Close handler must not run for a resize");
        assert_eq!(calls, 0);
        assert!(!event.is_handled(), "Handled flag must stay false on mismatch");
    }

    //=====================================================================
    // Match Tests
    //=====================================================================

    #[test]
    fn matching_type_invokes_handler_once_and_sets_handled() {
        let mut event = Event::new(WindowClosedEvent::new());
        let mut calls = 0;

        let ran = EventDispatcher::new(&mut event).dispatch::<WindowClosedEvent>(|_| {
            calls += 1;
            true
        });

        assert!(ran);
        assert_eq!(calls, 1, "Handler should run exactly once");
        assert!(event.is_handled(), "Consuming handler must mark the event handled");
    }

    #[test]
    fn handler_returning_false_leaves_event_unhandled() {
        let mut event = Event::new(WindowResizedEvent::new(1024, 768));

        let ran = EventDispatcher::new(&mut event).dispatch::<WindowResizedEvent>(|_| false);

        assert!(ran, "Handler ran even though it did not consume");
        assert!(!event.is_handled());
    }

    #[test]
    fn handler_receives_concrete_payload() {
        let mut event = Event::new(WindowResizedEvent::new(1024, 768));
        let mut seen = None;

        EventDispatcher::new(&mut event).dispatch::<WindowResizedEvent>(|resize| {
            seen = Some((resize.width(), resize.height()));
            false
        });

        assert_eq!(seen, Some((1024, 768)));
    }

    #[test]
    #[should_panic(expected = "does not hold that variant")]
    fn tag_match_without_variant_is_fatal() {
        let mut event = Event::new(WindowClosedEvent::new());

        EventDispatcher::new(&mut event).dispatch::<MislabeledEvent>(|_| true);
    }

    //=====================================================================
    // Sequencing Tests
    //=====================================================================

    #[test]
    fn sequential_attempts_run_only_the_matching_handler() {
        let mut event = Event::new(WindowResizedEvent::new(640, 480));
        let mut close_calls = 0;
        let mut resize_calls = 0;

        let mut dispatcher = EventDispatcher::new(&mut event);
        dispatcher.dispatch::<WindowClosedEvent>(|_| {
            close_calls += 1;
            true
        });
        dispatcher.dispatch::<WindowResizedEvent>(|_| {
            resize_calls += 1;
            true
        });

        assert_eq!(close_calls, 0);
        assert_eq!(resize_calls, 1);
        assert!(dispatcher.is_handled());
    }

    #[test]
    fn handled_event_is_not_dispatched_again() {
        let mut event = Event::new(WindowClosedEvent::new());
        let mut calls = 0;

        let mut dispatcher = EventDispatcher::new(&mut event);
        let first = dispatcher.dispatch::<WindowClosedEvent>(|_| {
            calls += 1;
            true
        });
        let second = dispatcher.dispatch::<WindowClosedEvent>(|_| {
            calls += 1;
            true
        });

        assert!(first);
        assert!(!second, "Second attempt on a consumed event is a no-op");
        assert_eq!(calls, 1);
    }

    #[test]
    fn unconsumed_event_can_be_offered_again() {
        let mut event = Event::new(WindowResizedEvent::new(1, 2));
        let mut calls = 0;

        let mut dispatcher = EventDispatcher::new(&mut event);
        dispatcher.dispatch::<WindowResizedEvent>(|_| {
            calls += 1;
            false
        });
        dispatcher.dispatch::<WindowResizedEvent>(|_| {
            calls += 1;
            true
        });

        assert_eq!(calls, 2, "An unconsumed event is still offered to later handlers");
        assert!(dispatcher.event().is_handled());
    }
}
