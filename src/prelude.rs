//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use ember_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application facade
pub use crate::{Application, ApplicationBuilder, ApplicationState, EventHandler};

// Event system
pub use crate::core::event::{
    Event, EventCategory, EventDispatcher, EventKind, EventType, EventVariant, WindowClosedEvent,
    WindowResizedEvent,
};

// Platform contracts
pub use crate::platform::{PlatformError, RenderContext, Window, WindowProperties};

// Logging
pub use crate::logger::{Logger, Verbosity};
