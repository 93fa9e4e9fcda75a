//=========================================================================
// Core
//
// Engine-side systems with no dependency on the OS layer.
//
// Currently this is the event system: the event taxonomy and the
// dispatcher used to route events to typed handlers.
//
//=========================================================================

pub mod event;
