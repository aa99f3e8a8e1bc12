//! Input handling: UI event types and the processor that converts them into
//! session commands.
//!
//! Events come from three places: the alignment grid (column enter/leave/
//! click, chain row clicks), the feature-track widget's hover callback, and
//! the keyboard.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into session commands.
pub mod processor;

pub use event::{InputEvent, KeyAction};
pub use processor::InputProcessor;
