//! Host doubles that run without a display: an in-memory document, a
//! virtual clock and a media element. Used by the tests and by offline
//! runs of the page.

mod media;
mod renderer;
mod timers;

pub use media::{HeadlessMedia, MediaState};
pub use renderer::{HeadlessRenderer, Node, RenderOp};
pub use timers::ManualTimers;
