//! Staged reveal and viewport-driven effects for a greeting page.
//!
//! The core is host-agnostic: it never touches a document or a clock
//! directly, only the capabilities in [`host`]. A [`Stage`] tracks which
//! elements have become visible and reveals each one exactly once, in two
//! phases with a painted frame in between. Scroll and resize bursts are
//! throttled before they reach their consumers.
//!
//! [`page::Page`] layers the greeting page itself on top: navigation, the
//! wish board, media controls, the opening overlay and particle effects.
//!
//! ## Hosts
//!
//! - [`headless`]: in-memory document and virtual clock, for tests and
//!   offline runs.
//! - [`runtime::LoopDriver`]: wall-clock timers on a calloop event loop.

pub mod animation;
pub mod element;
pub mod error;
pub mod headless;
pub mod host;
pub mod observer;
pub mod page;
pub mod runtime;
pub mod sequencer;
pub mod stage;
pub mod style;
pub mod throttle;

pub use error::{Error, Result};
pub use stage::{Stage, StageConfig};

pub mod prelude {
    pub use crate::animation::{Animatable, TimingFunction, Transform, Transition};
    pub use crate::element::{ElementId, ElementKind, Insert, VisualClass};
    pub use crate::host::{
        Event, Host, IntersectionEntry, MediaHandle, PlaybackError, RenderTarget, TimerId,
        Timeout, Timers,
    };
    pub use crate::observer::{VisibilityChange, VisibilityObserver};
    pub use crate::page::{
        Click, EventResponse, Focus, Key, Page, PageConfig, PageElements, PageEvent, PageTimer,
    };
    pub use crate::sequencer::{RevealConfig, RevealSequencer, Stagger, WatchState};
    pub use crate::style::{Color, Motion, Style};
    pub use crate::throttle::{SampleChannel, Throttle, ViewportConsumer, ViewportSample};
    pub use crate::{Error, Result, Stage, StageConfig};
}

/// Install the `env_logger` backend; `RUST_LOG` controls verbosity.
/// Later calls are no-ops.
pub fn init_logging() {
    if env_logger::try_init().is_err() {
        log::trace!("logger already installed");
    }
}
