use std::time::Duration;

use crate::element::{ElementId, VisualClass};
use crate::host::{Host, RenderTarget, Timeout};

use super::PageTimer;

/// ```text
/// Shown --(open click)--> Activated --(button delay)--> Hiding --(fade)--> Revealed
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayState {
    Shown,
    Activated,
    Hiding,
    Revealed,
}

/// The full-screen card covering the page until the guest opens it.
pub struct Overlay {
    overlay: ElementId,
    button: ElementId,
    body: ElementId,
    state: OverlayState,
    button_delay: Duration,
    fade: Duration,
}

impl Overlay {
    pub fn new(
        overlay: ElementId,
        button: ElementId,
        body: ElementId,
        button_delay: Duration,
        fade: Duration,
    ) -> Self {
        Self {
            overlay,
            button,
            body,
            state: OverlayState::Shown,
            button_delay,
            fade,
        }
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn button(&self) -> ElementId {
        self.button
    }

    /// The page does not scroll while the overlay is up.
    pub fn on_loaded(&mut self, render: &mut dyn RenderTarget) {
        if self.state == OverlayState::Shown {
            render.set_scroll_locked(true);
        }
    }

    /// Returns whether the click opened the overlay. Later clicks are ignored.
    pub fn open(&mut self, host: &mut Host<'_>) -> bool {
        if self.state != OverlayState::Shown {
            return false;
        }
        host.render.add_class(self.button, VisualClass::ACTIVATED);
        host.timers
            .schedule(self.button_delay, Timeout::Page(PageTimer::OverlayHide));
        self.state = OverlayState::Activated;
        log::info!("overlay opened");
        true
    }

    /// Returns whether the overlay started hiding.
    pub fn hide(&mut self, host: &mut Host<'_>) -> bool {
        if self.state != OverlayState::Activated {
            return false;
        }
        host.render.add_class(self.overlay, VisualClass::HIDDEN);
        host.timers
            .schedule(self.fade, Timeout::Page(PageTimer::OverlayUnlock));
        self.state = OverlayState::Hiding;
        true
    }

    pub fn unlock(&mut self, render: &mut dyn RenderTarget) {
        if self.state != OverlayState::Hiding {
            return;
        }
        render.set_scroll_locked(false);
        render.add_class(self.body, VisualClass::OVERLAY_HIDDEN);
        self.state = OverlayState::Revealed;
        log::debug!("overlay gone, page unlocked");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Insert};
    use crate::headless::{HeadlessRenderer, ManualTimers};
    use crate::host::Event;

    #[test]
    fn test_state_machine() {
        let mut render = HeadlessRenderer::new();
        let mut timers = ManualTimers::new();
        let body = render.body();
        let overlay_el = render
            .create_element(body, ElementKind::Container, Insert::Last)
            .unwrap();
        let button = render
            .create_element(overlay_el, ElementKind::Button, Insert::Last)
            .unwrap();
        let mut overlay = Overlay::new(
            overlay_el,
            button,
            body,
            Duration::from_millis(300),
            Duration::from_millis(1200),
        );

        overlay.on_loaded(&mut render);
        assert!(render.is_scroll_locked());

        assert!(overlay.open(&mut Host::new(&mut render, &mut timers)));
        assert!(!overlay.open(&mut Host::new(&mut render, &mut timers)));
        assert!(render.has_class(button, VisualClass::ACTIVATED));
        assert_eq!(overlay.state(), OverlayState::Activated);

        let mut drive = |by: u64, render: &mut HeadlessRenderer, timers: &mut ManualTimers| {
            timers.advance(Duration::from_millis(by), render, |event, host| {
                if let Event::TimerFired {
                    timeout: Timeout::Page(timer),
                    ..
                } = event
                {
                    match timer {
                        PageTimer::OverlayHide => {
                            overlay.hide(host);
                        }
                        PageTimer::OverlayUnlock => overlay.unlock(&mut *host.render),
                        _ => {}
                    }
                }
            })
        };

        drive(299, &mut render, &mut timers);
        assert!(!render.has_class(overlay_el, VisualClass::HIDDEN));
        drive(1, &mut render, &mut timers);
        assert!(render.has_class(overlay_el, VisualClass::HIDDEN));
        assert!(render.is_scroll_locked());
        drive(1200, &mut render, &mut timers);
        assert!(!render.is_scroll_locked());
        assert!(render.has_class(body, VisualClass::OVERLAY_HIDDEN));
        assert_eq!(overlay.state(), OverlayState::Revealed);
    }
}
