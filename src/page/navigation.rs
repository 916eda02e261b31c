use crate::element::{ElementId, VisualClass};
use crate::host::RenderTarget;
use crate::throttle::{ViewportConsumer, ViewportSample};

/// A menu entry and where its section starts on the page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavLink {
    pub link: ElementId,
    pub section_top: f32,
}

/// Mobile menu toggle and anchor scrolling.
pub struct Navigation {
    menu: ElementId,
    hamburger: ElementId,
    links: Vec<NavLink>,
    breakpoint: f32,
    anchor_offset: f32,
    width: f32,
}

impl Navigation {
    pub fn new(
        menu: ElementId,
        hamburger: ElementId,
        links: Vec<NavLink>,
        breakpoint: f32,
        anchor_offset: f32,
    ) -> Self {
        Self {
            menu,
            hamburger,
            links,
            breakpoint,
            anchor_offset,
            width: f32::INFINITY,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.width <= self.breakpoint
    }

    pub fn is_open(&self, render: &dyn RenderTarget) -> bool {
        render.has_class(self.menu, VisualClass::ACTIVE)
    }

    pub fn is_link(&self, element: ElementId) -> bool {
        self.links.iter().any(|l| l.link == element)
    }

    pub fn toggle(&mut self, render: &mut dyn RenderTarget) {
        render.toggle_class(self.menu, VisualClass::ACTIVE);
        render.toggle_class(self.hamburger, VisualClass::ACTIVE);
    }

    /// Returns whether the click was taken over (default navigation prevented).
    pub fn on_link_click(&mut self, link: ElementId, render: &mut dyn RenderTarget) -> bool {
        let Some(target) = self.links.iter().find(|l| l.link == link).copied() else {
            return false;
        };
        if self.is_mobile() {
            self.close(render);
        }
        render.scroll_to(target.section_top - self.anchor_offset, true);
        true
    }

    pub fn on_resize(&mut self, width: f32, render: &mut dyn RenderTarget) {
        self.width = width;
        if !self.is_mobile() {
            self.close(render);
        }
    }

    fn close(&self, render: &mut dyn RenderTarget) {
        render.remove_class(self.menu, VisualClass::ACTIVE);
        render.remove_class(self.hamburger, VisualClass::ACTIVE);
    }
}

/// Marks the navbar once the page is scrolled past a threshold.
pub struct NavbarScroll {
    navbar: ElementId,
    threshold: f32,
}

impl NavbarScroll {
    pub fn new(navbar: ElementId, threshold: f32) -> Self {
        Self { navbar, threshold }
    }
}

impl ViewportConsumer for NavbarScroll {
    fn on_sample(&mut self, sample: &ViewportSample, render: &mut dyn RenderTarget) {
        let Some(offset) = sample.scroll_offset() else {
            return;
        };
        if offset > self.threshold {
            render.add_class(self.navbar, VisualClass::SCROLLED);
        } else {
            render.remove_class(self.navbar, VisualClass::SCROLLED);
        }
    }
}
