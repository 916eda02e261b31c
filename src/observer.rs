//! Edge-triggered visibility tracking.
//!
//! The host computes how much of each watched element intersects the
//! viewport and feeds the ratios in. The observer turns that level signal
//! into edges: it reports `(element, visible)` only when the state differs
//! from what it last reported for that element, so an element sitting in
//! view produces exactly one `true`.

use std::collections::HashMap;

use crate::element::ElementId;
use crate::error::{Error, Result};
use crate::host::IntersectionEntry;

/// An edge reported by the observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityChange {
    pub element: ElementId,
    pub visible: bool,
}

#[derive(Debug)]
struct Watch {
    threshold: f32,
    reported_visible: bool,
}

impl Watch {
    fn is_visible(&self, ratio: f32) -> bool {
        if self.threshold == 0.0 {
            ratio > 0.0
        } else {
            ratio >= self.threshold
        }
    }
}

#[derive(Debug, Default)]
pub struct VisibilityObserver {
    watches: HashMap<ElementId, Watch>,
}

impl VisibilityObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start watching `element`. `threshold` is the fraction of the element
    /// that must be in view, `0.0` meaning "any part of it".
    ///
    /// Registering an element that is already watched replaces its threshold
    /// and forgets what was last reported for it.
    pub fn register(&mut self, element: ElementId, threshold: f32) -> Result<()> {
        validate_threshold(threshold)?;
        self.watches.insert(
            element,
            Watch {
                threshold,
                reported_visible: false,
            },
        );
        Ok(())
    }

    /// Returns whether the element was being watched.
    pub fn unregister(&mut self, element: ElementId) -> bool {
        self.watches.remove(&element).is_some()
    }

    pub fn is_registered(&self, element: ElementId) -> bool {
        self.watches.contains_key(&element)
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    /// Feed one raw intersection. Returns the edge, if any.
    pub fn observe(&mut self, entry: IntersectionEntry) -> Option<VisibilityChange> {
        let watch = self.watches.get_mut(&entry.element)?;
        let visible = watch.is_visible(entry.ratio);
        if visible == watch.reported_visible {
            return None;
        }
        watch.reported_visible = visible;
        log::trace!(
            "{:?} became {} at ratio {}",
            entry.element,
            if visible { "visible" } else { "hidden" },
            entry.ratio
        );
        Some(VisibilityChange {
            element: entry.element,
            visible,
        })
    }

    /// Feed a batch of intersections, keeping the host's order.
    pub fn observe_all<I>(&mut self, entries: I) -> Vec<VisibilityChange>
    where
        I: IntoIterator<Item = IntersectionEntry>,
    {
        entries
            .into_iter()
            .filter_map(|entry| self.observe(entry))
            .collect()
    }
}

pub(crate) fn validate_threshold(threshold: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(Error::config(format!(
            "visibility threshold must be within [0, 1], got {}",
            threshold
        )));
    }
    Ok(())
}
