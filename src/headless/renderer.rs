//! In-memory render target.
//!
//! Stores nodes in a sparse-set arena with generational indices, so stale
//! [`ElementId`]s held by timers or tasks resolve to "missing" instead of to
//! whatever node reused the slot.
//!
//! Every mutation is also appended to an operation log that tests drain with
//! [`HeadlessRenderer::take_ops`].

use std::time::Duration;

use crate::animation::{Animatable, Transition};
use crate::element::{ElementId, ElementKind, Insert, VisualClass};
use crate::host::RenderTarget;
use crate::style::{Keyframes, Style};

/// One mutation applied to the headless document.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOp {
    AddClass(ElementId, VisualClass),
    RemoveClass(ElementId, VisualClass),
    SetStyle(ElementId, Style),
    Animate(ElementId, Keyframes),
    SetText(ElementId, String),
    SetValue(ElementId, f32),
    Create(ElementId, ElementKind),
    Remove(ElementId),
    ScrollTo { offset: f32, smooth: bool },
    ScrollLock(bool),
}

impl RenderOp {
    pub fn element(&self) -> Option<ElementId> {
        match self {
            RenderOp::AddClass(id, _)
            | RenderOp::RemoveClass(id, _)
            | RenderOp::SetStyle(id, _)
            | RenderOp::Animate(id, _)
            | RenderOp::SetText(id, _)
            | RenderOp::SetValue(id, _)
            | RenderOp::Create(id, _)
            | RenderOp::Remove(id) => Some(*id),
            RenderOp::ScrollTo { .. } | RenderOp::ScrollLock(_) => None,
        }
    }
}

/// Style change that is still interpolating.
#[derive(Clone, Debug, PartialEq)]
struct InFlight {
    from: Style,
    to: Style,
    transition: Transition,
}

#[derive(Debug)]
pub struct Node {
    pub kind: ElementKind,
    pub parent: Option<ElementId>,
    pub children: Vec<ElementId>,
    pub classes: VisualClass,
    pub style: Style,
    pub text: String,
    pub value: f32,
    in_flight: Option<InFlight>,
    /// Back-pointer to the sparse slot (for swap-remove fixup)
    sparse_index: u32,
}

struct SparseEntry {
    dense_index: usize,
    generation: u32,
}

pub struct HeadlessRenderer {
    dense: Vec<Node>,
    sparse: Vec<Option<SparseEntry>>,
    /// Freed sparse slots with the generation they last held
    free_indices: Vec<(u32, u32)>,
    body: ElementId,
    scroll_offset: f32,
    scroll_locked: bool,
    ops: Vec<RenderOp>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        let mut renderer = Self {
            dense: Vec::new(),
            sparse: Vec::new(),
            free_indices: Vec::new(),
            body: ElementId::new(0, 0),
            scroll_offset: 0.0,
            scroll_locked: false,
            ops: Vec::new(),
        };
        renderer.body = renderer.insert_node(ElementKind::Container, None);
        renderer
    }

    pub fn body(&self) -> ElementId {
        self.body
    }

    pub fn node(&self, id: ElementId) -> Option<&Node> {
        self.dense_index(id).map(|idx| &self.dense[idx])
    }

    pub fn classes(&self, id: ElementId) -> VisualClass {
        self.node(id).map(|n| n.classes).unwrap_or_default()
    }

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.node(id).map(|n| &n.style)
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.node(id).map(|n| n.text.as_str())
    }

    pub fn value(&self, id: ElementId) -> Option<f32> {
        self.node(id).map(|n| n.value)
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn element_count(&self) -> usize {
        self.dense.len()
    }

    pub fn count_kind(&self, kind: ElementKind) -> usize {
        self.dense.iter().filter(|n| n.kind == kind).count()
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    /// Drain the operation log.
    pub fn take_ops(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.ops)
    }

    /// Style the element shows `elapsed` after its last transition started.
    pub fn sample_style(&self, id: ElementId, elapsed: Duration) -> Option<Style> {
        let node = self.node(id)?;
        Some(match &node.in_flight {
            Some(flight) => {
                let t = flight.transition.progress(elapsed);
                Style::lerp(&flight.from, &flight.to, t)
            }
            None => node.style.clone(),
        })
    }

    fn insert_node(&mut self, kind: ElementKind, parent: Option<ElementId>) -> ElementId {
        let (sparse_index, generation) = match self.free_indices.pop() {
            Some((idx, old_gen)) => (idx, old_gen.wrapping_add(1)),
            None => {
                let idx = self.sparse.len() as u32;
                self.sparse.push(None);
                (idx, 0)
            }
        };
        let dense_index = self.dense.len();
        self.dense.push(Node {
            kind,
            parent,
            children: Vec::new(),
            classes: VisualClass::empty(),
            style: Style::default(),
            text: String::new(),
            value: 0.0,
            in_flight: None,
            sparse_index,
        });
        self.sparse[sparse_index as usize] = Some(SparseEntry {
            dense_index,
            generation,
        });
        ElementId::new(sparse_index, generation)
    }

    fn dense_index(&self, id: ElementId) -> Option<usize> {
        self.sparse
            .get(id.index() as usize)
            .and_then(|e| e.as_ref())
            .filter(|e| e.generation == id.generation())
            .map(|e| e.dense_index)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        let idx = self.dense_index(id)?;
        Some(&mut self.dense[idx])
    }

    /// Swap-remove one node, without touching its children.
    fn remove_single(&mut self, id: ElementId) -> Option<Node> {
        let dense_index = self.dense_index(id)?;
        let last = self.dense.len() - 1;
        let removed = self.dense.swap_remove(dense_index);
        if dense_index != last {
            let moved = self.dense[dense_index].sparse_index;
            if let Some(entry) = self.sparse[moved as usize].as_mut() {
                entry.dense_index = dense_index;
            }
        }
        self.sparse[id.index() as usize] = None;
        self.free_indices.push((id.index(), id.generation()));
        Some(removed)
    }
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTarget for HeadlessRenderer {
    fn contains(&self, element: ElementId) -> bool {
        self.dense_index(element).is_some()
    }

    fn has_class(&self, element: ElementId, class: VisualClass) -> bool {
        self.classes(element).contains(class)
    }

    fn add_class(&mut self, element: ElementId, class: VisualClass) {
        if let Some(node) = self.node_mut(element) {
            node.classes.insert(class);
            self.ops.push(RenderOp::AddClass(element, class));
        }
    }

    fn remove_class(&mut self, element: ElementId, class: VisualClass) {
        if let Some(node) = self.node_mut(element) {
            node.classes.remove(class);
            self.ops.push(RenderOp::RemoveClass(element, class));
        }
    }

    fn set_style(&mut self, element: ElementId, style: &Style) {
        if let Some(node) = self.node_mut(element) {
            let before = node.style.clone();
            node.style.merge(style);
            // A declared transition stays on the element and animates every later change
            node.in_flight = node.style.transition.map(|transition| InFlight {
                from: before,
                to: node.style.clone(),
                transition,
            });
            self.ops.push(RenderOp::SetStyle(element, style.clone()));
        }
    }

    fn animate(&mut self, element: ElementId, keyframes: &Keyframes) {
        if let Some(node) = self.node_mut(element) {
            node.in_flight = Some(InFlight {
                from: keyframes.from.clone(),
                to: keyframes.to.clone(),
                transition: keyframes.transition,
            });
            self.ops.push(RenderOp::Animate(element, keyframes.clone()));
        }
    }

    fn set_text(&mut self, element: ElementId, text: &str) {
        if let Some(node) = self.node_mut(element) {
            node.text = text.to_string();
            self.ops.push(RenderOp::SetText(element, text.to_string()));
        }
    }

    fn set_value(&mut self, element: ElementId, value: f32) {
        if let Some(node) = self.node_mut(element) {
            node.value = value;
            self.ops.push(RenderOp::SetValue(element, value));
        }
    }

    fn create_element(
        &mut self,
        parent: ElementId,
        kind: ElementKind,
        insert: Insert,
    ) -> Option<ElementId> {
        if !self.contains(parent) {
            return None;
        }
        let id = self.insert_node(kind, Some(parent));
        let parent_node = self.node_mut(parent)?;
        match insert {
            Insert::First => parent_node.children.insert(0, id),
            Insert::Last => parent_node.children.push(id),
        }
        self.ops.push(RenderOp::Create(id, kind));
        Some(id)
    }

    fn remove_element(&mut self, element: ElementId) {
        if element == self.body {
            return;
        }
        let Some(node) = self.remove_single(element) else {
            return;
        };
        if let Some(parent) = node.parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&c| c != element);
        }
        let mut stack = node.children;
        while let Some(child) = stack.pop() {
            if let Some(removed) = self.remove_single(child) {
                stack.extend(removed.children);
            }
        }
        self.ops.push(RenderOp::Remove(element));
    }

    fn scroll_to(&mut self, offset: f32, smooth: bool) {
        self.scroll_offset = offset.max(0.0);
        self.ops.push(RenderOp::ScrollTo { offset, smooth });
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        self.scroll_locked = locked;
        self.ops.push(RenderOp::ScrollLock(locked));
    }
}
