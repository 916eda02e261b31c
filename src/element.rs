//! Element handles and the visual classes a render target understands.

use bitflags::bitflags;

/// Opaque handle to a visual node owned by the render target.
///
/// Uses a generational index so that a stale handle never aliases a node
/// created later in the same slot:
/// - `index`: slot position (reusable after removal)
/// - `generation`: bumped every time the slot is reused
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ElementId {
    index: u32,
    generation: u32,
}

impl ElementId {
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    pub fn index(self) -> u32 {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }

    /// Pack into a u64 for hosts that key nodes by integer.
    /// Generation in the high bits, index in the low bits.
    pub fn as_u64(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }

    pub fn from_u64(raw: u64) -> Self {
        Self {
            index: raw as u32,
            generation: (raw >> 32) as u32,
        }
    }
}

bitflags! {
    /// Named visual states that can be toggled on an element.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct VisualClass: u32 {
        const ANIMATED       = 1 << 0;
        const APPEAR         = 1 << 1;
        const HOVER_GROW     = 1 << 2;
        const FADE_IN        = 1 << 3;
        const SCROLLED       = 1 << 4;
        /// Open mobile menu / pressed hamburger
        const ACTIVE         = 1 << 5;
        const HEARTBEAT      = 1 << 6;
        const RAINBOW_TEXT   = 1 << 7;
        const GLOW           = 1 << 8;
        const HIDDEN         = 1 << 9;
        const ACTIVATED      = 1 << 10;
        const OVERLAY_HIDDEN = 1 << 11;
        const PLAYING        = 1 << 12;
        const MUTED          = 1 << 13;
        const RIPPLE         = 1 << 14;
        const TIMESTAMP      = 1 << 15;
    }
}

/// What kind of node to create when the page spawns elements at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Container,
    Text,
    Button,
    Section,
    Card,
    WishEntry,
    ConfettiPiece,
    Firework,
    Ripple,
}

/// Where a created element lands among its parent's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insert {
    First,
    Last,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_u64_packing() {
        let id = ElementId::new(7, 3);
        assert_eq!(id.as_u64(), (3u64 << 32) | 7);
        assert_eq!(ElementId::from_u64(id.as_u64()), id);
    }

    #[test]
    fn test_generation_distinguishes_slots() {
        assert_ne!(ElementId::new(1, 0), ElementId::new(1, 1));
    }
}
