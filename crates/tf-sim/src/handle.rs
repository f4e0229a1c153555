use std::fmt;

/// A weak, generation-checked reference to an actor.
///
/// Packs the slot's generation in the high 16 bits and the slot index in
/// the low 16 bits. A handle resolves only while the slot still holds the
/// generation it was issued with, so references to a destroyed actor go
/// dead instead of aliasing whatever reuses the slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorHandle(u32);

impl ActorHandle {
    /// The reserved "no actor" handle. Never issued by the arena.
    pub const INVALID: Self = Self(0xFFFF_FFFF);

    /// Reserved half-value; the arena never issues it as a generation or index.
    pub const RESERVED: u16 = 0xFFFF;

    /// Pack a generation and slot index.
    pub fn new(generation: u16, index: u16) -> Self {
        Self((u32::from(generation) << 16) | u32::from(index))
    }

    /// Generation of the slot when this handle was issued.
    pub fn generation(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Slot index.
    pub fn index(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Whether this is anything but [`ActorHandle::INVALID`].
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    /// The packed 32-bit value.
    pub fn to_raw(self) -> u32 {
        self.0
    }

    /// Unpack a value produced by [`ActorHandle::to_raw`].
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }
}

impl Default for ActorHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "ActorHandle({}v{})", self.index(), self.generation())
        } else {
            f.write_str("ActorHandle(INVALID)")
        }
    }
}

impl fmt::Display for ActorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}v{}", self.index(), self.generation())
        } else {
            f.write_str("#invalid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_generation_high_and_index_low() {
        let h = ActorHandle::new(3, 17);
        assert_eq!(h.to_raw(), (3 << 16) | 17);
        assert_eq!(h.generation(), 3);
        assert_eq!(h.index(), 17);
        assert_eq!(ActorHandle::from_raw(h.to_raw()), h);
    }

    #[test]
    fn invalid_is_both_halves_reserved() {
        let h = ActorHandle::new(ActorHandle::RESERVED, ActorHandle::RESERVED);
        assert_eq!(h, ActorHandle::INVALID);
        assert!(!h.is_valid());
        assert_eq!(ActorHandle::default(), ActorHandle::INVALID);
    }

    #[test]
    fn display_forms() {
        assert_eq!(ActorHandle::new(2, 5).to_string(), "#5v2");
        assert_eq!(ActorHandle::INVALID.to_string(), "#invalid");
        assert_eq!(format!("{:?}", ActorHandle::new(0, 1)), "ActorHandle(1v0)");
    }
}
