//! Traversal options shared by every primary.

use bitflags::bitflags;

bitflags! {
    /// Records which options the operator set explicitly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct OptionFlags: u8 {
        const MINDEPTH = 1 << 0;
        const MAXDEPTH = 1 << 1;
    }
}

/// Options controlling how far the traversal descends.
///
/// Depth 0 is a root entry. `maxdepth` is inclusive; `None` means no limit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Options {
    pub mindepth: usize,
    pub maxdepth: Option<usize>,
    set: OptionFlags,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `mindepth` and marks it as explicitly set.
    pub fn set_mindepth(&mut self, depth: usize) {
        self.mindepth = depth;
        self.mark_as_set(OptionFlags::MINDEPTH);
    }

    /// Sets `maxdepth` and marks it as explicitly set.
    pub fn set_maxdepth(&mut self, depth: usize) {
        self.maxdepth = Some(depth);
        self.mark_as_set(OptionFlags::MAXDEPTH);
    }

    pub fn mark_as_set(&mut self, flag: OptionFlags) {
        self.set |= flag;
    }

    pub fn is_set(&self, flag: OptionFlags) -> bool {
        self.set.contains(flag)
    }

    /// Returns `true` if entries at `depth` may be reported.
    pub fn reports(&self, depth: usize) -> bool {
        depth >= self.mindepth && self.maxdepth.map_or(true, |max| depth <= max)
    }

    /// Returns `true` if the traversal should visit children of an entry at `depth`.
    pub fn descends(&self, depth: usize) -> bool {
        self.maxdepth.map_or(true, |max| depth < max)
    }
}
