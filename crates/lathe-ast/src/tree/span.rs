/// Span represents a region in source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub lo: u32, // Start byte position
    pub hi: u32, // End byte position
}

impl Span {
    pub const DUMMY: Span = Span { lo: 0, hi: 0 };

    pub fn new(lo: u32, hi: u32) -> Self {
        Self { lo, hi }
    }

    /// Zero-width span at a byte offset.
    pub fn at(offset: usize) -> Self {
        let lo = u32::try_from(offset).unwrap_or(u32::MAX);
        Self { lo, hi: lo }
    }

    pub fn is_dummy(&self) -> bool {
        *self == Span::DUMMY
    }
}
