use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Declaration modifier bits.
///
/// The bit layout follows the host's encoding. Bits without a name are kept
/// as-is: they are never cleared, renamed or reinterpreted here.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u64);

impl Flags {
    pub const PUBLIC: Flags = Flags(1);
    pub const PRIVATE: Flags = Flags(1 << 1);
    pub const PROTECTED: Flags = Flags(1 << 2);
    pub const STATIC: Flags = Flags(1 << 3);
    pub const FINAL: Flags = Flags(1 << 4);
    pub const SYNCHRONIZED: Flags = Flags(1 << 5);
    pub const VOLATILE: Flags = Flags(1 << 6);
    pub const TRANSIENT: Flags = Flags(1 << 7);
    pub const NATIVE: Flags = Flags(1 << 8);
    pub const INTERFACE: Flags = Flags(1 << 9);
    pub const ABSTRACT: Flags = Flags(1 << 10);
    pub const STRICTFP: Flags = Flags(1 << 11);
    pub const ANNOTATION: Flags = Flags(1 << 13);
    pub const ENUM: Flags = Flags(1 << 14);

    const NAMED: [(Flags, &'static str); 14] = [
        (Flags::PUBLIC, "public"),
        (Flags::PRIVATE, "private"),
        (Flags::PROTECTED, "protected"),
        (Flags::STATIC, "static"),
        (Flags::FINAL, "final"),
        (Flags::SYNCHRONIZED, "synchronized"),
        (Flags::VOLATILE, "volatile"),
        (Flags::TRANSIENT, "transient"),
        (Flags::NATIVE, "native"),
        (Flags::INTERFACE, "interface"),
        (Flags::ABSTRACT, "abstract"),
        (Flags::STRICTFP, "strictfp"),
        (Flags::ANNOTATION, "annotation"),
        (Flags::ENUM, "enum"),
    ];

    pub const fn empty() -> Self {
        Flags(0)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Wrap raw bits, keeping every bit including unnamed ones.
    pub const fn from_bits_retain(bits: u64) -> Self {
        Flags(bits)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every bit of `other` is set.
    pub fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    pub fn intersects(self, other: Flags) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Flags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Flags) {
        self.0 &= !other.0;
    }

    /// Look up a modifier by its source keyword.
    pub fn from_name(name: &str) -> Option<Flags> {
        Self::NAMED.iter().find(|(_, n)| *n == name).map(|(f, _)| *f)
    }

    /// Source keywords of the named bits that are set, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED.into_iter().filter(move |(f, _)| self.contains(*f)).map(|(_, n)| n)
    }

    /// Bits that have no source keyword.
    pub fn unnamed_bits(self) -> u64 {
        let named = Self::NAMED.iter().fold(0, |acc, (f, _)| acc | f.0);
        self.0 & !named
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for name in self.names() {
            set.entry(&format_args!("{}", name));
        }
        let unnamed = self.unnamed_bits();
        if unnamed != 0 {
            set.entry(&format_args!("{:#x}", unnamed));
        }
        set.finish()
    }
}
