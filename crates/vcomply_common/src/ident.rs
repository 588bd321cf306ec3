//! Interned identifiers for cheap cloning and O(1) equality comparison.

use lasso::ThreadedRodeo;
use serde::{Deserialize, Serialize};

use crate::name::Name;

/// A unique identifier for any named construct in a design.
///
/// Identifiers are interned strings represented as a `u32` index into a
/// string interner. This provides O(1) equality comparison and O(1) cloning.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Ident(u32);

impl Ident {
    /// Creates an `Ident` from a raw `u32` index.
    ///
    /// This is primarily intended for deserialization and testing.
    /// In normal use, identifiers should be created through [`Interner::get_or_intern`].
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit and
// 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Thread-safe string interner backed by [`lasso::ThreadedRodeo`].
///
/// VHDL basic identifiers are case-insensitive but tooling must echo the
/// author's casing back into generated output, so the interner offers two
/// entry points: [`get_or_intern`](Self::get_or_intern) preserves the text
/// verbatim, and [`fold`](Self::fold) interns the ASCII-lowercased form used
/// for name comparison. [`intern_name`](Self::intern_name) bundles both into
/// a [`Name`].
pub struct Interner {
    rodeo: ThreadedRodeo<Ident>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: ThreadedRodeo::new(),
        }
    }

    /// Interns a string verbatim, returning its [`Ident`]. If the string was
    /// already interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Interns the ASCII-lowercased form of `s`.
    ///
    /// Two spellings of the same basic identifier (`Clk`, `CLK`, `clk`) fold
    /// to the same [`Ident`]. Extended identifiers (`\Clk\`) are interned as
    /// written since they are case-sensitive by definition.
    pub fn fold(&self, s: &str) -> Ident {
        if s.starts_with('\\') {
            return self.get_or_intern(s);
        }
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            self.get_or_intern(&s.to_ascii_lowercase())
        } else {
            self.get_or_intern(s)
        }
    }

    /// Interns both the verbatim and folded forms of `s` as a [`Name`].
    pub fn intern_name(&self, s: &str) -> Name {
        Name {
            verbatim: self.get_or_intern(s),
            folded: self.fold(s),
        }
    }

    /// Resolves an [`Ident`] back to its string value.
    ///
    /// # Panics
    ///
    /// Panics if the `Ident` was not created by this interner.
    pub fn resolve(&self, ident: Ident) -> &str {
        self.rodeo.resolve(&ident)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
