//! Case-preserving, case-insensitive names for design constructs.

use serde::{Deserialize, Serialize};

use crate::ident::Ident;

/// A VHDL name carrying both its source spelling and its folded form.
///
/// Equality and hashing use only the folded form, so `Name`s for `UART_Tx`
/// and `uart_tx` compare equal while the verbatim spelling stays available
/// for code generation. Created through
/// [`Interner::intern_name`](crate::Interner::intern_name).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Name {
    /// The spelling as written in source.
    pub verbatim: Ident,
    /// The ASCII-lowercased spelling used for comparison.
    pub folded: Ident,
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.folded == other.folded
    }
}

impl Eq for Name {}

impl std::hash::Hash for Name {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.folded.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Interner;

    #[test]
    fn equality_ignores_case() {
        let interner = Interner::new();
        let a = interner.intern_name("UART_Tx");
        let b = interner.intern_name("uart_tx");
        assert_eq!(a, b);
        assert_ne!(a.verbatim, b.verbatim);
    }

    #[test]
    fn distinct_names_differ() {
        let interner = Interner::new();
        let a = interner.intern_name("uart_tx");
        let b = interner.intern_name("uart_rx");
        assert_ne!(a, b);
    }

    #[test]
    fn hash_follows_folded_form() {
        use std::collections::HashSet;
        let interner = Interner::new();
        let mut set = HashSet::new();
        set.insert(interner.intern_name("Handle"));
        assert!(set.contains(&interner.intern_name("HANDLE")));
    }

    #[test]
    fn serde_roundtrip() {
        let interner = Interner::new();
        let name = interner.intern_name("vc_handle_t");
        let json = serde_json::to_string(&name).unwrap();
        let back: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(name, back);
    }
}
