//! Typed references from a design unit to libraries and other units.
//!
//! References are extracted from context clauses and, for architectures,
//! from direct entity instantiations. They drive the dependency set that a
//! generated testbench must re-state.

use serde::{Deserialize, Serialize};
use vcomply_common::Name;
use vcomply_source::Span;

use crate::ast::{ContextItem, UnitPayload};

/// The kind of a [`Reference`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum RefKind {
    /// A `library` clause naming a logical library.
    Library,
    /// A `use` clause naming a package (or an item inside one).
    Package,
    /// A `context` clause naming a context declaration.
    Context,
    /// A direct entity instantiation.
    Entity,
}

/// The tail of a selected name in a `use` clause.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Suffix {
    /// A named item, `use lib.pkg.item;`.
    Name(Name),
    /// The `all` suffix, `use lib.pkg.all;`.
    All,
}

/// A single reference from a design unit to a library or another unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// What kind of clause produced this reference.
    pub kind: RefKind,
    /// The logical library being referenced.
    pub library: Name,
    /// The primary unit inside the library, when the clause names one.
    pub primary: Option<Name>,
    /// The suffix after the primary unit, for `use` clauses.
    pub secondary: Option<Suffix>,
    /// The span of the originating clause.
    pub span: Span,
}

impl Reference {
    /// The identity of this reference for deduplication.
    ///
    /// Spans are excluded; name comparison is case-folded through [`Name`]'s
    /// equality.
    pub fn key(&self) -> (RefKind, Name, Option<Name>, Option<Suffix>) {
        (self.kind, self.library, self.primary, self.secondary)
    }
}

/// Extracts the references a design unit makes.
///
/// A `library a, b;` clause yields one reference per name. Architectures
/// additionally contribute one [`RefKind::Entity`] reference per direct
/// instantiation.
pub fn extract(context: &[ContextItem], payload: &UnitPayload) -> Vec<Reference> {
    let mut refs = Vec::new();
    extract_items(context, &mut refs);
    match payload {
        UnitPayload::Context(decl) => extract_items(&decl.items, &mut refs),
        UnitPayload::Architecture(arch) => {
            for inst in &arch.instantiations {
                refs.push(Reference {
                    kind: RefKind::Entity,
                    library: inst.library,
                    primary: Some(inst.entity),
                    secondary: None,
                    span: inst.span,
                });
            }
        }
        _ => {}
    }
    refs
}

fn extract_items(items: &[ContextItem], refs: &mut Vec<Reference>) {
    for item in items {
        match item {
            ContextItem::Library { names, span } => {
                for &name in names {
                    refs.push(Reference {
                        kind: RefKind::Library,
                        library: name,
                        primary: None,
                        secondary: None,
                        span: *span,
                    });
                }
            }
            ContextItem::Use { name, span } => {
                let secondary = if name.all {
                    Some(Suffix::All)
                } else {
                    name.parts.get(2).copied().map(Suffix::Name)
                };
                refs.push(Reference {
                    kind: RefKind::Package,
                    library: name.parts[0],
                    primary: name.parts.get(1).copied(),
                    secondary,
                    span: *span,
                });
            }
            ContextItem::Context { name, span } => {
                refs.push(Reference {
                    kind: RefKind::Context,
                    library: name.parts[0],
                    primary: name.parts.get(1).copied(),
                    secondary: None,
                    span: *span,
                });
            }
        }
    }
}
