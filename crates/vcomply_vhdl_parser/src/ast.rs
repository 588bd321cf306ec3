//! Structural AST for VHDL design files.
//!
//! The parser extracts declarative interfaces only: entity generics and
//! ports, package subprogram signatures, architecture constants, process
//! labels, and entity instantiations. Statement bodies and expressions are
//! skipped and never represented here.

use serde::{Deserialize, Serialize};
use std::fmt;
use vcomply_common::Name;
use vcomply_source::Span;

use crate::reference::Reference;

/// A parsed VHDL source file: a sequence of design units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignFile {
    /// The design units in source order.
    pub units: Vec<DesignUnit>,
    /// The span covering the whole file.
    pub span: Span,
}

/// A single design unit together with its context clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignUnit {
    /// The `library`, `use`, and `context` clauses preceding the unit.
    pub context: Vec<ContextItem>,
    /// The library unit itself.
    pub payload: UnitPayload,
    /// The references this unit makes to other design units and libraries.
    ///
    /// Populated from the context clause and, for architectures, from
    /// entity instantiations.
    pub refs: Vec<Reference>,
    /// The span covering the unit including its context clause.
    pub span: Span,
}

impl DesignUnit {
    /// Returns the kind of the contained library unit.
    pub fn kind(&self) -> UnitKind {
        match &self.payload {
            UnitPayload::Entity(_) => UnitKind::Entity,
            UnitPayload::Architecture(_) => UnitKind::Architecture,
            UnitPayload::Package(_) => UnitKind::Package,
            UnitPayload::PackageBody(_) => UnitKind::PackageBody,
            UnitPayload::Context(_) => UnitKind::Context,
            UnitPayload::Configuration(_) => UnitKind::Configuration,
        }
    }

    /// Returns the name of the contained library unit.
    pub fn name(&self) -> Name {
        match &self.payload {
            UnitPayload::Entity(e) => e.name,
            UnitPayload::Architecture(a) => a.name,
            UnitPayload::Package(p) => p.name,
            UnitPayload::PackageBody(b) => b.name,
            UnitPayload::Context(c) => c.name,
            UnitPayload::Configuration(c) => c.name,
        }
    }
}

/// The kind of a design unit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum UnitKind {
    /// An entity declaration.
    Entity,
    /// An architecture body.
    Architecture,
    /// A package declaration.
    Package,
    /// A package body.
    PackageBody,
    /// A context declaration.
    Context,
    /// A configuration declaration.
    Configuration,
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UnitKind::Entity => "entity",
            UnitKind::Architecture => "architecture",
            UnitKind::Package => "package",
            UnitKind::PackageBody => "package body",
            UnitKind::Context => "context",
            UnitKind::Configuration => "configuration",
        };
        f.write_str(s)
    }
}

/// The library unit inside a [`DesignUnit`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitPayload {
    /// An entity declaration.
    Entity(EntityUnit),
    /// An architecture body.
    Architecture(ArchitectureUnit),
    /// A package declaration.
    Package(PackageUnit),
    /// A package body.
    PackageBody(PackageBodyUnit),
    /// A context declaration.
    Context(ContextDeclUnit),
    /// A configuration declaration.
    Configuration(ConfigurationUnit),
}

/// An entity declaration with its generic and port interfaces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityUnit {
    /// The entity name.
    pub name: Name,
    /// The generic clause, flattened in declaration order.
    pub generics: Vec<InterfaceDecl>,
    /// The port clause, flattened in declaration order.
    pub ports: Vec<InterfaceDecl>,
    /// The span of the declaration.
    pub span: Span,
}

/// An architecture body.
///
/// Only the declarative items and concurrent statements relevant to
/// structural analysis are retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureUnit {
    /// The architecture name.
    pub name: Name,
    /// The name of the entity this architecture belongs to.
    pub entity_name: Name,
    /// Constants declared in the declarative part.
    pub constants: Vec<ConstantRecord>,
    /// Labels of processes in the statement part.
    pub process_labels: Vec<Name>,
    /// Direct entity instantiations in the statement part.
    pub instantiations: Vec<EntityInstantiation>,
    /// The span of the body.
    pub span: Span,
}

/// A package declaration with its subprogram signatures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUnit {
    /// The package name.
    pub name: Name,
    /// Subprogram declarations in the package declarative part.
    pub subprograms: Vec<SubprogramSignature>,
    /// The span of the declaration.
    pub span: Span,
}

/// A package body. Only the name is retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageBodyUnit {
    /// The name of the package this body belongs to.
    pub name: Name,
    /// The span of the body.
    pub span: Span,
}

/// A context declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextDeclUnit {
    /// The context name.
    pub name: Name,
    /// The clauses inside the declaration.
    pub items: Vec<ContextItem>,
    /// The span of the declaration.
    pub span: Span,
}

/// A configuration declaration. Only the names are retained.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationUnit {
    /// The configuration name.
    pub name: Name,
    /// The name of the entity being configured.
    pub entity_name: Name,
    /// The span of the declaration.
    pub span: Span,
}

/// A single clause in a context clause or context declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextItem {
    /// `library a, b;`
    Library {
        /// The logical library names.
        names: Vec<Name>,
        /// The span of the clause.
        span: Span,
    },
    /// `use lib.pkg.all;`
    Use {
        /// The selected name after `use`.
        name: SelectedName,
        /// The span of the clause.
        span: Span,
    },
    /// `context lib.ctx;`
    Context {
        /// The selected name after `context`.
        name: SelectedName,
        /// The span of the clause.
        span: Span,
    },
}

/// A dotted name such as `vunit_lib.sync_pkg.all`.
///
/// A trailing `.all` suffix is stripped into the `all` flag rather than
/// stored as a part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedName {
    /// The dotted name parts, in order.
    pub parts: Vec<Name>,
    /// Whether the name ended in `.all`.
    pub all: bool,
    /// The span of the whole name.
    pub span: Span,
}

/// The mode of an interface object.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Mode {
    /// `in`
    In,
    /// `out`
    Out,
    /// `inout`
    Inout,
    /// `buffer`
    Buffer,
    /// `linkage`
    Linkage,
}

/// One element of an interface list (a generic, port, or parameter).
///
/// `names` holds every identifier of the element, so
/// `a, b : natural := 0` is a single declaration with two names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDecl {
    /// The declared names.
    pub names: Vec<Name>,
    /// The mode, if one was written.
    pub mode: Option<Mode>,
    /// The type mark. For a dotted mark like `vunit_lib.vc_pkg.vc_handle_t`
    /// this is the last simple name.
    pub ty: Name,
    /// The span of the default expression after `:=`, if present.
    pub default: Option<Span>,
    /// The span of the whole element.
    pub span: Span,
}

impl InterfaceDecl {
    /// Returns `true` if the element carries a default expression.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// Whether a subprogram is a function or a procedure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum SubprogramKind {
    /// A (pure or impure) function.
    Function,
    /// A procedure.
    Procedure,
}

/// The declared signature of a subprogram.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubprogramSignature {
    /// Function or procedure.
    pub kind: SubprogramKind,
    /// The designator. Operator symbols like `"+"` keep their quotes in the
    /// verbatim spelling.
    pub name: Name,
    /// The parameter list, flattened in declaration order.
    pub params: Vec<InterfaceDecl>,
    /// The return type mark for functions, `None` for procedures.
    pub return_type: Option<Name>,
    /// The span of the declaration.
    pub span: Span,
}

/// A constant declaration in an architecture declarative part.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstantRecord {
    /// The declared names.
    pub names: Vec<Name>,
    /// The type mark. For a dotted mark this is the last simple name.
    pub type_mark: Name,
    /// The span of the declaration.
    pub span: Span,
}

/// A direct entity instantiation, `label : entity lib.ent ...`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityInstantiation {
    /// The statement label.
    pub label: Option<Name>,
    /// The library part of the instantiated name.
    pub library: Name,
    /// The entity part of the instantiated name.
    pub entity: Name,
    /// The span of the statement head.
    pub span: Span,
}
