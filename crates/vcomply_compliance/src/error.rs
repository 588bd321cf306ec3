//! Error types for compliance checking and testbench synthesis.

use std::fmt;
use std::path::PathBuf;

use vcomply_project::ProjectError;

/// The way a required constructor parameter violates the contract.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ParameterReason {
    /// The parameter is absent from the constructor.
    Missing,
    /// The parameter exists but has a different type mark.
    WrongType,
    /// The parameter exists with the right type but no default value.
    MissingDefault,
}

impl fmt::Display for ParameterReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParameterReason::Missing => "is missing",
            ParameterReason::WrongType => "has the wrong type",
            ParameterReason::MissingDefault => "has no default value",
        };
        f.write_str(s)
    }
}

/// Errors raised by the compliance validator and testbench synthesizer.
///
/// All variants are fatal; a failed check leaves no partially-valid state
/// behind.
#[derive(Debug, thiserror::Error)]
pub enum ComplianceError {
    /// Registration or lookup failed before validation could start.
    #[error(transparent)]
    Project(#[from] ProjectError),

    /// The entity does not have exactly one generic of the handle type.
    #[error("entity must have exactly one generic of type 'vc_handle_t', found {count}")]
    GenericContract {
        /// How many handle-typed generics were observed.
        count: usize,
    },

    /// The package declares no constructor function.
    #[error("package has no constructor function 'new_vc'")]
    MissingConstructor,

    /// The constructor does not return the handle type.
    #[error("constructor 'new_vc' must return 'vc_handle_t', found '{found}'")]
    WrongReturnType {
        /// The observed return type, or `procedure` when the designator
        /// names a procedure.
        found: String,
    },

    /// A required constructor parameter violates the contract.
    #[error("constructor parameter '{parameter}' {reason}")]
    ParameterContract {
        /// The canonical parameter name.
        parameter: String,
        /// How the parameter violates the contract.
        reason: ParameterReason,
    },

    /// A finalized template no longer satisfies a structural invariant.
    #[error("template invariant violated: {invariant}")]
    TemplateStructure {
        /// A description of the missing structure.
        invariant: String,
    },

    /// The testbench was already added to the library.
    #[error("testbench has already been added to the library")]
    AlreadyAdded,

    /// A file could not be read or written.
    #[error("failed to access '{path}': {source}")]
    FileIO {
        /// The path that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
