//! Library and design unit registry for VHDL projects.
//!
//! A [`Project`] maps (library, path) pairs to parsed design units and
//! indexes every unit by its folded (library, kind, name) identity.
//! Registration rejects duplicate identities; lookups either hit exactly one
//! unit or fail with [`ProjectError::NotFound`].

#![warn(missing_docs)]

mod error;
mod library;
mod project;

pub use error::ProjectError;
pub use library::Library;
pub use project::Project;
