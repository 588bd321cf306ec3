//! Shared foundational types used across the vcomply toolchain.
//!
//! This crate provides interned identifiers and case-insensitive names, the
//! building blocks for every parsed VHDL construct in the workspace.

#![warn(missing_docs)]

pub mod ident;
pub mod name;

pub use ident::{Ident, Interner};
pub use name::Name;
