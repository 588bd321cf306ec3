//! Logical libraries and their source files.

use vcomply_common::Name;
use vcomply_source::FileId;

/// A logical VHDL library: a name and the source files registered under it.
///
/// Files keep their registration order. Library names compare
/// case-insensitively through [`Name`].
#[derive(Clone, Debug)]
pub struct Library {
    /// The library name.
    pub name: Name,
    /// The registered source files, in registration order.
    pub files: Vec<FileId>,
}

impl Library {
    /// Creates an empty library.
    pub fn new(name: Name) -> Self {
        Self {
            name,
            files: Vec::new(),
        }
    }
}
