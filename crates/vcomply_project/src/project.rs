//! The design unit registry.
//!
//! A [`Project`] owns the interner, the source database, the libraries, and
//! the parsed design units of every registered file. Units are indexed by
//! folded (library, kind, name); architectures are additionally scoped on
//! the entity they decorate, since architecture names are only unique per
//! entity.

use std::collections::HashMap;
use std::path::Path;

use vcomply_common::{Ident, Interner, Name};
use vcomply_source::{FileId, SourceDb};
use vcomply_vhdl_parser::ast::{EntityUnit, PackageUnit};
use vcomply_vhdl_parser::{parse_file, DesignUnit, UnitKind, UnitPayload};

use crate::error::ProjectError;
use crate::library::Library;

/// The registry key of one design unit: folded library, kind, folded name,
/// and for architectures the folded name of the decorated entity.
type UnitKey = (Ident, UnitKind, Ident, Option<Ident>);

/// Where a registered unit lives: its file and its index within the file's
/// unit list.
#[derive(Clone, Copy, Debug)]
struct UnitLoc {
    file: FileId,
    index: usize,
}

/// A set of libraries with their registered, parsed source files.
///
/// Population is single-writer through [`register`](Project::register); a
/// populated project is read-only and lookups cannot race.
pub struct Project {
    interner: Interner,
    source_db: SourceDb,
    libraries: Vec<Library>,
    parsed: HashMap<FileId, Vec<DesignUnit>>,
    registry: HashMap<UnitKey, UnitLoc>,
}

impl Project {
    /// Creates an empty project with a fresh interner.
    pub fn new() -> Self {
        Self {
            interner: Interner::new(),
            source_db: SourceDb::new(),
            libraries: Vec::new(),
            parsed: HashMap::new(),
            registry: HashMap::new(),
        }
    }

    /// The project's string interner.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// The project's source database.
    pub fn source_db(&self) -> &SourceDb {
        &self.source_db
    }

    /// The registered libraries, in first-registration order.
    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    /// Looks up a library by name, case-insensitively.
    pub fn library(&self, name: &str) -> Option<&Library> {
        let name = self.interner.intern_name(name);
        self.libraries.iter().find(|lib| lib.name == name)
    }

    /// The parsed design units of a registered file, in source order.
    pub fn units(&self, file: FileId) -> &[DesignUnit] {
        self.parsed.get(&file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reads, parses, and registers a source file under `library`.
    ///
    /// Every design unit in the file is inserted into the registry. A unit
    /// whose (library, kind, name) identity is already taken aborts the
    /// registration with [`ProjectError::DuplicateUnit`]; a parse error
    /// aborts it without touching the registry. Other files' entries are
    /// never affected.
    pub fn register(&mut self, library: &str, path: &Path) -> Result<FileId, ProjectError> {
        let file = self
            .source_db
            .load_file(path)
            .map_err(|source| ProjectError::FileIO {
                path: path.to_path_buf(),
                source,
            })?;
        self.register_parsed(library, file)?;
        Ok(file)
    }

    /// Registers in-memory source text under `library`.
    ///
    /// Behaves like [`register`](Project::register) with `name` standing in
    /// for the file path.
    pub fn register_source(
        &mut self,
        library: &str,
        name: &str,
        content: String,
    ) -> Result<FileId, ProjectError> {
        let file = self.source_db.add_source(name, content);
        self.register_parsed(library, file)?;
        Ok(file)
    }

    fn register_parsed(&mut self, library: &str, file: FileId) -> Result<(), ProjectError> {
        let source = &self.source_db.get_file(file).content;
        let design_file = parse_file(source, file, &self.interner)?;

        let lib_name = self.interner.intern_name(library);
        for (index, unit) in design_file.units.iter().enumerate() {
            let key = Self::unit_key(lib_name, unit);
            if let Some(prev) = self.registry.get(&key) {
                let first = self.parsed[&prev.file][prev.index].span;
                return Err(ProjectError::DuplicateUnit {
                    library: self.interner.resolve(lib_name.verbatim).to_string(),
                    kind: unit.kind(),
                    name: self.interner.resolve(unit.name().verbatim).to_string(),
                    first,
                    second: unit.span,
                });
            }
            self.registry.insert(key, UnitLoc { file, index });
        }
        self.parsed.insert(file, design_file.units);

        match self.libraries.iter_mut().find(|lib| lib.name == lib_name) {
            Some(lib) => lib.files.push(file),
            None => {
                let mut lib = Library::new(lib_name);
                lib.files.push(file);
                self.libraries.push(lib);
            }
        }
        Ok(())
    }

    fn unit_key(library: Name, unit: &DesignUnit) -> UnitKey {
        let scope = match &unit.payload {
            UnitPayload::Architecture(arch) => Some(arch.entity_name.folded),
            _ => None,
        };
        (library.folded, unit.kind(), unit.name().folded, scope)
    }

    /// Finds the entity `name` in `library`, by exact folded match.
    pub fn find_entity(&self, library: &str, name: &str) -> Result<&EntityUnit, ProjectError> {
        match &self.find_unit(library, UnitKind::Entity, name)?.payload {
            UnitPayload::Entity(entity) => Ok(entity),
            _ => Err(Self::not_found(library, UnitKind::Entity, name)),
        }
    }

    /// Finds the package `name` in `library`, by exact folded match.
    pub fn find_package(&self, library: &str, name: &str) -> Result<&PackageUnit, ProjectError> {
        match &self.find_unit(library, UnitKind::Package, name)?.payload {
            UnitPayload::Package(package) => Ok(package),
            _ => Err(Self::not_found(library, UnitKind::Package, name)),
        }
    }

    fn find_unit(
        &self,
        library: &str,
        kind: UnitKind,
        name: &str,
    ) -> Result<&DesignUnit, ProjectError> {
        let key = (self.interner.fold(library), kind, self.interner.fold(name), None);
        match self.registry.get(&key) {
            Some(loc) => Ok(&self.parsed[&loc.file][loc.index]),
            None => Err(Self::not_found(library, kind, name)),
        }
    }

    fn not_found(library: &str, kind: UnitKind, name: &str) -> ProjectError {
        ProjectError::NotFound {
            library: library.to_string(),
            kind,
            name: name.to_string(),
        }
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const VC_ENTITY: &str = "library vunit_lib;
        use vunit_lib.vc_pkg.all;

        entity uart_vc is
            generic (uart : vc_handle_t);
            port (tx : out std_logic; rx : in std_logic);
        end entity;

        architecture bfm of uart_vc is
        begin
        end architecture;";

    const VC_PACKAGE: &str = "package vc_pkg is
            impure function new_vc return vc_handle_t;
        end package;";

    #[test]
    fn register_and_find() {
        let mut project = Project::new();
        project
            .register_source("work", "uart_vc.vhd", VC_ENTITY.to_string())
            .expect("register failed");
        project
            .register_source("work", "vc_pkg.vhd", VC_PACKAGE.to_string())
            .expect("register failed");

        let entity = project.find_entity("work", "uart_vc").expect("entity missing");
        assert_eq!(entity.generics.len(), 1);
        assert_eq!(entity.ports.len(), 2);
        let pkg = project.find_package("work", "vc_pkg").expect("package missing");
        assert_eq!(pkg.subprograms.len(), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let mut project = Project::new();
        project
            .register_source("Work", "uart_vc.vhd", VC_ENTITY.to_string())
            .expect("register failed");
        assert!(project.find_entity("WORK", "UART_VC").is_ok());
    }

    #[test]
    fn missing_unit_is_not_found() {
        let mut project = Project::new();
        project
            .register_source("work", "uart_vc.vhd", VC_ENTITY.to_string())
            .expect("register failed");
        let err = project
            .find_package("work", "vc_pkg")
            .expect_err("expected NotFound");
        assert_eq!(format!("{err}"), "no package 'vc_pkg' in library 'work'");
    }

    #[test]
    fn duplicate_entity_is_rejected() {
        let mut project = Project::new();
        project
            .register_source("work", "a.vhd", "entity e is end;".to_string())
            .expect("register failed");
        let err = project
            .register_source("work", "b.vhd", "entity E is end;".to_string())
            .expect_err("expected DuplicateUnit");
        match err {
            ProjectError::DuplicateUnit { library, kind, name, .. } => {
                assert_eq!(library, "work");
                assert_eq!(kind, UnitKind::Entity);
                assert_eq!(name, "E");
            }
            other => panic!("expected DuplicateUnit, got {other}"),
        }
    }

    #[test]
    fn same_name_in_another_library_is_allowed() {
        let mut project = Project::new();
        project
            .register_source("work", "a.vhd", "entity e is end;".to_string())
            .expect("register failed");
        project
            .register_source("other", "b.vhd", "entity e is end;".to_string())
            .expect("register failed");
        assert!(project.find_entity("work", "e").is_ok());
        assert!(project.find_entity("other", "e").is_ok());
        assert_eq!(project.libraries().len(), 2);
    }

    #[test]
    fn architectures_are_scoped_per_entity() {
        let mut project = Project::new();
        let source = "entity a is end;
            entity b is end;
            architecture rtl of a is begin end;
            architecture rtl of b is begin end;";
        project
            .register_source("work", "two.vhd", source.to_string())
            .expect("register failed");
        assert_eq!(project.libraries()[0].files.len(), 1);
    }

    #[test]
    fn duplicate_architecture_of_same_entity_is_rejected() {
        let mut project = Project::new();
        let source = "entity a is end;
            architecture rtl of a is begin end;
            architecture rtl of a is begin end;";
        let err = project
            .register_source("work", "dup.vhd", source.to_string())
            .expect_err("expected DuplicateUnit");
        assert!(matches!(
            err,
            ProjectError::DuplicateUnit {
                kind: UnitKind::Architecture,
                ..
            }
        ));
    }

    #[test]
    fn parse_error_leaves_registry_intact() {
        let mut project = Project::new();
        project
            .register_source("work", "good.vhd", "entity good is end;".to_string())
            .expect("register failed");
        let err = project.register_source(
            "work",
            "bad.vhd",
            "entity bad is generic (g natural); end;".to_string(),
        );
        assert!(matches!(err, Err(ProjectError::Parse(_))));
        assert!(project.find_entity("work", "good").is_ok());
        assert_eq!(project.library("work").expect("library missing").files.len(), 1);
    }

    #[test]
    fn register_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir failed");
        let path = dir.path().join("uart_vc.vhd");
        let mut f = std::fs::File::create(&path).expect("create failed");
        f.write_all(VC_ENTITY.as_bytes()).expect("write failed");

        let mut project = Project::new();
        let file = project.register("work", &path).expect("register failed");
        assert_eq!(project.units(file).len(), 2);
        assert!(project.find_entity("work", "uart_vc").is_ok());
    }

    #[test]
    fn missing_file_is_file_io() {
        let mut project = Project::new();
        let err = project
            .register("work", Path::new("/nonexistent/uart_vc.vhd"))
            .expect_err("expected FileIO");
        assert!(matches!(err, ProjectError::FileIO { .. }));
    }
}
