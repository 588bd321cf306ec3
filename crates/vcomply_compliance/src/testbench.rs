//! Compliance testbench synthesis.
//!
//! A validated [`ComplianceCheck`] moves through a three-state machine:
//! `Validated` after a successful check, `TemplateProduced` once the editable
//! template text exists, and `Added` once the finalized testbench has been
//! written and registered. `Added` is terminal.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use vcomply_common::{Interner, Name};
use vcomply_project::{Project, ProjectError};
use vcomply_source::{FileId, Span};
use vcomply_vhdl_parser::{parse_file, RefKind, Reference, Suffix, UnitPayload};

use crate::check::ComplianceCheck;
use crate::contract::ComplianceContract;
use crate::error::ComplianceError;

/// The synthesizer state of a [`ComplianceCheck`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SynthState {
    /// The check succeeded; nothing has been synthesized yet.
    Validated,
    /// The template text has been produced.
    TemplateProduced,
    /// The finalized testbench has been written and registered. Terminal.
    Added,
}

impl ComplianceCheck {
    /// Produces the editable compliance testbench template.
    ///
    /// Both source files are re-parsed and their references collected in
    /// source order, entity file first. References to `work` are rewritten
    /// to `library_name`, the framework references and the references the
    /// testbench itself needs are appended, and the canonical set drops
    /// exact repeats while keeping first-seen order. The output text is a
    /// pure function of the inputs.
    pub fn produce_template(
        &mut self,
        library_name: &str,
        entity_path: &Path,
        package_path: &Path,
    ) -> Result<String, ComplianceError> {
        let interner = Interner::new();

        let mut refs = Vec::new();
        for (raw_id, path) in [(0u32, entity_path), (1u32, package_path)] {
            let source = fs::read_to_string(path).map_err(|source| ComplianceError::FileIO {
                path: path.to_path_buf(),
                source,
            })?;
            let design = parse_file(&source, FileId::from_raw(raw_id), &interner)
                .map_err(ProjectError::from)?;
            for unit in &design.units {
                refs.extend(unit.refs.iter().copied());
            }
        }

        let work = interner.intern_name("work");
        let target_lib = interner.intern_name(library_name);
        for reference in &mut refs {
            if reference.library == work {
                reference.library = target_lib;
            }
        }
        refs.extend(self.framework_references(&interner, target_lib));

        let mut seen = HashSet::new();
        let canonical: Vec<Reference> = refs
            .into_iter()
            .filter(|r| seen.insert(r.key()))
            .collect();

        let mut out = String::new();
        out.push_str(&format!(
            "-- Compliance testbench for {}. Generated by vcomply.\n",
            self.entity_name
        ));
        out.push_str("-- Grow the test suite freely; finalization re-checks the structure.\n");
        for reference in &canonical {
            if let Some(line) = clause_line(&interner, reference) {
                out.push_str(&line);
                out.push('\n');
            }
        }
        out.push('\n');

        let contract = ComplianceContract::STANDARD;
        let tb_name = self.testbench_name();
        let vc = &self.entity_name;
        let handle = &self.handle_generic;
        out.push_str(&format!(
            "entity {tb_name} is
  generic (
    runner_cfg : string
  );
end entity;

architecture tb of {tb_name} is
  constant {handle} : {handle_type} := {constructor};
begin
  test_runner : process
  begin
    test_runner_setup(runner, runner_cfg);

    while test_suite loop
      if run(\"Test that {vc} instantiates cleanly\") then
        wait for 1 ns;
      end if;
    end loop;

    test_runner_cleanup(runner);
  end process test_runner;

  vc_inst : entity {library_name}.{vc}
    generic map (
      {handle} => {handle}
    );
end architecture;
",
            handle_type = contract.handle_type,
            constructor = contract.constructor,
        ));

        if self.state == SynthState::Validated {
            self.state = SynthState::TemplateProduced;
        }
        Ok(out)
    }

    fn framework_references(&self, interner: &Interner, target_lib: Name) -> Vec<Reference> {
        let vunit_lib = interner.intern_name("vunit_lib");
        vec![
            Reference {
                kind: RefKind::Library,
                library: vunit_lib,
                primary: None,
                secondary: None,
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Package,
                library: vunit_lib,
                primary: Some(interner.intern_name("sync_pkg")),
                secondary: Some(Suffix::All),
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Context,
                library: vunit_lib,
                primary: Some(interner.intern_name("vunit_context")),
                secondary: None,
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Context,
                library: vunit_lib,
                primary: Some(interner.intern_name("com_context")),
                secondary: None,
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Library,
                library: target_lib,
                primary: None,
                secondary: None,
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Package,
                library: target_lib,
                primary: Some(interner.intern_name(&self.package_name)),
                secondary: Some(Suffix::All),
                span: Span::DUMMY,
            },
            Reference {
                kind: RefKind::Entity,
                library: target_lib,
                primary: Some(interner.intern_name(&self.entity_name)),
                secondary: None,
                span: Span::DUMMY,
            },
        ]
    }

    /// Re-parses a (possibly hand-edited) template and checks its structural
    /// invariants, in order: the testbench entity exists, it has the
    /// `runner_cfg : string` generic, its architecture declares a constant
    /// of the handle type, and a process named `test_runner` is present.
    ///
    /// Returns the file text verbatim on success.
    pub fn finalize(&self, template_path: &Path) -> Result<String, ComplianceError> {
        let text = fs::read_to_string(template_path).map_err(|source| ComplianceError::FileIO {
            path: template_path.to_path_buf(),
            source,
        })?;
        let interner = Interner::new();
        let design =
            parse_file(&text, FileId::from_raw(0), &interner).map_err(ProjectError::from)?;

        let tb_name = interner.intern_name(&self.testbench_name());
        let entity = design
            .units
            .iter()
            .find_map(|unit| match &unit.payload {
                UnitPayload::Entity(e) if e.name == tb_name => Some(e),
                _ => None,
            })
            .ok_or_else(|| ComplianceError::TemplateStructure {
                invariant: format!("entity '{}' is missing", self.testbench_name()),
            })?;

        let runner_cfg = interner.intern_name("runner_cfg");
        let string_ty = interner.intern_name("string");
        let has_runner_cfg = entity
            .generics
            .iter()
            .any(|g| g.names.contains(&runner_cfg) && g.ty == string_ty);
        if !has_runner_cfg {
            return Err(ComplianceError::TemplateStructure {
                invariant: "generic 'runner_cfg : string' is missing".to_string(),
            });
        }

        let contract = ComplianceContract::STANDARD;
        let handle_ty = interner.intern_name(contract.handle_type);
        let arch = design.units.iter().find_map(|unit| match &unit.payload {
            UnitPayload::Architecture(a) if a.entity_name == tb_name => Some(a),
            _ => None,
        });
        let has_handle_constant = arch
            .map(|a| a.constants.iter().any(|c| c.type_mark == handle_ty))
            .unwrap_or(false);
        if !has_handle_constant {
            return Err(ComplianceError::TemplateStructure {
                invariant: format!(
                    "no constant of type '{}' in the architecture",
                    contract.handle_type
                ),
            });
        }

        let test_runner = interner.intern_name("test_runner");
        let has_test_runner = arch
            .map(|a| a.process_labels.contains(&test_runner))
            .unwrap_or(false);
        if !has_test_runner {
            return Err(ComplianceError::TemplateStructure {
                invariant: "no process named 'test_runner'".to_string(),
            });
        }

        Ok(text)
    }

    /// Finalizes the template, writes the testbench into `output_dir`, and
    /// registers it under `library`.
    ///
    /// The output directory must already exist; missing parents are a
    /// [`ComplianceError::FileIO`], never created. A second call fails with
    /// [`ComplianceError::AlreadyAdded`] and leaves the first file alone.
    pub fn add_to_library(
        &mut self,
        project: &mut Project,
        library: &str,
        output_dir: &Path,
        template_path: &Path,
    ) -> Result<PathBuf, ComplianceError> {
        if self.state == SynthState::Added {
            return Err(ComplianceError::AlreadyAdded);
        }
        let text = self.finalize(template_path)?;
        let out_path = output_dir.join(self.testbench_file_name());
        fs::write(&out_path, &text).map_err(|source| ComplianceError::FileIO {
            path: out_path.clone(),
            source,
        })?;
        project.register(library, &out_path)?;
        self.state = SynthState::Added;
        Ok(out_path)
    }
}

fn clause_line(interner: &Interner, reference: &Reference) -> Option<String> {
    let library = interner.resolve(reference.library.verbatim);
    match reference.kind {
        RefKind::Library => Some(format!("library {library};")),
        RefKind::Package => {
            let primary = interner.resolve(reference.primary?.verbatim);
            Some(match reference.secondary {
                Some(Suffix::All) => format!("use {library}.{primary}.all;"),
                Some(Suffix::Name(name)) => {
                    format!("use {library}.{primary}.{};", interner.resolve(name.verbatim))
                }
                None => format!("use {library}.{primary};"),
            })
        }
        RefKind::Context => {
            let primary = interner.resolve(reference.primary?.verbatim);
            Some(format!("context {library}.{primary};"))
        }
        RefKind::Entity => None,
    }
}
