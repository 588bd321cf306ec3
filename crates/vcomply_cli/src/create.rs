//! `vcomply create` — compliance template creation command.
//!
//! Registers the entity and package files, runs the compliance check, and
//! writes the editable testbench template. The default output directory is
//! a hidden `.vc` directory beside the entity source; it is created on
//! demand. Explicitly requested directories are never created.

use std::fs;
use std::path::PathBuf;

use vcomply_compliance::ComplianceCheck;
use vcomply_project::Project;
use vcomply_source::FileId;
use vcomply_vhdl_parser::UnitKind;

use crate::CreateArgs;

/// Runs the `vcomply create` command. Returns exit code 0 on success.
pub fn run(args: &CreateArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let mut project = Project::new();
    let entity_file = project.register(&args.library, &args.entity)?;
    let package_file = project.register(&args.library, &args.package)?;

    let entity_name = unit_name(&project, entity_file, UnitKind::Entity)
        .ok_or_else(|| format!("no entity in '{}'", args.entity.display()))?;
    let package_name = unit_name(&project, package_file, UnitKind::Package)
        .ok_or_else(|| format!("no package in '{}'", args.package.display()))?;

    let mut check = ComplianceCheck::check(&project, &args.library, &entity_name, &package_name)?;
    let template = check.produce_template(&args.library, &args.entity, &args.package)?;

    let output = output_path(args, &check)?;
    fs::write(&output, template)
        .map_err(|e| format!("failed to write '{}': {e}", output.display()))?;

    eprintln!("     Created {}", output.display());
    Ok(0)
}

/// The first design unit of `kind` in the file, by verbatim name.
fn unit_name(project: &Project, file: FileId, kind: UnitKind) -> Option<String> {
    project
        .units(file)
        .iter()
        .find(|unit| unit.kind() == kind)
        .map(|unit| project.interner().resolve(unit.name().verbatim).to_string())
}

/// Resolves the template output path per the precedence `--output-path`,
/// then `--output-dir`, then the `.vc` default. Only the default directory
/// is created when absent.
fn output_path(
    args: &CreateArgs,
    check: &ComplianceCheck,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = &args.output_path {
        return Ok(path.clone());
    }
    if let Some(dir) = &args.output_dir {
        return Ok(dir.join(check.template_file_name()));
    }
    let dir = match args.entity.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from(".vc"),
        Some(parent) => parent.join(".vc"),
        None => PathBuf::from(".vc"),
    };
    fs::create_dir_all(&dir)
        .map_err(|e| format!("failed to create '{}': {e}", dir.display()))?;
    Ok(dir.join(check.template_file_name()))
}
