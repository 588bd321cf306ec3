//! Conformance test helpers for vcomply.
//!
//! Provides source constructors shared by the integration suites: build VC
//! entity and package text with controlled deviations from the compliance
//! contract, register the pair in a project, and run the check.

#![warn(missing_docs)]

use vcomply_compliance::{ComplianceCheck, ComplianceError};
use vcomply_project::Project;

/// The required constructor parameters as (name, type mark, default).
pub const REQUIRED_PARAMS: [(&str, &str, &str); 4] = [
    ("logger", "logger_t", "uart_logger"),
    ("actor", "actor_t", "new_actor"),
    ("checker", "checker_t", "uart_checker"),
    ("fail_on_unexpected_msg_type", "boolean", "true"),
];

/// A VC entity named `uart_vc` with the given generic clause body.
pub fn vc_entity(generics: &str) -> String {
    format!(
        "library vunit_lib;
use vunit_lib.vc_pkg.all;
use work.uart_pkg.all;

entity uart_vc is
  generic ({generics});
  port (tx : out std_logic; rx : in std_logic);
end entity;"
    )
}

/// The generic clause of a compliant VC.
pub fn compliant_generics() -> String {
    "uart : vc_handle_t := new_vc".to_string()
}

/// A package named `uart_pkg` whose constructor takes `params`.
pub fn vc_package(params: &str) -> String {
    format!(
        "package uart_pkg is
  impure function new_vc (
    {params}
  ) return vc_handle_t;
end package;"
    )
}

/// The fully compliant constructor parameter list.
pub fn compliant_params() -> String {
    join_params(
        REQUIRED_PARAMS
            .iter()
            .map(|(name, ty, default)| format!("{name} : {ty} := {default}")),
    )
}

/// The parameter list with `omitted` left out entirely.
pub fn params_omitting(omitted: &str) -> String {
    join_params(
        REQUIRED_PARAMS
            .iter()
            .filter(|(name, _, _)| *name != omitted)
            .map(|(name, ty, default)| format!("{name} : {ty} := {default}")),
    )
}

/// The parameter list with `name` given the type mark `natural`.
pub fn params_with_wrong_type(name: &str) -> String {
    join_params(REQUIRED_PARAMS.iter().map(|(n, ty, default)| {
        if *n == name {
            format!("{n} : natural := 0")
        } else {
            format!("{n} : {ty} := {default}")
        }
    }))
}

/// The parameter list with `name` stripped of its default value.
pub fn params_without_default(name: &str) -> String {
    join_params(REQUIRED_PARAMS.iter().map(|(n, ty, default)| {
        if *n == name {
            format!("{n} : {ty}")
        } else {
            format!("{n} : {ty} := {default}")
        }
    }))
}

fn join_params(lines: impl Iterator<Item = String>) -> String {
    lines.collect::<Vec<_>>().join(";\n    ")
}

/// Registers the entity and package text under `library` and runs the
/// compliance check on the `uart_vc` / `uart_pkg` pair.
pub fn check_pair(
    library: &str,
    entity: &str,
    package: &str,
) -> Result<ComplianceCheck, ComplianceError> {
    let mut project = Project::new();
    project.register_source(library, "uart_vc.vhd", entity.to_string())?;
    project.register_source(library, "uart_pkg.vhd", package.to_string())?;
    ComplianceCheck::check(&project, library, "uart_vc", "uart_pkg")
}
