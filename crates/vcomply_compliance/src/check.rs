//! The compliance check itself.
//!
//! A [`ComplianceCheck`] can only be obtained through a fully successful
//! [`check`](ComplianceCheck::check); there is no partially-valid state. The
//! check object carries the names synthesis needs and the synthesizer's
//! state machine.

use vcomply_project::Project;

use crate::contract::ComplianceContract;
use crate::error::{ComplianceError, ParameterReason};
use crate::testbench::SynthState;

/// A verification component that has passed the compliance contract.
#[derive(Debug)]
pub struct ComplianceCheck {
    pub(crate) entity_name: String,
    pub(crate) package_name: String,
    pub(crate) handle_generic: String,
    pub(crate) state: SynthState,
}

impl ComplianceCheck {
    /// Validates the VC entity and package in `library` against the
    /// compliance contract.
    ///
    /// The sub-checks run in a fixed order and the first violation aborts
    /// the whole check: unit resolution, the handle generic, the
    /// constructor's existence and return type, then each required
    /// parameter in canonical order. Parameters beyond the required four
    /// are ignored.
    pub fn check(
        project: &Project,
        library: &str,
        entity_name: &str,
        package_name: &str,
    ) -> Result<ComplianceCheck, ComplianceError> {
        let contract = ComplianceContract::STANDARD;
        let interner = project.interner();

        let entity = project.find_entity(library, entity_name)?;
        let package = project.find_package(library, package_name)?;

        let handle_ty = interner.intern_name(contract.handle_type);
        let mut handle_names = Vec::new();
        for generic in &entity.generics {
            if generic.ty == handle_ty {
                handle_names.extend(generic.names.iter().copied());
            }
        }
        if handle_names.len() != 1 {
            return Err(ComplianceError::GenericContract {
                count: handle_names.len(),
            });
        }
        let handle_generic = interner.resolve(handle_names[0].verbatim).to_string();

        let ctor_name = interner.intern_name(contract.constructor);
        let ctor = package
            .subprograms
            .iter()
            .find(|s| s.name == ctor_name)
            .ok_or(ComplianceError::MissingConstructor)?;
        match ctor.return_type {
            Some(ret) if ret == handle_ty => {}
            Some(ret) => {
                return Err(ComplianceError::WrongReturnType {
                    found: interner.resolve(ret.verbatim).to_string(),
                })
            }
            None => {
                return Err(ComplianceError::WrongReturnType {
                    found: "procedure".to_string(),
                })
            }
        }

        for required in contract.required_params {
            let req_name = interner.intern_name(required.name);
            let param = ctor
                .params
                .iter()
                .find(|p| p.names.contains(&req_name))
                .ok_or_else(|| ComplianceError::ParameterContract {
                    parameter: required.name.to_string(),
                    reason: ParameterReason::Missing,
                })?;
            if param.ty != interner.intern_name(required.type_mark) {
                return Err(ComplianceError::ParameterContract {
                    parameter: required.name.to_string(),
                    reason: ParameterReason::WrongType,
                });
            }
            if !param.has_default() {
                return Err(ComplianceError::ParameterContract {
                    parameter: required.name.to_string(),
                    reason: ParameterReason::MissingDefault,
                });
            }
        }

        Ok(ComplianceCheck {
            entity_name: interner.resolve(entity.name.verbatim).to_string(),
            package_name: interner.resolve(package.name.verbatim).to_string(),
            handle_generic,
            state: SynthState::Validated,
        })
    }

    /// The verbatim name of the checked entity.
    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    /// The verbatim name of the checked package.
    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    /// The verbatim name of the entity's handle generic.
    pub fn handle_generic(&self) -> &str {
        &self.handle_generic
    }

    /// The name of the compliance testbench entity, `tb_<vc>_compliance`.
    pub fn testbench_name(&self) -> String {
        format!("tb_{}_compliance", self.entity_name)
    }

    /// The default file name of the editable template.
    pub fn template_file_name(&self) -> String {
        format!("tb_{}_compliance_template.vhd", self.entity_name)
    }

    /// The file name the finalized testbench is written under.
    pub fn testbench_file_name(&self) -> String {
        format!("tb_{}_compliance.vhd", self.entity_name)
    }

    /// The synthesizer state of this check.
    pub fn state(&self) -> SynthState {
        self.state
    }
}
