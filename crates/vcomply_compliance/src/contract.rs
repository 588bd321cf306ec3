//! The verification component compliance contract.
//!
//! The contract is fixed by the framework: a compliant VC entity exposes
//! exactly one generic of the handle type, and its package declares a
//! zero-argument-callable constructor returning that type, with four
//! defaulted configuration parameters.

/// A constructor parameter the contract requires.
#[derive(Clone, Copy, Debug)]
pub struct RequiredParam {
    /// The parameter name.
    pub name: &'static str,
    /// The required type mark.
    pub type_mark: &'static str,
}

/// The fixed compliance contract for verification components.
#[derive(Clone, Copy, Debug)]
pub struct ComplianceContract {
    /// The handle type shared by the generic and the constructor return.
    pub handle_type: &'static str,
    /// The constructor function name.
    pub constructor: &'static str,
    /// The required defaulted parameters, in canonical order.
    pub required_params: &'static [RequiredParam],
}

impl ComplianceContract {
    /// The contract every checked VC is held to.
    pub const STANDARD: ComplianceContract = ComplianceContract {
        handle_type: "vc_handle_t",
        constructor: "new_vc",
        required_params: &[
            RequiredParam {
                name: "logger",
                type_mark: "logger_t",
            },
            RequiredParam {
                name: "actor",
                type_mark: "actor_t",
            },
            RequiredParam {
                name: "checker",
                type_mark: "checker_t",
            },
            RequiredParam {
                name: "fail_on_unexpected_msg_type",
                type_mark: "boolean",
            },
        ],
    };
}
