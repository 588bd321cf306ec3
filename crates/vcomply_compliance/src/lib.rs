//! Verification component compliance checking and testbench synthesis.
//!
//! The crate has two halves that share one object. [`ComplianceCheck::check`]
//! validates a VC entity and its package against the fixed
//! [`ComplianceContract`]; the resulting check then drives the synthesizer
//! through its state machine: produce an editable template, finalize it, and
//! add the finalized testbench to the project.
//!
//! - `contract`: the fixed contract every VC is held to.
//! - `check`: the fail-fast validator producing a [`ComplianceCheck`].
//! - `testbench`: template synthesis, finalization, and library insertion.
//! - `error`: [`ComplianceError`] covering both halves.

#![warn(missing_docs)]

mod check;
mod contract;
mod error;
mod testbench;

pub use check::ComplianceCheck;
pub use contract::{ComplianceContract, RequiredParam};
pub use error::{ComplianceError, ParameterReason};
pub use testbench::SynthState;
