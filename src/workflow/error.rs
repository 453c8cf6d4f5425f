//! Workflow-specific error types.
//!
//! Two distinct failure families: `ConfigurationError` for run options
//! the composer cannot satisfy (caller's mistake, raised before any
//! node is kept), and `StructuralError` for an invalid composed graph
//! (composer defect, carrying every violation found).

use crate::workflow::artifact::ArtifactKind;
use std::fmt;
use thiserror::Error;

/// Run options that cannot be composed into a workflow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("no inversion algorithm selected")]
    InversionNotSelected,

    #[error("multiprocessing enabled with a zero process budget")]
    EmptyProcessBudget,

    #[error("echo times are required by '{node}' but none are configured")]
    MissingEchoTimes { node: &'static str },

    #[error("ROMEO unwrapping requires magnitude input volumes")]
    MagnitudeUnavailable,

    #[error("phase combination selected but no unwrapped-phase input is declared")]
    CombinedPhaseUnavailable,

    #[error("phase combination requires a precomputed frequency input for this inversion")]
    FrequencyInputUnavailable,

    #[error("no unwrapping stage can supply phase for frequency conversion")]
    UnwrappedPhaseUnavailable,
}

/// A single structural defect found in a composed graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralViolation {
    #[error("cycle through nodes: {}", nodes.join(", "))]
    CycleDetected { nodes: Vec<String> },

    #[error("no workflow input node is designated")]
    MissingInput,

    #[error("no workflow output node is designated")]
    MissingOutput,

    #[error("required input '{port}' of '{node}' is unbound")]
    UnboundInput { node: String, port: String },

    #[error("edge references unknown port '{port}' on '{node}'")]
    UnknownPort { node: String, port: String },

    #[error("input '{port}' of '{node}' is bound more than once")]
    DuplicateBinding { node: String, port: String },

    #[error(
        "type mismatch on edge {from_node}.{from_port} -> {to_node}.{to_port}: \
         {from_kind} cannot feed {to_kind}"
    )]
    TypeMismatch {
        from_node: String,
        from_port: String,
        from_kind: ArtifactKind,
        to_node: String,
        to_port: String,
        to_kind: ArtifactKind,
    },

    #[error("node '{node}' is unreachable from the workflow inputs")]
    Unreachable { node: String },
}

/// An invalid composed graph. Collects every violation found so a
/// single report covers the whole defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    pub violations: Vec<StructuralViolation>,
}

impl StructuralError {
    pub fn new(violations: Vec<StructuralViolation>) -> Self {
        Self { violations }
    }
}

impl fmt::Display for StructuralError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "workflow graph is invalid ({} violation{})",
            self.violations.len(),
            if self.violations.len() == 1 { "" } else { "s" }
        )?;
        for violation in &self.violations {
            write!(f, "; {violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for StructuralError {}

/// Errors that can occur while composing a workflow graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Structural(#[from] StructuralError),
}
