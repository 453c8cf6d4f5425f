//! Port descriptors for workflow nodes.
//!
//! Each interface declares its ports via static `PortDescriptor` arrays.
//! The composer wires edges against these and the validator checks them.

use crate::workflow::artifact::ArtifactKind;
use serde::Serialize;

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PortDirection {
    Input,
    Output,
}

/// Static descriptor for an interface port.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
    pub kind: ArtifactKind,
    /// Inputs only: validation fails if the port is left unbound.
    pub required: bool,
    /// Inputs only: the port consumes one list element per map expansion.
    pub iterfield: bool,
}

impl PortDescriptor {
    pub const fn input(name: &'static str, kind: ArtifactKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            required: true,
            iterfield: false,
        }
    }

    /// A required input consumed element-wise under map expansion.
    pub const fn iter_input(name: &'static str, kind: ArtifactKind) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
            kind,
            required: true,
            iterfield: true,
        }
    }

    pub const fn output(name: &'static str, kind: ArtifactKind) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
            kind,
            required: false,
            iterfield: false,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}
