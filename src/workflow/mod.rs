//! Workflow topology composition.
//!
//! Turns a run configuration into a validated, exportable processing
//! graph for susceptibility-map reconstruction. This module owns the
//! node catalog, the graph structure, resource planning, composition,
//! validation, and the description handed to the execution engine.
//!
//! # Architecture
//!
//! ```text
//! WorkflowConfig
//!       |
//!       v
//! WorkflowComposer ----consults----> interface catalog
//!       |                            ResourcePlanner
//!       v
//! WorkflowGraph --validate()--> GraphDescription --> engine
//! ```
//!
//! # Design
//!
//! - The node vocabulary is closed: every placeable node is a static
//!   entry in [`interfaces`], matched exhaustively at compose time.
//! - Composition is deterministic and side-effect-free; the only
//!   ambient read is a one-time probe of free host memory for the
//!   memory-adaptive inversion.
//! - Validation is a separate pass that reports every violation at
//!   once rather than stopping at the first.

pub mod artifact;
pub mod compose;
pub mod describe;
pub mod error;
pub mod graph;
pub mod id;
pub mod interfaces;
pub mod node;
pub mod port;
pub mod resources;
pub mod stage;
pub mod validate;

pub use artifact::ArtifactKind;
pub use compose::WorkflowComposer;
pub use describe::GraphDescription;
pub use error::{ConfigurationError, StructuralError, StructuralViolation, WorkflowError};
pub use graph::{Edge, PortRef, WorkflowGraph};
pub use id::{EdgeId, NodeId};
pub use interfaces::InterfaceSpec;
pub use node::{Node, ParamValue};
pub use port::{PortDescriptor, PortDirection};
pub use resources::{MemoryPolicy, ResourcePlanner, ResourceSpec, ThreadPolicy};
pub use stage::{BfRemovalAlgorithm, QsmAlgorithm, Stage, UnwrappingAlgorithm};
pub use validate::validate;
