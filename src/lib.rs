//! # qsmflow-rs: QSM workflow topology composer
//!
//! Builds the processing graph for quantitative susceptibility mapping
//! (QSM) reconstruction from a single run configuration. The graph
//! topology, the degree of per-echo fan-out, and every node's resource
//! request are all derived from the configuration rather than fixed at
//! build time; the composed graph is validated and exported as a
//! description the execution engine consumes.
//!
//! ## Architecture
//!
//! - **Config**: one TOML-loadable record of algorithm selections,
//!   input availability, acquisition parameters and resource budget
//! - **Workflow**: interface catalog, composer, graph, validator and
//!   the exportable description
//! - **Resources**: policy-driven thread/memory planning plus batch
//!   scheduler submission directives
//!
//! ## Example
//!
//! ```
//! use qsmflow_rs::config::WorkflowConfig;
//! use qsmflow_rs::workflow::{QsmAlgorithm, WorkflowComposer, WorkflowError};
//!
//! let mut config = WorkflowConfig::default();
//! config.qsm_algorithm = Some(QsmAlgorithm::Tgv);
//! config.acquisition.echo_times = vec![0.004, 0.012];
//!
//! let graph = WorkflowComposer::compose(&config)?;
//! assert!(graph.find_node("tgv").is_some());
//! # Ok::<(), WorkflowError>(())
//! ```

pub mod config;
pub mod error;
pub mod workflow;

// Re-export commonly used types
pub use config::WorkflowConfig;
pub use error::{QsmFlowError, Result};
pub use workflow::{
    GraphDescription, QsmAlgorithm, UnwrappingAlgorithm, WorkflowComposer, WorkflowError,
    WorkflowGraph,
};
