//! Workflow composition.
//!
//! [`WorkflowComposer::compose`] turns one [`WorkflowConfig`] into a
//! validated [`WorkflowGraph`]. A four-stage decision tree places
//! nodes from the interface catalog and wires them:
//!
//! ```text
//! qsm_inputs -> [unwrapping] -> [frequency] -> [bf removal] -> inversion -> qsm_outputs
//!               laplacian |     phase-to-      vsharp | pdf    nextqsm |
//!               romeo           freq                           rts | tgv
//! ```
//!
//! Bracketed stages are conditional: the selected inversion decides
//! which exist. Every stage that exists ends in an identity junction,
//! so downstream consumers bind one stable name regardless of which
//! variant ran.
//!
//! # Design
//!
//! - Composition is a pure function of the configuration and planner:
//!   identical inputs yield identical graphs, node ids included.
//! - Configuration problems fail fast, before any graph is returned.
//! - The finished graph passes [`validate`] before being handed out;
//!   a structural failure here is a composer defect, not user error.

use crate::config::WorkflowConfig;
use crate::workflow::error::{ConfigurationError, WorkflowError};
use crate::workflow::graph::{PortRef, WorkflowGraph};
use crate::workflow::id::NodeId;
use crate::workflow::interfaces::{self, InterfaceSpec, TGV_EXTRA_ARGUMENTS, TGV_OUT_SUFFIX};
use crate::workflow::node::Node;
use crate::workflow::resources::ResourcePlanner;
use crate::workflow::stage::{BfRemovalAlgorithm, QsmAlgorithm, UnwrappingAlgorithm};
use crate::workflow::validate::validate;
use tracing::{debug, info, warn};

/// Plan resources for an interface and place it.
fn insert(
    graph: &mut WorkflowGraph,
    planner: &ResourcePlanner,
    spec: &'static InterfaceSpec,
) -> NodeId {
    graph.add_node(Node::new(spec, planner.plan(spec)))
}

/// Builds reconstruction workflows from run configurations.
pub struct WorkflowComposer;

impl WorkflowComposer {
    /// Compose a workflow graph for one run.
    ///
    /// Probes free host memory once for the memory-adaptive nodes; use
    /// [`compose_with_planner`] with a fixed figure when reproducible
    /// plans are needed.
    ///
    /// [`compose_with_planner`]: WorkflowComposer::compose_with_planner
    pub fn compose(config: &WorkflowConfig) -> Result<WorkflowGraph, WorkflowError> {
        let planner = ResourcePlanner::new(config.parallel, config.scheduler.clone());
        Self::compose_with_planner(config, &planner)
    }

    /// Compose against a caller-supplied planner.
    pub fn compose_with_planner(
        config: &WorkflowConfig,
        planner: &ResourcePlanner,
    ) -> Result<WorkflowGraph, WorkflowError> {
        let algorithm = config
            .qsm_algorithm
            .ok_or(ConfigurationError::InversionNotSelected)?;
        if config.parallel.multiproc && config.parallel.processes == 0 {
            return Err(ConfigurationError::EmptyProcessBudget.into());
        }

        debug!(%algorithm, "composing workflow");

        let mut graph = WorkflowGraph::new();
        let inputs = insert(&mut graph, planner, &interfaces::WORKFLOW_INPUTS);
        graph.set_input(inputs);
        let outputs = insert(&mut graph, planner, &interfaces::WORKFLOW_OUTPUTS);
        graph.set_output(outputs);

        let unwrapped = Self::compose_unwrapping(&mut graph, config, planner, inputs)?;

        match algorithm {
            QsmAlgorithm::Nextqsm => {
                let frequency =
                    Self::compose_frequency(&mut graph, config, planner, inputs, unwrapped)?;
                let node = insert(&mut graph, planner, &interfaces::NEXTQSM_INVERSION);
                // NEXTQSM reads frequency through its phase port.
                graph.connect(frequency.node, frequency.port, node, "phase");
                graph.connect(inputs, "mask", node, "mask");
                graph.connect(node, "qsm", outputs, "qsm");
                debug!("placed NEXTQSM inversion");
            }
            QsmAlgorithm::Rts => {
                let frequency =
                    Self::compose_frequency(&mut graph, config, planner, inputs, unwrapped)?;
                let bf = Self::compose_bf_removal(&mut graph, config, planner, inputs, frequency);
                let node = insert(&mut graph, planner, &interfaces::RTS_INVERSION);
                graph.connect(bf, "tissue_frequency", node, "tissue_frequency");
                graph.connect(bf, "mask", node, "mask");
                graph.connect(inputs, "vsz", node, "vsz");
                graph.connect(inputs, "b0_direction", node, "b0_direction");
                graph.connect(node, "qsm", outputs, "qsm");
                debug!("placed RTS inversion");
            }
            QsmAlgorithm::Tgv => {
                Self::compose_tgv(&mut graph, config, planner, inputs, outputs, unwrapped)?;
            }
        }

        validate(&graph)?;
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            %algorithm,
            "workflow composed"
        );
        Ok(graph)
    }

    /// Place the unwrapping stage, returning the junction port later
    /// stages consume. `None` when no unwrapping is selected.
    fn compose_unwrapping(
        graph: &mut WorkflowGraph,
        config: &WorkflowConfig,
        planner: &ResourcePlanner,
        inputs: NodeId,
    ) -> Result<Option<PortRef>, WorkflowError> {
        let Some(algorithm) = config.unwrapping else {
            return Ok(None);
        };

        let junction = insert(graph, planner, &interfaces::UNWRAPPED_PHASE_JUNCTION);
        match algorithm {
            UnwrappingAlgorithm::Laplacian => {
                let node = insert(graph, planner, &interfaces::LAPLACIAN_UNWRAPPING);
                graph.connect(inputs, "phase", node, "phase");
                graph.connect(inputs, "mask", node, "mask");
                graph.connect(node, "phase_unwrapped", junction, "phase_unwrapped");
                debug!("placed Laplacian unwrapping");
            }
            UnwrappingAlgorithm::Romeo => {
                if config.combine_phase {
                    // ROMEO already unwrapped the phase while combining
                    // echoes upstream; take the result as an input.
                    if !config.inputs.phase_unwrapped {
                        return Err(ConfigurationError::CombinedPhaseUnavailable.into());
                    }
                    graph.connect(inputs, "phase_unwrapped", junction, "phase_unwrapped");
                    debug!("using combined pre-unwrapped phase");
                } else {
                    if !config.inputs.magnitude {
                        return Err(ConfigurationError::MagnitudeUnavailable.into());
                    }
                    let node = insert(graph, planner, &interfaces::ROMEO_UNWRAPPING);
                    graph.connect(inputs, "phase", node, "phase");
                    graph.connect(inputs, "magnitude", node, "magnitude");
                    graph.connect(node, "phase_unwrapped", junction, "phase_unwrapped");
                    debug!("placed ROMEO unwrapping");
                }
            }
        }

        Ok(Some(PortRef {
            node: junction,
            port: "phase_unwrapped",
        }))
    }

    /// Place the frequency stage, returning the junction port the
    /// inversion consumes. Only called for frequency-consuming
    /// inversions.
    fn compose_frequency(
        graph: &mut WorkflowGraph,
        config: &WorkflowConfig,
        planner: &ResourcePlanner,
        inputs: NodeId,
        unwrapped: Option<PortRef>,
    ) -> Result<PortRef, WorkflowError> {
        let junction;

        if config.combine_phase {
            if !config.inputs.frequency {
                return Err(ConfigurationError::FrequencyInputUnavailable.into());
            }
            if unwrapped.is_some() {
                warn!("unwrapping output is unused; frequency comes from the combined input");
            }
            junction = insert(graph, planner, &interfaces::FREQUENCY_JUNCTION);
            graph.connect(inputs, "frequency", junction, "frequency");
            debug!("frequency taken from combined-phase input");
        } else {
            let unwrapped = unwrapped.ok_or(ConfigurationError::UnwrappedPhaseUnavailable)?;
            if config.acquisition.effective_echo_times().is_empty() {
                return Err(ConfigurationError::MissingEchoTimes {
                    node: interfaces::PHASE_TO_FREQUENCY.name,
                }
                .into());
            }
            junction = insert(graph, planner, &interfaces::FREQUENCY_JUNCTION);
            let node = insert(graph, planner, &interfaces::PHASE_TO_FREQUENCY);
            graph.connect(unwrapped.node, unwrapped.port, node, "phase");
            graph.connect(inputs, "TE", node, "TE");
            graph.connect(inputs, "vsz", node, "vsz");
            graph.connect(inputs, "b0_strength", node, "b0_strength");
            graph.connect(node, "frequency", junction, "frequency");
            debug!("placed phase-to-frequency conversion");
        }

        Ok(PortRef {
            node: junction,
            port: "frequency",
        })
    }

    /// Place background-field removal, returning the junction that
    /// pairs tissue frequency with the mask inversion should use.
    fn compose_bf_removal(
        graph: &mut WorkflowGraph,
        config: &WorkflowConfig,
        planner: &ResourcePlanner,
        inputs: NodeId,
        frequency: PortRef,
    ) -> NodeId {
        let junction = insert(graph, planner, &interfaces::BF_JUNCTION);

        match config.bf_algorithm {
            BfRemovalAlgorithm::Vsharp => {
                let node = insert(graph, planner, &interfaces::VSHARP_BF_REMOVAL);
                graph.connect(frequency.node, frequency.port, node, "frequency");
                graph.connect(inputs, "mask", node, "mask");
                graph.connect(inputs, "vsz", node, "vsz");
                graph.connect(node, "tissue_frequency", junction, "tissue_frequency");
                // The eroded V-SHARP mask replaces the original downstream.
                graph.connect(node, "vsharp_mask", junction, "mask");
                debug!("placed V-SHARP background-field removal");
            }
            BfRemovalAlgorithm::Pdf => {
                let node = insert(graph, planner, &interfaces::PDF_BF_REMOVAL);
                graph.connect(frequency.node, frequency.port, node, "frequency");
                graph.connect(inputs, "mask", node, "mask");
                graph.connect(inputs, "vsz", node, "vsz");
                graph.connect(node, "tissue_frequency", junction, "tissue_frequency");
                // PDF refines no mask; the original one goes forward.
                graph.connect(inputs, "mask", junction, "mask");
                debug!("placed PDF background-field removal");
            }
        }

        junction
    }

    /// Place the TGV inversion, wired from the unwrapping junction if
    /// one exists, else from the raw phase.
    fn compose_tgv(
        graph: &mut WorkflowGraph,
        config: &WorkflowConfig,
        planner: &ResourcePlanner,
        inputs: NodeId,
        outputs: NodeId,
        unwrapped: Option<PortRef>,
    ) -> Result<(), WorkflowError> {
        if config.acquisition.effective_echo_times().is_empty() {
            return Err(ConfigurationError::MissingEchoTimes {
                node: interfaces::TGV_INVERSION.name,
            }
            .into());
        }

        let node = Node::new(
            &interfaces::TGV_INVERSION,
            planner.plan(&interfaces::TGV_INVERSION),
        )
        .with_param("iterations", config.tgv.iterations)
        .with_param("alphas", config.tgv.alphas.to_vec())
        .with_param("erosions", config.tgv.erosions)
        .with_param("out_suffix", TGV_OUT_SUFFIX)
        .with_param("extra_arguments", TGV_EXTRA_ARGUMENTS);
        let tgv = graph.add_node(node);

        let phase = unwrapped.unwrap_or(PortRef {
            node: inputs,
            port: "phase",
        });
        graph.connect(phase.node, phase.port, tgv, "phase");
        graph.connect(inputs, "TE", tgv, "TE");
        graph.connect(inputs, "mask", tgv, "mask");
        graph.connect(inputs, "b0_strength", tgv, "b0_strength");
        graph.connect(tgv, "qsm", outputs, "qsm");
        debug!("placed TGV inversion");
        Ok(())
    }
}
