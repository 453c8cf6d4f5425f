//! Exportable graph descriptions.
//!
//! The execution engine consumes a serialized description of the
//! composed graph, not the in-memory structure. Each node carries
//! enough identity (name, stage, ports, resources, parameters) for
//! the engine's scheduling and for actionable failure reports.

use crate::workflow::graph::WorkflowGraph;
use crate::workflow::node::ParamValue;
use crate::workflow::port::PortDescriptor;
use crate::workflow::resources::ResourceSpec;
use crate::workflow::stage::Stage;
use serde::Serialize;
use std::collections::BTreeMap;

/// One node, flattened for export.
#[derive(Debug, Serialize)]
pub struct NodeDescription {
    pub name: &'static str,
    pub stage: Stage,
    pub ports: Vec<PortDescriptor>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub iterfields: Vec<&'static str>,
    pub resources: ResourceSpec,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: BTreeMap<&'static str, ParamValue>,
}

/// One edge, by node and port name.
#[derive(Debug, Serialize)]
pub struct EdgeDescription {
    pub from_node: &'static str,
    pub from_port: &'static str,
    pub to_node: &'static str,
    pub to_port: &'static str,
}

/// A complete composed workflow, ready for serialization.
#[derive(Debug, Serialize)]
pub struct GraphDescription {
    pub input: &'static str,
    pub output: &'static str,
    pub nodes: Vec<NodeDescription>,
    pub edges: Vec<EdgeDescription>,
}

impl GraphDescription {
    /// Flatten a composed graph. Expects a graph that passed
    /// validation, with both boundary nodes designated.
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        let nodes = graph
            .nodes()
            .iter()
            .map(|node| NodeDescription {
                name: node.name(),
                stage: node.stage(),
                ports: node.ports().to_vec(),
                iterfields: node.iterfields(),
                resources: node.resources().clone(),
                parameters: node.params().clone(),
            })
            .collect();

        let edges = graph
            .edges()
            .iter()
            .map(|edge| EdgeDescription {
                from_node: graph.node(edge.from.node).name(),
                from_port: edge.from.port,
                to_node: graph.node(edge.to.node).name(),
                to_port: edge.to.port,
            })
            .collect();

        Self {
            input: graph.node(graph.input()).name(),
            output: graph.node(graph.output()).name(),
            nodes,
            edges,
        }
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowConfig;
    use crate::workflow::compose::WorkflowComposer;
    use crate::workflow::resources::ResourcePlanner;
    use crate::workflow::stage::QsmAlgorithm;

    fn tgv_description() -> GraphDescription {
        let mut config = WorkflowConfig::default();
        config.qsm_algorithm = Some(QsmAlgorithm::Tgv);
        config.acquisition.echo_time = Some(0.02);
        let planner = ResourcePlanner::with_available_memory(config.parallel, None, 32.0);
        let graph = WorkflowComposer::compose_with_planner(&config, &planner).unwrap();
        GraphDescription::from_graph(&graph)
    }

    #[test]
    fn test_description_covers_graph() {
        let description = tgv_description();
        assert_eq!(description.input, "qsm_inputs");
        assert_eq!(description.output, "qsm_outputs");
        assert_eq!(description.nodes.len(), 3);
        assert_eq!(description.edges.len(), 5);
    }

    #[test]
    fn test_json_spot_checks() {
        let json = tgv_description().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let tgv = value["nodes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["name"] == "tgv")
            .unwrap();
        assert_eq!(tgv["stage"], "inversion");
        assert_eq!(
            tgv["iterfields"],
            serde_json::json!(["phase", "TE", "mask"])
        );
        assert_eq!(tgv["parameters"]["iterations"], 1000);
        assert_eq!(tgv["parameters"]["out_suffix"], "_tgv");
        assert_eq!(tgv["resources"]["threads"], 6);

        let last = &value["edges"].as_array().unwrap()[4];
        assert_eq!(last["from_node"], "tgv");
        assert_eq!(last["to_node"], "qsm_outputs");
        assert_eq!(last["to_port"], "qsm");
    }

    #[test]
    fn test_junction_descriptions_omit_parameters() {
        let description = tgv_description();
        let inputs = description
            .nodes
            .iter()
            .find(|n| n.name == "qsm_inputs")
            .unwrap();
        assert!(inputs.parameters.is_empty());
        assert!(inputs.iterfields.is_empty());
        assert!(inputs.resources.submission.is_none());
    }
}
