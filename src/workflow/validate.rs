//! Structural validation of composed graphs.
//!
//! The composer wires edges without checking them; this pass is the
//! single authority on wiring defects. All violations are collected
//! into one [`StructuralError`] so a defective composition is reported
//! whole, not one mistake at a time.
//!
//! Checks, in order:
//! 1. the input and output boundary nodes are designated
//! 2. every edge references declared ports with compatible kinds
//! 3. every input port has at most one producer
//! 4. every required input is bound
//! 5. every node is reachable from the workflow input
//! 6. the graph is acyclic

use crate::workflow::artifact::ArtifactKind;
use crate::workflow::error::{StructuralError, StructuralViolation};
use crate::workflow::graph::WorkflowGraph;
use crate::workflow::id::NodeId;
use crate::workflow::node::Node;
use crate::workflow::port::PortDescriptor;
use std::collections::{HashMap, VecDeque};

/// Check a composed graph, collecting every violation found.
pub fn validate(graph: &WorkflowGraph) -> Result<(), StructuralError> {
    let mut violations = Vec::new();
    if !graph.input().is_valid() {
        violations.push(StructuralViolation::MissingInput);
    }
    if !graph.output().is_valid() {
        violations.push(StructuralViolation::MissingOutput);
    }
    check_edges(graph, &mut violations);
    check_required_inputs(graph, &mut violations);
    check_reachability(graph, &mut violations);
    check_acyclic(graph, &mut violations);

    if violations.is_empty() {
        Ok(())
    } else {
        Err(StructuralError::new(violations))
    }
}

/// The kind an output port actually emits: map nodes run once per
/// element, so their element-kind outputs arrive downstream as lists.
fn effective_output_kind(node: &Node, port: &PortDescriptor) -> ArtifactKind {
    if node.is_map() {
        port.kind.list_of().unwrap_or(port.kind)
    } else {
        port.kind
    }
}

fn check_edges(graph: &WorkflowGraph, violations: &mut Vec<StructuralViolation>) {
    for edge in graph.edges() {
        let from_node = graph.node(edge.from.node);
        let to_node = graph.node(edge.to.node);

        let from_port = from_node.interface().output(edge.from.port);
        if from_port.is_none() {
            violations.push(StructuralViolation::UnknownPort {
                node: from_node.name().to_string(),
                port: edge.from.port.to_string(),
            });
        }

        let to_port = to_node.interface().input(edge.to.port);
        if to_port.is_none() {
            violations.push(StructuralViolation::UnknownPort {
                node: to_node.name().to_string(),
                port: edge.to.port.to_string(),
            });
        }

        if let (Some(from_port), Some(to_port)) = (from_port, to_port) {
            let from_kind = effective_output_kind(from_node, from_port);
            if !from_kind.can_bind(to_port.kind, to_port.iterfield) {
                violations.push(StructuralViolation::TypeMismatch {
                    from_node: from_node.name().to_string(),
                    from_port: edge.from.port.to_string(),
                    from_kind,
                    to_node: to_node.name().to_string(),
                    to_port: edge.to.port.to_string(),
                    to_kind: to_port.kind,
                });
            }
        }
    }

    let mut producers: HashMap<(NodeId, &str), u32> = HashMap::new();
    for edge in graph.edges() {
        *producers.entry((edge.to.node, edge.to.port)).or_insert(0) += 1;
    }
    let mut duplicates: Vec<(NodeId, &str)> = producers
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(key, _)| key)
        .collect();
    duplicates.sort_by_key(|(node, port)| (node.index(), *port));
    for (node, port) in duplicates {
        violations.push(StructuralViolation::DuplicateBinding {
            node: graph.node(node).name().to_string(),
            port: port.to_string(),
        });
    }
}

fn check_required_inputs(graph: &WorkflowGraph, violations: &mut Vec<StructuralViolation>) {
    for node in graph.nodes() {
        for port in node.ports().iter().filter(|p| p.is_input() && p.required) {
            if graph.binding(node.id(), port.name).is_none() {
                violations.push(StructuralViolation::UnboundInput {
                    node: node.name().to_string(),
                    port: port.name.to_string(),
                });
            }
        }
    }
}

fn check_reachability(graph: &WorkflowGraph, violations: &mut Vec<StructuralViolation>) {
    if !graph.input().is_valid() {
        return;
    }

    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    visited[graph.input().index()] = true;
    queue.push_back(graph.input());

    while let Some(id) = queue.pop_front() {
        for edge in graph.edges_from(id) {
            let next = edge.to.node;
            if !visited[next.index()] {
                visited[next.index()] = true;
                queue.push_back(next);
            }
        }
    }

    let mut unreachable: Vec<String> = graph
        .nodes()
        .iter()
        .filter(|n| !visited[n.id().index()])
        .map(|n| n.name().to_string())
        .collect();
    unreachable.sort();
    for node in unreachable {
        violations.push(StructuralViolation::Unreachable { node });
    }
}

fn check_acyclic(graph: &WorkflowGraph, violations: &mut Vec<StructuralViolation>) {
    let mut indegree = vec![0usize; graph.node_count()];
    for edge in graph.edges() {
        indegree[edge.to.node.index()] += 1;
    }

    let mut queue: VecDeque<NodeId> = graph
        .nodes()
        .iter()
        .filter(|n| indegree[n.id().index()] == 0)
        .map(|n| n.id())
        .collect();
    let mut remaining = graph.node_count();

    while let Some(id) = queue.pop_front() {
        remaining -= 1;
        for edge in graph.edges_from(id) {
            let next = edge.to.node.index();
            indegree[next] -= 1;
            if indegree[next] == 0 {
                queue.push_back(edge.to.node);
            }
        }
    }

    if remaining > 0 {
        let mut nodes: Vec<String> = graph
            .nodes()
            .iter()
            .filter(|n| indegree[n.id().index()] > 0)
            .map(|n| n.name().to_string())
            .collect();
        nodes.sort();
        violations.push(StructuralViolation::CycleDetected { nodes });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::interfaces::{self, InterfaceSpec};
    use crate::workflow::resources::ResourceSpec;

    fn place(graph: &mut WorkflowGraph, spec: &'static InterfaceSpec) -> NodeId {
        graph.add_node(Node::new(
            spec,
            ResourceSpec {
                threads: 1,
                mem_gb: 0.2,
                submission: None,
            },
        ))
    }

    /// inputs -> tgv -> outputs, fully wired except where a test
    /// breaks it.
    fn tgv_graph() -> (WorkflowGraph, NodeId, NodeId) {
        let mut graph = WorkflowGraph::new();
        let inputs = place(&mut graph, &interfaces::WORKFLOW_INPUTS);
        let tgv = place(&mut graph, &interfaces::TGV_INVERSION);
        let outputs = place(&mut graph, &interfaces::WORKFLOW_OUTPUTS);
        graph.set_input(inputs);
        graph.set_output(outputs);

        graph.connect(inputs, "phase", tgv, "phase");
        graph.connect(inputs, "TE", tgv, "TE");
        graph.connect(inputs, "mask", tgv, "mask");
        graph.connect(inputs, "b0_strength", tgv, "b0_strength");
        graph.connect(tgv, "qsm", outputs, "qsm");
        (graph, inputs, tgv)
    }

    fn violations(graph: &WorkflowGraph) -> Vec<StructuralViolation> {
        validate(graph).unwrap_err().violations
    }

    #[test]
    fn test_complete_graph_passes() {
        let (graph, _, _) = tgv_graph();
        assert!(validate(&graph).is_ok());
    }

    #[test]
    fn test_detects_missing_boundaries() {
        let found = violations(&WorkflowGraph::new());
        assert!(found.contains(&StructuralViolation::MissingInput));
        assert!(found.contains(&StructuralViolation::MissingOutput));
    }

    #[test]
    fn test_detects_unknown_ports() {
        let (mut graph, inputs, tgv) = tgv_graph();
        graph.connect(inputs, "phases", tgv, "b0_strength");
        let found = violations(&graph);
        assert!(found.iter().any(|v| matches!(
            v,
            StructuralViolation::UnknownPort { node, port }
                if node == "qsm_inputs" && port == "phases"
        )));
    }

    #[test]
    fn test_detects_type_mismatch() {
        let (mut graph, inputs, _) = tgv_graph();
        let outputs = graph.output();
        // Scalar list into a volume-list input.
        graph.connect(inputs, "TE", outputs, "qsm");
        let found = violations(&graph);
        assert!(found.iter().any(|v| matches!(
            v,
            StructuralViolation::TypeMismatch { from_port, to_kind, .. }
                if from_port == "TE" && *to_kind == ArtifactKind::VolumeList
        )));
    }

    #[test]
    fn test_detects_duplicate_binding() {
        let (mut graph, inputs, tgv) = tgv_graph();
        graph.connect(inputs, "phase_unwrapped", tgv, "phase");
        let found = violations(&graph);
        assert!(found.iter().any(|v| matches!(
            v,
            StructuralViolation::DuplicateBinding { node, port }
                if node == "tgv" && port == "phase"
        )));
    }

    #[test]
    fn test_detects_unbound_required_input() {
        let mut graph = WorkflowGraph::new();
        let inputs = place(&mut graph, &interfaces::WORKFLOW_INPUTS);
        let tgv = place(&mut graph, &interfaces::TGV_INVERSION);
        graph.set_input(inputs);
        graph.connect(inputs, "phase", tgv, "phase");

        let found = violations(&graph);
        let unbound: Vec<_> = found
            .iter()
            .filter_map(|v| match v {
                StructuralViolation::UnboundInput { port, .. } => Some(port.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(unbound, vec!["TE", "mask", "b0_strength"]);
    }

    #[test]
    fn test_detects_unreachable_node() {
        let (mut graph, _, _) = tgv_graph();
        place(&mut graph, &interfaces::ROMEO_UNWRAPPING);
        let found = violations(&graph);
        assert!(found.iter().any(|v| matches!(
            v,
            StructuralViolation::Unreachable { node } if node == "mrt_romeo"
        )));
    }

    #[test]
    fn test_detects_cycle() {
        let (mut graph, _, _) = tgv_graph();
        let junction = place(&mut graph, &interfaces::UNWRAPPED_PHASE_JUNCTION);
        graph.connect(junction, "phase_unwrapped", junction, "phase_unwrapped");
        let found = violations(&graph);
        assert!(found.iter().any(|v| matches!(
            v,
            StructuralViolation::CycleDetected { nodes }
                if nodes == &vec!["phase-unwrapping".to_string()]
        )));
    }
}
