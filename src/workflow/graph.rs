//! The composed workflow graph.
//!
//! Nodes live in an arena vector indexed by [`NodeId`]; edges record
//! directed port-to-port dependencies. The graph is append-only: the
//! composer builds it in one pass and never mutates it afterwards, so
//! two runs over the same configuration produce identical graphs.

use crate::workflow::id::{EdgeId, NodeId};
use crate::workflow::node::Node;
use crate::workflow::stage::Stage;

/// One end of an edge: a node paired with one of its port names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: NodeId,
    pub port: &'static str,
}

/// A directed data dependency from an output port to an input port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: PortRef,
    pub to: PortRef,
}

/// A composed workflow: placed nodes plus the edges wiring them.
///
/// Construction goes through the crate-internal mutators; consumers
/// only read. Validation is a separate pass over the finished graph,
/// so `connect` accepts anything and [`validate`] is the authority on
/// wiring mistakes.
///
/// [`validate`]: crate::workflow::validate::validate
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    input: NodeId,
    output: NodeId,
}

impl WorkflowGraph {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            input: NodeId::INVALID,
            output: NodeId::INVALID,
        }
    }

    /// Place a node, assigning the next id.
    pub(crate) fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        node.assign_id(id);
        self.nodes.push(node);
        id
    }

    pub(crate) fn set_input(&mut self, id: NodeId) {
        self.input = id;
    }

    pub(crate) fn set_output(&mut self, id: NodeId) {
        self.output = id;
    }

    /// Record an edge. No checking happens here; a later [`validate`]
    /// pass reports every wiring defect at once.
    ///
    /// [`validate`]: crate::workflow::validate::validate
    pub(crate) fn connect(
        &mut self,
        from: NodeId,
        from_port: &'static str,
        to: NodeId,
        to_port: &'static str,
    ) -> EdgeId {
        let id = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            id,
            from: PortRef {
                node: from,
                port: from_port,
            },
            to: PortRef {
                node: to,
                port: to_port,
            },
        });
        id
    }

    /// Look up a node. Ids are indices into this graph's storage.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The workflow input boundary node.
    pub fn input(&self) -> NodeId {
        self.input
    }

    /// The workflow output boundary node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Find a node by its catalog name.
    pub fn find_node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name() == name)
    }

    /// The edge feeding an input port, if any.
    pub fn binding(&self, node: NodeId, port: &str) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|e| e.to.node == node && e.to.port == port)
    }

    /// Edges arriving at a node.
    pub fn edges_into(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.to.node == node)
    }

    /// Edges leaving a node.
    pub fn edges_from(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.iter().filter(move |e| e.from.node == node)
    }

    /// Nodes belonging to a stage, junctions included.
    pub fn stage_nodes(&self, stage: Stage) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().filter(move |n| n.stage() == stage)
    }

    /// Trace an input port back to the producing work node or workflow
    /// input, skipping identity junctions along the way.
    ///
    /// Junctions mirror port names on both sides, so the walk follows
    /// the same name upstream. Stops at an unbound junction input
    /// rather than inventing a source.
    pub fn resolve_source(&self, node: NodeId, port: &str) -> Option<PortRef> {
        let mut current = self.binding(node, port)?.from;
        loop {
            if !self.node(current.node).is_identity() || current.node == self.input {
                return Some(current);
            }
            match self.binding(current.node, current.port) {
                Some(edge) => current = edge.from,
                None => return Some(current),
            }
        }
    }
}
