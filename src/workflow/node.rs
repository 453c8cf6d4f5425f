//! Placed workflow nodes.
//!
//! A [`Node`] is one catalog interface instantiated into a graph, with
//! planned resources and any literal parameters attached. Nodes own no
//! wiring; edges live on the graph.

use crate::workflow::id::NodeId;
use crate::workflow::interfaces::InterfaceSpec;
use crate::workflow::port::PortDescriptor;
use crate::workflow::resources::ResourceSpec;
use crate::workflow::stage::Stage;
use serde::Serialize;
use std::collections::BTreeMap;

/// A literal parameter forwarded to a node's command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    FloatList(Vec<f64>),
}

impl ParamValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Str(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            ParamValue::FloatList(v) => Some(v),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Bool(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<u32> for ParamValue {
    fn from(v: u32) -> Self {
        ParamValue::Int(v as i64)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Str(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Str(v)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::FloatList(v)
    }
}

/// One node placed in a workflow graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    interface: &'static InterfaceSpec,
    resources: ResourceSpec,
    params: BTreeMap<&'static str, ParamValue>,
}

impl Node {
    /// Create an unplaced node. The graph assigns the id on insertion.
    pub(crate) fn new(interface: &'static InterfaceSpec, resources: ResourceSpec) -> Self {
        Self {
            id: NodeId::INVALID,
            interface,
            resources,
            params: BTreeMap::new(),
        }
    }

    /// Attach a literal parameter, builder-style.
    pub(crate) fn with_param(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value.into());
        self
    }

    pub(crate) fn assign_id(&mut self, id: NodeId) {
        self.id = id;
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.interface.name
    }

    pub fn stage(&self) -> Stage {
        self.interface.stage
    }

    pub fn interface(&self) -> &'static InterfaceSpec {
        self.interface
    }

    pub fn ports(&self) -> &'static [PortDescriptor] {
        self.interface.ports
    }

    pub fn resources(&self) -> &ResourceSpec {
        &self.resources
    }

    pub fn params(&self) -> &BTreeMap<&'static str, ParamValue> {
        &self.params
    }

    pub fn param(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    pub fn is_map(&self) -> bool {
        self.interface.is_map()
    }

    pub fn iterfields(&self) -> Vec<&'static str> {
        self.interface.iterfields()
    }

    pub fn is_identity(&self) -> bool {
        self.interface.identity
    }
}
