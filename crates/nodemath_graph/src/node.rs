// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::id::{NodeId, PortId};
use crate::kinds::NodeKind;
use crate::port::{Port, PortDirection};
use crate::value::TypedValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node instance in the graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Kind, which selects the evaluation function
    pub kind: NodeKind,
    required_inputs: usize,
    /// Ports in schema order
    pub ports: Vec<Port>,
    /// Display name
    pub label: String,
}

impl Node {
    /// Create a node with no ports
    pub fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            kind,
            required_inputs: kind.input_count(),
            ports: Vec::new(),
            label: String::new(),
        }
    }

    /// Number of input connections the evaluation function consumes
    pub fn required_inputs(&self) -> usize {
        self.required_inputs
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }

    /// Get a mutable port by ID
    pub fn port_mut(&mut self, port_id: PortId) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.id == port_id)
    }

    /// Input ports in declaration order
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.direction == PortDirection::Input)
    }

    /// First static port, if any
    pub fn static_port(&self) -> Option<&Port> {
        self.ports.iter().find(|p| p.direction == PortDirection::Static)
    }

    /// The output port, if any
    pub fn output(&self) -> Option<&Port> {
        self.ports.iter().find(|p| p.direction == PortDirection::Output)
    }

    /// Mutable output port, if any
    pub fn output_mut(&mut self) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.direction == PortDirection::Output)
    }

    /// Last value cached on the output port
    pub fn output_value(&self) -> Option<&TypedValue> {
        self.output().map(|p| &p.value)
    }

    /// Cache `value` on the output port. Nodes without one ignore the write.
    pub fn set_output(&mut self, value: TypedValue) {
        if let Some(port) = self.output_mut() {
            port.value = value;
        }
    }
}

/// Menu grouping for node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Literal values
    Constants,
    /// Plus, minus, multiply, divide, negate
    Arithmetic,
    /// Shape conversions
    Casts,
    /// Vector geometry
    Vector,
    /// Matrix operations
    Matrix,
    /// Building and swizzling vectors
    Compose,
}

impl NodeCategory {
    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Constants => "Constants",
            Self::Arithmetic => "Arithmetic",
            Self::Casts => "Casts",
            Self::Vector => "Vector",
            Self::Matrix => "Matrix",
            Self::Compose => "Compose",
        }
    }
}

/// Catalog of constructible node kinds, grouped by category in menu order
pub struct NodeCatalog {
    /// Kinds by category
    groups: IndexMap<NodeCategory, Vec<NodeKind>>,
}

impl NodeCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }

    /// Catalog holding every constructible kind
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for kind in NodeKind::ALL {
            catalog.register(*kind);
        }
        catalog
    }

    /// Register a kind under its category
    pub fn register(&mut self, kind: NodeKind) {
        let group = self.groups.entry(kind.category()).or_default();
        if !group.contains(&kind) {
            group.push(kind);
        }
    }

    /// Categories in menu order
    pub fn categories(&self) -> impl Iterator<Item = NodeCategory> + '_ {
        self.groups.keys().copied()
    }

    /// Kinds in a category
    pub fn kinds_in(&self, category: NodeCategory) -> &[NodeKind] {
        self.groups.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Look a kind up by its display name
    pub fn find(&self, name: &str) -> Option<NodeKind> {
        self.groups
            .values()
            .flatten()
            .copied()
            .find(|k| k.name() == name)
    }

    /// Total number of registered kinds
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
