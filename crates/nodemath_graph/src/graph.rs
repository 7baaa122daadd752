// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes, ports and connections.

use crate::connection::{Connection, Endpoint};
use crate::id::{ConnectionId, IdAllocator, NodeId, PortId};
use crate::kinds::NodeKind;
use crate::node::Node;
use crate::port::{Port, PortDirection};
use indexmap::IndexMap;
use std::collections::HashMap;

/// A node feeding one of another node's inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRef {
    /// Node on the far side of the connection
    pub node: NodeId,
    /// Order of the local input port
    pub order: i32,
}

/// A node graph.
///
/// The graph owns every node, port and connection, and allocates all of their
/// identifiers from a single counter.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    ids: IdAllocator,
    /// Nodes in creation order
    nodes: IndexMap<NodeId, Node>,
    /// Owning node of every live port
    port_nodes: HashMap<PortId, NodeId>,
    /// Connections in creation order
    connections: IndexMap<ConnectionId, Connection>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an empty node of `kind` and return its ID
    pub fn new_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.ids.node();
        self.nodes.insert(id, Node::new(id, kind));
        id
    }

    /// Build a fully-ported node of `kind` from its schema
    pub fn construct(&mut self, kind: NodeKind) -> NodeId {
        let id = self.new_node(kind);
        for (order, spec) in (0_i32..).zip(kind.schema()) {
            let Ok(port) = self.add_port(id, spec.direction) else {
                break;
            };
            port.with_order(order)
                .with_label(spec.label)
                .with_value(spec.default);
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.label = format!("{} [{}]", kind.name(), id);
        }
        tracing::trace!(node = %id, kind = kind.name(), "constructed node");
        id
    }

    /// Append a port to a node
    pub fn add_port(
        &mut self,
        node_id: NodeId,
        direction: PortDirection,
    ) -> Result<&mut Port, GraphError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        let id = self.ids.port();
        self.port_nodes.insert(id, node_id);
        node.ports.push(Port::new(id, direction));
        let index = node.ports.len() - 1;
        Ok(&mut node.ports[index])
    }

    /// Remove a port along with every connection referencing it
    pub fn remove_port(&mut self, port_id: PortId) -> Option<Port> {
        let node_id = self.port_nodes.remove(&port_id)?;
        self.connections.retain(|_, c| !c.involves_port(port_id));
        let node = self.nodes.get_mut(&node_id)?;
        let index = node.ports.iter().position(|p| p.id == port_id)?;
        Some(node.ports.remove(index))
    }

    /// Remove a node, its ports' index entries and its connections
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let node = self.nodes.shift_remove(&node_id)?;
        for port in &node.ports {
            self.port_nodes.remove(&port.id);
        }
        self.connections.retain(|_, c| !c.involves_node(node_id));
        Some(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get the node owning a port
    pub fn node_for_port(&self, port_id: PortId) -> Option<&Node> {
        self.port_nodes
            .get(&port_id)
            .and_then(|node_id| self.nodes.get(node_id))
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.node_for_port(port_id)?.port(port_id)
    }

    /// Get a mutable port by ID
    pub fn port_mut(&mut self, port_id: PortId) -> Option<&mut Port> {
        let node_id = self.port_nodes.get(&port_id)?;
        self.nodes.get_mut(node_id)?.port_mut(port_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of indexed ports
    pub fn port_count(&self) -> usize {
        self.port_nodes.len()
    }

    /// Connect two ports.
    ///
    /// The ports must be connectable (not static), face opposite directions,
    /// and neither may be an input that is already connected. A rejected
    /// request leaves the graph untouched.
    pub fn add_connection(
        &mut self,
        node_a: NodeId,
        port_a: PortId,
        node_b: NodeId,
        port_b: PortId,
    ) -> Result<ConnectionId, ConnectionError> {
        let result = self.check_connection(node_a, port_a, node_b, port_b);
        if let Err(err) = &result {
            tracing::debug!(%port_a, %port_b, "connection rejected: {err}");
        }
        result?;

        let id = self.ids.connection();
        let connection = Connection::new(
            id,
            Endpoint::new(node_a, port_a),
            Endpoint::new(node_b, port_b),
        );
        self.connections.insert(id, connection);
        Ok(id)
    }

    fn check_connection(
        &self,
        node_a: NodeId,
        port_a: PortId,
        node_b: NodeId,
        port_b: PortId,
    ) -> Result<(), ConnectionError> {
        let a = self.endpoint_port(node_a, port_a)?;
        let b = self.endpoint_port(node_b, port_b)?;

        if !a.can_connect(b) {
            return Err(match [a, b].iter().find(|p| !p.direction.is_connectable()) {
                Some(literal) => ConnectionError::StaticPort(literal.id),
                None => ConnectionError::SameDirection,
            });
        }
        for port in [a, b] {
            if port.is_input() && self.is_port_connected(port.id) {
                return Err(ConnectionError::InputOccupied(port.id));
            }
        }
        Ok(())
    }

    fn endpoint_port(&self, node_id: NodeId, port_id: PortId) -> Result<&Port, ConnectionError> {
        let node = self
            .nodes
            .get(&node_id)
            .ok_or(ConnectionError::NodeNotFound(node_id))?;
        node.port(port_id)
            .ok_or(ConnectionError::PortNotFound(port_id))
    }

    /// Remove a connection
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        self.connections.shift_remove(&connection_id)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Whether any connection references a port
    pub fn is_port_connected(&self, port_id: PortId) -> bool {
        self.connections.values().any(|c| c.involves_port(port_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Nodes feeding `node_id`'s inputs, sorted by input order
    pub fn ordered_source_nodes_for_node(&self, node_id: NodeId) -> Vec<SourceRef> {
        let mut sources = Vec::new();
        self.ordered_sources_into(node_id, &mut sources);
        sources
    }

    /// Like [`Graph::ordered_source_nodes_for_node`], reusing `out`
    pub fn ordered_sources_into(&self, node_id: NodeId, out: &mut Vec<SourceRef>) {
        out.clear();
        let Some(node) = self.nodes.get(&node_id) else {
            return;
        };
        for connection in self.connections_for_node(node_id) {
            for local in connection.endpoints {
                if local.node != node_id {
                    continue;
                }
                let Some(port) = node.port(local.port).filter(|p| p.is_input()) else {
                    continue;
                };
                if let Some(remote) = connection.other_end(local.port) {
                    out.push(SourceRef {
                        node: remote.node,
                        order: port.order,
                    });
                }
            }
        }
        out.sort_by_key(|s| s.order);
    }
}

/// Error from a graph lookup or mutation
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(PortId),
}

/// Error when creating a connection
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Port not found on the given node
    #[error("Port not found: {0}")]
    PortNotFound(PortId),

    /// Static ports hold literals and cannot be connected
    #[error("Static port cannot be connected: {0}")]
    StaticPort(PortId),

    /// Both ports face the same way
    #[error("Ports have the same direction")]
    SameDirection,

    /// Input already has a connection
    #[error("Input already connected: {0}")]
    InputOccupied(PortId),
}
