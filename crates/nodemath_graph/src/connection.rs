// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.
//!
//! Connections are stored undirected: which endpoint is the input is decided
//! by the direction of the ports, not by the endpoint's position.

use crate::id::{ConnectionId, NodeId, PortId};
use serde::{Deserialize, Serialize};

/// One side of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    /// Node owning the port
    pub node: NodeId,
    /// Port on that node
    pub port: PortId,
}

impl Endpoint {
    /// Create an endpoint
    pub fn new(node: NodeId, port: PortId) -> Self {
        Self { node, port }
    }
}

/// A connection between two ports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Both endpoints, in the order they were given when connecting
    pub endpoints: [Endpoint; 2],
}

impl Connection {
    /// Create a new connection
    pub fn new(id: ConnectionId, a: Endpoint, b: Endpoint) -> Self {
        Self {
            id,
            endpoints: [a, b],
        }
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.endpoints.iter().any(|e| e.node == node_id)
    }

    /// Check if this connection involves a specific port
    pub fn involves_port(&self, port_id: PortId) -> bool {
        self.endpoints.iter().any(|e| e.port == port_id)
    }

    /// The endpoint opposite `port_id`, if `port_id` is one of ours
    pub fn other_end(&self, port_id: PortId) -> Option<Endpoint> {
        let [a, b] = self.endpoints;
        if a.port == port_id {
            Some(b)
        } else if b.port == port_id {
            Some(a)
        } else {
            None
        }
    }
}
