// SPDX-License-Identifier: MIT OR Apache-2.0
//! Identifiers shared by nodes, ports and connections.
//!
//! A graph hands out every identifier from one counter, so a `NodeId`, a
//! `PortId` and a `ConnectionId` never collide even though they are distinct
//! types. Identifiers are never reused after deletion.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! graph_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            Default,
            Serialize,
            Deserialize,
        )]
        pub struct $name(pub u64);

        impl $name {
            /// The identifier no live object ever carries
            pub const INVALID: Self = Self(0);

            /// Whether this identifier could refer to a live object
            pub fn is_valid(self) -> bool {
                self.0 != 0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

graph_id!(
    /// Unique identifier for a node
    NodeId
);
graph_id!(
    /// Unique identifier for a port
    PortId
);
graph_id!(
    /// Unique identifier for a connection
    ConnectionId
);

/// Monotonic identifier source owned by a graph.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Create an allocator whose first identifier is `1`
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn bump(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Allocate a node identifier
    pub fn node(&mut self) -> NodeId {
        NodeId(self.bump())
    }

    /// Allocate a port identifier
    pub fn port(&mut self) -> PortId {
        PortId(self.bump())
    }

    /// Allocate a connection identifier
    pub fn connection(&mut self) -> ConnectionId {
        ConnectionId(self.bump())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
