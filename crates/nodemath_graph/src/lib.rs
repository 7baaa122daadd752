// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph for scalar, vector and matrix math expressions.
//!
//! A [`Graph`] holds nodes with ordered ports, wired output to input. An
//! [`Evaluator`] recomputes the whole graph in one pass and caches every
//! node's result on its output port.
//!
//! ## Architecture
//!
//! - Nodes, ports and connections share one ID space per graph
//! - Each [`NodeKind`] declares its port layout and its evaluation function
//! - Evaluation linearizes dependencies depth-first and replays them on an
//!   operand stack
//! - Kinds pick the first operand signature that matches, and anything else
//!   yields an "Invalid arguments" value

pub mod config;
pub mod connection;
pub mod dispatch;
pub mod evaluation;
pub mod graph;
pub mod id;
pub mod kinds;
pub mod node;
pub mod port;
pub mod value;

pub use config::{ConfigError, EvalConfig};
pub use connection::{Connection, Endpoint};
pub use evaluation::{EvalStats, Evaluator};
pub use graph::{ConnectionError, Graph, GraphError, SourceRef};
pub use id::{ConnectionId, NodeId, PortId};
pub use kinds::NodeKind;
pub use node::{Node, NodeCatalog, NodeCategory};
pub use port::{Port, PortDirection};
pub use value::{TypedValue, Value};
