// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs, outputs and static values.

use crate::id::PortId;
use crate::value::TypedValue;
use serde::{Deserialize, Serialize};

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Operand slot, fed by at most one connection
    Input,
    /// Result slot, may feed any number of inputs
    Output,
    /// User-edited literal, never connected
    Static,
}

impl PortDirection {
    /// Whether a port in this direction may be an endpoint of a connection
    pub fn is_connectable(self) -> bool {
        !matches!(self, Self::Static)
    }
}

/// A port on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Port direction
    pub direction: PortDirection,
    /// Argument position among the node's inputs
    pub order: i32,
    /// Display label
    pub label: String,
    /// Literal value for static ports, last result for output ports
    pub value: TypedValue,
}

impl Port {
    /// Create a new unlabeled port at order 0 holding an empty value
    pub fn new(id: PortId, direction: PortDirection) -> Self {
        Self {
            id,
            direction,
            order: 0,
            label: String::new(),
            value: TypedValue::default(),
        }
    }

    /// Set the argument position
    pub fn with_order(&mut self, order: i32) -> &mut Self {
        self.order = order;
        self
    }

    /// Set the display label
    pub fn with_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Set the held value
    pub fn with_value(&mut self, value: impl Into<TypedValue>) -> &mut Self {
        self.value = value.into();
        self
    }

    /// Check if a connection to another port is valid, ignoring occupancy
    pub fn can_connect(&self, other: &Port) -> bool {
        self.direction.is_connectable()
            && other.direction.is_connectable()
            && self.direction != other.direction
    }

    /// Whether this is an input port
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }
}
