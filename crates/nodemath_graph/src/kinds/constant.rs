// SPDX-License-Identifier: MIT OR Apache-2.0
//! Literal and placeholder nodes.

use crate::dispatch::{commit, OperandStack};
use crate::node::Node;
use crate::value::TypedValue;

/// Push the static port's literal verbatim
pub(super) fn eval_constant(node: &mut Node, stack: &mut OperandStack) {
    let literal = node
        .static_port()
        .map(|p| p.value.clone())
        .unwrap_or_default();
    commit(node, stack, literal);
}

/// Consume whatever was declared and produce an empty value
pub(super) fn eval_inert(node: &mut Node, stack: &mut OperandStack) {
    stack.pop_n(node.required_inputs());
    commit(node, stack, TypedValue::default());
}
