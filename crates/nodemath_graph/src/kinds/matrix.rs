// SPDX-License-Identifier: MIT OR Apache-2.0
//! Matrix nodes.

use crate::dispatch::{Dispatch, OperandStack};
use crate::node::Node;
use glam::{Mat3, Mat4};

pub(super) fn eval_transpose(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|m: Mat3| m.transpose())
        .op1(|m: Mat4| m.transpose())
        .finish();
}

/// Singular matrices produce non-finite components rather than an error.
pub(super) fn eval_inverse(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|m: Mat3| m.inverse())
        .op1(|m: Mat4| m.inverse())
        .finish();
}

pub(super) fn eval_determinant(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|m: Mat3| m.determinant())
        .op1(|m: Mat4| m.determinant())
        .finish();
}
