// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector geometry nodes.

use crate::dispatch::{Dispatch, OperandStack};
use crate::node::Node;
use glam::{Vec2, Vec3, Vec4};

pub(super) fn eval_length(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(Vec2::length)
        .op1(Vec3::length)
        .op1(Vec4::length)
        .finish();
}

pub(super) fn eval_distance(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(Vec2::distance)
        .op2(Vec3::distance)
        .op2(Vec4::distance)
        .finish();
}

pub(super) fn eval_dot(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(Vec2::dot)
        .op2(Vec3::dot)
        .op2(Vec4::dot)
        .finish();
}

pub(super) fn eval_cross(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack).op2(Vec3::cross).finish();
}

/// A zero-length input normalizes to NaN components.
pub(super) fn eval_normalize(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Vec2| a / a.length())
        .op1(|a: Vec3| a / a.length())
        .op1(|a: Vec4| a / a.length())
        .finish();
}
