// SPDX-License-Identifier: MIT OR Apache-2.0
//! Arithmetic nodes: plus, minus, mul, div, negate.

use crate::dispatch::{Dispatch, OperandStack};
use crate::node::Node;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

pub(super) fn eval_plus(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(|a: f32, b: f32| a + b)
        .op2(|a: Vec2, b: Vec2| a + b)
        .op2(|a: Vec3, b: Vec3| a + b)
        .op2(|a: Vec4, b: Vec4| a + b)
        .finish();
}

pub(super) fn eval_minus(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(|a: f32, b: f32| a - b)
        .op2(|a: Vec2, b: Vec2| a - b)
        .op2(|a: Vec3, b: Vec3| a - b)
        .op2(|a: Vec4, b: Vec4| a - b)
        .finish();
}

/// Vectors multiply elementwise or scale by a float on either side. A vector
/// on the left of a matrix is treated as a row vector.
pub(super) fn eval_mul(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(|a: f32, b: f32| a * b)
        .op2(|a: Vec2, b: Vec2| a * b)
        .op2(|a: Vec2, b: f32| a * b)
        .op2(|a: f32, b: Vec2| a * b)
        .op2(|a: Vec3, b: Vec3| a * b)
        .op2(|a: Vec3, b: f32| a * b)
        .op2(|a: f32, b: Vec3| a * b)
        .op2(|a: Vec4, b: Vec4| a * b)
        .op2(|a: Vec4, b: f32| a * b)
        .op2(|a: f32, b: Vec4| a * b)
        .op2(|a: Mat3, b: Mat3| a * b)
        .op2(|a: Mat3, b: f32| a * b)
        .op2(|a: f32, b: Mat3| b * a)
        .op2(|a: Mat3, b: Vec3| a * b)
        .op2(|a: Vec3, b: Mat3| b.transpose() * a)
        .op2(|a: Mat4, b: Mat4| a * b)
        .op2(|a: Mat4, b: f32| a * b)
        .op2(|a: f32, b: Mat4| b * a)
        .op2(|a: Mat4, b: Vec4| a * b)
        .op2(|a: Vec4, b: Mat4| b.transpose() * a)
        .finish();
}

/// No matrix division.
pub(super) fn eval_div(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op2(|a: f32, b: f32| a / b)
        .op2(|a: Vec2, b: Vec2| a / b)
        .op2(|a: Vec3, b: Vec3| a / b)
        .op2(|a: Vec4, b: Vec4| a / b)
        .finish();
}

pub(super) fn eval_negate(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: f32| -a)
        .op1(|a: Vec2| -a)
        .op1(|a: Vec3| -a)
        .op1(|a: Vec4| -a)
        .finish();
}
