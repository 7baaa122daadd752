// SPDX-License-Identifier: MIT OR Apache-2.0
//! Building vectors from floats and swizzling their components.

use crate::dispatch::{commit, reject, Dispatch, OperandStack};
use crate::node::Node;
use crate::value::{TypedValue, Value};
use glam::{Vec2, Vec3, Vec4};

pub(super) fn eval_vec2_combine(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack).op2(Vec2::new).finish();
}

pub(super) fn eval_vec3_combine(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack).op3(Vec3::new).finish();
}

pub(super) fn eval_vec4_combine(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack).op4(Vec4::new).finish();
}

/// Component index named by a swizzle letter.
///
/// `x r s` select 0, `y g t` select 1, `z b` select 2, `w a` select 3.
pub fn swizzle_index(letter: char) -> Option<usize> {
    match letter {
        'x' | 'r' | 's' => Some(0),
        'y' | 'g' | 't' => Some(1),
        'z' | 'b' => Some(2),
        'w' | 'a' => Some(3),
        _ => None,
    }
}

/// Apply a 1 to 4 letter swizzle `pattern` to a vector.
///
/// The result has one component per letter (a single letter yields a
/// float). Letters naming a component the source does not have read `0.0`.
/// Returns `None` for non-vector sources and malformed patterns.
pub fn swizzle(source: &Value, pattern: &str) -> Option<Value> {
    let (components, arity) = match source {
        Value::Vec2(v) => (Vec4::new(v.x, v.y, 0.0, 0.0), 2),
        Value::Vec3(v) => (v.extend(0.0), 3),
        Value::Vec4(v) => (*v, 4),
        _ => return None,
    };

    let mut out = [0.0_f32; 4];
    let mut len = 0;
    for letter in pattern.chars() {
        let slot = out.get_mut(len)?;
        let index = swizzle_index(letter)?;
        *slot = if index < arity { components[index] } else { 0.0 };
        len += 1;
    }

    match len {
        1 => Some(Value::Float(out[0])),
        2 => Some(Value::Vec2(Vec2::new(out[0], out[1]))),
        3 => Some(Value::Vec3(Vec3::new(out[0], out[1], out[2]))),
        4 => Some(Value::Vec4(Vec4::from_array(out))),
        _ => None,
    }
}

/// The pattern lives in the static port's text.
pub(super) fn eval_swizzle(node: &mut Node, stack: &mut OperandStack) {
    let pattern = match node.static_port().map(|p| &p.value.value) {
        Some(Value::Text(text)) => text.as_str(),
        _ => "",
    };
    let result = stack
        .peek(0)
        .and_then(|operand| swizzle(&operand.value, pattern));

    match result {
        Some(value) => {
            stack.pop_n(1);
            commit(node, stack, TypedValue::new(value));
        }
        None => reject(node, stack),
    }
}
