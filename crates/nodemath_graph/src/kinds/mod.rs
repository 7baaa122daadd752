// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node kinds: port schemas and evaluation functions.
//!
//! A kind is a closed tag. Everything the graph and the evaluator need to know
//! about it (how many operands it takes, which ports it is built with, what
//! it computes) is looked up from the tag here.

mod arith;
mod cast;
mod compose;
mod constant;
mod matrix;
mod vector;

use crate::dispatch::OperandStack;
use crate::node::{Node, NodeCategory};
use crate::port::PortDirection;
use crate::value::TypedValue;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

pub use compose::{swizzle, swizzle_index};

/// Kind of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Placeholder for nodes built by hand; evaluates to an empty value
    Invalid,

    /// Float literal
    Float,
    /// Vec2 literal
    Vec2,
    /// Vec3 literal
    Vec3,
    /// Vec4 literal
    Vec4,
    /// Mat3 literal
    Mat3,
    /// Mat4 literal
    Mat4,

    /// Addition
    Plus,
    /// Subtraction
    Minus,
    /// Multiplication, including matrix products
    Mul,
    /// Division
    Div,
    /// Sign flip
    Negate,

    /// Convert to Vec2
    Vec2Cast,
    /// Convert to Vec3
    Vec3Cast,
    /// Convert to Vec4
    Vec4Cast,
    /// Convert to Mat3
    Mat3Cast,
    /// Convert to Mat4
    Mat4Cast,

    /// Vector length
    Length,
    /// Distance between two points
    Distance,
    /// Dot product
    Dot,
    /// Cross product
    Cross,
    /// Unit vector
    Normalize,

    /// Matrix transpose
    Transpose,
    /// Matrix inverse
    Inverse,
    /// Matrix determinant
    Determinant,

    /// Two floats into a Vec2
    Vec2Combine,
    /// Three floats into a Vec3
    Vec3Combine,
    /// Four floats into a Vec4
    Vec4Combine,
    /// Select and reorder vector components
    Swizzle,
}

/// One entry of a kind's port layout
#[derive(Debug, Clone)]
pub struct PortSpec {
    /// Direction of the port
    pub direction: PortDirection,
    /// Display label
    pub label: &'static str,
    /// Initial value
    pub default: TypedValue,
}

impl PortSpec {
    fn input(label: &'static str) -> Self {
        Self {
            direction: PortDirection::Input,
            label,
            default: TypedValue::default(),
        }
    }

    fn literal(label: &'static str, default: TypedValue) -> Self {
        Self {
            direction: PortDirection::Static,
            label,
            default,
        }
    }

    fn result() -> Self {
        Self {
            direction: PortDirection::Output,
            label: "Result",
            default: TypedValue::default(),
        }
    }
}

impl NodeKind {
    /// Every constructible kind, in menu order
    pub const ALL: &'static [NodeKind] = &[
        Self::Float,
        Self::Vec2,
        Self::Vec3,
        Self::Vec4,
        Self::Mat3,
        Self::Mat4,
        Self::Plus,
        Self::Minus,
        Self::Mul,
        Self::Div,
        Self::Negate,
        Self::Vec2Cast,
        Self::Vec3Cast,
        Self::Vec4Cast,
        Self::Mat3Cast,
        Self::Mat4Cast,
        Self::Length,
        Self::Distance,
        Self::Dot,
        Self::Cross,
        Self::Normalize,
        Self::Transpose,
        Self::Inverse,
        Self::Determinant,
        Self::Vec2Combine,
        Self::Vec3Combine,
        Self::Vec4Combine,
        Self::Swizzle,
    ];

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Invalid => "Invalid",
            Self::Float => "Float",
            Self::Vec2 => "Vec2",
            Self::Vec3 => "Vec3",
            Self::Vec4 => "Vec4",
            Self::Mat3 => "Mat3",
            Self::Mat4 => "Mat4",
            Self::Plus => "Plus",
            Self::Minus => "Minus",
            Self::Mul => "Mul",
            Self::Div => "Div",
            Self::Negate => "Negate",
            Self::Vec2Cast => "To Vec2",
            Self::Vec3Cast => "To Vec3",
            Self::Vec4Cast => "To Vec4",
            Self::Mat3Cast => "To Mat3",
            Self::Mat4Cast => "To Mat4",
            Self::Length => "Length",
            Self::Distance => "Distance",
            Self::Dot => "Dot",
            Self::Cross => "Cross",
            Self::Normalize => "Normalize",
            Self::Transpose => "Transpose",
            Self::Inverse => "Inverse",
            Self::Determinant => "Determinant",
            Self::Vec2Combine => "Combine Vec2",
            Self::Vec3Combine => "Combine Vec3",
            Self::Vec4Combine => "Combine Vec4",
            Self::Swizzle => "Swizzle",
        }
    }

    /// Menu category
    pub fn category(self) -> NodeCategory {
        match self {
            Self::Invalid
            | Self::Float
            | Self::Vec2
            | Self::Vec3
            | Self::Vec4
            | Self::Mat3
            | Self::Mat4 => NodeCategory::Constants,
            Self::Plus | Self::Minus | Self::Mul | Self::Div | Self::Negate => {
                NodeCategory::Arithmetic
            }
            Self::Vec2Cast | Self::Vec3Cast | Self::Vec4Cast | Self::Mat3Cast | Self::Mat4Cast => {
                NodeCategory::Casts
            }
            Self::Length | Self::Distance | Self::Dot | Self::Cross | Self::Normalize => {
                NodeCategory::Vector
            }
            Self::Transpose | Self::Inverse | Self::Determinant => NodeCategory::Matrix,
            Self::Vec2Combine | Self::Vec3Combine | Self::Vec4Combine | Self::Swizzle => {
                NodeCategory::Compose
            }
        }
    }

    /// Number of input connections the evaluation function consumes
    pub fn input_count(self) -> usize {
        match self {
            Self::Invalid
            | Self::Float
            | Self::Vec2
            | Self::Vec3
            | Self::Vec4
            | Self::Mat3
            | Self::Mat4 => 0,
            Self::Negate
            | Self::Vec2Cast
            | Self::Vec3Cast
            | Self::Vec4Cast
            | Self::Mat3Cast
            | Self::Mat4Cast
            | Self::Length
            | Self::Normalize
            | Self::Transpose
            | Self::Inverse
            | Self::Determinant
            | Self::Swizzle => 1,
            Self::Plus
            | Self::Minus
            | Self::Mul
            | Self::Div
            | Self::Distance
            | Self::Dot
            | Self::Cross
            | Self::Vec2Combine => 2,
            Self::Vec3Combine => 3,
            Self::Vec4Combine => 4,
        }
    }

    /// Ports in the order they are added: inputs, then literals, then the result
    pub fn schema(self) -> Vec<PortSpec> {
        let literal = |default: TypedValue| {
            vec![PortSpec::literal("Value", default), PortSpec::result()]
        };
        let unary = || vec![PortSpec::input("Value"), PortSpec::result()];
        let binary = |lhs, rhs| {
            vec![PortSpec::input(lhs), PortSpec::input(rhs), PortSpec::result()]
        };

        match self {
            Self::Invalid => Vec::new(),
            Self::Float => literal(TypedValue::new(0.0)),
            Self::Vec2 => literal(TypedValue::new(Vec2::ZERO)),
            Self::Vec3 => literal(TypedValue::new(Vec3::ZERO)),
            Self::Vec4 => literal(TypedValue::new(Vec4::ZERO)),
            Self::Mat3 => literal(TypedValue::new(Mat3::IDENTITY)),
            Self::Mat4 => literal(TypedValue::new(Mat4::IDENTITY)),
            Self::Plus | Self::Minus | Self::Mul | Self::Div => binary("LHS", "RHS"),
            Self::Distance | Self::Dot | Self::Cross => binary("A", "B"),
            Self::Negate
            | Self::Vec2Cast
            | Self::Vec3Cast
            | Self::Vec4Cast
            | Self::Mat3Cast
            | Self::Mat4Cast
            | Self::Length
            | Self::Normalize
            | Self::Transpose
            | Self::Inverse
            | Self::Determinant => unary(),
            Self::Vec2Combine | Self::Vec3Combine | Self::Vec4Combine => {
                let mut ports: Vec<PortSpec> = ["X", "Y", "Z", "W"]
                    .into_iter()
                    .take(self.input_count())
                    .map(PortSpec::input)
                    .collect();
                ports.push(PortSpec::result());
                ports
            }
            Self::Swizzle => vec![
                PortSpec::input("Vector"),
                PortSpec::literal("Pattern", TypedValue::new("xyzw")),
                PortSpec::result(),
            ],
        }
    }

    /// Evaluate `node` against the operand stack.
    ///
    /// Pops exactly `node.required_inputs()` operands, pushes exactly one
    /// result and caches it on the node's output port.
    pub fn evaluate(self, node: &mut Node, stack: &mut OperandStack) {
        match self {
            Self::Invalid => constant::eval_inert(node, stack),
            Self::Float | Self::Vec2 | Self::Vec3 | Self::Vec4 | Self::Mat3 | Self::Mat4 => {
                constant::eval_constant(node, stack);
            }
            Self::Plus => arith::eval_plus(node, stack),
            Self::Minus => arith::eval_minus(node, stack),
            Self::Mul => arith::eval_mul(node, stack),
            Self::Div => arith::eval_div(node, stack),
            Self::Negate => arith::eval_negate(node, stack),
            Self::Vec2Cast => cast::eval_vec2_cast(node, stack),
            Self::Vec3Cast => cast::eval_vec3_cast(node, stack),
            Self::Vec4Cast => cast::eval_vec4_cast(node, stack),
            Self::Mat3Cast => cast::eval_mat3_cast(node, stack),
            Self::Mat4Cast => cast::eval_mat4_cast(node, stack),
            Self::Length => vector::eval_length(node, stack),
            Self::Distance => vector::eval_distance(node, stack),
            Self::Dot => vector::eval_dot(node, stack),
            Self::Cross => vector::eval_cross(node, stack),
            Self::Normalize => vector::eval_normalize(node, stack),
            Self::Transpose => matrix::eval_transpose(node, stack),
            Self::Inverse => matrix::eval_inverse(node, stack),
            Self::Determinant => matrix::eval_determinant(node, stack),
            Self::Vec2Combine => compose::eval_vec2_combine(node, stack),
            Self::Vec3Combine => compose::eval_vec3_combine(node, stack),
            Self::Vec4Combine => compose::eval_vec4_combine(node, stack),
            Self::Swizzle => compose::eval_swizzle(node, stack),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::run;
    use super::*;
    use crate::value::Value;

    #[test]
    fn test_schema_matches_input_count() {
        for kind in NodeKind::ALL.iter().copied().chain([NodeKind::Invalid]) {
            let inputs = kind
                .schema()
                .iter()
                .filter(|p| p.direction == PortDirection::Input)
                .count();
            assert_eq!(inputs, kind.input_count(), "{kind:?}");
        }
    }

    #[test]
    fn test_every_kind_keeps_the_stack_balanced() {
        let shapes = [
            Value::Empty,
            Value::Float(1.5),
            Value::Vec2(Vec2::new(1.0, 2.0)),
            Value::Vec3(Vec3::new(1.0, 2.0, 3.0)),
            Value::Vec4(Vec4::new(1.0, 2.0, 3.0, 4.0)),
            Value::Mat3(Mat3::IDENTITY),
            Value::Mat4(Mat4::IDENTITY),
            Value::Text("x".to_owned()),
        ];
        for kind in NodeKind::ALL.iter().copied() {
            // Homogeneous operands plus a mixed set per arity.
            for shape in &shapes {
                let operands = vec![shape.clone(); kind.input_count()];
                run(kind, &operands);
            }
            let mixed: Vec<Value> = shapes
                .iter()
                .cloned()
                .cycle()
                .skip(2)
                .take(kind.input_count())
                .collect();
            run(kind, &mixed);
        }
    }

    #[test]
    fn test_invalid_kind_is_inert() {
        let mut node = Node::new(crate::id::NodeId(1), NodeKind::Invalid);
        let mut stack = OperandStack::new();
        NodeKind::Invalid.evaluate(&mut node, &mut stack);
        assert_eq!(stack.pop(), Some(TypedValue::default()));
        assert!(stack.is_empty());
    }
}
