// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shape conversions.
//!
//! Vectors truncate or zero-pad trailing components; a float is broadcast to
//! every component. Matrices convert between 3x3 and 4x4 by taking the
//! upper-left block or by padding with zeros. The padded corner is zero too,
//! so a Mat3 widened to Mat4 is not an affine transform.

use crate::dispatch::{Dispatch, OperandStack};
use crate::node::Node;
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

pub(super) fn eval_vec2_cast(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Vec2| a)
        .op1(Vec2::splat)
        .op1(|a: Vec3| a.truncate())
        .op1(|a: Vec4| Vec2::new(a.x, a.y))
        .finish();
}

pub(super) fn eval_vec3_cast(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Vec3| a)
        .op1(Vec3::splat)
        .op1(|a: Vec2| a.extend(0.0))
        .op1(|a: Vec4| a.truncate())
        .finish();
}

pub(super) fn eval_vec4_cast(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Vec4| a)
        .op1(Vec4::splat)
        .op1(|a: Vec2| Vec4::new(a.x, a.y, 0.0, 0.0))
        .op1(|a: Vec3| a.extend(0.0))
        .finish();
}

pub(super) fn eval_mat3_cast(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Mat3| a)
        .op1(Mat3::from_mat4)
        .finish();
}

pub(super) fn eval_mat4_cast(node: &mut Node, stack: &mut OperandStack) {
    Dispatch::new(node, stack)
        .op1(|a: Mat4| a)
        .op1(|a: Mat3| {
            Mat4::from_cols(
                a.x_axis.extend(0.0),
                a.y_axis.extend(0.0),
                a.z_axis.extend(0.0),
                Vec4::ZERO,
            )
        })
        .finish();
}

#[cfg(test)]
mod tests {
    use super::super::testing::{run, value};
    use super::super::NodeKind;
    use crate::value::{TypedValue, Value};
    use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

    #[test]
    fn test_vector_casts() {
        let v4 = Vec4::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            value(NodeKind::Vec2Cast, &[Value::Vec4(v4)]),
            Value::Vec2(Vec2::new(1.0, 2.0))
        );
        assert_eq!(
            value(NodeKind::Vec3Cast, &[Value::Vec4(v4)]),
            Value::Vec3(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            value(NodeKind::Vec4Cast, &[Value::Vec2(Vec2::new(1.0, 2.0))]),
            Value::Vec4(Vec4::new(1.0, 2.0, 0.0, 0.0))
        );
        assert_eq!(
            value(NodeKind::Vec3Cast, &[Value::Vec2(Vec2::new(1.0, 2.0))]),
            Value::Vec3(Vec3::new(1.0, 2.0, 0.0))
        );
        assert_eq!(value(NodeKind::Vec4Cast, &[Value::Vec4(v4)]), Value::Vec4(v4));
    }

    #[test]
    fn test_scalar_broadcast() {
        assert_eq!(
            value(NodeKind::Vec2Cast, &[Value::Float(3.0)]),
            Value::Vec2(Vec2::splat(3.0))
        );
        assert_eq!(
            value(NodeKind::Vec4Cast, &[Value::Float(-1.0)]),
            Value::Vec4(Vec4::splat(-1.0))
        );
    }

    #[test]
    fn test_vector_cast_rejects_matrices() {
        assert_eq!(
            run(NodeKind::Vec3Cast, &[Value::Mat3(Mat3::IDENTITY)]),
            TypedValue::invalid_arguments()
        );
    }

    #[test]
    fn test_mat4_to_mat3_takes_upper_left() {
        let m = Mat4::from_cols_array(&[
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ]);
        assert_eq!(
            value(NodeKind::Mat3Cast, &[Value::Mat4(m)]),
            Value::Mat3(Mat3::from_cols_array(&[1.0, 2.0, 3.0, 5.0, 6.0, 7.0, 9.0, 10.0, 11.0]))
        );
    }

    /// Widening pads with zeros, not with identity: the bottom-right corner
    /// of the result is 0.
    #[test]
    fn test_mat3_to_mat4_zero_pads() {
        let widened = value(NodeKind::Mat4Cast, &[Value::Mat3(Mat3::IDENTITY)]);
        let Value::Mat4(m) = widened else {
            panic!("expected Mat4, got {widened:?}");
        };
        assert_eq!(m.w_axis, Vec4::ZERO);
        assert_eq!(m.row(3), Vec4::ZERO);
        assert_ne!(m, Mat4::IDENTITY);
        assert_eq!(Mat3::from_mat4(m), Mat3::IDENTITY);
    }
}
