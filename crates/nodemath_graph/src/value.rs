// SPDX-License-Identifier: MIT OR Apache-2.0
//! Values carried by ports and passed between nodes during evaluation.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic for a node whose wired inputs do not match its declared count
pub const NOT_ENOUGH_ARGUMENTS: &str = "Not enough arguments";
/// Diagnostic for operands no signature of the node accepts
pub const INVALID_ARGUMENTS: &str = "Invalid arguments";
/// Diagnostic for an occurrence that would feed a node from itself
pub const CYCLIC_DEPENDENCY: &str = "Cyclic dependency";
/// Diagnostic for occurrences past the evaluator's step budget
pub const STEP_LIMIT_EXCEEDED: &str = "Evaluation step limit exceeded";

/// Shape-tagged data flowing through a port.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Value {
    /// No data
    #[default]
    Empty,
    /// Scalar
    Float(f32),
    /// 2D vector
    Vec2(Vec2),
    /// 3D vector
    Vec3(Vec3),
    /// 4D vector
    Vec4(Vec4),
    /// 3x3 matrix
    Mat3(Mat3),
    /// 4x4 matrix
    Mat4(Mat4),
    /// Text held by a static port, never an operand
    Text(String),
}

impl Value {
    /// Name of the shape, for labels and log output
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Empty => "Empty",
            Self::Float(_) => "Float",
            Self::Vec2(_) => "Vec2",
            Self::Vec3(_) => "Vec3",
            Self::Vec4(_) => "Vec4",
            Self::Mat3(_) => "Mat3",
            Self::Mat4(_) => "Mat4",
            Self::Text(_) => "Text",
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Mat3> for Value {
    fn from(v: Mat3) -> Self {
        Self::Mat3(v)
    }
}

impl From<Mat4> for Value {
    fn from(v: Mat4) -> Self {
        Self::Mat4(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

/// A [`Value`] plus an optional description.
///
/// On an `Empty` value the description is the diagnostic shown in place of a
/// result (see [`TypedValue::not_enough_arguments`] and friends).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypedValue {
    /// The data
    pub value: Value,
    /// Diagnostic or text payload
    pub desc: Option<String>,
}

impl TypedValue {
    /// Wrap a value with no description
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            desc: None,
        }
    }

    /// An empty value carrying `desc`
    pub fn empty_with(desc: impl Into<String>) -> Self {
        Self {
            value: Value::Empty,
            desc: Some(desc.into()),
        }
    }

    /// Result of a node whose connected inputs do not match its declared count
    pub fn not_enough_arguments() -> Self {
        Self::empty_with(NOT_ENOUGH_ARGUMENTS)
    }

    /// Result of a node whose operands match none of its signatures
    pub fn invalid_arguments() -> Self {
        Self::empty_with(INVALID_ARGUMENTS)
    }

    /// Result pushed in place of a node that depends on itself
    pub fn cyclic_dependency() -> Self {
        Self::empty_with(CYCLIC_DEPENDENCY)
    }

    /// Result pushed for occurrences beyond the evaluator's step budget
    pub fn step_limit_exceeded() -> Self {
        Self::empty_with(STEP_LIMIT_EXCEEDED)
    }

    /// Whether this is an empty value carrying a diagnostic
    pub fn is_sentinel(&self) -> bool {
        matches!(self.value, Value::Empty) && self.desc.is_some()
    }

    /// The diagnostic text, if any
    pub fn diagnostic(&self) -> Option<&str> {
        match self.value {
            Value::Empty => self.desc.as_deref(),
            _ => None,
        }
    }
}

impl From<Value> for TypedValue {
    fn from(value: Value) -> Self {
        Self { value, desc: None }
    }
}

fn write_components(f: &mut fmt::Formatter<'_>, components: &[f32]) -> fmt::Result {
    f.write_str("[")?;
    for (i, c) in components.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{c:.5}")?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Float(v) => write!(f, "{v:.5}"),
            Self::Text(text) => f.write_str(text),
            Self::Vec2(v) => write_components(f, &v.to_array()),
            Self::Vec3(v) => write_components(f, &v.to_array()),
            Self::Vec4(v) => write_components(f, &v.to_array()),
            // Row by row, the way matrices are written on paper.
            Self::Mat3(m) => {
                f.write_str("[")?;
                for i in 0..3 {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_components(f, &m.row(i).to_array())?;
                }
                f.write_str("]")
            }
            Self::Mat4(m) => {
                f.write_str("[")?;
                for i in 0..4 {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_components(f, &m.row(i).to_array())?;
                }
                f.write_str("]")
            }
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.desc) {
            (Value::Empty, Some(desc)) => f.write_str(desc),
            (value, _) => write!(f, "{value}"),
        }
    }
}
