// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shape-based dispatch of node operations over the operand stack.
//!
//! Every evaluation function receives its operands on a shared stack, the
//! right-most argument on top. A node kind supports a fixed list of concrete
//! signatures (for example `f32 + f32`, `Vec3 + Vec3`); [`Dispatch`] tries
//! them in order and runs the first one whose shapes all match. When none
//! match, the operands are still consumed and an "Invalid arguments" value is
//! produced, so the stack stays balanced no matter what flows in.

use crate::node::Node;
use crate::value::{TypedValue, Value};
use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Stack through which operands and results flow during a pass
#[derive(Debug, Default, Clone)]
pub struct OperandStack {
    values: Vec<TypedValue>,
}

impl OperandStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a value
    pub fn push(&mut self, value: TypedValue) {
        self.values.push(value);
    }

    /// Pop the top value
    pub fn pop(&mut self) -> Option<TypedValue> {
        self.values.pop()
    }

    /// Discard the top `n` values
    pub fn pop_n(&mut self, n: usize) {
        debug_assert!(n <= self.values.len(), "operand stack underflow");
        let keep = self.values.len().saturating_sub(n);
        self.values.truncate(keep);
    }

    /// Value `depth` entries below the top (0 is the top)
    pub fn peek(&self, depth: usize) -> Option<&TypedValue> {
        let index = self.values.len().checked_sub(depth + 1)?;
        self.values.get(index)
    }

    /// The value at `depth` if it has shape `T`
    pub fn operand<T: Operand>(&self, depth: usize) -> Option<T> {
        self.peek(depth).and_then(|v| T::from_value(&v.value))
    }

    /// Number of values on the stack
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every value, keeping the allocation
    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// A concrete operand shape a signature can ask for
pub trait Operand: Sized + Copy {
    /// Extract `Self` if `value` has this shape
    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_operand {
    ($ty:ty, $variant:ident) => {
        impl Operand for $ty {
            fn from_value(value: &Value) -> Option<Self> {
                match value {
                    Value::$variant(v) => Some(*v),
                    _ => None,
                }
            }
        }
    };
}

impl_operand!(f32, Float);
impl_operand!(Vec2, Vec2);
impl_operand!(Vec3, Vec3);
impl_operand!(Vec4, Vec4);
impl_operand!(Mat3, Mat3);
impl_operand!(Mat4, Mat4);

/// Push `result` and cache it on the node's output port
pub fn commit(node: &mut Node, stack: &mut OperandStack, result: TypedValue) {
    node.set_output(result.clone());
    stack.push(result);
}

/// Consume the node's declared operands and produce "Invalid arguments"
pub fn reject(node: &mut Node, stack: &mut OperandStack) {
    let top = stack.peek(0).map_or("none", |v| v.value.shape_name());
    tracing::trace!(node = %node.id, kind = node.kind.name(), top, "no signature matched");
    stack.pop_n(node.required_inputs());
    commit(node, stack, TypedValue::invalid_arguments());
}

/// Run `f` if the top operand has shape `A`
pub fn try_op1<A, R>(node: &mut Node, stack: &mut OperandStack, f: impl FnOnce(A) -> R) -> bool
where
    A: Operand,
    R: Into<Value>,
{
    let Some(a) = stack.operand::<A>(0) else {
        return false;
    };
    stack.pop_n(1);
    commit(node, stack, TypedValue::new(f(a)));
    true
}

/// Run `f` if the top two operands have shapes `A`, `B` (B on top)
pub fn try_op2<A, B, R>(
    node: &mut Node,
    stack: &mut OperandStack,
    f: impl FnOnce(A, B) -> R,
) -> bool
where
    A: Operand,
    B: Operand,
    R: Into<Value>,
{
    let (Some(a), Some(b)) = (stack.operand::<A>(1), stack.operand::<B>(0)) else {
        return false;
    };
    stack.pop_n(2);
    commit(node, stack, TypedValue::new(f(a, b)));
    true
}

/// Run `f` if the top three operands have shapes `A`, `B`, `C`
pub fn try_op3<A, B, C, R>(
    node: &mut Node,
    stack: &mut OperandStack,
    f: impl FnOnce(A, B, C) -> R,
) -> bool
where
    A: Operand,
    B: Operand,
    C: Operand,
    R: Into<Value>,
{
    let (Some(a), Some(b), Some(c)) = (
        stack.operand::<A>(2),
        stack.operand::<B>(1),
        stack.operand::<C>(0),
    ) else {
        return false;
    };
    stack.pop_n(3);
    commit(node, stack, TypedValue::new(f(a, b, c)));
    true
}

/// Run `f` if the top four operands have shapes `A`, `B`, `C`, `D`
pub fn try_op4<A, B, C, D, R>(
    node: &mut Node,
    stack: &mut OperandStack,
    f: impl FnOnce(A, B, C, D) -> R,
) -> bool
where
    A: Operand,
    B: Operand,
    C: Operand,
    D: Operand,
    R: Into<Value>,
{
    let (Some(a), Some(b), Some(c), Some(d)) = (
        stack.operand::<A>(3),
        stack.operand::<B>(2),
        stack.operand::<C>(1),
        stack.operand::<D>(0),
    ) else {
        return false;
    };
    stack.pop_n(4);
    commit(node, stack, TypedValue::new(f(a, b, c, d)));
    true
}

/// Ordered list of signatures for one evaluation.
///
/// ```ignore
/// Dispatch::new(node, stack)
///     .op2(|a: f32, b: f32| a + b)
///     .op2(|a: Vec3, b: Vec3| a + b)
///     .finish();
/// ```
///
/// Signatures are tried top to bottom; once one matches the rest are skipped.
pub struct Dispatch<'a> {
    node: &'a mut Node,
    stack: &'a mut OperandStack,
    matched: bool,
}

impl<'a> Dispatch<'a> {
    /// Start dispatching for `node`
    pub fn new(node: &'a mut Node, stack: &'a mut OperandStack) -> Self {
        Self {
            node,
            stack,
            matched: false,
        }
    }

    /// Try a one-operand signature
    pub fn op1<A: Operand, R: Into<Value>>(mut self, f: impl FnOnce(A) -> R) -> Self {
        if !self.matched {
            self.matched = try_op1(self.node, self.stack, f);
        }
        self
    }

    /// Try a two-operand signature
    pub fn op2<A: Operand, B: Operand, R: Into<Value>>(
        mut self,
        f: impl FnOnce(A, B) -> R,
    ) -> Self {
        if !self.matched {
            self.matched = try_op2(self.node, self.stack, f);
        }
        self
    }

    /// Try a three-operand signature
    pub fn op3<A: Operand, B: Operand, C: Operand, R: Into<Value>>(
        mut self,
        f: impl FnOnce(A, B, C) -> R,
    ) -> Self {
        if !self.matched {
            self.matched = try_op3(self.node, self.stack, f);
        }
        self
    }

    /// Try a four-operand signature
    pub fn op4<A: Operand, B: Operand, C: Operand, D: Operand, R: Into<Value>>(
        mut self,
        f: impl FnOnce(A, B, C, D) -> R,
    ) -> Self {
        if !self.matched {
            self.matched = try_op4(self.node, self.stack, f);
        }
        self
    }

    /// Fall back to "Invalid arguments" if nothing matched; returns whether
    /// a signature ran
    pub fn finish(self) -> bool {
        if !self.matched {
            reject(self.node, self.stack);
        }
        self.matched
    }
}
