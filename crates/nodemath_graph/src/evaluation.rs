// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation.
//!
//! One call to [`Evaluator::update`] recomputes every node exactly once. For
//! each node not yet evaluated in the pass, the evaluator
//!
//! 1. walks its dependencies depth-first, recording one step per occurrence
//!    (a node reachable along two paths is recorded twice, because each
//!    consumer needs its own copy of the operand), then
//! 2. replays the steps backwards as a stack machine: dependencies push their
//!    results, consumers pop them.
//!
//! A node met again later in the same pass pushes its cached output instead of
//! running a second time, and a walk stops at nodes earlier roots already
//! evaluated. Nodes wired with fewer inputs than they declare
//! produce a "Not enough arguments" value, and a dependency that would loop
//! back to one of its own consumers produces a "Cyclic dependency" value, so
//! a broken subgraph only spoils its own results.

use crate::config::EvalConfig;
use crate::dispatch::{commit, OperandStack};
use crate::graph::{Graph, SourceRef};
use crate::id::NodeId;
use crate::node::Node;
use crate::value::TypedValue;
use std::collections::HashSet;

/// Counters for one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalStats {
    /// Nodes the outer loop started a walk from
    pub roots: usize,
    /// Steps replayed
    pub steps: usize,
    /// Evaluation functions run
    pub invoked: usize,
    /// Occurrences served from an earlier result in the same pass
    pub reused: usize,
    /// Occurrences with fewer wired inputs than required
    pub under_connected: usize,
    /// Occurrences cut off by a cycle or the step limit
    pub blocked: usize,
}

/// How a step that is not expanded produces its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leaf {
    /// Evaluated by an earlier root in this pass
    Cached,
    /// Already an ancestor on the current path
    Cycle,
    /// Past `max_steps`
    StepLimit,
}

/// One occurrence of a node in the linearized order
#[derive(Debug, Clone, Copy)]
struct Step {
    node: NodeId,
    sources: usize,
    leaf: Option<Leaf>,
}

/// Buffers reused across passes of one evaluator
#[derive(Debug, Default)]
struct Scratch {
    evaluated: HashSet<NodeId>,
    operands: OperandStack,
    /// Nodes waiting to be expanded, with their depth
    pending: Vec<(NodeId, usize)>,
    /// Ancestors of the node being expanded
    path: Vec<NodeId>,
    order: Vec<Step>,
    sources: Vec<SourceRef>,
    roots: Vec<NodeId>,
}

/// Evaluates graphs pass by pass.
///
/// An evaluator owns its scratch buffers, so separate evaluators may run on
/// separate graphs concurrently.
#[derive(Debug, Default)]
pub struct Evaluator {
    config: EvalConfig,
    scratch: Scratch,
}

impl Evaluator {
    /// Create an evaluator with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with the given settings
    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            config,
            scratch: Scratch::default(),
        }
    }

    /// Current settings
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Recompute every node in `graph`, caching results on output ports
    pub fn update(&mut self, graph: &mut Graph) -> EvalStats {
        let mut stats = EvalStats::default();
        self.scratch.evaluated.clear();

        let mut roots = std::mem::take(&mut self.scratch.roots);
        roots.clear();
        roots.extend(graph.node_ids());

        for &root in &roots {
            if self.scratch.evaluated.contains(&root) {
                continue;
            }
            stats.roots += 1;
            self.linearize(graph, root);
            self.execute(graph, &mut stats);
        }
        self.scratch.roots = roots;

        if stats.blocked > 0 {
            tracing::warn!(
                blocked = stats.blocked,
                "evaluation cut short by a cycle or the step limit"
            );
        }
        if self.config.log_stats {
            tracing::debug!(
                nodes = graph.node_count(),
                roots = stats.roots,
                steps = stats.steps,
                invoked = stats.invoked,
                reused = stats.reused,
                under_connected = stats.under_connected,
                "evaluation pass complete"
            );
        }
        stats
    }

    /// Record one step per occurrence of every node `root` depends on
    fn linearize(&mut self, graph: &Graph, root: NodeId) {
        let max_steps = self.config.max_steps;
        let s = &mut self.scratch;
        s.order.clear();
        s.path.clear();
        s.pending.clear();
        s.pending.push((root, 0));

        while let Some((node, depth)) = s.pending.pop() {
            s.path.truncate(depth);

            let leaf = if s.path.contains(&node) {
                Some(Leaf::Cycle)
            } else if s.evaluated.contains(&node) {
                Some(Leaf::Cached)
            } else if s.order.len() >= max_steps {
                Some(Leaf::StepLimit)
            } else {
                None
            };
            if leaf.is_some() {
                s.order.push(Step {
                    node,
                    sources: 0,
                    leaf,
                });
                continue;
            }

            graph.ordered_sources_into(node, &mut s.sources);
            s.order.push(Step {
                node,
                sources: s.sources.len(),
                leaf: None,
            });
            s.path.push(node);
            s.pending
                .extend(s.sources.iter().map(|src| (src.node, depth + 1)));
        }
    }

    /// Replay the recorded steps, dependencies first
    fn execute(&mut self, graph: &mut Graph, stats: &mut EvalStats) {
        let s = &mut self.scratch;
        s.operands.clear();

        while let Some(step) = s.order.pop() {
            stats.steps += 1;
            tracing::trace!(node = %step.node, sources = step.sources, "replay step");

            match step.leaf {
                Some(Leaf::Cycle) => {
                    stats.blocked += 1;
                    s.operands.push(TypedValue::cyclic_dependency());
                    continue;
                }
                Some(Leaf::StepLimit) => {
                    stats.blocked += 1;
                    s.operands.push(TypedValue::step_limit_exceeded());
                    continue;
                }
                Some(Leaf::Cached) => {
                    stats.reused += 1;
                    let cached = graph
                        .node(step.node)
                        .and_then(Node::output_value)
                        .cloned()
                        .unwrap_or_default();
                    s.operands.push(cached);
                    continue;
                }
                None => {}
            }
            let Some(node) = graph.node_mut(step.node) else {
                s.operands.pop_n(step.sources);
                s.operands.push(TypedValue::default());
                continue;
            };

            if step.sources != node.required_inputs() {
                stats.under_connected += 1;
                s.evaluated.insert(step.node);
                s.operands.pop_n(step.sources);
                commit(node, &mut s.operands, TypedValue::not_enough_arguments());
            } else if s.evaluated.contains(&step.node) {
                stats.reused += 1;
                s.operands.pop_n(node.required_inputs());
                let cached = node.output_value().cloned().unwrap_or_default();
                s.operands.push(cached);
            } else {
                stats.invoked += 1;
                s.evaluated.insert(step.node);
                let kind = node.kind;
                kind.evaluate(node, &mut s.operands);
            }
        }

        debug_assert_eq!(s.operands.len(), 1, "unbalanced operand stack");
    }
}

/// Run one pass with a throwaway evaluator
pub fn update(graph: &mut Graph) -> EvalStats {
    Evaluator::new().update(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::NodeKind;
    use crate::port::PortDirection;
    use crate::value::Value;
    use glam::Vec3;

    fn wire(graph: &mut Graph, from: NodeId, to: NodeId, input: usize) {
        let out = graph.node(from).unwrap().output().unwrap().id;
        let port = graph.node(to).unwrap().inputs().nth(input).unwrap().id;
        graph.add_connection(from, out, to, port).unwrap();
    }

    fn constant(graph: &mut Graph, kind: NodeKind, value: impl Into<Value>) -> NodeId {
        let id = graph.construct(kind);
        let node = graph.node_mut(id).unwrap();
        let literal = node
            .ports
            .iter_mut()
            .find(|p| p.direction == PortDirection::Static)
            .unwrap();
        literal.value = TypedValue::new(value);
        id
    }

    fn output(graph: &Graph, id: NodeId) -> TypedValue {
        graph.node(id).unwrap().output_value().cloned().unwrap()
    }

    #[test]
    fn test_simple_expression() {
        let mut graph = Graph::new();
        let a = constant(&mut graph, NodeKind::Float, 2.0);
        let b = constant(&mut graph, NodeKind::Float, 3.0);
        let plus = graph.construct(NodeKind::Plus);
        wire(&mut graph, a, plus, 0);
        wire(&mut graph, b, plus, 1);

        let stats = update(&mut graph);
        assert_eq!(output(&graph, plus), TypedValue::new(5.0));
        assert_eq!(stats.invoked, 3);
        assert_eq!(output(&graph, plus).to_string(), "5.00000");
    }

    #[test]
    fn test_operand_order_follows_port_order() {
        let mut graph = Graph::new();
        // Consumer first, so it is the first root walked.
        let minus = graph.construct(NodeKind::Minus);
        let a = constant(&mut graph, NodeKind::Float, 10.0);
        let b = constant(&mut graph, NodeKind::Float, 4.0);
        wire(&mut graph, b, minus, 1);
        wire(&mut graph, a, minus, 0);

        update(&mut graph);
        assert_eq!(output(&graph, minus), TypedValue::new(6.0));
    }

    #[test]
    fn test_under_connected_node() {
        let mut graph = Graph::new();
        let a = constant(&mut graph, NodeKind::Float, 1.0);
        let plus = graph.construct(NodeKind::Plus);
        let neg = graph.construct(NodeKind::Negate);
        let idle = graph.construct(NodeKind::Mul);
        wire(&mut graph, a, plus, 0);
        wire(&mut graph, plus, neg, 0);

        let stats = update(&mut graph);
        assert_eq!(output(&graph, plus), TypedValue::not_enough_arguments());
        // The sentinel flows on like any other value.
        assert_eq!(output(&graph, neg), TypedValue::invalid_arguments());
        assert_eq!(output(&graph, idle), TypedValue::not_enough_arguments());
        assert!(stats.under_connected >= 2);
    }

    #[test]
    fn test_diamond_evaluates_shared_producer_once() {
        let mut graph = Graph::new();
        let sum = graph.construct(NodeKind::Plus);
        let left = graph.construct(NodeKind::Negate);
        let right = graph.construct(NodeKind::Vec3Cast);
        let source = constant(&mut graph, NodeKind::Vec3, Vec3::new(1.0, 2.0, 3.0));
        wire(&mut graph, source, left, 0);
        wire(&mut graph, source, right, 0);
        wire(&mut graph, left, sum, 0);
        wire(&mut graph, right, sum, 1);

        let mut evaluator = Evaluator::new();
        for _ in 0..2 {
            let stats = evaluator.update(&mut graph);
            // Every node is fully wired, so each ran exactly once.
            assert_eq!(stats.invoked, graph.node_count());
            assert_eq!(stats.roots, 1);
            // The second path to the source reads its cached result.
            assert_eq!(stats.reused, 1);
            assert_eq!(stats.steps, 5);
        }
        assert_eq!(output(&graph, sum), TypedValue::new(Vec3::ZERO));
        assert_eq!(output(&graph, left), TypedValue::new(Vec3::new(-1.0, -2.0, -3.0)));
        assert_eq!(output(&graph, right), TypedValue::new(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_later_roots_reuse_cached_results() {
        let mut graph = Graph::new();
        let source = constant(&mut graph, NodeKind::Float, 4.0);
        let a = graph.construct(NodeKind::Negate);
        let b = graph.construct(NodeKind::Negate);
        wire(&mut graph, source, a, 0);
        wire(&mut graph, source, b, 0);

        let stats = update(&mut graph);
        assert_eq!(stats.invoked, 3);
        assert_eq!(stats.reused, 2);
        assert_eq!(output(&graph, a), output(&graph, b));
        assert_eq!(output(&graph, a), TypedValue::new(-4.0));
    }

    fn squaring_chain(graph: &mut Graph, seed: f32, links: usize) -> NodeId {
        let mut prev = constant(graph, NodeKind::Float, seed);
        for _ in 0..links {
            let mul = graph.construct(NodeKind::Mul);
            wire(graph, prev, mul, 0);
            wire(graph, prev, mul, 1);
            prev = mul;
        }
        prev
    }

    #[test]
    fn test_deep_shared_chain_stays_within_step_limit() {
        let mut graph = Graph::new();
        let last = squaring_chain(&mut graph, 1.0, 16);

        let stats = update(&mut graph);
        assert_eq!(stats.blocked, 0);
        assert_eq!(stats.invoked, 17);
        // Each Mul walks itself plus two cached leaves.
        assert_eq!(stats.steps, 1 + 16 * 3);
        assert_eq!(output(&graph, last), TypedValue::new(1.0));
    }

    #[test]
    fn test_walk_stops_at_evaluated_nodes() {
        let mut graph = Graph::new();
        let last = squaring_chain(&mut graph, 2.0, 5);

        let mut evaluator = Evaluator::with_config(EvalConfig {
            max_steps: 3,
            log_stats: false,
        });
        let stats = evaluator.update(&mut graph);
        assert_eq!(stats.blocked, 0);
        assert_eq!(stats.reused, 10);
        assert_eq!(output(&graph, last), TypedValue::new(4_294_967_296.0));
    }

    #[test]
    fn test_cycle_terminates_with_sentinels() {
        let mut graph = Graph::new();
        let a = graph.construct(NodeKind::Negate);
        let b = graph.construct(NodeKind::Negate);
        wire(&mut graph, a, b, 0);
        wire(&mut graph, b, a, 0);

        let stats = update(&mut graph);
        assert_eq!(stats.blocked, 1);
        assert_eq!(stats.invoked, 2);
        assert_eq!(output(&graph, a), TypedValue::invalid_arguments());
        assert_eq!(output(&graph, b), TypedValue::invalid_arguments());
    }

    #[test]
    fn test_self_loop() {
        let mut graph = Graph::new();
        let neg = graph.construct(NodeKind::Negate);
        wire(&mut graph, neg, neg, 0);

        let stats = update(&mut graph);
        assert_eq!(stats.blocked, 1);
        assert_eq!(output(&graph, neg), TypedValue::invalid_arguments());
    }

    #[test]
    fn test_step_limit_blocks_deep_dependencies() {
        let mut graph = Graph::new();
        let neg = graph.construct(NodeKind::Negate);
        let source = constant(&mut graph, NodeKind::Float, 1.0);
        wire(&mut graph, source, neg, 0);

        let mut evaluator = Evaluator::with_config(EvalConfig {
            max_steps: 1,
            log_stats: false,
        });
        let stats = evaluator.update(&mut graph);
        assert_eq!(stats.blocked, 1);
        assert_eq!(output(&graph, neg), TypedValue::invalid_arguments());
        // The cut-off node still gets evaluated as its own root.
        assert_eq!(output(&graph, source), TypedValue::new(1.0));
    }

    #[test]
    fn test_node_without_output_is_inert() {
        let mut graph = Graph::new();
        let source = constant(&mut graph, NodeKind::Float, 1.0);
        let sink = graph.new_node(NodeKind::Negate);
        let input = graph.add_port(sink, PortDirection::Input).unwrap().id;
        let out = graph.node(source).unwrap().output().unwrap().id;
        graph.add_connection(source, out, sink, input).unwrap();
        let blank = graph.new_node(NodeKind::Invalid);

        let stats = update(&mut graph);
        assert_eq!(stats.invoked, 3);
        assert!(graph.node(sink).unwrap().output_value().is_none());
        assert!(graph.node(blank).unwrap().ports.is_empty());
    }

    #[test]
    fn test_stack_balanced_after_each_root() {
        let mut graph = Graph::new();
        let a = constant(&mut graph, NodeKind::Float, 1.0);
        let mul = graph.construct(NodeKind::Mul);
        wire(&mut graph, a, mul, 0);
        wire(&mut graph, a, mul, 1);
        graph.construct(NodeKind::Cross);

        let mut evaluator = Evaluator::new();
        evaluator.update(&mut graph);
        assert_eq!(evaluator.scratch.operands.len(), 1);
        assert!(evaluator.scratch.order.is_empty());
        assert_eq!(output(&graph, mul), TypedValue::new(1.0));
    }

    #[test]
    fn test_rewiring_between_passes() {
        let mut graph = Graph::new();
        let a = constant(&mut graph, NodeKind::Float, 2.0);
        let neg = graph.construct(NodeKind::Negate);
        let mut evaluator = Evaluator::new();

        evaluator.update(&mut graph);
        assert_eq!(output(&graph, neg), TypedValue::not_enough_arguments());

        wire(&mut graph, a, neg, 0);
        evaluator.update(&mut graph);
        assert_eq!(output(&graph, neg), TypedValue::new(-2.0));

        graph.remove_node(a);
        evaluator.update(&mut graph);
        assert_eq!(output(&graph, neg), TypedValue::not_enough_arguments());
    }

    #[test]
    fn test_independent_evaluators_run_in_parallel() {
        let build = |value: f32| {
            let mut graph = Graph::new();
            let a = constant(&mut graph, NodeKind::Float, value);
            let neg = graph.construct(NodeKind::Negate);
            wire(&mut graph, a, neg, 0);
            (graph, neg)
        };
        let (mut g1, n1) = build(1.0);
        let (mut g2, n2) = build(2.0);

        std::thread::scope(|scope| {
            scope.spawn(|| Evaluator::new().update(&mut g1));
            scope.spawn(|| Evaluator::new().update(&mut g2));
        });
        assert_eq!(output(&g1, n1), TypedValue::new(-1.0));
        assert_eq!(output(&g2, n2), TypedValue::new(-2.0));
    }
}
