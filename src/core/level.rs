//! core::level
//!
//! Dependency levels: how deep the dependency chain below each node goes.
//!
//! A node without dependencies has level 0; otherwise its level is one more
//! than the highest level among its direct dependencies.
//!
//! # Cycles
//!
//! Resolution walks the graph with an explicit stack and marks nodes active
//! while their dependencies are being resolved. An edge into an active node
//! is a back edge and contributes nothing, so resolution always terminates.
//! Levels of nodes on a cycle depend on which cycle member is reached first
//! (insertion order) and are stable for a given graph.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::graph::DependencyGraph;
use super::types::NodeId;

/// Level of every node of a graph, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    levels: Vec<usize>,
}

impl LevelMap {
    /// Level of a node.
    pub fn level(&self, id: NodeId) -> usize {
        self.levels[id.index()]
    }

    /// Highest level in the map, if any node exists.
    pub fn max_level(&self) -> Option<usize> {
        self.levels.iter().copied().max()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Levels keyed by node key, for display and serialisation.
    pub fn by_key(&self, graph: &DependencyGraph) -> BTreeMap<String, usize> {
        graph
            .node_ids()
            .map(|id| (graph.key(id).display().to_string(), self.level(id)))
            .collect()
    }
}

/// Serialisable view of a level map.
#[derive(Debug, Serialize)]
pub struct LevelReport {
    pub levels: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Active,
    Resolved(usize),
}

struct Frame {
    node: NodeId,
    next_dep: usize,
    /// Highest resolved level among dependencies seen so far.
    best: Option<usize>,
}

impl Frame {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            next_dep: 0,
            best: None,
        }
    }
}

/// Compute the level of every node in `graph`.
///
/// # Example
///
/// ```
/// use addonkit::core::graph::DependencyGraph;
/// use addonkit::core::level::resolve_levels;
///
/// let graph = DependencyGraph::from_names([
///     ("e", vec![]),
///     ("r", vec!["x"]),
///     ("c", vec![]),
///     ("t", vec!["r", "c"]),
///     ("x", vec!["e"]),
/// ]);
/// let levels = resolve_levels(&graph);
/// assert_eq!(levels.level(graph.get("t").unwrap()), 3);
/// assert_eq!(levels.level(graph.get("e").unwrap()), 0);
/// ```
pub fn resolve_levels(graph: &DependencyGraph) -> LevelMap {
    let mut marks = vec![Mark::Unvisited; graph.len()];
    let mut stack: Vec<Frame> = Vec::new();

    for root in graph.node_ids() {
        if marks[root.index()] != Mark::Unvisited {
            continue;
        }
        marks[root.index()] = Mark::Active;
        stack.push(Frame::new(root));

        while let Some(frame) = stack.last_mut() {
            let deps = graph.deps(frame.node);
            if let Some(&dep) = deps.get(frame.next_dep) {
                frame.next_dep += 1;
                match marks[dep.index()] {
                    Mark::Resolved(level) => frame.best = frame.best.max(Some(level)),
                    Mark::Active => {
                        debug!(
                            from = %graph.key(frame.node).display(),
                            to = %graph.key(dep).display(),
                            "dependency cycle, ignoring back edge"
                        );
                    }
                    Mark::Unvisited => {
                        marks[dep.index()] = Mark::Active;
                        stack.push(Frame::new(dep));
                    }
                }
                continue;
            }

            let level = frame.best.map_or(0, |best| best + 1);
            marks[frame.node.index()] = Mark::Resolved(level);
            stack.pop();
            if let Some(parent) = stack.last_mut() {
                parent.best = parent.best.max(Some(level));
            }
        }
    }

    let levels = marks
        .into_iter()
        .map(|mark| match mark {
            Mark::Resolved(level) => level,
            // Every node is a root of the outer loop, so all are resolved.
            Mark::Unvisited | Mark::Active => 0,
        })
        .collect();
    LevelMap { levels }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_of(graph: &DependencyGraph, levels: &LevelMap, key: &str) -> usize {
        levels.level(graph.get(key).unwrap())
    }

    #[test]
    fn reference_example() {
        let graph = DependencyGraph::from_names([
            ("e", vec![]),
            ("r", vec!["x"]),
            ("c", vec![]),
            ("t", vec!["r", "c"]),
            ("x", vec!["e"]),
        ]);
        let levels = resolve_levels(&graph);

        let expected: BTreeMap<String, usize> = [("t", 3), ("r", 2), ("x", 1), ("c", 0), ("e", 0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(levels.by_key(&graph), expected);
        assert_eq!(levels.max_level(), Some(3));
    }

    #[test]
    fn virtual_dependency_is_a_leaf() {
        let graph = DependencyGraph::from_names([("a", vec!["missing"])]);
        let levels = resolve_levels(&graph);
        assert_eq!(level_of(&graph, &levels, "a"), 1);
        assert_eq!(level_of(&graph, &levels, "missing"), 0);
    }

    #[test]
    fn diamond_takes_longest_chain() {
        let graph = DependencyGraph::from_names([
            ("top", vec!["short", "long"]),
            ("short", vec!["base"]),
            ("long", vec!["mid"]),
            ("mid", vec!["base"]),
            ("base", vec![]),
        ]);
        let levels = resolve_levels(&graph);
        assert_eq!(level_of(&graph, &levels, "top"), 3);
        assert_eq!(level_of(&graph, &levels, "short"), 1);
    }

    #[test]
    fn self_cycle_terminates() {
        let graph = DependencyGraph::from_names([("a", vec!["a"])]);
        let levels = resolve_levels(&graph);
        assert_eq!(level_of(&graph, &levels, "a"), 0);
    }

    #[test]
    fn mutual_cycle_terminates_deterministically() {
        let build = || {
            DependencyGraph::from_names([("a", vec!["b"]), ("b", vec!["a", "c"]), ("c", vec![])])
        };
        let first = build();
        let levels = resolve_levels(&first);
        assert_eq!(level_of(&first, &levels, "c"), 0);
        assert_eq!(level_of(&first, &levels, "b"), 1);
        assert_eq!(level_of(&first, &levels, "a"), 2);

        let second = build();
        assert_eq!(resolve_levels(&second).by_key(&second), levels.by_key(&first));
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let names: Vec<String> = (0..20_000).map(|i| format!("m{i}")).collect();
        let graph = DependencyGraph::from_names(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| (name.as_str(), names.get(i + 1).map(String::as_str))),
        );
        let levels = resolve_levels(&graph);
        assert_eq!(level_of(&graph, &levels, "m0"), 19_999);
    }
}
