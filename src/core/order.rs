//! core::order
//!
//! Install ordering derived from dependency levels.
//!
//! Nodes are taken by descending level (stable on insertion order). Each
//! emitted node is followed directly by its own dependencies, in declaration
//! order, so a tree stays contiguous with its owner while the most
//! foundational nodes drift to the end of the list.
//!
//! A dependency is only pulled forward once every node depending on it has
//! been emitted. In an acyclic graph this keeps every node ahead of all of
//! its dependencies.

use super::graph::DependencyGraph;
use super::level::LevelMap;
use super::types::NodeId;

/// Order all nodes of `graph`, each at most once.
///
/// # Example
///
/// ```
/// use addonkit::core::graph::DependencyGraph;
/// use addonkit::core::level::resolve_levels;
/// use addonkit::core::order::sorted_by_level;
///
/// let graph = DependencyGraph::from_names([
///     ("e", vec![]),
///     ("r", vec!["x"]),
///     ("c", vec![]),
///     ("t", vec!["r", "c"]),
///     ("x", vec!["e"]),
/// ]);
/// let levels = resolve_levels(&graph);
/// let order: Vec<_> = sorted_by_level(&graph, &levels)
///     .into_iter()
///     .map(|id| graph.key(id).display().to_string())
///     .collect();
/// assert_eq!(order, vec!["t", "r", "c", "x", "e"]);
/// ```
pub fn sorted_by_level(graph: &DependencyGraph, levels: &LevelMap) -> Vec<NodeId> {
    let mut by_level: Vec<NodeId> = graph.node_ids().collect();
    // `sort_by` is stable: equal levels keep insertion order.
    by_level.sort_by(|a, b| levels.level(*b).cmp(&levels.level(*a)));

    let mut emitted = vec![false; graph.len()];
    let mut order = Vec::with_capacity(graph.len());

    for node in by_level {
        if !emitted[node.index()] {
            emitted[node.index()] = true;
            order.push(node);
        }
        for &dep in graph.deps(node) {
            if emitted[dep.index()] {
                continue;
            }
            let ready = graph
                .dependents(dep)
                .iter()
                .all(|dependent| emitted[dependent.index()]);
            if ready {
                emitted[dep.index()] = true;
                order.push(dep);
            }
        }
    }

    order
}

/// Keys of `sorted_by_level`, for callers that only need paths.
pub fn sorted_keys(graph: &DependencyGraph, levels: &LevelMap) -> Vec<std::path::PathBuf> {
    sorted_by_level(graph, levels)
        .into_iter()
        .map(|id| graph.key(id).to_path_buf())
        .collect()
}
