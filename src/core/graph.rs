//! core::graph
//!
//! Dependency graph representation.
//!
//! # Architecture
//!
//! The graph is an arena:
//! - Nodes are addressed by [`NodeId`] (insertion index)
//! - Each node has a key (an addon path, or a bare name) and an ordered list
//!   of outgoing edges to the nodes it depends on
//! - A declared dependency `dep` of node `key` resolves to the sibling key
//!   `key.parent().join(dep)` (see [`sibling_key`] for `.` and `..` keys)
//!
//! # Invariants
//!
//! - Every edge target is a node of the graph. Dependencies nobody declared
//!   a list for become virtual leaf nodes.
//! - Insertion order is stable and is the tie-break for every ordering
//!   derived from the graph.
//! - The graph is immutable once built. Cycles are representable; consumers
//!   must not assume acyclicity.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use super::types::NodeId;

#[derive(Debug, Clone)]
struct Node {
    key: PathBuf,
    deps: Vec<NodeId>,
    /// Whether a dependency list was declared for this node.
    declared: bool,
}

/// Directed dependency graph over addon paths or module names.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: Vec<Node>,
    index: HashMap<PathBuf, NodeId>,
    /// Reverse edges, derived from `deps`.
    dependents: Vec<Vec<NodeId>>,
}

impl DependencyGraph {
    /// Build a graph from keys and their declared dependency names.
    ///
    /// Entries are added in iteration order; a key listed twice keeps its
    /// first position and its last dependency list.
    ///
    /// # Example
    ///
    /// ```
    /// use addonkit::core::graph::DependencyGraph;
    /// use std::path::PathBuf;
    ///
    /// let graph = DependencyGraph::build(vec![
    ///     (PathBuf::from("/deps/sale-workflow"), vec!["partner-contact".to_string()]),
    /// ]);
    ///
    /// // The dependency becomes a virtual sibling node.
    /// assert_eq!(graph.len(), 2);
    /// assert!(graph.get("/deps/partner-contact").is_some());
    /// ```
    pub fn build<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (PathBuf, Vec<String>)>,
    {
        let mut graph = Self::default();
        let entries: Vec<_> = entries.into_iter().collect();

        // Declared keys claim the first ids so they lead ties.
        for (key, _) in &entries {
            let id = graph.intern(key.clone());
            graph.nodes[id.0].declared = true;
        }

        for (key, deps) in entries {
            let id = graph.index[&key];
            let edges: Vec<NodeId> = deps
                .iter()
                .map(|dep| graph.intern(sibling_key(&key, dep)))
                .collect();
            graph.nodes[id.0].deps = edges;
        }

        graph.dependents = vec![Vec::new(); graph.nodes.len()];
        for (from, node) in graph.nodes.iter().enumerate() {
            for dep in &node.deps {
                if !graph.dependents[dep.0].contains(&NodeId(from)) {
                    graph.dependents[dep.0].push(NodeId(from));
                }
            }
        }

        graph
    }

    /// Build a graph keyed by bare names.
    ///
    /// # Example
    ///
    /// ```
    /// use addonkit::core::graph::DependencyGraph;
    ///
    /// let graph = DependencyGraph::from_names([("t", vec!["r", "c"]), ("r", vec![])]);
    /// assert_eq!(graph.len(), 3);
    /// ```
    pub fn from_names<'a, I, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, D)>,
        D: IntoIterator<Item = &'a str>,
    {
        Self::build(entries.into_iter().map(|(key, deps)| {
            (
                PathBuf::from(key),
                deps.into_iter().map(str::to_string).collect(),
            )
        }))
    }

    fn intern(&mut self, key: PathBuf) -> NodeId {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = NodeId(self.nodes.len());
        self.index.insert(key.clone(), id);
        self.nodes.push(Node {
            key,
            deps: Vec::new(),
            declared: false,
        });
        id
    }

    /// Number of nodes, virtual ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by key.
    pub fn get(&self, key: impl AsRef<Path>) -> Option<NodeId> {
        self.index.get(key.as_ref()).copied()
    }

    /// Key of a node.
    pub fn key(&self, id: NodeId) -> &Path {
        &self.nodes[id.0].key
    }

    /// Direct dependencies of a node, in declaration order.
    pub fn deps(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].deps
    }

    /// Nodes with an edge to `id`, in insertion order.
    pub fn dependents(&self, id: NodeId) -> &[NodeId] {
        &self.dependents[id.0]
    }

    /// Whether `id` was synthesised from a dependency reference only.
    pub fn is_virtual(&self, id: NodeId) -> bool {
        !self.nodes[id.0].declared
    }

    /// All node ids in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }
}

/// Key a dependency named `dep` of `key` resolves to: its sibling.
///
/// For bare names (no parent) this is just `dep`. Keys ending in `.` or
/// `..` have no usable parent component, so the sibling is reached through
/// `..` instead.
///
/// # Example
///
/// ```
/// use addonkit::core::graph::sibling_key;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(sibling_key(Path::new("/ci/repo"), "web"), PathBuf::from("/ci/web"));
/// assert_eq!(sibling_key(Path::new("."), "web"), PathBuf::from("../web"));
/// ```
pub fn sibling_key(key: &Path, dep: &str) -> PathBuf {
    match key.components().next_back() {
        Some(Component::CurDir) => Path::new("..").join(dep),
        Some(Component::ParentDir) => key.join("..").join(dep),
        _ => match key.parent() {
            Some(parent) => parent.join(dep),
            None => PathBuf::from(dep),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(graph: &DependencyGraph, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|id| graph.key(*id).display().to_string())
            .collect()
    }

    #[test]
    fn empty_graph() {
        let graph = DependencyGraph::build(Vec::new());
        assert!(graph.is_empty());
        assert_eq!(graph.node_ids().count(), 0);
    }

    #[test]
    fn bare_names_resolve_to_bare_names() {
        let graph = DependencyGraph::from_names([("t", vec!["r", "c"]), ("r", vec!["x"])]);
        let t = graph.get("t").unwrap();
        assert_eq!(keys(&graph, graph.deps(t)), vec!["r", "c"]);
        assert!(graph.get("x").is_some());
    }

    #[test]
    fn dependencies_resolve_to_siblings() {
        let graph = DependencyGraph::build(vec![(
            PathBuf::from("/home/ci/build/repo"),
            vec!["server-tools".to_string()],
        )]);
        let repo = graph.get("/home/ci/build/repo").unwrap();
        assert_eq!(
            keys(&graph, graph.deps(repo)),
            vec!["/home/ci/build/server-tools"]
        );
    }

    #[test]
    fn current_directory_key_resolves_outside_itself() {
        let graph = DependencyGraph::build(vec![(
            PathBuf::from("."),
            vec!["server-tools".to_string()],
        )]);
        let root = graph.get(".").unwrap();
        assert_eq!(keys(&graph, graph.deps(root)), vec!["../server-tools"]);

        assert_eq!(
            sibling_key(Path::new("../repo/.."), "web"),
            PathBuf::from("../repo/../../web")
        );
        assert_eq!(sibling_key(Path::new("repo"), "web"), PathBuf::from("web"));
    }

    #[test]
    fn virtual_nodes_are_appended_after_declared_keys() {
        let graph = DependencyGraph::from_names([("a", vec!["z"]), ("b", vec![])]);
        let ids: Vec<_> = graph.node_ids().collect();
        assert_eq!(keys(&graph, &ids), vec!["a", "b", "z"]);
        assert!(!graph.is_virtual(graph.get("a").unwrap()));
        assert!(graph.is_virtual(graph.get("z").unwrap()));
    }

    #[test]
    fn declared_dependency_is_not_virtual() {
        let graph = DependencyGraph::from_names([("a", vec!["b"]), ("b", vec![])]);
        assert!(!graph.is_virtual(graph.get("b").unwrap()));
    }

    #[test]
    fn dependents_are_reverse_edges() {
        let graph =
            DependencyGraph::from_names([("a", vec!["c"]), ("b", vec!["c", "c"]), ("c", vec![])]);
        let c = graph.get("c").unwrap();
        assert_eq!(keys(&graph, graph.dependents(c)), vec!["a", "b"]);
    }

    #[test]
    fn self_reference_is_representable() {
        let graph = DependencyGraph::from_names([("a", vec!["a"])]);
        let a = graph.get("a").unwrap();
        assert_eq!(graph.deps(a), &[a]);
        assert_eq!(graph.dependents(a), &[a]);
    }
}
