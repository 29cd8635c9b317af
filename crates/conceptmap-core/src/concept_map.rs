//! The concept map graph and its filtered view

use crate::declarations::{ParseWarning, ParsedDeclarations};
use crate::edge::Edge;
use crate::error::{Error, Result};
use crate::filter::FilterState;
use crate::node::Node;
use crate::parser::parse_dsl;
use crate::traversal::{Adjacency, Distance};
use crate::view::{VisibleEdge, VisibleGraph, VisibleNode};
use std::collections::{BTreeSet, HashMap, HashSet};

/// A named graph of concepts plus the filter driving its view
///
/// Nodes are keyed by id and edges by their derived id. Both are kept in
/// insertion order, which is the order [`ConceptMap::to_dsl`] writes them.
/// Nothing is ever removed.
#[derive(Debug, Clone, Default)]
pub struct ConceptMap {
    name: String,

    nodes: Vec<Node>,

    /// Maps node ids to positions in `nodes`
    node_index: HashMap<String, usize>,

    edges: Vec<Edge>,

    /// Maps derived edge ids to positions in `edges`
    edge_index: HashMap<String, usize>,

    filter: FilterState,
}

impl ConceptMap {
    /// Create an empty map
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Build a graph from parser output
    ///
    /// Every concept referenced by a predicate becomes a node, carrying its
    /// definition when there is one. Definitions for unreferenced concepts
    /// are not turned into nodes.
    pub fn from_parsed_declarations(name: impl Into<String>, parsed: &ParsedDeclarations) -> Self {
        let mut map = Self::new(name);

        for predicate in &parsed.predicates {
            for concept in [&predicate.source, &predicate.target] {
                if map.get_node(concept).is_none() {
                    let definition = parsed.definitions.get(concept).map(String::as_str);
                    map.add_node(concept, definition);
                }
            }
        }

        for predicate in &parsed.predicates {
            map.add_edge(&predicate.source, &predicate.target, &predicate.relationship);
        }

        tracing::debug!(
            "Built concept map '{}' with {} nodes and {} edges",
            map.name,
            map.nodes.len(),
            map.edges.len()
        );

        map
    }

    /// Parse DSL text and build a map from it, returning parse warnings
    pub fn from_dsl(name: impl Into<String>, text: &str) -> Result<(Self, Vec<ParseWarning>)> {
        let parsed = parse_dsl(text);
        if let Some(error) = parsed.error() {
            return Err(Error::Parse(error.clone()));
        }

        let map = Self::from_parsed_declarations(name, &parsed);
        Ok((map, parsed.warnings))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Register a node, or update the definition of an existing one
    ///
    /// A `None` definition never clears what an existing node already has.
    pub fn add_node(&mut self, id: &str, definition: Option<&str>) -> &Node {
        let index = match self.node_index.get(id) {
            Some(&index) => {
                if let Some(definition) = definition {
                    self.nodes[index].definition = Some(definition.to_string());
                }
                index
            }
            None => {
                let mut node = Node::new(id);
                node.definition = definition.map(str::to_string);
                self.nodes.push(node);
                self.node_index.insert(id.to_string(), self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &self.nodes[index]
    }

    /// Register an edge, creating missing endpoint nodes
    ///
    /// An edge with the same derived id is replaced (last write wins).
    /// Parser output never triggers this since predicates are deduplicated.
    pub fn add_edge(&mut self, source: &str, target: &str, relationship: &str) -> &Edge {
        self.add_node(source, None);
        self.add_node(target, None);

        let edge = Edge::new(source, target, relationship);
        let id = edge.id();
        let index = match self.edge_index.get(&id) {
            Some(&index) => {
                tracing::debug!("Replacing existing edge {}", id);
                self.edges[index] = edge;
                index
            }
            None => {
                self.edges.push(edge);
                self.edge_index.insert(id, self.edges.len() - 1);
                self.edges.len() - 1
            }
        };
        &self.edges[index]
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&index| &self.nodes[index])
    }

    /// Like [`get_node`](Self::get_node), but a missing node is an error
    pub fn require_node(&self, id: &str) -> Result<&Node> {
        self.get_node(id)
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    /// Look up an edge by derived id (`source--relationship-->target`)
    pub fn get_edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&index| &self.edges[index])
    }

    pub fn get_all_nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn get_all_edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Resolve an edge's endpoints to nodes of this map
    pub fn endpoints(&self, edge: &Edge) -> Option<(&Node, &Node)> {
        Some((self.get_node(&edge.source)?, self.get_node(&edge.target)?))
    }

    /// Distinct relationship labels, sorted
    pub fn relationships(&self) -> Vec<&str> {
        self.edges
            .iter()
            .map(|e| e.relationship.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Set or clear the active node; ids not in the map are ignored
    pub fn set_active_node(&mut self, id: Option<&str>) {
        match id {
            Some(id) if self.get_node(id).is_none() => {
                tracing::warn!("Ignoring unknown active node: {}", id);
            }
            _ => self.filter.active_node = id.map(str::to_string),
        }
    }

    pub fn get_active_node(&self) -> Option<&Node> {
        self.filter
            .active_node
            .as_deref()
            .and_then(|id| self.get_node(id))
    }

    /// Add a node to the selection; returns false for unknown ids and
    /// nodes already selected
    pub fn add_selected_node(&mut self, id: &str) -> bool {
        if self.get_node(id).is_none() {
            tracing::warn!("Ignoring unknown selected node: {}", id);
            return false;
        }
        self.filter.selected_nodes.insert(id.to_string())
    }

    pub fn remove_selected_node(&mut self, id: &str) -> bool {
        self.filter.selected_nodes.remove(id)
    }

    pub fn get_selected_nodes(&self) -> Vec<&Node> {
        self.filter
            .selected_nodes
            .iter()
            .filter_map(|id| self.get_node(id))
            .collect()
    }

    /// Set the visibility radius; negative values clamp to 0
    pub fn set_max_distance(&mut self, distance: i64) {
        self.filter.set_max_distance(distance);
    }

    pub fn max_distance(&self) -> usize {
        self.filter.max_distance
    }

    pub fn set_bidirectional(&mut self, bidirectional: bool) {
        self.filter.bidirectional = bidirectional;
    }

    pub fn is_bidirectional(&self) -> bool {
        self.filter.bidirectional
    }

    pub fn set_active_relationship(&mut self, relationship: Option<&str>) {
        self.filter.active_relationship = relationship.map(str::to_string);
    }

    /// Restore the default filter state
    pub fn reset_filters(&mut self) {
        self.filter = FilterState::default();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    fn adjacency(&self) -> Adjacency<'_> {
        Adjacency::build(&self.edges, self.filter.direction())
    }

    /// Immediate neighbours of a node under the current direction mode
    pub fn get_neighbors(&self, id: &str) -> Vec<&Node> {
        let adjacency = self.adjacency();
        let mut seen = HashSet::new();
        adjacency
            .of(id)
            .iter()
            .filter(|n| seen.insert(**n))
            .filter_map(|n| self.get_node(n))
            .collect()
    }

    /// Finite distances from the active node to every reachable node
    ///
    /// Empty when no node is active.
    pub fn distances_from_active(&self) -> HashMap<&str, usize> {
        match self.filter.active_node.as_deref() {
            Some(active) => self.adjacency().distances_from(active),
            None => HashMap::new(),
        }
    }

    /// Shortest path length from the active node, in edges
    ///
    /// `Distance::Infinite` when no node is active or no path exists.
    pub fn get_distance_from_active(&self, id: &str) -> Distance {
        self.distances_from_active().get(id).copied().into()
    }

    fn visible_ids(&self) -> HashSet<&str> {
        let mut visible: HashSet<&str> = HashSet::new();
        if self.filter.is_unanchored() {
            return visible;
        }

        let adjacency = self.adjacency();

        if let Some(active) = self.filter.active_node.as_deref() {
            let max = self.filter.max_distance;
            visible.extend(
                adjacency
                    .distances_from(active)
                    .into_iter()
                    .filter(|&(_, distance)| distance <= max)
                    .map(|(id, _)| id),
            );
        }

        for selected in &self.filter.selected_nodes {
            if let Some(node) = self.get_node(selected) {
                visible.insert(node.id.as_str());
                visible.extend(adjacency.of(&node.id));
            }
        }

        if let Some(relationship) = self.filter.active_relationship.as_deref() {
            let endpoints: HashSet<&str> = self
                .edges
                .iter()
                .filter(|e| e.relationship == relationship)
                .flat_map(|e| [e.source.as_str(), e.target.as_str()])
                .collect();
            visible.retain(|id| endpoints.contains(id));
        }

        visible
    }

    /// Nodes shown by the current filter, in insertion order
    pub fn get_visible_nodes(&self) -> Vec<&Node> {
        let visible = self.visible_ids();
        self.nodes
            .iter()
            .filter(|n| visible.contains(n.id.as_str()))
            .collect()
    }

    /// Edges whose endpoints are both visible and whose relationship
    /// matches the active one, if set
    pub fn get_visible_edges(&self) -> Vec<&Edge> {
        let visible = self.visible_ids();
        self.visible_edges_within(&visible)
    }

    fn visible_edges_within(&self, visible: &HashSet<&str>) -> Vec<&Edge> {
        let relationship = self.filter.active_relationship.as_deref();
        self.edges
            .iter()
            .filter(|e| visible.contains(e.source.as_str()) && visible.contains(e.target.as_str()))
            .filter(|e| relationship.map_or(true, |r| e.relationship == r))
            .collect()
    }

    /// Snapshot of the filtered view for consumers
    pub fn visible_graph(&self) -> VisibleGraph {
        let visible = self.visible_ids();
        let distances = self.distances_from_active();
        let active = self.filter.active_node.as_deref();

        let nodes = self
            .nodes
            .iter()
            .filter(|n| visible.contains(n.id.as_str()))
            .map(|n| VisibleNode {
                id: n.id.clone(),
                definition: n.definition.clone(),
                distance: distances.get(n.id.as_str()).copied().into(),
                active: active == Some(n.id.as_str()),
                selected: self.filter.selected_nodes.contains(&n.id),
            })
            .collect();

        let edges = self
            .visible_edges_within(&visible)
            .into_iter()
            .map(VisibleEdge::from)
            .collect();

        VisibleGraph::new(self.name.clone())
            .with_nodes(nodes)
            .with_edges(edges)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Serialize the graph back to DSL text
    ///
    /// Predicates come first in edge order, then a definition block for
    /// every node with a non-empty definition. Nodes without definitions
    /// and the filter state are not represented.
    pub fn to_dsl(&self) -> String {
        let mut lines: Vec<String> = self.edges.iter().map(Edge::to_dsl).collect();
        if !lines.is_empty() {
            lines.push(String::new());
        }

        for node in self.nodes.iter().filter(|n| n.has_definition()) {
            lines.push(format!("{}:", node.id));
            lines.push(node.definition.clone().unwrap_or_default());
            lines.push("---".to_string());
            lines.push(String::new());
        }

        lines.join("\n").trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::ParseWarningKind;
    use std::collections::BTreeSet;

    fn ids(nodes: Vec<&Node>) -> BTreeSet<String> {
        nodes.into_iter().map(|n| n.id.clone()).collect()
    }

    fn edge_ids(edges: Vec<&Edge>) -> BTreeSet<String> {
        edges.into_iter().map(Edge::id).collect()
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn build(text: &str) -> ConceptMap {
        let (map, _) = ConceptMap::from_dsl("test", text).unwrap();
        map
    }

    /// A -> B, B -> C, A -> D
    fn star_graph() -> ConceptMap {
        build("A -- r -> B\nB -- r -> C\nA -- r -> D")
    }

    #[test]
    fn test_add_node_keeps_existing_definition() {
        let mut map = ConceptMap::new("m");
        map.add_node("A", Some("first"));
        map.add_node("A", None);
        assert_eq!(map.get_node("A").unwrap().definition.as_deref(), Some("first"));

        map.add_node("A", Some("second"));
        assert_eq!(map.get_node("A").unwrap().definition.as_deref(), Some("second"));
        assert_eq!(map.get_all_nodes().len(), 1);
    }

    #[test]
    fn test_add_edge_replaces_same_id() {
        let mut map = ConceptMap::new("m");
        map.add_edge("A", "B", "r");
        map.add_edge("A", "B", "r");
        map.add_edge("A", "B", "s");

        assert_eq!(map.get_all_edges().len(), 2);
        assert_eq!(map.get_all_nodes().len(), 2);
        assert!(map.get_edge("A--r-->B").is_some());
        assert!(map.get_edge("A--s-->B").is_some());
        assert!(map.get_edge("B--r-->A").is_none());
    }

    #[test]
    fn test_endpoints_resolve_to_nodes() {
        let map = star_graph();
        let edge = map.get_edge("A--r-->B").unwrap();
        let (source, target) = map.endpoints(edge).unwrap();
        assert_eq!(source.id, "A");
        assert_eq!(target.id, "B");
    }

    #[test]
    fn test_factory_attaches_definitions_and_skips_orphans() {
        let parsed = parse_dsl("A -- r -> B\nA:\nfirst letter\n---\nZ:\nunused\n---");
        let map = ConceptMap::from_parsed_declarations("m", &parsed);

        assert_eq!(map.name(), "m");
        assert_eq!(
            map.get_node("A").unwrap().definition.as_deref(),
            Some("first letter")
        );
        assert!(map.get_node("B").unwrap().definition.is_none());
        assert!(map.get_node("Z").is_none());
    }

    #[test]
    fn test_multi_relationship_edges() {
        let map = build("A -- r1 -> B\nA -- r2 -> B");
        assert_eq!(edge_ids(map.get_all_edges().iter().collect()), set(&["A--r1-->B", "A--r2-->B"]));
        assert_eq!(map.relationships(), vec!["r1", "r2"]);
    }

    #[test]
    fn test_from_dsl_reports_parse_errors() {
        let err = ConceptMap::from_dsl("m", "A -- r -> B\nnonsense").unwrap_err();
        match err {
            Error::Parse(error) => assert_eq!(error.line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_dsl_returns_warnings() {
        let (_, warnings) = ConceptMap::from_dsl("m", "A -- r -> B\nA:\ndefined\n---").unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ParseWarningKind::MissingDefinition);
    }

    #[test]
    fn test_bfs_distances_on_path() {
        let mut map = build("A -- r -> B\nB -- r -> C\nC -- r -> D");
        map.set_active_node(Some("A"));

        assert_eq!(map.get_distance_from_active("A"), Distance::Finite(0));
        assert_eq!(map.get_distance_from_active("B"), Distance::Finite(1));
        assert_eq!(map.get_distance_from_active("C"), Distance::Finite(2));
        assert_eq!(map.get_distance_from_active("D"), Distance::Finite(3));

        map.set_active_node(Some("D"));
        map.set_bidirectional(false);
        assert_eq!(map.get_distance_from_active("A"), Distance::Infinite);

        map.set_bidirectional(true);
        assert_eq!(map.get_distance_from_active("A"), Distance::Finite(3));
    }

    #[test]
    fn test_distance_without_active_node() {
        let map = star_graph();
        assert_eq!(map.get_distance_from_active("A"), Distance::Infinite);
        assert!(map.distances_from_active().is_empty());
    }

    #[test]
    fn test_unknown_active_node_is_ignored() {
        let mut map = star_graph();
        map.set_active_node(Some("A"));
        map.set_active_node(Some("Nope"));
        assert_eq!(map.get_active_node().map(|n| n.id.as_str()), Some("A"));

        map.set_active_node(None);
        assert!(map.get_active_node().is_none());
    }

    #[test]
    fn test_visibility_bound() {
        let mut map = star_graph();
        map.set_active_node(Some("A"));
        map.set_max_distance(1);

        assert_eq!(ids(map.get_visible_nodes()), set(&["A", "B", "D"]));
        assert_eq!(edge_ids(map.get_visible_edges()), set(&["A--r-->B", "A--r-->D"]));
    }

    #[test]
    fn test_zero_distance_shows_only_active() {
        let mut map = star_graph();
        map.set_active_node(Some("B"));
        map.set_max_distance(-3);

        assert_eq!(map.max_distance(), 0);
        assert_eq!(ids(map.get_visible_nodes()), set(&["B"]));
        assert!(map.get_visible_edges().is_empty());
    }

    #[test]
    fn test_one_way_visibility() {
        let mut map = star_graph();
        map.set_active_node(Some("B"));
        map.set_bidirectional(false);

        assert_eq!(ids(map.get_visible_nodes()), set(&["B", "C"]));
    }

    #[test]
    fn test_selection_independent_of_distance() {
        let mut map = star_graph();
        map.set_max_distance(0);
        assert!(map.add_selected_node("C"));

        assert_eq!(ids(map.get_visible_nodes()), set(&["B", "C"]));
        assert_eq!(edge_ids(map.get_visible_edges()), set(&["B--r-->C"]));
    }

    #[test]
    fn test_selected_neighbours_follow_direction() {
        let mut map = star_graph();
        map.set_bidirectional(false);
        map.add_selected_node("B");

        assert_eq!(ids(map.get_visible_nodes()), set(&["B", "C"]));
        assert_eq!(edge_ids(map.get_visible_edges()), set(&["B--r-->C"]));

        map.set_bidirectional(true);
        assert_eq!(ids(map.get_visible_nodes()), set(&["A", "B", "C"]));
        assert_eq!(
            edge_ids(map.get_visible_edges()),
            set(&["A--r-->B", "B--r-->C"])
        );
    }

    #[test]
    fn test_require_node() {
        let map = star_graph();
        assert_eq!(map.require_node("A").unwrap().id, "A");

        match map.require_node("Nope") {
            Err(Error::NodeNotFound(id)) => assert_eq!(id, "Nope"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_selection_is_a_set() {
        let mut map = star_graph();
        assert!(map.add_selected_node("C"));
        assert!(!map.add_selected_node("C"));
        assert!(!map.add_selected_node("Nope"));
        assert_eq!(map.get_selected_nodes().len(), 1);

        assert!(map.remove_selected_node("C"));
        assert!(!map.remove_selected_node("C"));
        assert!(map.get_visible_nodes().is_empty());
    }

    #[test]
    fn test_selection_unions_with_active_neighbourhood() {
        let mut map = build("A -- r -> B\nB -- r -> C\nC -- r -> D\nD -- r -> E");
        map.set_active_node(Some("A"));
        map.set_max_distance(1);
        map.add_selected_node("E");

        assert_eq!(ids(map.get_visible_nodes()), set(&["A", "B", "D", "E"]));
        assert_eq!(
            edge_ids(map.get_visible_edges()),
            set(&["A--r-->B", "D--r-->E"])
        );
    }

    #[test]
    fn test_relationship_filter_narrows() {
        let mut map = build(
            "A -- implements -> B\nA -- implements -> D\nB -- uses -> C\nD -- uses -> E",
        );
        map.set_active_node(Some("A"));
        map.set_max_distance(3);
        map.set_active_relationship(Some("implements"));

        assert_eq!(ids(map.get_visible_nodes()), set(&["A", "B", "D"]));
        assert_eq!(
            edge_ids(map.get_visible_edges()),
            set(&["A--implements-->B", "A--implements-->D"])
        );

        map.set_active_relationship(None);
        assert_eq!(map.get_visible_nodes().len(), 5);
    }

    #[test]
    fn test_relationship_filter_uses_whole_graph() {
        // B and C carry "uses" but are only reached from A through "is".
        let mut map = build("A -- is -> B\nB -- uses -> C");
        map.set_active_node(Some("A"));
        map.set_active_relationship(Some("uses"));

        assert_eq!(ids(map.get_visible_nodes()), set(&["B", "C"]));
        assert_eq!(edge_ids(map.get_visible_edges()), set(&["B--uses-->C"]));
    }

    #[test]
    fn test_empty_state_shows_nothing() {
        let mut map = star_graph();
        map.set_active_relationship(Some("r"));
        map.set_max_distance(10);

        assert!(map.get_visible_nodes().is_empty());
        assert!(map.get_visible_edges().is_empty());
    }

    #[test]
    fn test_neighbors_follow_direction() {
        let mut map = build("A -- r1 -> B\nA -- r2 -> B\nC -- r -> A");

        assert_eq!(ids(map.get_neighbors("A")), set(&["B", "C"]));
        assert_eq!(map.get_neighbors("A").len(), 2);

        map.set_bidirectional(false);
        assert_eq!(ids(map.get_neighbors("A")), set(&["B"]));
        assert!(map.get_neighbors("B").is_empty());
    }

    #[test]
    fn test_reset_filters() {
        let mut map = star_graph();
        map.set_active_node(Some("A"));
        map.add_selected_node("C");
        map.set_bidirectional(false);
        map.reset_filters();

        assert_eq!(map.filter_state(), &FilterState::default());
    }

    #[test]
    fn test_visible_graph_snapshot() {
        let mut map = star_graph();
        map.set_active_node(Some("A"));
        map.set_max_distance(1);
        map.add_selected_node("C");

        let view = map.visible_graph();
        assert_eq!(view.name, "test");
        assert_eq!(view.nodes.len(), 4);
        assert_eq!(view.edges.len(), 3);

        let c = view.nodes.iter().find(|n| n.id == "C").unwrap();
        assert!(c.selected);
        assert!(!c.active);
        assert_eq!(c.distance, Distance::Finite(2));

        let a = view.nodes.iter().find(|n| n.id == "A").unwrap();
        assert!(a.active);
        assert_eq!(a.distance, Distance::Finite(0));
    }

    #[test]
    fn test_to_dsl_layout() {
        let map = build("A -- r -> B\nB -- s -> C\nB:\nsecond\nletter\n---");
        assert_eq!(
            map.to_dsl(),
            "A -- r -> B\nB -- s -> C\n\nB:\nsecond\nletter\n---"
        );
        assert_eq!(ConceptMap::new("empty").to_dsl(), "");
    }

    #[test]
    fn test_to_dsl_round_trips_predicates() {
        let source = "A -- r1 -> B\nA -- r2 -> B\nB -- part of -> C\nC -- r1 -> A";
        let map = build(source);
        let reparsed = parse_dsl(&map.to_dsl());

        assert!(reparsed.is_ok());
        let original: HashSet<_> = parse_dsl(source).predicates.into_iter().collect();
        let exported: HashSet<_> = reparsed.predicates.into_iter().collect();
        assert_eq!(original, exported);
    }

    #[test]
    fn test_to_dsl_round_trips_definitions() {
        let map = build("A -- r -> B\nA:\nline one\n  indented\n---\nB:\n---");
        let reparsed = parse_dsl(&map.to_dsl());

        assert!(reparsed.is_ok());
        assert_eq!(reparsed.definitions["A"], "line one\n  indented");
        assert!(!reparsed.definitions.contains_key("B"));
    }
}
