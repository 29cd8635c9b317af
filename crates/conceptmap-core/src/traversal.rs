//! Breadth-first distance computation over the concept graph

use crate::edge::Edge;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Which edges a traversal may follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Only source -> target
    Outgoing,
    /// Edge direction is ignored
    #[default]
    Both,
}

impl Direction {
    pub fn from_bidirectional(bidirectional: bool) -> Self {
        if bidirectional {
            Self::Both
        } else {
            Self::Outgoing
        }
    }
}

/// Path length in edges, or `Infinite` when there is no path
///
/// `Infinite` orders after every finite distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distance {
    Finite(usize),
    Infinite,
}

impl From<Option<usize>> for Distance {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Self::Infinite, Self::Finite)
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Finite(d) => write!(f, "{}", d),
            Self::Infinite => f.write_str("infinite"),
        }
    }
}

/// Neighbour lists built once per query
pub(crate) struct Adjacency<'a> {
    neighbors: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Adjacency<'a> {
    pub(crate) fn build<I>(edges: I, direction: Direction) -> Self
    where
        I: IntoIterator<Item = &'a Edge>,
    {
        let mut neighbors: HashMap<&'a str, Vec<&'a str>> = HashMap::new();
        for edge in edges {
            neighbors
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            if direction == Direction::Both {
                neighbors
                    .entry(edge.target.as_str())
                    .or_default()
                    .push(edge.source.as_str());
            }
        }
        Self { neighbors }
    }

    /// Neighbours of `node`; parallel edges may repeat an entry
    pub(crate) fn of(&self, node: &str) -> &[&'a str] {
        self.neighbors.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Shortest distances in edges from `start` to every reachable node,
    /// `start` included at 0
    pub(crate) fn distances_from(&self, start: &'a str) -> HashMap<&'a str, usize> {
        let mut distances: HashMap<&'a str, usize> = HashMap::new();
        let mut queue: VecDeque<(&'a str, usize)> = VecDeque::new();

        distances.insert(start, 0);
        queue.push_back((start, 0));

        while let Some((current, depth)) = queue.pop_front() {
            for &next in self.of(current) {
                if !distances.contains_key(next) {
                    distances.insert(next, depth + 1);
                    queue.push_back((next, depth + 1));
                }
            }
        }

        tracing::trace!("BFS from {} reached {} nodes", start, distances.len());

        distances
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_graph() -> Vec<Edge> {
        vec![
            Edge::new("A", "B", "next"),
            Edge::new("B", "C", "next"),
            Edge::new("C", "D", "next"),
        ]
    }

    #[test]
    fn test_distance_ordering() {
        assert!(Distance::Finite(0) < Distance::Finite(1));
        assert!(Distance::Finite(usize::MAX) < Distance::Infinite);
        assert_eq!(Distance::from(None), Distance::Infinite);
        assert_eq!(Distance::from(Some(4)), Distance::Finite(4));
    }

    #[test]
    fn test_outgoing_distances() {
        let edges = path_graph();
        let adjacency = Adjacency::build(&edges, Direction::Outgoing);

        let from_a = adjacency.distances_from("A");
        assert_eq!(from_a.get("A"), Some(&0));
        assert_eq!(from_a.get("D"), Some(&3));

        let from_d = adjacency.distances_from("D");
        assert_eq!(from_d.len(), 1);
        assert!(!from_d.contains_key("A"));
    }

    #[test]
    fn test_bidirectional_distances() {
        let edges = path_graph();
        let adjacency = Adjacency::build(&edges, Direction::Both);

        let from_d = adjacency.distances_from("D");
        assert_eq!(from_d.get("A"), Some(&3));
        assert_eq!(from_d.get("C"), Some(&1));
    }

    #[test]
    fn test_shortest_path_wins() {
        let edges = vec![
            Edge::new("A", "B", "r"),
            Edge::new("B", "C", "r"),
            Edge::new("A", "C", "shortcut"),
        ];
        let adjacency = Adjacency::build(&edges, Direction::Outgoing);

        assert_eq!(adjacency.distances_from("A").get("C"), Some(&1));
    }

    #[test]
    fn test_unknown_start() {
        let edges = path_graph();
        let adjacency = Adjacency::build(&edges, Direction::Both);

        assert!(adjacency.of("Z").is_empty());
        assert_eq!(adjacency.distances_from("Z").len(), 1);
    }
}
